//! Kennel CLI - seed and query the owner/dog relational store

use clap::{Parser, Subcommand};
use kennel::config::{self, KennelConfig};
use kennel::output::{emit_success, OutputMode};
use kennel::seed::SeedSet;
use kennel::storage::RelationalStore;
use kennel::ui::{self, Icons};
use kennel::{Dog, Lookup, Owner, OwnershipLink};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "kennel")]
#[command(version)]
#[command(about = "Owners, dogs and who owns whom, in a local SQLite file")]
#[command(long_about = r#"
Kennel keeps owners and dogs in a local SQLite database and resolves the
many-to-many ownership relation in both directions.

Example usage:
  kennel seed
  kennel owner 1
  kennel dog 1
  kennel link 2 2
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Path to the database file (overrides the config file)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a kennel.toml and create an empty database
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },

    /// Load seed data (the built-in demo set unless a file is given)
    Seed {
        /// TOML or JSON seed file
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Insert or replace an owner
    AddOwner {
        #[arg(allow_negative_numbers = true)]
        id: i64,
        name: String,
    },

    /// Insert or replace a dog
    AddDog {
        #[arg(allow_negative_numbers = true)]
        id: i64,
        name: String,
    },

    /// Record that an owner owns a dog
    Link {
        #[arg(allow_negative_numbers = true)]
        owner_id: i64,
        #[arg(allow_negative_numbers = true)]
        dog_id: i64,
    },

    /// Show an owner and their dogs
    Owner {
        /// Owner id as typed; anything non-numeric matches nobody
        #[arg(allow_hyphen_values = true, default_value = "")]
        id: String,
    },

    /// Show a dog and its owners
    Dog {
        /// Dog id as typed; anything non-numeric matches nothing
        #[arg(allow_hyphen_values = true, default_value = "")]
        id: String,
    },

    /// List every owner, dog and link
    List,

    /// Show database statistics
    Stats,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for command output
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let output_mode = OutputMode::from_flag(cli.json);
    if let Err(err) = run(cli, output_mode) {
        if output_mode.is_human() {
            ui::error(&format!("{:#}", err));
        } else {
            let body = serde_json::json!({ "ok": false, "error": format!("{:#}", err) });
            println!("{}", body);
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli, output_mode: OutputMode) -> anyhow::Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let config = config::load_config(Some(&config_path))?.unwrap_or_default();
    let db_path = config.database_path(cli.database.as_deref());

    match cli.command {
        Commands::Init { force } => {
            let written = KennelConfig {
                database: Some(db_path.display().to_string()),
                ..config.clone()
            };
            config::write_config(&config_path, &written, force)?;
            if let Some(root) = config_path.parent() {
                let root = if root.as_os_str().is_empty() { Path::new(".") } else { root };
                config::ensure_gitignore(root)?;
            }
            let store = open_store(&db_path, &written)?;

            if output_mode.is_human() {
                ui::success(&format!("Wrote {}", config_path.display()));
                ui::info("Database", store.location());
            } else {
                let data = serde_json::json!({
                    "config": config_path.display().to_string(),
                    "database": store.location(),
                });
                emit_success(output_mode, "init", data)?;
            }
        }

        Commands::Seed { file } => {
            let store = open_store(&db_path, &config)?;
            let file = file.or_else(|| config.seed.as_ref().map(PathBuf::from));
            let seed = match &file {
                Some(path) => SeedSet::load(path)?,
                None => SeedSet::demo(),
            };
            if seed.is_empty() {
                ui::warn("Seed contains no owners, dogs or links; nothing to write");
            }
            let report = seed.apply(&store)?;

            if output_mode.is_human() {
                let source = file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "built-in demo set".to_string());
                ui::header(&format!("Seeded from {}", source));
                ui::info("Owners", &report.owners.to_string());
                ui::info("Dogs", &report.dogs.to_string());
                ui::info("Links", &report.links.to_string());
            } else {
                emit_success(output_mode, "seed", report)?;
            }
        }

        Commands::AddOwner { id, name } => {
            let store = open_store(&db_path, &config)?;
            let owner = Owner::new(id, name);
            store.insert_owner(&owner)?;
            if output_mode.is_human() {
                ui::success(&format!("{} Stored owner #{} {}", Icons::PERSON, owner.owner_id, owner.name));
            } else {
                emit_success(output_mode, "add-owner", &owner)?;
            }
        }

        Commands::AddDog { id, name } => {
            let store = open_store(&db_path, &config)?;
            let dog = Dog::new(id, name);
            store.insert_dog(&dog)?;
            if output_mode.is_human() {
                ui::success(&format!("{} Stored dog #{} {}", Icons::DOG, dog.dog_id, dog.name));
            } else {
                emit_success(output_mode, "add-dog", &dog)?;
            }
        }

        Commands::Link { owner_id, dog_id } => {
            let store = open_store(&db_path, &config)?;
            let link = OwnershipLink::new(owner_id, dog_id);
            store.insert_ownership_link(&link)?;

            if output_mode.is_human() {
                ui::success(&format!("{} Owner #{} owns dog #{}", Icons::LINK, owner_id, dog_id));
                if store.get_owner(owner_id)?.is_none() {
                    ui::warn(&format!("No owner #{} yet; the link will not resolve until one is added", owner_id));
                }
                if store.get_dog(dog_id)?.is_none() {
                    ui::warn(&format!("No dog #{} yet; the link will not resolve until one is added", dog_id));
                }
            } else {
                emit_success(output_mode, "link", link)?;
            }
        }

        Commands::Owner { id } => {
            let store = open_store(&db_path, &config)?;
            let views = Lookup::new(&store).owner_with_dogs(&id)?;

            if output_mode.is_human() {
                if views.is_empty() {
                    println!("{} No owner found for {:?}", Icons::EMPTY, id);
                }
                for view in &views {
                    ui::owner_with_dogs(view);
                }
            } else {
                emit_success(output_mode, "owner", &views)?;
            }
        }

        Commands::Dog { id } => {
            let store = open_store(&db_path, &config)?;
            let views = Lookup::new(&store).dog_with_owners(&id)?;

            if output_mode.is_human() {
                if views.is_empty() {
                    println!("{} No dog found for {:?}", Icons::EMPTY, id);
                }
                for view in &views {
                    ui::dog_with_owners(view);
                }
            } else {
                emit_success(output_mode, "dog", &views)?;
            }
        }

        Commands::List => {
            let store = open_store(&db_path, &config)?;
            let owners = store.list_owners()?;
            let dogs = store.list_dogs()?;
            let links = store.list_links()?;

            if output_mode.is_human() {
                ui::section("Owners");
                println!("{}", ui::owners_table(&owners));
                ui::section("Dogs");
                println!("{}", ui::dogs_table(&dogs));
                ui::section("Links");
                println!("{}", ui::links_table(&links));
            } else {
                let data = serde_json::json!({
                    "owners": owners,
                    "dogs": dogs,
                    "links": links,
                });
                emit_success(output_mode, "list", data)?;
            }
        }

        Commands::Stats => {
            let store = open_store(&db_path, &config)?;
            let stats = store.stats()?;

            if output_mode.is_human() {
                ui::header(&format!("{} Kennel Statistics", Icons::STATS));
                ui::info(&format!("{} Database", Icons::DATABASE), store.location());
                println!("{}", ui::stats_table(&stats));
                if stats.orphan_links > 0 {
                    ui::warn(&format!("{} link(s) point at a missing owner or dog", stats.orphan_links));
                }
            } else {
                emit_success(output_mode, "stats", stats)?;
            }
        }
    }

    Ok(())
}

fn open_store(db_path: &Path, config: &KennelConfig) -> anyhow::Result<RelationalStore> {
    config::ensure_db_dir(db_path).map_err(|e| kennel::Error::StorageUnavailable {
        path: db_path.display().to_string(),
        reason: e.to_string(),
    })?;
    tracing::debug!("Opening store at {}", db_path.display());
    Ok(RelationalStore::open(db_path, &config.store_options())?)
}
