use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::storage::StoreOptions;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct KennelConfig {
    pub database: Option<String>,
    pub busy_timeout_ms: Option<u64>,
    pub seed: Option<String>,
}

impl KennelConfig {
    pub fn store_options(&self) -> StoreOptions {
        match self.busy_timeout_ms {
            Some(ms) => StoreOptions::default().with_busy_timeout_ms(ms),
            None => StoreOptions::default(),
        }
    }

    /// Database path: explicit override, then config, then `.kennel/kennel.db`
    pub fn database_path(&self, cli_override: Option<&Path>) -> PathBuf {
        cli_override
            .map(Path::to_path_buf)
            .or_else(|| self.database.as_ref().map(PathBuf::from))
            .unwrap_or_else(|| default_database_path_in(Path::new(".")))
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("kennel.toml")
}

pub fn default_database_path_in(base: &Path) -> PathBuf {
    base.join(".kennel").join("kennel.db")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<KennelConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: KennelConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &KennelConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

pub fn ensure_gitignore(project_root: &Path) -> anyhow::Result<()> {
    let gitignore_path = project_root.join(".gitignore");
    let entry = ".kennel/";

    let mut content = String::new();
    if gitignore_path.exists() {
        content = std::fs::read_to_string(&gitignore_path)?;
        if content.lines().any(|line| line.trim() == entry) {
            return Ok(());
        }
        if !content.is_empty() && !content.ends_with('\n') {
            content.push('\n');
        }
    }
    content.push_str(entry);
    content.push('\n');
    std::fs::write(&gitignore_path, content)?;
    Ok(())
}
