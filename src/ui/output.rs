use crate::model::{DogWithOwners, OwnerWithDogs};
use crate::output::is_quiet;
use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

pub fn header(text: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}", Icons::PAW, text.style(theme().header.clone()));
}

pub fn success(label: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}", Icons::CHECK, label.style(theme().success.clone()));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(theme().error.clone()));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(theme().warn.clone()));
}

pub fn info(label: &str, value: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}: {}", Icons::INFO, label.style(theme().dim.clone()), value);
}

fn section_text(title: &str, quiet: bool) -> Option<String> {
    if quiet {
        return None;
    }
    Some(format!("\n━{}━", title.style(theme().header.clone())))
}

pub fn section(title: &str) {
    if let Some(text) = section_text(title, is_quiet()) {
        println!("{}", text);
    }
}

pub fn dim(text: &str) -> String {
    text.style(theme().dim.clone()).to_string()
}

/// One owner and the names of its dogs, one per line
pub fn format_owner_with_dogs(view: &OwnerWithDogs) -> String {
    let mut out = format!(
        "{} Owner: {} {}\n",
        Icons::PERSON,
        view.owner.name.style(theme().owner.clone()),
        dim(&format!("(#{})", view.owner.owner_id))
    );
    if view.dogs.is_empty() {
        out.push_str(&format!("   {} no dogs\n", Icons::EMPTY));
    }
    for dog in &view.dogs {
        out.push_str(&format!(
            "   {} {} {}\n",
            Icons::DOG,
            dog.name.style(theme().dog.clone()),
            dim(&format!("(#{})", dog.dog_id))
        ));
    }
    out
}

/// One dog and the names of its owners, one per line
pub fn format_dog_with_owners(view: &DogWithOwners) -> String {
    let mut out = format!(
        "{} Dog: {} {}\n",
        Icons::DOG,
        view.dog.name.style(theme().dog.clone()),
        dim(&format!("(#{})", view.dog.dog_id))
    );
    if view.owners.is_empty() {
        out.push_str(&format!("   {} no owners\n", Icons::EMPTY));
    }
    for owner in &view.owners {
        out.push_str(&format!(
            "   {} {} {}\n",
            Icons::PERSON,
            owner.name.style(theme().owner.clone()),
            dim(&format!("(#{})", owner.owner_id))
        ));
    }
    out
}

pub fn owner_with_dogs(view: &OwnerWithDogs) {
    print!("{}", format_owner_with_dogs(view));
}

pub fn dog_with_owners(view: &DogWithOwners) {
    print!("{}", format_dog_with_owners(view));
}
