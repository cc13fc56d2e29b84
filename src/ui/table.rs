use tabled::{settings::Style, Table, Tabled};

use crate::model::{Dog, Owner, OwnershipLink};
use crate::storage::DbStats;

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Tabled)]
struct EntityRow {
    #[tabled(rename = "Id")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
}

#[derive(Tabled)]
struct LinkRow {
    #[tabled(rename = "Owner")]
    owner_id: i64,
    #[tabled(rename = "Dog")]
    dog_id: i64,
}

pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }
        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn stats_table(stats: &DbStats) -> String {
    let mut builder = TableBuilder::new();
    builder.add_row("Owners", &stats.owners.to_string());
    builder.add_row("Dogs", &stats.dogs.to_string());
    builder.add_row("Links", &stats.links.to_string());
    builder.add_row("Orphan links", &stats.orphan_links.to_string());
    builder.build()
}

pub fn owners_table(owners: &[Owner]) -> String {
    let rows = owners.iter().map(|o| EntityRow {
        id: o.owner_id,
        name: o.name.clone(),
    });
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn dogs_table(dogs: &[Dog]) -> String {
    let rows = dogs.iter().map(|d| EntityRow {
        id: d.dog_id,
        name: d.name.clone(),
    });
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn links_table(links: &[OwnershipLink]) -> String {
    let rows = links.iter().map(|l| LinkRow {
        owner_id: l.owner_id,
        dog_id: l.dog_id,
    });
    Table::new(rows).with(Style::rounded()).to_string()
}
