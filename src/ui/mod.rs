pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{
    dim, dog_with_owners, error, header, info, owner_with_dogs, section, success, warn,
};
pub use table::{TableBuilder, dogs_table, links_table, owners_table, stats_table};
pub use theme::{theme, Theme};
