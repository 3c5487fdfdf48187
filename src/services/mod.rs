pub mod database_loader;
pub mod item_distributor;
pub mod pattern_selector;
pub mod scramble_formatter;

pub use database_loader::{load_database, DETAILS_TABLE, OVERVIEW_TABLE};
pub use item_distributor::{distribute, DistributedItem, Distribution};
pub use pattern_selector::{select_patterns, SelectionSet};
pub use scramble_formatter::{format_scramble, ScrambleDisplay};
