pub mod database;
pub mod memory;

pub use database::{ContentDatabase, Item};
pub use memory::{InMemoryContentDatabase, ItemRecord};
