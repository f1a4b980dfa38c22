pub mod source;
pub mod store;

pub use source::{load_catalog, CatalogSource, JsonFileSource};
pub use store::{CatalogStore, CatalogTables, ItemRow, MAX_SUGGESTIONS};
