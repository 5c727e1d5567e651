pub mod loader;
pub mod schema;

pub use loader::{Format, LoadError, load_catalog, load_catalog_str};
