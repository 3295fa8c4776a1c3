//! Model domain - the catalog of invocable models

mod catalog;

pub use catalog::{ModelCatalog, ModelId};
