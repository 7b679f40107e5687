//! Filesystem catalog backend for herald.
//!
//! Stores catalog fixtures under a root directory:
//! - `.herald/config.yml`: Catalog and publisher configuration
//! - `catalog/entities/{type}/{slug}-{id}.yml`: One file per entity
//! - `catalog/threads/{id}.yml`: One file per discussion thread

pub mod catalog;
pub mod config;
pub mod error;

pub use catalog::Catalog;
pub use config::HeraldConfig;
pub use error::{FsError, Result};
