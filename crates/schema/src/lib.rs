//! Everything we know about a device before we build a pipeline for it:
//! the datatype hierarchy, the node classes and their ports,
//! and the configuration shapes node properties must fit.

mod catalog;
mod config;
mod errors;

pub mod datatype;
pub mod json;
pub mod nodeclass;
pub mod port;
pub mod shape;

pub use catalog::{Catalog, CatalogSources};
pub use config::{CatalogConfig, CatalogOptions, ConfigError, LoggingOptions};
pub use errors::LoadError;
