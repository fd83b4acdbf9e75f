//! Build device pipelines from a catalog.
//!
//! A [`PipelineBuilder`] instantiates node classes from a
//! [`dai_schema::Catalog`], connects their ports after checking that
//! their datatypes are compatible, and exports the result as a
//! [`PipelineDocument`].

mod builder;
mod errors;

pub mod connection;
pub mod export;
pub mod graph;
pub mod instance;

#[cfg(test)]
mod testutil;

pub use builder::PipelineBuilder;
pub use errors::PipelineError;
pub use export::PipelineDocument;
pub use instance::{NodeInstance, NodeInstanceId, NodeOverrides};
