//! Shared utilities used throughout the workspace

pub mod graph;
pub mod labels;
pub mod logging;
pub mod names;
