//! CLI command implementations.

pub mod directory;
pub mod proxy;
