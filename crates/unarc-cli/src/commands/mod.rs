//! Subcommand implementations.

pub mod container;
pub mod stream;
