//! CLI command implementations.

pub mod common;
pub mod order;
pub mod state;
pub mod version;
pub mod walkthrough;
