//! CLI command implementations.

pub mod aggregate;
pub mod apply;
pub mod common;
pub mod fold;
pub mod twirl;
pub mod twirl_set;
pub mod version;
