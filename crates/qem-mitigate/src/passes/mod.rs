//! Built-in mitigation passes.
//!
//! - [`LocalFolding`]: replicate a self-inverse gate to amplify its noise
//! - [`PauliTwirling`]: sandwich a two-qubit gate between random Paulis

pub mod folding;
pub mod twirling;

pub use folding::{FoldingReport, LocalFolding};
pub use twirling::{PauliTwirling, TwirlingReport};
