//! Error types for the mitigation crate.

use qem_ir::StandardGate;
use thiserror::Error;

/// Errors that can occur while building or running mitigation passes.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MitigationError {
    /// Error from the IR crate.
    #[error("IR error: {0}")]
    Ir(#[from] qem_ir::IrError),

    /// Twirling requested for a gate without a twirling set.
    #[error("Gate '{0}' cannot be twirled; supported gates are cx, cz and ecr")]
    UnsupportedTwirlGate(StandardGate),

    /// Folding requested for a gate that does not occur in the circuit.
    #[error("Gate '{0}' does not occur in the circuit")]
    GateNotFound(StandardGate),

    /// A twirling entry failed verification after phase correction.
    #[error(
        "Twirling set for '{gate}' is inconsistent: entry {entry} deviates by {deviation:e} after phase correction"
    )]
    TwirlInvariantViolation {
        gate: StandardGate,
        entry: String,
        deviation: f64,
    },

    /// Invalid pass configuration.
    #[error("Invalid pass configuration: {0}")]
    InvalidConfiguration(String),

    /// Pass execution failed.
    #[error("Pass '{name}' failed: {reason}")]
    PassFailed { name: String, reason: String },
}

/// Result type for mitigation operations.
pub type MitigationResult<T> = Result<T, MitigationError>;
