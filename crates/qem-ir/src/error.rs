//! Error types for the IR crate.

use thiserror::Error;

use crate::gate::StandardGate;
use crate::qubit::{ClbitId, QubitId};

/// Errors raised while building or rewriting a circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// An operand qubit was never added to the circuit.
    #[error("'{op}' acts on qubit {qubit}, which is not in the circuit")]
    QubitNotFound {
        /// Missing qubit.
        qubit: QubitId,
        /// Instruction that referenced it.
        op: &'static str,
    },

    /// An operand classical bit was never added to the circuit.
    #[error("'{op}' writes classical bit {clbit}, which is not in the circuit")]
    ClbitNotFound {
        /// Missing classical bit.
        clbit: ClbitId,
        /// Instruction that referenced it.
        op: &'static str,
    },

    /// The graph lost an invariant (dangling wire, cycle, stale node).
    #[error("Invalid DAG structure: {0}")]
    InvalidDag(String),

    /// The node index does not name an operation.
    #[error("Node is not an operation of this DAG")]
    InvalidNode,

    /// A gate was applied to the wrong number of qubits.
    #[error("{gate} acts on {expected} qubit(s), got {got}")]
    QubitCountMismatch {
        /// The gate.
        gate: StandardGate,
        /// Arity of the gate.
        expected: u32,
        /// Operands supplied.
        got: u32,
    },

    /// The same qubit appears twice in one instruction.
    #[error("'{op}' uses qubit {qubit} more than once")]
    DuplicateQubit {
        /// Repeated qubit.
        qubit: QubitId,
        /// Offending instruction.
        op: &'static str,
    },

    /// A global phase was NaN or infinite.
    #[error("Global phase must be finite, got {0}")]
    NonFinitePhase(f64),

    /// Gate identifier is not in the catalog.
    #[error("Unknown gate '{0}'")]
    UnknownGate(String),

    /// A replacement instruction touches a wire the substituted node does not.
    #[error("Replacement '{instruction}' does not act on the wires of substituted node '{node}'")]
    SubstitutionMismatch {
        /// Name of the node being substituted.
        node: String,
        /// Name of the offending replacement instruction.
        instruction: String,
    },
}

/// Result alias for IR operations.
pub type IrResult<T> = Result<T, IrError>;
