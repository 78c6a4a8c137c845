//! QEM Circuit Intermediate Representation
//!
//! This crate provides the circuit data structures the error-mitigation
//! passes operate on.
//!
//! # Overview
//!
//! Circuits are stored as a DAG (Directed Acyclic Graph) whose edges are
//! qubit and classical wires. Passes rewrite the DAG in place: they look up
//! operations by gate type, replace single nodes with short instruction
//! sequences and accumulate a global phase. The high-level [`Circuit`] API
//! provides a builder for constructing circuits and a serializable
//! [`CircuitSnapshot`] for exchanging them.
//!
//! # Core Components
//!
//! - **Qubits and Classical Bits**: [`QubitId`], [`ClbitId`]
//! - **Gates**: [`StandardGate`], a closed catalog of gates with constant matrices
//! - **Matrices**: [`Unitary2x2`], [`Unitary4x4`] (little-endian operand order)
//! - **Instructions**: [`Instruction`] combining gates with their operands
//! - **DAG**: [`CircuitDag`] for the internal graph representation
//! - **Circuit**: [`Circuit`] high-level builder API
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use qem_ir::{Circuit, QubitId, StandardGate};
//!
//! let mut circuit = Circuit::with_size("bell_state", 2, 2);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.dag().count_gate(StandardGate::CX), 1);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Self-inverse |
//! |------|--------|--------------|
//! | `I`, `X`, `Y`, `Z` | 1 | yes |
//! | `H` | 1 | yes |
//! | `S`, `Sdg`, `T`, `Tdg`, `SX` | 1 | no |
//! | `CX`, `CZ`, `ECR` | 2 | yes |
//! | `Swap` | 2 | yes |

pub mod circuit;
pub mod dag;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;
pub mod unitary;

pub use circuit::{Circuit, CircuitSnapshot};
pub use dag::{CircuitDag, DagEdge, DagNode, NodeIndex, WireId, normalize_phase};
pub use error::{IrError, IrResult};
pub use gate::{GateMatrix, StandardGate};
pub use instruction::{Instruction, InstructionKind};
pub use qubit::{ClbitId, QubitId};
pub use unitary::{Unitary2x2, Unitary4x4};
