//! Gate catalog.
//!
//! [`StandardGate`] is the closed set of gates a circuit can carry. Every
//! variant maps to a constant matrix via [`StandardGate::matrix`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IrError;
use crate::unitary::{Unitary2x2, Unitary4x4};

/// Standard gates with known semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StandardGate {
    // Single-qubit Pauli gates
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,

    // Single-qubit Clifford+T gates
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// sqrt(X) gate.
    SX,

    // Two-qubit gates
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Z gate.
    CZ,
    /// Echoed cross-resonance gate.
    ECR,
    /// SWAP gate.
    Swap,
}

/// Matrix of a catalog gate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateMatrix {
    /// Single-qubit matrix.
    One(Unitary2x2),
    /// Two-qubit matrix, little-endian in the gate's operand order.
    Two(Unitary4x4),
}

impl StandardGate {
    /// The single-qubit Pauli gates, in catalog order.
    pub const PAULIS: [StandardGate; 4] = [
        StandardGate::I,
        StandardGate::X,
        StandardGate::Y,
        StandardGate::Z,
    ];

    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::SX => "sx",
            StandardGate::CX => "cx",
            StandardGate::CZ => "cz",
            StandardGate::ECR => "ecr",
            StandardGate::Swap => "swap",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::I
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::H
            | StandardGate::S
            | StandardGate::Sdg
            | StandardGate::T
            | StandardGate::Tdg
            | StandardGate::SX => 1,

            StandardGate::CX | StandardGate::CZ | StandardGate::ECR | StandardGate::Swap => 2,
        }
    }

    /// Whether applying the gate twice is the identity.
    pub fn is_self_inverse(&self) -> bool {
        matches!(
            self,
            StandardGate::I
                | StandardGate::X
                | StandardGate::Y
                | StandardGate::Z
                | StandardGate::H
                | StandardGate::CX
                | StandardGate::CZ
                | StandardGate::ECR
                | StandardGate::Swap
        )
    }

    /// Get the unitary matrix of this gate.
    pub fn matrix(&self) -> GateMatrix {
        match self {
            StandardGate::I => GateMatrix::One(Unitary2x2::identity()),
            StandardGate::X => GateMatrix::One(Unitary2x2::x()),
            StandardGate::Y => GateMatrix::One(Unitary2x2::y()),
            StandardGate::Z => GateMatrix::One(Unitary2x2::z()),
            StandardGate::H => GateMatrix::One(Unitary2x2::h()),
            StandardGate::S => GateMatrix::One(Unitary2x2::s()),
            StandardGate::Sdg => GateMatrix::One(Unitary2x2::sdg()),
            StandardGate::T => GateMatrix::One(Unitary2x2::t()),
            StandardGate::Tdg => GateMatrix::One(Unitary2x2::tdg()),
            StandardGate::SX => GateMatrix::One(Unitary2x2::sx()),
            StandardGate::CX => GateMatrix::Two(Unitary4x4::cx()),
            StandardGate::CZ => GateMatrix::Two(Unitary4x4::cz()),
            StandardGate::ECR => GateMatrix::Two(Unitary4x4::ecr()),
            StandardGate::Swap => GateMatrix::Two(Unitary4x4::swap()),
        }
    }

    /// Single-qubit matrix, or `None` for multi-qubit gates.
    pub fn matrix_1q(&self) -> Option<Unitary2x2> {
        match self.matrix() {
            GateMatrix::One(m) => Some(m),
            GateMatrix::Two(_) => None,
        }
    }

    /// Two-qubit matrix, or `None` for single-qubit gates.
    pub fn matrix_2q(&self) -> Option<Unitary4x4> {
        match self.matrix() {
            GateMatrix::Two(m) => Some(m),
            GateMatrix::One(_) => None,
        }
    }
}

impl fmt::Display for StandardGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StandardGate {
    type Err = IrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let gate = match s.trim().to_ascii_lowercase().as_str() {
            "i" | "id" => StandardGate::I,
            "x" => StandardGate::X,
            "y" => StandardGate::Y,
            "z" => StandardGate::Z,
            "h" => StandardGate::H,
            "s" => StandardGate::S,
            "sdg" => StandardGate::Sdg,
            "t" => StandardGate::T,
            "tdg" => StandardGate::Tdg,
            "sx" => StandardGate::SX,
            "cx" | "cnot" => StandardGate::CX,
            "cz" => StandardGate::CZ,
            "ecr" => StandardGate::ECR,
            "swap" => StandardGate::Swap,
            _ => return Err(IrError::UnknownGate(s.to_string())),
        };
        Ok(gate)
    }
}
