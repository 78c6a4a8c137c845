//! Pauli twirling sets.
//!
//! A twirling set lists every quadruple of single-qubit Paulis `(a, b, c, d)`
//! for which
//!
//! ```text
//! e^{i·phase} · (c ⊗ d) · G · (a ⊗ b) = G
//! ```
//!
//! with `a`, `c` on the control and `b`, `d` on the target. The sets are found
//! by exhaustive search over all 256 quadruples and cached per gate for the
//! lifetime of the process.

use std::f64::consts::PI;
use std::fmt;
use std::sync::OnceLock;

use num_complex::Complex64;
use serde::Serialize;
use tracing::{debug, error, trace};

use qem_ir::{Instruction, QubitId, StandardGate, Unitary2x2, Unitary4x4};

use crate::error::{MitigationError, MitigationResult};

/// Tolerance for classifying a candidate as `G` or `-G`.
pub const CLASSIFY_TOLERANCE: f64 = 1e-15;

/// Element-wise tolerance for re-verifying an accepted entry.
pub const VERIFY_TOLERANCE: f64 = 1e-12;

/// Enumeration order of the search.
const SEARCH_ORDER: [StandardGate; 4] = [
    StandardGate::I,
    StandardGate::Z,
    StandardGate::X,
    StandardGate::Y,
];

/// Gates that have a twirling set.
pub const TWIRLABLE_GATES: [StandardGate; 3] =
    [StandardGate::CX, StandardGate::CZ, StandardGate::ECR];

/// One way of twirling a two-qubit gate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TwirlEntry {
    /// Pre-rotation on control, pre-rotation on target, post-rotation on
    /// control, post-rotation on target.
    pub gates: [StandardGate; 4],
    /// Phase to add to the circuit, either 0 or π.
    pub phase: f64,
}

impl TwirlEntry {
    /// Matrix of `post · target · pre`, without the phase correction.
    pub fn sequence_matrix(&self, target: &Unitary4x4) -> Unitary4x4 {
        let m = |g: StandardGate| g.matrix_1q().unwrap_or_else(Unitary2x2::identity);
        let [a, b, c, d] = self.gates;
        let pre = Unitary4x4::kron(&m(b), &m(a));
        let post = Unitary4x4::kron(&m(d), &m(c));
        post * *target * pre
    }

    /// The five instructions replacing `gate` on (`control`, `target`).
    pub fn instructions(
        &self,
        gate: StandardGate,
        control: QubitId,
        target: QubitId,
    ) -> [Instruction; 5] {
        let [a, b, c, d] = self.gates;
        [
            Instruction::single_qubit_gate(a, control),
            Instruction::single_qubit_gate(b, target),
            Instruction::two_qubit_gate(gate, control, target),
            Instruction::single_qubit_gate(c, control),
            Instruction::single_qubit_gate(d, target),
        ]
    }
}

impl fmt::Display for TwirlEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.gates;
        write!(f, "({a}, {b}) -> ({c}, {d}), phase {:.4}", self.phase)
    }
}

/// The complete twirling set of one gate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TwirlingSet {
    gate: StandardGate,
    entries: Vec<TwirlEntry>,
}

/// Phase that maps `candidate` back onto `target`, if any.
fn classify(candidate: &Unitary4x4, target: &Unitary4x4) -> Option<f64> {
    if candidate.frobenius_distance(target) < CLASSIFY_TOLERANCE {
        Some(0.0)
    } else if candidate.frobenius_distance(&-*target) < CLASSIFY_TOLERANCE {
        Some(PI)
    } else {
        None
    }
}

/// Check that `entry` reproduces `target` once its phase is applied.
fn verify(gate: StandardGate, entry: &TwirlEntry, target: &Unitary4x4) -> MitigationResult<()> {
    let corrected = entry
        .sequence_matrix(target)
        .scale(Complex64::from_polar(1.0, entry.phase));
    let deviation = corrected.max_deviation(target);
    if deviation > VERIFY_TOLERANCE {
        error!(gate = %gate, entry = %entry, deviation, "twirling entry failed verification");
        return Err(MitigationError::TwirlInvariantViolation {
            gate,
            entry: entry.to_string(),
            deviation,
        });
    }
    Ok(())
}

impl TwirlingSet {
    /// Search all Pauli quadruples for `gate`, bypassing the cache.
    pub fn search(gate: StandardGate) -> MitigationResult<Self> {
        if !TWIRLABLE_GATES.contains(&gate) {
            return Err(MitigationError::UnsupportedTwirlGate(gate));
        }
        let target = gate
            .matrix_2q()
            .ok_or(MitigationError::UnsupportedTwirlGate(gate))?;

        let mut entries: Vec<TwirlEntry> = Vec::with_capacity(16);
        for a in SEARCH_ORDER {
            for b in SEARCH_ORDER {
                for c in SEARCH_ORDER {
                    for d in SEARCH_ORDER {
                        let candidate = TwirlEntry {
                            gates: [a, b, c, d],
                            phase: 0.0,
                        };
                        let Some(phase) = classify(&candidate.sequence_matrix(&target), &target)
                        else {
                            trace!(gate = %gate, quadruple = ?candidate.gates, "rejected");
                            continue;
                        };
                        let entry = TwirlEntry { phase, ..candidate };
                        verify(gate, &entry, &target)?;
                        if !entries.contains(&entry) {
                            entries.push(entry);
                        }
                    }
                }
            }
        }

        debug!(gate = %gate, accepted = entries.len(), "twirling set search finished");
        Ok(Self { gate, entries })
    }

    /// The gate this set twirls.
    pub fn gate(&self) -> StandardGate {
        self.gate
    }

    /// All entries, in search order.
    pub fn entries(&self) -> &[TwirlEntry] {
        &self.entries
    }

    /// Get one entry.
    pub fn get(&self, index: usize) -> Option<&TwirlEntry> {
        self.entries.get(index)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries.
    pub fn iter(&self) -> impl Iterator<Item = &TwirlEntry> {
        self.entries.iter()
    }
}

static CX_SET: OnceLock<TwirlingSet> = OnceLock::new();
static CZ_SET: OnceLock<TwirlingSet> = OnceLock::new();
static ECR_SET: OnceLock<TwirlingSet> = OnceLock::new();

/// Get the cached twirling set for `gate`, computing it on first use.
pub fn twirling_set(gate: StandardGate) -> MitigationResult<&'static TwirlingSet> {
    let cell = match gate {
        StandardGate::CX => &CX_SET,
        StandardGate::CZ => &CZ_SET,
        StandardGate::ECR => &ECR_SET,
        other => return Err(MitigationError::UnsupportedTwirlGate(other)),
    };
    if let Some(set) = cell.get() {
        return Ok(set);
    }
    let set = TwirlingSet::search(gate)?;
    Ok(cell.get_or_init(|| set))
}
