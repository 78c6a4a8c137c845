//! Pauli twirling of two-qubit gates.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, trace};

use qem_ir::{CircuitDag, StandardGate, normalize_phase};

use crate::error::{MitigationError, MitigationResult};
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;
use crate::twirl_set::{TwirlingSet, twirling_set};

/// Summary of a twirling run, stored in the [`PropertySet`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TwirlingReport {
    /// Twirled gate.
    pub gate: StandardGate,
    /// Occurrences replaced by a twirled sequence.
    pub num_twirled: usize,
    /// Phase added to the circuit, in `[0, 2π)`.
    pub phase_added: f64,
}

/// Replaces every occurrence of a two-qubit gate with a randomly drawn,
/// equivalent Pauli-sandwiched sequence.
///
/// The random stream persists across runs: running the same pass twice
/// draws different twirls, while two passes built with the same seed draw
/// the same ones.
#[derive(Debug)]
pub struct PauliTwirling {
    gate: StandardGate,
    set: &'static TwirlingSet,
    rng: Mutex<StdRng>,
}

impl PauliTwirling {
    /// Create a twirling pass with a non-reproducible stream.
    pub fn new(gate: StandardGate) -> MitigationResult<Self> {
        Self::with_seed(gate, None)
    }

    /// Create a twirling pass, seeding the stream when `seed` is set.
    pub fn with_seed(gate: StandardGate, seed: Option<u32>) -> MitigationResult<Self> {
        let set = twirling_set(gate)?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(u64::from(seed)),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            gate,
            set,
            rng: Mutex::new(rng),
        })
    }

    /// The gate being twirled.
    pub fn gate(&self) -> StandardGate {
        self.gate
    }

    /// The twirling set draws are made from.
    pub fn twirling_set(&self) -> &'static TwirlingSet {
        self.set
    }

    fn failed(&self, reason: impl Into<String>) -> MitigationError {
        MitigationError::PassFailed {
            name: self.name().to_string(),
            reason: reason.into(),
        }
    }
}

impl Pass for PauliTwirling {
    fn name(&self) -> &'static str {
        "pauli_twirling"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> MitigationResult<()> {
        let occurrences: Vec<_> = dag
            .collect_runs(self.gate)
            .into_iter()
            .flatten()
            .filter_map(|node| dag.get_instruction(node).map(|inst| (node, inst.qubits.clone())))
            .collect();

        if occurrences.is_empty() {
            debug!(gate = %self.gate, "no occurrences to twirl");
            properties.insert(TwirlingReport {
                gate: self.gate,
                num_twirled: 0,
                phase_added: 0.0,
            });
            return Ok(());
        }

        let mut rng = self
            .rng
            .lock()
            .map_err(|e| self.failed(format!("random number stream unavailable: {e}")))?;

        let mut phase_added = 0.0;
        for (node, qubits) in &occurrences {
            let &[control, target] = qubits.as_slice() else {
                return Err(self.failed(format!(
                    "expected two operands for '{}', got {}",
                    self.gate,
                    qubits.len()
                )));
            };
            let index = rng.gen_range(0..self.set.len());
            let entry = self
                .set
                .get(index)
                .ok_or_else(|| self.failed(format!("twirl index {index} out of range")))?;
            trace!(gate = %self.gate, index, entry = %entry, "twirling occurrence");

            dag.substitute_node(*node, entry.instructions(self.gate, control, target))?;
            dag.add_global_phase(entry.phase)?;
            phase_added = normalize_phase(phase_added + entry.phase);
        }

        info!(
            gate = %self.gate,
            phase_added,
            "twirled {} occurrences",
            occurrences.len()
        );
        properties.insert(TwirlingReport {
            gate: self.gate,
            num_twirled: occurrences.len(),
            phase_added,
        });
        Ok(())
    }
}
