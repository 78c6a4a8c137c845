//! Local gate folding for zero-noise extrapolation.
//!
//! Folding replaces a self-inverse gate `G` by `G·G·…·G` (an odd number of
//! copies), which leaves the circuit's action unchanged while multiplying the
//! noise that gate contributes. To reach a non-integer scale factor only a
//! subset of the occurrences is folded, so the average amplification over
//! the circuit matches the requested factor.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::{debug, info};

use qem_ir::{CircuitDag, StandardGate};

use crate::error::{MitigationError, MitigationResult};
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Summary of a folding run, stored in the [`PropertySet`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoldingReport {
    /// Folded gate.
    pub gate: StandardGate,
    /// Requested scale factor.
    pub scale_factor: f64,
    /// Number of copies each selected occurrence was replaced by.
    pub odd_fold_factor: usize,
    /// Occurrences of the gate before folding.
    pub num_target_gates: usize,
    /// Occurrences that were folded.
    pub num_folded: usize,
}

/// Largest number of copies a single occurrence may be folded into.
pub const MAX_ODD_FOLD_FACTOR: usize = 10_001;

/// Smallest odd integer not below `ceil(scale_factor)`.
///
/// `None` when `scale_factor` is not finite, is negative, or would need more
/// than [`MAX_ODD_FOLD_FACTOR`] copies per occurrence.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn odd_fold_factor(scale_factor: f64) -> Option<usize> {
    let ceil = scale_factor.ceil();
    if !(0.0..=MAX_ODD_FOLD_FACTOR as f64).contains(&ceil) {
        return None;
    }
    let ceil = ceil as usize;
    Some(ceil / 2 * 2 + 1)
}

/// `(digits, frac_digits)` with `value == digits / 10^frac_digits`, read off
/// the shortest decimal representation of `value`.
fn decimal_parts(value: f64) -> Option<(u128, u32)> {
    let repr = format!("{value}");
    let (int_part, frac_part) = repr.split_once('.').unwrap_or((repr.as_str(), ""));
    let mut digits: u128 = 0;
    for ch in int_part.chars().chain(frac_part.chars()) {
        let d = ch.to_digit(10)?;
        digits = digits.checked_mul(10)?.checked_add(u128::from(d))?;
    }
    Some((digits, u32::try_from(frac_part.len()).ok()?))
}

/// Number of occurrences to fold so the average amplification is `scale_factor`.
///
/// Computes `floor(n · (scale_factor − 1) / (odd − 1))` with `scale_factor − 1`
/// taken exactly in decimal, so `1.2 − 1` is `0.2` rather than the nearest
/// binary fraction below it.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
pub fn num_to_fold(num_target_gates: usize, scale_factor: f64, odd_fold_factor: usize) -> usize {
    if odd_fold_factor <= 1 || scale_factor <= 1.0 {
        return 0;
    }

    let exact = decimal_parts(scale_factor).and_then(|(digits, frac_digits)| {
        let unit = 10_u128.checked_pow(frac_digits)?;
        let excess = digits.checked_sub(unit)?;
        let numerator = (num_target_gates as u128).checked_mul(excess)?;
        let denominator = unit.checked_mul(odd_fold_factor as u128 - 1)?;
        usize::try_from(numerator / denominator).ok()
    });

    let count = exact.unwrap_or_else(|| {
        (num_target_gates as f64 * (scale_factor - 1.0) / (odd_fold_factor - 1) as f64).floor()
            as usize
    });
    count.min(num_target_gates)
}

/// Pick `k` distinct indices uniformly from `0..n`.
///
/// Partial Fisher-Yates shuffle: the first `k` slots of `0..n` are shuffled
/// and returned in draw order.
pub fn select_indices<R: Rng + ?Sized>(rng: &mut R, n: usize, k: usize) -> Vec<usize> {
    let k = k.min(n);
    let mut pool: Vec<usize> = (0..n).collect();
    for i in 0..k {
        let j = rng.gen_range(i..n);
        pool.swap(i, j);
    }
    pool.truncate(k);
    pool
}

/// Folds a random subset of the occurrences of one self-inverse gate.
#[derive(Debug)]
pub struct LocalFolding {
    scale_factor: f64,
    odd_fold_factor: usize,
    gate: StandardGate,
    rng: Mutex<StdRng>,
}

impl LocalFolding {
    /// Create a folding pass with a non-reproducible selection stream.
    pub fn new(scale_factor: f64, gate: StandardGate) -> MitigationResult<Self> {
        Self::with_seed(scale_factor, gate, None)
    }

    /// Create a folding pass, seeding the selection stream when `seed` is set.
    pub fn with_seed(
        scale_factor: f64,
        gate: StandardGate,
        seed: Option<u32>,
    ) -> MitigationResult<Self> {
        if !scale_factor.is_finite() || scale_factor < 1.0 {
            return Err(MitigationError::InvalidConfiguration(format!(
                "scale factor must be a finite number >= 1, got {scale_factor}"
            )));
        }
        let Some(odd_fold_factor) = odd_fold_factor(scale_factor) else {
            return Err(MitigationError::InvalidConfiguration(format!(
                "scale factor {scale_factor} needs more than {MAX_ODD_FOLD_FACTOR} copies per gate"
            )));
        };
        if !gate.is_self_inverse() {
            return Err(MitigationError::InvalidConfiguration(format!(
                "gate '{gate}' is not self-inverse and cannot be folded"
            )));
        }
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(u64::from(seed)),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            scale_factor,
            odd_fold_factor,
            gate,
            rng: Mutex::new(rng),
        })
    }

    /// The requested scale factor.
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// The gate being folded.
    pub fn gate(&self) -> StandardGate {
        self.gate
    }
}

impl Pass for LocalFolding {
    fn name(&self) -> &'static str {
        "local_folding"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    #[allow(clippy::float_cmp)]
    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> MitigationResult<()> {
        if self.scale_factor == 1.0 {
            debug!(gate = %self.gate, "scale factor is 1, nothing to fold");
            return Ok(());
        }

        let occurrences: Vec<_> = dag
            .collect_runs(self.gate)
            .into_iter()
            .flatten()
            .filter_map(|node| dag.get_instruction(node).map(|inst| (node, inst.clone())))
            .collect();
        let num_target_gates = occurrences.len();
        if num_target_gates == 0 {
            return Err(MitigationError::GateNotFound(self.gate));
        }

        let odd_fold_factor = self.odd_fold_factor;
        let num_folded = num_to_fold(num_target_gates, self.scale_factor, odd_fold_factor);
        debug!(
            gate = %self.gate,
            odd_fold_factor,
            num_target_gates,
            num_folded,
            "selecting occurrences to fold"
        );

        let selected: FxHashSet<usize> = {
            let mut rng = self.rng.lock().map_err(|e| MitigationError::PassFailed {
                name: self.name().to_string(),
                reason: format!("random number stream unavailable: {e}"),
            })?;
            select_indices(&mut *rng, num_target_gates, num_folded)
                .into_iter()
                .collect()
        };

        for (index, (node, inst)) in occurrences.into_iter().enumerate() {
            if selected.contains(&index) {
                dag.substitute_node(node, vec![inst; odd_fold_factor])?;
            }
        }

        info!(
            gate = %self.gate,
            scale_factor = self.scale_factor,
            "folded {num_folded} of {num_target_gates} occurrences {odd_fold_factor}x"
        );
        properties.insert(FoldingReport {
            gate: self.gate,
            scale_factor: self.scale_factor,
            odd_fold_factor,
            num_target_gates,
            num_folded,
        });
        Ok(())
    }
}
