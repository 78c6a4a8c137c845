//! Mitigation pipeline configuration.
//!
//! A [`MitigationConfig`] names which passes to run and how. It can be
//! loaded from YAML or JSON:
//!
//! ```yaml
//! folding:
//!   scale_factor: 2.5
//!   gate: cx
//!   seed: 11
//! twirling:
//!   gate: cx
//!   seed: 42
//! ```
//!
//! Unknown fields are rejected so that a typo never silently disables a pass.

use serde::{Deserialize, Serialize};
use std::path::Path;

use qem_ir::StandardGate;

use crate::error::{MitigationError, MitigationResult};
use crate::passes::folding::{MAX_ODD_FOLD_FACTOR, odd_fold_factor};
use crate::twirl_set::TWIRLABLE_GATES;

/// Settings for the folding pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FoldingConfig {
    /// Noise amplification factor, at least 1.
    pub scale_factor: f64,
    /// Self-inverse gate to fold.
    pub gate: StandardGate,
    /// Seed for the selection stream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
}

/// Settings for the twirling pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TwirlingConfig {
    /// Two-qubit gate to twirl.
    pub gate: StandardGate,
    /// Seed for the twirl stream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
}

/// Complete pipeline configuration.
///
/// Folding, when present, always runs before twirling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MitigationConfig {
    /// Folding pass settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folding: Option<FoldingConfig>,
    /// Twirling pass settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twirling: Option<TwirlingConfig>,
}

impl MitigationConfig {
    /// Parse a YAML document.
    pub fn from_yaml_str(contents: &str) -> MitigationResult<Self> {
        let config: Self = serde_yaml_ng::from_str(contents)
            .map_err(|e| MitigationError::InvalidConfiguration(format!("YAML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON document.
    pub fn from_json_str(contents: &str) -> MitigationResult<Self> {
        let config: Self = serde_json::from_str(contents)
            .map_err(|e| MitigationError::InvalidConfiguration(format!("JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file; `.json` files are read as JSON, anything else as YAML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> MitigationResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            MitigationError::InvalidConfiguration(format!("cannot read {}: {e}", path.display()))
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&contents)
        } else {
            Self::from_yaml_str(&contents)
        }
    }

    /// Check value ranges and gate support.
    pub fn validate(&self) -> MitigationResult<()> {
        if let Some(folding) = &self.folding {
            if !folding.scale_factor.is_finite() || folding.scale_factor < 1.0 {
                return Err(MitigationError::InvalidConfiguration(format!(
                    "folding.scale_factor must be a finite number >= 1, got {}",
                    folding.scale_factor
                )));
            }
            if odd_fold_factor(folding.scale_factor).is_none() {
                return Err(MitigationError::InvalidConfiguration(format!(
                    "folding.scale_factor {} needs more than {MAX_ODD_FOLD_FACTOR} copies per gate",
                    folding.scale_factor
                )));
            }
            if !folding.gate.is_self_inverse() {
                return Err(MitigationError::InvalidConfiguration(format!(
                    "folding.gate '{}' is not self-inverse",
                    folding.gate
                )));
            }
        }
        if let Some(twirling) = &self.twirling {
            if !TWIRLABLE_GATES.contains(&twirling.gate) {
                return Err(MitigationError::UnsupportedTwirlGate(twirling.gate));
            }
        }
        Ok(())
    }

    /// Whether the configuration enables no pass at all.
    pub fn is_empty(&self) -> bool {
        self.folding.is_none() && self.twirling.is_none()
    }
}
