//! Pass manager for orchestrating mitigation passes.

use tracing::{debug, info, instrument};

use qem_ir::{CircuitDag, StandardGate};

use crate::config::{FoldingConfig, MitigationConfig, TwirlingConfig};
use crate::error::MitigationResult;
use crate::pass::Pass;
use crate::passes::{LocalFolding, PauliTwirling};
use crate::property::PropertySet;

/// Manages and executes a sequence of passes.
pub struct PassManager {
    /// The passes to execute, in order.
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    /// Create a new empty pass manager.
    pub fn new() -> Self {
        Self { passes: vec![] }
    }

    /// Add a pass to the manager.
    pub fn add_pass(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    /// Run all passes on the given DAG.
    #[instrument(skip(self, dag, properties))]
    pub fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> MitigationResult<()> {
        info!(
            "Running pass manager with {} passes on circuit with {} qubits",
            self.passes.len(),
            dag.num_qubits()
        );

        for pass in &self.passes {
            if pass.should_run(dag, properties) {
                debug!("Running pass: {}", pass.name());
                pass.run(dag, properties)?;
                debug!("Pass {} completed, ops: {}", pass.name(), dag.num_ops());
            } else {
                debug!("Skipping pass: {}", pass.name());
            }
        }

        info!(
            "Pass manager completed, final depth: {}, ops: {}, global phase: {:.6}",
            dag.depth(),
            dag.num_ops(),
            dag.global_phase()
        );

        Ok(())
    }

    /// Names of the passes, in execution order.
    pub fn pass_names(&self) -> Vec<&str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Get the number of passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Check if the manager has no passes.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl Default for PassManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for mitigation pipelines.
///
/// Folding always runs before twirling, so each folded copy of a gate is
/// twirled independently.
#[derive(Debug, Clone, Default)]
pub struct PassManagerBuilder {
    folding: Option<FoldingConfig>,
    twirling: Option<TwirlingConfig>,
}

impl PassManagerBuilder {
    /// Create a new builder with no passes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold `gate` to reach `scale_factor`.
    #[must_use]
    pub fn with_folding(mut self, scale_factor: f64, gate: StandardGate) -> Self {
        self.folding = Some(FoldingConfig {
            scale_factor,
            gate,
            seed: None,
        });
        self
    }

    /// Seed the folding selection. Has no effect without [`Self::with_folding`].
    #[must_use]
    pub fn with_folding_seed(mut self, seed: u32) -> Self {
        if let Some(folding) = &mut self.folding {
            folding.seed = Some(seed);
        }
        self
    }

    /// Twirl `gate`, optionally with a fixed seed.
    #[must_use]
    pub fn with_twirling(mut self, gate: StandardGate, seed: Option<u32>) -> Self {
        self.twirling = Some(TwirlingConfig { gate, seed });
        self
    }

    /// Take both pass settings from a configuration.
    #[must_use]
    pub fn with_config(mut self, config: &MitigationConfig) -> Self {
        self.folding.clone_from(&config.folding);
        self.twirling.clone_from(&config.twirling);
        self
    }

    /// Build the pass manager.
    ///
    /// Fails if any pass rejects its settings.
    pub fn build(self) -> MitigationResult<PassManager> {
        let mut pm = PassManager::new();

        if let Some(folding) = self.folding {
            pm.add_pass(LocalFolding::with_seed(
                folding.scale_factor,
                folding.gate,
                folding.seed,
            )?);
        }

        if let Some(twirling) = self.twirling {
            pm.add_pass(PauliTwirling::with_seed(twirling.gate, twirling.seed)?);
        }

        Ok(pm)
    }
}
