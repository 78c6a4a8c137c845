//! Pass trait and types for mitigation passes.

use qem_ir::CircuitDag;

use crate::error::MitigationResult;
use crate::property::PropertySet;

/// The kind of pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// Analysis pass that reads but does not modify the DAG.
    Analysis,
    /// Transformation pass that modifies the DAG.
    Transformation,
}

/// A pass that operates on a circuit DAG.
///
/// Passes take `&self`, so any state that changes between runs (such as a
/// random number stream) must live behind interior mutability.
pub trait Pass: Send + Sync {
    /// Get the name of this pass.
    fn name(&self) -> &str;

    /// Get the kind of this pass.
    fn kind(&self) -> PassKind;

    /// Run the pass on the given DAG.
    ///
    /// On error the DAG may have been partially rewritten and must not be
    /// reused.
    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> MitigationResult<()>;

    /// Check if this pass should run based on current state.
    fn should_run(&self, _dag: &CircuitDag, _properties: &PropertySet) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestPass;

    impl Pass for TestPass {
        fn name(&self) -> &'static str {
            "test"
        }

        fn kind(&self) -> PassKind {
            PassKind::Analysis
        }

        fn run(&self, _dag: &mut CircuitDag, _properties: &mut PropertySet) -> MitigationResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_pass_kind() {
        let pass = TestPass;
        assert_eq!(pass.kind(), PassKind::Analysis);
        assert_eq!(pass.name(), "test");
        assert!(pass.should_run(&CircuitDag::new(), &PropertySet::new()));
    }
}
