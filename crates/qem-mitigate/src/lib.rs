//! QEM Error Mitigation Passes
//!
//! This crate rewrites circuits to mitigate hardware noise. It implements
//! two passes on the [`qem_ir::CircuitDag`]:
//!
//! 1. **Local folding**: replace a self-inverse gate by an odd number of
//!    copies, amplifying its noise for zero-noise extrapolation
//! 2. **Pauli twirling**: sandwich a two-qubit gate between random Paulis
//!    that cancel up to a global phase, turning coherent noise stochastic
//!
//! # Architecture
//!
//! ```text
//! Input Circuit
//!       │
//!       ▼
//! ┌─────────────┐
//! │ PassManager │ ◄── PropertySet (FoldingReport, TwirlingReport)
//! └─────────────┘
//!       │
//!       ├── LocalFolding
//!       └── PauliTwirling ◄── TwirlingSet (searched once per gate, cached)
//!       │
//!       ▼
//! Output Circuit (same action, global phase updated)
//! ```
//!
//! # Example
//!
//! ```rust
//! use qem_ir::{Circuit, QubitId, StandardGate};
//! use qem_mitigate::{PassManagerBuilder, PropertySet, TwirlingReport};
//!
//! let mut circuit = Circuit::with_size("bell", 2, 0);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! let pm = PassManagerBuilder::new()
//!     .with_folding(3.0, StandardGate::CX)
//!     .with_twirling(StandardGate::CX, Some(42))
//!     .build()
//!     .unwrap();
//!
//! let mut dag = circuit.into_dag();
//! let mut props = PropertySet::new();
//! pm.run(&mut dag, &mut props).unwrap();
//!
//! assert_eq!(dag.count_gate(StandardGate::CX), 3);
//! assert_eq!(props.get::<TwirlingReport>().unwrap().num_twirled, 3);
//! ```
//!
//! # Custom Passes
//!
//! ```rust
//! use qem_mitigate::{MitigationResult, Pass, PassKind, PropertySet};
//! use qem_ir::CircuitDag;
//!
//! struct CountOps;
//!
//! impl Pass for CountOps {
//!     fn name(&self) -> &str { "count_ops" }
//!     fn kind(&self) -> PassKind { PassKind::Analysis }
//!
//!     fn run(&self, dag: &mut CircuitDag, props: &mut PropertySet) -> MitigationResult<()> {
//!         props.insert(dag.num_ops());
//!         Ok(())
//!     }
//! }
//! ```

pub mod aggregate;
pub mod config;
pub mod error;
pub mod manager;
pub mod pass;
pub mod property;
pub mod twirl_set;

// Built-in passes
pub mod passes;

pub use aggregate::{Counts, aggregate_counts};
pub use config::{FoldingConfig, MitigationConfig, TwirlingConfig};
pub use error::{MitigationError, MitigationResult};
pub use manager::{PassManager, PassManagerBuilder};
pub use pass::{Pass, PassKind};
pub use passes::{FoldingReport, LocalFolding, PauliTwirling, TwirlingReport};
pub use property::PropertySet;
pub use twirl_set::{TWIRLABLE_GATES, TwirlEntry, TwirlingSet, twirling_set};
