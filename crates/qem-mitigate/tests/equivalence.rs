//! End-to-end checks that mitigation passes preserve the circuit unitary.

mod common;

use common::circuit_unitary;
use qem_ir::{Circuit, CircuitDag, QubitId, StandardGate};
use qem_mitigate::{
    FoldingReport, LocalFolding, MitigationError, Pass, PassManagerBuilder, PauliTwirling,
    PropertySet, TwirlingReport,
};

const TOL: f64 = 1e-9;

fn mixed_circuit(gate: StandardGate) -> CircuitDag {
    let mut circuit = Circuit::with_size("mixed", 3, 0);
    circuit.h(QubitId(0)).unwrap();
    circuit.gate(gate, [QubitId(0), QubitId(1)]).unwrap();
    circuit.t(QubitId(1)).unwrap();
    circuit.gate(gate, [QubitId(1), QubitId(2)]).unwrap();
    circuit.sx(QubitId(2)).unwrap();
    circuit.gate(gate, [QubitId(2), QubitId(0)]).unwrap();
    circuit.s(QubitId(0)).unwrap();
    circuit.gate(gate, [QubitId(0), QubitId(1)]).unwrap();
    circuit.into_dag()
}

fn assert_same_unitary(a: &CircuitDag, b: &CircuitDag) {
    let deviation = circuit_unitary(a).max_deviation(&circuit_unitary(b));
    assert!(deviation < TOL, "unitaries differ by {deviation}");
}

#[test]
fn twirling_preserves_unitary_for_every_gate() {
    for gate in [StandardGate::CX, StandardGate::CZ, StandardGate::ECR] {
        for seed in 0..8 {
            let original = mixed_circuit(gate);
            let mut twirled = original.clone();
            PauliTwirling::with_seed(gate, Some(seed))
                .unwrap()
                .run(&mut twirled, &mut PropertySet::new())
                .unwrap();

            assert_eq!(twirled.num_ops(), original.num_ops() + 4 * 4);
            assert_same_unitary(&original, &twirled);
        }
    }
}

#[test]
fn folding_preserves_unitary() {
    for (scale, seed) in [(1.5, 1), (2.0, 2), (3.0, 3), (4.2, 4), (5.0, 5)] {
        let original = mixed_circuit(StandardGate::ECR);
        let mut folded = original.clone();
        LocalFolding::with_seed(scale, StandardGate::ECR, Some(seed))
            .unwrap()
            .run(&mut folded, &mut PropertySet::new())
            .unwrap();
        assert_same_unitary(&original, &folded);
    }
}

#[test]
fn fold_then_twirl_preserves_unitary() {
    let original = mixed_circuit(StandardGate::CX);
    let mut dag = original.clone();
    let pm = PassManagerBuilder::new()
        .with_folding(2.0, StandardGate::CX)
        .with_folding_seed(17)
        .with_twirling(StandardGate::CX, Some(17))
        .build()
        .unwrap();
    let mut props = PropertySet::new();
    pm.run(&mut dag, &mut props).unwrap();

    let folding = props.get::<FoldingReport>().unwrap();
    let twirling = props.get::<TwirlingReport>().unwrap();
    assert_eq!(folding.num_folded, 2);
    assert_eq!(twirling.num_twirled, 4 + 2 * 2);
    assert!((twirling.phase_added - dag.global_phase()).abs() < 1e-12);
    assert_same_unitary(&original, &dag);
}

#[test]
fn four_cx_at_scale_five_fold_completely() {
    let mut circuit = Circuit::with_size("four", 2, 0);
    for _ in 0..2 {
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(1), QubitId(0)).unwrap();
    }
    let mut dag = circuit.into_dag();
    let mut props = PropertySet::new();

    LocalFolding::with_seed(5.0, StandardGate::CX, Some(2024))
        .unwrap()
        .run(&mut dag, &mut props)
        .unwrap();

    let report = props.get::<FoldingReport>().unwrap();
    assert_eq!(report.odd_fold_factor, 5);
    assert_eq!(report.num_target_gates, 4);
    assert_eq!(report.num_folded, 4);
    assert_eq!(dag.count_gate(StandardGate::CX), 20);

    // No occurrence is left single: every run of CX has length 5 or a multiple.
    for run in dag.collect_runs(StandardGate::CX) {
        assert_eq!(run.len() % 5, 0);
    }
}

#[test]
fn folding_scale_one_leaves_dag_untouched() {
    let original = mixed_circuit(StandardGate::CZ);
    let mut dag = original.clone();
    LocalFolding::new(1.0, StandardGate::CZ)
        .unwrap()
        .run(&mut dag, &mut PropertySet::new())
        .unwrap();
    assert_eq!(dag.instructions(), original.instructions());
    assert_eq!(dag.num_ops(), original.num_ops());
    assert_eq!(dag.global_phase(), original.global_phase());
}

#[test]
fn folding_absent_gate_is_an_error() {
    let mut dag = mixed_circuit(StandardGate::CZ);
    let err = LocalFolding::new(3.0, StandardGate::CX)
        .unwrap()
        .run(&mut dag, &mut PropertySet::new())
        .unwrap_err();
    assert!(matches!(err, MitigationError::GateNotFound(StandardGate::CX)));
}
