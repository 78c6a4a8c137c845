//! Property-based tests for the mitigation passes on random circuits.

mod common;

use common::circuit_unitary;
use proptest::prelude::*;
use qem_ir::{Circuit, QubitId, StandardGate};
use qem_mitigate::{FoldingReport, LocalFolding, Pass, PauliTwirling, PropertySet};

#[derive(Debug, Clone)]
enum GateOp {
    One(StandardGate, u32),
    Two(StandardGate, u32, u32),
}

fn arb_gate_op(num_qubits: u32) -> impl Strategy<Value = GateOp> {
    let one = prop::sample::select(vec![
        StandardGate::H,
        StandardGate::S,
        StandardGate::T,
        StandardGate::SX,
        StandardGate::X,
    ]);
    let two = prop::sample::select(vec![StandardGate::CX, StandardGate::CZ, StandardGate::ECR]);
    prop_oneof![
        (one, 0..num_qubits).prop_map(|(g, q)| GateOp::One(g, q)),
        (two, 0..num_qubits, 1..num_qubits)
            .prop_map(move |(g, a, off)| GateOp::Two(g, a, (a + off) % num_qubits)),
    ]
}

/// Circuits over 2-3 qubits with 1-25 gates.
fn arb_circuit() -> impl Strategy<Value = Circuit> {
    (2_u32..=3).prop_flat_map(|num_qubits| {
        prop::collection::vec(arb_gate_op(num_qubits), 1..=25).prop_map(move |ops| {
            let mut circuit = Circuit::with_size("prop", num_qubits, 0);
            for op in ops {
                let applied = match op {
                    GateOp::One(g, q) => circuit.gate(g, [QubitId(q)]).map(|_| ()),
                    GateOp::Two(g, a, b) => circuit.gate(g, [QubitId(a), QubitId(b)]).map(|_| ()),
                };
                applied.unwrap();
            }
            circuit
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn twirling_expands_each_occurrence_fivefold(
        circuit in arb_circuit(),
        gate in prop::sample::select(vec![StandardGate::CX, StandardGate::CZ, StandardGate::ECR]),
        seed: u32,
    ) {
        let mut dag = circuit.into_dag();
        let ops_before = dag.num_ops();
        let count = dag.count_gate(gate);
        let before = circuit_unitary(&dag);

        PauliTwirling::with_seed(gate, Some(seed))
            .unwrap()
            .run(&mut dag, &mut PropertySet::new())
            .unwrap();

        dag.verify_integrity().unwrap();
        prop_assert_eq!(dag.count_gate(gate), count);
        prop_assert_eq!(dag.num_ops(), ops_before + 4 * count);
        prop_assert!(circuit_unitary(&dag).max_deviation(&before) < 1e-9);
    }

    #[test]
    fn folding_adds_expected_gate_count(
        circuit in arb_circuit(),
        scale in prop::sample::select(vec![1.0, 1.3, 2.0, 2.7, 3.0, 4.5, 5.0, 6.1]),
        seed: u32,
    ) {
        let mut dag = circuit.into_dag();
        let count = dag.count_gate(StandardGate::CX);
        prop_assume!(count > 0);
        let before = circuit_unitary(&dag);
        let mut props = PropertySet::new();

        LocalFolding::with_seed(scale, StandardGate::CX, Some(seed))
            .unwrap()
            .run(&mut dag, &mut props)
            .unwrap();

        dag.verify_integrity().unwrap();
        let added = match props.get::<FoldingReport>() {
            Some(report) => {
                prop_assert!(report.num_folded <= count);
                report.num_folded * (report.odd_fold_factor - 1)
            }
            None => 0,
        };
        prop_assert_eq!(dag.count_gate(StandardGate::CX), count + added);
        prop_assert!(circuit_unitary(&dag).max_deviation(&before) < 1e-9);
    }

    #[test]
    fn seeded_twirling_is_reproducible(circuit in arb_circuit(), seed: u32) {
        let run = |circuit: &Circuit| {
            let mut dag = circuit.dag().clone();
            PauliTwirling::with_seed(StandardGate::CX, Some(seed))
                .unwrap()
                .run(&mut dag, &mut PropertySet::new())
                .unwrap();
            (dag.instructions(), dag.global_phase().to_bits())
        };
        prop_assert_eq!(run(&circuit), run(&circuit));
    }
}
