//! Dense unitary construction for small circuits.

#![allow(dead_code)]

use num_complex::Complex64;
use qem_ir::{CircuitDag, GateMatrix, Instruction};

/// Row-major dense matrix of dimension `2^n`.
pub struct Dense {
    pub dim: usize,
    pub data: Vec<Complex64>,
}

impl Dense {
    fn identity(dim: usize) -> Self {
        let mut data = vec![Complex64::new(0.0, 0.0); dim * dim];
        for i in 0..dim {
            data[i * dim + i] = Complex64::new(1.0, 0.0);
        }
        Self { dim, data }
    }

    /// Largest element-wise deviation from `other`.
    pub fn max_deviation(&self, other: &Self) -> f64 {
        assert_eq!(self.dim, other.dim);
        self.data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| (a - b).norm())
            .fold(0.0, f64::max)
    }
}

/// Index into a gate matrix from the bits of a full basis index.
fn local_index(index: usize, qubits: &[usize]) -> usize {
    qubits
        .iter()
        .enumerate()
        .map(|(k, &q)| ((index >> q) & 1) << k)
        .sum()
}

fn gate_element(inst: &Instruction, row: usize, col: usize) -> Complex64 {
    let gate = inst.as_gate().expect("only gates are supported");
    match gate.matrix() {
        GateMatrix::One(m) => m.data[row * 2 + col],
        GateMatrix::Two(m) => m.get(row, col),
    }
}

/// Left-multiply `acc` by the full operator of `inst`.
fn apply(acc: &Dense, inst: &Instruction) -> Dense {
    let qubits: Vec<usize> = inst.qubits.iter().map(|q| q.0 as usize).collect();
    let mask: usize = qubits.iter().map(|&q| 1 << q).sum();
    let dim = acc.dim;
    let mut out = vec![Complex64::new(0.0, 0.0); dim * dim];

    for row in 0..dim {
        for k in 0..dim {
            if row & !mask != k & !mask {
                continue;
            }
            let g = gate_element(inst, local_index(row, &qubits), local_index(k, &qubits));
            if g == Complex64::new(0.0, 0.0) {
                continue;
            }
            for col in 0..dim {
                out[row * dim + col] += g * acc.data[k * dim + col];
            }
        }
    }
    Dense { dim, data: out }
}

/// Unitary of the whole circuit, global phase included.
pub fn circuit_unitary(dag: &CircuitDag) -> Dense {
    let n = dag.num_qubits();
    assert!(n <= 3, "dense check is limited to 3 qubits");
    let mut acc = Dense::identity(1 << n);
    for (_, inst) in dag.topological_ops() {
        if inst.is_gate() {
            acc = apply(&acc, inst);
        }
    }
    let phase = Complex64::from_polar(1.0, dag.global_phase());
    for v in &mut acc.data {
        *v *= phase;
    }
    acc
}
