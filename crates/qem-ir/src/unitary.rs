//! Unitary matrices for one- and two-qubit gates.
//!
//! Two-qubit matrices use little-endian qubit ordering: the first operand of a
//! gate is the least significant bit of the basis index. Applying `a` to the
//! first operand and `b` to the second is therefore `Unitary4x4::kron(&b, &a)`.

use num_complex::Complex64;
use std::f64::consts::{FRAC_1_SQRT_2, PI};

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const M_ONE: Complex64 = Complex64::new(-1.0, 0.0);
const IM: Complex64 = Complex64::new(0.0, 1.0);
const M_IM: Complex64 = Complex64::new(0.0, -1.0);

/// A 2x2 unitary matrix in row-major order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unitary2x2 {
    /// The matrix elements in row-major order: [[a, b], [c, d]].
    pub data: [Complex64; 4],
}

impl Unitary2x2 {
    /// Create a new 2x2 matrix.
    pub const fn new(a: Complex64, b: Complex64, c: Complex64, d: Complex64) -> Self {
        Self { data: [a, b, c, d] }
    }

    /// Create the identity matrix.
    pub const fn identity() -> Self {
        Self::new(ONE, ZERO, ZERO, ONE)
    }

    /// Create a Pauli-X matrix.
    pub const fn x() -> Self {
        Self::new(ZERO, ONE, ONE, ZERO)
    }

    /// Create a Pauli-Y matrix.
    pub const fn y() -> Self {
        Self::new(ZERO, M_IM, IM, ZERO)
    }

    /// Create a Pauli-Z matrix.
    pub const fn z() -> Self {
        Self::new(ONE, ZERO, ZERO, M_ONE)
    }

    /// Create a Hadamard matrix.
    pub fn h() -> Self {
        let s = Complex64::new(FRAC_1_SQRT_2, 0.0);
        Self::new(s, s, s, -s)
    }

    /// Create an S gate (sqrt(Z)).
    pub const fn s() -> Self {
        Self::new(ONE, ZERO, ZERO, IM)
    }

    /// Create an S-dagger gate.
    pub const fn sdg() -> Self {
        Self::new(ONE, ZERO, ZERO, M_IM)
    }

    /// Create a T gate (fourth root of Z).
    pub fn t() -> Self {
        Self::new(ONE, ZERO, ZERO, Complex64::from_polar(1.0, PI / 4.0))
    }

    /// Create a T-dagger gate.
    pub fn tdg() -> Self {
        Self::new(ONE, ZERO, ZERO, Complex64::from_polar(1.0, -PI / 4.0))
    }

    /// Create an SX gate (sqrt(X)).
    pub fn sx() -> Self {
        let p = Complex64::new(0.5, 0.5);
        let m = Complex64::new(0.5, -0.5);
        Self::new(p, m, m, p)
    }

    /// Multiply this matrix by another: self * other.
    #[allow(clippy::many_single_char_names)]
    pub fn mul(&self, other: &Self) -> Self {
        let [a, b, c, d] = self.data;
        let [e, f, g, h] = other.data;
        Self::new(a * e + b * g, a * f + b * h, c * e + d * g, c * f + d * h)
    }

    /// Get the conjugate transpose (dagger).
    pub fn dagger(&self) -> Self {
        Self::new(
            self.data[0].conj(),
            self.data[2].conj(),
            self.data[1].conj(),
            self.data[3].conj(),
        )
    }

    /// Check element-wise equality within `tolerance`.
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.data
            .iter()
            .zip(other.data.iter())
            .all(|(a, b)| (a - b).norm() <= tolerance)
    }
}

impl Default for Unitary2x2 {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::ops::Mul for Unitary2x2 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Unitary2x2::mul(&self, &rhs)
    }
}

/// A 4x4 unitary matrix in row-major order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unitary4x4 {
    /// The matrix elements in row-major order.
    pub data: [Complex64; 16],
}

impl Unitary4x4 {
    /// Dimension of the matrix.
    pub const DIM: usize = 4;

    /// Create a matrix from its rows.
    pub const fn from_rows(rows: [[Complex64; 4]; 4]) -> Self {
        let [r0, r1, r2, r3] = rows;
        Self {
            data: [
                r0[0], r0[1], r0[2], r0[3], r1[0], r1[1], r1[2], r1[3], r2[0], r2[1], r2[2],
                r2[3], r3[0], r3[1], r3[2], r3[3],
            ],
        }
    }

    /// Create the identity matrix.
    pub const fn identity() -> Self {
        Self::from_rows([
            [ONE, ZERO, ZERO, ZERO],
            [ZERO, ONE, ZERO, ZERO],
            [ZERO, ZERO, ONE, ZERO],
            [ZERO, ZERO, ZERO, ONE],
        ])
    }

    /// Controlled-X with the first operand as control.
    pub const fn cx() -> Self {
        Self::from_rows([
            [ONE, ZERO, ZERO, ZERO],
            [ZERO, ZERO, ZERO, ONE],
            [ZERO, ZERO, ONE, ZERO],
            [ZERO, ONE, ZERO, ZERO],
        ])
    }

    /// Controlled-Z.
    pub const fn cz() -> Self {
        Self::from_rows([
            [ONE, ZERO, ZERO, ZERO],
            [ZERO, ONE, ZERO, ZERO],
            [ZERO, ZERO, ONE, ZERO],
            [ZERO, ZERO, ZERO, M_ONE],
        ])
    }

    /// Echoed cross-resonance gate.
    pub const fn ecr() -> Self {
        let r = Complex64::new(FRAC_1_SQRT_2, 0.0);
        let i = Complex64::new(0.0, FRAC_1_SQRT_2);
        let mi = Complex64::new(0.0, -FRAC_1_SQRT_2);
        Self::from_rows([
            [ZERO, r, ZERO, i],
            [r, ZERO, mi, ZERO],
            [ZERO, i, ZERO, r],
            [mi, ZERO, r, ZERO],
        ])
    }

    /// SWAP.
    pub const fn swap() -> Self {
        Self::from_rows([
            [ONE, ZERO, ZERO, ZERO],
            [ZERO, ZERO, ONE, ZERO],
            [ZERO, ONE, ZERO, ZERO],
            [ZERO, ZERO, ZERO, ONE],
        ])
    }

    /// Kronecker product `high ⊗ low`.
    ///
    /// `low` acts on the first operand (least significant bit), `high` on the
    /// second.
    pub fn kron(high: &Unitary2x2, low: &Unitary2x2) -> Self {
        let mut data = [ZERO; 16];
        for row in 0..4 {
            for col in 0..4 {
                let h = high.data[(row >> 1) * 2 + (col >> 1)];
                let l = low.data[(row & 1) * 2 + (col & 1)];
                data[row * 4 + col] = h * l;
            }
        }
        Self { data }
    }

    /// Element at (`row`, `col`).
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.data[row * 4 + col]
    }

    /// Multiply this matrix by another: self * other.
    pub fn mul(&self, other: &Self) -> Self {
        let mut data = [ZERO; 16];
        for row in 0..4 {
            for col in 0..4 {
                let mut acc = ZERO;
                for k in 0..4 {
                    acc += self.get(row, k) * other.get(k, col);
                }
                data[row * 4 + col] = acc;
            }
        }
        Self { data }
    }

    /// Multiply every element by `factor`.
    pub fn scale(&self, factor: Complex64) -> Self {
        let mut data = self.data;
        for v in &mut data {
            *v *= factor;
        }
        Self { data }
    }

    /// Frobenius norm of `self - other`.
    pub fn frobenius_distance(&self, other: &Self) -> f64 {
        self.data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| (a - b).norm_sqr())
            .sum::<f64>()
            .sqrt()
    }

    /// Largest element-wise deviation from `other`.
    pub fn max_deviation(&self, other: &Self) -> f64 {
        self.data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| (a - b).norm())
            .fold(0.0, f64::max)
    }

    /// Check element-wise equality within `tolerance`.
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.max_deviation(other) <= tolerance
    }
}

impl Default for Unitary4x4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::ops::Mul for Unitary4x4 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Unitary4x4::mul(&self, &rhs)
    }
}

impl std::ops::Neg for Unitary4x4 {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.scale(M_ONE)
    }
}
