// src/core/operator.rs

use super::constants::MAX_QUBITS;
use super::error::{QsimError, QsimResult};
use num_complex::Complex64;
use num_traits::{One, Zero};
use std::fmt;

/// A linear operator on `k` qubits: a `2^k x 2^k` complex matrix together with
/// a deferred scale factor `s`.
///
/// The operator the matrix stands for is `matrix / sqrt(s)`. Gates such as
/// Hadamard keep integer `±1` entries and carry `s = 2` instead of threading
/// `1/sqrt(2)` through every product; the factor is only resolved when a state
/// is read out or sampled.
///
/// Rows and columns are computational-basis indices in which bit `i` holds the
/// value of qubit `i` (qubit 0 is the least-significant bit). The matrix is
/// stored row-major and never mutated after construction; composition returns
/// a new `Operator`.
#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    qubits: usize,
    dim: usize,
    matrix: Vec<Complex64>,
    scale: f64,
}

impl Operator {
    /// The identity on `qubits` qubits. `Operator::identity(0)` is the 1x1
    /// matrix `[1]`, the neutral element of [`Operator::tensor`].
    ///
    /// # Errors
    /// `RegisterTooLarge` if `qubits` exceeds [`MAX_QUBITS`].
    pub fn identity(qubits: usize) -> QsimResult<Self> {
        check_width(qubits)?;
        Ok(Self::unit(qubits))
    }

    /// The all-zero matrix on `qubits` qubits, with unit scale.
    ///
    /// # Errors
    /// `RegisterTooLarge` if `qubits` exceeds [`MAX_QUBITS`].
    pub fn zero(qubits: usize) -> QsimResult<Self> {
        check_width(qubits)?;
        Ok(Self::blank(qubits))
    }

    /// Unchecked identity for widths already bounded by a `Circuit` or a gate.
    pub(crate) fn unit(qubits: usize) -> Self {
        let mut op = Self::blank(qubits);
        for i in 0..op.dim {
            op.matrix[i * op.dim + i] = Complex64::one();
        }
        op
    }

    fn blank(qubits: usize) -> Self {
        let dim = 1usize << qubits;
        Self {
            qubits,
            dim,
            matrix: vec![Complex64::zero(); dim * dim],
            scale: 1.0,
        }
    }

    /// Builds an operator from a row-major matrix and a deferred scale factor.
    ///
    /// # Errors
    /// * `RegisterTooLarge` if `qubits` exceeds [`MAX_QUBITS`].
    /// * `InvalidGate` if the matrix is not `2^qubits` square or the scale is
    ///   not a positive finite number.
    pub fn from_matrix(qubits: usize, matrix: Vec<Complex64>, scale: f64) -> QsimResult<Self> {
        check_width(qubits)?;
        let dim = 1usize << qubits;
        if matrix.len() != dim * dim {
            return Err(QsimError::InvalidGate {
                message: format!(
                    "a {}-qubit operator needs {} entries, got {}",
                    qubits,
                    dim * dim,
                    matrix.len()
                ),
            });
        }
        if !(scale.is_finite() && scale > 0.0) {
            return Err(QsimError::InvalidGate {
                message: format!("scale factor must be positive and finite, got {}", scale),
            });
        }
        Ok(Self { qubits, dim, matrix, scale })
    }

    fn single(entries: [[Complex64; 2]; 2], scale: f64) -> Self {
        Self {
            qubits: 1,
            dim: 2,
            matrix: vec![entries[0][0], entries[0][1], entries[1][0], entries[1][1]],
            scale,
        }
    }

    /// Pauli-X (bit flip).
    pub fn pauli_x() -> Self {
        let (o, l) = (Complex64::zero(), Complex64::one());
        Self::single([[o, l], [l, o]], 1.0)
    }

    /// Pauli-Y.
    pub fn pauli_y() -> Self {
        let (o, i) = (Complex64::zero(), Complex64::i());
        Self::single([[o, -i], [i, o]], 1.0)
    }

    /// Pauli-Z (phase flip).
    pub fn pauli_z() -> Self {
        let (o, l) = (Complex64::zero(), Complex64::one());
        Self::single([[l, o], [o, -l]], 1.0)
    }

    /// Hadamard, kept as `[[1, 1], [1, -1]]` with a deferred scale of 2.
    pub fn hadamard() -> Self {
        let l = Complex64::one();
        Self::single([[l, l], [l, -l]], 2.0)
    }

    /// `RX(theta) = exp(-i theta X / 2)`.
    pub fn rotation_x(theta: f64) -> Self {
        let (s, c) = (theta / 2.0).sin_cos();
        let diag = Complex64::new(c, 0.0);
        let off = Complex64::new(0.0, -s);
        Self::single([[diag, off], [off, diag]], 1.0)
    }

    /// `RY(theta) = exp(-i theta Y / 2)`.
    pub fn rotation_y(theta: f64) -> Self {
        let (s, c) = (theta / 2.0).sin_cos();
        Self::single(
            [
                [Complex64::new(c, 0.0), Complex64::new(-s, 0.0)],
                [Complex64::new(s, 0.0), Complex64::new(c, 0.0)],
            ],
            1.0,
        )
    }

    /// `RZ(theta) = exp(-i theta Z / 2)`.
    pub fn rotation_z(theta: f64) -> Self {
        let (s, c) = (theta / 2.0).sin_cos();
        let o = Complex64::zero();
        Self::single([[Complex64::new(c, -s), o], [o, Complex64::new(c, s)]], 1.0)
    }

    /// Builds a multi-controlled gate directly at working width `width`.
    ///
    /// Every basis index `m` whose bits cover `control_mask` has the target bit
    /// (the single bit of `target_mask`) transformed by `base`; all other rows
    /// are the identity. CX, CCX, CRZ and friends are all this one
    /// construction with different masks and base gates.
    ///
    /// # Errors
    /// * `RegisterTooLarge` if `width` exceeds [`MAX_QUBITS`].
    /// * `DimensionMismatch` if `base` is not a single-qubit operator.
    /// * `InvalidGate` if `base` carries a non-unit scale or `target_mask` does
    ///   not have exactly one bit set.
    /// * `QubitOutOfRange` if either mask has bits at or above `width`.
    /// * `ControlTargetConflict` if the target bit is also a control bit.
    pub fn controlled(
        width: usize,
        control_mask: usize,
        target_mask: usize,
        base: &Operator,
    ) -> QsimResult<Self> {
        check_width(width)?;
        if base.qubits != 1 {
            return Err(QsimError::DimensionMismatch { expected: 1, found: base.qubits });
        }
        // Identity rows are implicitly unit scale, so the base must be too.
        if base.scale != 1.0 {
            return Err(QsimError::InvalidGate {
                message: format!("controlled base gate must have unit scale, got {}", base.scale),
            });
        }
        if target_mask.count_ones() != 1 {
            return Err(QsimError::InvalidGate {
                message: format!("target mask {:#b} must select exactly one qubit", target_mask),
            });
        }
        let dim = 1usize << width;
        let outside = (control_mask | target_mask) & !(dim - 1);
        if outside != 0 {
            let highest = (usize::BITS - 1 - outside.leading_zeros()) as usize;
            return Err(QsimError::QubitOutOfRange { qubit: highest, qubits: width });
        }
        if control_mask & target_mask != 0 {
            return Err(QsimError::ControlTargetConflict {
                qubit: target_mask.trailing_zeros() as usize,
            });
        }

        let mut op = Self::blank(width);
        for m in 0..dim {
            let row = m * dim;
            if m & control_mask == control_mask {
                let bit = usize::from(m & target_mask != 0);
                op.matrix[row + m] = base.entry(bit, bit);
                op.matrix[row + (m ^ target_mask)] = base.entry(bit, bit ^ 1);
            } else {
                op.matrix[row + m] = Complex64::one();
            }
        }
        Ok(op)
    }

    /// Sequential composition: the operator that applies `self` and then `next`,
    /// i.e. the matrix product `next * self`. Scale factors multiply.
    ///
    /// # Errors
    /// `DimensionMismatch` if the qubit counts differ.
    pub fn then(&self, next: &Operator) -> QsimResult<Operator> {
        if self.qubits != next.qubits {
            return Err(QsimError::DimensionMismatch {
                expected: self.qubits,
                found: next.qubits,
            });
        }
        let dim = self.dim;
        let mut matrix = vec![Complex64::zero(); dim * dim];
        for row in 0..dim {
            let out = &mut matrix[row * dim..(row + 1) * dim];
            for k in 0..dim {
                let a = next.matrix[row * dim + k];
                if a.is_zero() {
                    continue;
                }
                let rhs = &self.matrix[k * dim..(k + 1) * dim];
                for (o, b) in out.iter_mut().zip(rhs) {
                    *o += a * b;
                }
            }
        }
        Ok(Operator {
            qubits: self.qubits,
            dim,
            matrix,
            scale: self.scale * next.scale,
        })
    }

    /// Parallel composition (Kronecker product) of operators on disjoint qubit
    /// ranges. `self` occupies the high-order qubits of the result and `low`
    /// the low-order ones.
    ///
    /// # Errors
    /// `RegisterTooLarge` if the combined width exceeds [`MAX_QUBITS`].
    pub fn tensor(&self, low: &Operator) -> QsimResult<Operator> {
        let qubits = self.qubits + low.qubits;
        check_width(qubits)?;
        let dim = self.dim * low.dim;
        let shift = low.qubits;
        let low_mask = low.dim - 1;
        let mut matrix = Vec::with_capacity(dim * dim);
        for row in 0..dim {
            for col in 0..dim {
                let high = self.entry(row >> shift, col >> shift);
                matrix.push(high * low.entry(row & low_mask, col & low_mask));
            }
        }
        Ok(Operator {
            qubits,
            dim,
            matrix,
            scale: self.scale * low.scale,
        })
    }

    /// Number of qubits the operator acts on.
    pub fn qubit_count(&self) -> usize {
        self.qubits
    }

    /// Matrix dimension, `2^qubit_count`.
    pub fn dimension(&self) -> usize {
        self.dim
    }

    /// Deferred scale factor.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Raw matrix entry, before the scale factor is applied.
    #[inline]
    pub fn entry(&self, row: usize, col: usize) -> Complex64 {
        self.matrix[row * self.dim + col]
    }

    /// Matrix entry of the operator this value stands for (`entry / sqrt(scale)`).
    pub fn normalized_entry(&self, row: usize, col: usize) -> Complex64 {
        self.entry(row, col) / self.scale.sqrt()
    }

    /// Raw row-major matrix.
    pub fn matrix(&self) -> &[Complex64] {
        &self.matrix
    }
}

fn check_width(qubits: usize) -> QsimResult<()> {
    if qubits > MAX_QUBITS {
        return Err(QsimError::RegisterTooLarge { qubits, max: MAX_QUBITS });
    }
    Ok(())
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Operator[{} qubits, scale {}]", self.qubits, self.scale)?;
        for row in 0..self.dim {
            write!(f, "  [")?;
            for col in 0..self.dim {
                let sep = if col > 0 { ", " } else { "" };
                write!(f, "{}{:.4}", sep, self.normalized_entry(row, col))?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}
