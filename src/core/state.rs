// src/core/state.rs

use super::constants::MAX_QUBITS;
use super::error::{QsimError, QsimResult};
use super::operator::Operator;
use num_complex::Complex64;
use num_traits::{One, Zero};
use rand::Rng;
use std::fmt;
use tracing::debug;

/// Dense state vector of an `n`-qubit register.
///
/// Like [`Operator`], the amplitudes carry a deferred scale factor: the state
/// they stand for is `amplitudes / sqrt(scale)`. Applying a gate multiplies the
/// scale, measurement resets it to the weight of the surviving amplitudes, and
/// the division only happens when the caller reads the state out.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    qubits: usize,
    amplitudes: Vec<Complex64>,
    scale: f64,
}

impl State {
    /// Creates the basis state `|0...0>` on `qubits` qubits.
    ///
    /// # Errors
    /// `RegisterTooLarge` if `qubits` exceeds [`MAX_QUBITS`].
    pub fn new(qubits: usize) -> QsimResult<Self> {
        if qubits > MAX_QUBITS {
            return Err(QsimError::RegisterTooLarge { qubits, max: MAX_QUBITS });
        }
        let mut amplitudes = vec![Complex64::zero(); 1usize << qubits];
        amplitudes[0] = Complex64::one();
        Ok(Self {
            qubits,
            amplitudes,
            scale: 1.0,
        })
    }

    /// Wraps an arbitrary, not necessarily normalized, amplitude vector.
    ///
    /// The vector length must be a power of two; its squared norm becomes the
    /// deferred scale factor, so `[1, 1]` is the `|+>` state.
    ///
    /// # Errors
    /// * `InvalidGate` if the length is not a power of two.
    /// * `RegisterTooLarge` if the implied width exceeds [`MAX_QUBITS`].
    /// * `ZeroNorm` if every amplitude is zero.
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> QsimResult<Self> {
        if !amplitudes.len().is_power_of_two() {
            return Err(QsimError::InvalidGate {
                message: format!("state vector length {} is not a power of two", amplitudes.len()),
            });
        }
        let qubits = amplitudes.len().trailing_zeros() as usize;
        if qubits > MAX_QUBITS {
            return Err(QsimError::RegisterTooLarge { qubits, max: MAX_QUBITS });
        }
        let scale: f64 = amplitudes.iter().map(|a| a.norm_sqr()).sum();
        if scale <= 0.0 || !scale.is_finite() {
            return Err(QsimError::ZeroNorm);
        }
        Ok(Self {
            qubits,
            amplitudes,
            scale,
        })
    }

    /// Number of qubits in the register.
    pub fn qubit_count(&self) -> usize {
        self.qubits
    }

    /// Length of the amplitude vector, `2^qubit_count`.
    pub fn dimension(&self) -> usize {
        self.amplitudes.len()
    }

    /// Deferred scale factor.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Amplitudes before the scale factor is resolved.
    pub fn raw_amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Normalized amplitudes. The scale factor is divided out here and nowhere
    /// else.
    pub fn amplitudes(&self) -> Vec<Complex64> {
        let norm = self.scale.sqrt();
        self.amplitudes.iter().map(|a| *a / norm).collect()
    }

    /// Outcome probability of every basis index.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr() / self.scale).collect()
    }

    /// Left-multiplies the state by `op` in place.
    ///
    /// # Errors
    /// `DimensionMismatch` if `op` acts on a different number of qubits.
    pub fn apply(&mut self, op: &Operator) -> QsimResult<()> {
        if op.qubit_count() != self.qubits {
            return Err(QsimError::DimensionMismatch {
                expected: self.qubits,
                found: op.qubit_count(),
            });
        }
        let dim = self.amplitudes.len();
        let matrix = op.matrix();
        let next: Vec<Complex64> = (0..dim)
            .map(|row| {
                matrix[row * dim..(row + 1) * dim]
                    .iter()
                    .zip(&self.amplitudes)
                    .map(|(m, a)| m * a)
                    .sum::<Complex64>()
            })
            .collect();
        self.amplitudes = next;
        self.scale *= op.scale();
        Ok(())
    }

    /// Measures one qubit using the thread-local RNG, collapsing the state.
    pub fn measure(&mut self, qubit: usize) -> QsimResult<bool> {
        self.measure_with(qubit, &mut rand::rng())
    }

    /// Measures one qubit with a caller-supplied RNG, collapsing the state.
    pub fn measure_with<R: Rng>(&mut self, qubit: usize, rng: &mut R) -> QsimResult<bool> {
        let bits = self.measure_many_with(&[qubit], rng)?;
        Ok(bits[0])
    }

    /// Measures several qubits jointly using the thread-local RNG.
    pub fn measure_many(&mut self, qubits: &[usize]) -> QsimResult<Vec<bool>> {
        self.measure_many_with(qubits, &mut rand::rng())
    }

    /// Measures several qubits jointly, returning one bit per requested qubit in
    /// request order.
    ///
    /// One basis index is sampled with weight `|a|^2` against a uniform draw from
    /// `[0, scale)`, so no normalization pass is needed first. Amplitudes that
    /// disagree with the sampled bits on the measured qubits are zeroed, and the
    /// scale becomes the total weight of the survivors.
    ///
    /// # Errors
    /// * `QubitOutOfRange` if any requested qubit is outside the register.
    /// * `ZeroNorm` if the state has no weight to sample from.
    pub fn measure_many_with<R: Rng>(
        &mut self,
        qubits: &[usize],
        rng: &mut R,
    ) -> QsimResult<Vec<bool>> {
        let mut mask = 0usize;
        for &qubit in qubits {
            if qubit >= self.qubits {
                return Err(QsimError::QubitOutOfRange {
                    qubit,
                    qubits: self.qubits,
                });
            }
            mask |= 1 << qubit;
        }

        let sampled = self.sample_index(rng)?;
        let pattern = sampled & mask;

        let mut survivors = 0.0;
        for (index, amplitude) in self.amplitudes.iter_mut().enumerate() {
            if index & mask == pattern {
                survivors += amplitude.norm_sqr();
            } else {
                *amplitude = Complex64::zero();
            }
        }
        self.scale = survivors;

        let bits: Vec<bool> = qubits.iter().map(|&q| sampled & (1 << q) != 0).collect();
        debug!(?qubits, ?bits, scale = self.scale, "measured");
        Ok(bits)
    }

    fn sample_index<R: Rng>(&self, rng: &mut R) -> QsimResult<usize> {
        let target = rng.random::<f64>() * self.scale;
        let mut cumulative = 0.0;
        let mut last_weighted = None;
        for (index, amplitude) in self.amplitudes.iter().enumerate() {
            let weight = amplitude.norm_sqr();
            if weight == 0.0 {
                continue;
            }
            cumulative += weight;
            last_weighted = Some(index);
            if target < cumulative {
                return Ok(index);
            }
        }
        // Rounding can leave `target` just past the accumulated weight.
        last_weighted.ok_or(QsimError::ZeroNorm)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "State[")?;
        for (i, c) in self.amplitudes().iter().enumerate() {
            write!(f, "{}{:.4}", if i > 0 { ", " } else { "" }, c)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};
    use std::f64::consts::FRAC_1_SQRT_2;

    const TOL: f64 = 1e-12;

    /// Always produces the largest possible draw, just below 1.
    struct TopOfRange;

    impl RngCore for TopOfRange {
        fn next_u32(&mut self) -> u32 {
            u32::MAX
        }

        fn next_u64(&mut self) -> u64 {
            u64::MAX
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(u8::MAX);
        }
    }

    #[test]
    fn new_state_is_all_zero_basis_state() {
        let state = State::new(3).unwrap();
        assert_eq!(state.dimension(), 8);
        assert_eq!(state.scale(), 1.0);
        let amps = state.amplitudes();
        assert_eq!(amps[0], Complex64::one());
        assert!(amps[1..].iter().all(|a| a.is_zero()));
    }

    #[test]
    fn new_rejects_oversized_register() {
        let err = State::new(MAX_QUBITS + 1).unwrap_err();
        assert!(matches!(err, QsimError::RegisterTooLarge { .. }));
    }

    #[test]
    fn from_amplitudes_defers_normalization() {
        let state = State::from_amplitudes(vec![Complex64::one(), Complex64::one()]).unwrap();
        assert_eq!(state.qubit_count(), 1);
        assert_eq!(state.scale(), 2.0);
        for a in state.amplitudes() {
            assert!((a.re - FRAC_1_SQRT_2).abs() < TOL);
        }
    }

    #[test]
    fn from_amplitudes_rejects_bad_input() {
        let err = State::from_amplitudes(vec![Complex64::one(); 3]).unwrap_err();
        assert!(matches!(err, QsimError::InvalidGate { .. }));
        let err = State::from_amplitudes(vec![Complex64::zero(); 2]).unwrap_err();
        assert_eq!(err, QsimError::ZeroNorm);
    }

    #[test]
    fn apply_multiplies_scales() {
        let mut state = State::new(1).unwrap();
        state.apply(&Operator::hadamard()).unwrap();
        assert_eq!(state.scale(), 2.0);
        assert_eq!(state.raw_amplitudes(), &[Complex64::one(), Complex64::one()]);
        let probs = state.probabilities();
        assert!((probs[0] - 0.5).abs() < TOL && (probs[1] - 0.5).abs() < TOL);
    }

    #[test]
    fn apply_rejects_wrong_width() {
        let mut state = State::new(2).unwrap();
        let err = state.apply(&Operator::pauli_x()).unwrap_err();
        assert_eq!(err, QsimError::DimensionMismatch { expected: 2, found: 1 });
        assert_eq!(state, State::new(2).unwrap());
    }

    #[test]
    fn measuring_basis_state_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut state = State::new(2).unwrap();
        state.apply(&Operator::pauli_x().tensor(&Operator::unit(1)).unwrap()).unwrap();
        for _ in 0..20 {
            assert_eq!(state.measure_many_with(&[1, 0], &mut rng).unwrap(), vec![true, false]);
        }
    }

    #[test]
    fn measurement_collapses_and_rescales() {
        // (|00> + |01> + |10> + |11>) unnormalized, scale 4
        let mut state = State::from_amplitudes(vec![Complex64::one(); 4]).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let bit = state.measure_with(0, &mut rng).unwrap();
        assert_eq!(state.scale(), 2.0);
        for (index, amplitude) in state.raw_amplitudes().iter().enumerate() {
            let agrees = (index & 1 != 0) == bit;
            assert_eq!(amplitude.is_zero(), !agrees, "index {}", index);
        }
        // Qubit 0 is now fixed.
        for _ in 0..10 {
            assert_eq!(state.measure_with(0, &mut rng).unwrap(), bit);
        }
    }

    #[test]
    fn measure_rejects_out_of_range_qubit() {
        let mut state = State::new(2).unwrap();
        let err = state.measure(2).unwrap_err();
        assert_eq!(err, QsimError::QubitOutOfRange { qubit: 2, qubits: 2 });
    }

    #[test]
    fn tiny_trailing_weight_can_be_sampled() {
        // |a1|^2 is about 1e-13 of the scale, yet a draw past |a0|^2 must land on it.
        let amplitudes = vec![Complex64::one(), Complex64::new(3.2e-7, 0.0)];
        let mut state = State::from_amplitudes(amplitudes).unwrap();
        assert!(state.scale() > 1.0);
        assert!(state.measure_with(0, &mut TopOfRange).unwrap());
        assert_eq!(state.raw_amplitudes()[0], Complex64::zero());
        assert!((state.probabilities()[1] - 1.0).abs() < TOL);
    }

    #[test]
    fn exactly_zero_weights_are_never_sampled() {
        // Only index 1 carries weight, so even the top draw lands there.
        let mut amplitudes = vec![Complex64::zero(); 4];
        amplitudes[1] = Complex64::one();
        let mut state = State::from_amplitudes(amplitudes).unwrap();
        let bits = state.measure_many_with(&[0, 1], &mut TopOfRange).unwrap();
        assert_eq!(bits, vec![true, false]);
    }

    #[test]
    fn zero_state_cannot_be_sampled() {
        let mut state = State::new(1).unwrap();
        state.apply(&Operator::zero(1).unwrap()).unwrap();
        assert_eq!(state.measure(0).unwrap_err(), QsimError::ZeroNorm);
    }
}
