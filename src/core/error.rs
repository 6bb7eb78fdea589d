//! Error handling logic

use thiserror::Error;

/// Errors raised by operator construction, circuit building, compilation
/// and state manipulation.
///
/// All errors are reported synchronously at the offending call. Nothing is
/// retried internally; a call that fails before mutating leaves its receiver
/// untouched.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum QsimError {
    /// A qubit index (or the edge of a qubit range) lies outside the register.
    #[error("qubit {qubit} is out of range for a {qubits}-qubit register")]
    QubitOutOfRange {
        /// The offending qubit index.
        qubit: usize,
        /// Width of the register the index was checked against.
        qubits: usize,
    },

    /// The same qubit was named as a control and as the target of one gate.
    #[error("qubit {qubit} cannot be both a control and the target of a gate")]
    ControlTargetConflict {
        /// The qubit (local to the gate's working width) named twice.
        qubit: usize,
    },

    /// Two operators, or an operator and a state, have different qubit counts.
    #[error("dimension mismatch: expected {expected} qubits, found {found}")]
    DimensionMismatch {
        /// Qubit count of the receiver.
        expected: usize,
        /// Qubit count of the argument.
        found: usize,
    },

    /// A gate description is malformed or a compiled layer is internally
    /// inconsistent.
    #[error("invalid gate: {message}")]
    InvalidGate {
        /// What was wrong with the gate.
        message: String,
    },

    /// The requested register is too wide to be represented densely.
    #[error("a {qubits}-qubit register exceeds the supported maximum of {max}")]
    RegisterTooLarge {
        /// Requested width.
        qubits: usize,
        /// Largest supported width.
        max: usize,
    },

    /// The amplitude vector has no weight to sample from or normalize by.
    #[error("state vector has zero norm")]
    ZeroNorm,

    /// A state failed the normalization check.
    #[error("state is not normalized: squared norm {norm_sqr:.6e}")]
    NotNormalized {
        /// The squared norm that was observed.
        norm_sqr: f64,
    },

    /// An operator failed the unitarity check.
    #[error("operator is not unitary: deviation {deviation:.6e}")]
    NotUnitary {
        /// Largest entry-wise deviation of U†U from the scaled identity.
        deviation: f64,
    },
}

/// Result type used throughout the crate.
pub type QsimResult<T> = Result<T, QsimError>;
