//! Numeric limits and tolerances shared across the crate.

/// Widest register accepted by `State`, `Circuit` and the sized `Operator`
/// constructors. Keeps `1 << n` well inside `usize`.
pub const MAX_QUBITS: usize = 24;

/// Default tolerance for normalization and unitarity checks.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;
