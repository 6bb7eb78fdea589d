// src/lib.rs

//! `qsim` - A state-vector quantum circuit simulator
//!
//! Gates are scheduled into a layered `Circuit`, compiled lazily into a single
//! dense `Operator` and applied to a `State`, which is then measured with
//! probabilistic collapse.
//!
//! ```
//! use qsim::{Circuit, QsimResult, State};
//!
//! fn main() -> QsimResult<()> {
//!     let mut circuit = Circuit::new(2)?;
//!     circuit.h(0)?.cx(0, 1)?;
//!
//!     let mut state = State::new(2)?;
//!     circuit.apply(&mut state)?;
//!
//!     let probs = state.probabilities();
//!     assert!((probs[0b00] - 0.5).abs() < 1e-12);
//!     assert!((probs[0b11] - 0.5).abs() < 1e-12);
//!
//!     let bits = state.measure_many(&[0, 1])?;
//!     assert_eq!(bits[0], bits[1]);
//!     Ok(())
//! }
//! ```

pub mod circuits;
pub mod core;
pub mod operations;
pub mod simulation;
pub mod validation;

// Re-export the most common types for easier top-level use
pub use circuits::{Circuit, CircuitBuilder, Layer, Slot};
pub use core::{MAX_QUBITS, Operator, QsimError, QsimResult, State};
pub use operations::{ControlledGate, Gate, Operation};
pub use simulation::{SimulationResult, Simulator, SimulatorConfig};
pub use validation::{check_normalization, check_unitary, validate_state};

// Example: GHZ state statistics
// Builds a three-qubit GHZ circuit from operations and samples it with a
// seeded simulator; only the all-zero and all-one outcomes can appear.
/// ```
/// use qsim::{CircuitBuilder, ControlledGate, Gate, Operation, Simulator, SimulatorConfig};
///
/// let mut circuit = CircuitBuilder::new(3)
///     .add_op(Operation::Single { target: 0, gate: Gate::Hadamard })
///     .add_op(Operation::Controlled {
///         controls: vec![0],
///         target: 1,
///         gate: ControlledGate::PauliX,
///     })
///     .add_op(Operation::Controlled {
///         controls: vec![1],
///         target: 2,
///         gate: ControlledGate::PauliX,
///     })
///     .build()
///     .unwrap();
///
/// let config = SimulatorConfig::default().with_shots(500).with_seed(7);
/// let simulator = Simulator::with_config(config);
/// let result = simulator.run(&mut circuit, &[0, 1, 2]).unwrap();
/// println!("Circuit: {}", circuit);
/// println!("{}", result);
///
/// let zeros = result.count(&[false, false, false]);
/// let ones = result.count(&[true, true, true]);
/// assert_eq!(zeros + ones, 500);
/// assert!(zeros > 150 && ones > 150);
/// ```
#[doc(hidden)]
const _: () = ();
