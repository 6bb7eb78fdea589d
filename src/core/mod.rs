// src/core/mod.rs

//! Core data structures: the operator algebra, the state vector and errors.

pub mod error;
pub mod operator;
pub mod state;

pub use error::{QsimError, QsimResult};
pub use operator::Operator;
pub use state::State;

pub mod constants;
pub use constants::{DEFAULT_TOLERANCE, MAX_QUBITS};
