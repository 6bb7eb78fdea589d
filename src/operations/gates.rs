// src/operations/gates.rs

use crate::core::Operator;
use std::fmt;

/// A single-qubit gate that can occupy one slot of a circuit layer.
///
/// Rotation angles are in radians. The fixed Pauli gates and their rotation
/// counterparts are distinct variants: `RotationX(PI)` is compiled with the
/// rotation formula and only agrees with `PauliX` up to global phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gate {
    /// Explicit identity.
    Identity,
    /// Pauli-X (bit flip).
    PauliX,
    /// Pauli-Y.
    PauliY,
    /// Pauli-Z (phase flip).
    PauliZ,
    /// Hadamard, compiled with a deferred scale factor of 2.
    Hadamard,
    /// Rotation about the X axis by the given angle.
    RotationX(f64),
    /// Rotation about the Y axis by the given angle.
    RotationY(f64),
    /// Rotation about the Z axis by the given angle.
    RotationZ(f64),
}

impl Gate {
    /// The 1-qubit operator for this gate.
    pub fn operator(&self) -> Operator {
        match *self {
            Gate::Identity => Operator::unit(1),
            Gate::PauliX => Operator::pauli_x(),
            Gate::PauliY => Operator::pauli_y(),
            Gate::PauliZ => Operator::pauli_z(),
            Gate::Hadamard => Operator::hadamard(),
            Gate::RotationX(theta) => Operator::rotation_x(theta),
            Gate::RotationY(theta) => Operator::rotation_y(theta),
            Gate::RotationZ(theta) => Operator::rotation_z(theta),
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gate::Identity => write!(f, "I"),
            Gate::PauliX => write!(f, "X"),
            Gate::PauliY => write!(f, "Y"),
            Gate::PauliZ => write!(f, "Z"),
            Gate::Hadamard => write!(f, "H"),
            Gate::RotationX(theta) => write!(f, "RX({:.4})", theta),
            Gate::RotationY(theta) => write!(f, "RY({:.4})", theta),
            Gate::RotationZ(theta) => write!(f, "RZ({:.4})", theta),
        }
    }
}

/// The gate applied to the target qubit of a controlled operation.
///
/// Only unit-scale gates can be controlled, which is why Hadamard and the
/// identity are absent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlledGate {
    /// Controlled-X family (CX, CCX, ...).
    PauliX,
    /// Controlled-Y family.
    PauliY,
    /// Controlled-Z family.
    PauliZ,
    /// Controlled X-rotation.
    RotationX(f64),
    /// Controlled Y-rotation.
    RotationY(f64),
    /// Controlled Z-rotation.
    RotationZ(f64),
}

impl ControlledGate {
    /// The 1-qubit base operator applied to the target when all controls are set.
    pub fn base(&self) -> Operator {
        Gate::from(*self).operator()
    }
}

impl From<ControlledGate> for Gate {
    fn from(gate: ControlledGate) -> Self {
        match gate {
            ControlledGate::PauliX => Gate::PauliX,
            ControlledGate::PauliY => Gate::PauliY,
            ControlledGate::PauliZ => Gate::PauliZ,
            ControlledGate::RotationX(theta) => Gate::RotationX(theta),
            ControlledGate::RotationY(theta) => Gate::RotationY(theta),
            ControlledGate::RotationZ(theta) => Gate::RotationZ(theta),
        }
    }
}

impl fmt::Display for ControlledGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", Gate::from(*self))
    }
}
