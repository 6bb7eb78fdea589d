// src/operations/mod.rs

//! Gate kinds and the `Operation` value describing one gate call on a circuit.
//!
//! An `Operation` carries no matrix data; it names qubits and a gate kind and
//! is turned into layer placements by `Circuit::add_operation`.

mod gates;

pub use gates::{ControlledGate, Gate};

/// One gate call, as recorded by [`crate::CircuitBuilder`] or passed to
/// [`crate::Circuit::add_operation`].
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// A single-qubit gate.
    Single {
        /// Qubit the gate acts on.
        target: usize,
        /// The gate.
        gate: Gate,
    },

    /// A gate on `target` conditioned on every qubit in `controls` being `|1>`.
    ///
    /// The placement reserves the whole contiguous range spanned by the controls
    /// and the target, not just the named qubits.
    Controlled {
        /// Control qubits. Must be non-empty and must not contain `target`.
        controls: Vec<usize>,
        /// Qubit the base gate acts on.
        target: usize,
        /// Base gate.
        gate: ControlledGate,
    },

    /// Reserves a full-width layer so nothing later is scheduled earlier.
    Barrier,
}

impl Operation {
    /// Qubits named by the operation. A barrier names none; it spans the whole
    /// register implicitly.
    pub fn involved_qubits(&self) -> Vec<usize> {
        match self {
            Operation::Single { target, .. } => vec![*target],
            Operation::Controlled { controls, target, .. } => {
                let mut qubits = controls.clone();
                qubits.push(*target);
                qubits
            }
            Operation::Barrier => Vec::new(),
        }
    }

    /// Inclusive qubit range `[lo, hi]` the operation occupies, or `None` for a
    /// barrier.
    pub fn span(&self) -> Option<(usize, usize)> {
        let qubits = self.involved_qubits();
        let lo = qubits.iter().copied().min()?;
        let hi = qubits.iter().copied().max()?;
        Some((lo, hi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controlled_span_covers_controls_and_target() {
        let op = Operation::Controlled {
            controls: vec![4, 1],
            target: 2,
            gate: ControlledGate::PauliZ,
        };
        assert_eq!(op.involved_qubits(), vec![4, 1, 2]);
        assert_eq!(op.span(), Some((1, 4)));
    }

    #[test]
    fn barrier_has_no_span() {
        assert_eq!(Operation::Barrier.span(), None);
        let single = Operation::Single { target: 3, gate: Gate::Hadamard };
        assert_eq!(single.span(), Some((3, 3)));
    }
}
