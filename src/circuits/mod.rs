// src/circuits/mod.rs

//! Circuits: gate placement into depth layers, and lazy compilation of those
//! layers into one cached operator.
//!
//! Placement is greedy interval scheduling. Every gate occupies a contiguous
//! qubit range and goes into the earliest layer in which none of those qubits
//! is taken yet, so gates sharing a qubit keep their program order while
//! gates on disjoint ranges pack into the same layer.

mod compile;
mod layer;

pub use layer::{Layer, Slot};

use crate::core::{MAX_QUBITS, Operator, QsimError, QsimResult, State};
use crate::operations::{ControlledGate, Gate, Operation};
use std::fmt;
use tracing::trace;

/// A quantum circuit over a fixed number of qubits.
///
/// Gate calls only record placements. The matrix work happens in
/// [`Circuit::apply`] (or [`Circuit::operator`]), which compiles the layers once
/// and keeps the result until the next gate call.
#[derive(Debug, Clone)]
pub struct Circuit {
    qubits: usize,
    layers: Vec<Layer>,
    /// Earliest layer each qubit is still free in.
    next_free: Vec<usize>,
    compiled: Option<Operator>,
}

impl Circuit {
    /// Creates an empty circuit on `qubits` qubits.
    ///
    /// # Errors
    /// `RegisterTooLarge` if `qubits` exceeds [`MAX_QUBITS`].
    pub fn new(qubits: usize) -> QsimResult<Self> {
        if qubits > MAX_QUBITS {
            return Err(QsimError::RegisterTooLarge { qubits, max: MAX_QUBITS });
        }
        Ok(Self {
            qubits,
            layers: Vec::new(),
            next_free: vec![0; qubits],
            compiled: None,
        })
    }

    /// Number of qubits.
    pub fn qubit_count(&self) -> usize {
        self.qubits
    }

    /// Number of layers, barriers included.
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    /// The scheduled layers, in time order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// `true` if a compiled operator is cached and matches the current layers.
    pub fn is_compiled(&self) -> bool {
        self.compiled.is_some()
    }

    /// Schedules one operation and returns the depth it was placed at.
    ///
    /// For a barrier on an empty register nothing is placed and the current
    /// depth is returned.
    ///
    /// # Errors
    /// * `QubitOutOfRange` if a named qubit is outside the register.
    /// * `ControlTargetConflict` if the target is also listed as a control.
    /// * `InvalidGate` for a controlled operation without controls.
    ///
    /// The circuit is unchanged when an error is returned.
    pub fn add_operation(&mut self, op: Operation) -> QsimResult<usize> {
        match op {
            Operation::Single { target, gate } => self.place_single(target, gate),
            Operation::Controlled { controls, target, gate } => {
                self.place_controlled(&controls, target, gate)
            }
            Operation::Barrier => Ok(self.place_barrier()),
        }
    }

    /// Schedules several operations in order, stopping at the first error.
    pub fn add_operations<I>(&mut self, ops: I) -> QsimResult<()>
    where
        I: IntoIterator<Item = Operation>,
    {
        for op in ops {
            self.add_operation(op)?;
        }
        Ok(())
    }

    fn check_qubit(&self, qubit: usize) -> QsimResult<()> {
        if qubit >= self.qubits {
            return Err(QsimError::QubitOutOfRange {
                qubit,
                qubits: self.qubits,
            });
        }
        Ok(())
    }

    /// Reserves `[lo, hi]` at the earliest depth free on all of it and drops the
    /// cached operator.
    fn reserve(&mut self, lo: usize, hi: usize) -> usize {
        let depth = self.next_free[lo..=hi].iter().copied().max().unwrap_or(0);
        while self.layers.len() <= depth {
            self.layers.push(Layer::idle(self.qubits));
        }
        self.next_free[lo..=hi].fill(depth + 1);
        self.compiled = None;
        depth
    }

    fn place_single(&mut self, qubit: usize, gate: Gate) -> QsimResult<usize> {
        self.check_qubit(qubit)?;
        let depth = self.reserve(qubit, qubit);
        self.layers[depth].place(qubit, gate);
        trace!(qubit, depth, %gate, "placed gate");
        Ok(depth)
    }

    fn place_controlled(
        &mut self,
        controls: &[usize],
        target: usize,
        gate: ControlledGate,
    ) -> QsimResult<usize> {
        if controls.is_empty() {
            return Err(QsimError::InvalidGate {
                message: format!("{} on qubit {} needs at least one control", gate, target),
            });
        }
        self.check_qubit(target)?;
        for &control in controls {
            self.check_qubit(control)?;
            if control == target {
                return Err(QsimError::ControlTargetConflict { qubit: target });
            }
        }
        let lo = controls.iter().copied().fold(target, usize::min);
        let hi = controls.iter().copied().fold(target, usize::max);

        let depth = self.reserve(lo, hi);
        self.layers[depth].place_group(lo, hi, controls, target, gate);
        trace!(?controls, target, depth, %gate, "placed controlled gate");
        Ok(depth)
    }

    fn place_barrier(&mut self) -> usize {
        if self.qubits == 0 {
            return self.layers.len();
        }
        let depth = self.reserve(0, self.qubits - 1);
        self.layers[depth].place_barrier();
        trace!(depth, "placed barrier");
        depth
    }

    /// Places a single-qubit gate.
    pub fn gate(&mut self, qubit: usize, gate: Gate) -> QsimResult<&mut Self> {
        self.place_single(qubit, gate)?;
        Ok(self)
    }

    /// Pauli-X on `qubit`.
    pub fn x(&mut self, qubit: usize) -> QsimResult<&mut Self> {
        self.gate(qubit, Gate::PauliX)
    }

    /// Pauli-Y on `qubit`.
    pub fn y(&mut self, qubit: usize) -> QsimResult<&mut Self> {
        self.gate(qubit, Gate::PauliY)
    }

    /// Pauli-Z on `qubit`.
    pub fn z(&mut self, qubit: usize) -> QsimResult<&mut Self> {
        self.gate(qubit, Gate::PauliZ)
    }

    /// Hadamard on `qubit`.
    pub fn h(&mut self, qubit: usize) -> QsimResult<&mut Self> {
        self.gate(qubit, Gate::Hadamard)
    }

    /// X-rotation by `theta` radians.
    pub fn rx(&mut self, qubit: usize, theta: f64) -> QsimResult<&mut Self> {
        self.gate(qubit, Gate::RotationX(theta))
    }

    /// Y-rotation by `theta` radians.
    pub fn ry(&mut self, qubit: usize, theta: f64) -> QsimResult<&mut Self> {
        self.gate(qubit, Gate::RotationY(theta))
    }

    /// Z-rotation by `theta` radians.
    pub fn rz(&mut self, qubit: usize, theta: f64) -> QsimResult<&mut Self> {
        self.gate(qubit, Gate::RotationZ(theta))
    }

    /// Places `gate` on `target`, controlled on all of `controls`.
    pub fn controlled(
        &mut self,
        controls: &[usize],
        target: usize,
        gate: ControlledGate,
    ) -> QsimResult<&mut Self> {
        self.place_controlled(controls, target, gate)?;
        Ok(self)
    }

    /// Controlled-X (CNOT).
    pub fn cx(&mut self, control: usize, target: usize) -> QsimResult<&mut Self> {
        self.controlled(&[control], target, ControlledGate::PauliX)
    }

    /// Controlled-Y.
    pub fn cy(&mut self, control: usize, target: usize) -> QsimResult<&mut Self> {
        self.controlled(&[control], target, ControlledGate::PauliY)
    }

    /// Controlled-Z.
    pub fn cz(&mut self, control: usize, target: usize) -> QsimResult<&mut Self> {
        self.controlled(&[control], target, ControlledGate::PauliZ)
    }

    /// Controlled X-rotation.
    pub fn crx(&mut self, control: usize, target: usize, theta: f64) -> QsimResult<&mut Self> {
        self.controlled(&[control], target, ControlledGate::RotationX(theta))
    }

    /// Controlled Y-rotation.
    pub fn cry(&mut self, control: usize, target: usize, theta: f64) -> QsimResult<&mut Self> {
        self.controlled(&[control], target, ControlledGate::RotationY(theta))
    }

    /// Controlled Z-rotation.
    pub fn crz(&mut self, control: usize, target: usize, theta: f64) -> QsimResult<&mut Self> {
        self.controlled(&[control], target, ControlledGate::RotationZ(theta))
    }

    /// Multi-controlled X (Toffoli for two controls).
    pub fn ccx(&mut self, controls: &[usize], target: usize) -> QsimResult<&mut Self> {
        self.controlled(controls, target, ControlledGate::PauliX)
    }

    /// Multi-controlled Y.
    pub fn ccy(&mut self, controls: &[usize], target: usize) -> QsimResult<&mut Self> {
        self.controlled(controls, target, ControlledGate::PauliY)
    }

    /// Multi-controlled Z.
    pub fn ccz(&mut self, controls: &[usize], target: usize) -> QsimResult<&mut Self> {
        self.controlled(controls, target, ControlledGate::PauliZ)
    }

    /// Inserts a barrier across all qubits.
    pub fn barrier(&mut self) -> &mut Self {
        self.place_barrier();
        self
    }

    /// The compiled operator, compiling first if any gate was added since the
    /// last compilation. A failed compilation leaves the cache empty.
    pub fn operator(&mut self) -> QsimResult<&Operator> {
        let op = match self.compiled.take() {
            Some(op) => op,
            None => self.compile()?,
        };
        let op: &Operator = self.compiled.insert(op);
        Ok(op)
    }

    /// Left-multiplies `state` by the circuit's operator, in place.
    ///
    /// # Errors
    /// `DimensionMismatch` if the state's width differs from the circuit's,
    /// plus anything [`Circuit::compile`] reports.
    pub fn apply(&mut self, state: &mut State) -> QsimResult<()> {
        let op = self.operator()?;
        state.apply(op)
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let gates = self
            .layers
            .iter()
            .flat_map(|layer| layer.slots())
            .filter(|slot| matches!(slot, Slot::Gate(_) | Slot::Target(_)))
            .count();
        write!(
            f,
            "Circuit[{} qubits, {} layers, {} gates]",
            self.qubits,
            self.layers.len(),
            gates
        )
    }
}

//-------------------------------------------------------------------------
// Circuit Builder
//-------------------------------------------------------------------------

/// Collects operations by method chaining and schedules them on `build`.
pub struct CircuitBuilder {
    qubits: usize,
    operations: Vec<Operation>,
}

impl CircuitBuilder {
    /// Starts a builder for a circuit on `qubits` qubits.
    pub fn new(qubits: usize) -> Self {
        Self {
            qubits,
            operations: Vec::new(),
        }
    }

    /// Appends one operation.
    pub fn add_op(mut self, op: Operation) -> Self {
        self.operations.push(op);
        self
    }

    /// Appends several operations.
    pub fn add_ops<I>(mut self, ops: I) -> Self
    where
        I: IntoIterator<Item = Operation>,
    {
        self.operations.extend(ops);
        self
    }

    /// Schedules every collected operation into a new circuit.
    ///
    /// # Errors
    /// The first error reported by [`Circuit::new`] or
    /// [`Circuit::add_operation`].
    pub fn build(self) -> QsimResult<Circuit> {
        let mut circuit = Circuit::new(self.qubits)?;
        circuit.add_operations(self.operations)?;
        Ok(circuit)
    }
}
