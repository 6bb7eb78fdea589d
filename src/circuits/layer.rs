// src/circuits/layer.rs

use crate::operations::{ControlledGate, Gate};

/// What occupies one qubit of one circuit layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Slot {
    /// Nothing scheduled; compiles to the identity.
    Idle,
    /// A single-qubit gate.
    Gate(Gate),
    /// Control qubit of a multi-qubit group.
    Control,
    /// Target qubit of a multi-qubit group.
    Target(ControlledGate),
    /// Inside a group's range but neither control nor target. The qubit is
    /// reserved and the group's operator acts on it as the identity.
    PassThrough,
    /// Part of a barrier layer.
    Barrier,
}

impl Slot {
    /// `true` for the markers that make up a multi-qubit group.
    pub fn is_group_member(&self) -> bool {
        matches!(self, Slot::Control | Slot::Target(_) | Slot::PassThrough)
    }
}

/// One time-slot of a circuit: a slot per qubit plus, for every multi-qubit
/// group, the qubit at which the group's range ends.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    slots: Vec<Slot>,
    /// `group_ends[lo] == Some(hi)` for a group spanning `[lo, hi]`.
    group_ends: Vec<Option<usize>>,
}

impl Layer {
    pub(crate) fn idle(width: usize) -> Self {
        Self {
            slots: vec![Slot::Idle; width],
            group_ends: vec![None; width],
        }
    }

    /// Slots in ascending qubit order.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// The slot at `qubit`, if the qubit exists.
    pub fn slot(&self, qubit: usize) -> Option<&Slot> {
        self.slots.get(qubit)
    }

    /// Last qubit of the group whose range starts at `start`.
    pub fn group_end(&self, start: usize) -> Option<usize> {
        self.group_ends.get(start).copied().flatten()
    }

    /// Number of qubits in the layer.
    pub fn width(&self) -> usize {
        self.slots.len()
    }

    /// `true` if this layer was reserved by a barrier.
    pub fn is_barrier(&self) -> bool {
        matches!(self.slots.first(), Some(Slot::Barrier))
    }

    /// `true` if nothing is scheduled on any qubit.
    pub fn is_idle(&self) -> bool {
        self.slots.iter().all(|s| *s == Slot::Idle)
    }

    pub(crate) fn place(&mut self, qubit: usize, gate: Gate) {
        self.slots[qubit] = Slot::Gate(gate);
    }

    pub(crate) fn place_group(
        &mut self,
        lo: usize,
        hi: usize,
        controls: &[usize],
        target: usize,
        gate: ControlledGate,
    ) {
        self.slots[lo..=hi].fill(Slot::PassThrough);
        for &control in controls {
            self.slots[control] = Slot::Control;
        }
        self.slots[target] = Slot::Target(gate);
        self.group_ends[lo] = Some(hi);
    }

    pub(crate) fn place_barrier(&mut self) {
        self.slots.fill(Slot::Barrier);
    }

    #[cfg(test)]
    pub(crate) fn forget_group_end(&mut self, start: usize) {
        self.group_ends[start] = None;
    }
}
