// src/circuits/compile.rs

//! Reduction of a layered circuit to a single operator.

use super::Circuit;
use super::layer::{Layer, Slot};
use crate::core::{Operator, QsimError, QsimResult};
use tracing::debug;

impl Circuit {
    /// Compiles the circuit into one operator on all of its qubits, ignoring
    /// and not touching the cache.
    ///
    /// Layers are folded in order, each applied after the ones before it.
    /// Barrier layers contribute nothing.
    ///
    /// # Errors
    /// `InvalidGate` if a layer's markers are inconsistent, which placement
    /// never produces.
    pub fn compile(&self) -> QsimResult<Operator> {
        let mut total = Operator::unit(self.qubit_count());
        let mut folded = 0usize;
        for layer in self.layers().iter().filter(|l| !l.is_barrier()) {
            total = total.then(&compile_layer(layer)?)?;
            folded += 1;
        }
        debug!(
            qubits = self.qubit_count(),
            layers = folded,
            scale = total.scale(),
            "compiled circuit"
        );
        Ok(total)
    }
}

/// Builds the operator for one layer by scanning it in ascending qubit order
/// and tensoring each piece on as the new high-order part.
fn compile_layer(layer: &Layer) -> QsimResult<Operator> {
    let slots = layer.slots();
    let mut acc = Operator::unit(0);
    let mut qubit = 0;
    while qubit < slots.len() {
        let (piece, width) = match slots[qubit] {
            Slot::Idle => (Operator::unit(1), 1),
            Slot::Gate(gate) => (gate.operator(), 1),
            Slot::Control | Slot::Target(_) | Slot::PassThrough => {
                let end = layer
                    .group_end(qubit)
                    .filter(|&end| end >= qubit && end < slots.len())
                    .ok_or_else(|| QsimError::InvalidGate {
                        message: format!("group starting at qubit {} has no recorded end", qubit),
                    })?;
                (compile_group(&slots[qubit..=end], qubit)?, end - qubit + 1)
            }
            Slot::Barrier => {
                return Err(QsimError::InvalidGate {
                    message: format!("barrier marker at qubit {} inside a gate layer", qubit),
                });
            }
        };
        acc = piece.tensor(&acc)?;
        qubit += width;
    }
    Ok(acc)
}

/// Builds the controlled operator for one group, with control and target
/// positions made local to the group's range.
fn compile_group(slots: &[Slot], start: usize) -> QsimResult<Operator> {
    let mut control_mask = 0usize;
    let mut target = None;
    for (local, slot) in slots.iter().enumerate() {
        match slot {
            Slot::Control => control_mask |= 1 << local,
            Slot::Target(gate) => {
                if target.replace((local, *gate)).is_some() {
                    return Err(QsimError::InvalidGate {
                        message: format!("group starting at qubit {} has two targets", start),
                    });
                }
            }
            Slot::PassThrough => {}
            other => {
                return Err(QsimError::InvalidGate {
                    message: format!("{:?} at qubit {} inside a group", other, start + local),
                });
            }
        }
    }
    let (local, gate) = target.ok_or_else(|| QsimError::InvalidGate {
        message: format!("group starting at qubit {} has no target", start),
    })?;
    Operator::controlled(slots.len(), control_mask, 1 << local, &gate.base())
}
