// src/simulation/results.rs
use std::collections::BTreeMap;
use std::fmt;

/// Outcome histogram of a repeated-shot simulation.
///
/// Each outcome is one bit per measured qubit, in the order the qubits were
/// requested.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    measured: Vec<usize>,
    counts: BTreeMap<Vec<bool>, usize>,
    shots: usize,
}

impl SimulationResult {
    pub(crate) fn new(measured: Vec<usize>) -> Self {
        Self {
            measured,
            counts: BTreeMap::new(),
            shots: 0,
        }
    }

    pub(crate) fn record(&mut self, outcome: Vec<bool>) {
        *self.counts.entry(outcome).or_insert(0) += 1;
        self.shots += 1;
    }

    /// The qubits that were measured, in outcome bit order.
    pub fn measured_qubits(&self) -> &[usize] {
        &self.measured
    }

    /// Total number of recorded shots.
    pub fn shots(&self) -> usize {
        self.shots
    }

    /// How many shots produced `outcome`.
    pub fn count(&self, outcome: &[bool]) -> usize {
        self.counts.get(outcome).copied().unwrap_or(0)
    }

    /// Fraction of shots that produced `outcome`; 0 when no shots were run.
    pub fn frequency(&self, outcome: &[bool]) -> f64 {
        if self.shots == 0 {
            return 0.0;
        }
        self.count(outcome) as f64 / self.shots as f64
    }

    /// All observed outcomes with their counts.
    pub fn outcomes(&self) -> &BTreeMap<Vec<bool>, usize> {
        &self.counts
    }
}

impl fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let qubits = self.measured_qubits();
        writeln!(f, "Simulation Results ({} shots, qubits {:?}):", self.shots, qubits)?;
        if self.counts.is_empty() {
            writeln!(f, "  No outcomes recorded.")?;
        }
        for (outcome, count) in &self.counts {
            let bits: String = outcome.iter().map(|&b| if b { '1' } else { '0' }).collect();
            writeln!(f, "  {}: {}", bits, count)?;
        }
        Ok(())
    }
}
