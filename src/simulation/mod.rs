// src/simulation/mod.rs

//! Repeated-shot execution of a circuit.
//!
//! The `Simulator` prepares `|0...0>`, applies a circuit's compiled operator and
//! measures the requested qubits, once per shot, collecting the outcomes into
//! a `SimulationResult`.

mod results;

pub use results::SimulationResult;

use crate::circuits::Circuit;
use crate::core::{QsimError, QsimResult, State};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Settings for a [`Simulator`].
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorConfig {
    /// Number of independent shots per run.
    pub shots: usize,
    /// Seed for the measurement RNG. `None` seeds from the operating system.
    pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            shots: 1024,
            seed: None,
        }
    }
}

impl SimulatorConfig {
    /// Sets the number of shots.
    #[must_use]
    pub fn with_shots(mut self, shots: usize) -> Self {
        self.shots = shots;
        self
    }

    /// Fixes the RNG seed, making runs reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Runs circuits repeatedly and tallies measurement outcomes.
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    config: SimulatorConfig,
}

impl Simulator {
    /// Creates a simulator with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a simulator with the given configuration.
    pub fn with_config(config: SimulatorConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Runs `circuit` for the configured number of shots, measuring `measured`
    /// at the end of each.
    ///
    /// The circuit is compiled at most once (its cache is reused or filled),
    /// and the evolved state is computed once and cloned per shot.
    ///
    /// # Errors
    /// * `QubitOutOfRange` if a measured qubit is outside the circuit.
    /// * Anything compilation or measurement reports.
    pub fn run(&self, circuit: &mut Circuit, measured: &[usize]) -> QsimResult<SimulationResult> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        self.run_with(circuit, measured, &mut rng)
    }

    /// Like [`Simulator::run`], drawing measurement randomness from `rng`.
    pub fn run_with<R: Rng>(
        &self,
        circuit: &mut Circuit,
        measured: &[usize],
        rng: &mut R,
    ) -> QsimResult<SimulationResult> {
        let qubits = circuit.qubit_count();
        if let Some(&qubit) = measured.iter().find(|&&q| q >= qubits) {
            return Err(QsimError::QubitOutOfRange { qubit, qubits });
        }

        let mut prepared = State::new(qubits)?;
        circuit.apply(&mut prepared)?;

        let mut result = SimulationResult::new(measured.to_vec());
        for _ in 0..self.config.shots {
            let mut state = prepared.clone();
            result.record(state.measure_many_with(measured, rng)?);
        }
        debug!(shots = result.shots(), outcomes = result.outcomes().len(), "simulation finished");
        Ok(result)
    }
}
