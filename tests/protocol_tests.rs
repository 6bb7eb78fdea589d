// tests/protocol_tests.rs

// Multi-step protocols driven through separate circuits, with classical
// decisions taken between them from mid-protocol measurements.

use qsim::{Circuit, QsimResult, State};
use rand::SeedableRng;
use rand::rngs::StdRng;

// Helper: probability that `qubit` reads 1
fn probability_of_one(state: &State, qubit: usize) -> f64 {
    state
        .probabilities()
        .iter()
        .enumerate()
        .filter(|(index, _)| index & (1 << qubit) != 0)
        .map(|(_, p)| p)
        .sum()
}

fn prepare(circuit: &mut Circuit, qubit: usize, theta: f64, phi: f64) -> QsimResult<()> {
    circuit.ry(qubit, theta)?.rz(qubit, phi)?;
    Ok(())
}

#[test]
fn test_teleportation_preserves_distribution() -> QsimResult<()> {
    let (theta, phi): (f64, f64) = (1.1, 0.4);

    // Distribution of the payload prepared directly on one qubit
    let mut direct = Circuit::new(1)?;
    prepare(&mut direct, 0, theta, phi)?;
    let mut reference = State::new(1)?;
    direct.apply(&mut reference)?;
    let expected = probability_of_one(&reference, 0);
    assert!((expected - (theta / 2.0).sin().powi(2)).abs() < 1e-9);

    // q0 payload, q1 sender half, q2 receiver half
    let mut entangle = Circuit::new(3)?;
    prepare(&mut entangle, 0, theta, phi)?;
    entangle.h(1)?.cx(1, 2)?.barrier().cx(0, 1)?.h(0)?;

    let mut seen = [false; 4];
    for seed in 0..64u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut state = State::new(3)?;
        entangle.apply(&mut state)?;
        let bits = state.measure_many_with(&[0, 1], &mut rng)?;
        seen[(bits[0] as usize) | ((bits[1] as usize) << 1)] = true;

        let mut correct = Circuit::new(3)?;
        if bits[1] {
            correct.x(2)?;
        }
        if bits[0] {
            correct.z(2)?;
        }
        correct.apply(&mut state)?;

        let received = probability_of_one(&state, 2);
        assert!(
            (received - expected).abs() < 1e-9,
            "seed {}: bits {:?} gave P(1) = {}, expected {}",
            seed,
            bits,
            received,
            expected
        );
    }
    assert!(seen.iter().all(|&s| s), "not every correction branch was exercised");
    Ok(())
}

#[test]
fn test_bit_flip_code_corrects_single_errors() -> QsimResult<()> {
    let theta: f64 = 0.9;
    let expected = (theta / 2.0).sin().powi(2);

    // None, or an X error on one of the three physical qubits
    for error in [None, Some(0), Some(1), Some(2)] {
        let mut circuit = Circuit::new(3)?;
        circuit.ry(0, theta)?;
        circuit.cx(0, 1)?.cx(0, 2)?;
        if let Some(qubit) = error {
            circuit.x(qubit)?;
        }
        circuit.cx(0, 1)?.cx(0, 2)?.ccx(&[1, 2], 0)?;

        let mut state = State::new(3)?;
        circuit.apply(&mut state)?;
        let decoded = probability_of_one(&state, 0);
        assert!(
            (decoded - expected).abs() < 1e-9,
            "error {:?}: P(1) = {}, expected {}",
            error,
            decoded,
            expected
        );
    }
    Ok(())
}

#[test]
fn test_bit_flip_code_on_basis_states() -> QsimResult<()> {
    let mut rng = StdRng::seed_from_u64(5);
    for logical in [false, true] {
        for error in 0..3 {
            let mut circuit = Circuit::new(3)?;
            if logical {
                circuit.x(0)?;
            }
            circuit
                .cx(0, 1)?
                .cx(0, 2)?
                .x(error)?
                .cx(0, 1)?
                .cx(0, 2)?
                .ccx(&[1, 2], 0)?;
            let mut state = State::new(3)?;
            circuit.apply(&mut state)?;
            assert_eq!(state.measure_with(0, &mut rng)?, logical, "error on qubit {}", error);
        }
    }
    Ok(())
}
