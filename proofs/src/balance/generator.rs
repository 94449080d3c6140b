//! Generator functionality for balance circuit.

use std::time::Instant;

use bellman::groth16::generate_random_parameters;
use rand::rngs::OsRng;
use rand::RngCore;

use primitives::error::{Error, Result};

use crate::balance::circuit::CircuitHandle;
use crate::keys::KeyPair;

/// Generate a fresh key pair for `circuit` with randomness from the operating system.
pub fn generate_keys(circuit: &CircuitHandle) -> Result<KeyPair> {
    let mut rng = OsRng;

    // Fail before setup if the entropy source is unavailable.
    let mut sample = [0u8; 32];
    rng.try_fill_bytes(&mut sample)
        .map_err(|e| Error::EntropyFailure(e.to_string()))?;

    generate_keys_with_rng(circuit, &mut rng)
}

/// Generate a key pair for `circuit` from the given randomness source.
pub fn generate_keys_with_rng<R: RngCore>(circuit: &CircuitHandle, rng: &mut R) -> Result<KeyPair> {
    let start = Instant::now();
    let parameters = generate_random_parameters(circuit.blank(), rng)?;
    let key_pair = KeyPair::from_parameters(parameters)?;
    tracing::info!(
        id = %key_pair.id(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "generated balance key pair"
    );
    Ok(key_pair)
}
