//! Prover functionality for balance circuit

use std::time::Instant;

use bellman::groth16::create_random_proof;
use rand::rngs::OsRng;

use primitives::definitions::Witness;
use primitives::error::Result;

use crate::artifact::ProofArtifact;
use crate::balance::circuit::CircuitHandle;
use crate::keys::ProvingKey;

/// Balance proof constructor
///
/// The witness is checked out of circuit first, so an unbalanced or out of range witness is
/// reported instead of producing a proof that no verifier accepts.
pub fn create_proof(
    circuit: &CircuitHandle,
    proving_key: &ProvingKey,
    witness: &Witness,
) -> Result<ProofArtifact> {
    witness.check()?;

    // Initialise secure PRNG
    let mut rng = OsRng;

    let start = Instant::now();
    let proof = create_random_proof(circuit.assign(witness), proving_key.parameters(), &mut rng)?;
    tracing::debug!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        "created balance proof"
    );
    Ok(ProofArtifact::new(proving_key.id(), proof))
}
