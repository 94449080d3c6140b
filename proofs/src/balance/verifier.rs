//! Verifier functionality for balance circuit

use bellman::groth16;
use bellman::groth16::{PreparedVerifyingKey, Proof};
use bls12_381::Bls12;

use primitives::definitions::PublicInputs;
use primitives::error::{Error, Result};

use crate::artifact::ProofArtifact;
use crate::keys::VerifyingKey;

/// Balance proof verifier
///
/// Public inputs whose dimensions do not balance are rejected before the pairing check. Any
/// failure, including a proof made under another key pair, is a rejection.
pub fn verify_proof(
    proof: &Proof<Bls12>,
    public_inputs: &PublicInputs,
    verifying_key: &PreparedVerifyingKey<Bls12>,
) -> bool {
    if !public_inputs.is_balanced() {
        tracing::debug!("dimensions of the public inputs do not balance");
        return false;
    }
    groth16::verify_proof(verifying_key, proof, &public_inputs.to_scalars()).is_ok()
}

/// Verify a proof artifact, reporting a proof made under another key pair as stale.
pub fn verify(
    verifying_key: &VerifyingKey,
    public_inputs: &PublicInputs,
    artifact: &ProofArtifact,
) -> Result<bool> {
    if artifact.key_pair_id() != verifying_key.id() {
        return Err(Error::StaleKeyPair {
            expected: verifying_key.id(),
            actual: artifact.key_pair_id(),
        });
    }
    let accepted = verify_proof(artifact.proof(), public_inputs, verifying_key.prepared());
    tracing::debug!(accepted, key_pair = %verifying_key.id(), "verified balance proof");
    Ok(accepted)
}

/// Decode and verify an encoded proof artifact.
pub fn verify_encoded(
    verifying_key: &VerifyingKey,
    public_inputs: &PublicInputs,
    bytes: &[u8],
) -> Result<bool> {
    let artifact = ProofArtifact::decode(bytes)?;
    verify(verifying_key, public_inputs, &artifact)
}
