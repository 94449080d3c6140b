//! The transported form of a balance proof.

use std::fmt::Formatter;

use bellman::groth16::Proof;
use bls12_381::Bls12;

use primitives::constants::{KEY_PAIR_ID_SIZE, PROOF_ARTIFACT_SIZE};
use primitives::definitions::KeyPairId;
use primitives::error::{Error, Result};
use primitives::serialise::{from_text, to_text};

/// A proof together with the id of the key pair it was generated with.
///
/// Encoded as the 32 byte key pair id followed by the compressed proof points A, B and C.
pub struct ProofArtifact {
    key_pair_id: KeyPairId,
    proof: Proof<Bls12>,
}

impl ProofArtifact {
    pub fn new(key_pair_id: KeyPairId, proof: Proof<Bls12>) -> Self {
        ProofArtifact { key_pair_id, proof }
    }

    pub fn key_pair_id(&self) -> KeyPairId {
        self.key_pair_id
    }

    pub fn proof(&self) -> &Proof<Bls12> {
        &self.proof
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(PROOF_ARTIFACT_SIZE);
        bytes.extend_from_slice(&self.key_pair_id.0);
        bytes.extend_from_slice(&self.proof.a.to_compressed());
        bytes.extend_from_slice(&self.proof.b.to_compressed());
        bytes.extend_from_slice(&self.proof.c.to_compressed());
        bytes
    }

    /// Decode an artifact of exactly [`PROOF_ARTIFACT_SIZE`] bytes. Points must be valid,
    /// non-identity subgroup elements.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PROOF_ARTIFACT_SIZE {
            return Err(Error::SizeMismatch {
                artifact: "proof",
                expected: PROOF_ARTIFACT_SIZE,
                actual: bytes.len(),
            });
        }
        let (id, proof) = bytes.split_at(KEY_PAIR_ID_SIZE);
        let mut key_pair_id = [0; KEY_PAIR_ID_SIZE];
        key_pair_id.copy_from_slice(id);
        let proof = Proof::<Bls12>::read(proof).map_err(|e| Error::MalformedProof(e.to_string()))?;
        Ok(ProofArtifact {
            key_pair_id: KeyPairId(key_pair_id),
            proof,
        })
    }

    pub fn to_text(&self) -> String {
        to_text(&self.encode())
    }

    pub fn from_text(text: &str) -> Result<Self> {
        Self::decode(&from_text(text)?)
    }
}

impl PartialEq for ProofArtifact {
    fn eq(&self, other: &Self) -> bool {
        self.key_pair_id == other.key_pair_id && self.proof == other.proof
    }
}

impl std::fmt::Debug for ProofArtifact {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ProofArtifact({}, {})", self.key_pair_id, to_text(&self.encode()))
    }
}
