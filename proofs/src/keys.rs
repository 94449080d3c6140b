//! Proving and verifying keys of the balance circuit, identified by their key pair id.

use std::fmt::Formatter;
use std::io::ErrorKind;

use bellman::groth16;
use bellman::groth16::{prepare_verifying_key, Parameters, PreparedVerifyingKey};
use bls12_381::Bls12;

use primitives::constants::verifying_key_size;
use primitives::definitions::KeyPairId;
use primitives::error::{Error, Result};

use crate::balance::CircuitHandle;

/// Groth16 parameters for the balance circuit.
pub struct ProvingKey {
    parameters: Parameters<Bls12>,
    id: KeyPairId,
}

/// Groth16 verifying key for the balance circuit, prepared for pairing checks.
pub struct VerifyingKey {
    key: groth16::VerifyingKey<Bls12>,
    prepared: PreparedVerifyingKey<Bls12>,
    id: KeyPairId,
}

/// A proving key and the verifying key generated with it.
pub struct KeyPair {
    pub proving_key: ProvingKey,
    pub verifying_key: VerifyingKey,
}

impl KeyPair {
    pub(crate) fn from_parameters(parameters: Parameters<Bls12>) -> Result<Self> {
        let proving_key = ProvingKey::from_parameters(parameters)?;
        let verifying_key = proving_key.verifying_key()?;
        Ok(KeyPair {
            proving_key,
            verifying_key,
        })
    }

    pub fn id(&self) -> KeyPairId {
        self.proving_key.id
    }
}

impl ProvingKey {
    fn from_parameters(parameters: Parameters<Bls12>) -> Result<Self> {
        let id = key_pair_id(&parameters.vk)?;
        Ok(ProvingKey { parameters, id })
    }

    pub fn id(&self) -> KeyPairId {
        self.id
    }

    pub fn parameters(&self) -> &Parameters<Bls12> {
        &self.parameters
    }

    /// The verifying key embedded in the proving key.
    pub fn verifying_key(&self) -> Result<VerifyingKey> {
        VerifyingKey::from_key(self.parameters.vk.clone())
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut bytes = vec![];
        self.parameters.write(&mut bytes)?;
        Ok(bytes)
    }

    /// Decode a proving key, checking every point and checking the query sizes against `circuit`.
    pub fn decode(bytes: &[u8], circuit: &CircuitHandle) -> Result<Self> {
        let mut reader = bytes;
        let parameters = Parameters::<Bls12>::read(&mut reader, true)
            .map_err(|e| malformed_key("proving key", e))?;
        if !reader.is_empty() {
            return Err(Error::SizeMismatch {
                artifact: "proving key",
                expected: bytes.len() - reader.len(),
                actual: bytes.len(),
            });
        }
        check_query_size(
            "proving key IC query",
            circuit.num_public_inputs() + 1,
            parameters.vk.ic.len(),
        )?;
        check_query_size(
            "proving key L query",
            circuit.shape().num_aux,
            parameters.l.len(),
        )?;
        Self::from_parameters(parameters)
    }
}

impl VerifyingKey {
    fn from_key(key: groth16::VerifyingKey<Bls12>) -> Result<Self> {
        let id = key_pair_id(&key)?;
        let prepared = prepare_verifying_key(&key);
        Ok(VerifyingKey { key, prepared, id })
    }

    pub fn id(&self) -> KeyPairId {
        self.id
    }

    pub fn prepared(&self) -> &PreparedVerifyingKey<Bls12> {
        &self.prepared
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut bytes = vec![];
        self.key.write(&mut bytes)?;
        Ok(bytes)
    }

    /// Decode a verifying key, which has a fixed size for `circuit`.
    pub fn decode(bytes: &[u8], circuit: &CircuitHandle) -> Result<Self> {
        let expected = verifying_key_size(circuit.num_public_inputs());
        if bytes.len() != expected {
            return Err(Error::SizeMismatch {
                artifact: "verifying key",
                expected,
                actual: bytes.len(),
            });
        }
        let key = groth16::VerifyingKey::<Bls12>::read(bytes)
            .map_err(|e| malformed_key("verifying key", e))?;
        check_query_size(
            "verifying key IC query",
            circuit.num_public_inputs() + 1,
            key.ic.len(),
        )?;
        Self::from_key(key)
    }
}

fn key_pair_id(key: &groth16::VerifyingKey<Bls12>) -> Result<KeyPairId> {
    let mut bytes = vec![];
    key.write(&mut bytes)?;
    Ok(KeyPairId::from_verifying_key_bytes(&bytes))
}

fn malformed_key(artifact: &str, e: std::io::Error) -> Error {
    match e.kind() {
        ErrorKind::UnexpectedEof => Error::MalformedKey(format!("{} is truncated", artifact)),
        _ => Error::MalformedKey(format!("{}: {}", artifact, e)),
    }
}

fn check_query_size(artifact: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(Error::SizeMismatch {
            artifact,
            expected,
            actual,
        });
    }
    Ok(())
}

impl PartialEq for ProvingKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.parameters == other.parameters
    }
}

impl PartialEq for VerifyingKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.key == other.key
    }
}

impl std::fmt::Debug for ProvingKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ProvingKey({})", self.id)
    }
}

impl std::fmt::Debug for VerifyingKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "VerifyingKey({})", self.id)
    }
}
