//! Error kinds of the balancing proof system.

use bellman::SynthesisError;
use thiserror::Error;

use crate::definitions::KeyPairId;

#[derive(Debug, Error)]
pub enum Error {
    /// The witness does not satisfy the balancing equation.
    #[error("witness does not satisfy the balancing equation")]
    ConstraintUnsatisfied,

    /// A numeric input does not fit in the bit width the circuit reserves for it.
    #[error("{what} does not fit in {bits} bits")]
    ValueOutOfRange { what: &'static str, bits: usize },

    /// A unit or asset identifier breaks the prime encoding.
    #[error("invalid identifier {identifier}: {reason}")]
    InvalidIdentifier {
        identifier: u64,
        reason: &'static str,
    },

    #[error("malformed proof: {0}")]
    MalformedProof(String),

    #[error("malformed key: {0}")]
    MalformedKey(String),

    #[error("{artifact} has size {actual}, expected {expected}")]
    SizeMismatch {
        artifact: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid text encoding: {0}")]
    Encoding(#[from] base64::DecodeError),

    /// The proof was generated under another key pair than the one used to verify it.
    #[error("proof belongs to key pair {actual}, verifying key is {expected}")]
    StaleKeyPair {
        expected: KeyPairId,
        actual: KeyPairId,
    },

    /// The operating system failed to provide randomness. Never recoverable.
    #[error("entropy source failed: {0}")]
    EntropyFailure(String),

    #[error("circuit synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether the error must abort the running process instead of rejecting a transaction.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::EntropyFailure(_))
    }

    /// Whether the ledger should reject the transaction that caused the error.
    pub fn is_rejection(&self) -> bool {
        !self.is_fatal()
    }
}
