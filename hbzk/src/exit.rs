//! Process exit codes.

use primitives::error::Error;

use crate::commands::KeyFilesExist;

pub const ACCEPTED: i32 = 0;
pub const REJECTED: i32 = 1;
pub const USAGE: i32 = 2;
pub const CONSTRAINT_UNSATISFIED: i32 = 10;
pub const VALUE_OUT_OF_RANGE: i32 = 11;
pub const INVALID_IDENTIFIER: i32 = 12;
pub const MALFORMED_PROOF: i32 = 13;
pub const MALFORMED_KEY: i32 = 14;
pub const SIZE_MISMATCH: i32 = 15;
pub const ENCODING: i32 = 16;
pub const STALE_KEY_PAIR: i32 = 17;
pub const ENTROPY_FAILURE: i32 = 18;
pub const SYNTHESIS: i32 = 19;
pub const IO: i32 = 20;
pub const MALFORMED_DOCUMENT: i32 = 21;
pub const KEY_FILES_EXIST: i32 = 22;

/// Exit code of a proof error.
pub fn error_code(error: &Error) -> i32 {
    match error {
        Error::ConstraintUnsatisfied => CONSTRAINT_UNSATISFIED,
        Error::ValueOutOfRange { .. } => VALUE_OUT_OF_RANGE,
        Error::InvalidIdentifier { .. } => INVALID_IDENTIFIER,
        Error::MalformedProof(_) => MALFORMED_PROOF,
        Error::MalformedKey(_) => MALFORMED_KEY,
        Error::SizeMismatch { .. } => SIZE_MISMATCH,
        Error::Encoding(_) => ENCODING,
        Error::StaleKeyPair { .. } => STALE_KEY_PAIR,
        Error::EntropyFailure(_) => ENTROPY_FAILURE,
        Error::Synthesis(_) => SYNTHESIS,
        Error::Io(_) => IO,
    }
}

/// Exit code of a failed command: the code of the first recognised cause.
pub fn exit_code(error: &anyhow::Error) -> i32 {
    for cause in error.chain() {
        if let Some(error) = cause.downcast_ref::<Error>() {
            return error_code(error);
        }
        if cause.is::<KeyFilesExist>() {
            return KEY_FILES_EXIST;
        }
        if let Some(error) = cause.downcast_ref::<serde_json::Error>() {
            return match error.classify() {
                serde_json::error::Category::Io => IO,
                _ => MALFORMED_DOCUMENT,
            };
        }
        if cause.is::<std::io::Error>() {
            return IO;
        }
    }
    IO
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use anyhow::Context;

    use primitives::definitions::{KeyPairId, Quantity};
    use primitives::error::Error;

    use super::*;

    #[test]
    fn test_error_codes_are_distinct() {
        let errors = vec![
            Error::ConstraintUnsatisfied,
            Error::ValueOutOfRange {
                what: "value",
                bits: 64,
            },
            Quantity::new(1, 4, 7).unwrap_err(),
            Error::MalformedProof("identity".into()),
            Error::MalformedKey("truncated".into()),
            Error::SizeMismatch {
                artifact: "proof",
                expected: 224,
                actual: 223,
            },
            primitives::serialise::from_text("%%").unwrap_err(),
            Error::StaleKeyPair {
                expected: KeyPairId([1; 32]),
                actual: KeyPairId([2; 32]),
            },
            Error::EntropyFailure("no device".into()),
            Error::Synthesis(bellman::SynthesisError::AssignmentMissing),
            Error::Io(std::io::ErrorKind::NotFound.into()),
        ];
        let codes: Vec<i32> = errors.iter().map(error_code).collect();
        assert_eq!(codes, (10..=20).collect::<Vec<_>>());
        for code in codes {
            assert!(![ACCEPTED, REJECTED, USAGE].contains(&code));
        }
    }

    #[test]
    fn test_exit_code_looks_through_context() {
        let error = anyhow::Error::from(Error::MalformedKey("truncated".into()))
            .context("cannot load verifying key");
        assert_eq!(exit_code(&error), MALFORMED_KEY);

        let error = anyhow::Error::from(KeyFilesExist(vec![PathBuf::from("a.pk")]));
        assert_eq!(exit_code(&error), KEY_FILES_EXIST);

        let error = serde_json::from_str::<Quantity>("{\"value\": 1}")
            .context("malformed document witness.json")
            .unwrap_err();
        assert_eq!(exit_code(&error), MALFORMED_DOCUMENT);

        let error = std::fs::read("/nonexistent/hashblock_zkSNARK.vk")
            .context("cannot read key")
            .unwrap_err();
        assert_eq!(exit_code(&error), IO);
    }
}
