//! The `hbzk` subcommands, on files.

use std::convert::TryFrom;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use thiserror::Error;

use primitives::definitions::{KeyPairId, PublicInputs, UncheckedWitness, Witness};
use primitives::serialise::from_text;
use proofs::balance::{generator, prover, verifier, CircuitHandle};
use proofs::keys::{ProvingKey, VerifyingKey};

/// How a proof file is written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Encoding {
    Binary,
    Base64,
}

/// Key generation would replace existing key files.
#[derive(Debug, Error)]
#[error("key files exist, rerun with --force to overwrite: {}", display_paths(.0))]
pub struct KeyFilesExist(pub Vec<PathBuf>);

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Generate a fresh key pair and write it to `proving_key` and `verifying_key`.
///
/// Existing key files are only replaced when `force` is set. Every proof made under the old key
/// pair stops verifying. Both keys are written next to their destinations first and only moved
/// into place once both writes succeeded.
pub fn generate_keys(
    circuit: &CircuitHandle,
    proving_key: &Path,
    verifying_key: &Path,
    force: bool,
) -> Result<KeyPairId> {
    let existing: Vec<PathBuf> = [proving_key, verifying_key]
        .iter()
        .filter(|path| path.exists())
        .map(|path| path.to_path_buf())
        .collect();
    if !existing.is_empty() && !force {
        return Err(KeyFilesExist(existing).into());
    }

    let key_pair = generator::generate_keys(circuit)?;
    for path in &existing {
        tracing::warn!(file = %path.display(), id = %key_pair.id(), "overwriting key file");
    }
    let staged_proving_key = stage_file(proving_key, &key_pair.proving_key.encode()?)?;
    let staged_verifying_key = stage_file(verifying_key, &key_pair.verifying_key.encode()?)?;
    persist_file(staged_proving_key, proving_key)?;
    persist_file(staged_verifying_key, verifying_key)?;
    tracing::info!(
        proving_key = %proving_key.display(),
        verifying_key = %verifying_key.display(),
        "wrote key pair {}",
        key_pair.id()
    );
    Ok(key_pair.id())
}

/// Prove the witness in `witness` and write the proof to `proof`. The public inputs of the proof
/// are written to `public_inputs` when given.
pub fn generate_proof(
    circuit: &CircuitHandle,
    proving_key: &Path,
    witness: &Path,
    proof: &Path,
    public_inputs: Option<&Path>,
    encoding: Encoding,
) -> Result<KeyPairId> {
    let proving_key = ProvingKey::decode(&read_file(proving_key)?, circuit)
        .with_context(|| format!("cannot load proving key {}", proving_key.display()))?;
    let witness: UncheckedWitness = read_json(witness)?;
    let witness = Witness::try_from(witness)?;

    let artifact = prover::create_proof(circuit, &proving_key, &witness)?;
    let bytes = match encoding {
        Encoding::Binary => artifact.encode(),
        Encoding::Base64 => artifact.to_text().into_bytes(),
    };
    write_file(proof, &bytes)?;

    if let Some(path) = public_inputs {
        let mut file = BufWriter::new(create_file(path)?);
        serde_json::to_writer_pretty(file.by_ref(), &witness.public_inputs())?;
        file.flush()?;
    }
    Ok(artifact.key_pair_id())
}

/// Verify the proof in `proof` against the public inputs in `public_inputs`.
pub fn verify_proof(
    circuit: &CircuitHandle,
    verifying_key: &Path,
    proof: &Path,
    public_inputs: &Path,
    encoding: Encoding,
) -> Result<bool> {
    let verifying_key = VerifyingKey::decode(&read_file(verifying_key)?, circuit)
        .with_context(|| format!("cannot load verifying key {}", verifying_key.display()))?;
    let public_inputs: PublicInputs = read_json(public_inputs)?;

    let bytes = read_file(proof)?;
    let bytes = match encoding {
        Encoding::Binary => bytes,
        Encoding::Base64 => from_text(&String::from_utf8_lossy(&bytes))?,
    };
    Ok(verifier::verify_encoded(
        &verifying_key,
        &public_inputs,
        &bytes,
    )?)
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("cannot read {}", path.display()))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("malformed document {}", path.display()))
}

fn create_file(path: &Path) -> Result<File> {
    File::create(path).with_context(|| format!("cannot create {}", path.display()))
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = BufWriter::new(create_file(path)?);
    file.write_all(bytes)?;
    file.flush()?;
    Ok(())
}

/// Write `bytes` to a temporary file in the directory of `path`.
fn stage_file(path: &Path, bytes: &[u8]) -> Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("cannot create {}", path.display()))?;
    file.write_all(bytes)
        .and_then(|_| file.flush())
        .with_context(|| format!("cannot write {}", path.display()))?;
    Ok(file)
}

fn persist_file(file: NamedTempFile, path: &Path) -> Result<()> {
    file.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("cannot replace {}", path.display()))?;
    Ok(())
}
