use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hbzk::commands::{self, Encoding};
use hbzk::config::Config;
use hbzk::exit::{exit_code, ACCEPTED, ENTROPY_FAILURE, REJECTED};
use proofs::balance::build_circuit;

/// Balancing proofs for matched exchanges.
#[derive(Parser)]
#[command(name = "hbzk", version)]
struct Cli {
    /// Enable more verbose output, repeat for more.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a new proving and verifying key pair.
    GenerateKeys {
        #[arg(long)]
        proving_key: Option<PathBuf>,
        #[arg(long)]
        verifying_key: Option<PathBuf>,
        /// Overwrite key files if they exist.
        #[arg(long)]
        force: bool,
    },
    /// Prove that the ratios in a witness file balance.
    GenerateProof {
        #[arg(long)]
        witness: PathBuf,
        #[arg(long)]
        proof: PathBuf,
        /// Also write the public inputs of the proof.
        #[arg(long)]
        public_inputs: Option<PathBuf>,
        #[arg(long)]
        proving_key: Option<PathBuf>,
        #[arg(long, value_enum, default_value = "binary")]
        encoding: Encoding,
    },
    /// Verify a proof against its public inputs.
    VerifyProof {
        #[arg(long)]
        proof: PathBuf,
        #[arg(long)]
        public_inputs: PathBuf,
        #[arg(long)]
        verifying_key: Option<PathBuf>,
        #[arg(long, value_enum, default_value = "binary")]
        encoding: Encoding,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Command) -> Result<i32> {
    let config = Config::from_env();
    let circuit = build_circuit()?;
    match command {
        Command::GenerateKeys {
            proving_key,
            verifying_key,
            force,
        } => {
            let config = config.with_overrides(proving_key, verifying_key);
            let id = commands::generate_keys(
                &circuit,
                &config.proving_key,
                &config.verifying_key,
                force,
            )?;
            println!("{}", id);
            Ok(ACCEPTED)
        }
        Command::GenerateProof {
            witness,
            proof,
            public_inputs,
            proving_key,
            encoding,
        } => {
            let config = config.with_overrides(proving_key, None);
            commands::generate_proof(
                &circuit,
                &config.proving_key,
                &witness,
                &proof,
                public_inputs.as_deref(),
                encoding,
            )?;
            Ok(ACCEPTED)
        }
        Command::VerifyProof {
            proof,
            public_inputs,
            verifying_key,
            encoding,
        } => {
            let config = config.with_overrides(None, verifying_key);
            let accepted = commands::verify_proof(
                &circuit,
                &config.verifying_key,
                &proof,
                &public_inputs,
                encoding,
            )?;
            if accepted {
                println!("accepted");
                Ok(ACCEPTED)
            } else {
                println!("rejected");
                Ok(REJECTED)
            }
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let code = match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            let code = exit_code(&e);
            if code == ENTROPY_FAILURE {
                tracing::error!("fatal: {:#}", e);
            }
            eprintln!("Error: {:#}", e);
            code
        }
    };
    process::exit(code);
}
