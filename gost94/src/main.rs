use anyhow::{Context, Result};
// CLI parsing
use clap::error::ErrorKind;
use clap::{Parser, Subcommand, ValueEnum};
// Library imports
use gost94::{
    constants::{DEFAULT_MR_ROUNDS, DEFAULT_P_BITS, DEFAULT_Q_BITS},
    keys::generate_private_key_with,
    serialization::{
        parse_private, parse_public, parse_signature, serialize_private, serialize_public,
        serialize_signature,
    },
    signature::{sign_with, verify_with},
    GenerationConfig, HashAlgorithm,
};
// Logging
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

// Exit code for a well-formed signature that does not verify
const EXIT_INVALID_SIGNATURE: u8 = 2;
// Exit code for usage, I/O and parse errors
const EXIT_FAILURE: u8 = 1;

#[derive(Parser)]
#[command(name = "gost94")]
#[command(version)]
#[command(about = "GOST R 34.10-94 style digital signatures", long_about = None)]
#[command(arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate domain parameters and a key pair
    Keygen {
        /// Output path for the private key
        private_key: PathBuf,

        /// Output path for the public key
        public_key: PathBuf,

        /// Bit length of the modulus p
        #[arg(long, default_value_t = DEFAULT_P_BITS)]
        p_bits: usize,

        /// Bit length of the subgroup order q
        #[arg(long, default_value_t = DEFAULT_Q_BITS)]
        q_bits: usize,

        /// Miller-Rabin rounds per primality test
        #[arg(long, default_value_t = DEFAULT_MR_ROUNDS, value_parser = clap::value_parser!(u32).range(1..))]
        rounds: u32,

        /// Give up after this many candidates per search loop
        #[arg(long)]
        max_attempts: Option<u64>,
    },

    /// Sign a file with a private key
    Sign {
        /// Private key file
        private_key: PathBuf,

        /// File to sign
        message: PathBuf,

        /// Output path for the signature
        signature: PathBuf,

        /// Message digest
        #[arg(long, value_enum, default_value_t = HashArg::Sha256)]
        hash: HashArg,
    },

    /// Verify a signature with a public key (exit code 2 when invalid)
    Verify {
        /// Public key file
        public_key: PathBuf,

        /// Signed file
        message: PathBuf,

        /// Signature file
        signature: PathBuf,

        /// Message digest
        #[arg(long, value_enum, default_value_t = HashArg::Sha256)]
        hash: HashArg,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum HashArg {
    Sha256,
    #[value(name = "sha3-256")]
    Sha3_256,
}

impl From<HashArg> for HashAlgorithm {
    fn from(arg: HashArg) -> Self {
        match arg {
            HashArg::Sha256 => HashAlgorithm::Sha256,
            HashArg::Sha3_256 => HashAlgorithm::Sha3_256,
        }
    }
}

enum Outcome {
    Done,
    InvalidSignature,
}

fn main() -> ExitCode {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp
                | ErrorKind::DisplayVersion
                | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => ExitCode::SUCCESS,
                _ => ExitCode::from(EXIT_FAILURE),
            };
        }
    };

    let result = match cli.command {
        Commands::Keygen {
            private_key,
            public_key,
            p_bits,
            q_bits,
            rounds,
            max_attempts,
        } => {
            let config = GenerationConfig::default()
                .with_bits(p_bits, q_bits)
                .with_rounds(rounds)
                .with_max_attempts(max_attempts);
            handle_keygen(&private_key, &public_key, &config)
        }
        Commands::Sign {
            private_key,
            message,
            signature,
            hash,
        } => handle_sign(&private_key, &message, &signature, hash.into()),
        Commands::Verify {
            public_key,
            message,
            signature,
            hash,
        } => handle_verify(&public_key, &message, &signature, hash.into()),
    };

    match result {
        Ok(Outcome::Done) => ExitCode::SUCCESS,
        Ok(Outcome::InvalidSignature) => ExitCode::from(EXIT_INVALID_SIGNATURE),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

// --- Keygen Mode ---
fn handle_keygen(private_path: &Path, public_path: &Path, config: &GenerationConfig) -> Result<Outcome> {
    info!("--- Keygen Mode ---");
    let mut rng = rand::thread_rng();
    let key = generate_private_key_with(&mut rng, config).context("Failed to generate key pair")?;

    // Render both files before writing either
    let private_text = serialize_private(&key);
    let public_text = serialize_public(&key.public_key());

    write_text(private_path, &private_text)?;
    write_text(public_path, &public_text)?;
    info!(
        "Keys written: private = {}, public = {}",
        private_path.display(),
        public_path.display()
    );
    println!("keys generated");
    Ok(Outcome::Done)
}

// --- Sign Mode ---
fn handle_sign(
    private_path: &Path,
    message_path: &Path,
    signature_path: &Path,
    hash: HashAlgorithm,
) -> Result<Outcome> {
    info!("--- Sign Mode ---");
    let key_text = read_text(private_path)?;
    let key = parse_private(&key_text)
        .with_context(|| format!("Failed to parse private key '{}'", private_path.display()))?;
    key.check_consistency()
        .with_context(|| format!("Private key '{}' is corrupted", private_path.display()))?;
    debug!("Loaded private key: {:?}", key);

    let mut rng = rand::thread_rng();
    key.params
        .validate(&mut rng, DEFAULT_MR_ROUNDS)
        .with_context(|| format!("Private key '{}' has invalid parameters", private_path.display()))?;

    let message = read_bytes(message_path)?;
    let signature = sign_with(&message, &key, &mut rng, hash, &GenerationConfig::default())
        .context("Failed to sign message")?;

    write_text(signature_path, &serialize_signature(&signature))?;
    info!("Signature written to {}", signature_path.display());
    println!("signature written");
    Ok(Outcome::Done)
}

// --- Verify Mode ---
fn handle_verify(
    public_path: &Path,
    message_path: &Path,
    signature_path: &Path,
    hash: HashAlgorithm,
) -> Result<Outcome> {
    info!("--- Verify Mode ---");
    let key_text = read_text(public_path)?;
    let key = parse_public(&key_text)
        .with_context(|| format!("Failed to parse public key '{}'", public_path.display()))?;
    key.params
        .validate(&mut rand::thread_rng(), DEFAULT_MR_ROUNDS)
        .with_context(|| format!("Public key '{}' has invalid parameters", public_path.display()))?;
    let message = read_bytes(message_path)?;
    let signature_text = read_text(signature_path)?;
    let signature = parse_signature(&signature_text)
        .with_context(|| format!("Failed to parse signature '{}'", signature_path.display()))?;
    debug!("Parsed signature: {:?}", signature);

    if verify_with(&message, &key, &signature, hash) {
        println!("signature is valid");
        Ok(Outcome::Done)
    } else {
        println!("signature is INVALID");
        Ok(Outcome::InvalidSignature)
    }
}

// --- Helper Functions for File Access ---

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("cannot open file: {}", path.display()))
}

fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("cannot open file: {}", path.display()))
}

fn write_text(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("cannot write file: {}", path.display()))
}
