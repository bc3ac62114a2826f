//! Sigil Command Line Tool
//!
//! Provides commands for working with signable JSON payloads:
//! - canonicalize: Print the canonical string of a payload
//! - sign: Generate the HMAC token for a payload
//! - verify: Check a presented token against a payload and key
//!
//! Payloads are JSON objects; per-field exclusion and ordering rules come
//! from an optional policy file (a JSON map of field name to
//! `{"excluded": bool, "order": int}`).

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use sigil_canonical::{canonicalize, generate_token, is_token_valid, JsonSignable, SigningPolicy};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "sigil")]
#[command(version)]
#[command(about = "Sigil Command Line Tool - Canonicalize, sign, and verify JSON payloads")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the canonical string of a JSON payload
    #[command(about = "Print the canonical string used as signing input")]
    Canonicalize {
        /// Path to the JSON payload
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Path to a signing policy file
        #[arg(long)]
        policy: Option<PathBuf>,
    },

    /// Generate the HMAC token for a JSON payload
    #[command(about = "Generate the HMAC token for a payload")]
    Sign {
        /// Path to the JSON payload
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Shared secret key
        #[arg(long, short)]
        key: String,

        /// Path to a signing policy file
        #[arg(long)]
        policy: Option<PathBuf>,
    },

    /// Verify a presented token against a JSON payload
    #[command(about = "Verify a token against a payload and key")]
    Verify {
        /// Path to the JSON payload
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Shared secret key
        #[arg(long, short)]
        key: String,

        /// The token to verify
        #[arg(long, short)]
        token: String,

        /// Path to a signing policy file
        #[arg(long)]
        policy: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Canonicalize { file, policy } => handle_canonicalize(&file, policy.as_deref()),
        Commands::Sign { file, key, policy } => handle_sign(&file, &key, policy.as_deref()),
        Commands::Verify {
            file,
            key,
            token,
            policy,
        } => handle_verify(&file, &key, &token, policy.as_deref()),
    }
}

fn handle_canonicalize(file: &Path, policy: Option<&Path>) -> Result<()> {
    let signable = load_signable(file, policy)?;

    println!("{}", canonicalize(&signable));

    Ok(())
}

fn handle_sign(file: &Path, key: &str, policy: Option<&Path>) -> Result<()> {
    let signable = load_signable(file, policy)?;

    let token = generate_token(&signable, key).with_context(|| "Failed to generate token")?;
    println!("{}", token);

    Ok(())
}

fn handle_verify(file: &Path, key: &str, token: &str, policy: Option<&Path>) -> Result<()> {
    let signable = load_signable(file, policy)?;

    let valid = is_token_valid(token, &signable, key).with_context(|| "Failed to verify token")?;
    if !valid {
        bail!("Token is NOT valid for {}", file.display());
    }

    println!("Token is valid");

    Ok(())
}

fn load_signable(file: &Path, policy: Option<&Path>) -> Result<JsonSignable> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read file: {}", file.display()))?;

    let payload: serde_json::Value = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse {} as JSON", file.display()))?;

    let policy = load_policy(policy)?;

    JsonSignable::new(&payload, &policy)
        .with_context(|| format!("Payload {} is not signable", file.display()))
}

fn load_policy(policy: Option<&Path>) -> Result<SigningPolicy> {
    let Some(path) = policy else {
        return Ok(SigningPolicy::new());
    };

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read policy file: {}", path.display()))?;

    serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse {} as a signing policy", path.display()))
}
