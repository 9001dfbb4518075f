//! `taglog keygen` - Generate a keypair for the rsa/ecdsa signers.

use anyhow::{Context, Result};
use clap::Args;
use pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use std::fs;
use std::path::PathBuf;

use crate::cli::args::KeyAlgorithm;
use crate::exit_codes;
use taglog::keys;

#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Key algorithm
    #[arg(long, value_enum, default_value = "ecdsa")]
    pub algorithm: KeyAlgorithm,

    /// RSA modulus size in bits
    #[arg(long, default_value_t = keys::DEFAULT_RSA_BITS)]
    pub bits: usize,

    /// Output directory for keypair files
    #[arg(long, default_value = ".")]
    pub out: PathBuf,

    /// Force overwrite existing files
    #[arg(long, short)]
    pub force: bool,
}

pub fn cmd_keygen(args: KeygenArgs) -> i32 {
    match run_keygen(args) {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            exit_codes::RUNTIME_ERROR
        }
    }
}

struct EncodedKeypair {
    private_pem: String,
    public_pem: String,
    key_id: String,
    description: &'static str,
}

fn generate(args: &KeygenArgs) -> Result<EncodedKeypair> {
    match args.algorithm {
        KeyAlgorithm::Rsa => {
            let key = keys::generate_rsa_key(args.bits)?;
            Ok(EncodedKeypair {
                private_pem: key
                    .to_pkcs8_pem(LineEnding::LF)
                    .context("failed to encode private key as PKCS#8 PEM")?
                    .to_string(),
                public_pem: key
                    .to_public_key()
                    .to_public_key_pem(LineEnding::LF)
                    .context("failed to encode public key as SPKI PEM")?,
                key_id: keys::rsa_key_id(&key)?,
                description: "RSA",
            })
        }
        KeyAlgorithm::Ecdsa => {
            let key = keys::generate_ecdsa_key();
            Ok(EncodedKeypair {
                private_pem: key
                    .to_pkcs8_pem(LineEnding::LF)
                    .context("failed to encode private key as PKCS#8 PEM")?
                    .to_string(),
                public_pem: key
                    .verifying_key()
                    .to_public_key_pem(LineEnding::LF)
                    .context("failed to encode public key as SPKI PEM")?,
                key_id: keys::ecdsa_key_id(&key)?,
                description: "ECDSA P-256",
            })
        }
    }
}

fn run_keygen(args: KeygenArgs) -> Result<()> {
    // Ensure output directory exists
    if !args.out.exists() {
        fs::create_dir_all(&args.out)
            .with_context(|| format!("failed to create directory: {}", args.out.display()))?;
    }

    let private_path = args.out.join("private_key.pem");
    let public_path = args.out.join("public_key.pem");

    if !args.force {
        for path in [&private_path, &public_path] {
            if path.exists() {
                anyhow::bail!(
                    "key file already exists: {} (use --force to overwrite)",
                    path.display()
                );
            }
        }
    }

    let keypair = generate(&args)?;

    fs::write(&private_path, keypair.private_pem.as_bytes())
        .with_context(|| format!("failed to write private key: {}", private_path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = fs::Permissions::from_mode(0o600);
        fs::set_permissions(&private_path, perms)
            .with_context(|| format!("failed to set permissions on: {}", private_path.display()))?;
    }

    fs::write(&public_path, keypair.public_pem)
        .with_context(|| format!("failed to write public key: {}", public_path.display()))?;

    tracing::info!(algorithm = keypair.description, key_id = %keypair.key_id, "generated keypair");

    println!("Generated {} keypair:", keypair.description);
    println!(
        "  Private key: {} (PKCS#8 PEM, mode 0600)",
        private_path.display()
    );
    println!("  Public key:  {} (SPKI PEM)", public_path.display());
    println!();
    println!("key_id: {}", keypair.key_id);

    Ok(())
}
