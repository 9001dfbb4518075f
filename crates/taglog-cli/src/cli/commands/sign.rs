//! `taglog sign` - Sign stdin line by line.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::exit_codes;
use taglog::{LineLogger, SignerConfig, SignerError, SignerKind};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Simple,
    Identified,
    Rsa,
    Ecdsa,
}

impl From<KindArg> for SignerKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Simple => SignerKind::Simple,
            KindArg::Identified => SignerKind::Identified,
            KindArg::Rsa => SignerKind::Rsa,
            KindArg::Ecdsa => SignerKind::Ecdsa,
        }
    }
}

#[derive(Args, Debug)]
pub struct SignArgs {
    /// Signer configuration (YAML)
    #[arg(long, short, conflicts_with_all = ["kind", "label", "secret_env", "key"])]
    pub config: Option<PathBuf>,

    /// Signer variant (when not using --config)
    #[arg(long, value_enum, required_unless_present = "config")]
    pub kind: Option<KindArg>,

    /// Identity label written into every record
    #[arg(long)]
    pub label: Option<String>,

    /// Environment variable holding the HMAC secret
    #[arg(long)]
    pub secret_env: Option<String>,

    /// Private key file (PEM) for rsa/ecdsa
    #[arg(long, short)]
    pub key: Option<PathBuf>,

    /// Text placed before every line (inside the signed payload)
    #[arg(long, default_value = "")]
    pub prefix: String,

    /// Prepend a local timestamp to every line (inside the signed payload)
    #[arg(long)]
    pub timestamps: bool,
}

impl SignArgs {
    fn signer_config(&self) -> Result<SignerConfig> {
        if let Some(path) = &self.config {
            return SignerConfig::from_file(path);
        }
        let kind = self.kind.context("--kind or --config is required")?;
        let config = SignerConfig {
            kind: kind.into(),
            label: self.label.clone(),
            secret: None,
            secret_env: self.secret_env.clone(),
            key_path: self.key.clone(),
        };
        config.validate()?;
        Ok(config)
    }
}

pub fn cmd_sign(args: SignArgs) -> i32 {
    let logger = match build_logger(&args) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("error: {e:#}");
            return exit_codes::CONFIG_ERROR;
        }
    };
    match sign_stdin(&logger) {
        Ok(lines) => {
            tracing::debug!(lines, "signed input");
            exit_codes::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            runtime_exit_code(&e)
        }
    }
}

fn build_logger(args: &SignArgs) -> Result<LineLogger> {
    let config = args.signer_config()?;
    let signer = config.build(io::stdout())?;
    Ok(LineLogger::new(signer)
        .with_prefix(args.prefix.clone())
        .with_timestamps(args.timestamps))
}

fn sign_stdin(logger: &LineLogger) -> Result<usize> {
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = Vec::new();
    let mut count = 0;

    // Lines are raw bytes; nothing here requires UTF-8.
    loop {
        line.clear();
        let n = reader
            .read_until(b'\n', &mut line)
            .with_context(|| format!("failed to read line {} from stdin", count + 1))?;
        if n == 0 {
            break;
        }
        logger
            .log_bytes(&line)
            .with_context(|| format!("failed to write record for line {}", count + 1))?;
        count += 1;
    }

    io::stdout().flush().context("failed to flush stdout")?;
    Ok(count)
}

/// Exit code for a failed run: signing failures keep the signer's own code.
fn runtime_exit_code(err: &anyhow::Error) -> i32 {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<io::Error>())
        .find_map(|io_err| io_err.get_ref()?.downcast_ref::<SignerError>())
        .map_or(exit_codes::RUNTIME_ERROR, SignerError::exit_code)
}
