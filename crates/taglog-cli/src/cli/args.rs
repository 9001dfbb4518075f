use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use super::commands::keygen::KeygenArgs;
use super::commands::sign::SignArgs;

#[derive(Parser, Debug)]
#[command(name = "taglog", version, about = "Tamper-evident log records")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate an RSA or ECDSA P-256 keypair for signing
    Keygen(KeygenArgs),

    /// Sign stdin line by line, one record per line on stdout
    Sign(SignArgs),

    /// Print sample records from every signer variant
    Demo(DemoArgs),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum KeyAlgorithm {
    Rsa,
    Ecdsa,
}

#[derive(clap::Args, Debug)]
pub struct DemoArgs {
    /// RSA modulus size for the generated demo key
    #[arg(long, default_value_t = 2048)]
    pub rsa_bits: usize,

    /// Omit the timestamp before each line
    #[arg(long)]
    pub no_timestamps: bool,

    /// Write records here instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}
