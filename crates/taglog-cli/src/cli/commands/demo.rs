//! `taglog demo` - Walk through every signer variant.
//!
//! One logger is created over the identified signer and its output is
//! swapped to rotate identity (`Author.1` to `Author.2`) and then algorithm
//! (ECDSA, RSA), the way a long-running process would rotate keys.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, Write};
use std::sync::Arc;

use crate::cli::args::DemoArgs;
use crate::exit_codes;
use taglog::{
    keys, new_identified_ecdsa_signer, new_identified_rsa_signer, new_identified_signer,
    new_simple_signer, LineLogger, Secret,
};

const DEMO_SECRET: &str = "This is a demo secret";

pub fn cmd_demo(args: DemoArgs) -> i32 {
    match run_demo(args) {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            exit_codes::RUNTIME_ERROR
        }
    }
}

/// Hands out independent handles onto the same destination.
enum Destination {
    Stdout,
    File(File),
}

impl Destination {
    fn handle(&self) -> Result<Box<dyn Write + Send>> {
        match self {
            Self::Stdout => Ok(Box::new(io::stdout())),
            Self::File(file) => Ok(Box::new(
                file.try_clone().context("failed to clone output file handle")?,
            )),
        }
    }
}

fn section(title: &str) {
    eprintln!("{title}");
}

fn run_demo(args: DemoArgs) -> Result<()> {
    let destination = match &args.out {
        Some(path) => Destination::File(
            File::create(path)
                .with_context(|| format!("failed to create output: {}", path.display()))?,
        ),
        None => Destination::Stdout,
    };
    let timestamps = !args.no_timestamps;
    let secret = Secret::from(DEMO_SECRET);

    let ecdsa_key = Arc::new(keys::generate_ecdsa_key());
    let rsa_key = Arc::new(keys::generate_rsa_key(args.rsa_bits)?);

    let simple = LineLogger::new(new_simple_signer(destination.handle()?, secret.clone()))
        .with_timestamps(timestamps);
    let ident = LineLogger::new(new_identified_signer(
        destination.handle()?,
        "Author.1",
        secret.clone(),
    ))
    .with_timestamps(timestamps);

    section("SimpleSigner");
    simple.log("Everyone shares a secret.")?;
    simple.log("Useful in very simple scenarios.")?;
    simple.log("But long lived processes are going to need key rotation.")?;

    section("IdentifiedSigner");
    ident.log("You can like totally trust that Author.1 created this entry.")?;
    ident.log("You can be sure that nobody modified it or spoofed the identity.")?;
    ident.set_output(new_identified_signer(
        destination.handle()?,
        "Author.2",
        secret,
    ));
    ident.log(
        "Even better, when you rotate and change the key version you can still read the whole log.",
    )?;

    section("IdentifiedEcdsaSigner");
    ident.set_output(new_identified_ecdsa_signer(
        destination.handle()?,
        "generated-ECDSA",
        ecdsa_key,
    ));
    ident.log("This uses an ECDSA signature. Pretty fancy.")?;

    section("IdentifiedRsaSigner");
    ident.set_output(new_identified_rsa_signer(
        destination.handle()?,
        "generated-rsa",
        rsa_key,
    ));
    ident.log(format_args!(
        "This example uses a {} bit RSA key and creates a PKCS1v15 signature.",
        args.rsa_bits
    ))?;
    ident.log("This generates a really long signature and takes a long time.")?;

    destination.handle()?.flush().context("failed to flush output")?;
    Ok(())
}
