//! Tamper-evident log records.
//!
//! Wrap any [`std::io::Write`] sink in a signer and every chunk written
//! through it is forwarded as a record carrying an authenticator over that
//! exact chunk:
//!
//! ```no_run
//! use std::io::Write;
//!
//! let mut log = taglog::new_identified_signer(std::io::stdout(), "Author.1", "demo secret");
//! log.write_all(b"You can trust that Author.1 wrote this.\n").unwrap();
//! ```
//!
//! Only production of records lives here; verification is left to readers
//! holding the secret or public key.

pub mod config;
pub mod crypto;
pub mod error;
pub mod keys;
pub mod logger;
pub mod secret;
pub mod signer;

// Convenience re-exports
pub use config::{SignerConfig, SignerKind};
pub use error::{SignerError, SigningError};
pub use logger::{LineLogger, LogOutput};
pub use secret::Secret;
pub use signer::{
    new_identified_ecdsa_signer, new_identified_rsa_signer, new_identified_signer,
    new_simple_signer, LogSigner,
};

// Re-export key types so callers don't need matching crate versions.
pub use p256::ecdsa::SigningKey as EcdsaSigningKey;
pub use rsa::RsaPrivateKey;
