//! Shared HMAC secret.

use anyhow::{Context, Result};
use std::fmt;
use std::sync::Arc;

/// Symmetric key material for the HMAC signers.
///
/// Cloning shares the bytes; signers never copy or mutate them.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(Arc<[u8]>);

impl Secret {
    pub fn new(bytes: impl AsRef<[u8]>) -> Self {
        Self(Arc::from(bytes.as_ref()))
    }

    /// Read the secret from an environment variable.
    pub fn from_env(var: &str) -> Result<Self> {
        let value = std::env::var(var)
            .with_context(|| format!("secret environment variable {var} is not set"))?;
        if value.is_empty() {
            anyhow::bail!("secret environment variable {var} is empty");
        }
        Ok(Self::new(value))
    }

    pub fn expose(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret([REDACTED; {} bytes])", self.0.len())
    }
}

impl From<&[u8]> for Secret {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes)
    }
}

impl From<Vec<u8>> for Secret {
    fn from(bytes: Vec<u8>) -> Self {
        Self(Arc::from(bytes))
    }
}

impl From<&str> for Secret {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Secret {
    fn from(s: String) -> Self {
        Self::from(s.into_bytes())
    }
}
