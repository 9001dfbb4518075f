//! Signer configuration.
//!
//! ```yaml
//! kind: identified        # simple | identified | rsa | ecdsa
//! label: Author.1
//! secret_env: TAGLOG_SECRET
//! ```
//!
//! ```yaml
//! kind: ecdsa
//! key_path: keys/private_key.pem
//! # label defaults to the key id (sha256:...)
//! ```

use crate::keys;
use crate::secret::Secret;
use crate::signer::{
    new_identified_ecdsa_signer, new_identified_rsa_signer, new_identified_signer,
    new_simple_signer, LogSigner,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Which decorator to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignerKind {
    Simple,
    Identified,
    Rsa,
    Ecdsa,
}

impl SignerKind {
    fn uses_secret(self) -> bool {
        matches!(self, Self::Simple | Self::Identified)
    }
}

impl fmt::Display for SignerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Simple => "simple",
            Self::Identified => "identified",
            Self::Rsa => "rsa",
            Self::Ecdsa => "ecdsa",
        };
        f.write_str(name)
    }
}

/// Declarative description of one signer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignerConfig {
    pub kind: SignerKind,

    /// Identity label written into every record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Inline HMAC secret (dev/testing only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,

    /// Environment variable holding the HMAC secret.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_env: Option<String>,

    /// Private key PEM for rsa/ecdsa.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_path: Option<PathBuf>,
}

impl SignerConfig {
    /// Load signer configuration from YAML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read signer config: {}", path.display()))?;
        let mut config = Self::from_yaml(&content)
            .with_context(|| format!("invalid signer config: {}", path.display()))?;

        // Key paths are relative to the config file.
        if let (Some(key_path), Some(dir)) = (&config.key_path, path.parent()) {
            if key_path.is_relative() {
                config.key_path = Some(dir.join(key_path));
            }
        }
        Ok(config)
    }

    /// Parse and validate signer configuration from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).context("failed to parse signer YAML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let kind = self.kind;
        if kind.uses_secret() {
            match (&self.secret, &self.secret_env) {
                (Some(_), Some(_)) => {
                    anyhow::bail!("{kind} signer: set only one of `secret` and `secret_env`")
                }
                (None, None) => anyhow::bail!("{kind} signer requires `secret` or `secret_env`"),
                _ => {}
            }
            if self.key_path.is_some() {
                anyhow::bail!("{kind} signer does not use `key_path`");
            }
        } else {
            if self.key_path.is_none() {
                anyhow::bail!("{kind} signer requires `key_path`");
            }
            if self.secret.is_some() || self.secret_env.is_some() {
                anyhow::bail!("{kind} signer does not use `secret`/`secret_env`");
            }
        }

        match (kind, &self.label) {
            (SignerKind::Simple, Some(_)) => {
                anyhow::bail!("simple signer records carry no label")
            }
            (SignerKind::Identified, None) => anyhow::bail!("identified signer requires `label`"),
            (_, Some(label)) if label.is_empty() || label.contains(char::is_whitespace) => {
                anyhow::bail!("label must be non-empty and contain no whitespace: {label:?}")
            }
            _ => Ok(()),
        }
    }

    fn load_secret(&self) -> Result<Secret> {
        match (&self.secret, &self.secret_env) {
            (Some(inline), _) => Ok(Secret::from(inline.as_str())),
            (None, Some(var)) => Secret::from_env(var),
            (None, None) => anyhow::bail!("{} signer requires a secret", self.kind),
        }
    }

    fn key_path(&self) -> Result<&Path> {
        self.key_path
            .as_deref()
            .with_context(|| format!("{} signer requires `key_path`", self.kind))
    }

    /// Resolve key material and build the signer around `sink`.
    pub fn build<'a, W>(&self, sink: W) -> Result<Box<dyn LogSigner + 'a>>
    where
        W: Write + Send + 'a,
    {
        self.validate()?;

        let signer = match self.kind {
            SignerKind::Simple => new_simple_signer(sink, self.load_secret()?),
            SignerKind::Identified => {
                let label = self.label.clone().context("identified signer requires `label`")?;
                new_identified_signer(sink, label, self.load_secret()?)
            }
            SignerKind::Rsa => {
                let key = keys::load_rsa_private_key_pem(self.key_path()?)?;
                let label = match &self.label {
                    Some(label) => label.clone(),
                    None => keys::rsa_key_id(&key)?,
                };
                new_identified_rsa_signer(sink, label, Arc::new(key))
            }
            SignerKind::Ecdsa => {
                let key = keys::load_ecdsa_private_key_pem(self.key_path()?)?;
                let label = match &self.label {
                    Some(label) => label.clone(),
                    None => keys::ecdsa_key_id(&key)?,
                };
                new_identified_ecdsa_signer(sink, label, Arc::new(key))
            }
        };

        tracing::debug!(kind = %self.kind, label = ?self.label, "built signer");
        Ok(signer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkcs8::{EncodePrivateKey, LineEnding};

    #[test]
    fn test_parse_identified_yaml() {
        let yaml = r#"
kind: identified
label: Author.1
secret: key
"#;
        let config = SignerConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.kind, SignerKind::Identified);
        assert_eq!(config.label.as_deref(), Some("Author.1"));

        let mut out = Vec::new();
        {
            let mut signer = config.build(&mut out).unwrap();
            signer.sign_record(b"hello").unwrap();
        }
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "kwezuRXvtRcf8U2MtV+8x5jGwO8UVtZt7RpqpyOli3s= Author.1 hello"
        );
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let err = SignerConfig::from_yaml("kind: dsa\nkey_path: k.pem\n").unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse signer YAML"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(SignerConfig::from_yaml("kind: simple\nsecret: x\npassword: y\n").is_err());
    }

    #[test]
    fn test_validation_rules() {
        let cases = [
            ("kind: simple\n", "requires `secret`"),
            ("kind: simple\nsecret: a\nsecret_env: B\n", "only one of"),
            ("kind: simple\nsecret: a\nlabel: x\n", "no label"),
            ("kind: identified\nsecret: a\n", "requires `label`"),
            ("kind: identified\nsecret: a\nlabel: two words\n", "no whitespace"),
            ("kind: rsa\n", "requires `key_path`"),
            ("kind: ecdsa\nkey_path: k.pem\nsecret: a\n", "does not use"),
            ("kind: identified\nlabel: a\nsecret: a\nkey_path: k.pem\n", "does not use"),
        ];
        for (yaml, expected) in cases {
            let err = SignerConfig::from_yaml(yaml).unwrap_err();
            assert!(
                err.to_string().contains(expected),
                "{yaml:?}: expected {expected:?}, got {err}"
            );
        }
    }

    #[test]
    fn test_ecdsa_label_defaults_to_key_id() {
        let dir = tempfile::tempdir().unwrap();
        let key = keys::generate_ecdsa_key();
        let pem = key.to_pkcs8_pem(LineEnding::LF).unwrap();
        fs::write(dir.path().join("ec.pem"), pem.as_bytes()).unwrap();
        let config_path = dir.path().join("signer.yaml");
        fs::write(&config_path, "kind: ecdsa\nkey_path: ec.pem\n").unwrap();

        let config = SignerConfig::from_file(&config_path).unwrap();
        assert_eq!(config.key_path, Some(dir.path().join("ec.pem")));

        let mut out = Vec::new();
        {
            let mut signer = config.build(&mut out).unwrap();
            signer.sign_record(b"hello").unwrap();
        }
        let record = String::from_utf8(out).unwrap();
        let fields: Vec<&str> = record.splitn(4, ' ').collect();
        assert_eq!(fields[2], keys::ecdsa_key_id(&key).unwrap());
        assert_eq!(fields[3], "hello");
    }

    #[test]
    fn test_missing_secret_env_fails_at_build() {
        let config = SignerConfig::from_yaml(
            "kind: simple\nsecret_env: TAGLOG_TEST_SECRET_THAT_IS_NEVER_SET\n",
        )
        .unwrap();
        let err = config.build(Vec::new()).err().unwrap();
        assert!(err.to_string().contains("TAGLOG_TEST_SECRET_THAT_IS_NEVER_SET"));
    }
}
