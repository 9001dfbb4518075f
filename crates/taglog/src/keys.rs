//! Asymmetric key loading, generation and identification.
//!
//! Private keys are read from PEM: RSA as PKCS#8 or PKCS#1, ECDSA P-256 as
//! PKCS#8 or SEC1. A key id is `sha256:<lowercase-hex>` over the SPKI DER of
//! the public key, the same for both algorithms.

use anyhow::{Context, Result};
use p256::ecdsa::SigningKey as EcdsaSigningKey;
use pkcs8::{DecodePrivateKey, EncodePublicKey};
use rand::rngs::OsRng;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::RsaPrivateKey;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// Default RSA modulus size for generated keys.
pub const DEFAULT_RSA_BITS: usize = 2048;

/// Compute key_id from SPKI-encoded public key bytes.
///
/// Returns `sha256:<lowercase-hex>`.
pub fn compute_key_id(spki_bytes: &[u8]) -> String {
    let hash = Sha256::digest(spki_bytes);
    format!("sha256:{}", hex::encode(hash))
}

pub fn rsa_key_id(key: &RsaPrivateKey) -> Result<String> {
    let spki = key
        .to_public_key()
        .to_public_key_der()
        .context("failed to encode RSA public key as SPKI DER")?;
    Ok(compute_key_id(spki.as_bytes()))
}

pub fn ecdsa_key_id(key: &EcdsaSigningKey) -> Result<String> {
    let spki = key
        .verifying_key()
        .to_public_key_der()
        .context("failed to encode ECDSA public key as SPKI DER")?;
    Ok(compute_key_id(spki.as_bytes()))
}

/// Parse an RSA private key from PKCS#8 (`PRIVATE KEY`) or PKCS#1 (`RSA PRIVATE KEY`) PEM.
pub fn parse_rsa_private_key_pem(pem: &str) -> Result<RsaPrivateKey> {
    if pem.contains("BEGIN RSA PRIVATE KEY") {
        RsaPrivateKey::from_pkcs1_pem(pem).context("failed to parse PKCS#1 RSA private key")
    } else {
        RsaPrivateKey::from_pkcs8_pem(pem).context("failed to parse PKCS#8 RSA private key")
    }
}

/// Parse a P-256 private key from PKCS#8 (`PRIVATE KEY`) or SEC1 (`EC PRIVATE KEY`) PEM.
pub fn parse_ecdsa_private_key_pem(pem: &str) -> Result<EcdsaSigningKey> {
    if pem.contains("BEGIN EC PRIVATE KEY") {
        let secret = p256::SecretKey::from_sec1_pem(pem)
            .context("failed to parse SEC1 P-256 private key")?;
        Ok(EcdsaSigningKey::from(secret))
    } else {
        EcdsaSigningKey::from_pkcs8_pem(pem).context("failed to parse PKCS#8 P-256 private key")
    }
}

pub fn load_rsa_private_key_pem(path: &Path) -> Result<RsaPrivateKey> {
    let pem = fs::read_to_string(path)
        .with_context(|| format!("failed to read private key: {}", path.display()))?;
    parse_rsa_private_key_pem(&pem).with_context(|| format!("invalid key file: {}", path.display()))
}

pub fn load_ecdsa_private_key_pem(path: &Path) -> Result<EcdsaSigningKey> {
    let pem = fs::read_to_string(path)
        .with_context(|| format!("failed to read private key: {}", path.display()))?;
    parse_ecdsa_private_key_pem(&pem)
        .with_context(|| format!("invalid key file: {}", path.display()))
}

pub fn generate_rsa_key(bits: usize) -> Result<RsaPrivateKey> {
    RsaPrivateKey::new(&mut OsRng, bits)
        .with_context(|| format!("failed to generate {bits}-bit RSA key"))
}

pub fn generate_ecdsa_key() -> EcdsaSigningKey {
    EcdsaSigningKey::random(&mut OsRng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkcs8::{EncodePrivateKey, LineEnding};
    use rsa::pkcs1::EncodeRsaPrivateKey;

    #[test]
    fn test_key_id_lowercase_hex() {
        let key = generate_ecdsa_key();
        let key_id = ecdsa_key_id(&key).unwrap();

        assert!(key_id.starts_with("sha256:"));
        let hex_part = &key_id[7..];
        assert_eq!(hex_part.len(), 64);
        assert!(
            hex_part
                .chars()
                .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()),
            "key_id hex must be lowercase: {}",
            key_id
        );
    }

    #[test]
    fn test_ecdsa_pkcs8_and_sec1_roundtrip() {
        let key = generate_ecdsa_key();

        let pkcs8 = key.to_pkcs8_pem(LineEnding::LF).unwrap();
        let parsed = parse_ecdsa_private_key_pem(&pkcs8).unwrap();
        assert_eq!(parsed.to_bytes(), key.to_bytes());

        let sec1 = p256::SecretKey::from(&key).to_sec1_pem(LineEnding::LF).unwrap();
        let parsed = parse_ecdsa_private_key_pem(&sec1).unwrap();
        assert_eq!(ecdsa_key_id(&parsed).unwrap(), ecdsa_key_id(&key).unwrap());
    }

    #[test]
    fn test_rsa_pkcs8_and_pkcs1_from_file() {
        let key = generate_rsa_key(1024).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let pkcs8_path = dir.path().join("pkcs8.pem");
        fs::write(&pkcs8_path, key.to_pkcs8_pem(LineEnding::LF).unwrap().as_bytes()).unwrap();
        let pkcs1_path = dir.path().join("pkcs1.pem");
        fs::write(&pkcs1_path, key.to_pkcs1_pem(LineEnding::LF).unwrap().as_bytes()).unwrap();

        let from_pkcs8 = load_rsa_private_key_pem(&pkcs8_path).unwrap();
        let from_pkcs1 = load_rsa_private_key_pem(&pkcs1_path).unwrap();
        assert_eq!(from_pkcs8, key);
        assert_eq!(from_pkcs1, key);
        assert_eq!(rsa_key_id(&from_pkcs1).unwrap(), rsa_key_id(&key).unwrap());
    }

    #[test]
    fn test_wrong_algorithm_is_rejected() {
        let ec = generate_ecdsa_key().to_pkcs8_pem(LineEnding::LF).unwrap();
        assert!(parse_rsa_private_key_pem(&ec).is_err());
    }

    #[test]
    fn test_missing_file_mentions_path() {
        let err = load_ecdsa_private_key_pem(Path::new("/nonexistent/key.pem")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/key.pem"));
    }
}
