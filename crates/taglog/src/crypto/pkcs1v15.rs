use super::encode;
use crate::error::SigningError;
use rand::rngs::OsRng;
use rsa::{Pkcs1v15Sign, RsaPrivateKey};
use sha2::{Digest, Sha256};

/// Sign the SHA-256 digest of `payload` with RSA PKCS#1 v1.5.
///
/// The signature itself is deterministic; the RNG only feeds blinding of the
/// private-key operation.
pub fn sign_pkcs1v15(payload: &[u8], key: &RsaPrivateKey) -> Result<String, SigningError> {
    let hashed = Sha256::digest(payload);
    let signature = key.sign_with_rng(&mut OsRng, Pkcs1v15Sign::new::<Sha256>(), &hashed)?;
    Ok(encode(signature))
}
