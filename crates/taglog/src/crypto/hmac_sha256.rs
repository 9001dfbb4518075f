use super::encode;
use crate::error::SigningError;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Compute the base64 HMAC-SHA-256 tag of `payload` under `secret`.
pub fn authenticate_hmac(payload: &[u8], secret: &[u8]) -> Result<String, SigningError> {
    let mut mac = HmacSha256::new_from_slice(secret)?;
    mac.update(payload);
    Ok(encode(mac.finalize().into_bytes()))
}
