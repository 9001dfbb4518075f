//! Authenticator primitives.
//!
//! Each function takes the exact payload bytes and returns base64 text
//! (standard alphabet, padded) ready to be placed in a record.
//!
//! | Function           | Algorithm                      | Deterministic |
//! |--------------------|--------------------------------|---------------|
//! | [`authenticate_hmac`] | HMAC-SHA-256                | yes           |
//! | [`sign_pkcs1v15`]  | RSA PKCS#1 v1.5 over SHA-256   | yes           |
//! | [`sign_ecdsa`]     | ECDSA P-256 over SHA-256       | no            |

mod ecdsa_p256;
mod hmac_sha256;
mod pkcs1v15;

pub use ecdsa_p256::{sign_ecdsa, EcdsaSignature};
pub use hmac_sha256::authenticate_hmac;
pub use pkcs1v15::sign_pkcs1v15;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

pub(crate) fn encode(bytes: impl AsRef<[u8]>) -> String {
    BASE64.encode(bytes)
}
