use super::encode;
use crate::error::SigningError;
use p256::ecdsa::signature::hazmat::RandomizedPrehashSigner;
use p256::ecdsa::{Signature, SigningKey};
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

/// Base64 `r` and `s` components of an ECDSA signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcdsaSignature {
    pub r: String,
    pub s: String,
}

/// Sign the SHA-256 digest of `payload` with ECDSA P-256.
///
/// Every call draws a fresh nonce contribution from the OS RNG, so two
/// signatures over the same payload differ. `r` and `s` are encoded as
/// minimal big-endian integers.
///
/// With a valid `SigningKey` and a 32-byte digest this only fails if the
/// drawn nonce yields a zero `r` or `s`, which has negligible probability
/// and cannot be forced from outside. The error is still propagated.
pub fn sign_ecdsa(payload: &[u8], key: &SigningKey) -> Result<EcdsaSignature, SigningError> {
    let hashed = Sha256::digest(payload);
    let signature: Signature = key.sign_prehash_with_rng(&mut OsRng, &hashed)?;
    let (r, s) = signature.split_bytes();

    Ok(EcdsaSignature {
        r: encode(trim_leading_zeros(&r)),
        s: encode(trim_leading_zeros(&s)),
    })
}

fn trim_leading_zeros(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
    use p256::ecdsa::signature::Verifier;
    use p256::FieldBytes;
    use proptest::prelude::*;

    fn field_bytes(b64: &str) -> FieldBytes {
        let raw = BASE64.decode(b64).unwrap();
        assert!(raw.len() <= 32);
        let mut padded = [0u8; 32];
        padded[32 - raw.len()..].copy_from_slice(&raw);
        FieldBytes::from(padded)
    }

    fn verifies(payload: &[u8], sig: &EcdsaSignature, key: &SigningKey) -> bool {
        let signature = Signature::from_scalars(field_bytes(&sig.r), field_bytes(&sig.s)).unwrap();
        key.verifying_key().verify(payload, &signature).is_ok()
    }

    #[test]
    fn test_trim_leading_zeros() {
        assert_eq!(trim_leading_zeros(&[0, 0, 1, 0]), &[1, 0]);
        assert_eq!(trim_leading_zeros(&[5]), &[5]);
        assert!(trim_leading_zeros(&[0, 0]).is_empty());
    }

    #[test]
    fn test_signature_verifies() {
        let key = SigningKey::random(&mut OsRng);
        let sig = sign_ecdsa(b"hello", &key).unwrap();
        assert!(verifies(b"hello", &sig, &key));
        assert!(!verifies(b"hello!", &sig, &key));
    }

    #[test]
    fn test_wrong_key_fails() {
        let key = SigningKey::random(&mut OsRng);
        let other = SigningKey::random(&mut OsRng);
        let sig = sign_ecdsa(b"hello", &key).unwrap();
        assert!(!verifies(b"hello", &sig, &other));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_repeated_signatures_differ_and_verify(
            payload in proptest::collection::vec(any::<u8>(), 0..256),
        ) {
            let key = SigningKey::random(&mut OsRng);
            let first = sign_ecdsa(&payload, &key).unwrap();
            let second = sign_ecdsa(&payload, &key).unwrap();

            prop_assert_ne!(&first, &second);
            prop_assert!(verifies(&payload, &first, &key));
            prop_assert!(verifies(&payload, &second, &key));
        }
    }
}
