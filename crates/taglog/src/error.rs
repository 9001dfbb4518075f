//! Error types for record signing.

use std::io;
use thiserror::Error;

/// Failure to compute an authenticator.
///
/// Always raised before any byte of the record reaches the sink.
#[derive(Debug, Error)]
pub enum SigningError {
    /// The HMAC key was rejected. HMAC accepts keys of any length, so this
    /// only surfaces if the MAC implementation changes underneath us.
    #[error("HMAC key rejected: {0}")]
    Mac(#[from] hmac::digest::InvalidLength),

    /// RSA PKCS#1 v1.5 signing failed (key too small for the digest, bad key).
    #[error("RSA PKCS#1 v1.5 signing failed: {0}")]
    Rsa(#[from] rsa::Error),

    /// ECDSA signing failed.
    #[error("ECDSA signing failed: {0}")]
    Ecdsa(#[from] p256::ecdsa::Error),
}

/// Error returned by [`LogSigner::sign_record`](crate::LogSigner::sign_record).
#[derive(Debug, Error)]
pub enum SignerError {
    /// The authenticator could not be produced; nothing was written.
    #[error("signing failed: {0}")]
    Signing(#[from] SigningError),

    /// The sink rejected a write after accepting `written` bytes of the record.
    #[error("sink write failed after {written} bytes: {source}")]
    Sink {
        written: usize,
        #[source]
        source: io::Error,
    },
}

impl SignerError {
    /// Bytes of the record the sink accepted before the failure.
    pub fn bytes_written(&self) -> usize {
        match self {
            Self::Signing(_) => 0,
            Self::Sink { written, .. } => *written,
        }
    }

    /// Returns true if the failure happened before anything was written.
    pub fn is_signing(&self) -> bool {
        matches!(self, Self::Signing(_))
    }

    /// Suggested exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Signing(_) => 2,
            Self::Sink { .. } => 1,
        }
    }
}

// Sink errors keep their original kind so callers of io::Write see what the sink said.
// Signing errors stay recoverable with `get_ref()?.downcast_ref::<SignerError>()`.
impl From<SignerError> for io::Error {
    fn from(err: SignerError) -> Self {
        match err {
            SignerError::Sink { source, .. } => source,
            signing @ SignerError::Signing(_) => io::Error::other(signing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_error_converts_verbatim() {
        let err = SignerError::Sink {
            written: 7,
            source: io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"),
        };
        assert_eq!(err.bytes_written(), 7);
        assert!(!err.is_signing());

        let io_err: io::Error = err.into();
        assert_eq!(io_err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(io_err.to_string(), "pipe closed");
    }

    #[test]
    fn test_signing_error_reports_nothing_written() {
        let err = SignerError::from(SigningError::Rsa(rsa::Error::MessageTooLong));
        assert!(err.is_signing());
        assert_eq!(err.bytes_written(), 0);
        assert_eq!(err.exit_code(), 2);

        let io_err: io::Error = err.into();
        assert_eq!(io_err.kind(), io::ErrorKind::Other);
        assert!(io_err.to_string().contains("RSA PKCS#1 v1.5"));

        let inner = io_err
            .get_ref()
            .and_then(|e| e.downcast_ref::<SignerError>())
            .unwrap();
        assert_eq!(inner.exit_code(), 2);
    }
}
