//! Writer decorators that authenticate every write.
//!
//! Each decorator binds one sink and one key for its lifetime. A call to
//! [`LogSigner::sign_record`] (or `io::Write::write`) turns the payload into
//! exactly one record:
//!
//! ```text
//! simple       <base64-hmac><payload>
//! identified   <base64-hmac> <label> <payload>
//! rsa          <base64-signature> <label> <payload>
//! ecdsa        <base64-r> <base64-s> <label> <payload>
//! ```
//!
//! The payload is copied verbatim. Records never depend on one another, so
//! each line can be verified on its own.
//!
//! # Concurrency
//!
//! The simple signer forwards a record as two sink writes (tag, then
//! payload). When several writers share one underlying sink (for example
//! cloned `Stdout` handles on different threads) those two writes can
//! interleave with other records. Serialize the calls (see
//! [`LineLogger`](crate::LineLogger)), use a sink with atomic multi-part
//! writes, or use one of the identified signers, which emit one composed
//! write per record.

// io::Write in terms of sign_record; shared by all four decorators.
macro_rules! impl_write_via_record {
    ($ty:ident) => {
        impl<W: std::io::Write + Send> std::io::Write for $ty<W> {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                crate::signer::LogSigner::sign_record(self, buf)?;
                Ok(buf.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }
    };
}
use impl_write_via_record;

mod identified;
mod identified_ecdsa;
mod identified_rsa;
mod simple;

use crate::error::SignerError;
use crate::secret::Secret;
use p256::ecdsa::SigningKey as EcdsaSigningKey;
use rsa::RsaPrivateKey;
use std::io::{self, Write};
use std::sync::Arc;

use identified::IdentifiedSigner;
use identified_ecdsa::IdentifiedEcdsaSigner;
use identified_rsa::IdentifiedRsaSigner;
use simple::SimpleSigner;

/// Authenticate a chunk of bytes and forward the record to a sink.
///
/// Every implementation is also an [`io::Write`]: `write` consumes the whole
/// buffer as one record and reports `buf.len()`. `flush` is a no-op; the
/// sink belongs to the caller. Formatting macros may split one message into
/// several `write` calls, so format the line first and write it once.
pub trait LogSigner: Write + Send {
    /// Authenticate `payload` and write its record to the sink.
    ///
    /// Returns the number of record bytes the sink accepted.
    fn sign_record(&mut self, payload: &[u8]) -> Result<usize, SignerError>;
}

/// HMAC-SHA-256 tag followed directly by the payload, no identity.
pub fn new_simple_signer<'a, W>(sink: W, secret: impl Into<Secret>) -> Box<dyn LogSigner + 'a>
where
    W: Write + Send + 'a,
{
    Box::new(SimpleSigner::new(sink, secret.into()))
}

/// HMAC-SHA-256 tag, identity label and payload in one record.
pub fn new_identified_signer<'a, W>(
    sink: W,
    label: impl Into<String>,
    secret: impl Into<Secret>,
) -> Box<dyn LogSigner + 'a>
where
    W: Write + Send + 'a,
{
    Box::new(IdentifiedSigner::new(sink, label.into(), secret.into()))
}

/// RSA PKCS#1 v1.5 signature, identity label and payload in one record.
pub fn new_identified_rsa_signer<'a, W>(
    sink: W,
    label: impl Into<String>,
    key: impl Into<Arc<RsaPrivateKey>>,
) -> Box<dyn LogSigner + 'a>
where
    W: Write + Send + 'a,
{
    Box::new(IdentifiedRsaSigner::new(sink, label.into(), key.into()))
}

/// ECDSA P-256 `r` and `s`, identity label and payload in one record.
pub fn new_identified_ecdsa_signer<'a, W>(
    sink: W,
    label: impl Into<String>,
    key: impl Into<Arc<EcdsaSigningKey>>,
) -> Box<dyn LogSigner + 'a>
where
    W: Write + Send + 'a,
{
    Box::new(IdentifiedEcdsaSigner::new(sink, label.into(), key.into()))
}

/// Write all of `buf`, keeping count of what the sink accepted.
///
/// Mirrors `Write::write_all` except that a failure reports the partial
/// count instead of discarding it. The sink is called at least once, even
/// for an empty `buf`.
fn forward<W: Write + ?Sized>(sink: &mut W, mut buf: &[u8]) -> Result<usize, SignerError> {
    let mut written = 0;
    loop {
        match sink.write(buf) {
            Ok(0) if !buf.is_empty() => {
                return Err(SignerError::Sink {
                    written,
                    source: io::Error::new(io::ErrorKind::WriteZero, "sink accepted no bytes"),
                });
            }
            Ok(n) => {
                written += n;
                buf = &buf[n..];
                if buf.is_empty() {
                    return Ok(written);
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(source) => return Err(SignerError::Sink { written, source }),
        }
    }
}

/// `<field> <field> ... <payload>` with single spaces and no trailing delimiter.
fn compose_record(fields: &[&str], payload: &[u8]) -> Vec<u8> {
    let len = fields.iter().map(|f| f.len() + 1).sum::<usize>() + payload.len();
    let mut record = Vec::with_capacity(len);
    for field in fields {
        record.extend_from_slice(field.as_bytes());
        record.push(b' ');
    }
    record.extend_from_slice(payload);
    record
}
