use super::{forward, LogSigner};
use crate::crypto::authenticate_hmac;
use crate::error::SignerError;
use crate::secret::Secret;
use std::io::Write;

pub(crate) struct SimpleSigner<W> {
    sink: W,
    secret: Secret,
}

impl<W: Write + Send> SimpleSigner<W> {
    pub(crate) fn new(sink: W, secret: Secret) -> Self {
        Self { sink, secret }
    }
}

impl<W: Write + Send> LogSigner for SimpleSigner<W> {
    fn sign_record(&mut self, payload: &[u8]) -> Result<usize, SignerError> {
        let tag = authenticate_hmac(payload, self.secret.expose())?;

        // Two sink writes; the payload is never sent after a failed tag write.
        let tag_written = forward(&mut self.sink, tag.as_bytes()).inspect_err(|e| {
            tracing::warn!(variant = "simple", error = %e, "tag write failed");
        })?;
        let payload_written = match forward(&mut self.sink, payload) {
            Ok(n) => n,
            Err(SignerError::Sink { written, source }) => {
                tracing::warn!(variant = "simple", error = %source, "payload write failed");
                return Err(SignerError::Sink {
                    written: tag_written + written,
                    source,
                });
            }
            Err(e) => return Err(e),
        };

        let total = tag_written + payload_written;
        tracing::trace!(variant = "simple", record_len = total, "forwarded record");
        Ok(total)
    }
}

super::impl_write_via_record!(SimpleSigner);
