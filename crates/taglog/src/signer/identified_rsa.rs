use super::{compose_record, forward, LogSigner};
use crate::crypto::sign_pkcs1v15;
use crate::error::SignerError;
use rsa::RsaPrivateKey;
use std::io::Write;
use std::sync::Arc;

pub(crate) struct IdentifiedRsaSigner<W> {
    sink: W,
    label: String,
    key: Arc<RsaPrivateKey>,
}

impl<W: Write + Send> IdentifiedRsaSigner<W> {
    pub(crate) fn new(sink: W, label: String, key: Arc<RsaPrivateKey>) -> Self {
        Self { sink, label, key }
    }
}

impl<W: Write + Send> LogSigner for IdentifiedRsaSigner<W> {
    fn sign_record(&mut self, payload: &[u8]) -> Result<usize, SignerError> {
        let signature = sign_pkcs1v15(payload, &self.key).inspect_err(|e| {
            tracing::warn!(variant = "rsa", label = %self.label, error = %e, "signing failed");
        })?;
        let record = compose_record(&[signature.as_str(), self.label.as_str()], payload);

        let written = forward(&mut self.sink, &record).inspect_err(|e| {
            tracing::warn!(variant = "rsa", label = %self.label, error = %e, "record write failed");
        })?;
        tracing::trace!(
            variant = "rsa",
            label = %self.label,
            record_len = written,
            "forwarded record"
        );
        Ok(written)
    }
}

super::impl_write_via_record!(IdentifiedRsaSigner);
