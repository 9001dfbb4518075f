use super::{compose_record, forward, LogSigner};
use crate::crypto::sign_ecdsa;
use crate::error::SignerError;
use p256::ecdsa::SigningKey;
use std::io::Write;
use std::sync::Arc;

pub(crate) struct IdentifiedEcdsaSigner<W> {
    sink: W,
    label: String,
    key: Arc<SigningKey>,
}

impl<W: Write + Send> IdentifiedEcdsaSigner<W> {
    pub(crate) fn new(sink: W, label: String, key: Arc<SigningKey>) -> Self {
        Self { sink, label, key }
    }
}

impl<W: Write + Send> LogSigner for IdentifiedEcdsaSigner<W> {
    fn sign_record(&mut self, payload: &[u8]) -> Result<usize, SignerError> {
        let signature = sign_ecdsa(payload, &self.key).inspect_err(|e| {
            tracing::warn!(variant = "ecdsa", label = %self.label, error = %e, "signing failed");
        })?;
        let record = compose_record(
            &[signature.r.as_str(), signature.s.as_str(), self.label.as_str()],
            payload,
        );

        let written = forward(&mut self.sink, &record).inspect_err(|e| {
            tracing::warn!(
                variant = "ecdsa",
                label = %self.label,
                error = %e,
                "record write failed"
            );
        })?;
        tracing::trace!(
            variant = "ecdsa",
            label = %self.label,
            record_len = written,
            "forwarded record"
        );
        Ok(written)
    }
}

super::impl_write_via_record!(IdentifiedEcdsaSigner);
