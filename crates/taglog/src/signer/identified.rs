use super::{compose_record, forward, LogSigner};
use crate::crypto::authenticate_hmac;
use crate::error::SignerError;
use crate::secret::Secret;
use std::io::Write;

pub(crate) struct IdentifiedSigner<W> {
    sink: W,
    label: String,
    secret: Secret,
}

impl<W: Write + Send> IdentifiedSigner<W> {
    pub(crate) fn new(sink: W, label: String, secret: Secret) -> Self {
        Self {
            sink,
            label,
            secret,
        }
    }
}

impl<W: Write + Send> LogSigner for IdentifiedSigner<W> {
    fn sign_record(&mut self, payload: &[u8]) -> Result<usize, SignerError> {
        let tag = authenticate_hmac(payload, self.secret.expose())?;
        let record = compose_record(&[tag.as_str(), self.label.as_str()], payload);

        let written = forward(&mut self.sink, &record).inspect_err(|e| {
            tracing::warn!(
                variant = "identified",
                label = %self.label,
                error = %e,
                "record write failed"
            );
        })?;
        tracing::trace!(
            variant = "identified",
            label = %self.label,
            record_len = written,
            "forwarded record"
        );
        Ok(written)
    }
}

super::impl_write_via_record!(IdentifiedSigner);

#[cfg(test)]
mod tests {
    use super::super::testing::ScriptedSink;
    use super::*;

    #[test]
    fn test_tag_label_payload_layout() {
        let mut signer = IdentifiedSigner::new(Vec::new(), "Author.1".into(), Secret::from("key"));
        let n = signer.sign_record(b"hello").unwrap();

        let expected = "kwezuRXvtRcf8U2MtV+8x5jGwO8UVtZt7RpqpyOli3s= Author.1 hello";
        assert_eq!(String::from_utf8(signer.sink).unwrap(), expected);
        assert_eq!(n, expected.len());
    }

    #[test]
    fn test_label_is_not_authenticated() {
        // The tag covers the payload only; relabelling does not change it.
        let mut a = IdentifiedSigner::new(Vec::new(), "Author.1".into(), Secret::from("key"));
        let mut b = IdentifiedSigner::new(Vec::new(), "Author.2".into(), Secret::from("key"));
        a.sign_record(b"hello").unwrap();
        b.sign_record(b"hello").unwrap();
        assert_eq!(a.sink[..44], b.sink[..44]);
    }

    #[test]
    fn test_payload_is_verbatim() {
        let payload = b"spaces  tabs\t\"quotes\" \xff\xfe\n";
        let mut signer = IdentifiedSigner::new(Vec::new(), "k".into(), Secret::from("key"));
        signer.sign_record(payload).unwrap();
        assert!(signer.sink.ends_with(payload));
    }

    #[test]
    fn test_single_sink_write() {
        let mut signer =
            IdentifiedSigner::new(ScriptedSink::new(), "k".into(), Secret::from("key"));
        signer.sign_record(b"hello").unwrap();
        assert_eq!(signer.sink.calls, 1);
    }

    #[test]
    fn test_sink_failure_propagates() {
        let mut signer =
            IdentifiedSigner::new(ScriptedSink::failing_on(1), "k".into(), Secret::from("key"));
        let err = signer.sign_record(b"hello").unwrap_err();
        assert!(matches!(err, SignerError::Sink { written: 0, .. }));
    }
}
