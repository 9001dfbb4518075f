//! Line-oriented logger front-end.
//!
//! Formats one message per call and hands it to the output in a single
//! `write`, so every log line becomes exactly one signed record. The output
//! can be swapped between calls to rotate keys or identities without
//! rebuilding the logger.

use chrono::Local;
use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Output type accepted by [`LineLogger`]; any signer qualifies.
pub type LogOutput = Box<dyn Write + Send>;

struct Inner {
    out: LogOutput,
    prefix: String,
    timestamps: bool,
}

/// Serializes log lines into one output.
///
/// Calls take `&self` and are serialized by an internal mutex, so a logger
/// shared between threads never interleaves records.
pub struct LineLogger {
    inner: Mutex<Inner>,
}

impl LineLogger {
    /// Logger with `YYYY/MM/DD HH:MM:SS ` timestamps and no prefix.
    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self {
            inner: Mutex::new(Inner {
                out: Box::new(out),
                prefix: String::new(),
                timestamps: true,
            }),
        }
    }

    pub fn with_prefix(self, prefix: impl Into<String>) -> Self {
        self.lock().prefix = prefix.into();
        self
    }

    pub fn with_timestamps(self, enabled: bool) -> Self {
        self.lock().timestamps = enabled;
        self
    }

    /// Replace the output and return the previous one.
    pub fn set_output(&self, out: impl Write + Send + 'static) -> LogOutput {
        std::mem::replace(&mut self.lock().out, Box::new(out))
    }

    /// Write `msg` as one line. A trailing newline is added if missing.
    pub fn log(&self, msg: impl fmt::Display) -> io::Result<()> {
        self.log_bytes(msg.to_string().as_bytes())
    }

    /// Write raw bytes as one line; `msg` need not be UTF-8.
    pub fn log_bytes(&self, msg: &[u8]) -> io::Result<()> {
        let mut inner = self.lock();

        let mut line = inner.prefix.clone().into_bytes();
        if inner.timestamps {
            let stamp = Local::now().format("%Y/%m/%d %H:%M:%S ").to_string();
            line.extend_from_slice(stamp.as_bytes());
        }
        line.extend_from_slice(msg);
        if line.last() != Some(&b'\n') {
            line.push(b'\n');
        }

        let n = inner.out.write(&line)?;
        if n < line.len() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("output accepted {n} of {} bytes", line.len()),
            ));
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Inner has no cross-field invariants, so a poisoned lock is still usable.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
