//! Line-atomic sink for response bodies.
//!
//! Every body is written together with its trailing newline while holding
//! the lock, so concurrent units never split each other's lines. Line order
//! across units is whatever order the units finish in.

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

pub struct OutputSink<W> {
    inner: Mutex<W>,
}

impl OutputSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> OutputSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: Mutex::new(writer),
        }
    }

    /// Write `body` verbatim followed by `\n`, then flush.
    pub fn write_body(&self, body: &[u8]) -> io::Result<()> {
        // A unit that panicked mid-write leaves at worst a partial line; keep going.
        let mut writer = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        writer.write_all(body)?;
        writer.write_all(b"\n")?;
        writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}
