//! Console output that survives raw mode.
//!
//! Raw mode turns off the terminal's output post-processing, so a bare `\n`
//! moves the cursor down without returning to column 0.  [`CrlfWriter`]
//! expands every `\n` into `\r\n`; the binary hands it to
//! `tracing_subscriber` and prints the operator banner through it.

use std::io::{self, Write};

/// Wraps a writer and rewrites `\n` as `\r\n`.
#[derive(Debug)]
pub struct CrlfWriter<W> {
    inner: W,
}

impl<W: Write> CrlfWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

/// `CrlfWriter` over stdout.  Usable directly as a `tracing_subscriber`
/// `MakeWriter`.
pub fn stdout() -> CrlfWriter<io::Stdout> {
    CrlfWriter::new(io::stdout())
}

impl<W: Write> Write for CrlfWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut start = 0;
        for (i, &byte) in buf.iter().enumerate() {
            if byte == b'\n' {
                self.inner.write_all(&buf[start..i])?;
                self.inner.write_all(b"\r\n")?;
                start = i + 1;
            }
        }
        self.inner.write_all(&buf[start..])?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
