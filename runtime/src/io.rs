//! # I/O Collaborator Interfaces
//!
//! The engine never touches `std::io::stdin`/`stdout` directly; it talks to
//! an [`InputSource`] and an [`OutputSink`] instead. This is the seam that
//! lets the same `vm.rs` run under the `ippc` binary, under unit tests, and
//! under the WASM embedding (which captures output into a `String` rather
//! than a real file descriptor) — the same collaborator-trait shape the
//! reference runtime uses for its own pluggable backends.

use std::fs;
use std::io::{self, BufRead, Write};

use crate::error::InterpError;

/// Sequential line source for `READ`. Each call advances an internal
/// cursor; end-of-input yields `None` forever after.
pub trait InputSource {
    fn next_line(&mut self) -> Option<String>;
}

/// Reads lines from a file given on `--input`, loaded eagerly at
/// construction so an unreadable file fails fast with exit 11.
pub struct FileInput {
    lines: Vec<String>,
    cursor: usize,
}

impl FileInput {
    pub fn open(path: &str) -> Result<Self, InterpError> {
        let content = fs::read_to_string(path)
            .map_err(|e| InterpError::InputOpen(format!("cannot open input file '{}': {}", path, e)))?;
        Ok(Self {
            lines: content.lines().map(str::to_string).collect(),
            cursor: 0,
        })
    }
}

impl InputSource for FileInput {
    fn next_line(&mut self) -> Option<String> {
        let line = self.lines.get(self.cursor).cloned();
        self.cursor += 1;
        line
    }
}

/// Reads lines from real process stdin, used when no `--input` file is
/// given.
#[derive(Default)]
pub struct StdinInput;

impl InputSource for StdinInput {
    fn next_line(&mut self) -> Option<String> {
        let mut buf = String::new();
        match io::stdin().lock().read_line(&mut buf) {
            Ok(0) => None,
            Ok(_) => {
                if buf.ends_with('\n') {
                    buf.pop();
                    if buf.ends_with('\r') {
                        buf.pop();
                    }
                }
                Some(buf)
            }
            Err(_) => None,
        }
    }
}

/// An in-memory source used by tests and by callers that already hold the
/// input text as a string.
pub struct StringInput {
    lines: Vec<String>,
    cursor: usize,
}

impl StringInput {
    pub fn new(content: &str) -> Self {
        Self {
            lines: content.lines().map(str::to_string).collect(),
            cursor: 0,
        }
    }
}

impl InputSource for StringInput {
    fn next_line(&mut self) -> Option<String> {
        let line = self.lines.get(self.cursor).cloned();
        self.cursor += 1;
        line
    }
}

/// Destination for `WRITE`/`DPRINT` output.
pub trait OutputSink {
    fn write_str(&mut self, s: &str);
}

/// Writes to real process stdout/stderr.
pub struct StdSink;

impl OutputSink for StdSink {
    fn write_str(&mut self, s: &str) {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        let _ = lock.write_all(s.as_bytes());
    }
}

/// Writes to process stderr, used for `DPRINT`.
pub struct StdErrSink;

impl OutputSink for StdErrSink {
    fn write_str(&mut self, s: &str) {
        let stderr = io::stderr();
        let mut lock = stderr.lock();
        let _ = lock.write_all(s.as_bytes());
    }
}

/// Captures output into an owned `String`, for tests and the WASM
/// embedding.
#[derive(Default)]
pub struct StringSink {
    pub buffer: String,
}

impl OutputSink for StringSink {
    fn write_str(&mut self, s: &str) {
        self.buffer.push_str(s);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_input_advances_line_by_line() {
        let mut input = StringInput::new("one\ntwo\nthree");
        assert_eq!(input.next_line(), Some("one".to_string()));
        assert_eq!(input.next_line(), Some("two".to_string()));
        assert_eq!(input.next_line(), Some("three".to_string()));
        assert_eq!(input.next_line(), None);
        assert_eq!(input.next_line(), None);
    }

    #[test]
    fn string_sink_accumulates() {
        let mut sink = StringSink::default();
        sink.write_str("a");
        sink.write_str("b");
        assert_eq!(sink.buffer, "ab");
    }
}
