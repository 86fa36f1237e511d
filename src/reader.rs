//! Line acquisition for the read-eval loop.

use std::collections::TryReserveError;
use std::io::{self, BufRead, StdinLock};
use thiserror::Error;

/// Capacity reserved for a fresh line before any input arrives.
pub const INITIAL_CAPACITY: usize = 1024;

/// Ways reading a line can fail to produce one.
#[derive(Debug, Error)]
pub enum ReadError {
    /// Input ended before any byte of a new line was read.
    #[error("end of input")]
    Eof,
    /// The underlying stream failed for a reason other than end of input.
    #[error("read error: {0}")]
    Io(#[from] io::Error),
    /// The line buffer could not grow.
    #[error("allocation error: {0}")]
    Alloc(#[from] TryReserveError),
}

impl ReadError {
    /// Whether the error means the interpreter has to give up.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ReadError::Eof)
    }
}

/// One input line without its terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    text: String,
}

impl Line {
    /// Build a line from raw bytes; invalid UTF-8 sequences become U+FFFD.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        };
        Self { text }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl From<&str> for Line {
    fn from(text: &str) -> Self {
        Self {
            text: text.to_owned(),
        }
    }
}

/// Reads newline-terminated lines from a buffered byte stream.
pub struct LineReader<R> {
    inner: R,
}

impl LineReader<StdinLock<'static>> {
    /// Reader over the process's standard input.
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock())
    }
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Read the next line.
    ///
    /// The trailing `\n` (and a `\r` right before it) is stripped. An empty
    /// line is returned as an empty [`Line`]; [`ReadError::Eof`] is only
    /// returned when the stream ends before any byte of a new line. A final
    /// line without terminator is returned as is.
    pub fn read_line(&mut self) -> Result<Line, ReadError> {
        let mut buf = Vec::new();
        buf.try_reserve(INITIAL_CAPACITY)?;
        let mut terminated = false;

        loop {
            let available = match self.inner.fill_buf() {
                Ok(available) => available,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            if available.is_empty() {
                break;
            }

            let (chunk, found) = match available.iter().position(|&b| b == b'\n') {
                Some(end) => (&available[..=end], true),
                None => (available, false),
            };
            // Vec reservations grow the capacity geometrically, never by the
            // exact shortfall.
            buf.try_reserve(chunk.len())?;
            buf.extend_from_slice(chunk);
            let used = chunk.len();
            self.inner.consume(used);

            if found {
                terminated = true;
                break;
            }
        }

        if buf.is_empty() && !terminated {
            return Err(ReadError::Eof);
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        Ok(Line::from_bytes(buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor, Read};

    fn reader(input: &[u8]) -> LineReader<Cursor<Vec<u8>>> {
        LineReader::new(Cursor::new(input.to_vec()))
    }

    #[test]
    fn test_reads_successive_lines() {
        let mut r = reader(b"ls -a\ncd /tmp\n");
        assert_eq!(r.read_line().unwrap().as_str(), "ls -a");
        assert_eq!(r.read_line().unwrap().as_str(), "cd /tmp");
        assert!(matches!(r.read_line(), Err(ReadError::Eof)));
    }

    #[test]
    fn test_empty_line_is_not_end_of_input() {
        let mut r = reader(b"\n");
        let line = r.read_line().unwrap();
        assert!(line.is_empty());
        assert!(matches!(r.read_line(), Err(ReadError::Eof)));
    }

    #[test]
    fn test_eof_on_empty_input() {
        let mut r = reader(b"");
        let err = r.read_line().unwrap_err();
        assert!(matches!(err, ReadError::Eof));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_unterminated_last_line_is_returned() {
        let mut r = reader(b"echo hi");
        assert_eq!(r.read_line().unwrap().as_str(), "echo hi");
        assert!(matches!(r.read_line(), Err(ReadError::Eof)));
    }

    #[test]
    fn test_crlf_terminator_is_stripped() {
        let mut r = reader(b"help\r\n");
        assert_eq!(r.read_line().unwrap().as_str(), "help");
    }

    #[test]
    fn test_long_line_grows_past_initial_capacity() {
        let long = "x".repeat(INITIAL_CAPACITY * 5 + 3);
        let input = format!("{long}\nnext\n");
        // A tiny buffer forces the line to arrive in many chunks.
        let mut r = LineReader::new(BufReader::with_capacity(7, Cursor::new(input.into_bytes())));
        let line = r.read_line().unwrap();
        assert_eq!(line.len(), long.len());
        assert_eq!(line.as_str(), long);
        assert_eq!(r.read_line().unwrap().as_str(), "next");
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let mut r = reader(b"cat \xff\n");
        assert_eq!(r.read_line().unwrap().as_str(), "cat \u{fffd}");
    }

    struct Flaky {
        interrupted: bool,
        fail: bool,
    }

    impl Read for Flaky {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::Error::from(io::ErrorKind::Interrupted));
            }
            if self.fail {
                return Err(io::Error::other("device gone"));
            }
            let data = b"pwd\n";
            buf[..data.len()].copy_from_slice(data);
            self.fail = true;
            Ok(data.len())
        }
    }

    #[test]
    fn test_interrupted_read_is_retried_and_io_error_is_fatal() {
        let mut r = LineReader::new(BufReader::new(Flaky {
            interrupted: false,
            fail: false,
        }));
        assert_eq!(r.read_line().unwrap().as_str(), "pwd");

        let err = r.read_line().unwrap_err();
        assert!(matches!(err, ReadError::Io(_)));
        assert!(err.is_fatal());
    }
}
