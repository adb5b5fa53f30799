//! Line iterator over a byte stream.

use std::io::{self, BufRead, BufReader, Read};
use std::iter::FusedIterator;

/// Configuration options for reading input.
///
/// # Examples
///
/// ```
/// use tsgap::streaming::StreamingConfig;
///
/// let config = StreamingConfig::new().with_buffer_size(128 * 1024);
/// assert_eq!(config.buffer_size, 128 * 1024);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct StreamingConfig {
    /// Read buffer size.
    ///
    /// Default: 64KB.
    pub buffer_size: usize,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            buffer_size: 64 * 1024, // 64KB
        }
    }
}

impl StreamingConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the buffer size.
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }
}

/// Lazily reads `\n`-delimited lines as raw bytes.
///
/// - `None` means end of input
/// - `Some(Err(_))` is a read failure; the iterator is finished afterwards
/// - only the `\n` is stripped, a preceding `\r` stays in the line
/// - a last line without a trailing newline is still yielded
pub struct LineReader<R: Read> {
    reader: BufReader<R>,
    bytes_read: u64,
    lines_read: usize,
    finished: bool,
}

impl<R: Read> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self::with_config(inner, StreamingConfig::default())
    }

    pub fn with_config(inner: R, config: StreamingConfig) -> Self {
        Self {
            reader: BufReader::with_capacity(config.buffer_size.max(1), inner),
            bytes_read: 0,
            lines_read: 0,
            finished: false,
        }
    }

    /// Returns the number of bytes consumed so far.
    pub fn bytes_processed(&self) -> u64 {
        self.bytes_read
    }

    pub fn lines_processed(&self) -> usize {
        self.lines_read
    }

    /// `true` if the next line can be served without touching the source.
    ///
    /// A line-buffered consumer flushes its output when this turns `false`,
    /// since the next read may block (e.g. `tail -f`).
    pub fn has_buffered_data(&self) -> bool {
        !self.reader.buffer().is_empty()
    }
}

impl<R: Read> Iterator for LineReader<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let mut line = Vec::new();
        match self.reader.read_until(b'\n', &mut line) {
            Ok(0) => {
                self.finished = true;
                None
            }
            Ok(bytes) => {
                self.bytes_read += bytes as u64;
                self.lines_read += 1;
                if line.last() == Some(&b'\n') {
                    line.pop();
                }
                Some(Ok(line))
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: Read> FusedIterator for LineReader<R> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn lines(input: &[u8]) -> Vec<Vec<u8>> {
        LineReader::new(Cursor::new(input.to_vec()))
            .collect::<io::Result<Vec<_>>>()
            .unwrap()
    }

    /// Yields some data, then fails.
    struct FailingReader {
        data: Cursor<Vec<u8>>,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.data.read(buf)?;
            if n == 0 {
                return Err(io::Error::other("disk on fire"));
            }
            Ok(n)
        }
    }

    #[test]
    fn test_splits_on_newline() {
        assert_eq!(lines(b"a\nb\n"), vec![b"a".to_vec(), b"b".to_vec()]);
    }

    #[test]
    fn test_final_line_without_newline() {
        assert_eq!(lines(b"a\nb"), vec![b"a".to_vec(), b"b".to_vec()]);
    }

    #[test]
    fn test_keeps_carriage_return_and_empty_lines() {
        assert_eq!(
            lines(b"a\r\n\nb"),
            vec![b"a\r".to_vec(), Vec::new(), b"b".to_vec()]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(lines(b"").is_empty());
    }

    #[test]
    fn test_non_utf8_passthrough() {
        assert_eq!(lines(b"\xff\xfe\n"), vec![b"\xff\xfe".to_vec()]);
    }

    #[test]
    fn test_read_error_then_fused() {
        let reader = FailingReader {
            data: Cursor::new(b"ok\n".to_vec()),
        };
        let mut iter = LineReader::new(reader);
        assert_eq!(iter.next().unwrap().unwrap(), b"ok".to_vec());
        assert!(iter.next().unwrap().is_err());
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_counters() {
        let mut iter = LineReader::new(Cursor::new(b"abc\nde\n".to_vec()));
        iter.by_ref().for_each(drop);
        assert_eq!(iter.bytes_processed(), 7);
        assert_eq!(iter.lines_processed(), 2);
    }

    #[test]
    fn test_small_buffer() {
        let config = StreamingConfig::new().with_buffer_size(2);
        let collected: Vec<_> = LineReader::with_config(Cursor::new(b"hello\nworld".to_vec()), config)
            .map(Result::unwrap)
            .collect();
        assert_eq!(collected, vec![b"hello".to_vec(), b"world".to_vec()]);
    }

    #[test]
    fn test_has_buffered_data() {
        let mut iter = LineReader::new(Cursor::new(b"a\nb\n".to_vec()));
        iter.next();
        assert!(iter.has_buffered_data());
        iter.next();
        assert!(!iter.has_buffered_data());
    }

    #[test]
    fn test_streaming_config_default() {
        assert_eq!(StreamingConfig::default().buffer_size, 64 * 1024);
    }
}
