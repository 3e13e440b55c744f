//! Line splitting over chunked process output.
//!
//! Process output arrives in arbitrarily sized chunks that may cut a line
//! (or a multi-byte character) anywhere. [`LineBuffer`] accumulates chunks
//! and hands out complete lines only; [`ProcessLines`] drives a
//! [`ToolProcess`] through it as a lazy, consume-once line sequence.
//!
//! Bytes after the last `\n` never form a line, including at end of stream.

use super::ToolProcess;
use crate::error::CoreResult;

/// Read size used when pulling chunks from a process.
const CHUNK_SIZE: usize = 8 * 1024;

/// Accumulates byte chunks and yields complete `\n`-terminated lines.
///
/// A trailing `\r` is stripped from each line. Invalid UTF-8 is replaced
/// rather than rejected.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
    // bytes of `pending` already known to contain no terminator
    scanned: usize,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a chunk to the buffer.
    pub fn push(&mut self, chunk: &[u8]) {
        self.pending.extend_from_slice(chunk);
    }

    /// Removes and returns the next complete line, if one is buffered.
    pub fn next_line(&mut self) -> Option<String> {
        let offset = self.pending[self.scanned..]
            .iter()
            .position(|&b| b == b'\n');

        match offset {
            Some(offset) => {
                let end = self.scanned + offset;
                let line: Vec<u8> = self.pending.drain(..=end).collect();
                self.scanned = 0;
                Some(decode_line(&line[..end]))
            }
            None => {
                self.scanned = self.pending.len();
                None
            }
        }
    }

    /// Clears the buffer, returning the number of unterminated bytes that
    /// were discarded.
    pub fn finish(&mut self) -> usize {
        self.scanned = 0;
        std::mem::take(&mut self.pending).len()
    }
}

fn decode_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

/// Iterator over the complete lines of a process's watched stream.
///
/// Reading stops at the first read error, which is yielded once.
pub struct ProcessLines<'a, P: ToolProcess> {
    process: &'a mut P,
    buffer: LineBuffer,
    chunk: Vec<u8>,
    state: ReadState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadState {
    Reading,
    Ended,
    Failed,
}

impl<'a, P: ToolProcess> ProcessLines<'a, P> {
    pub fn new(process: &'a mut P) -> Self {
        Self {
            process,
            buffer: LineBuffer::new(),
            chunk: vec![0; CHUNK_SIZE],
            state: ReadState::Reading,
        }
    }
}

impl<P: ToolProcess> Iterator for ProcessLines<'_, P> {
    type Item = CoreResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.state {
                ReadState::Failed => return None,
                ReadState::Ended => {
                    let dropped = self.buffer.finish();
                    if dropped > 0 {
                        log::trace!("Discarding {} bytes after the last newline", dropped);
                    }
                    return None;
                }
                ReadState::Reading => {}
            }

            if let Some(line) = self.buffer.next_line() {
                return Some(Ok(line));
            }

            match self.process.read_chunk(&mut self.chunk) {
                Ok(0) => self.state = ReadState::Ended,
                Ok(n) => self.buffer.push(&self.chunk[..n]),
                Err(e) => {
                    self.state = ReadState::Failed;
                    return Some(Err(e));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::mocks::MockToolProcess;

    #[test]
    fn test_partial_lines_wait_for_terminator() {
        let mut buffer = LineBuffer::new();
        buffer.push(b"freeze_st");
        assert_eq!(buffer.next_line(), None);
        buffer.push(b"art: 1.5\nfreeze_");
        assert_eq!(buffer.next_line().as_deref(), Some("freeze_start: 1.5"));
        assert_eq!(buffer.next_line(), None);
        buffer.push(b"end: 2.0\n");
        assert_eq!(buffer.next_line().as_deref(), Some("freeze_end: 2.0"));
        assert_eq!(buffer.next_line(), None);
        assert_eq!(buffer.finish(), 0);
    }

    #[test]
    fn test_several_lines_in_one_chunk_and_crlf() {
        let mut buffer = LineBuffer::new();
        buffer.push(b"a\r\nb\n\nc");
        assert_eq!(buffer.next_line().as_deref(), Some("a"));
        assert_eq!(buffer.next_line().as_deref(), Some("b"));
        assert_eq!(buffer.next_line().as_deref(), Some(""));
        assert_eq!(buffer.next_line(), None);
        assert_eq!(buffer.finish(), 1);
        assert_eq!(buffer.finish(), 0);
    }

    #[test]
    fn test_multibyte_character_split_across_chunks() {
        let mut buffer = LineBuffer::new();
        let text = "été\n".as_bytes();
        buffer.push(&text[..1]);
        assert_eq!(buffer.next_line(), None);
        buffer.push(&text[1..]);
        assert_eq!(buffer.next_line().as_deref(), Some("été"));
    }

    #[test]
    fn test_process_lines_across_tiny_chunks() {
        let mut process = MockToolProcess::from_text("one\ntwo\nthree\n", 2, 0);
        let lines: Vec<String> = ProcessLines::new(&mut process)
            .collect::<CoreResult<_>>()
            .unwrap();
        assert_eq!(lines, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_unterminated_tail_is_not_a_line() {
        let mut process = MockToolProcess::from_text("one\ntwo\nthr", 2, 0);
        let lines: Vec<String> = ProcessLines::new(&mut process)
            .collect::<CoreResult<_>>()
            .unwrap();
        assert_eq!(lines, vec!["one", "two"]);
    }

    #[test]
    fn test_process_lines_stop_after_read_error() {
        let mut process = MockToolProcess::from_text("one\ntw", 64, 0).with_read_error();
        let mut lines = ProcessLines::new(&mut process);
        assert_eq!(lines.next().unwrap().unwrap(), "one");
        assert!(lines.next().unwrap().is_err());
        assert!(lines.next().is_none());
    }
}
