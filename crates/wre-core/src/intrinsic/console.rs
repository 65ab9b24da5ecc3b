//! Host console
//!
//! The output and input streams intrinsics talk to. Input is consumed as
//! whitespace-delimited tokens; reads block until a token or end of stream.

use std::io::{self, BufRead, Write};

pub trait Console {
    /// Write raw bytes to the output stream
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Next whitespace-delimited token, or `None` at end of input
    fn next_token(&mut self) -> io::Result<Option<Vec<u8>>>;

    fn flush(&mut self) -> io::Result<()>;
}

impl<C: Console + ?Sized> Console for &mut C {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).write_bytes(bytes)
    }

    fn next_token(&mut self) -> io::Result<Option<Vec<u8>>> {
        (**self).next_token()
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

/// Console over any buffered reader and writer
#[derive(Debug)]
pub struct StreamConsole<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> StreamConsole<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        StreamConsole { reader, writer }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Skip leading whitespace; false once the stream is exhausted
    fn skip_whitespace(&mut self) -> io::Result<bool> {
        loop {
            let buf = self.reader.fill_buf()?;
            if buf.is_empty() {
                return Ok(false);
            }
            let skip = buf.iter().take_while(|b| is_space(**b)).count();
            let more = skip < buf.len();
            self.reader.consume(skip);
            if more {
                return Ok(true);
            }
        }
    }
}

/// C `isspace`: ASCII whitespace plus vertical tab
fn is_space(byte: u8) -> bool {
    byte.is_ascii_whitespace() || byte == 0x0B
}

impl<R: BufRead, W: Write> Console for StreamConsole<R, W> {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.writer.write_all(bytes)
    }

    fn next_token(&mut self) -> io::Result<Option<Vec<u8>>> {
        if !self.skip_whitespace()? {
            return Ok(None);
        }
        let mut token = Vec::new();
        loop {
            let buf = self.reader.fill_buf()?;
            if buf.is_empty() {
                break;
            }
            let len = buf.iter().take_while(|b| !is_space(**b)).count();
            token.extend_from_slice(&buf[..len]);
            let done = len < buf.len();
            self.reader.consume(len);
            if done {
                break;
            }
        }
        Ok(Some(token))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor};

    #[test]
    fn tokens_split_on_any_whitespace() {
        let mut console = StreamConsole::new(Cursor::new("  12\t-3\n\nabc  "), Vec::new());
        assert_eq!(console.next_token().unwrap(), Some(b"12".to_vec()));
        assert_eq!(console.next_token().unwrap(), Some(b"-3".to_vec()));
        assert_eq!(console.next_token().unwrap(), Some(b"abc".to_vec()));
        assert_eq!(console.next_token().unwrap(), None);
    }

    #[test]
    fn vertical_tab_separates_tokens() {
        let mut console = StreamConsole::new(Cursor::new("1\x0B2\x0B"), Vec::new());
        assert_eq!(console.next_token().unwrap(), Some(b"1".to_vec()));
        assert_eq!(console.next_token().unwrap(), Some(b"2".to_vec()));
        assert_eq!(console.next_token().unwrap(), None);
    }

    #[test]
    fn tokens_span_buffer_refills() {
        let reader = BufReader::with_capacity(2, Cursor::new("hello world"));
        let mut console = StreamConsole::new(reader, Vec::new());
        assert_eq!(console.next_token().unwrap(), Some(b"hello".to_vec()));
        assert_eq!(console.next_token().unwrap(), Some(b"world".to_vec()));
    }

    #[test]
    fn writes_reach_the_writer() {
        let mut console = StreamConsole::new(Cursor::new(""), Vec::new());
        console.write_bytes(b"ok").unwrap();
        assert_eq!(console.writer(), b"ok");
    }
}
