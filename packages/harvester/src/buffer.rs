//! Growable byte buffer.
//!
//! Used as the sink for HTTP response bodies and as scratch storage for
//! character data captured while parsing a response.

use std::io::{self, Read};

/// An owned, contiguous, growable sequence of bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteBuffer {
    data: Vec<u8>,
}

impl ByteBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `bytes` to the end of the buffer.
    pub fn append(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Clear the content, keeping the allocation for reuse.
    pub fn reset(&mut self) {
        self.data.clear();
    }

    /// Copy of the current content as text.
    ///
    /// Invalid UTF-8 sequences are replaced with U+FFFD.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Drain `reader` into the buffer until EOF or until more than `limit`
    /// bytes have been read in total.
    ///
    /// # Returns
    /// `Ok(true)` when the reader was exhausted within the limit,
    /// `Ok(false)` when the limit was exceeded (exactly `limit + 1` bytes
    /// were then appended and reading stopped).
    pub fn read_from<R: Read>(&mut self, reader: R, limit: u64) -> io::Result<bool> {
        let start = self.data.len();
        reader
            .take(limit.saturating_add(1))
            .read_to_end(&mut self.data)?;
        Ok((self.data.len() - start) as u64 <= limit)
    }
}

impl From<&[u8]> for ByteBuffer {
    fn from(bytes: &[u8]) -> Self {
        Self {
            data: bytes.to_vec(),
        }
    }
}

impl From<&str> for ByteBuffer {
    fn from(text: &str) -> Self {
        Self::from(text.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_empty() {
        let buffer = ByteBuffer::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.len(), 0);
        assert_eq!(buffer.to_string_lossy(), "");
    }

    #[test]
    fn test_append_preserves_content() {
        let mut buffer = ByteBuffer::new();
        buffer.append(b"abc");
        buffer.append(b"");
        buffer.append(b"def");

        assert_eq!(buffer.as_bytes(), b"abcdef");
        assert_eq!(buffer.len(), 6);
    }

    #[test]
    fn test_many_appends() {
        let mut buffer = ByteBuffer::new();
        for _ in 0..10_000 {
            buffer.append(b"xy");
        }
        assert_eq!(buffer.len(), 20_000);
        assert!(buffer.as_bytes().chunks(2).all(|c| c == b"xy"));
    }

    #[test]
    fn test_reset_then_reuse() {
        let mut buffer = ByteBuffer::from("first");
        buffer.reset();
        assert!(buffer.is_empty());

        buffer.append(b"second");
        assert_eq!(buffer.to_string_lossy(), "second");
    }

    #[test]
    fn test_to_string_does_not_mutate() {
        let buffer = ByteBuffer::from("token");
        assert_eq!(buffer.to_string_lossy(), "token");
        assert_eq!(buffer.to_string_lossy(), "token");
        assert_eq!(buffer.len(), 5);
    }

    #[test]
    fn test_to_string_lossy_on_invalid_utf8() {
        let buffer = ByteBuffer::from(&[b'a', 0xff, b'b'][..]);
        assert_eq!(buffer.to_string_lossy(), "a\u{fffd}b");
    }

    #[test]
    fn test_read_from_within_limit() {
        let input = vec![7u8; 3 * 8192 + 11];
        let mut buffer = ByteBuffer::new();

        let complete = buffer.read_from(&input[..], 1_000_000).unwrap();

        assert!(complete);
        assert_eq!(buffer.as_bytes(), &input[..]);
    }

    #[test]
    fn test_read_from_exceeds_limit() {
        let input = vec![1u8; 100];
        let mut buffer = ByteBuffer::new();

        let complete = buffer.read_from(&input[..], 10).unwrap();

        assert!(!complete);
        assert_eq!(buffer.len(), 11);
    }

    #[test]
    fn test_read_from_appends_to_existing_content() {
        let mut buffer = ByteBuffer::from("ab");

        assert!(buffer.read_from(&b"cdef"[..], 4).unwrap());
        assert!(!buffer.read_from(&b"ghijk"[..], 4).unwrap());
        assert_eq!(buffer.to_string_lossy(), "abcdefghijk");
    }

    #[test]
    fn test_read_from_exact_limit() {
        let input = vec![1u8; 10];
        let mut buffer = ByteBuffer::new();

        assert!(buffer.read_from(&input[..], 10).unwrap());
        assert_eq!(buffer.len(), 10);
    }
}
