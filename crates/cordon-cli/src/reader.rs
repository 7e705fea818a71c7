// SPDX-License-Identifier: Apache-2.0

//! Bounded line reading for stream sources.
//!
//! The core never reads an unbounded stream directly: every line handed to
//! ingestion must already have a known, finite length. This reader caps
//! each read at the configured input limit (plus room for the terminator),
//! and when a line blows past the cap it discards the remainder in bounded
//! chunks so the stream stays synchronized on line boundaries.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

/// Reads one newline-terminated line, reading at most `max_len + 2` bytes.
///
/// The trailing `\n` (and `\r`) is stripped. A returned line longer than
/// `max_len` means the source exceeded the limit; the caller's
/// `BoundedBuffer` will reject it, and the rest of the oversized line has
/// already been discarded here.
///
/// Returns `Ok(None)` at end of stream.
///
/// # Errors
///
/// Propagates I/O errors from the underlying stream.
pub async fn read_bounded_line<R>(
    reader: &mut R,
    max_len: usize,
) -> std::io::Result<Option<Vec<u8>>>
where
    R: AsyncBufRead + Unpin,
{
    let cap = max_len as u64 + 2;
    let mut line = Vec::new();

    let n = (&mut *reader).take(cap).read_until(b'\n', &mut line).await?;
    if n == 0 {
        return Ok(None);
    }

    if !line.ends_with(b"\n") && n as u64 == cap {
        discard_rest_of_line(reader).await?;
    }

    while line.last().is_some_and(|&b| b == b'\n' || b == b'\r') {
        line.pop();
    }

    Ok(Some(line))
}

/// Consumes the stream up to and including the next newline, in bounded
/// chunks, without keeping any of it.
async fn discard_rest_of_line<R>(reader: &mut R) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            return Ok(());
        }
        if let Some(pos) = available.iter().position(|&b| b == b'\n') {
            reader.consume(pos + 1);
            return Ok(());
        }
        let len = available.len();
        reader.consume(len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_lines_in_order() {
        let mut data: &[u8] = b"first\nsecond\n";
        assert_eq!(
            read_bounded_line(&mut data, 64).await.unwrap(),
            Some(b"first".to_vec())
        );
        assert_eq!(
            read_bounded_line(&mut data, 64).await.unwrap(),
            Some(b"second".to_vec())
        );
        assert_eq!(read_bounded_line(&mut data, 64).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_strips_crlf() {
        let mut data: &[u8] = b"line\r\n";
        assert_eq!(
            read_bounded_line(&mut data, 64).await.unwrap(),
            Some(b"line".to_vec())
        );
    }

    #[tokio::test]
    async fn test_last_line_without_newline() {
        let mut data: &[u8] = b"no newline";
        assert_eq!(
            read_bounded_line(&mut data, 64).await.unwrap(),
            Some(b"no newline".to_vec())
        );
    }

    #[tokio::test]
    async fn test_line_at_limit_passes() {
        let mut data: &[u8] = b"12345678\nnext\n";
        let line = read_bounded_line(&mut data, 8).await.unwrap().unwrap();
        assert_eq!(line, b"12345678");
    }

    #[tokio::test]
    async fn test_oversized_line_is_drained_to_boundary() {
        let long = format!("{}\nafter\n", "x".repeat(100));
        let mut data: &[u8] = long.as_bytes();

        let line = read_bounded_line(&mut data, 8).await.unwrap().unwrap();
        // More than max_len signals the overflow to the caller's buffer.
        assert!(line.len() > 8);
        assert!(line.len() <= 10);

        // The stream resumes at the next line, not mid-overflow.
        assert_eq!(
            read_bounded_line(&mut data, 8).await.unwrap(),
            Some(b"after".to_vec())
        );
    }

    #[tokio::test]
    async fn test_empty_line() {
        let mut data: &[u8] = b"\nx\n";
        assert_eq!(read_bounded_line(&mut data, 8).await.unwrap(), Some(Vec::new()));
        assert_eq!(
            read_bounded_line(&mut data, 8).await.unwrap(),
            Some(b"x".to_vec())
        );
    }
}
