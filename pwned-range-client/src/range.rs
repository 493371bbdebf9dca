//! Parsing of range API response bodies.
//!
//! A body holds one `SUFFIX:COUNT` record per line, where `SUFFIX` is the 35
//! hex characters of a SHA1 hash following the requested prefix. The API
//! serves uppercase suffixes terminated by `\r\n`, but neither case nor line
//! ending is relied on here.

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

/// Initial capacity of the line buffer: 35 suffix chars, a colon, a count and CRLF.
const LINE_CAPACITY: usize = 64;

/// Longest line kept in memory. A valid record is at most 35 + 1 + 20 + 2 bytes.
pub const MAX_LINE_LEN: usize = 256;

/// One parsed line of a range response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeEntry<'a> {
    pub suffix: &'a str,
    pub count: u64,
}

impl<'a> RangeEntry<'a> {
    /// Parses a single line, with or without its line terminator.
    ///
    /// Returns `None` for anything that is not exactly two colon-separated
    /// fields with a non-negative integer count. Surrounding ASCII whitespace
    /// around the count is tolerated.
    pub fn parse(line: &'a [u8]) -> Option<Self> {
        let line = line.strip_suffix(b"\n").unwrap_or(line);
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        let line = std::str::from_utf8(line).ok()?;

        let (suffix, count) = line.split_once(':')?;
        if count.contains(':') {
            return None;
        }
        let count = count.trim_ascii().parse().ok()?;

        Some(Self { suffix, count })
    }

    /// Case-insensitive comparison of this entry's suffix with `suffix`.
    #[inline]
    pub fn matches(&self, suffix: &str) -> bool {
        self.suffix.eq_ignore_ascii_case(suffix)
    }
}

/// Scans a range response for `suffix` and returns its count.
///
/// The body is consumed one line at a time through a single reused buffer
/// of at most [`MAX_LINE_LEN`] bytes, so memory stays bounded whatever the
/// body holds. Malformed lines are skipped, and lines longer than the cap
/// are discarded without being buffered. The first well-formed line with a
/// matching suffix wins; if there is none the frequency is 0.
pub async fn find_frequency<R>(mut reader: R, suffix: &str) -> io::Result<u64>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = Vec::with_capacity(LINE_CAPACITY);
    loop {
        line.clear();
        if (&mut reader).take(MAX_LINE_LEN as u64).read_until(b'\n', &mut line).await? == 0 {
            return Ok(0);
        }

        if line.len() == MAX_LINE_LEN && line.last() != Some(&b'\n') {
            skip_line(&mut reader).await?;
            continue;
        }

        if let Some(entry) = RangeEntry::parse(&line)
            && entry.matches(suffix)
        {
            return Ok(entry.count);
        }
    }
}

/// Discards input up to and including the next `\n`, or to the end.
async fn skip_line<R>(reader: &mut R) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let (used, done) = {
            let buf = reader.fill_buf().await?;
            match buf.iter().position(|&b| b == b'\n') {
                Some(i) => (i + 1, true),
                None => (buf.len(), buf.is_empty()),
            }
        };
        reader.consume(used);
        if done {
            return Ok(());
        }
    }
}
