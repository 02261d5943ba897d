//! SIMD-accelerated line and field scanning using memchr
//!
//! The synchronization stream is line-oriented and every record is a short
//! run of integers separated by `,` and `:`. One scanner type serves both
//! levels: splitting the stream into lines and walking the fields of a line.

use memchr::{memchr, memchr2};

/// Byte cursor over a line-oriented input
pub struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner for the given input
    #[inline]
    pub fn new(input: &'a [u8]) -> Self {
        Scanner { input, pos: 0 }
    }

    /// Check if we've reached the end
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Get remaining bytes
    #[inline]
    pub fn remaining(&self) -> &'a [u8] {
        &self.input[self.pos.min(self.input.len())..]
    }

    /// Next line without its terminator (`\n` or `\r\n`)
    ///
    /// The final line does not need a trailing newline.
    pub fn next_line(&mut self) -> Option<&'a [u8]> {
        if self.is_eof() {
            return None;
        }
        let start = self.pos;
        let end = match memchr(b'\n', &self.input[start..]) {
            Some(i) => {
                self.pos = start + i + 1;
                start + i
            }
            None => {
                self.pos = self.input.len();
                self.input.len()
            }
        };
        let line = &self.input[start..end];
        Some(line.strip_suffix(b"\r").unwrap_or(line))
    }

    /// Read bytes up to the next `,` or `:`, consuming the delimiter.
    ///
    /// Returns the field and the delimiter that ended it (`None` at end of
    /// input).
    pub fn read_field(&mut self) -> (&'a [u8], Option<u8>) {
        let start = self.pos.min(self.input.len());
        match memchr2(b',', b':', &self.input[start..]) {
            Some(i) => {
                self.pos = start + i + 1;
                (&self.input[start..start + i], Some(self.input[start + i]))
            }
            None => {
                self.pos = self.input.len();
                (&self.input[start..], None)
            }
        }
    }

    /// Read a signed decimal integer field, consuming its delimiter
    pub fn read_int(&mut self) -> Option<(i64, Option<u8>)> {
        let (field, delim) = self.read_field();
        parse_int(field).map(|n| (n, delim))
    }
}

/// Iterator adaptor over the lines of an input
pub struct Lines<'a> {
    scanner: Scanner<'a>,
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a [u8];

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.scanner.next_line()
    }
}

/// Iterate over the lines of `input`
pub fn lines(input: &[u8]) -> Lines<'_> {
    Lines {
        scanner: Scanner::new(input),
    }
}

/// Parse an optionally signed ASCII decimal integer, tolerating surrounding
/// spaces. Returns `None` for empty or non-numeric input.
pub fn parse_int(bytes: &[u8]) -> Option<i64> {
    let bytes = bytes.trim_ascii();
    let (negative, digits) = match bytes.split_first() {
        Some((b'-', rest)) => (true, rest),
        Some((b'+', rest)) => (false, rest),
        _ => (false, bytes),
    };
    if digits.is_empty() {
        return None;
    }
    let mut value: i64 = 0;
    for &b in digits {
        if !b.is_ascii_digit() {
            return None;
        }
        value = value.checked_mul(10)?.checked_add(i64::from(b - b'0'))?;
    }
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_line() {
        let mut scanner = Scanner::new(b"first\nsecond\r\nthird");
        assert_eq!(scanner.next_line(), Some(b"first" as &[u8]));
        assert_eq!(scanner.next_line(), Some(b"second" as &[u8]));
        assert_eq!(scanner.next_line(), Some(b"third" as &[u8]));
        assert_eq!(scanner.next_line(), None);
    }

    #[test]
    fn test_lines_keeps_empty_lines() {
        let collected: Vec<_> = lines(b"a\n\nb\n").collect();
        assert_eq!(collected, vec![b"a" as &[u8], b"", b"b"]);
    }

    #[test]
    fn test_read_field() {
        let mut scanner = Scanner::new(b"1,3:47,36");
        assert_eq!(scanner.read_field(), (b"1" as &[u8], Some(b',')));
        assert_eq!(scanner.read_field(), (b"3" as &[u8], Some(b':')));
        assert_eq!(scanner.read_field(), (b"47" as &[u8], Some(b',')));
        assert_eq!(scanner.read_field(), (b"36" as &[u8], None));
        assert!(scanner.is_eof());
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int(b"4736286"), Some(4736286));
        assert_eq!(parse_int(b"-655360"), Some(-655360));
        assert_eq!(parse_int(b" 12 "), Some(12));
        assert_eq!(parse_int(b""), None);
        assert_eq!(parse_int(b"-"), None);
        assert_eq!(parse_int(b"12a"), None);
        assert_eq!(parse_int(b"99999999999999999999999"), None);
    }
}
