use crate::constants;
use memchr::memmem;

pub(crate) fn find_crlf(buf: &[u8]) -> Option<usize> {
    memmem::find(buf, constants::CRLF.as_bytes())
}

/// Everything before the first boundary may only be whitespace.
pub(crate) fn is_blank(buf: &[u8]) -> bool {
    buf.iter().all(u8::is_ascii_whitespace)
}

/// Cuts a header value at the first line terminator.
pub(crate) fn until_line_end(val: &str) -> &str {
    match val.find(|c: char| c == '\r' || c == '\n') {
        Some(idx) => &val[..idx],
        None => val,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_crlf() {
        assert_eq!(find_crlf(b"abc\r\ndef"), Some(3));
        assert_eq!(find_crlf(b"\r\n"), Some(0));
        assert_eq!(find_crlf(b"abc\rdef\n"), None);
        assert_eq!(find_crlf(b""), None);
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(b""));
        assert!(is_blank(b"\r\n"));
        assert!(is_blank(b" \t\r\n\r\n"));
        assert!(!is_blank(b"\r\nx"));
        assert!(!is_blank(b"preamble"));
    }

    #[test]
    fn test_until_line_end() {
        assert_eq!(until_line_end("text/plain"), "text/plain");
        assert_eq!(until_line_end("text/plain\rjunk"), "text/plain");
        assert_eq!(until_line_end("text/plain\njunk"), "text/plain");
        assert_eq!(until_line_end(""), "");
    }
}
