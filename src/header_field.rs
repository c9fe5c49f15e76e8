//! Extraction of `key=value` attributes from a raw header line.
//!
//! This is what the part decoder uses to pull `name` and `filename` out of a
//! `Content-Disposition` line. It also works on a `Content-Type` value, so it
//! can be used to look up a `boundary` without a full mime parse.

/// Returns the unquoted value of the `name` attribute in a header line.
///
/// The attribute name is matched case-insensitively and must start on a word
/// boundary, so looking up `name` never matches inside `filename`. The value
/// runs up to the next `,` or `;` (or the end of the line), is trimmed and has
/// one matching pair of surrounding `"` or `'` quotes removed.
///
/// An empty line stands for an absent header and always yields `None`.
///
/// # Examples
///
/// ```
/// use partsplit::header_field::extract;
///
/// let line = r#"form-data; name="avatar"; filename="me.png""#;
///
/// assert_eq!(extract(line, "name"), Some("avatar"));
/// assert_eq!(extract(line, "FileName"), Some("me.png"));
/// assert_eq!(extract(line, "size"), None);
/// ```
pub fn extract<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    if line.is_empty() || name.is_empty() {
        return None;
    }

    let haystack = line.as_bytes();
    let needle = name.as_bytes();
    let mut from = 0;

    while let Some(rel_idx) = find_ignore_ascii_case(&haystack[from..], needle) {
        let idx = from + rel_idx;
        from = idx + 1;

        let prev = if idx == 0 { None } else { Some(haystack[idx - 1]) };
        if is_word_byte(prev) == is_word_byte(needle.first().copied()) {
            continue;
        }

        // An ASCII-insensitive match of a whole `&str` always ends on a char boundary.
        if let Some(value) = line.get(idx + needle.len()..).and_then(value_after_name) {
            return Some(unquote(value.trim()));
        }
    }

    None
}

fn find_ignore_ascii_case(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }

    haystack
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
}

fn is_word_byte(b: Option<u8>) -> bool {
    matches!(b, Some(b) if b.is_ascii_alphanumeric() || b == b'_')
}

fn value_after_name(rest: &str) -> Option<&str> {
    let rest = rest.trim_start().strip_prefix('=')?;
    let end = rest.find(|c: char| c == ';' || c == ',').unwrap_or(rest.len());
    let value = &rest[..end];

    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();

    match (bytes.first(), bytes.last()) {
        (Some(&open), Some(&close)) if bytes.len() >= 2 && open == close && is_quote(open) => {
            &value[1..value.len() - 1]
        }
        _ => value,
    }
}

fn is_quote(b: u8) -> bool {
    b == b'"' || b == b'\''
}
