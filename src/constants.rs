pub(crate) const DEFAULT_WHOLE_STREAM_SIZE_LIMIT: u64 = u64::MAX;

pub(crate) const BOUNDARY_EXT: &str = "--";
pub(crate) const CRLF: &str = "\r\n";

pub(crate) const CONTENT_TYPE: &str = "Content-Type";
pub(crate) const CONTENT_TYPE_FIELD: &str = "Content-Type:";

pub(crate) const FIELD_NAME_PARAM: &str = "name";
pub(crate) const FILE_NAME_PARAM: &str = "filename";

/// Whatever follows the last boundary occurrence ends the stream once it
/// starts with `--`. The rest is epilogue.
pub(crate) fn is_terminal_marker(tail: &[u8]) -> bool {
    tail.starts_with(BOUNDARY_EXT.as_bytes())
}
