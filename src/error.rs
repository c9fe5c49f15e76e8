use std::fmt::{self, Debug, Display, Formatter};

use bytes::Bytes;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A set of errors that can occur while splitting and decoding a multipart
/// stream and in other operations.
///
/// Errors come in two flavours. Most of them concern the stream as a whole:
/// once returned from [`Parser::feed`](crate::Parser::feed) the parser is
/// halted and the rest of the body can't be trusted. The others concern a
/// single part and are yielded in place of that part only, see
/// [`Error::is_segment_scoped`].
#[non_exhaustive]
pub enum Error {
    /// Non-whitespace data was found before the first boundary.
    UnexpectedLeadingData { data: Bytes },

    /// The stream was finished without its closing boundary.
    UnparsedBodyRemaining { body: Bytes },

    /// A part doesn't start with a `\r\n` right after its boundary.
    MissingLeadingLineBreak { segment: Bytes },

    /// A part doesn't end with a `\r\n` right before the next boundary.
    MissingTrailingLineBreak { segment: Bytes },

    /// The headers of a part are not followed by an empty line.
    MissingHeaderSeparator,

    /// A line starting with `Content-Type` is not a `Content-Type:` header.
    MalformedContentType { line: String },

    /// The parser was created with an empty boundary.
    EmptyBoundary,

    /// The parser already failed on this stream and accepts no more data.
    Halted,

    /// The incoming stream size exceeded the maximum limit.
    StreamSizeExceeded { limit: u64 },

    /// Stream read failed.
    StreamReadFailed(BoxError),

    /// The `Content-Type` header is not `multipart/*`.
    NoMultipart,

    /// Failed to convert the `Content-Type` to [`mime::Mime`] type.
    DecodeContentType(mime::FromStrError),

    /// No boundary found in `Content-Type` header.
    NoBoundary,

    /// Failed to decode the part content as `JSON`.
    #[cfg(feature = "json")]
    #[cfg_attr(nightly, doc(cfg(feature = "json")))]
    DecodeJson(serde_json::Error),
}

impl Error {
    /// Returns `true` when the error only spoils a single part and the stream
    /// carries on with the next one.
    pub fn is_segment_scoped(&self) -> bool {
        matches!(
            self,
            Error::MissingLeadingLineBreak { .. }
                | Error::MissingTrailingLineBreak { .. }
                | Error::MissingHeaderSeparator
                | Error::MalformedContentType { .. }
        )
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnexpectedLeadingData { data } => {
                write!(f, "unexpected data before the first boundary: {:?}", data)
            }
            Error::UnparsedBodyRemaining { body } => {
                write!(f, "stream ended with {} unparsed bytes: {:?}", body.len(), body)
            }
            Error::MissingLeadingLineBreak { segment } => {
                write!(f, "part doesn't start with a line break: {:?}", segment)
            }
            Error::MissingTrailingLineBreak { segment } => {
                write!(f, "part doesn't end with a line break: {:?}", segment)
            }
            Error::MissingHeaderSeparator => write!(f, "part headers are not followed by an empty line"),
            Error::MalformedContentType { line } => write!(f, "malformed Content-Type header: {:?}", line),
            Error::EmptyBoundary => write!(f, "multipart boundary is empty"),
            Error::Halted => write!(f, "parser halted after a previous error"),
            Error::StreamSizeExceeded { limit } => {
                write!(f, "stream size exceeded the maximum limit: {} bytes", limit)
            }
            Error::StreamReadFailed(err) => write!(f, "stream read failed: {}", err),
            Error::NoMultipart => write!(f, "Content-Type is not multipart"),
            Error::DecodeContentType(err) => {
                write!(f, "failed to convert Content-Type to `mime::Mime` type: {}", err)
            }
            Error::NoBoundary => write!(f, "multipart boundary not found in Content-Type"),
            #[cfg(feature = "json")]
            Error::DecodeJson(err) => write!(f, "failed to decode part data as JSON: {}", err),
        }
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::StreamReadFailed(err) => Some(err.as_ref()),
            Error::DecodeContentType(err) => Some(err),
            #[cfg(feature = "json")]
            Error::DecodeJson(err) => Some(err),
            _ => None,
        }
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string().eq(&other.to_string())
    }
}

impl Eq for Error {}
