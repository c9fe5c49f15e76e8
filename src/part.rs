use crate::constants;
use crate::content_disposition::ContentDisposition;
use crate::helpers;
use bytes::Bytes;
use encoding_rs::{Encoding, UTF_8};
#[cfg(feature = "json")]
use serde::de::DeserializeOwned;
use std::borrow::Cow;

/// A single decoded part of a multipart stream.
///
/// A part is a [`File`] when its `Content-Disposition` line carries a
/// `filename` and it has a non-empty `Content-Type` header. Everything else is
/// a plain [`Field`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    /// A form field.
    Field(Field),
    /// A file upload.
    File(File),
}

/// A form field, i.e. a part without both a file name and a content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: Option<String>,
    value: Bytes,
}

/// A file upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    name: Option<String>,
    file_name: String,
    content_type: String,
    contents: Bytes,
}

impl Part {
    /// Decodes a raw segment as returned by [`Splitter::feed`](crate::Splitter::feed).
    ///
    /// The segment must be wrapped in `\r\n` on both sides. Its first line is
    /// taken as the `Content-Disposition` header and may be followed by one
    /// `Content-Type` header, then an empty line, then the content. A segment
    /// holding a single line without any header is decoded as an unnamed
    /// field.
    ///
    /// # Examples
    ///
    /// ```
    /// use bytes::Bytes;
    /// use partsplit::Part;
    ///
    /// let segment = Bytes::from_static(b"\r\nContent-Disposition: form-data; name=\"my_text_field\"\r\n\r\nabcd\r\n");
    ///
    /// match Part::decode(segment).unwrap() {
    ///     Part::Field(field) => {
    ///         assert_eq!(field.name(), Some("my_text_field"));
    ///         assert_eq!(field.value(), "abcd");
    ///     }
    ///     Part::File(_) => unreachable!(),
    /// }
    /// ```
    pub fn decode(segment: Bytes) -> crate::Result<Part> {
        let crlf = constants::CRLF.as_bytes();

        if !segment.starts_with(crlf) {
            return Err(crate::Error::MissingLeadingLineBreak { segment });
        }

        if segment.len() < 2 * crlf.len() || !segment.ends_with(crlf) {
            return Err(crate::Error::MissingTrailingLineBreak { segment });
        }

        let body = segment.slice(crlf.len()..segment.len() - crlf.len());

        let line_end = match helpers::find_crlf(&body) {
            Some(idx) => idx,
            None => return Ok(Part::Field(Field { name: None, value: body })),
        };

        let disposition = ContentDisposition::parse(&String::from_utf8_lossy(&body[..line_end]));
        let mut rest = body.slice(line_end + crlf.len()..);

        let mut content_type_line = None;
        if rest.starts_with(constants::CONTENT_TYPE.as_bytes()) {
            let line_end = helpers::find_crlf(&rest).ok_or(crate::Error::MissingHeaderSeparator)?;
            content_type_line = Some(String::from_utf8_lossy(&rest[..line_end]).into_owned());
            rest = rest.slice(line_end + crlf.len()..);
        }

        if !rest.starts_with(crlf) {
            return Err(crate::Error::MissingHeaderSeparator);
        }
        let content = rest.slice(crlf.len()..);

        let content_type = match content_type_line {
            Some(line) => parse_content_type_line(line)?,
            None => None,
        };

        let ContentDisposition { field_name, file_name } = disposition;

        match (file_name, content_type) {
            (Some(file_name), Some(content_type)) => Ok(Part::File(File {
                name: field_name,
                file_name,
                content_type,
                contents: content,
            })),
            _ => Ok(Part::Field(Field {
                name: field_name,
                value: content,
            })),
        }
    }

    /// The `name` attribute of the part's `Content-Disposition` line.
    pub fn name(&self) -> Option<&str> {
        match self {
            Part::Field(field) => field.name(),
            Part::File(file) => file.name(),
        }
    }

    /// The raw content of the part.
    pub fn bytes(&self) -> &Bytes {
        match self {
            Part::Field(field) => field.value(),
            Part::File(file) => file.contents(),
        }
    }

    /// Returns the field, if this part is one.
    pub fn as_field(&self) -> Option<&Field> {
        match self {
            Part::Field(field) => Some(field),
            Part::File(_) => None,
        }
    }

    /// Returns the file, if this part is one.
    pub fn as_file(&self) -> Option<&File> {
        match self {
            Part::File(file) => Some(file),
            Part::Field(_) => None,
        }
    }
}

// Yields `None` for an empty value: a blank `Content-Type:` doesn't make a file.
fn parse_content_type_line(line: String) -> crate::Result<Option<String>> {
    if !line.starts_with(constants::CONTENT_TYPE_FIELD) {
        return Err(crate::Error::MalformedContentType { line });
    }

    let value = helpers::until_line_end(&line[constants::CONTENT_TYPE_FIELD.len()..]).trim();

    if value.is_empty() {
        Ok(None)
    } else {
        Ok(Some(value.to_owned()))
    }
}

impl Field {
    /// The field name found in the `Content-Disposition` line.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The raw field value.
    pub fn value(&self) -> &Bytes {
        &self.value
    }

    /// Consumes the field and returns its raw value.
    pub fn into_value(self) -> Bytes {
        self.value
    }

    /// Decodes the value as `utf-8` text, replacing malformed sequences.
    pub fn text(&self) -> Cow<'_, str> {
        self.text_with_charset("utf-8")
    }

    /// Decodes the value with the given charset label, falling back to `utf-8`
    /// for unknown labels.
    pub fn text_with_charset(&self, encoding: &str) -> Cow<'_, str> {
        decode_text(&self.value, encoding)
    }

    /// Deserializes the value as JSON.
    ///
    /// # Optional
    ///
    /// This requires the optional `json` feature to be enabled.
    #[cfg(feature = "json")]
    #[cfg_attr(nightly, doc(cfg(feature = "json")))]
    pub fn json<T: DeserializeOwned>(&self) -> crate::Result<T> {
        serde_json::from_slice(&self.value).map_err(crate::Error::DecodeJson)
    }
}

impl File {
    /// The field name found in the `Content-Disposition` line.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The `filename` attribute of the `Content-Disposition` line.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The raw `Content-Type` value.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// The `Content-Type` value parsed as [`mime::Mime`], if it is a valid one.
    pub fn mime(&self) -> Option<mime::Mime> {
        self.content_type.parse::<mime::Mime>().ok()
    }

    /// The raw file contents.
    pub fn contents(&self) -> &Bytes {
        &self.contents
    }

    /// Consumes the file and returns its raw contents.
    pub fn into_contents(self) -> Bytes {
        self.contents
    }

    /// Decodes the contents as text, using the `charset` parameter of the
    /// content type or `utf-8` when there is none.
    pub fn text(&self) -> Cow<'_, str> {
        self.text_with_charset("utf-8")
    }

    /// Decodes the contents as text, using the `charset` parameter of the
    /// content type or `default_encoding` when there is none.
    pub fn text_with_charset(&self, default_encoding: &str) -> Cow<'_, str> {
        let mime = self.mime();
        let encoding = mime
            .as_ref()
            .and_then(|mime| mime.get_param(mime::CHARSET))
            .map(|charset| charset.as_str())
            .unwrap_or(default_encoding);

        decode_text(&self.contents, encoding)
    }

    /// Deserializes the contents as JSON.
    ///
    /// # Optional
    ///
    /// This requires the optional `json` feature to be enabled.
    #[cfg(feature = "json")]
    #[cfg_attr(nightly, doc(cfg(feature = "json")))]
    pub fn json<T: DeserializeOwned>(&self) -> crate::Result<T> {
        serde_json::from_slice(&self.contents).map_err(crate::Error::DecodeJson)
    }
}

fn decode_text<'a>(bytes: &'a [u8], encoding_name: &str) -> Cow<'a, str> {
    let encoding = Encoding::for_label(encoding_name.as_bytes()).unwrap_or(UTF_8);
    let (text, _, _) = encoding.decode(bytes);
    text
}
