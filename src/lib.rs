//! An incremental splitter and decoder for `multipart/*` bodies.
//!
//! The body is fed in chunks of any size as they arrive, e.g. from a socket.
//! Boundaries and the closing `--` marker may be cut anywhere between two
//! chunks; parts are handed out as soon as their closing boundary is seen,
//! without waiting for the rest of the body.
//!
//! There are three layers:
//!
//! * [`Splitter`] cuts the byte stream into raw segments at each boundary.
//! * [`Part::decode`] turns one raw segment into a [`Field`] or a [`File`],
//!   using [`header_field::extract`] for the `Content-Disposition` attributes.
//! * [`Parser`] combines both, and [`Multipart`] drives a parser from any
//!   [`Stream`](futures_util::stream::Stream) of byte chunks.
//!
//! # Examples
//!
//! ```
//! use partsplit::{Parser, Part};
//!
//! # fn run() -> partsplit::Result<()> {
//! let boundary = partsplit::parse_boundary("multipart/form-data; boundary=X-BOUNDARY")?;
//! let mut parser = Parser::new(boundary);
//!
//! let data = "--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"my_text_field\"\r\n\r\nabcd\r\n--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"my_file_field\"; filename=\"a-text-file.txt\"\r\nContent-Type: text/plain\r\n\r\nHello world\r\n--X-BOUNDARY--\r\n";
//!
//! for chunk in data.as_bytes().chunks(7) {
//!     for part in parser.feed(chunk)? {
//!         match part? {
//!             Part::Field(field) => println!("Field {:?}: {}", field.name(), field.text()),
//!             Part::File(file) => println!("File {:?}: {}", file.file_name(), file.text()),
//!         }
//!     }
//! }
//!
//! parser.finish()
//! # }
//! # run().unwrap();
//! ```
//!
//! ## Optional features
//!
//! * `json`: adds [`Field::json`] and [`File::json`].
//! * `tokio-io`: adds [`Multipart::with_reader`] for any tokio `AsyncRead`.
//! * `log`: logs the splitter decisions through the `log` crate.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![cfg_attr(nightly, feature(doc_cfg))]

#[cfg(feature = "log")]
macro_rules! trace {
    ($($t:tt)*) => (::log::trace!($($t)*););
}

#[cfg(not(feature = "log"))]
macro_rules! trace {
    ($($t:tt)*) => {
        if false {
            let _ = format_args!($($t)*);
        }
    };
}

#[cfg(feature = "log")]
macro_rules! debug {
    ($($t:tt)*) => (::log::debug!($($t)*););
}

#[cfg(not(feature = "log"))]
macro_rules! debug {
    ($($t:tt)*) => {
        if false {
            let _ = format_args!($($t)*);
        }
    };
}

pub use bytes;

pub use constraints::Constraints;
pub use error::Error;
pub use multipart::Multipart;
pub use parser::{Parser, Parts};
pub use part::{Field, File, Part};
pub use size_limit::SizeLimit;
pub use splitter::Splitter;

mod constants;
mod constraints;
mod content_disposition;
mod error;
pub mod header_field;
mod helpers;
mod multipart;
mod parser;
mod part;
mod size_limit;
mod splitter;
mod state;

/// A Result type often returned from methods that can have `partsplit` errors.
pub type Result<T> = std::result::Result<T, Error>;

/// Parses the `Content-Type` header to extract the boundary value.
///
/// Any `multipart/*` type is accepted.
///
/// # Examples
///
/// ```
/// let content_type = "multipart/form-data; boundary=ABCDEFG";
///
/// assert_eq!(partsplit::parse_boundary(content_type), Ok("ABCDEFG".to_owned()));
/// ```
pub fn parse_boundary<T: AsRef<str>>(content_type: T) -> Result<String> {
    let m = content_type
        .as_ref()
        .parse::<mime::Mime>()
        .map_err(Error::DecodeContentType)?;

    if m.type_() != mime::MULTIPART {
        return Err(Error::NoMultipart);
    }

    m.get_param(mime::BOUNDARY)
        .map(|name| name.as_str().to_owned())
        .ok_or(Error::NoBoundary)
}
