use crate::constraints::Constraints;
use crate::splitter::Splitter;
use crate::Part;
use bytes::Bytes;
use std::vec;

/// Parses a multipart body into [`Part`]s as its chunks arrive.
///
/// Each call to [`feed`](Parser::feed) returns the parts completed by that
/// chunk. A part that fails to decode shows up as an `Err` item in place of
/// that part only; an `Err` returned from `feed` itself means the stream is
/// broken and the parser won't accept more data.
///
/// Chunks must be fed in stream order by a single caller. The split points
/// don't matter: any chunking of the same body yields the same parts.
///
/// # Examples
///
/// ```
/// use partsplit::{Parser, Part};
///
/// # fn run() -> partsplit::Result<()> {
/// let mut parser = Parser::new("X-BOUNDARY");
///
/// let chunks = [
///     "--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"my_text_field\"\r\n\r\nab",
///     "cd\r\n--X-BOUNDARY--\r\n",
/// ];
///
/// for chunk in chunks.iter() {
///     for part in parser.feed(chunk)? {
///         if let Part::Field(field) = part? {
///             assert_eq!(field.name(), Some("my_text_field"));
///             assert_eq!(field.text(), "abcd");
///         }
///     }
/// }
///
/// parser.finish()
/// # }
/// # run().unwrap();
/// ```
#[derive(Debug)]
pub struct Parser {
    splitter: Splitter,
}

impl Parser {
    /// Construct a new `Parser` for the given boundary, without the leading `--`.
    pub fn new<B: Into<String>>(boundary: B) -> Parser {
        Parser::with_constraints(boundary, Constraints::default())
    }

    /// Construct a new `Parser` for the given boundary and constraints.
    pub fn with_constraints<B: Into<String>>(boundary: B, constraints: Constraints) -> Parser {
        Parser {
            splitter: Splitter::with_constraints(boundary, constraints),
        }
    }

    /// The boundary this parser looks for.
    pub fn boundary(&self) -> &str {
        self.splitter.boundary()
    }

    /// Returns `true` once the closing boundary has been seen.
    pub fn is_finished(&self) -> bool {
        self.splitter.is_finished()
    }

    /// Appends a chunk and returns the parts it completed.
    pub fn feed<T: AsRef<[u8]>>(&mut self, chunk: T) -> crate::Result<Parts> {
        self.splitter.feed(chunk).map(Parts::new)
    }

    /// Ends the stream, see [`Splitter::finish`].
    pub fn finish(self) -> crate::Result<()> {
        self.splitter.finish()
    }
}

/// The parts completed by a single [`Parser::feed`] call, in stream order.
///
/// Segments are decoded as the iterator advances.
#[derive(Debug)]
pub struct Parts {
    segments: vec::IntoIter<Bytes>,
}

impl Parts {
    fn new(segments: Vec<Bytes>) -> Parts {
        Parts {
            segments: segments.into_iter(),
        }
    }
}

impl Default for Parts {
    fn default() -> Self {
        Parts::new(Vec::new())
    }
}

impl Iterator for Parts {
    type Item = crate::Result<Part>;

    fn next(&mut self) -> Option<Self::Item> {
        self.segments.next().map(Part::decode)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.segments.size_hint()
    }
}

impl ExactSizeIterator for Parts {}
