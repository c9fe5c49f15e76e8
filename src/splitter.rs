use crate::constants;
use crate::constraints::Constraints;
use crate::helpers;
use crate::state::StreamingStage;
use bytes::{Bytes, BytesMut};
use memchr::memmem;

/// Splits a multipart body into raw segments as its chunks arrive.
///
/// A segment is everything between two consecutive `--boundary` delimiters,
/// including the `\r\n` on either edge. Nothing is decoded here, use
/// [`Part::decode`](crate::Part::decode) or the higher level
/// [`Parser`](crate::Parser) for that.
///
/// Bytes that don't yet form a complete segment stay buffered across calls to
/// [`feed`](Splitter::feed), so delimiters and the closing `--` may be split
/// anywhere between chunks.
///
/// # Examples
///
/// ```
/// use partsplit::Splitter;
///
/// # fn run() -> partsplit::Result<()> {
/// let mut splitter = Splitter::new("X-BOUNDARY");
///
/// assert!(splitter.feed("--X-BOUNDARY\r\nabcd\r\n--X-BOU")?.is_empty());
///
/// let segments = splitter.feed("NDARY--\r\n")?;
/// assert_eq!(segments, vec!["\r\nabcd\r\n"]);
///
/// splitter.finish()
/// # }
/// # run().unwrap();
/// ```
#[derive(Debug)]
pub struct Splitter {
    buf: BytesMut,
    boundary: String,
    delimiter: Bytes,
    stage: StreamingStage,
    whole_stream_limit: u64,
    stream_size_counter: u64,
    first_delimiter: Option<usize>,
    scan_from: usize,
}

impl Splitter {
    /// Construct a new `Splitter` for the given boundary, without the leading `--`.
    pub fn new<B: Into<String>>(boundary: B) -> Splitter {
        Splitter::with_constraints(boundary, Constraints::default())
    }

    /// Construct a new `Splitter` for the given boundary and constraints.
    pub fn with_constraints<B: Into<String>>(boundary: B, constraints: Constraints) -> Splitter {
        let boundary = boundary.into();
        let delimiter = Bytes::from(format!("{}{}", constants::BOUNDARY_EXT, boundary));

        Splitter {
            buf: BytesMut::new(),
            boundary,
            delimiter,
            stage: StreamingStage::ReadingParts,
            whole_stream_limit: constraints.size_limit.whole_stream,
            stream_size_counter: 0,
            first_delimiter: None,
            scan_from: 0,
        }
    }

    /// The boundary this splitter looks for.
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Returns `true` once the closing boundary has been seen.
    pub fn is_finished(&self) -> bool {
        self.stage == StreamingStage::Eof
    }

    /// Returns `true` after a stream level error; the splitter won't accept
    /// any more data.
    pub fn is_halted(&self) -> bool {
        self.stage == StreamingStage::Halted
    }

    /// Appends a chunk and returns the segments it completed, in stream order.
    ///
    /// An empty vector means no segment was completed by this chunk. Segments
    /// are never returned twice. Data after the closing boundary is epilogue
    /// and is dropped.
    pub fn feed<T: AsRef<[u8]>>(&mut self, chunk: T) -> crate::Result<Vec<Bytes>> {
        let chunk = chunk.as_ref();

        match self.stage {
            StreamingStage::Halted => return Err(crate::Error::Halted),
            StreamingStage::Eof => {
                trace!("discarding {} epilogue bytes", chunk.len());
                return Ok(Vec::new());
            }
            StreamingStage::ReadingParts => {}
        }

        if self.boundary.is_empty() {
            return Err(self.halt(crate::Error::EmptyBoundary));
        }

        let stream_size = self.stream_size_counter.saturating_add(chunk.len() as u64);
        if stream_size > self.whole_stream_limit {
            return Err(self.halt(crate::Error::StreamSizeExceeded {
                limit: self.whole_stream_limit,
            }));
        }

        self.stream_size_counter = stream_size;
        self.buf.extend_from_slice(chunk);

        self.split()
    }

    /// Ends the stream.
    ///
    /// Fails with [`UnparsedBodyRemaining`](crate::Error::UnparsedBodyRemaining)
    /// carrying the buffered bytes if the closing boundary was never seen.
    pub fn finish(mut self) -> crate::Result<()> {
        if self.stage == StreamingStage::Eof {
            return Ok(());
        }

        debug!("stream ended with {} unparsed bytes", self.buf.len());

        Err(crate::Error::UnparsedBodyRemaining {
            body: self.buf.split().freeze(),
        })
    }

    fn split(&mut self) -> crate::Result<Vec<Bytes>> {
        let delimiter_len = self.delimiter.len();
        let scan_from = self.scan_from;

        let mut positions: Vec<usize> = self.first_delimiter.into_iter().collect();
        positions.extend(
            memmem::find_iter(&self.buf[scan_from..], &self.delimiter[..]).map(|pos| scan_from + pos),
        );

        // The first delimiter followed by `--` closes the stream, whatever comes after it.
        let closing = positions
            .iter()
            .position(|&pos| constants::is_terminal_marker(&self.buf[pos + delimiter_len..]));
        if let Some(idx) = closing {
            positions.truncate(idx + 1);
        }

        if positions.len() < 2 {
            self.first_delimiter = positions.first().copied();

            match (self.first_delimiter, closing) {
                (Some(first), Some(_)) => {
                    self.check_preamble(first)?;
                    self.close();
                }
                _ => self.resume_scan(),
            }

            return Ok(Vec::new());
        }

        let first = positions[0];
        let last = positions[positions.len() - 1];

        self.check_preamble(first)?;

        let head = self.buf.split_to(last).freeze();
        let segments: Vec<Bytes> = positions
            .windows(2)
            .map(|pair| head.slice(pair[0] + delimiter_len..pair[1]))
            .collect();

        if closing.is_some() {
            self.close();
        } else {
            // Keep the last delimiter, it opens the next segment.
            let mut retained = BytesMut::with_capacity(constants::CRLF.len() + self.buf.len());
            retained.extend_from_slice(constants::CRLF.as_bytes());
            retained.extend_from_slice(&self.buf);
            self.buf = retained;

            self.first_delimiter = Some(constants::CRLF.len());
            self.resume_scan();
        }

        trace!("split {} segments, {} bytes retained", segments.len(), self.buf.len());

        Ok(segments)
    }

    // Everything before `scan_from` has been searched: a later delimiter either
    // starts after the known one or ends in bytes not yet seen.
    fn resume_scan(&mut self) {
        let delimiter_len = self.delimiter.len();
        let after_known = self.first_delimiter.map_or(0, |pos| pos + delimiter_len);

        self.scan_from = after_known.max(self.buf.len().saturating_sub(delimiter_len - 1));
    }

    fn check_preamble(&mut self, first_delimiter: usize) -> crate::Result<()> {
        if helpers::is_blank(&self.buf[..first_delimiter]) {
            return Ok(());
        }

        let data = Bytes::copy_from_slice(&self.buf[..first_delimiter]);
        Err(self.halt(crate::Error::UnexpectedLeadingData { data }))
    }

    fn close(&mut self) {
        debug!("closing boundary found");

        self.stage = StreamingStage::Eof;
        self.buf.clear();
        self.first_delimiter = None;
        self.scan_from = 0;
    }

    fn halt(&mut self, err: crate::Error) -> crate::Error {
        debug!("halting: {}", err);

        self.stage = StreamingStage::Halted;
        err
    }
}
