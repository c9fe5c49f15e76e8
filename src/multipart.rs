use crate::constraints::Constraints;
use crate::parser::{Parser, Parts};
use crate::Part;
use bytes::Bytes;
use futures_util::stream::{Stream, StreamExt, TryStreamExt};
use std::pin::Pin;
use std::task::{Context, Poll};
#[cfg(feature = "tokio-io")]
use tokio::io::AsyncRead;
#[cfg(feature = "tokio-io")]
use tokio_util::io::ReaderStream;

/// Drives a [`Parser`] from a [`Stream`] of byte chunks.
///
/// This will parse the source stream into [`Part`] instances via its
/// [`Stream`](https://docs.rs/futures/0.3/futures/stream/trait.Stream.html)
/// implementation, or with [`next_part`](Multipart::next_part).
///
/// A part that fails to decode is yielded as an `Err` item and the stream
/// goes on. Any other error is the last item of the stream. When the source
/// ends without the closing boundary the last item is
/// [`Error::UnparsedBodyRemaining`](crate::Error::UnparsedBodyRemaining).
///
/// # Examples
///
/// ```
/// use partsplit::{Multipart, Part};
/// use bytes::Bytes;
/// use std::convert::Infallible;
/// use futures_util::stream::once;
///
/// # async fn run() {
/// let data = "--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"my_text_field\"\r\n\r\nabcd\r\n--X-BOUNDARY--\r\n";
/// let stream = once(async move { Result::<Bytes, Infallible>::Ok(Bytes::from(data)) });
/// let mut multipart = Multipart::new(stream, "X-BOUNDARY");
///
/// while let Some(part) = multipart.next_part().await.unwrap() {
///     println!("Part: {:?} {:?}", part.name(), part.bytes());
/// }
/// # }
/// # tokio::runtime::Runtime::new().unwrap().block_on(run());
/// ```
pub struct Multipart<'r> {
    stream: Pin<Box<dyn Stream<Item = crate::Result<Bytes>> + Send + 'r>>,
    parser: Option<Parser>,
    parts: Parts,
}

impl<'r> Multipart<'r> {
    /// Construct a new `Multipart` instance with the given [`Bytes`] stream and the boundary.
    pub fn new<S, O, E, B>(stream: S, boundary: B) -> Multipart<'r>
    where
        S: Stream<Item = Result<O, E>> + Send + 'r,
        O: Into<Bytes> + 'r,
        E: Into<Box<dyn std::error::Error + Send + Sync>> + 'r,
        B: Into<String>,
    {
        Multipart::with_constraints(stream, boundary, Constraints::default())
    }

    /// Construct a new `Multipart` instance with the given [`Bytes`] stream, the boundary and
    /// constraints.
    pub fn with_constraints<S, O, E, B>(stream: S, boundary: B, constraints: Constraints) -> Multipart<'r>
    where
        S: Stream<Item = Result<O, E>> + Send + 'r,
        O: Into<Bytes> + 'r,
        E: Into<Box<dyn std::error::Error + Send + Sync>> + 'r,
        B: Into<String>,
    {
        let stream = stream
            .map_ok(|chunk: O| -> Bytes { chunk.into() })
            .map_err(|err| crate::Error::StreamReadFailed(err.into()));

        Multipart {
            stream: Box::pin(stream),
            parser: Some(Parser::with_constraints(boundary, constraints)),
            parts: Parts::default(),
        }
    }

    /// Construct a new `Multipart` instance with the given [`AsyncRead`] reader and the boundary.
    ///
    /// # Optional
    ///
    /// This requires the optional `tokio-io` feature to be enabled.
    ///
    /// # Examples
    ///
    /// ```
    /// use partsplit::Multipart;
    ///
    /// # async fn run() {
    /// let data = "--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"my_text_field\"\r\n\r\nabcd\r\n--X-BOUNDARY--\r\n";
    /// let reader = data.as_bytes();
    /// let mut multipart = Multipart::with_reader(reader, "X-BOUNDARY");
    ///
    /// while let Some(part) = multipart.next_part().await.unwrap() {
    ///     println!("Part: {:?}", part.name());
    /// }
    /// # }
    /// # tokio::runtime::Runtime::new().unwrap().block_on(run());
    /// ```
    #[cfg(feature = "tokio-io")]
    #[cfg_attr(nightly, doc(cfg(feature = "tokio-io")))]
    pub fn with_reader<R, B>(reader: R, boundary: B) -> Multipart<'r>
    where
        R: AsyncRead + Send + 'r,
        B: Into<String>,
    {
        Multipart::new(ReaderStream::new(reader), boundary)
    }

    /// Construct a new `Multipart` instance with the given [`AsyncRead`] reader, the boundary and
    /// constraints.
    ///
    /// # Optional
    ///
    /// This requires the optional `tokio-io` feature to be enabled.
    #[cfg(feature = "tokio-io")]
    #[cfg_attr(nightly, doc(cfg(feature = "tokio-io")))]
    pub fn with_reader_with_constraints<R, B>(reader: R, boundary: B, constraints: Constraints) -> Multipart<'r>
    where
        R: AsyncRead + Send + 'r,
        B: Into<String>,
    {
        Multipart::with_constraints(ReaderStream::new(reader), boundary, constraints)
    }

    /// Yields the next [`Part`] if available.
    ///
    /// `Ok(None)` means the stream is over, either because the closing
    /// boundary was read or after an error was returned.
    pub async fn next_part(&mut self) -> crate::Result<Option<Part>> {
        self.next().await.transpose()
    }
}

impl<'r> Stream for Multipart<'r> {
    type Item = crate::Result<Part>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            if let Some(part) = this.parts.next() {
                return Poll::Ready(Some(part));
            }

            let parser = match this.parser.as_mut() {
                Some(parser) => parser,
                None => return Poll::Ready(None),
            };

            match this.stream.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(chunk))) => match parser.feed(chunk) {
                    Ok(parts) => this.parts = parts,
                    Err(err) => {
                        this.parser = None;
                        return Poll::Ready(Some(Err(err)));
                    }
                },
                Poll::Ready(Some(Err(err))) => {
                    debug!("{}", err);

                    this.parser = None;
                    return Poll::Ready(Some(Err(err)));
                }
                Poll::Ready(None) => {
                    let finished = this.parser.take().map(Parser::finish).transpose();

                    return match finished {
                        Ok(_) => Poll::Ready(None),
                        Err(err) => Poll::Ready(Some(Err(err))),
                    };
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
