use bytes::Bytes;
use futures_util::stream::{self, StreamExt};
use partsplit::{Constraints, Error, Multipart, Parser, Part, SizeLimit, Splitter};

const BOUNDARY: &str = "X-BOUNDARY";

const FORM: &str = "--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"My Field\"\r\n\r\nabcd\r\n--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"File Field\"; filename=\"a-text-file.txt\"\r\nContent-Type: text/plain\r\n\r\nHello world\nHello\r\nWorld\rAgain\r\n--X-BOUNDARY--\r\n";

fn parse_chunks<'a, I>(chunks: I) -> (Vec<partsplit::Result<Part>>, partsplit::Result<()>)
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut parser = Parser::new(BOUNDARY);
    let mut parts = Vec::new();

    for chunk in chunks {
        match parser.feed(chunk) {
            Ok(batch) => parts.extend(batch),
            Err(err) => return (parts, Err(err)),
        }
    }

    (parts, parser.finish())
}

fn char_stream(data: &'static str) -> impl futures_util::stream::Stream<Item = partsplit::Result<Bytes>> {
    stream::iter(
        data.chars()
            .map(|ch| ch.to_string())
            .map(|part| partsplit::Result::Ok(Bytes::copy_from_slice(part.as_bytes()))),
    )
}

#[test]
fn test_parser_basic() {
    let (parts, finished) = parse_chunks(vec![FORM.as_bytes()]);
    assert_eq!(finished, Ok(()));
    assert_eq!(parts.len(), 2);

    let field = parts[0].as_ref().unwrap().as_field().unwrap();
    assert_eq!(field.name(), Some("My Field"));
    assert_eq!(field.text(), "abcd");

    let file = parts[1].as_ref().unwrap().as_file().unwrap();
    assert_eq!(file.name(), Some("File Field"));
    assert_eq!(file.file_name(), "a-text-file.txt");
    assert_eq!(file.content_type(), "text/plain");
    assert_eq!(file.mime(), Some(mime::TEXT_PLAIN));
    assert_eq!(file.text(), "Hello world\nHello\r\nWorld\rAgain");
}

#[test]
fn test_every_two_way_split_matches_whole_body() {
    let data = FORM.as_bytes();
    let expected = parse_chunks(vec![data]);

    for idx in 0..=data.len() {
        let (head, tail) = data.split_at(idx);
        assert_eq!(parse_chunks(vec![head, tail]), expected, "split at {}", idx);
    }
}

#[test]
fn test_every_chunk_size_matches_whole_body() {
    let data = FORM.as_bytes();
    let expected = parse_chunks(vec![data]);

    for size in 1..=data.len() {
        assert_eq!(parse_chunks(data.chunks(size)), expected, "chunk size {}", size);
    }
}

#[test]
fn test_segments_account_for_every_byte() {
    let data = FORM.as_bytes();
    let mut splitter = Splitter::new(BOUNDARY);

    let mut segments = Vec::new();
    for chunk in data.chunks(3) {
        segments.extend(splitter.feed(chunk).unwrap());
    }
    assert!(splitter.is_finished());

    let delimiter = format!("--{}", BOUNDARY);
    let mut rebuilt = Vec::new();
    for segment in &segments {
        rebuilt.extend_from_slice(delimiter.as_bytes());
        rebuilt.extend_from_slice(segment);
    }
    rebuilt.extend_from_slice(delimiter.as_bytes());
    rebuilt.extend_from_slice(b"--\r\n");

    assert_eq!(rebuilt, data);
}

#[test]
fn test_closing_boundary_completed_by_second_chunk() {
    let first = "\r\n--boundary\r\nContent-Disposition: form-data; name=\"x\"\r\n\r\nvalue\r\n--boun";
    let second = "dary--\r\n";

    let mut whole = Parser::new("boundary");
    let expected: Vec<_> = whole.feed(format!("{}{}", first, second)).unwrap().collect();
    assert_eq!(whole.finish(), Ok(()));

    let mut parser = Parser::new("boundary");
    assert_eq!(parser.feed(first).unwrap().len(), 0);
    let parts: Vec<_> = parser.feed(second).unwrap().collect();
    assert_eq!(parser.finish(), Ok(()));

    assert_eq!(parts, expected);
    assert_eq!(parts[0].as_ref().unwrap().bytes(), "value");
}

#[test]
fn test_closing_marker_without_line_break() {
    let (parts, finished) = parse_chunks(vec![&FORM.as_bytes()[..FORM.len() - 2]]);
    assert_eq!(finished, Ok(()));
    assert_eq!(parts.len(), 2);
}

#[test]
fn test_leading_data_yields_no_parts() {
    let body = format!("garbage{}", FORM);
    let (parts, res) = parse_chunks(vec![body.as_bytes()]);

    assert!(parts.is_empty());
    assert!(matches!(res, Err(Error::UnexpectedLeadingData { .. })));
}

#[test]
fn test_unterminated_body() {
    let body = &FORM[..FORM.len() - "--X-BOUNDARY--\r\n".len()];
    let (parts, res) = parse_chunks(vec![body.as_bytes()]);

    assert_eq!(parts.len(), 1);
    match res {
        Err(Error::UnparsedBodyRemaining { body }) => assert!(body.starts_with(b"\r\n--X-BOUNDARY\r\n")),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_multipart_basic() {
    let mut m = Multipart::new(char_stream(FORM), BOUNDARY);

    let part = m.next_part().await.unwrap().unwrap();
    let field = part.as_field().unwrap();
    assert_eq!(field.name(), Some("My Field"));
    assert_eq!(field.text(), "abcd");

    let part = m.next_part().await.unwrap().unwrap();
    let file = part.as_file().unwrap();
    assert_eq!(file.name(), Some("File Field"));
    assert_eq!(file.file_name(), "a-text-file.txt");
    assert_eq!(file.text(), "Hello world\nHello\r\nWorld\rAgain");

    assert!(m.next_part().await.unwrap().is_none());
    assert!(m.next_part().await.unwrap().is_none());
}

#[tokio::test]
async fn test_multipart_empty() {
    let mut m = Multipart::new(char_stream("--X-BOUNDARY--\r\n"), BOUNDARY);

    assert!(m.next_part().await.unwrap().is_none());
    assert!(m.next_part().await.unwrap().is_none());
}

#[tokio::test]
async fn test_multipart_incomplete_stream() {
    let mut m = Multipart::new(char_stream("--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"x\"\r\n\r\nab"), BOUNDARY);

    assert!(matches!(m.next_part().await, Err(Error::UnparsedBodyRemaining { .. })));
    assert!(m.next_part().await.unwrap().is_none());
}

#[tokio::test]
async fn test_multipart_skips_malformed_part() {
    let data = "--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"f\"; filename=\"a.txt\"\r\nContent-Type text/plain\r\n\r\nabc\r\n--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"ok\"\r\n\r\nfine\r\n--X-BOUNDARY--\r\n";
    let m = Multipart::new(char_stream(data), BOUNDARY);

    let items: Vec<_> = m.collect().await;
    assert_eq!(items.len(), 2);
    assert!(matches!(items[0], Err(Error::MalformedContentType { .. })));
    assert_eq!(items[1].as_ref().unwrap().name(), Some("ok"));
}

#[tokio::test]
async fn test_multipart_stream_error() {
    let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
        Ok(Bytes::from_static(b"--X-BOUNDARY\r\n")),
        Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset")),
        Ok(Bytes::from_static(b"never read")),
    ];
    let mut m = Multipart::new(stream::iter(chunks), BOUNDARY);

    assert!(matches!(m.next_part().await, Err(Error::StreamReadFailed(_))));
    assert!(m.next_part().await.unwrap().is_none());
}

#[tokio::test]
async fn test_multipart_whole_stream_limit() {
    let constraints = Constraints::new().size_limit(SizeLimit::new().whole_stream(64));
    let mut m = Multipart::with_constraints(char_stream(FORM), BOUNDARY, constraints);

    let mut first_error = None;
    while let Some(item) = m.next().await {
        if let Err(err) = item {
            first_error = Some(err);
            break;
        }
    }

    assert_eq!(first_error, Some(Error::StreamSizeExceeded { limit: 64 }));
    assert!(m.next_part().await.unwrap().is_none());
}

#[cfg(feature = "tokio-io")]
#[tokio::test]
async fn test_multipart_with_reader() {
    let mut m = Multipart::with_reader(FORM.as_bytes(), BOUNDARY);

    let mut names = Vec::new();
    while let Some(part) = m.next_part().await.unwrap() {
        names.push(part.name().map(|name| name.to_owned()));
    }

    assert_eq!(names, vec![Some("My Field".to_owned()), Some("File Field".to_owned())]);
}
