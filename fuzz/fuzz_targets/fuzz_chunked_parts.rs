#![no_main]

use libfuzzer_sys::fuzz_target;
use partsplit::{Parser, Part};

fn parse<'a, I: IntoIterator<Item = &'a [u8]>>(chunks: I) -> (Vec<partsplit::Result<Part>>, Option<partsplit::Result<()>>) {
    let mut parser = Parser::new("X-BOUNDARY");
    let mut parts = Vec::new();

    for chunk in chunks {
        match parser.feed(chunk) {
            Ok(batch) => parts.extend(batch),
            Err(err) => {
                // The retained body depends on how much was fed, so stop comparing here.
                parts.push(Err(err));
                return (parts, None);
            }
        }
    }

    (parts, Some(parser.finish()))
}

fuzz_target!(|data: &[u8]| {
    let (chunk_size, body) = match data.split_first() {
        Some((size, body)) => (usize::from(*size).max(1), body),
        None => return,
    };

    let whole = parse(std::iter::once(body));
    let chunked = parse(body.chunks(chunk_size));

    assert_eq!(whole, chunked);
});
