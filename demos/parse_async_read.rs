use tokio::io::AsyncRead;
// Import partsplit types.
use partsplit::{Multipart, Part};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Generate an `AsyncRead` and the boundary from somewhere e.g. server request body.
    let (reader, boundary) = get_async_reader_from_somewhere().await;

    // Create a `Multipart` instance from that async reader and the boundary.
    let mut multipart = Multipart::with_reader(reader, boundary);

    // Iterate over the parts, use `next_part()` to get the next part.
    while let Some(part) = multipart.next_part().await? {
        match part {
            Part::Field(field) => println!("Field: {:?} = {:?}", field.name(), field.text()),
            Part::File(file) => println!(
                "File: {:?} ({}, {}) = {:?}",
                file.name(),
                file.file_name(),
                file.content_type(),
                file.text()
            ),
        }
    }

    Ok(())
}

// Generate an `AsyncRead` and the boundary from somewhere e.g. server request body.
async fn get_async_reader_from_somewhere() -> (impl AsyncRead, String) {
    let data = "--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"My Field\"\r\n\r\nabcd\r\n--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"File Field\"; filename=\"a-text-file.txt\"\r\nContent-Type: text/plain\r\n\r\nHello world\nHello\r\nWorld\rAgain\r\n--X-BOUNDARY--\r\n";
    let boundary = partsplit::parse_boundary("multipart/form-data; boundary=X-BOUNDARY").unwrap_or_default();

    (data.as_bytes(), boundary)
}
