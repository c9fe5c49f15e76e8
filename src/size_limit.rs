use crate::constants;

/// Represents size limit of the stream to prevent DDoS attack.
///
/// Please refer [`Constraints`](./struct.Constraints.html) for more info.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeLimit {
    pub(crate) whole_stream: u64,
}

impl SizeLimit {
    /// Creates a default size limit which is [`u64::MAX`](https://doc.rust-lang.org/stable/std/primitive.u64.html#associatedconstant.MAX)
    /// for the whole stream.
    pub fn new() -> SizeLimit {
        SizeLimit::default()
    }

    /// Sets size limit for the whole stream, counted over every chunk fed.
    pub fn whole_stream(mut self, limit: u64) -> SizeLimit {
        self.whole_stream = limit;
        self
    }
}

impl Default for SizeLimit {
    fn default() -> Self {
        SizeLimit {
            whole_stream: constants::DEFAULT_WHOLE_STREAM_SIZE_LIMIT,
        }
    }
}
