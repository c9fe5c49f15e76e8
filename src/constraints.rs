use crate::size_limit::SizeLimit;

/// Represents some rules to be applied on the stream to prevent DDoS attack.
///
/// # Examples
///
/// ```
/// use partsplit::{Constraints, Parser, SizeLimit};
///
/// let constraints = Constraints::new().size_limit(SizeLimit::new().whole_stream(15 * 1024 * 1024));
///
/// let parser = Parser::with_constraints("X-BOUNDARY", constraints);
/// # drop(parser);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Constraints {
    pub(crate) size_limit: SizeLimit,
}

impl Constraints {
    /// Creates a set of rules with default behaviour.
    pub fn new() -> Constraints {
        Constraints::default()
    }

    /// Sets size limit for the whole stream.
    pub fn size_limit(mut self, size_limit: SizeLimit) -> Constraints {
        self.size_limit = size_limit;
        self
    }
}
