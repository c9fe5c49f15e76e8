#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StreamingStage {
    ReadingParts,
    Eof,
    Halted,
}
