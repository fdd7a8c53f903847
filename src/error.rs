use thiserror::Error;

/// Errors surfaced by codec construction and decoding.
///
/// An absent symbol is not an error: code lookups return an empty bit
/// sequence instead, and callers check for emptiness.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Construction was given empty text. The tree would be indeterminate,
    /// so this is rejected up front rather than producing an unusable
    /// instance.
    #[error("cannot learn a code from empty input")]
    EmptyInput,

    /// A decode traversal tried to descend past a leaf. Well-formed encoder
    /// output never produces this, but arbitrary bit input can.
    #[error("malformed bit stream: invalid traversal at bit {position}")]
    MalformedBitstream { position: usize },
}
