use serde::Serialize;

/// Why a strict decode rejected its input.
///
/// Offsets for escape errors point at the `%` in the input. For
/// [`DecodeError::InvalidUtf8`] the offset is into the decoded byte buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecodeError {
    #[error("truncated escape at byte {offset}: `%` must be followed by two hex digits")]
    TruncatedEscape { offset: usize },

    #[error("invalid hex digit {found:?} in escape at byte {offset}")]
    InvalidHexDigit { offset: usize, found: char },

    #[error("decoded bytes are not valid UTF-8 (first bad byte at decoded offset {offset})")]
    InvalidUtf8 { offset: usize },
}

impl DecodeError {
    pub fn offset(&self) -> usize {
        match *self {
            DecodeError::TruncatedEscape { offset }
            | DecodeError::InvalidHexDigit { offset, .. }
            | DecodeError::InvalidUtf8 { offset } => offset,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown decode policy `{0}` (expected strict, lenient or pass-through)")]
pub struct ParsePolicyError(pub String);
