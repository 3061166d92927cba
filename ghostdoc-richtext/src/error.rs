/// Errors that can occur while flattening an HTML fragment.
///
/// Every variant is recoverable from the caller's point of view: the export
/// path falls back to inserting the original string as unformatted text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Input is not valid UTF-8 (first invalid byte at offset {offset})")]
    InvalidUtf8 { offset: usize },

    #[error("Unterminated tag '<{name}' starting at byte {offset}")]
    UnterminatedTag { name: String, offset: usize },

    #[error("Unterminated comment starting at byte {offset}")]
    UnterminatedComment { offset: usize },
}
