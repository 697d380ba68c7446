//! Error types for tree construction, encoding and decoding.

use thiserror::Error;

/// Error variants for Huffman operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Empty input, an overflowing frequency total, or a digit other than 0 or 1.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The symbol has no entry in the code table.
    #[error("symbol is not present in the code table")]
    UnknownSymbol,

    /// Encode or decode was requested before any tree was built.
    #[error("no tree has been built")]
    UninitializedTree,
}

/// A specialized Result type for Huffman operations.
pub type Result<T> = std::result::Result<T, Error>;
