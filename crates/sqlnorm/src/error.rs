//! Error types for sqlnorm

use thiserror::Error;

/// The result type for sqlnorm operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring the library.
///
/// Tokenization and normalization themselves never fail: lexical problems
/// surface as `ERROR` or `INCOMPLETE_STRING` tokens in the stream and the
/// normalizer produces a best-effort result for malformed input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The dialect name is not a canonical name or a known alias
    #[error("unknown dialect: {0:?}")]
    UnknownDialect(String),
}
