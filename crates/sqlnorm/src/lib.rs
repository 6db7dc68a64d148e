//! sqlnorm - SQL normalization, obfuscation and statement metadata
//!
//! This library collapses textually distinct SQL statements into a single
//! canonical identity for query fingerprinting, observability tagging and
//! log shipping.
//!
//! # Architecture
//!
//! The library follows a pipeline architecture:
//! 1. **Lexer** - Converts the SQL string to a lazy token stream
//! 2. **Normalizer** - Rewrites the stream into a canonical form and
//!    collects statement metadata (tables, commands, comments, procedures)
//! 3. **Obfuscator** - Projects the stream with literal values replaced by
//!    placeholders
//!
//! The lexer is dialect-aware (PostgreSQL, MySQL, SQL Server, Oracle,
//! Snowflake) and never fails: malformed input degrades to error tokens
//! and best-effort output. Nothing here parses SQL - there is no grammar
//! and no AST, only a token stream and a state machine over it.

mod chars;

pub mod dialects;
pub mod error;
pub mod normalizer;
pub mod obfuscator;
pub mod tokens;
pub mod trie;

pub use dialects::Dialect;
pub use error::{Error, Result};
pub use normalizer::{Normalizer, NormalizerConfig, StatementMetadata};
pub use obfuscator::{Obfuscator, ObfuscatorConfig, PLACEHOLDER};
pub use tokens::{Lexer, Span, Token, TokenKind};
pub use trie::{KeywordInfo, KeywordTrie};

/// Normalize a statement with the default configuration and dialect.
///
/// Metadata collection is off by default; construct a [`Normalizer`] with
/// a [`NormalizerConfig`] to turn the individual collections on.
///
/// # Example
///
/// ```
/// use sqlnorm::normalize;
///
/// let (sql, _) = normalize("SELECT  *  FROM users   WHERE id IN (?, ?, ?)");
/// assert_eq!(sql, "SELECT * FROM users WHERE id IN ( ? )");
/// ```
pub fn normalize(sql: &str) -> (String, StatementMetadata) {
    Normalizer::new(NormalizerConfig::new()).normalize(sql)
}

/// Obfuscate a statement with the default configuration and dialect.
///
/// # Example
///
/// ```
/// use sqlnorm::obfuscate;
///
/// let sql = obfuscate("SELECT * FROM users WHERE id = 42");
/// assert_eq!(sql, "SELECT * FROM users WHERE id = ?");
/// ```
pub fn obfuscate(sql: &str) -> String {
    Obfuscator::new(ObfuscatorConfig::new()).obfuscate(sql)
}
