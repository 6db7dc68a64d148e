//! SQL obfuscation
//!
//! The obfuscator is a projection over the token stream: literal values
//! are replaced with a placeholder and every other token passes through
//! with its original text, so the statement keeps its shape while the
//! data it carries is erased.

use crate::dialects::Dialect;
use crate::tokens::{Lexer, Token, TokenKind};
use serde::{Deserialize, Serialize};

/// Placeholder written for obfuscated numbers and strings.
pub const PLACEHOLDER: &str = "?";

/// Configuration for [`Obfuscator`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObfuscatorConfig {
    /// Replace digit runs inside identifiers with the placeholder, so
    /// sharded names like `users_2024` collapse to `users_?`
    pub replace_digits: bool,
    /// Obfuscate the inside of `$func$` bodies recursively instead of
    /// replacing the whole literal with the placeholder
    pub dollar_quoted_func: bool,
}

impl ObfuscatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_replace_digits(mut self, replace_digits: bool) -> Self {
        self.replace_digits = replace_digits;
        self
    }

    pub fn with_dollar_quoted_func(mut self, dollar_quoted_func: bool) -> Self {
        self.dollar_quoted_func = dollar_quoted_func;
        self
    }
}

/// The SQL obfuscator.
///
/// # Example
///
/// ```
/// use sqlnorm::{Obfuscator, ObfuscatorConfig};
///
/// let obfuscator = Obfuscator::new(ObfuscatorConfig::new());
/// let sql = obfuscator.obfuscate("SELECT * FROM users WHERE id = 42 AND name = 'j'");
/// assert_eq!(sql, "SELECT * FROM users WHERE id = ? AND name = ?");
/// ```
pub struct Obfuscator {
    config: ObfuscatorConfig,
}

impl Obfuscator {
    pub fn new(config: ObfuscatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ObfuscatorConfig {
        &self.config
    }

    /// Obfuscate a statement with the generic dialect.
    pub fn obfuscate(&self, input: &str) -> String {
        self.obfuscate_with(input, Dialect::default())
    }

    /// Obfuscate a statement lexed with the given dialect.
    pub fn obfuscate_with(&self, input: &str, dialect: Dialect) -> String {
        let mut out = String::with_capacity(input.len());
        let mut lexer = Lexer::with_dialect(input, dialect);
        loop {
            let token = lexer.scan_next();
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::Number
                | TokenKind::String
                | TokenKind::IncompleteString
                | TokenKind::DollarQuotedString => out.push_str(PLACEHOLDER),
                TokenKind::DollarQuotedFunction => {
                    if self.config.dollar_quoted_func {
                        let body =
                            &token.text["$func$".len()..token.text.len() - "$func$".len()];
                        out.push_str("$func$");
                        out.push_str(&self.obfuscate_with(body, dialect));
                        out.push_str("$func$");
                    } else {
                        out.push_str(PLACEHOLDER);
                    }
                }
                TokenKind::Ident if self.config.replace_digits => {
                    out.push_str(&scrub_digits(&token));
                }
                _ => out.push_str(&token.text),
            }
        }
        out.trim().to_string()
    }
}

/// Replace each run of digits in the token text with the placeholder,
/// using the digit offsets recorded by the lexer.
fn scrub_digits(token: &Token) -> String {
    let digits = token.digit_offsets();
    if digits.is_empty() {
        return token.text.clone();
    }
    let mut out = String::with_capacity(token.text.len());
    let mut digits = digits.iter().peekable();
    let mut in_run = false;
    for (offset, ch) in token.text.char_indices() {
        if digits.peek().is_some_and(|&&d| d == offset) {
            digits.next();
            if !in_run {
                out.push_str(PLACEHOLDER);
                in_run = true;
            }
            continue;
        }
        in_run = false;
        out.push(ch);
    }
    out
}
