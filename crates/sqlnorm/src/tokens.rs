//! Token types and the SQL lexer
//!
//! The lexer turns a SQL string into a lazy token stream. It never fails:
//! malformed input produces `ERROR` or `INCOMPLETE_STRING` tokens and
//! scanning continues. Dialect differences (dollar sign, colon, backtick,
//! at sign, hash, bracket) are handled by branching on the configured
//! [`Dialect`] at the dispatch points where the rules diverge.

use crate::chars::{
    is_alphanumeric, is_ascii_letter, is_digit, is_exponent_marker, is_identifier_part,
    is_leading_sign, is_letter, is_operator, is_punctuation, is_whitespace, is_wildcard, EOF_CHAR,
};
use crate::dialects::Dialect;
use crate::trie::KEYWORDS;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A byte range in the source SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    /// Starting byte offset
    pub start: usize,
    /// Ending byte offset (exclusive)
    pub end: usize,
}

/// All token kinds the lexer can produce.
///
/// `CTE_INDICATOR` is never emitted by the lexer itself: `AS` lexes as
/// `ALIAS_INDICATOR` and the normalizer upgrades it contextually when it
/// completes a `WITH <name> AS` binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    Error,
    Eof,
    Space,
    String,
    IncompleteString,
    Number,
    Ident,
    QuotedIdent,
    Operator,
    Wildcard,
    Comment,
    MultilineComment,
    Punctuation,
    DollarQuotedFunction,
    DollarQuotedString,
    PositionalParameter,
    BindParameter,
    Function,
    SystemVariable,
    Unknown,
    Command,
    Keyword,
    JsonOp,
    Boolean,
    Null,
    ProcIndicator,
    CteIndicator,
    AliasIndicator,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A token in the SQL token stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The matched source text
    pub text: String,
    /// Position of the matched text in the source
    pub span: Span,
    /// Set when the token is a keyword that introduces a table reference
    pub is_table_indicator: bool,
    /// Byte offsets of digits within `text`, recorded for identifiers
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) digits: Vec<usize>,
    /// Byte offsets of quote characters within `text`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) quotes: Vec<usize>,
}

impl Token {
    /// Byte offsets of digits inside the token text.
    pub fn digit_offsets(&self) -> &[usize] {
        &self.digits
    }

    /// Byte offsets of identifier-quote characters inside the token text.
    pub fn quote_offsets(&self) -> &[usize] {
        &self.quotes
    }

    /// The token text with the recorded quote characters removed.
    ///
    /// Handles dotted quoted identifiers: `"public"."users"` becomes
    /// `public.users` and `[dbo].[users]` becomes `dbo.users`.
    pub fn unquoted(&self) -> String {
        if self.quotes.is_empty() {
            return self.text.clone();
        }
        let mut quotes = self.quotes.iter().peekable();
        let mut out = String::with_capacity(self.text.len());
        for (offset, ch) in self.text.char_indices() {
            if quotes.peek().is_some_and(|&&q| q == offset) {
                quotes.next();
                continue;
            }
            out.push(ch);
        }
        out
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self.kind, self.text)
    }
}

/// The SQL lexer.
///
/// Call [`scan_next`](Lexer::scan_next) until it returns an
/// [`Eof`](TokenKind::Eof) token; after that every further call yields
/// `Eof` again. The `Iterator` impl yields tokens up to (excluding) the
/// end of stream.
///
/// # Example
///
/// ```
/// use sqlnorm::{Lexer, TokenKind};
///
/// let mut lexer = Lexer::new("SELECT 1");
/// let tokens = lexer.scan_all();
/// assert_eq!(tokens[0].kind, TokenKind::Command);
/// assert_eq!(tokens[2].kind, TokenKind::Number);
/// ```
pub struct Lexer<'a> {
    src: &'a str,
    dialect: Dialect,
    cursor: usize,
    start: usize,
    digits: Vec<usize>,
    quotes: Vec<usize>,
    is_table_indicator: bool,
}

impl<'a> Lexer<'a> {
    /// Create a lexer for the generic dialect.
    pub fn new(src: &'a str) -> Self {
        Self::with_dialect(src, Dialect::default())
    }

    /// Create a lexer configured for a specific dialect.
    pub fn with_dialect(src: &'a str, dialect: Dialect) -> Self {
        Self {
            src,
            dialect,
            cursor: 0,
            start: 0,
            digits: Vec::new(),
            quotes: Vec::new(),
            is_table_indicator: false,
        }
    }

    /// The dialect this lexer was configured with.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Scan every remaining token, excluding the trailing EOF.
    pub fn scan_all(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.scan_next();
            if token.kind == TokenKind::Eof {
                break;
            }
            tokens.push(token);
        }
        tokens
    }

    /// Scan the next token, advancing the cursor past the matched span.
    pub fn scan_next(&mut self) -> Token {
        let ch = self.peek();
        match ch {
            _ if self.at_end() => {
                self.start = self.cursor;
                self.emit(TokenKind::Eof)
            }
            c if is_whitespace(c) => self.scan_whitespace(),
            c if is_letter(c) => self.scan_identifier_or_keyword(),
            '"' => self.scan_quoted_identifier('"'),
            '\'' => self.scan_string(),
            '-' if self.look_ahead(1) == '-' => self.scan_line_comment(2),
            '/' if self.look_ahead(1) == '*' => self.scan_block_comment(),
            c if is_leading_sign(c) => {
                let next = self.look_ahead(1);
                if is_digit(next) || next == '.' {
                    self.scan_signed_number()
                } else {
                    self.scan_operator()
                }
            }
            c if is_digit(c) => self.scan_number(),
            c if is_wildcard(c) => self.scan_wildcard(),
            '$' => {
                if is_digit(self.look_ahead(1)) {
                    self.scan_positional_parameter()
                } else if self.dialect == Dialect::SqlServer && is_letter(self.look_ahead(1)) {
                    self.scan_identifier_or_keyword()
                } else {
                    self.scan_dollar_quoted()
                }
            }
            ':' => {
                if self.dialect == Dialect::Oracle && is_alphanumeric(self.look_ahead(1)) {
                    self.scan_bind_parameter()
                } else {
                    self.scan_operator()
                }
            }
            '`' => {
                if self.dialect == Dialect::MySql {
                    self.scan_quoted_identifier('`')
                } else {
                    self.scan_operator()
                }
            }
            '#' => match self.dialect {
                Dialect::SqlServer => self.scan_identifier_or_keyword(),
                Dialect::MySql => self.scan_line_comment(1),
                _ => self.scan_operator(),
            },
            '@' => self.scan_at_sign(),
            c if is_operator(c) => self.scan_operator(),
            c if is_punctuation(c) => {
                if c == '[' && self.dialect == Dialect::SqlServer {
                    self.scan_quoted_identifier('[')
                } else {
                    self.scan_punctuation()
                }
            }
            _ => self.scan_unknown(),
        }
    }

    fn at_end(&self) -> bool {
        self.cursor >= self.src.len()
    }

    fn peek(&self) -> char {
        self.src[self.cursor..].chars().next().unwrap_or(EOF_CHAR)
    }

    fn look_ahead(&self, n: usize) -> char {
        self.src[self.cursor..].chars().nth(n).unwrap_or(EOF_CHAR)
    }

    fn advance(&mut self) {
        if let Some(ch) = self.src[self.cursor..].chars().next() {
            self.cursor += ch.len_utf8();
        }
    }

    fn rest_starts_with(&self, chars: &[char]) -> bool {
        let mut rest = self.src[self.cursor..].chars();
        chars.iter().all(|&c| rest.next() == Some(c))
    }

    fn scan_whitespace(&mut self) -> Token {
        self.start = self.cursor;
        while is_whitespace(self.peek()) {
            self.advance();
        }
        self.emit(TokenKind::Space)
    }

    fn scan_identifier_or_keyword(&mut self) -> Token {
        self.start = self.cursor;
        let mut ch = self.peek();

        // a non-ASCII leading letter can never start a keyword
        if !ch.is_ascii() {
            while is_identifier_part(ch) {
                if is_digit(ch) {
                    self.digits.push(self.cursor);
                }
                self.advance();
                ch = self.peek();
            }
            return self.emit(TokenKind::Ident);
        }

        let mut node = Some(KEYWORDS.root());
        let mut end_of_match = self.cursor;
        while is_ascii_letter(ch) || ch == '_' {
            match node.and_then(|n| n.step(ch)) {
                Some(next) => {
                    node = Some(next);
                    end_of_match = self.cursor;
                    self.advance();
                    ch = self.peek();
                }
                None => {
                    // no keyword can match anymore, keep consuming as an
                    // identifier below
                    node = None;
                    self.advance();
                    break;
                }
            }
        }

        if let Some(info) = node.and_then(|n| n.info()) {
            let next = self.peek();
            if is_punctuation(next) || is_whitespace(next) || self.at_end() {
                // rewind past any lookahead; keyword characters are ASCII
                self.cursor = end_of_match + 1;
                self.is_table_indicator = info.is_table_indicator;
                return self.emit(info.kind);
            }
        }

        let mut ch = self.peek();
        while is_identifier_part(ch) {
            if is_digit(ch) {
                self.digits.push(self.cursor);
            }
            self.advance();
            ch = self.peek();
        }
        if ch == '(' {
            return self.emit(TokenKind::Function);
        }
        self.emit(TokenKind::Ident)
    }

    fn scan_quoted_identifier(&mut self, open: char) -> Token {
        let close = if open == '[' { ']' } else { open };
        self.start = self.cursor;
        self.quotes.push(self.cursor);
        self.advance(); // opening delimiter
        loop {
            if self.at_end() {
                return self.emit(TokenKind::Error);
            }
            let ch = self.peek();
            if ch == close {
                self.quotes.push(self.cursor);
                // dotted continuation: "a"."b" and [a].[b] stay one token
                if self.rest_starts_with(&[close, '.', open]) {
                    self.quotes.push(self.cursor + 2);
                    self.advance();
                    self.advance();
                    self.advance();
                    continue;
                }
                break;
            }
            if is_digit(ch) {
                self.digits.push(self.cursor);
            }
            self.advance();
        }
        self.advance(); // closing delimiter
        self.emit(TokenKind::QuotedIdent)
    }

    fn scan_string(&mut self) -> Token {
        self.start = self.cursor;
        self.advance(); // opening quote
        let mut escaped = false;
        loop {
            if self.at_end() {
                return self.emit(TokenKind::IncompleteString);
            }
            let ch = self.peek();
            self.advance();
            if escaped {
                escaped = false;
                continue;
            }
            match ch {
                '\\' => escaped = true,
                '\'' => return self.emit(TokenKind::String),
                _ => {}
            }
        }
    }

    fn scan_line_comment(&mut self, marker_len: usize) -> Token {
        self.start = self.cursor;
        for _ in 0..marker_len {
            self.advance();
        }
        while !self.at_end() && self.peek() != '\n' {
            self.advance();
        }
        self.emit(TokenKind::Comment)
    }

    fn scan_block_comment(&mut self) -> Token {
        self.start = self.cursor;
        self.advance();
        self.advance(); // consume /*
        loop {
            if self.at_end() {
                return self.emit(TokenKind::Error);
            }
            if self.peek() == '*' && self.look_ahead(1) == '/' {
                self.advance();
                self.advance();
                break;
            }
            self.advance();
        }
        self.emit(TokenKind::MultilineComment)
    }

    fn scan_signed_number(&mut self) -> Token {
        self.start = self.cursor;
        self.advance(); // leading sign
        self.scan_decimal_tail()
    }

    fn scan_number(&mut self) -> Token {
        self.start = self.cursor;
        if self.peek() == '0' {
            match self.look_ahead(1) {
                'x' | 'X' => return self.scan_hex_number(),
                '0'..='7' => return self.scan_octal_number(),
                _ => {}
            }
        }
        self.advance(); // first digit
        self.scan_decimal_tail()
    }

    fn scan_decimal_tail(&mut self) -> Token {
        let mut seen_dot = false;
        let mut seen_exponent = false;
        loop {
            let ch = self.peek();
            if is_digit(ch) {
                self.advance();
            } else if ch == '.' && !seen_dot && !seen_exponent {
                seen_dot = true;
                self.advance();
            } else if is_exponent_marker(ch) && !seen_exponent {
                seen_exponent = true;
                self.advance();
                if is_leading_sign(self.peek()) {
                    self.advance();
                }
            } else {
                break;
            }
        }
        self.emit(TokenKind::Number)
    }

    fn scan_hex_number(&mut self) -> Token {
        self.advance();
        self.advance(); // consume 0x or 0X
        while self.peek().is_ascii_hexdigit() {
            self.advance();
        }
        self.emit(TokenKind::Number)
    }

    fn scan_octal_number(&mut self) -> Token {
        self.advance();
        self.advance(); // leading zero and first octal digit
        while matches!(self.peek(), '0'..='7') {
            self.advance();
        }
        self.emit(TokenKind::Number)
    }

    fn scan_wildcard(&mut self) -> Token {
        self.start = self.cursor;
        self.advance();
        self.emit(TokenKind::Wildcard)
    }

    fn scan_operator(&mut self) -> Token {
        self.start = self.cursor;
        let first = self.peek();
        self.advance();

        // multi-character JSON operators lex as single tokens
        match (first, self.peek()) {
            ('-', '>') | ('#', '>') => {
                self.advance();
                if self.peek() == '>' {
                    self.advance();
                }
                return self.emit(TokenKind::JsonOp);
            }
            ('#', '-') | ('?', '|') | ('?', '&') | ('<', '@') => {
                self.advance();
                return self.emit(TokenKind::JsonOp);
            }
            _ => {}
        }

        let mut last = first;
        loop {
            let ch = self.peek();
            // an operator run refuses ? and @ after = so `=?` stays two tokens
            if !is_operator(ch) || (last == '=' && matches!(ch, '?' | '@')) {
                break;
            }
            last = ch;
            self.advance();
        }
        self.emit(TokenKind::Operator)
    }

    fn scan_punctuation(&mut self) -> Token {
        self.start = self.cursor;
        self.advance();
        self.emit(TokenKind::Punctuation)
    }

    fn scan_dollar_quoted(&mut self) -> Token {
        self.start = self.cursor;
        self.advance(); // opening dollar
        while !self.at_end() && self.peek() != '$' {
            self.advance();
        }
        self.advance(); // closing dollar of the tag
        let src = self.src;
        let tag = &src[self.start..self.cursor];
        while !self.at_end() {
            if src[self.cursor..].starts_with(tag) {
                self.cursor += tag.len();
                let kind = if tag == "$func$" {
                    TokenKind::DollarQuotedFunction
                } else {
                    TokenKind::DollarQuotedString
                };
                return self.emit(kind);
            }
            self.advance();
        }
        self.emit(TokenKind::Error)
    }

    fn scan_positional_parameter(&mut self) -> Token {
        self.start = self.cursor;
        self.advance();
        self.advance(); // dollar sign and first digit
        while is_digit(self.peek()) {
            self.advance();
        }
        self.emit(TokenKind::PositionalParameter)
    }

    fn scan_bind_parameter(&mut self) -> Token {
        self.start = self.cursor;
        self.advance();
        self.advance(); // colon or at sign, plus the first name character
        while is_alphanumeric(self.peek()) {
            self.advance();
        }
        self.emit(TokenKind::BindParameter)
    }

    fn scan_system_variable(&mut self) -> Token {
        self.start = self.cursor;
        self.advance();
        self.advance(); // consume @@
        if !is_alphanumeric(self.peek()) {
            return self.emit(TokenKind::Error);
        }
        while is_alphanumeric(self.peek()) {
            self.advance();
        }
        self.emit(TokenKind::SystemVariable)
    }

    fn scan_at_sign(&mut self) -> Token {
        if self.look_ahead(1) == '@' {
            if is_alphanumeric(self.look_ahead(2)) {
                return self.scan_system_variable();
            }
            self.start = self.cursor;
            self.advance();
            self.advance();
            return self.emit(TokenKind::JsonOp);
        }
        if is_alphanumeric(self.look_ahead(1)) {
            if self.dialect == Dialect::Snowflake {
                return self.scan_identifier_or_keyword();
            }
            return self.scan_bind_parameter();
        }
        if matches!(self.look_ahead(1), '?' | '>') {
            self.start = self.cursor;
            self.advance();
            self.advance();
            return self.emit(TokenKind::JsonOp);
        }
        self.scan_operator()
    }

    fn scan_unknown(&mut self) -> Token {
        self.start = self.cursor;
        self.advance();
        self.emit(TokenKind::Unknown)
    }

    fn emit(&mut self, kind: TokenKind) -> Token {
        let start = self.start;
        let text = self.src[start..self.cursor].to_string();
        let digits = std::mem::take(&mut self.digits)
            .into_iter()
            .map(|offset| offset - start)
            .collect();
        let quotes = std::mem::take(&mut self.quotes)
            .into_iter()
            .map(|offset| offset - start)
            .collect();
        let token = Token {
            kind,
            text,
            span: Span {
                start,
                end: self.cursor,
            },
            is_table_indicator: std::mem::take(&mut self.is_table_indicator),
            digits,
            quotes,
        };
        self.start = self.cursor;
        token
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.scan_next();
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eof_is_sticky() {
        let mut lexer = Lexer::new("a");
        assert_eq!(lexer.scan_next().kind, TokenKind::Ident);
        assert_eq!(lexer.scan_next().kind, TokenKind::Eof);
        assert_eq!(lexer.scan_next().kind, TokenKind::Eof);
    }

    #[test]
    fn test_unquoted_dotted_identifier() {
        let mut lexer = Lexer::new(r#""public"."users""#);
        let token = lexer.scan_next();
        assert_eq!(token.kind, TokenKind::QuotedIdent);
        assert_eq!(token.text, r#""public"."users""#);
        assert_eq!(token.unquoted(), "public.users");
    }

    #[test]
    fn test_bracket_identifier_unquoted() {
        let mut lexer = Lexer::with_dialect("[dbo].[users]", Dialect::SqlServer);
        let token = lexer.scan_next();
        assert_eq!(token.kind, TokenKind::QuotedIdent);
        assert_eq!(token.unquoted(), "dbo.users");
    }

    #[test]
    fn test_digit_offsets_relative_to_token() {
        let mut lexer = Lexer::new("SELECT users123");
        let tokens = lexer.scan_all();
        let ident = &tokens[2];
        assert_eq!(ident.text, "users123");
        assert_eq!(ident.digit_offsets(), &[5, 6, 7]);
    }
}
