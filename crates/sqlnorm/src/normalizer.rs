//! SQL normalization
//!
//! The normalizer consumes the token stream and rebuilds the statement in
//! a canonical shape: whitespace and comments are regularized, aliases
//! are elided, runs of obfuscated values collapse to a single
//! placeholder, and `$func$` bodies are normalized recursively. Alongside
//! the text it collects statement metadata: referenced tables, commands,
//! comments and procedure names, each deduplicated in first-occurrence
//! order.

use crate::dialects::Dialect;
use crate::obfuscator::PLACEHOLDER;
use crate::tokens::{Lexer, Token, TokenKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Nested `$func$` bodies beyond this depth are left unchanged.
const MAX_FUNCTION_BODY_DEPTH: usize = 16;

/// Configuration for [`Normalizer`], built with `with_*` methods.
///
/// # Example
///
/// ```
/// use sqlnorm::NormalizerConfig;
///
/// let config = NormalizerConfig::new()
///     .with_collect_tables(true)
///     .with_collect_commands(true);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Collect the table names the statement addresses
    pub collect_tables: bool,
    /// Collect SQL commands (SELECT, INSERT, ...), uppercased
    pub collect_commands: bool,
    /// Collect comment blocks with their original text
    pub collect_comments: bool,
    /// Collect stored-procedure names
    pub collect_procedures: bool,
    /// Keep `AS <ident>` alias sequences instead of eliding them
    pub keep_sql_alias: bool,
    /// Uppercase COMMAND and KEYWORD tokens on output
    pub uppercase_keywords: bool,
    /// Drop the spaces inside `(...)`/`[...]` and after function names
    pub remove_space_between_parentheses: bool,
    /// Keep a trailing semicolon (PL/SQL requires one)
    pub keep_trailing_semicolon: bool,
    /// Keep `"`, `` ` `` and `[]` quotation around identifiers
    pub keep_identifier_quotation: bool,
}

impl NormalizerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collect_tables(mut self, collect_tables: bool) -> Self {
        self.collect_tables = collect_tables;
        self
    }

    pub fn with_collect_commands(mut self, collect_commands: bool) -> Self {
        self.collect_commands = collect_commands;
        self
    }

    pub fn with_collect_comments(mut self, collect_comments: bool) -> Self {
        self.collect_comments = collect_comments;
        self
    }

    pub fn with_collect_procedures(mut self, collect_procedures: bool) -> Self {
        self.collect_procedures = collect_procedures;
        self
    }

    pub fn with_keep_sql_alias(mut self, keep_sql_alias: bool) -> Self {
        self.keep_sql_alias = keep_sql_alias;
        self
    }

    pub fn with_uppercase_keywords(mut self, uppercase_keywords: bool) -> Self {
        self.uppercase_keywords = uppercase_keywords;
        self
    }

    pub fn with_remove_space_between_parentheses(
        mut self,
        remove_space_between_parentheses: bool,
    ) -> Self {
        self.remove_space_between_parentheses = remove_space_between_parentheses;
        self
    }

    pub fn with_keep_trailing_semicolon(mut self, keep_trailing_semicolon: bool) -> Self {
        self.keep_trailing_semicolon = keep_trailing_semicolon;
        self
    }

    pub fn with_keep_identifier_quotation(mut self, keep_identifier_quotation: bool) -> Self {
        self.keep_identifier_quotation = keep_identifier_quotation;
        self
    }
}

/// Metadata describing a statement, populated during normalization.
///
/// Each sequence preserves first-occurrence order and contains no
/// duplicates. `size` is the sum of the byte lengths of every stored
/// string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatementMetadata {
    /// Total byte length of all collected strings
    pub size: usize,
    /// Referenced table names
    pub tables: Vec<String>,
    /// Comment blocks, original text
    pub comments: Vec<String>,
    /// SQL commands, uppercased
    pub commands: Vec<String>,
    /// Stored-procedure names
    pub procedures: Vec<String>,
    #[serde(skip)]
    tables_seen: HashSet<String>,
    #[serde(skip)]
    comments_seen: HashSet<String>,
    #[serde(skip)]
    commands_seen: HashSet<String>,
    #[serde(skip)]
    procedures_seen: HashSet<String>,
}

impl StatementMetadata {
    fn add_table(&mut self, value: String) {
        Self::add(&mut self.tables, &mut self.tables_seen, &mut self.size, value);
    }

    fn add_comment(&mut self, value: String) {
        Self::add(&mut self.comments, &mut self.comments_seen, &mut self.size, value);
    }

    fn add_command(&mut self, value: String) {
        Self::add(&mut self.commands, &mut self.commands_seen, &mut self.size, value);
    }

    fn add_procedure(&mut self, value: String) {
        Self::add(&mut self.procedures, &mut self.procedures_seen, &mut self.size, value);
    }

    fn add(items: &mut Vec<String>, seen: &mut HashSet<String>, size: &mut usize, value: String) {
        if seen.insert(value.clone()) {
            *size += value.len();
            items.push(value);
        }
    }
}

/// Snapshot of the last non-space, non-comment token.
#[derive(Debug, Clone)]
struct LastValue {
    kind: TokenKind,
    value: String,
    is_table_indicator: bool,
}

/// Tracks a leading fully-parenthesized expression so that a statement
/// consisting of nothing else keeps its original shape.
#[derive(Debug, Default)]
struct HeadState {
    seen_first_token: bool,
    in_leading_parens: bool,
    found_leading_parens: bool,
    standalone: bool,
    buffer: String,
}

#[derive(Debug, Default)]
struct NormalizeState {
    out: String,
    head: HeadState,
    groupable: bool,
    last_value: Option<LastValue>,
    with_ident_pending: bool,
    ctes: HashSet<String>,
}

/// The SQL normalizer.
///
/// # Example
///
/// ```
/// use sqlnorm::{Normalizer, NormalizerConfig};
///
/// let normalizer = Normalizer::new(
///     NormalizerConfig::new().with_collect_tables(true),
/// );
/// let (sql, metadata) = normalizer.normalize("SELECT * FROM users WHERE id IN (?, ?)");
/// assert_eq!(sql, "SELECT * FROM users WHERE id IN ( ? )");
/// assert_eq!(metadata.tables, ["users"]);
/// ```
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Normalize a statement with the generic dialect.
    pub fn normalize(&self, input: &str) -> (String, StatementMetadata) {
        self.normalize_with(input, Dialect::default())
    }

    /// Normalize a statement lexed with the given dialect.
    pub fn normalize_with(&self, input: &str, dialect: Dialect) -> (String, StatementMetadata) {
        self.normalize_at_depth(input, dialect, 0)
    }

    fn normalize_at_depth(
        &self,
        input: &str,
        dialect: Dialect,
        depth: usize,
    ) -> (String, StatementMetadata) {
        let mut lexer = Lexer::with_dialect(input, dialect);
        let mut metadata = StatementMetadata::default();
        let mut st = NormalizeState {
            out: String::with_capacity(input.len()),
            ..Default::default()
        };

        loop {
            let token = lexer.scan_next();
            if matches!(
                token.kind,
                TokenKind::Space | TokenKind::Comment | TokenKind::MultilineComment
            ) {
                if self.should_collect() {
                    self.collect_metadata(&token, &token.text, &mut st, &mut metadata);
                }
                continue;
            }
            let value = self.output_value(&token, dialect, depth);
            if self.should_collect() {
                self.collect_metadata(&token, &value, &mut st, &mut metadata);
            }
            self.write_output(&token, &value, &mut st);
            if token.kind == TokenKind::Eof {
                break;
            }
            self.update_last_value(&token, value, &mut st);
        }

        let mut normalized = st.out;
        if !self.config.keep_trailing_semicolon && normalized.ends_with(';') {
            normalized.truncate(normalized.len() - 1);
        }
        let normalized = normalized.trim().to_string();
        (normalized, metadata)
    }

    fn should_collect(&self) -> bool {
        self.config.collect_tables
            || self.config.collect_commands
            || self.config.collect_comments
            || self.config.collect_procedures
    }

    /// The value a token contributes to the output: quoted identifiers
    /// are unquoted unless configured otherwise, and non-obfuscated
    /// `$func$` bodies are normalized recursively with the same
    /// configuration and dialect. Past the recursion bound the token is
    /// left unchanged.
    fn output_value(&self, token: &Token, dialect: Dialect, depth: usize) -> String {
        match token.kind {
            TokenKind::QuotedIdent if !self.config.keep_identifier_quotation => token.unquoted(),
            TokenKind::DollarQuotedFunction
                if token.text != PLACEHOLDER && depth < MAX_FUNCTION_BODY_DEPTH =>
            {
                let body = &token.text["$func$".len()..token.text.len() - "$func$".len()];
                let (normalized, _) = self.normalize_at_depth(body, dialect, depth + 1);
                format!("$func${normalized}$func$")
            }
            _ => token.text.clone(),
        }
    }

    fn collect_metadata(
        &self,
        token: &Token,
        value: &str,
        st: &mut NormalizeState,
        metadata: &mut StatementMetadata,
    ) {
        match token.kind {
            TokenKind::Comment | TokenKind::MultilineComment => {
                if self.config.collect_comments {
                    metadata.add_comment(value.to_string());
                }
            }
            TokenKind::Command => {
                if self.config.collect_commands {
                    metadata.add_command(value.to_ascii_uppercase());
                }
            }
            TokenKind::Ident | TokenKind::QuotedIdent | TokenKind::Function => {
                let Some(last) = &st.last_value else { return };
                if last.kind == TokenKind::CteIndicator {
                    st.ctes.insert(value.to_string());
                } else if self.config.collect_tables
                    && last.is_table_indicator
                    && !st.ctes.contains(value)
                {
                    metadata.add_table(value.to_string());
                } else if self.config.collect_procedures && last.kind == TokenKind::ProcIndicator {
                    metadata.add_procedure(value.to_string());
                }
            }
            _ => {}
        }
    }

    fn write_output(&self, token: &Token, value: &str, st: &mut NormalizeState) {
        if !st.head.seen_first_token {
            st.head.seen_first_token = true;
            if token.kind == TokenKind::Punctuation && value == "(" {
                st.head.in_leading_parens = true;
                st.head.standalone = true;
            }
        }
        if token.kind == TokenKind::Eof {
            if st.head.standalone {
                let buffered = std::mem::take(&mut st.head.buffer);
                st.out.push_str(&buffered);
            }
            return;
        }
        if st.head.found_leading_parens && st.head.standalone {
            // a token after the closing parenthesis: the expression is not
            // the whole statement, so it moves into the main output
            st.head.standalone = false;
            let buffered = std::mem::take(&mut st.head.buffer);
            st.out.push_str(&buffered);
        }

        let last = st.last_value.clone();

        if !self.config.keep_sql_alias {
            if token.kind == TokenKind::AliasIndicator {
                return;
            }
            if let Some(last) = &last {
                if last.kind == TokenKind::AliasIndicator && token.kind == TokenKind::Ident {
                    return;
                }
                if matches!(
                    last.kind,
                    TokenKind::AliasIndicator | TokenKind::CteIndicator
                ) {
                    // not an aliased identifier after all (e.g. the `(` of
                    // `WITH x AS (...)`): put the elided AS back first
                    let target = if st.head.in_leading_parens {
                        &mut st.head.buffer
                    } else {
                        &mut st.out
                    };
                    self.append_whitespace(value, Some(last), target);
                    target.push_str(&last.value);
                }
            }
        }

        let target = if st.head.in_leading_parens {
            &mut st.head.buffer
        } else {
            &mut st.out
        };
        if self.grouping_suppresses(value, last.as_ref(), &mut st.groupable, target) {
            return;
        }
        self.append_whitespace(value, last.as_ref(), target);
        self.push_value(token.kind, value, target);

        if st.head.in_leading_parens && token.kind == TokenKind::Punctuation && value == ")" {
            st.head.in_leading_parens = false;
            st.head.found_leading_parens = true;
        }
    }

    /// Collapse runs of obfuscated values inside `(...)` or `[...]` into a
    /// single placeholder: `(?, ?, ?)` becomes `( ? )`. Returns true when
    /// the current token must not be written.
    fn grouping_suppresses(
        &self,
        value: &str,
        last: Option<&LastValue>,
        groupable: &mut bool,
        target: &mut String,
    ) -> bool {
        let placeholder = value == PLACEHOLDER;
        if placeholder {
            if let Some(last) = last {
                if last.value == "(" || last.value == "[" {
                    // start of a groupable run; the first placeholder is
                    // still written
                    *groupable = true;
                } else if last.value == "," && *groupable {
                    return true;
                }
            }
        }
        if let Some(last) = last {
            if last.value == PLACEHOLDER && value == "," && *groupable {
                return true;
            }
        }
        if *groupable && (value == ")" || value == "]") {
            *groupable = false;
            return false;
        }
        if *groupable && !placeholder && last.is_some_and(|l| l.value == ",") {
            // a non-placeholder ends the run after a suppressed comma, as
            // in `(?, ARRAY[?, ?])`: restore the comma before it
            target.push(',');
        }
        false
    }

    fn append_whitespace(&self, value: &str, last: Option<&LastValue>, target: &mut String) {
        if target.is_empty() {
            return;
        }
        if self.config.remove_space_between_parentheses {
            if last.is_some_and(|l| {
                l.kind == TokenKind::Function || l.value == "(" || l.value == "["
            }) {
                return;
            }
            if value == ")" || value == "]" {
                return;
            }
        }
        match value {
            "," | ";" => {}
            "=" if last.is_some_and(|l| l.value == ":") => {}
            _ => target.push(' '),
        }
    }

    fn push_value(&self, kind: TokenKind, value: &str, target: &mut String) {
        if self.config.uppercase_keywords
            && matches!(kind, TokenKind::Command | TokenKind::Keyword)
        {
            target.push_str(&value.to_uppercase());
        } else {
            target.push_str(value);
        }
    }

    fn update_last_value(&self, token: &Token, value: String, st: &mut NormalizeState) {
        let mut kind = token.kind;
        if kind == TokenKind::AliasIndicator && st.with_ident_pending {
            // `WITH <name> AS` completes a CTE binding: remember the name
            // and let this AS act as the CTE indicator from here on
            if let Some(last) = &st.last_value {
                st.ctes.insert(last.value.clone());
            }
            kind = TokenKind::CteIndicator;
        }
        st.with_ident_pending = token.kind == TokenKind::Ident
            && st.last_value.as_ref().is_some_and(|last| {
                last.kind == TokenKind::Keyword && last.value.eq_ignore_ascii_case("WITH")
            });
        st.last_value = Some(LastValue {
            kind,
            value,
            is_table_indicator: token.is_table_indicator,
        });
    }
}
