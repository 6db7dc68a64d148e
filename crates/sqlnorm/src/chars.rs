//! Character classification for the SQL lexer.
//!
//! Pure predicates over a single code point. The lexer's `peek` returns
//! [`EOF_CHAR`] past the end of input; an embedded NUL in the source is
//! not end-of-input and falls through to the `UNKNOWN` token path.

/// Sentinel returned by the lexer when peeking past the end of input.
pub(crate) const EOF_CHAR: char = '\0';

pub(crate) fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r')
}

pub(crate) fn is_ascii_letter(ch: char) -> bool {
    ch.is_ascii_alphabetic()
}

/// Letters that can start an identifier: ASCII letters, underscore, and
/// any non-ASCII alphabetic code point.
pub(crate) fn is_letter(ch: char) -> bool {
    is_ascii_letter(ch) || ch == '_' || (!ch.is_ascii() && ch.is_alphabetic())
}

pub(crate) fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

pub(crate) fn is_alphanumeric(ch: char) -> bool {
    is_letter(ch) || is_digit(ch)
}

/// Identifier continuation characters.
///
/// `?` keeps already-obfuscated fragments such as `vs?.host` intact, `.`
/// keeps `schema.table` a single token, and `$`/`#`/`@` cover SQL Server
/// (`$action`, `#temp`) and Snowflake (`@stage`) name forms.
pub(crate) fn is_identifier_part(ch: char) -> bool {
    matches!(ch, '.' | '?' | '$' | '#' | '@') || is_alphanumeric(ch)
}

pub(crate) fn is_leading_sign(ch: char) -> bool {
    matches!(ch, '+' | '-')
}

pub(crate) fn is_exponent_marker(ch: char) -> bool {
    matches!(ch, 'e' | 'E')
}

/// Operator code points. `*` is absent: it dispatches to `WILDCARD`
/// before operator handling and never joins an operator run.
pub(crate) fn is_operator(ch: char) -> bool {
    matches!(
        ch,
        '+' | '-' | '/' | '%' | '=' | '<' | '>' | '!' | '&' | '|' | '^' | '~' | '?' | '@' | ':'
            | '#'
    )
}

pub(crate) fn is_punctuation(ch: char) -> bool {
    matches!(ch, '(' | ')' | '[' | ']' | '{' | '}' | ',' | ';' | '.')
}

pub(crate) fn is_wildcard(ch: char) -> bool {
    ch == '*'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_part_covers_dialect_name_forms() {
        for ch in ['a', 'Z', '0', '_', '.', '?', '$', '#', '@'] {
            assert!(is_identifier_part(ch), "{ch:?} should continue an identifier");
        }
        for ch in ['(', ')', ' ', '\'', '"', '*', ','] {
            assert!(!is_identifier_part(ch), "{ch:?} should end an identifier");
        }
    }

    #[test]
    fn test_operator_excludes_wildcard_and_brackets() {
        assert!(!is_operator('*'));
        assert!(!is_operator('['));
        assert!(!is_operator(']'));
        assert!(is_operator('?'));
        assert!(is_operator(':'));
    }

    #[test]
    fn test_letter_accepts_unicode() {
        assert!(is_letter('é'));
        assert!(is_letter('名'));
        assert!(!is_letter('9'));
        assert!(!is_letter('$'));
    }
}
