//! Case-insensitive keyword trie
//!
//! Maps SQL keywords to a token kind and a table-indicator flag. The
//! lexer walks the trie one character at a time while scanning an
//! identifier, folding to ASCII uppercase, and accepts the keyword only
//! when the following code point is whitespace, punctuation, or end of
//! input.

use crate::tokens::TokenKind;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Classification carried by an accepting trie node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordInfo {
    /// Token kind emitted for the keyword
    pub kind: TokenKind,
    /// Whether the keyword syntactically introduces a table reference
    /// (FROM, JOIN, INTO, UPDATE, TABLE, ...)
    pub is_table_indicator: bool,
}

/// A node in the keyword trie. Children are keyed by uppercase ASCII.
#[derive(Debug, Default)]
pub struct TrieNode {
    children: HashMap<char, TrieNode>,
    info: Option<KeywordInfo>,
}

impl TrieNode {
    /// Follow one character, folding to ASCII uppercase.
    pub fn step(&self, ch: char) -> Option<&TrieNode> {
        self.children.get(&ch.to_ascii_uppercase())
    }

    /// The keyword classification if this node completes a keyword.
    pub fn info(&self) -> Option<&KeywordInfo> {
        self.info.as_ref()
    }
}

/// Case-insensitive trie over a fixed keyword table.
#[derive(Debug, Default)]
pub struct KeywordTrie {
    root: TrieNode,
}

impl KeywordTrie {
    fn insert(&mut self, word: &str, kind: TokenKind, is_table_indicator: bool) {
        let mut node = &mut self.root;
        for ch in word.chars() {
            node = node.children.entry(ch.to_ascii_uppercase()).or_default();
        }
        node.info = Some(KeywordInfo {
            kind,
            is_table_indicator,
        });
    }

    /// Entry point for streaming walks.
    pub fn root(&self) -> &TrieNode {
        &self.root
    }

    /// Whole-word lookup, case-insensitive.
    pub fn lookup(&self, word: &str) -> Option<&KeywordInfo> {
        let mut node = &self.root;
        for ch in word.chars() {
            node = node.step(ch)?;
        }
        node.info()
    }
}

/// The process-wide keyword table, built once.
pub(crate) static KEYWORDS: Lazy<KeywordTrie> = Lazy::new(build_keyword_trie);

fn build_keyword_trie() -> KeywordTrie {
    use TokenKind::*;

    // (word, kind, is_table_indicator)
    const TABLE: &[(&str, TokenKind, bool)] = &[
        ("SELECT", Command, false),
        ("INSERT", Command, false),
        ("UPDATE", Command, true),
        ("DELETE", Command, false),
        ("CREATE", Command, false),
        ("ALTER", Command, false),
        ("DROP", Command, false),
        ("GRANT", Command, false),
        ("REVOKE", Command, false),
        ("BEGIN", Command, false),
        ("COMMIT", Command, false),
        ("ROLLBACK", Command, false),
        ("JOIN", Command, true),
        ("TRUNCATE", Command, false),
        ("MERGE", Command, false),
        ("EXEC", Command, false),
        ("EXECUTE", Command, false),
        ("EXPLAIN", Command, false),
        ("FROM", Keyword, true),
        ("INTO", Keyword, true),
        ("TABLE", Keyword, true),
        ("EXISTS", Keyword, true),
        ("WHERE", Keyword, false),
        ("AND", Keyword, false),
        ("OR", Keyword, false),
        ("NOT", Keyword, false),
        ("IN", Keyword, false),
        ("IS", Keyword, false),
        ("LIKE", Keyword, false),
        ("BETWEEN", Keyword, false),
        ("LIMIT", Keyword, false),
        ("OFFSET", Keyword, false),
        ("ORDER", Keyword, false),
        ("BY", Keyword, false),
        ("GROUP", Keyword, false),
        ("HAVING", Keyword, false),
        ("UNION", Keyword, false),
        ("EXCEPT", Keyword, false),
        ("INTERSECT", Keyword, false),
        ("ALL", Keyword, false),
        ("DISTINCT", Keyword, false),
        ("ON", Keyword, false),
        ("USING", Keyword, false),
        ("SET", Keyword, false),
        ("VALUES", Keyword, false),
        ("WITH", Keyword, false),
        ("RECURSIVE", Keyword, false),
        ("CASE", Keyword, false),
        ("WHEN", Keyword, false),
        ("THEN", Keyword, false),
        ("ELSE", Keyword, false),
        ("END", Keyword, false),
        ("ANY", Keyword, false),
        ("SOME", Keyword, false),
        ("RETURNING", Keyword, false),
        ("INNER", Keyword, false),
        ("OUTER", Keyword, false),
        ("LEFT", Keyword, false),
        ("RIGHT", Keyword, false),
        ("FULL", Keyword, false),
        ("CROSS", Keyword, false),
        ("NATURAL", Keyword, false),
        ("ASC", Keyword, false),
        ("DESC", Keyword, false),
        ("PRIMARY", Keyword, false),
        ("KEY", Keyword, false),
        ("FOREIGN", Keyword, false),
        ("REFERENCES", Keyword, false),
        ("CONSTRAINT", Keyword, false),
        ("UNIQUE", Keyword, false),
        ("INDEX", Keyword, false),
        ("VIEW", Keyword, false),
        ("SCHEMA", Keyword, false),
        ("DATABASE", Keyword, false),
        ("COLUMN", Keyword, false),
        ("ADD", Keyword, false),
        ("TO", Keyword, false),
        ("DEFAULT", Keyword, false),
        ("CASCADE", Keyword, false),
        ("IF", Keyword, false),
        ("REPLACE", Keyword, false),
        ("TRUE", Boolean, false),
        ("FALSE", Boolean, false),
        ("NULL", Null, false),
        ("AS", AliasIndicator, false),
        ("PROCEDURE", ProcIndicator, false),
        ("PROC", ProcIndicator, false),
        ("FUNCTION", ProcIndicator, false),
    ];

    let mut trie = KeywordTrie::default();
    for &(word, kind, is_table_indicator) in TABLE {
        trie.insert(word, kind, is_table_indicator);
    }
    trie
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let info = KEYWORDS.lookup("select").unwrap();
        assert_eq!(info.kind, TokenKind::Command);
        assert!(!info.is_table_indicator);

        let info = KEYWORDS.lookup("From").unwrap();
        assert_eq!(info.kind, TokenKind::Keyword);
        assert!(info.is_table_indicator);
    }

    #[test]
    fn test_prefixes_are_not_keywords() {
        assert!(KEYWORDS.lookup("SEL").is_none());
        assert!(KEYWORDS.lookup("FRO").is_none());
        assert!(KEYWORDS.lookup("SELECTED").is_none());
    }

    #[test]
    fn test_indicator_kinds() {
        assert_eq!(KEYWORDS.lookup("AS").unwrap().kind, TokenKind::AliasIndicator);
        assert_eq!(
            KEYWORDS.lookup("procedure").unwrap().kind,
            TokenKind::ProcIndicator
        );
        assert_eq!(KEYWORDS.lookup("null").unwrap().kind, TokenKind::Null);
        assert_eq!(KEYWORDS.lookup("true").unwrap().kind, TokenKind::Boolean);
    }

    #[test]
    fn test_streaming_walk() {
        let mut node = KEYWORDS.root();
        for ch in "joi".chars() {
            node = node.step(ch).unwrap();
            assert!(node.info().is_none());
        }
        let node = node.step('n').unwrap();
        let info = node.info().unwrap();
        assert_eq!(info.kind, TokenKind::Command);
        assert!(info.is_table_indicator);
    }

    #[test]
    fn test_update_and_join_indicate_tables() {
        assert!(KEYWORDS.lookup("update").unwrap().is_table_indicator);
        assert!(KEYWORDS.lookup("join").unwrap().is_table_indicator);
        assert!(KEYWORDS.lookup("into").unwrap().is_table_indicator);
        assert!(!KEYWORDS.lookup("insert").unwrap().is_table_indicator);
        assert!(!KEYWORDS.lookup("schema").unwrap().is_table_indicator);
    }
}
