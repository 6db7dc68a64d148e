//! Obfuscator behavior: literal replacement, digit scrubbing, dollar
//! quoted bodies, and the obfuscate-then-normalize pipeline.

use sqlnorm::{Dialect, Normalizer, NormalizerConfig, Obfuscator, ObfuscatorConfig};

fn obfuscator() -> Obfuscator {
    Obfuscator::new(ObfuscatorConfig::new())
}

#[test]
fn test_literals_become_placeholders() {
    let cases = [
        (
            "SELECT * FROM users WHERE id = 42",
            "SELECT * FROM users WHERE id = ?",
        ),
        (
            "SELECT * FROM users WHERE name = 'john'",
            "SELECT * FROM users WHERE name = ?",
        ),
        (
            "SELECT * FROM users WHERE id = 1.5e3 OR id = -7",
            "SELECT * FROM users WHERE id = ? OR id = ?",
        ),
        (
            "SELECT * FROM users WHERE id = 0x1F AND x = 0123",
            "SELECT * FROM users WHERE id = ? AND x = ?",
        ),
        (
            "SELECT * FROM users WHERE tag = $tag$secret$tag$",
            "SELECT * FROM users WHERE tag = ?",
        ),
        // unterminated string still obfuscates
        (
            "SELECT * FROM users WHERE name = 'j",
            "SELECT * FROM users WHERE name = ?",
        ),
    ];
    let obfuscator = obfuscator();
    for (input, want) in cases {
        assert_eq!(obfuscator.obfuscate(input), want, "for {input:?}");
    }
}

#[test]
fn test_original_spacing_is_preserved() {
    let obfuscator = obfuscator();
    assert_eq!(
        obfuscator.obfuscate("SELECT  *  FROM users\nWHERE id = 1"),
        "SELECT  *  FROM users\nWHERE id = ?"
    );
}

#[test]
fn test_comments_pass_through() {
    let obfuscator = obfuscator();
    assert_eq!(
        obfuscator.obfuscate("/* keep me */ SELECT 1 -- and me"),
        "/* keep me */ SELECT ? -- and me"
    );
}

#[test]
fn test_surrounding_whitespace_is_trimmed() {
    let obfuscator = obfuscator();
    assert_eq!(obfuscator.obfuscate("  SELECT 1  "), "SELECT ?");
}

#[test]
fn test_parameters_pass_through() {
    let obfuscator = obfuscator();
    assert_eq!(
        obfuscator.obfuscate("SELECT * FROM users WHERE id = $1"),
        "SELECT * FROM users WHERE id = $1"
    );
    assert_eq!(
        obfuscator.obfuscate_with("SELECT * FROM users WHERE id = :id", Dialect::Oracle),
        "SELECT * FROM users WHERE id = :id"
    );
}

#[test]
fn test_replace_digits_in_identifiers() {
    let obfuscator = Obfuscator::new(ObfuscatorConfig::new().with_replace_digits(true));
    assert_eq!(
        obfuscator.obfuscate("SELECT * FROM users_2024_05 WHERE id = 1"),
        "SELECT * FROM users_?_? WHERE id = ?"
    );
    // quoted identifiers keep their digits
    assert_eq!(
        obfuscator.obfuscate(r#"SELECT * FROM "events123" WHERE id = 1"#),
        r#"SELECT * FROM "events123" WHERE id = ?"#
    );
}

#[test]
fn test_digits_kept_without_replace_digits() {
    let obfuscator = obfuscator();
    assert_eq!(
        obfuscator.obfuscate("SELECT * FROM users_2024 WHERE id = 1"),
        "SELECT * FROM users_2024 WHERE id = ?"
    );
}

#[test]
fn test_dollar_quoted_function_replaced_by_default() {
    let obfuscator = obfuscator();
    assert_eq!(
        obfuscator.obfuscate("SELECT $func$INSERT INTO t VALUES ('a', 1)$func$"),
        "SELECT ?"
    );
}

#[test]
fn test_dollar_quoted_function_body_obfuscated_when_enabled() {
    let obfuscator = Obfuscator::new(ObfuscatorConfig::new().with_dollar_quoted_func(true));
    assert_eq!(
        obfuscator.obfuscate("SELECT $func$INSERT INTO t VALUES ('a', 1)$func$"),
        "SELECT $func$INSERT INTO t VALUES (?, ?)$func$"
    );
}

#[test]
fn test_error_tokens_pass_through() {
    let obfuscator = obfuscator();
    assert_eq!(obfuscator.obfuscate("SELECT 1 /* oops"), "SELECT ? /* oops");
}

#[test]
fn test_obfuscate_then_normalize_pipeline() {
    let obfuscator = obfuscator();
    let normalizer = Normalizer::new(
        NormalizerConfig::new()
            .with_collect_tables(true)
            .with_collect_commands(true),
    );
    let obfuscated = obfuscator.obfuscate(
        "SELECT * FROM users WHERE id IN (1, 2, 3) AND name = 'j'",
    );
    assert_eq!(
        obfuscated,
        "SELECT * FROM users WHERE id IN (?, ?, ?) AND name = ?"
    );
    let (sql, metadata) = normalizer.normalize(&obfuscated);
    assert_eq!(sql, "SELECT * FROM users WHERE id IN ( ? ) AND name = ?");
    assert_eq!(metadata.tables, ["users"]);
    assert_eq!(metadata.commands, ["SELECT"]);
}
