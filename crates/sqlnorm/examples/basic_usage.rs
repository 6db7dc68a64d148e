//! Basic usage of the normalizer and obfuscator.
//!
//! Run with: cargo run --example basic_usage

use sqlnorm::{Dialect, Normalizer, NormalizerConfig, Obfuscator, ObfuscatorConfig};

fn main() {
    let normalizer = Normalizer::new(
        NormalizerConfig::new()
            .with_collect_tables(true)
            .with_collect_commands(true)
            .with_collect_comments(true),
    );

    let input = "/* checkout service */ SELECT u.id, u.name as Name \
                 FROM users as u WHERE u.id IN (?, ?, ?)";
    let (normalized, metadata) = normalizer.normalize(input);
    println!("normalized: {normalized}");
    println!("tables:     {:?}", metadata.tables);
    println!("commands:   {:?}", metadata.commands);
    println!("comments:   {:?}", metadata.comments);

    let obfuscator = Obfuscator::new(ObfuscatorConfig::new().with_replace_digits(true));
    let raw = "SELECT * FROM orders_2024 WHERE total > 100.50 AND customer = 'acme'";
    println!("obfuscated: {}", obfuscator.obfuscate(raw));

    // dialect-specific lexing
    let (normalized, _) =
        normalizer.normalize_with("SELECT * FROM [dbo].[users] WHERE id = ?", Dialect::SqlServer);
    println!("sqlserver:  {normalized}");
}
