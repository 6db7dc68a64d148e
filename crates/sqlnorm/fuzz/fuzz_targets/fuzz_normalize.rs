#![no_main]

use libfuzzer_sys::fuzz_target;
use sqlnorm::{Dialect, Lexer, Normalizer, NormalizerConfig, Obfuscator, ObfuscatorConfig, TokenKind};

fuzz_target!(|data: &[u8]| {
    if let Ok(sql) = std::str::from_utf8(data) {
        let dialects = [
            Dialect::Generic,
            Dialect::PostgreSql,
            Dialect::MySql,
            Dialect::SqlServer,
            Dialect::Oracle,
            Dialect::Snowflake,
        ];

        for dialect in dialects {
            // token spans must cover the input contiguously
            let mut lexer = Lexer::with_dialect(sql, dialect);
            let mut end = 0;
            loop {
                let token = lexer.scan_next();
                if token.kind == TokenKind::Eof {
                    break;
                }
                assert_eq!(token.span.start, end);
                assert_eq!(&sql[token.span.start..token.span.end], token.text);
                end = token.span.end;
            }
            assert_eq!(end, sql.len());

            let normalizer = Normalizer::new(
                NormalizerConfig::new()
                    .with_collect_tables(true)
                    .with_collect_commands(true)
                    .with_collect_comments(true)
                    .with_collect_procedures(true),
            );
            let (normalized, _) = normalizer.normalize_with(sql, dialect);
            assert_eq!(normalized.trim(), normalized);

            let obfuscator = Obfuscator::new(
                ObfuscatorConfig::new()
                    .with_replace_digits(true)
                    .with_dollar_quoted_func(true),
            );
            let _ = obfuscator.obfuscate_with(sql, dialect);
        }
    }
});
