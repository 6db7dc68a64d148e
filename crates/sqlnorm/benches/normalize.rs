use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sqlnorm::{Normalizer, NormalizerConfig, Obfuscator, ObfuscatorConfig};

const SIMPLE_SELECT: &str = "SELECT id, name, address FROM users WHERE id = ?";

const MEDIUM_SELECT: &str = r#"
SELECT
    u.id,
    u.name,
    u.email,
    COUNT(o.id) as order_count,
    SUM(o.total) as total_spent
FROM users u
LEFT JOIN orders o ON u.id = o.user_id
WHERE u.created_at > '2024-01-01'
    AND u.status = 'active'
GROUP BY u.id, u.name, u.email
HAVING COUNT(o.id) > 5
ORDER BY total_spent DESC
LIMIT 100
"#;

const WIDE_IN_LIST: &str = "SELECT * FROM events WHERE org_id = ? AND id IN (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";

fn bench_normalize(c: &mut Criterion) {
    let normalizer = Normalizer::new(
        NormalizerConfig::new()
            .with_collect_tables(true)
            .with_collect_commands(true)
            .with_collect_comments(true),
    );

    let mut group = c.benchmark_group("normalize");
    for (name, sql) in [
        ("simple", SIMPLE_SELECT),
        ("medium", MEDIUM_SELECT),
        ("wide_in_list", WIDE_IN_LIST),
    ] {
        group.bench_function(BenchmarkId::from_parameter(name), |b| {
            b.iter(|| normalizer.normalize(black_box(sql)));
        });
    }
    group.finish();
}

fn bench_obfuscate(c: &mut Criterion) {
    let obfuscator = Obfuscator::new(ObfuscatorConfig::new().with_replace_digits(true));

    let mut group = c.benchmark_group("obfuscate");
    for (name, sql) in [("simple", SIMPLE_SELECT), ("medium", MEDIUM_SELECT)] {
        group.bench_function(BenchmarkId::from_parameter(name), |b| {
            b.iter(|| obfuscator.obfuscate(black_box(sql)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_normalize, bench_obfuscate);
criterion_main!(benches);
