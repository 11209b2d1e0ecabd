use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use sql_props_loader::collector::mapping_from_result_set;
use sql_props_loader::{ResultSet, RowValues};

// Deterministic rows with roughly one duplicate name in ten and a few NULL values.
fn generate_result_set(num_rows: usize) -> ResultSet {
    let mut rs = ResultSet::with_capacity(num_rows);
    rs.set_column_names(Arc::new(vec!["name".to_string(), "value".to_string()]));
    for i in 0..num_rows {
        let name = if i % 10 == 9 {
            format!("prop.{}", i - 1)
        } else {
            format!("prop.{i}")
        };
        let value = if i % 17 == 0 {
            RowValues::Null
        } else {
            RowValues::Text(format!("value-{i}"))
        };
        rs.add_row_values(vec![RowValues::Text(name), value]);
    }
    rs
}

fn benchmark_collect(c: &mut Criterion) {
    let mut group = c.benchmark_group("mapping_from_result_set");
    for size in [100usize, 1_000, 10_000] {
        let rs = generate_result_set(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &rs, |b, rs| {
            b.iter(|| mapping_from_result_set(black_box(rs)));
        });
    }
    group.finish();
}

#[cfg(feature = "sqlite")]
fn benchmark_sqlite_load(c: &mut Criterion) {
    use indexmap::IndexMap;
    use sql_props_loader::{LoadConfig, PropertyLoader, Statement};

    let config = LoadConfig {
        driver_classname: Some("sqlite".into()),
        connection_string: Some(":memory:".into()),
        sql_username: Some("bench".into()),
        sql_password: Some("bench".into()),
        select_statement: Some("SELECT name, value FROM props".into()),
        pre_sql_statements: vec![
            Some(Statement::dml("CREATE TABLE props (name text, value text)")),
            Some(Statement::dml(
                "WITH RECURSIVE n(i) AS (SELECT 1 UNION ALL SELECT i + 1 FROM n WHERE i < 1000) \
                 INSERT INTO props SELECT 'prop.' || i, 'value-' || i FROM n",
            )),
        ],
        ..LoadConfig::default()
    };
    let loader = PropertyLoader::new();

    c.bench_function("sqlite_load_1000", |b| {
        b.iter(|| {
            let mut props: IndexMap<String, Option<String>> = IndexMap::new();
            loader.load(black_box(&config), &mut props)
        });
    });
}

#[cfg(not(feature = "sqlite"))]
fn benchmark_sqlite_load(_c: &mut Criterion) {}

criterion_group!(benches, benchmark_collect, benchmark_sqlite_load);
criterion_main!(benches);
