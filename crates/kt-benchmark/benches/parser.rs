use std::hint::black_box;

use codspeed_criterion_compat::{
    BenchmarkId, Criterion, Throughput, criterion_group, criterion_main,
};
use kt_db::File;
use kt_stubs::{StubRegistry, serialize_tree};

fn sources(db: &salsa::DatabaseImpl) -> Vec<File> {
    vec![
        File::new(
            db,
            "Simple".into(),
            r#"
            fun foo() {
                42
            }
            "#
            .to_string(),
        ),
        File::new(
            db,
            "Medium".into(),
            r#"
            package demo.medium

            import a.b.*
            import c.D as E

            class Box<T>(private val item: T?) : Base(), Other {
                fun get(): T? = item
                val size: Int = if (item == null) 0 else 1
                class object {
                    fun <T> of(item: T): Box<T> = Box(item)
                }
            }

            fun describe(x: Any?): String = when (x) {
                null -> "nothing"
                is Box<*> -> "box of ${x.size}"
                in 1..10 -> "small"
                else -> "$x"
            }
            "#
            .to_string(),
        ),
    ]
}

fn benchmark_parser(c: &mut Criterion) {
    let mut group = c.benchmark_group("Parser Benchmark");

    let db = salsa::DatabaseImpl::new();
    for file in sources(&db) {
        let text = file.text(&db).to_owned();
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse_code", file.path(&db)), &text, |b, text| {
            b.iter(|| black_box(kt_parse::parse_file(text)));
        });
    }

    group.finish();
}

fn benchmark_stubs(c: &mut Criterion) {
    let mut group = c.benchmark_group("Stub Benchmark");

    let db = salsa::DatabaseImpl::new();
    for file in sources(&db) {
        let tree = file.stub_tree(&db);
        group.bench_with_input(BenchmarkId::new("serialize", file.path(&db)), tree, |b, tree| {
            b.iter(|| black_box(serialize_tree(StubRegistry::standard(), tree)));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_parser, benchmark_stubs);
criterion_main!(benches);
