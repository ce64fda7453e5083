use codspeed_criterion_compat::{
    Criterion, Throughput, black_box, criterion_group, criterion_main,
};

static SOURCE: &str = "
foobar(val fun when else val is !is) { + ++ = == === -> ?. ?: !! .. :: }
foobar(val fun when else val is !is) { + ++ = == === -> ?. ?: !! .. :: }
foobar(val fun when else val is !is) { + ++ = == === -> ?. ?: !! .. :: }
foobar(val fun when else val is !is) { + ++ = == === -> ?. ?: !! .. :: }
foobar(val fun when else val is !is) { + ++ = == === -> ?. ?: !! .. :: }
foobar(val fun when else val is !is) { + ++ = == === -> ?. ?: !! .. :: }
foobar(val fun when else val is !is) { + ++ = == === -> ?. ?: !! .. :: }
foobar(val fun when else val is !is) { + ++ = == === -> ?. ?: !! .. :: }
";

static TEMPLATES: &str = r#"
val a = "plain ${x + 1} and $name with \n escapes"
val b = """raw $multi
line ${ "nested ${deep}" }"""
val a = "plain ${x + 1} and $name with \n escapes"
val b = """raw $multi
line ${ "nested ${deep}" }"""
"#;

static CANDIDATES: [(&str, &str); 2] =
    [("keywords_operators_and_punctators", SOURCE), ("string_templates", TEMPLATES)];

fn iterate(s: &str) {
    use kt_tokenizer::{SyntaxKind, Tokenizer};

    let mut tokenizer = Tokenizer::new(s);

    loop {
        let token = tokenizer.next_token();

        if token.kind == SyntaxKind::EOF {
            break;
        }

        black_box(token);
    }
}

fn bench_iterate(c: &mut Criterion) {
    let mut group = c.benchmark_group("iterate");

    for (name, source) in CANDIDATES {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(name, &source, |b, &s| b.iter(|| iterate(s)));
    }
}

criterion_group!(benches, bench_iterate);
criterion_main!(benches);
