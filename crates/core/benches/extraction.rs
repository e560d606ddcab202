use criterion::{Criterion, black_box, criterion_group, criterion_main};

use corkscrew_core::{Document, RecordBuilder, UrlPatterns, find_product_links};

const PRODUCT_URL: &str =
    "https://www.vinocellars.example/wine/red-wine/sangiovese/renieri-invetro-super-tuscan/p/113710750";

fn bench_parse(c: &mut Criterion) {
    let html = std::fs::read_to_string("../../tests/fixtures/product.html").unwrap();

    c.bench_function("parse", |b| b.iter(|| Document::parse(black_box(&html))));
}

fn bench_build_record(c: &mut Criterion) {
    let html = std::fs::read_to_string("../../tests/fixtures/product.html").unwrap();
    let doc = Document::parse_with_url(&html, PRODUCT_URL).unwrap();
    let builder = RecordBuilder::new();

    c.bench_function("build_record_autodetect", |b| {
        b.iter(|| builder.build(black_box(&doc), black_box(PRODUCT_URL)))
    });
}

fn bench_link_discovery(c: &mut Criterion) {
    let html = std::fs::read_to_string("../../tests/fixtures/collection.html").unwrap();
    let doc = Document::parse(&html);
    let base = url::Url::parse("https://www.vinocellars.example/wine/deals").unwrap();
    let patterns = UrlPatterns::default();

    c.bench_function("link_discovery", |b| {
        b.iter(|| find_product_links(black_box(&doc), black_box(&base), black_box(&patterns)))
    });
}

criterion_group!(benches, bench_parse, bench_build_record, bench_link_discovery);
criterion_main!(benches);
