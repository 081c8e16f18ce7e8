//! Criterion benchmark for spec parsing and per-font resolution (made by FontLab https://www.fontlab.com/)

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lintcfg_core::document::SpecDocument;
use lintcfg_core::font::FontInfo;

const SPEC: &str = "
vendor Monotype
disable paths/extrema
filename NotoSans-Regular.ttf
version >= 1.02
enable paths/extrema

condition
filename like NotoSansCJK-.*
disable name
enable name/version

condition
script in Arab,Hebr,Syrc
enable bidi
disable bidi/non_ompl
";

fn bench_resolve(c: &mut Criterion) {
    c.bench_function("parse spec", |b| {
        b.iter(|| SpecDocument::parse(black_box(SPEC)).unwrap())
    });

    let doc = SpecDocument::parse(SPEC).unwrap();
    let font = FontInfo::new(
        "NotoSansCJK-Regular.ttc",
        "Noto",
        "Sans",
        "CJK",
        "",
        "Regular",
        true,
        "Adobe",
        "1.000",
    );

    c.bench_function("resolve one font", |b| {
        b.iter(|| doc.resolve(black_box(&font)))
    });
}

criterion_group!(benches, bench_resolve);
criterion_main!(benches);
