use criterion::{criterion_group, criterion_main, Criterion};

use certgen::export::ExportState;
use certgen::{CertificateRecord, Preview};
use chrono::NaiveDate;

fn sample() -> CertificateRecord {
    CertificateRecord::sample(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
}

fn bench_render(c: &mut Criterion) {
    let preview = Preview::default();
    let record = sample();

    c.bench_function("render_preview", |b| {
        b.iter(|| preview.render(&record, &ExportState::Idle))
    });

    c.bench_function("render_empty_preview", |b| {
        let empty = CertificateRecord::default();
        b.iter(|| preview.render(&empty, &ExportState::Idle))
    });
}

#[cfg(feature = "raster")]
fn bench_rasterize(c: &mut Criterion) {
    use std::sync::Arc;

    use certgen::preview::raster::{load_system_fonts, rasterize_svg};

    let fonts = Arc::new(load_system_fonts());
    let target = Preview::default().target(&sample());

    c.bench_function("rasterize_2x", |b| {
        b.iter(|| rasterize_svg(&target.svg, fonts.clone(), 2.0).unwrap())
    });
}

#[cfg(not(feature = "raster"))]
fn bench_rasterize(_c: &mut Criterion) {}

criterion_group!(benches, bench_render, bench_rasterize);
criterion_main!(benches);
