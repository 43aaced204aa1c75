use criterion::{black_box, criterion_group, criterion_main, Criterion};
use season_colors::{ColorExtractor, PixelRegion, Rgb, SeasonMatcher};

/// 300x300 region of smoothly varying colors, the size of a working thumbnail
fn thumbnail_region() -> PixelRegion {
    let pixels = (0..300u32 * 300)
        .map(|i| {
            let (x, y) = (i % 300, i / 300);
            Rgb::new((x * 255 / 299) as u8, (y * 255 / 299) as u8, ((x + y) % 256) as u8)
        })
        .collect();
    PixelRegion::new(300, 300, pixels).unwrap()
}

fn benchmark_season_matching(c: &mut Criterion) {
    let region = thumbnail_region();
    let extractor = ColorExtractor::default();
    let matcher = SeasonMatcher::builtin();

    c.bench_function("extract_dominant_colors", |b| {
        b.iter(|| extractor.extract(black_box(&region)).unwrap())
    });

    let colors = extractor.extract(&region).unwrap();
    c.bench_function("rank_seasons", |b| {
        b.iter(|| matcher.rank(black_box(&colors)).unwrap())
    });
}

criterion_group!(benches, benchmark_season_matching);
criterion_main!(benches);
