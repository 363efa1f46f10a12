use criterion::{black_box, criterion_group, criterion_main, Criterion};
use digit_features::{DigitImage, FeatureExtractor};
use ndarray::Array2;

fn sample_digit() -> DigitImage {
    let pixels = Array2::from_shape_fn((28, 28), |(r, c)| {
        let dr = r as f64 - 14.0;
        let dc = c as f64 - 14.0;
        let ring = (dr * dr + dc * dc).sqrt();
        if (7.0..10.0).contains(&ring) {
            255.0
        } else {
            0.0
        }
    });
    DigitImage::from_array(pixels).unwrap()
}

fn bench_extraction(c: &mut Criterion) {
    let extractor = FeatureExtractor::default();
    let image = sample_digit();

    c.bench_function("extract_28x28", |b| {
        b.iter(|| extractor.extract(black_box(&image)).unwrap())
    });

    let binary = extractor.preprocess(&image).unwrap();
    c.bench_function("feature_stages_only", |b| {
        b.iter(|| extractor.parts(black_box(binary.view())))
    });
}

criterion_group!(benches, bench_extraction);
criterion_main!(benches);
