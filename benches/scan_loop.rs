use criterion::{Criterion, black_box, criterion_group, criterion_main};
use qreator::models::{Frame, PixelBuffer};
use qreator::scan::{ScanLoop, TickOutcome};
use qreator::utils::grayscale::rgba_to_grayscale_into;
use qreator::RqrrDecoder;

fn never(_: Frame<'_>) -> Option<String> {
    None
}

fn bench_tick_640x480(c: &mut Criterion) {
    let mut source = PixelBuffer::filled(640, 480, 128);
    let mut scan = ScanLoop::new();
    let mut decoder = never;
    scan.start();
    c.bench_function("scan_tick_640x480", |b| {
        b.iter(|| {
            let outcome = scan.on_display_frame(&mut source, &mut decoder);
            debug_assert_eq!(outcome, TickOutcome::NoCode);
            black_box(outcome)
        })
    });
}

fn bench_tick_1080p(c: &mut Criterion) {
    let mut source = PixelBuffer::filled(1920, 1080, 128);
    let mut scan = ScanLoop::new();
    let mut decoder = never;
    scan.start();
    c.bench_function("scan_tick_1920x1080", |b| {
        b.iter(|| black_box(scan.on_display_frame(&mut source, &mut decoder)))
    });
}

fn bench_grayscale(c: &mut Criterion) {
    let image = PixelBuffer::filled(640, 480, 90);
    let mut gray = Vec::with_capacity(640 * 480);
    c.bench_function("grayscale_640x480_rgba", |b| {
        b.iter(|| rgba_to_grayscale_into(black_box(image.as_bytes()), 640, 480, &mut gray))
    });
}

fn bench_rqrr_blank(c: &mut Criterion) {
    let image = PixelBuffer::filled(640, 480, 255);
    let mut decoder = RqrrDecoder::new();
    c.bench_function("rqrr_decode_640x480_blank", |b| {
        b.iter(|| black_box(qreator::scan::decode_once(black_box(&image), &mut decoder)))
    });
}

criterion_group!(
    benches,
    bench_tick_640x480,
    bench_tick_1080p,
    bench_grayscale,
    bench_rqrr_blank
);
criterion_main!(benches);
