use criterion::{Criterion, black_box, criterion_group, criterion_main};
use qreator::{PayloadSpec, classify, encode};

fn bench_encode_upi(c: &mut Criterion) {
    let spec = PayloadSpec::UpiPayment {
        payee_id: "merchant.store@okbank".into(),
        amount: Some("1499.00".into()),
    };
    c.bench_function("encode_upi", |b| b.iter(|| encode(black_box(&spec))));
}

fn bench_encode_tour(c: &mut Criterion) {
    let details = "Welcome to the old town. ".repeat(40);
    let spec = PayloadSpec::TourGuide {
        origin_base: "https://qreator.app".into(),
        details,
    };
    c.bench_function("encode_tour_1k", |b| b.iter(|| encode(black_box(&spec))));
}

fn bench_classify(c: &mut Criterion) {
    let inputs = [
        "https://example.com/menu?table=12",
        "upi://pay?pa=me%40bank&pn=Payee&am=50&cu=INR",
        "Meet at gate 4 after the show",
    ];
    c.bench_function("classify_mixed", |b| {
        b.iter(|| {
            for input in &inputs {
                black_box(classify(black_box(input)));
            }
        })
    });
}

criterion_group!(benches, bench_encode_upi, bench_encode_tour, bench_classify);
criterion_main!(benches);
