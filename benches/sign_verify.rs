use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hbs::lmots::LmsOtsAlgorithm;
use hbs::lms::{self, LmsAlgorithm};
use hbs::xmss::{self, XmssAlgorithm};
use hbs::{hss, xmssmt};

// Signing keys are stateful and exhaust, so the per-signature path is
// benchmarked through keygen (which runs the same tree sweep) and verify.

pub fn lms_benchmark(c: &mut Criterion) {
    let mut rng = rand::thread_rng();
    let lms_alg = LmsAlgorithm::LmsSha256M32H5;
    let ots_alg = LmsOtsAlgorithm::LmsOtsSha256N32W4;

    c.bench_function("keygen: LMS_SHA256_M32_H5 / W4", |b| {
        b.iter(|| {
            let sk = lms::SigningKey::new(lms_alg, ots_alg, &mut rng).unwrap();
            black_box(sk)
        })
    });

    let mut sk = lms::SigningKey::new(lms_alg, ots_alg, &mut rng).unwrap();
    let vk = sk.public();
    let msg = b"Hello, world!";
    let sig = sk.sign(&mut rng, msg).unwrap();
    c.bench_function("verify: LMS_SHA256_M32_H5 / W4", |b| {
        b.iter(|| {
            let ok = vk.verify(msg, &sig);
            black_box(ok)
        })
    });
}

pub fn hss_benchmark(c: &mut Criterion) {
    let mut rng = rand::thread_rng();
    let mut sk = hss::SigningKey::new(
        LmsAlgorithm::LmsSha256M32H5,
        LmsOtsAlgorithm::LmsOtsSha256N32W4,
        2,
        &mut rng,
    )
    .unwrap();
    let vk = sk.public();
    let msg = b"Hello, world!";
    let sig = sk.sign(&mut rng, msg).unwrap();
    c.bench_function("verify: HSS L=2 H5 / W4", |b| {
        b.iter(|| {
            let ok = vk.verify(msg, &sig);
            black_box(ok)
        })
    });
}

pub fn xmss_benchmark(c: &mut Criterion) {
    let mut rng = rand::thread_rng();
    let alg = XmssAlgorithm::XmssSha2H5W256;

    c.bench_function("keygen: XMSS-SHA2_H5_W256", |b| {
        b.iter(|| {
            let sk = xmss::SigningKey::new(alg, &mut rng).unwrap();
            black_box(sk)
        })
    });

    let mut sk = xmss::SigningKey::new(alg, &mut rng).unwrap();
    let vk = sk.public();
    let msg = b"Hello, world!";
    let sig = sk.sign(msg).unwrap();
    c.bench_function("verify: XMSS-SHA2_H5_W256", |b| {
        b.iter(|| {
            let ok = vk.verify(msg, &sig);
            black_box(ok)
        })
    });
}

pub fn xmssmt_benchmark(c: &mut Criterion) {
    let mut rng = rand::thread_rng();
    let alg = xmss::XmssMtAlgorithm::XmssMtShakeH20D4W256;
    let mut sk = xmssmt::SigningKey::new(alg, &mut rng).unwrap();
    let vk = sk.public();
    let msg = b"Hello, world!";
    let sig = sk.sign(msg).unwrap();
    c.bench_function("verify: XMSSMT-SHAKE_H20_D4_W256", |b| {
        b.iter(|| {
            let ok = vk.verify(msg, &sig);
            black_box(ok)
        })
    });
}

criterion_group!(name = benches;
    config = Criterion::default().sample_size(10);
    targets = lms_benchmark, hss_benchmark, xmss_benchmark, xmssmt_benchmark
);

criterion_main!(benches);
