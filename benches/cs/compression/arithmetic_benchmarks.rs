use arithcode::cs::compression::arithmetic::{compress, decode, decompress, encode, FrequencyModel};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn generate_skewed(len: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(7);
    (0..len)
        .map(|_| {
            if rng.gen_bool(0.6) {
                b' ' + rng.gen_range(0..8)
            } else {
                rng.gen()
            }
        })
        .collect()
}

fn bench_compress(c: &mut Criterion) {
    let mut group = c.benchmark_group("arithmetic_compress");
    for size in [1_000usize, 10_000, 60_000] {
        let data = generate_skewed(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| compress(black_box(data)).unwrap())
        });
    }
    group.finish();
}

fn bench_decompress(c: &mut Criterion) {
    let mut group = c.benchmark_group("arithmetic_decompress");
    for size in [1_000usize, 10_000, 60_000] {
        let data = generate_skewed(size);
        let packed = compress(&data).unwrap();
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &packed, |b, packed| {
            b.iter(|| decompress(packed.header(), black_box(packed.payload())).unwrap())
        });
    }
    group.finish();
}

fn bench_coder_only(c: &mut Criterion) {
    let data = generate_skewed(10_000);
    let model = FrequencyModel::from_bytes(&data).unwrap();
    let payload = encode(&data, &model).unwrap();

    c.bench_function("arithmetic_encode_10k", |b| {
        b.iter(|| encode(black_box(&data), &model).unwrap())
    });
    c.bench_function("arithmetic_decode_10k", |b| {
        b.iter(|| decode(black_box(&payload), &model, data.len()).unwrap())
    });
}

criterion_group!(benches, bench_compress, bench_decompress, bench_coder_only);
criterion_main!(benches);
