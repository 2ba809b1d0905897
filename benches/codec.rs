use std::time::Duration;

use array_literal::codec::{ByteaCodec, IntCodec, TextCodec};
use array_literal::{ArrayValue, ElementCodec};
use criterion::measurement::WallTime;
use criterion::{
    black_box, criterion_group, criterion_main, BenchmarkGroup, BenchmarkId, Criterion,
};

fn make_int_matrix(rows: usize, cols: usize) -> ArrayValue<i64> {
    ArrayValue::Array(
        (0..rows)
            .map(|row| {
                ArrayValue::from_elements((0..cols).map(|col| {
                    let n = (row * cols + col) as i64;
                    (n % 17 != 0).then_some(n * 7919 - 40_000)
                }))
            })
            .collect(),
    )
}

fn make_text_list(count: usize) -> ArrayValue<String> {
    ArrayValue::from_elements((0..count).map(|i| {
        Some(match i % 4 {
            0 => format!("plain{i}"),
            1 => format!("with space {i}"),
            2 => format!("quote \"{i}\" and \\ slash"),
            _ => format!("comma,{i}"),
        })
    }))
}

fn make_bytea_list(count: usize) -> ArrayValue<Vec<u8>> {
    ArrayValue::from_elements((0..count).map(|i| Some((0..32).map(|b| (b * i) as u8).collect())))
}

fn bench_encode<C: ElementCodec>(
    group: &mut BenchmarkGroup<'_, WallTime>,
    name: &str,
    value: &ArrayValue<C::Element>,
    dimension: usize,
    codec: &C,
) {
    group.bench_function(BenchmarkId::new("encode", name), |b| {
        b.iter(|| {
            let text = array_literal::to_string(black_box(value), dimension, codec).unwrap();
            black_box(text);
        });
    });
}

fn bench_decode<C: ElementCodec>(
    group: &mut BenchmarkGroup<'_, WallTime>,
    name: &str,
    text: &str,
    dimension: usize,
    codec: &C,
) {
    group.throughput(criterion::Throughput::Bytes(text.len() as u64));
    group.bench_function(BenchmarkId::new("decode", name), |b| {
        b.iter(|| {
            let value = array_literal::from_str(black_box(text), dimension, codec).unwrap();
            black_box(value);
        });
    });
}

fn criterion_config() -> Criterion {
    if std::env::var("ARRAY_LITERAL_BENCH_MINIMAL").is_ok() {
        Criterion::default()
            .warm_up_time(Duration::from_secs(0))
            .measurement_time(Duration::from_millis(10))
            .sample_size(1)
            .nresamples(1)
    } else {
        Criterion::default()
    }
}

fn criterion_benchmark(c: &mut Criterion) {
    let ints = IntCodec::int8();
    let matrix = make_int_matrix(200, 50);
    let matrix_text = array_literal::to_string(&matrix, 2, &ints).unwrap();

    let texts = make_text_list(5000);
    let texts_text = array_literal::to_string(&texts, 1, &TextCodec).unwrap();

    let bytes = make_bytea_list(1000);
    let bytes_text = array_literal::to_string(&bytes, 1, &ByteaCodec).unwrap();

    let mut group = c.benchmark_group("array_literal");
    bench_encode(&mut group, "int_matrix", &matrix, 2, &ints);
    bench_decode(&mut group, "int_matrix", &matrix_text, 2, &ints);
    bench_encode(&mut group, "text_list", &texts, 1, &TextCodec);
    bench_decode(&mut group, "text_list", &texts_text, 1, &TextCodec);
    bench_encode(&mut group, "bytea_list", &bytes, 1, &ByteaCodec);
    bench_decode(&mut group, "bytea_list", &bytes_text, 1, &ByteaCodec);
    group.finish();

    let mut scan = c.benchmark_group("pre_scan");
    scan.throughput(criterion::Throughput::Bytes(matrix_text.len() as u64));
    scan.bench_function("array_length", |b| {
        b.iter(|| {
            let len = array_literal::array_length(
                black_box(&matrix_text),
                0,
                matrix_text.len(),
                b',',
                array_literal::QuoteEscape::Backslash,
            )
            .unwrap();
            black_box(len);
        });
    });
    scan.finish();
}

criterion_group! {
    name = benches;
    config = criterion_config();
    targets = criterion_benchmark
}
criterion_main!(benches);
