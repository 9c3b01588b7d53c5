// Codec benchmarks for NOVA transactions.
//
// Covers canonical encoding, decoding, ID derivation, signing and
// BasicCheck for a signed transfer, and decoding throughput for batches.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use nova_tx::crypto::NovaKeypair;
use nova_tx::transaction::{basic_check, sign_transaction, Amount, Transaction};

fn signed_transfer(seed: u8) -> Transaction {
    let alice = NovaKeypair::from_seed(&[seed; 32]);
    let bob = NovaKeypair::from_seed(&[seed.wrapping_add(1); 32]);
    let mut tx = Transaction::new_transfer(
        1_000,
        alice.public_key().account_address(),
        bob.public_key().account_address(),
        Amount::new(5_000_000),
        Amount::new(1_000),
    )
    .with_memo("invoice 42");
    sign_transaction(&mut tx, &alice);
    tx
}

fn bench_encode(c: &mut Criterion) {
    let tx = signed_transfer(1);
    c.bench_function("codec/encode", |b| {
        b.iter(|| tx.to_bytes());
    });
}

fn bench_decode(c: &mut Criterion) {
    let bytes = signed_transfer(1).to_bytes();
    c.bench_function("codec/decode", |b| {
        b.iter(|| Transaction::from_bytes(&bytes).unwrap());
    });
}

fn bench_id(c: &mut Criterion) {
    let tx = signed_transfer(1);
    c.bench_function("codec/id", |b| {
        b.iter(|| tx.id());
    });
}

fn bench_sign(c: &mut Criterion) {
    let keypair = NovaKeypair::from_seed(&[1u8; 32]);
    let unsigned = {
        let mut tx = signed_transfer(1);
        tx.signature = None;
        tx.public_key = None;
        tx
    };
    c.bench_function("codec/sign_transaction", |b| {
        b.iter(|| {
            let mut tx = unsigned.clone();
            sign_transaction(&mut tx, &keypair);
        });
    });
}

fn bench_basic_check(c: &mut Criterion) {
    let tx = signed_transfer(1);
    c.bench_function("codec/basic_check", |b| {
        b.iter(|| basic_check(&tx).unwrap());
    });
}

fn bench_decode_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec/decode_batch");

    for size in [10usize, 100, 1_000] {
        let items: Vec<Vec<u8>> = (0..size)
            .map(|i| signed_transfer((i % 250) as u8).to_bytes())
            .collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &items, |b, items| {
            b.iter(|| {
                for bytes in items {
                    Transaction::from_bytes(bytes).unwrap();
                }
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_encode,
    bench_decode,
    bench_id,
    bench_sign,
    bench_basic_check,
    bench_decode_batch,
);
criterion_main!(benches);
