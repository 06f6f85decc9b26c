// Derivation benchmarks for brainaudit-core.
//
// Covers the individual stages (hashing, public key derivation, Base58Check
// encoding) and full pipeline throughput, which is what bounds how fast a
// dictionary of passphrases can be swept.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use secp256k1::Secp256k1;

use brainaudit_core::crypto::base58;
use brainaudit_core::crypto::hash::{hash160, sha256};
use brainaudit_core::crypto::keys::{derive_key_pair_with, PublicKeyFormat};
use brainaudit_core::{Deriver, NetworkParams};

const PHRASE: &str = "correct horse battery staple";

fn bench_hashing(c: &mut Criterion) {
    c.bench_function("hash/sha256_passphrase", |b| {
        b.iter(|| sha256(PHRASE.as_bytes()));
    });

    let pubkey = [0x04u8; 65];
    c.bench_function("hash/hash160_pubkey", |b| {
        b.iter(|| hash160(&pubkey));
    });
}

fn bench_key_pair(c: &mut Criterion) {
    let secp = Secp256k1::signing_only();
    let mut group = c.benchmark_group("secp256k1/key_pair");

    for format in [PublicKeyFormat::Uncompressed, PublicKeyFormat::Compressed] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{:?}", format).to_lowercase()),
            &format,
            |b, &format| {
                b.iter(|| derive_key_pair_with(&secp, PHRASE.as_bytes(), format).unwrap());
            },
        );
    }

    group.finish();
}

fn bench_base58check(c: &mut Criterion) {
    let mut payload = vec![0x80u8];
    payload.extend_from_slice(&sha256(PHRASE.as_bytes()));
    let encoded = base58::encode_check(&payload);

    c.bench_function("base58/encode_check_wif", |b| {
        b.iter(|| base58::encode_check(&payload));
    });
    c.bench_function("base58/decode_check_wif", |b| {
        b.iter(|| base58::decode_check(&encoded).unwrap());
    });
}

fn bench_pipeline(c: &mut Criterion) {
    let deriver = Deriver::new(NetworkParams::MAINNET, PublicKeyFormat::Uncompressed);

    c.bench_function("pipeline/derive_single", |b| {
        b.iter(|| deriver.derive(PHRASE).unwrap());
    });

    let mut group = c.benchmark_group("pipeline/derive_batch");
    for size in [10, 100, 1000] {
        let phrases: Vec<String> = (0..size).map(|i| format!("word{:05}", i)).collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &phrases, |b, phrases| {
            b.iter(|| {
                for phrase in phrases {
                    deriver.derive(phrase).unwrap();
                }
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_hashing,
    bench_key_pair,
    bench_base58check,
    bench_pipeline,
);
criterion_main!(benches);
