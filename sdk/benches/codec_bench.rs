// Codec and compiler benchmarks.
//
// Covers compact-length encoding, message compilation at growing
// instruction counts, wire decoding, and account layout decoding.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use solwire::codec::{encode_len, encode_to_vec, Reader};
use solwire::layout::{AccountKind, Mint};
use solwire::message::{AddressLookupTableAccount, Message, MessageV0};
use solwire::programs::system;
use solwire::{Hash, PublicKey, TransactionInstruction};

fn transfers(payer: &PublicKey, count: usize) -> (Vec<TransactionInstruction>, Vec<PublicKey>) {
    let recipients: Vec<PublicKey> = (0..count).map(|_| PublicKey::new_unique()).collect();
    let instructions = recipients
        .iter()
        .map(|to| system::transfer(payer, to, 1))
        .collect();
    (instructions, recipients)
}

fn bench_compact_len(c: &mut Criterion) {
    c.bench_function("codec/compact_len_roundtrip", |b| {
        let mut out = Vec::with_capacity(4);
        b.iter(|| {
            out.clear();
            encode_len(&mut out, black_box(0x3fff));
            Reader::new(&out).read_compact_len()
        });
    });
}

fn bench_compile_legacy(c: &mut Criterion) {
    let mut group = c.benchmark_group("compiler/legacy");
    let payer = PublicKey::new_unique();
    for count in [1usize, 8, 32] {
        let (instructions, _) = transfers(&payer, count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &instructions, |b, ixs| {
            b.iter(|| Message::compile(&payer, ixs, Hash::default()));
        });
    }
    group.finish();
}

fn bench_compile_v0(c: &mut Criterion) {
    let payer = PublicKey::new_unique();
    let (instructions, recipients) = transfers(&payer, 32);
    let table = [AddressLookupTableAccount::new(PublicKey::new_unique(), recipients)];
    c.bench_function("compiler/v0_with_table", |b| {
        b.iter(|| MessageV0::compile(&payer, &instructions, &table, Hash::default()));
    });
}

fn bench_message_decode(c: &mut Criterion) {
    let payer = PublicKey::new_unique();
    let (instructions, _) = transfers(&payer, 16);
    let bytes = Message::compile(&payer, &instructions, Hash::default())
        .map(|message| message.serialize())
        .unwrap_or_default();
    c.bench_function("codec/message_decode", |b| {
        b.iter(|| Message::deserialize(black_box(&bytes)));
    });
}

fn bench_mint_decode(c: &mut Criterion) {
    let raw = encode_to_vec(&Mint {
        supply: 1_000,
        decimals: 6,
        is_initialized: true,
        ..Mint::default()
    });
    c.bench_function("layout/mint_decode", |b| {
        b.iter(|| AccountKind::Mint.decode(black_box(&raw)));
    });
}

criterion_group!(
    benches,
    bench_compact_len,
    bench_compile_legacy,
    bench_compile_v0,
    bench_message_decode,
    bench_mint_decode
);
criterion_main!(benches);
