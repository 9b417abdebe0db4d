use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use scroogecoin_lib::{
    Keypair, LedgerValidator, OutputIndex, Transaction, TransactionBuilder, UtxoPool,
};

const NUM_TRANSACTIONS: usize = 200;

fn seed(i: usize) -> [u8; 32] {
    let mut seed = [7; 32];
    seed[..8].copy_from_slice(&(i as u64).to_le_bytes());
    seed
}

/// One coinbase per owner and one signed transfer spending each coinbase.
fn create_epoch() -> (UtxoPool, Vec<Transaction>) {
    let owners = (0..NUM_TRANSACTIONS)
        .map(|i| Keypair::from_seed(seed(i)))
        .collect::<Vec<Keypair>>();
    let recipient = Keypair::from_seed([0xaa; 32]).address();
    let coinbases = owners
        .iter()
        .map(|owner| Transaction::coinbase(owner.address(), 50).unwrap())
        .collect::<Vec<Transaction>>();
    let transfers = coinbases
        .iter()
        .zip(&owners)
        .map(|(coinbase, owner)| {
            TransactionBuilder::new()
                .add_input(*coinbase.id(), OutputIndex::new(0))
                .add_output(recipient, 30)
                .add_output(owner.address(), 20)
                .sign_input(0, owner)
                .unwrap()
                .build()
                .unwrap()
        })
        .collect();
    (UtxoPool::from_transactions(&coinbases), transfers)
}

fn apply_epoch_benchmark(c: &mut Criterion) {
    let (pool, transfers) = create_epoch();

    let mut group = c.benchmark_group("Ledger");
    group.throughput(Throughput::Elements(transfers.len() as u64));
    // Signature verification dominates, the pool is cloned outside of the measurement.
    group.bench_function("apply_epoch for 200 signed transfers", |b| {
        b.iter_batched(
            || LedgerValidator::new(pool.clone()),
            |mut validator| {
                let accepted = validator.apply_epoch(black_box(&transfers));
                black_box(accepted);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, apply_epoch_benchmark);

criterion_main!(benches);
