//! Benchmark suite for the ledger engine and the replay pipeline
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench
//! ```
//!
//! Inputs are generated into temporary files so the benchmarks need no
//! checked-in fixtures. Requests are spread over five accounts (the default
//! seed layout) and mix credits with debits, some of which hit the limit.

use account_ledger::command::ReplayRunner;
use account_ledger::core::{EngineConfig, ReplayConfig};
use account_ledger::{Account, AccountStore, LedgerEngine, TransactionRequest};
use std::fmt::Write as _;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tokio_util::sync::CancellationToken;

const SEED: &str = "client,limit,balance\n\
                    1,100000,0\n\
                    2,80000,0\n\
                    3,1000000,0\n\
                    4,10000000,0\n\
                    5,500000,0\n";

fn main() {
    divan::main();
}

fn temp_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write temp file");
    file.flush().expect("Failed to flush temp file");
    file
}

fn request_csv(count: usize) -> String {
    let mut csv = String::from("client,amount,kind,description\n");
    for i in 0..count {
        let client = i % 5 + 1;
        let kind = if i % 3 == 0 { "debit" } else { "credit" };
        let amount = (i * 37) % 5000 + 1;
        writeln!(csv, "{},{},{},bench", client, amount, kind).expect("write to String");
    }
    csv
}

fn replay(count: usize) {
    let accounts = temp_file(SEED);
    let input = temp_file(&request_csv(count));
    let runner = ReplayRunner::new(EngineConfig::default(), ReplayConfig::default());
    let mut output = Vec::new();

    runner
        .run(accounts.path(), input.path(), &mut output)
        .expect("Replay failed");
}

/// Replay 100 requests, runtime start-up included
#[divan::bench]
fn replay_small() {
    replay(100);
}

/// Replay 10,000 requests
#[divan::bench]
fn replay_medium() {
    replay(10_000);
}

/// Sequential units of work on a single account
#[divan::bench(args = [100, 1_000])]
fn apply_sequential(bencher: divan::Bencher, count: usize) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to build runtime");

    bencher.bench_local(|| {
        runtime.block_on(async {
            let store = AccountStore::new();
            store
                .provision(Account::new(1, 0, 0))
                .expect("Failed to provision");
            let engine = LedgerEngine::new(Arc::new(store), EngineConfig::default());
            let cancel = CancellationToken::new();
            let request = TransactionRequest::new(1, 1, "credit", "bench");

            for _ in 0..count {
                engine
                    .submit(&request, &cancel)
                    .await
                    .expect("Credit failed");
            }
        })
    });
}

/// Statement read on an account with a long history
#[divan::bench]
fn statement_read(bencher: divan::Bencher) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to build runtime");

    let engine = runtime.block_on(async {
        let store = AccountStore::new();
        store
            .provision(Account::new(1, 0, 0))
            .expect("Failed to provision");
        let engine = LedgerEngine::new(Arc::new(store), EngineConfig::default());
        let cancel = CancellationToken::new();
        let request = TransactionRequest::new(1, 1, "credit", "bench");
        for _ in 0..10_000 {
            engine
                .submit(&request, &cancel)
                .await
                .expect("Credit failed");
        }
        engine
    });
    let cancel = CancellationToken::new();

    bencher.bench_local(|| {
        runtime
            .block_on(engine.get_statement(1, &cancel))
            .expect("Statement failed")
    });
}
