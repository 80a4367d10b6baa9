//! Benchmark suite for comparing processing strategies
//!
//! This benchmark compares the sequential and worker-pool strategies, and the
//! effect of the chunker batch size, using the divan benchmarking framework.
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//! ```
//!
//! # Benchmark Data
//!
//! Partitions are generated in memory so no fixture files are needed:
//! - 8 partitions per run, each sorted by account id
//! - accounts with 1 to 40 transactions spread over 30 days
//! - every fifth description contains an escaped delimiter
//! - every third partition is gzip-compressed

use flate2::write::GzEncoder;
use flate2::Compression;
use rust_account_summary::cli::StrategyType;
use rust_account_summary::core::PipelineConfig;
use rust_account_summary::io::{escape_field, MemoryPartition, PartitionSource};
use rust_account_summary::strategy::{create_strategy, PoolConfig};
use std::io::Write;

const PARTITIONS: usize = 8;

fn main() {
    divan::main();
}

fn generate_partition(index: usize, accounts: usize) -> Vec<u8> {
    let mut text = String::from("user_id|account_id|amount|desc|date|type|misc\n");
    for account in 0..accounts {
        let account_id = index * 1_000_000 + account;
        for tx in 0..(account % 40 + 1) {
            let description = if tx % 5 == 0 {
                format!("transfer | ref {}", tx)
            } else {
                format!("purchase {}", tx)
            };
            text.push_str(&format!(
                "{}|{}|{}.{:02}|{}|2021-01-{:02}|{}|\n",
                account_id,
                tx % 3,
                (account * 7 + tx * 13) % 500,
                tx % 100,
                escape_field(&description, b'|'),
                tx % 30 + 1,
                if (account + tx) % 3 == 0 { "debit" } else { "credit" }
            ));
        }
    }

    if index % 3 == 0 {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::fast());
        encoder
            .write_all(text.as_bytes())
            .expect("Failed to compress partition");
        encoder.finish().expect("Failed to finish gzip stream")
    } else {
        text.into_bytes()
    }
}

fn partitions(accounts: usize) -> Vec<Box<dyn PartitionSource>> {
    (0..PARTITIONS)
        .map(|index| {
            Box::new(MemoryPartition::new(
                format!("partition-{}", index),
                generate_partition(index, accounts),
            )) as Box<dyn PartitionSource>
        })
        .collect()
}

/// Benchmark the sequential strategy
#[divan::bench(args = [100, 1_000])]
fn sync_strategy(bencher: divan::Bencher, accounts: usize) {
    let strategy = create_strategy(StrategyType::Sync, PipelineConfig::default(), None);
    bencher
        .with_inputs(|| partitions(accounts))
        .bench_values(|input| strategy.process(input).expect("Processing failed"));
}

/// Benchmark the worker-pool strategy with one worker per CPU
#[divan::bench(args = [100, 1_000])]
fn async_strategy(bencher: divan::Bencher, accounts: usize) {
    let strategy = create_strategy(
        StrategyType::Async,
        PipelineConfig::default(),
        Some(PoolConfig::default()),
    );
    bencher
        .with_inputs(|| partitions(accounts))
        .bench_values(|input| strategy.process(input).expect("Processing failed"));
}

/// Benchmark the chunker batch size on the sequential strategy
#[divan::bench(args = [1, 64, 10_000])]
fn sync_buffer_size(bencher: divan::Bencher, buffer_size: usize) {
    let pipeline = PipelineConfig::default().with_buffer_size(buffer_size);
    let strategy = create_strategy(StrategyType::Sync, pipeline, None);
    bencher
        .with_inputs(|| partitions(500))
        .bench_values(|input| strategy.process(input).expect("Processing failed"));
}
