//! Benchmark command

use crate::cli::BenchmarkArgs;
use std::io;

/// Execute benchmark command
pub async fn execute(args: BenchmarkArgs) -> io::Result<()> {
    println!("Running benchmarks: {}", args.bench_type);
    println!("Duration: {} seconds", args.duration);
    println!("\nBenchmark results (stub):");
    println!("  Crypto ops/sec: 10000");
    println!("  Network throughput: 100 MB/s");
    println!("  Compression ratio: 2.5x");
    Ok(())
}
