//! order-pool - run a fixed pool of cooks over a queue of orders
//!
//! Prints the four final counts: orders left in the queue, completions,
//! distinct completions and duplicates.

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use order_pool::unsynchronized::run_unsynchronized;
use order_pool::{ClaimStrategy, Coordinator, PoolConfig, RecordStrategy, RunSummary};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// order-pool - drain a shared order queue with a fixed pool of workers
#[derive(Parser, Debug)]
#[command(name = "order-pool")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Number of cooks (worker threads)
    #[arg(long, default_value_t = 5)]
    cooks: usize,

    /// Number of orders to prepare
    #[arg(long, default_value_t = 100)]
    orders: usize,

    /// Upper bound of the simulated preparation time, in milliseconds
    #[arg(long, default_value_t = 1000)]
    max_delay_ms: u64,

    /// Seed for reproducible preparation times
    #[arg(long)]
    seed: Option<u64>,

    /// How cooks claim orders from the queue
    #[arg(long, value_enum, default_value_t = ClaimStrategy::Locked)]
    claim: ClaimStrategy,

    /// How cooks record finished orders
    #[arg(long, value_enum, default_value_t = RecordStrategy::Locked)]
    record: RecordStrategy,

    /// Run the deliberately racy pool instead (demonstration only)
    #[arg(long)]
    unsynchronized: bool,

    /// Number of runs to perform (at least 1)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    trials: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let mut builder = PoolConfig::builder()
        .num_workers(cli.cooks)
        .num_items(cli.orders)
        .max_delay(Duration::from_millis(cli.max_delay_ms))
        .claim(cli.claim)
        .record(cli.record);
    if let Some(seed) = cli.seed {
        builder = builder.seed(seed);
    }
    let config = builder.build();

    let coordinator = if cli.unsynchronized {
        None
    } else {
        Some(Coordinator::new(config.clone())?)
    };

    for trial in 0..cli.trials {
        let summary: RunSummary = match &coordinator {
            Some(coordinator) => coordinator.execute()?,
            None => run_unsynchronized(&config)?,
        };

        if cli.trials > 1 {
            let report = summary.report;
            println!(
                "trial {}: {} {} {} {}",
                trial,
                report.remaining_in_queue,
                report.total_completed,
                report.unique_completed,
                report.duplicate_count
            );
        } else {
            println!("\n--- Processing finished ---");
            println!("{}", summary.report);
        }
    }

    Ok(())
}
