//! Basic swarm simulation with the reference parameters
//!
//! Run with: cargo run --example basic_simulation

use log::info;
use simple_logger::SimpleLogger;

use ts_rust::{SwarmConfig, SwarmOutcome, SwarmRunner, SwarmStatistics};

fn main() {
    SimpleLogger::new().init().unwrap();

    let config = SwarmConfig::default();

    info!(
        "Running reference swarm: {} leechers, {} pieces",
        config.leecher_count, config.piece_count
    );

    let runner = SwarmRunner::new(config.clone());
    let result = runner.run();

    let stats = SwarmStatistics::collect(&result, &config);
    stats.print_report(&result);

    if result.outcome == SwarmOutcome::Aborted {
        info!("swarm did not converge; raise max_steps or bandwidth");
    }
    info!("Seed used: {:?}", result.seed_used);
}
