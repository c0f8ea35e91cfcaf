//! Run the same fixed seed twice and verify the results are identical
//!
//! Run with: cargo run --example fixed_seed_run

use log::info;
use simple_logger::SimpleLogger;

use ts_rust::{SwarmConfig, SwarmRunner};

fn main() {
    SimpleLogger::new().init().unwrap();

    // Use a fixed seed for reproducible results
    let fixed_seed = [42u8; 32];

    info!("Running simulation with fixed seed: {:?}", fixed_seed);

    let config = SwarmConfig {
        piece_count: 30,
        leecher_count: 40,
        seed: Some(fixed_seed),
        ..Default::default()
    };

    let first = SwarmRunner::new(config.clone()).run();
    let second = SwarmRunner::new(config).run();

    info!("First run:  {:?} after {} steps", first.outcome, first.steps_executed);
    info!("Second run: {:?} after {} steps", second.outcome, second.steps_executed);

    assert_eq!(first.seed_used, fixed_seed, "Seed mismatch!");
    assert_eq!(first, second, "Same seed produced diverging runs!");
    info!("✓ Replay verification passed!");
}
