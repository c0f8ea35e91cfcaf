use log::info;
use simple_logger::SimpleLogger;

use ts_rust::{SwarmConfig, SwarmRunner, SwarmStatistics};

fn main() {
    SimpleLogger::new().init().unwrap();

    info!("starting");

    let config = SwarmConfig::default();
    let runner = SwarmRunner::new(config.clone());
    let result = runner.run();

    let stats = SwarmStatistics::collect(&result, &config);
    stats.print_report(&result);

    // Echo the seed so the run can be replayed exactly
    info!("let seed = {:?};", result.seed_used);
}
