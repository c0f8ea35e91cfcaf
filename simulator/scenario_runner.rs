// Scenario Runner - Load and execute scenario YAML files
//
// Usage:
//   cargo run --bin scenario_runner scenarios/baseline.yaml
//   cargo run --bin scenario_runner scenarios/  (runs all .yaml files in directory)
//   cargo run --bin scenario_runner scenarios/baseline.yaml --seed 0x1234...

use std::env;
use std::fs;
use std::path::Path;

use simple_logger::SimpleLogger;

use ts_rust::{SwarmConfig, SwarmRunner, SwarmStatistics};

/// Simplified scenario file format
#[derive(Debug, serde::Deserialize)]
struct ScenarioFile {
    /// Scenario metadata
    #[serde(default)]
    meta: ScenarioMeta,

    /// Configuration overrides
    #[serde(default)]
    config: ScenarioConfig,
}

#[derive(Debug, Default, serde::Deserialize)]
struct ScenarioMeta {
    name: Option<String>,
    description: Option<String>,
    hypothesis: Option<String>,
}

/// Overrides applied on top of the reference configuration
#[derive(Debug, Default, serde::Deserialize)]
struct ScenarioConfig {
    piece_count: Option<usize>,
    leecher_count: Option<usize>,
    upload_rate_min: Option<u32>,
    upload_rate_max: Option<u32>,
    rate_units_per_piece: Option<u32>,
    max_download_bandwidth: Option<u32>,
    regular_unchoke_slots: Option<usize>,
    optimistic_unchoke_period: Option<u64>,
    max_steps: Option<u64>,
    jitter_upload_rates: Option<bool>,
    rate_jitter_stddev: Option<f64>,
    upload_rate_floor: Option<u32>,
}

fn main() {
    let _ = SimpleLogger::new().init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <scenario.yaml | directory/> [--seed SEED_HEX]", args[0]);
        eprintln!("\nExamples:");
        eprintln!("  {} scenarios/baseline.yaml", args[0]);
        eprintln!("  {} scenarios/", args[0]);
        eprintln!("  {} scenarios/baseline.yaml --seed 0x123456...", args[0]);
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);

    // Parse optional seed
    let seed: Option<[u8; 32]> = if args.len() >= 4 && args[2] == "--seed" {
        Some(parse_seed_hex(&args[3]))
    } else {
        None
    };

    if path.is_file() {
        run_scenario_file(path, seed);
    } else if path.is_dir() {
        run_scenario_directory(path, seed);
    } else {
        eprintln!("Error: Path does not exist: {}", path.display());
        std::process::exit(1);
    }
}

fn run_scenario_directory(dir: &Path, seed: Option<[u8; 32]>) {
    let mut scenarios = Vec::new();

    // Find all .yaml files
    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("yaml")
                || path.extension().and_then(|s| s.to_str()) == Some("yml")
            {
                scenarios.push(path);
            }
        }
    }

    scenarios.sort();

    if scenarios.is_empty() {
        eprintln!("No .yaml files found in {}", dir.display());
        std::process::exit(1);
    }

    println!("\n╔════════════════════════════════════════════════════════╗");
    println!("║  SCENARIO RUNNER - Multiple Scenarios                  ║");
    println!("╚════════════════════════════════════════════════════════╝\n");
    println!("Found {} scenario(s) to run\n", scenarios.len());

    for (i, scenario_path) in scenarios.iter().enumerate() {
        println!("\n{}/{} Running: {}\n", i + 1, scenarios.len(), scenario_path.display());
        run_scenario_file(scenario_path, seed);
    }

    println!("\n╔════════════════════════════════════════════════════════╗");
    println!("║  All scenarios complete!                               ║");
    println!("╚════════════════════════════════════════════════════════╝\n");
}

fn run_scenario_file(path: &Path, seed: Option<[u8; 32]>) {
    println!("Loading scenario from: {}", path.display());

    // Load and parse YAML
    let yaml_content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Failed to read {}: {}", path.display(), e);
        std::process::exit(1);
    });

    let scenario: ScenarioFile = serde_yaml::from_str(&yaml_content).unwrap_or_else(|e| {
        eprintln!("Failed to parse {}: {}", path.display(), e);
        std::process::exit(1);
    });

    // Print scenario header
    println!("\n╔════════════════════════════════════════════════════════╗");
    if let Some(ref name) = scenario.meta.name {
        println!("║  {}  {}", name, " ".repeat(54_usize.saturating_sub(name.len())));
    } else {
        println!("║  Scenario: {}  ", path.file_stem().unwrap().to_str().unwrap());
    }
    println!("╚════════════════════════════════════════════════════════╝\n");

    if let Some(ref desc) = scenario.meta.description {
        println!("{}\n", desc);
    }

    if let Some(ref hypothesis) = scenario.meta.hypothesis {
        println!("Hypothesis:");
        println!("  {}\n", hypothesis);
    }

    // Build configuration
    let mut config = SwarmConfig::default();
    config.seed = seed;

    // Apply scenario overrides
    let overrides = &scenario.config;
    if let Some(v) = overrides.piece_count {
        config.piece_count = v;
    }
    if let Some(v) = overrides.leecher_count {
        config.leecher_count = v;
    }
    if let Some(v) = overrides.upload_rate_min {
        config.upload_rate_min = v;
    }
    if let Some(v) = overrides.upload_rate_max {
        config.upload_rate_max = v;
    }
    if let Some(v) = overrides.rate_units_per_piece {
        config.rate_units_per_piece = v;
    }
    if let Some(v) = overrides.max_download_bandwidth {
        config.max_download_bandwidth = v;
    }
    if let Some(v) = overrides.regular_unchoke_slots {
        config.regular_unchoke_slots = v;
    }
    if let Some(v) = overrides.optimistic_unchoke_period {
        config.optimistic_unchoke_period = v;
    }
    if let Some(v) = overrides.max_steps {
        config.max_steps = v;
    }
    if let Some(v) = overrides.jitter_upload_rates {
        config.jitter_upload_rates = v;
    }
    if let Some(v) = overrides.rate_jitter_stddev {
        config.rate_jitter_stddev = v;
    }
    if let Some(v) = overrides.upload_rate_floor {
        config.upload_rate_floor = v;
    }

    println!("Configuration:");
    println!("  Pieces: {}", config.piece_count);
    println!("  Leechers: {}", config.leecher_count);
    println!(
        "  Upload rates: {}..{} ({} units/piece)",
        config.upload_rate_min, config.upload_rate_max, config.rate_units_per_piece
    );
    println!("  Download bandwidth: {}", config.max_download_bandwidth);
    println!(
        "  Unchoke slots: {} (+1 optimistic every {} steps)",
        config.regular_unchoke_slots, config.optimistic_unchoke_period
    );
    println!("  Step bound: {}", config.max_steps);
    println!("\nStarting simulation...\n");

    // Run simulation
    let runner = SwarmRunner::new(config.clone());
    let result = runner.run();

    // Print results
    let stats = SwarmStatistics::collect(&result, &config);
    stats.print_report(&result);

    println!("\n✓ Scenario complete!\n");
}

fn parse_seed_hex(hex: &str) -> [u8; 32] {
    let hex = hex.strip_prefix("0x").unwrap_or(hex);
    let mut seed = [0u8; 32];

    for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
        if i >= 32 {
            break;
        }
        let s = std::str::from_utf8(chunk).unwrap_or("0");
        seed[i] = u8::from_str_radix(s, 16).unwrap_or(0);
    }

    seed
}
