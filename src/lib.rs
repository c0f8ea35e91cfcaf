//! # tsRust - Tit-for-Tat Swarm Simulator
//!
//! A Rust implementation of a swarm-based file-sharing simulation modeled on
//! the BitTorrent tit-for-tat protocol. A population of peers exchanges
//! fixed-size file pieces under per-peer upload-bandwidth limits, with a
//! periodic choke/unchoke decision deciding who may receive uploads,
//! rarest-first piece selection, and sporadic optimistic unchoking.
//!
//! ## Core Components
//!
//! - **Peer**: One swarm participant, its piece set and bandwidth budgets
//! - **PieceRarityTracker**: Global piece propagation counts (rarest-first key)
//! - **ChokeUnchokeScheduler**: Per-step unchoke decisions and phasing
//! - **PieceTransferEngine**: Bandwidth-constrained piece movement
//! - **SwarmRunner**: Stepped driver with a Converged/Aborted outcome
//! - **SwarmStatistics**: Display-only aggregation of a finished run
//!
//! ## Usage
//!
//! ```no_run
//! use ts_rust::{SwarmConfig, SwarmRunner, SwarmStatistics};
//!
//! let config = SwarmConfig::default();
//! let result = SwarmRunner::new(config.clone()).run();
//!
//! let stats = SwarmStatistics::collect(&result, &config);
//! stats.print_report(&result);
//! ```
//!
//! The model is single-threaded and step-sequential: within a step, every
//! peer's unchoke decision is made against the piece sets left by the
//! previous step, then transfers apply in peer-table order. Runs are
//! deterministic for a fixed seed; the seed actually used is reported in the
//! result so any run can be replayed.
//!
//! ## Scenarios
//!
//! The `scenario_runner` binary executes YAML scenario files from
//! `scenarios/`, overriding the reference configuration per file.

// Core simulation modules
pub mod ts_interface;
pub mod ts_network;
pub mod ts_peer;
pub mod ts_rarity;
pub mod ts_runner;
pub mod ts_scheduler;
pub mod ts_stats;
pub mod ts_transfer;

// Re-export commonly used types
pub use ts_interface::{PeerId, PieceIndex, StepIndex, SwarmConfig};
pub use ts_network::TorrentNetwork;
pub use ts_peer::Peer;
pub use ts_rarity::PieceRarityTracker;
pub use ts_runner::{PeerSummary, RunResult, SwarmOutcome, SwarmRunner};
pub use ts_scheduler::ChokeUnchokeScheduler;
pub use ts_stats::{RateBucket, SwarmStatistics};
pub use ts_transfer::PieceTransferEngine;
