use crate::ts_interface::{PeerId, StepIndex, SwarmConfig};
use crate::ts_network::TorrentNetwork;
use crate::ts_scheduler::ChokeUnchokeScheduler;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ============================================================================
// Run Outcome
// ============================================================================

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwarmOutcome {
    /// Every peer became a seeder
    Converged,
    /// The step bound was hit first; incomplete peers keep partial sets
    Aborted,
}

/// Final per-peer data handed to the statistics collector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerSummary {
    pub peer_id: PeerId,
    pub upload_rate: u32,
    pub completed_step: Option<StepIndex>,
    pub uploaded_pieces: u64,
    pub downloaded_pieces: u64,
}

/// Complete result of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub outcome: SwarmOutcome,
    pub steps_executed: u64,
    pub seed_used: [u8; 32],
    pub peers: Vec<PeerSummary>,
}

// ============================================================================
// Swarm Runner
// ============================================================================

/// Stepped driver for the whole simulation.
///
/// Owns the RNG (seeded from the config, or freshly from the thread RNG so
/// the run is replayable from the reported seed) and loops the scheduler
/// until the swarm converges or the step bound trips.
pub struct SwarmRunner {
    config: SwarmConfig,
    rng: StdRng,
    seed_used: [u8; 32],
    network: Option<TorrentNetwork>,
}

impl SwarmRunner {
    pub fn new(config: SwarmConfig) -> Self {
        let seed = config.seed.unwrap_or_else(|| {
            let mut seed = [0u8; 32];
            rand::thread_rng().fill(&mut seed);
            seed
        });

        Self {
            config,
            rng: StdRng::from_seed(seed),
            seed_used: seed,
            network: None,
        }
    }

    /// Run against an explicit population instead of the sampled reference
    /// one. Used for fixed scenarios.
    pub fn with_network(config: SwarmConfig, network: TorrentNetwork) -> Self {
        let mut runner = Self::new(config);
        runner.network = Some(network);
        runner
    }

    /// Run the simulation to completion and hand back per-peer results.
    pub fn run(mut self) -> RunResult {
        let mut network = match self.network.take() {
            Some(network) => network,
            None => TorrentNetwork::new(&self.config, &mut self.rng),
        };
        let scheduler = ChokeUnchokeScheduler::new(&self.config);

        info!(
            "starting swarm: {} peers, {} pieces",
            network.peers.len(),
            network.piece_count()
        );

        let mut step: StepIndex = 0;
        let outcome = loop {
            if network.all_seeders() {
                break SwarmOutcome::Converged;
            }

            if self.config.jitter_upload_rates {
                for peer in network.peers.values_mut() {
                    peer.adjust_upload_rate(&self.config, &mut self.rng);
                }
            }

            scheduler.run_step(&mut network, step, &mut self.rng);
            step += 1;

            if step > self.config.max_steps {
                warn!("stopping unconverged swarm after {} steps", step);
                break SwarmOutcome::Aborted;
            }
        };

        let seeders = network.peers.values().filter(|p| p.is_seeder).count();
        info!(
            "swarm finished: {:?} after {} steps ({}/{} seeders)",
            outcome,
            step,
            seeders,
            network.peers.len()
        );

        let peers = network
            .peers
            .values()
            .map(|peer| PeerSummary {
                peer_id: peer.id,
                upload_rate: peer.upload_rate,
                completed_step: peer.completed_step,
                uploaded_pieces: peer.uploaded_pieces_total,
                downloaded_pieces: peer.downloaded_pieces_total,
            })
            .collect();

        RunResult {
            outcome,
            steps_executed: step,
            seed_used: self.seed_used,
            peers,
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
