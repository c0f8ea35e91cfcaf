use crate::ts_interface::{PeerId, StepIndex, SwarmConfig};
use crate::ts_network::TorrentNetwork;
use crate::ts_peer::Peer;
use crate::ts_transfer::PieceTransferEngine;
use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::Rng;

// ============================================================================
// Choke/Unchoke Scheduler
// ============================================================================

/// Per-step admission control: decides, for every peer, which other peers
/// it unchokes this step, then hands each decision to the transfer engine.
///
/// The decision phase for all peers completes before any transfer runs.
/// Decisions read piece sets that only the transfer phase mutates, so they
/// are stable regardless of peer-processing order; the transfer phase then
/// applies decisions in peer-table order, and a peer serving later in the
/// step may already hold pieces it received earlier in the same step.
#[derive(Debug, Clone)]
pub struct ChokeUnchokeScheduler {
    regular_slots: usize,
    optimistic_period: u64,
    transfer: PieceTransferEngine,
}

impl ChokeUnchokeScheduler {
    pub fn new(config: &SwarmConfig) -> Self {
        Self {
            regular_slots: config.regular_unchoke_slots,
            optimistic_period: config.optimistic_unchoke_period,
            transfer: PieceTransferEngine::new(config.piece_count),
        }
    }

    /// Run one full step: reset per-step state, decide every peer's
    /// unchoke set, then move pieces decision by decision.
    pub fn run_step(&self, network: &mut TorrentNetwork, step: StepIndex, rng: &mut StdRng) {
        network.reset_step_counters();

        let decider_ids: Vec<PeerId> = network.peers.keys().copied().collect();
        let mut decisions: Vec<(PeerId, Vec<PeerId>)> = Vec::new();

        for decider_id in decider_ids {
            let chosen = self.select_unchokes(&network.peers, decider_id, step, rng);
            if chosen.is_empty() {
                continue;
            }

            // Record the unchoke marks; a leecher also tracks the
            // reciprocal relationship on its own set
            let decider_is_seeder = network
                .peers
                .get(&decider_id)
                .map(|p| p.is_seeder)
                .unwrap_or(false);
            for &chosen_id in &chosen {
                if let Some(peer) = network.peers.get_mut(&chosen_id) {
                    peer.unchoked_by.insert(decider_id);
                }
            }
            if !decider_is_seeder {
                if let Some(decider) = network.peers.get_mut(&decider_id) {
                    for &chosen_id in &chosen {
                        decider.unchoked_by.insert(chosen_id);
                    }
                }
            }

            decisions.push((decider_id, chosen));
        }

        for (uploader_id, chosen) in decisions {
            self.transfer
                .share_pieces(&mut network.peers, &mut network.rarity, uploader_id, &chosen, step);
        }
    }

    /// Compute one peer's unchoke set for this step: the top-ranked
    /// eligible peers plus, on optimistic steps, one uniform random pick
    /// from the whole eligible set (which may duplicate a ranked pick).
    fn select_unchokes(
        &self,
        peers: &IndexMap<PeerId, Peer>,
        decider_id: PeerId,
        step: StepIndex,
        rng: &mut StdRng,
    ) -> Vec<PeerId> {
        let Some(decider) = peers.get(&decider_id) else {
            return Vec::new();
        };

        let mut eligible = Self::eligible_peers(peers, decider);
        if eligible.is_empty() {
            return Vec::new();
        }

        // Peers closest to completion first; the sort is stable, so ties
        // keep peer-table order
        eligible.sort_by(|a, b| b.1.cmp(&a.1));

        let mut chosen: Vec<PeerId> = eligible
            .iter()
            .take(self.regular_slots)
            .map(|&(id, _)| id)
            .collect();

        if self.optimistic_period > 0 && step % self.optimistic_period == 0 {
            let pick = eligible[rng.gen_range(0..eligible.len())].0;
            chosen.push(pick);
        }

        chosen
    }

    /// Candidates a peer considers unchoking, with their piece counts.
    ///
    /// A seeder considers every incomplete leecher. A leecher considers
    /// only leechers holding at least one piece the leecher itself lacks;
    /// the filter is what the decider could gain, not what it can offer.
    /// That asymmetry is a deliberate self-interest heuristic.
    fn eligible_peers(peers: &IndexMap<PeerId, Peer>, decider: &Peer) -> Vec<(PeerId, usize)> {
        peers
            .iter()
            .filter(|(&id, candidate)| {
                if id == decider.id || candidate.is_seeder {
                    return false;
                }
                if decider.is_seeder {
                    true
                } else {
                    candidate
                        .pieces
                        .difference(&decider.pieces)
                        .next()
                        .is_some()
                }
            })
            .map(|(&id, candidate)| (id, candidate.pieces.len()))
            .collect()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
