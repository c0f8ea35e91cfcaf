use crate::ts_interface::{PeerId, SwarmConfig};
use crate::ts_peer::Peer;
use crate::ts_rarity::PieceRarityTracker;
use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::Rng;

// ============================================================================
// Torrent Network
// ============================================================================

/// The full swarm: the peer table and the global rarity tracker.
///
/// Peers iterate in insertion order (seeder first, then leechers by id),
/// which keeps the step loop deterministic for a fixed seed. All mutation
/// happens through the scheduler and transfer engine, one step phase at a
/// time.
#[derive(Debug, Clone)]
pub struct TorrentNetwork {
    pub peers: IndexMap<PeerId, Peer>,
    pub rarity: PieceRarityTracker,
    piece_count: usize,
}

impl TorrentNetwork {
    /// Build the reference population: one seeder with id 1 and
    /// `leecher_count` leechers with ids 2..; upload-rate means are drawn
    /// uniformly from the configured range.
    pub fn new(config: &SwarmConfig, rng: &mut StdRng) -> Self {
        let mut peers = IndexMap::with_capacity(config.leecher_count + 1);

        let seeder_rate = rng.gen_range(config.upload_rate_min..config.upload_rate_max);
        let seeder = Peer::new_seeder(1, seeder_rate, config);
        peers.insert(seeder.id, seeder);

        for i in 0..config.leecher_count {
            let id = i as PeerId + 2;
            let rate = rng.gen_range(config.upload_rate_min..config.upload_rate_max);
            peers.insert(id, Peer::new(id, rate, config));
        }

        Self {
            peers,
            rarity: PieceRarityTracker::new(config.piece_count),
            piece_count: config.piece_count,
        }
    }

    /// Build a swarm from an explicit peer population. Rarity counts are
    /// seeded at one copy per piece, matching the single-initial-seeder
    /// baseline.
    pub fn from_peers(peers: Vec<Peer>, piece_count: usize) -> Self {
        let peers: IndexMap<PeerId, Peer> = peers.into_iter().map(|p| (p.id, p)).collect();
        Self {
            peers,
            rarity: PieceRarityTracker::new(piece_count),
            piece_count,
        }
    }

    pub fn piece_count(&self) -> usize {
        self.piece_count
    }

    /// Convergence predicate: every peer holds the full piece set.
    pub fn all_seeders(&self) -> bool {
        self.peers.values().all(|p| p.is_seeder)
    }

    pub fn reset_step_counters(&mut self) {
        for peer in self.peers.values_mut() {
            peer.reset_step_counters();
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
