use crate::ts_interface::{PeerId, PieceIndex, StepIndex, SwarmConfig};
use hashbrown::HashSet;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use std::fmt;

// ============================================================================
// Peer
// ============================================================================

/// One participant in the swarm.
///
/// A peer owns a monotonically growing set of pieces and becomes a seeder
/// exactly once, when the set reaches the full piece count. Upload capability
/// is a sampled rate; the per-step upload budget is derived from it. Per-step
/// counters are reset by the scheduler at the top of every step.
#[derive(Debug, Clone)]
pub struct Peer {
    pub id: PeerId,

    /// Piece indices owned; never shrinks
    pub pieces: HashSet<PieceIndex>,

    /// Set exactly once, never reverts
    pub is_seeder: bool,

    /// Capability the rate jitters around
    pub upload_rate_mean: u32,

    /// Current capability; equals the mean unless jitter is enabled
    pub upload_rate: u32,

    /// Pieces this peer may upload per step
    pub upload_bandwidth: u32,

    /// Pieces this peer may receive per step
    pub max_download_bandwidth: u32,

    // Per-step transients
    pub upload_count_step: u32,
    pub download_count_step: u32,

    // Cumulative counters
    pub uploaded_pieces_total: u64,
    pub downloaded_pieces_total: u64,

    /// Step at which the peer became a seeder; `None` while incomplete.
    /// The initial seeder never transitions and keeps `None`.
    pub completed_step: Option<StepIndex>,

    /// Peers that unchoked this peer during the current step
    pub unchoked_by: HashSet<PeerId>,
}

impl Peer {
    /// Create a leecher with an empty piece set.
    pub fn new(id: PeerId, upload_rate_mean: u32, config: &SwarmConfig) -> Self {
        Self {
            id,
            pieces: HashSet::new(),
            is_seeder: false,
            upload_rate_mean,
            upload_rate: upload_rate_mean,
            upload_bandwidth: upload_rate_mean / config.rate_units_per_piece,
            max_download_bandwidth: config.max_download_bandwidth,
            upload_count_step: 0,
            download_count_step: 0,
            uploaded_pieces_total: 0,
            downloaded_pieces_total: 0,
            completed_step: None,
            unchoked_by: HashSet::new(),
        }
    }

    /// Create the initial seeder, holding every piece from the start.
    pub fn new_seeder(id: PeerId, upload_rate_mean: u32, config: &SwarmConfig) -> Self {
        let mut peer = Self::new(id, upload_rate_mean, config);
        peer.pieces = (0..config.piece_count).collect();
        peer.is_seeder = true;
        peer
    }

    /// Zero the per-step counters and clear the unchoke marks.
    pub fn reset_step_counters(&mut self) {
        self.upload_count_step = 0;
        self.download_count_step = 0;
        self.unchoked_by.clear();
    }

    /// Resample the upload rate around its mean and recompute the upload
    /// budget. Floored at `upload_rate_floor`. Invoked by the runner only
    /// when `jitter_upload_rates` is set.
    pub fn adjust_upload_rate(&mut self, config: &SwarmConfig, rng: &mut StdRng) {
        let Ok(dist) = Normal::new(self.upload_rate_mean as f64, config.rate_jitter_stddev) else {
            return;
        };
        let sampled = dist.sample(rng) as i64;
        self.upload_rate = sampled.max(config.upload_rate_floor as i64) as u32;
        self.upload_bandwidth = self.upload_rate / config.rate_units_per_piece;
    }

    /// Remaining pieces this peer may upload within the current step.
    pub fn remaining_upload_budget(&self) -> u32 {
        self.upload_bandwidth.saturating_sub(self.upload_count_step)
    }

    /// Remaining pieces this peer may receive within the current step.
    pub fn remaining_download_budget(&self) -> u32 {
        self.max_download_bandwidth.saturating_sub(self.download_count_step)
    }
}

impl fmt::Display for Peer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Peer {}: pieces={}, seeder={}, rate={}, up_bw={}, down_bw={}, \
             recent_up={}, recent_down={}",
            self.id,
            self.pieces.len(),
            self.is_seeder,
            self.upload_rate,
            self.upload_bandwidth,
            self.max_download_bandwidth,
            self.upload_count_step,
            self.download_count_step,
        )?;
        if let Some(step) = self.completed_step {
            write!(f, ", completed_at={}", step)?;
        }
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_new_leecher() {
        let config = SwarmConfig::default();
        let peer = Peer::new(7, 450, &config);

        assert_eq!(peer.id, 7);
        assert!(peer.pieces.is_empty());
        assert!(!peer.is_seeder);
        assert_eq!(peer.upload_rate, 450);
        assert_eq!(peer.upload_bandwidth, 4);
        assert_eq!(peer.max_download_bandwidth, 8);
        assert_eq!(peer.completed_step, None);
    }

    #[test]
    fn test_new_seeder_holds_full_set() {
        let config = SwarmConfig::default();
        let seeder = Peer::new_seeder(1, 300, &config);

        assert!(seeder.is_seeder);
        assert_eq!(seeder.pieces.len(), config.piece_count);
        for piece in 0..config.piece_count {
            assert!(seeder.pieces.contains(&piece));
        }
        // Seeded by construction, never completed during a run
        assert_eq!(seeder.completed_step, None);
    }

    #[test]
    fn test_reset_step_counters() {
        let config = SwarmConfig::default();
        let mut peer = Peer::new(2, 200, &config);

        peer.upload_count_step = 2;
        peer.download_count_step = 5;
        peer.unchoked_by.insert(9);

        peer.reset_step_counters();

        assert_eq!(peer.upload_count_step, 0);
        assert_eq!(peer.download_count_step, 0);
        assert!(peer.unchoked_by.is_empty());
    }

    #[test]
    fn test_reset_keeps_cumulative_counters() {
        let config = SwarmConfig::default();
        let mut peer = Peer::new(2, 200, &config);

        peer.uploaded_pieces_total = 11;
        peer.downloaded_pieces_total = 13;
        peer.reset_step_counters();

        assert_eq!(peer.uploaded_pieces_total, 11);
        assert_eq!(peer.downloaded_pieces_total, 13);
    }

    #[test]
    fn test_adjust_upload_rate_respects_floor() {
        let config = SwarmConfig::default();
        let mut rng = StdRng::seed_from_u64(42);
        // Mean at the floor, so roughly half the raw samples fall below it
        let mut peer = Peer::new(3, config.upload_rate_floor, &config);

        for _ in 0..200 {
            peer.adjust_upload_rate(&config, &mut rng);
            assert!(peer.upload_rate >= config.upload_rate_floor);
            assert_eq!(
                peer.upload_bandwidth,
                peer.upload_rate / config.rate_units_per_piece
            );
        }
    }

    #[test]
    fn test_adjust_upload_rate_tracks_mean() {
        let config = SwarmConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        let mut peer = Peer::new(4, 500, &config);

        let mut sum = 0u64;
        let rounds = 500;
        for _ in 0..rounds {
            peer.adjust_upload_rate(&config, &mut rng);
            sum += peer.upload_rate as u64;
        }
        let avg = sum as f64 / rounds as f64;
        // Mean 500, stddev 80: the running average stays near the mean
        assert!((avg - 500.0).abs() < 20.0, "avg drifted to {}", avg);
    }
}
