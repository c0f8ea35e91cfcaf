// all the same numeric type of some size to allow casting/interop
pub type PeerId = u64;

pub type PieceIndex = usize;
pub type StepIndex = u64;

// ============================================================================
// Configuration
// ============================================================================

/// Construction-time parameters for a swarm run.
///
/// `Default` carries the reference parameters: a 50-piece file, 100 leechers
/// seeded by a single full copy, upload capability drawn uniformly from
/// [100, 800) with one upload slot of bandwidth per 100 rate units, and a
/// flat download cap of 8 pieces per step.
#[derive(Debug, Clone)]
pub struct SwarmConfig {
    // ===== File & Population =====
    /// Number of pieces the shared file is split into (default: 50)
    pub piece_count: usize,

    /// Number of leechers created alongside the single initial seeder (default: 100)
    pub leecher_count: usize,

    // ===== Capability Sampling =====
    /// Lower bound of the uniform upload-rate range, inclusive (default: 100)
    pub upload_rate_min: u32,

    /// Upper bound of the uniform upload-rate range, exclusive (default: 800)
    pub upload_rate_max: u32,

    /// Rate units per piece of upload bandwidth; bandwidth = rate / units (default: 100)
    pub rate_units_per_piece: u32,

    /// Pieces any peer may receive per step (default: 8)
    pub max_download_bandwidth: u32,

    // ===== Choke/Unchoke Parameters =====
    /// Regular unchoke slots granted per peer per step (default: 3)
    pub regular_unchoke_slots: usize,

    /// Steps between optimistic unchokes; 0 disables the optimistic slot (default: 3)
    pub optimistic_unchoke_period: u64,

    // ===== Loop Bounds =====
    /// Abort the run once the step counter passes this bound (default: 2000)
    pub max_steps: u64,

    // ===== Rate Jitter =====
    /// Resample every peer's upload rate each step (default: false)
    pub jitter_upload_rates: bool,

    /// Standard deviation of the jitter distribution (default: 80.0)
    pub rate_jitter_stddev: f64,

    /// Minimum upload rate a jittered peer can fall to (default: 100)
    pub upload_rate_floor: u32,

    // ===== Reproducibility =====
    /// Random seed; filled from the thread RNG when absent
    pub seed: Option<[u8; 32]>,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            // File & population
            piece_count: 50,
            leecher_count: 100,

            // Capability sampling
            upload_rate_min: 100,
            upload_rate_max: 800,
            rate_units_per_piece: 100,
            max_download_bandwidth: 8,

            // Choke/unchoke
            regular_unchoke_slots: 3,
            optimistic_unchoke_period: 3,

            // Loop bounds
            max_steps: 2000,

            // Rate jitter
            jitter_upload_rates: false,
            rate_jitter_stddev: 80.0,
            upload_rate_floor: 100,

            // Reproducibility
            seed: None,
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
