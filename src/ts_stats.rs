use crate::ts_interface::SwarmConfig;
use crate::ts_runner::{RunResult, SwarmOutcome};

/// Width of one upload-rate bucket in the summary report.
const RATE_BUCKET_WIDTH: u32 = 100;

// ============================================================================
// Aggregated Statistics
// ============================================================================

/// One upload-rate bucket of the completion summary.
#[derive(Debug, Clone)]
pub struct RateBucket {
    pub rate_min: u32,
    pub rate_max: u32,

    /// Peers whose final upload rate fell in this bucket
    pub peers: usize,

    /// How many of them completed during the run
    pub completed: usize,

    /// Average completion step over completed peers only
    pub avg_completion_step: Option<f64>,
}

/// Display-only aggregation over a finished run: completion steps bucketed
/// by upload rate, grand transfer totals, and the median per-peer share
/// ratio. Not part of the simulated protocol.
#[derive(Debug, Clone)]
pub struct SwarmStatistics {
    pub buckets: Vec<RateBucket>,

    /// Peers whose jittered rate left the configured bucket range
    pub outside_range: usize,

    /// Peers that never completed (absent completion step)
    pub unconverged: usize,

    pub total_uploaded: u64,
    pub total_downloaded: u64,

    /// Median over all peers of uploaded / (downloaded + 1); the offset
    /// keeps pure seeders finite
    pub median_share_ratio: f64,
}

impl SwarmStatistics {
    pub fn collect(result: &RunResult, config: &SwarmConfig) -> Self {
        let mut buckets: Vec<RateBucket> = (config.upload_rate_min..config.upload_rate_max)
            .step_by(RATE_BUCKET_WIDTH as usize)
            .map(|lo| RateBucket {
                rate_min: lo,
                rate_max: (lo + RATE_BUCKET_WIDTH).min(config.upload_rate_max),
                peers: 0,
                completed: 0,
                avg_completion_step: None,
            })
            .collect();

        let mut completion_sums = vec![0u64; buckets.len()];
        let mut outside_range = 0;
        let mut unconverged = 0;
        let mut total_uploaded = 0u64;
        let mut total_downloaded = 0u64;
        let mut ratios: Vec<f64> = Vec::with_capacity(result.peers.len());

        for peer in &result.peers {
            total_uploaded += peer.uploaded_pieces;
            total_downloaded += peer.downloaded_pieces;
            ratios.push(peer.uploaded_pieces as f64 / (peer.downloaded_pieces + 1) as f64);

            if peer.completed_step.is_none() {
                unconverged += 1;
            }

            let in_range =
                peer.upload_rate >= config.upload_rate_min && peer.upload_rate < config.upload_rate_max;
            if !in_range {
                outside_range += 1;
                continue;
            }
            let index = ((peer.upload_rate - config.upload_rate_min) / RATE_BUCKET_WIDTH) as usize;
            buckets[index].peers += 1;
            if let Some(step) = peer.completed_step {
                buckets[index].completed += 1;
                completion_sums[index] += step;
            }
        }

        for (bucket, sum) in buckets.iter_mut().zip(completion_sums) {
            if bucket.completed > 0 {
                bucket.avg_completion_step = Some(sum as f64 / bucket.completed as f64);
            }
        }

        Self {
            buckets,
            outside_range,
            unconverged,
            total_uploaded,
            total_downloaded,
            median_share_ratio: median(ratios),
        }
    }

    /// Print the human-readable report: bucket table with a bar histogram
    /// of average completion steps, then the grand totals.
    pub fn print_report(&self, result: &RunResult) {
        println!("\n╔════════════════════════════════════════════════════════╗");
        println!("║  SWARM SUMMARY                                         ║");
        println!("╚════════════════════════════════════════════════════════╝\n");

        match result.outcome {
            SwarmOutcome::Converged => {
                println!("Converged after {} steps", result.steps_executed)
            }
            SwarmOutcome::Aborted => println!(
                "Aborted after {} steps ({} peers unconverged)",
                result.steps_executed, self.unconverged
            ),
        }

        println!("\nAverage completion step by upload rate:");
        let scale = self
            .buckets
            .iter()
            .filter_map(|b| b.avg_completion_step)
            .fold(0.0f64, f64::max);
        for bucket in &self.buckets {
            if bucket.peers == 0 {
                continue;
            }
            match bucket.avg_completion_step {
                Some(avg) => {
                    let width = if scale > 0.0 {
                        ((avg / scale) * 40.0).round() as usize
                    } else {
                        0
                    };
                    println!(
                        "  {:>4}-{:<4} | {:<40} {:>8.1}  ({} peers)",
                        bucket.rate_min,
                        bucket.rate_max,
                        "#".repeat(width.max(1)),
                        avg,
                        bucket.peers
                    );
                }
                None => println!(
                    "  {:>4}-{:<4} | {:<40} {:>8}  ({} peers)",
                    bucket.rate_min, bucket.rate_max, "", "n/a", bucket.peers
                ),
            }
        }
        if self.outside_range > 0 {
            println!("  {} peers drifted outside the rate range", self.outside_range);
        }

        println!("\nTotal uploaded pieces:   {}", self.total_uploaded);
        println!("Total downloaded pieces: {}", self.total_downloaded);
        println!(
            "Median upload/download ratio: {:.3}",
            self.median_share_ratio
        );
    }
}

/// Median of an unordered sample; midpoint average for even lengths.
fn median(mut values: Vec<f64>) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) / 2.0
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ts_runner::PeerSummary;

    fn peer(
        id: u64,
        rate: u32,
        completed: Option<u64>,
        uploaded: u64,
        downloaded: u64,
    ) -> PeerSummary {
        PeerSummary {
            peer_id: id,
            upload_rate: rate,
            completed_step: completed,
            uploaded_pieces: uploaded,
            downloaded_pieces: downloaded,
        }
    }

    fn result(peers: Vec<PeerSummary>) -> RunResult {
        RunResult {
            outcome: SwarmOutcome::Converged,
            steps_executed: 10,
            seed_used: [0u8; 32],
            peers,
        }
    }

    #[test]
    fn test_bucket_layout_spans_rate_range() {
        let config = SwarmConfig::default();
        let stats = SwarmStatistics::collect(&result(vec![]), &config);

        assert_eq!(stats.buckets.len(), 7);
        assert_eq!(stats.buckets[0].rate_min, 100);
        assert_eq!(stats.buckets[0].rate_max, 200);
        assert_eq!(stats.buckets[6].rate_min, 700);
        assert_eq!(stats.buckets[6].rate_max, 800);
    }

    #[test]
    fn test_bucket_averages_exclude_unconverged() {
        let config = SwarmConfig::default();
        let stats = SwarmStatistics::collect(
            &result(vec![
                peer(1, 150, Some(10), 0, 0),
                peer(2, 160, Some(20), 0, 0),
                peer(3, 170, None, 0, 0),
            ]),
            &config,
        );

        let bucket = &stats.buckets[0];
        assert_eq!(bucket.peers, 3);
        assert_eq!(bucket.completed, 2);
        assert_eq!(bucket.avg_completion_step, Some(15.0));
        assert_eq!(stats.unconverged, 1);
    }

    #[test]
    fn test_peers_outside_range_are_counted_not_bucketed() {
        let config = SwarmConfig::default();
        let stats = SwarmStatistics::collect(
            &result(vec![
                peer(1, 950, Some(5), 0, 0),
                peer(2, 450, Some(5), 0, 0),
            ]),
            &config,
        );

        assert_eq!(stats.outside_range, 1);
        let bucketed: usize = stats.buckets.iter().map(|b| b.peers).sum();
        assert_eq!(bucketed, 1);
    }

    #[test]
    fn test_totals_sum_all_peers() {
        let config = SwarmConfig::default();
        let stats = SwarmStatistics::collect(
            &result(vec![
                peer(1, 200, None, 50, 0),
                peer(2, 300, Some(4), 30, 40),
                peer(3, 400, Some(6), 0, 40),
            ]),
            &config,
        );

        assert_eq!(stats.total_uploaded, 80);
        assert_eq!(stats.total_downloaded, 80);
    }

    #[test]
    fn test_median_ratio_uses_offset_denominator() {
        let config = SwarmConfig::default();
        // Ratios: 4/(1+1)=2.0, 0/(3+1)=0.0, 6/(2+1)=2.0
        let stats = SwarmStatistics::collect(
            &result(vec![
                peer(1, 200, Some(1), 4, 1),
                peer(2, 300, Some(1), 0, 3),
                peer(3, 400, Some(1), 6, 2),
            ]),
            &config,
        );

        assert_eq!(stats.median_share_ratio, 2.0);
    }

    #[test]
    fn test_median_midpoint_for_even_counts() {
        // Ratios: 1.0 and 3.0 -> midpoint 2.0
        let config = SwarmConfig::default();
        let stats = SwarmStatistics::collect(
            &result(vec![
                peer(1, 200, Some(1), 2, 1),
                peer(2, 300, Some(1), 3, 0),
            ]),
            &config,
        );

        assert_eq!(stats.median_share_ratio, 2.0);
    }

    #[test]
    fn test_median_of_empty_sample() {
        assert_eq!(median(vec![]), 0.0);
    }
}
