use crate::ts_interface::{PeerId, PieceIndex, StepIndex};
use crate::ts_peer::Peer;
use crate::ts_rarity::PieceRarityTracker;
use indexmap::IndexMap;
use log::debug;

// ============================================================================
// Piece Transfer Engine
// ============================================================================

/// Moves pieces from an unchoking uploader to its chosen recipients.
///
/// Recipients are served sequentially, closest-to-completion first, each
/// pass bounded by the recipient's remaining download budget and by the
/// uploader's remaining upload budget for the whole step. An uploader can
/// therefore exhaust its budget on early recipients and starve later ones
/// in the same step; that contention is part of the model.
#[derive(Debug, Clone)]
pub struct PieceTransferEngine {
    piece_count: usize,
}

impl PieceTransferEngine {
    pub fn new(piece_count: usize) -> Self {
        Self { piece_count }
    }

    /// Transfer pieces from `uploader_id` to each peer in `chosen`,
    /// rarest-first, updating rarity counts, bandwidth counters and the
    /// recipient's seeder state as pieces land.
    pub fn share_pieces(
        &self,
        peers: &mut IndexMap<PeerId, Peer>,
        rarity: &mut PieceRarityTracker,
        uploader_id: PeerId,
        chosen: &[PeerId],
        step: StepIndex,
    ) {
        // Recipients closest to completion are served first
        let mut order: Vec<(PeerId, usize)> = chosen
            .iter()
            .filter_map(|id| peers.get(id).map(|p| (*id, p.pieces.len())))
            .collect();
        order.sort_by(|a, b| b.1.cmp(&a.1));

        for (recipient_id, _) in order {
            let Some(uploader) = peers.get(&uploader_id) else {
                return;
            };
            if uploader.remaining_upload_budget() == 0 {
                continue;
            }
            let Some(recipient) = peers.get(&recipient_id) else {
                continue;
            };

            // Pieces the uploader can offer, rarest first; the index
            // tiebreak keeps the order total, so runs replay exactly
            let mut candidates: Vec<PieceIndex> = uploader
                .pieces
                .difference(&recipient.pieces)
                .copied()
                .collect();
            candidates.sort_by_key(|&piece| (rarity.rarity_of(piece), piece));

            let budget = uploader
                .remaining_upload_budget()
                .min(recipient.remaining_download_budget()) as usize;
            let count = candidates.len().min(budget);

            for &piece in candidates.iter().take(count) {
                rarity.record_transfer(piece);

                if let Some(recipient) = peers.get_mut(&recipient_id) {
                    recipient.pieces.insert(piece);
                    recipient.download_count_step += 1;
                    recipient.downloaded_pieces_total += 1;

                    // Promotion happens immediately, mid-pass
                    if recipient.pieces.len() == self.piece_count && !recipient.is_seeder {
                        recipient.is_seeder = true;
                        recipient.completed_step = Some(step);
                        debug!("peer {} became a seeder at step {}", recipient_id, step);
                    }
                }
                if let Some(uploader) = peers.get_mut(&uploader_id) {
                    uploader.upload_count_step += 1;
                    uploader.uploaded_pieces_total += 1;
                }
            }
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ts_interface::SwarmConfig;
    use crate::ts_network::TorrentNetwork;

    fn small_config(piece_count: usize) -> SwarmConfig {
        SwarmConfig {
            piece_count,
            max_download_bandwidth: 8,
            ..Default::default()
        }
    }

    fn swarm(piece_count: usize, peers: Vec<Peer>) -> TorrentNetwork {
        TorrentNetwork::from_peers(peers, piece_count)
    }

    #[test]
    fn test_transfer_respects_upload_budget() {
        let config = small_config(6);
        let mut network = swarm(
            6,
            vec![
                Peer::new_seeder(1, 200, &config), // upload budget 2
                Peer::new(2, 400, &config),
            ],
        );
        let engine = PieceTransferEngine::new(6);

        engine.share_pieces(&mut network.peers, &mut network.rarity, 1, &[2], 0);

        let uploader = &network.peers[&1];
        let recipient = &network.peers[&2];
        assert_eq!(uploader.upload_count_step, 2);
        assert_eq!(uploader.uploaded_pieces_total, 2);
        assert_eq!(recipient.pieces.len(), 2);
        assert_eq!(recipient.download_count_step, 2);
        assert!(!recipient.is_seeder);
    }

    #[test]
    fn test_transfer_respects_download_budget() {
        let mut config = small_config(6);
        config.max_download_bandwidth = 3;
        let mut network = swarm(
            6,
            vec![
                Peer::new_seeder(1, 700, &config), // budget 7, more than needed
                Peer::new(2, 400, &config),
            ],
        );
        let engine = PieceTransferEngine::new(6);

        engine.share_pieces(&mut network.peers, &mut network.rarity, 1, &[2], 0);

        let recipient = &network.peers[&2];
        assert_eq!(recipient.pieces.len(), 3);
        assert_eq!(recipient.download_count_step, 3);
        assert_eq!(network.peers[&1].upload_count_step, 3);
    }

    #[test]
    fn test_rarest_pieces_move_first() {
        let mut config = small_config(4);
        config.max_download_bandwidth = 1;
        let mut network = swarm(
            4,
            vec![
                Peer::new_seeder(1, 800, &config),
                Peer::new(2, 400, &config),
            ],
        );
        // Pieces 0 and 1 are already widespread; 2 and 3 tie as rarest
        network.rarity.record_transfer(0);
        network.rarity.record_transfer(0);
        network.rarity.record_transfer(1);
        let engine = PieceTransferEngine::new(4);

        engine.share_pieces(&mut network.peers, &mut network.rarity, 1, &[2], 0);

        // Tie between 2 and 3 resolves to the lower index
        let recipient = &network.peers[&2];
        assert_eq!(recipient.pieces.len(), 1);
        assert!(recipient.pieces.contains(&2));
        assert_eq!(network.rarity.rarity_of(2), 2);
    }

    #[test]
    fn test_promotion_happens_mid_pass() {
        let config = small_config(4);
        let mut network = swarm(
            4,
            vec![
                Peer::new_seeder(1, 800, &config),
                Peer::new(2, 400, &config),
            ],
        );
        // One piece short of completion
        {
            let recipient = network.peers.get_mut(&2).unwrap();
            recipient.pieces.extend([0, 1, 2]);
        }
        let engine = PieceTransferEngine::new(4);

        engine.share_pieces(&mut network.peers, &mut network.rarity, 1, &[2], 17);

        let recipient = &network.peers[&2];
        assert!(recipient.is_seeder);
        assert_eq!(recipient.completed_step, Some(17));
        assert_eq!(recipient.pieces.len(), 4);
        // Exactly the one missing piece moved
        assert_eq!(recipient.download_count_step, 1);
    }

    #[test]
    fn test_budget_is_shared_across_recipients() {
        let config = small_config(4);
        let mut network = swarm(
            4,
            vec![
                Peer::new_seeder(1, 400, &config), // budget 4
                Peer::new(2, 400, &config),
                Peer::new(3, 400, &config),
            ],
        );
        // Recipient 2 is closer to completion and gets served first
        network.peers.get_mut(&2).unwrap().pieces.insert(0);
        let engine = PieceTransferEngine::new(4);

        engine.share_pieces(&mut network.peers, &mut network.rarity, 1, &[3, 2], 0);

        // 3 pieces complete peer 2, the last budget unit goes to peer 3
        let first = &network.peers[&2];
        let second = &network.peers[&3];
        assert!(first.is_seeder);
        assert_eq!(first.completed_step, Some(0));
        assert_eq!(second.pieces.len(), 1);
        assert_eq!(network.peers[&1].upload_count_step, 4);
    }

    #[test]
    fn test_upload_and_download_totals_balance() {
        let config = small_config(8);
        let mut network = swarm(
            8,
            vec![
                Peer::new_seeder(1, 500, &config),
                Peer::new(2, 300, &config),
                Peer::new(3, 300, &config),
            ],
        );
        let engine = PieceTransferEngine::new(8);

        engine.share_pieces(&mut network.peers, &mut network.rarity, 1, &[2, 3], 0);

        let uploaded: u64 = network.peers.values().map(|p| p.uploaded_pieces_total).sum();
        let downloaded: u64 = network
            .peers
            .values()
            .map(|p| p.downloaded_pieces_total)
            .sum();
        assert!(uploaded > 0);
        assert_eq!(uploaded, downloaded);
    }

    #[test]
    fn test_duplicate_recipient_is_a_noop() {
        let config = small_config(4);
        let mut network = swarm(
            4,
            vec![
                Peer::new_seeder(1, 800, &config),
                Peer::new(2, 400, &config),
            ],
        );
        let engine = PieceTransferEngine::new(4);

        // An optimistic pick can duplicate a ranked recipient; the second
        // pass finds no missing pieces
        engine.share_pieces(&mut network.peers, &mut network.rarity, 1, &[2, 2], 0);

        let recipient = &network.peers[&2];
        assert_eq!(recipient.pieces.len(), 4);
        assert_eq!(recipient.download_count_step, 4);
        assert_eq!(network.peers[&1].upload_count_step, 4);
    }
}
