use digest::Digest;
use sha2::Sha256;

use crate::constants::{D_INTR, D_LEAF, HASH_LEN};
use crate::lmots;
use crate::lms::modes::LmsAlgorithm;
use crate::merkle::TreeHash;
use crate::types::Identifier;

/// The LMS hash framing of tree nodes (RFC 8554 section 5.3).
///
/// Leaves and interior nodes are numbered as in the RFC: leaf `i` is node
/// `2^h + i` and the parent of node `r` is node `r / 2`.
pub(crate) struct LmsTreeHash<'a> {
    pub lms: LmsAlgorithm,
    pub ots: lmots::LmsOtsAlgorithm,
    pub id: &'a Identifier,
    pub seed: &'a [u8; HASH_LEN],
}

impl TreeHash for LmsTreeHash<'_> {
    fn leaf(&self, leaf: u32) -> Vec<u8> {
        let ots_pub = lmots::SigningKey::from_seed(self.ots, leaf, *self.id, *self.seed).public();
        let node_num = self.lms.leaves() + leaf;
        Sha256::new()
            .chain_update(self.id)
            .chain_update(node_num.to_be_bytes())
            .chain_update(D_LEAF)
            .chain_update(ots_pub.k())
            .finalize()
            .to_vec()
    }

    fn combine(&self, child_height: u32, parent_idx: u32, left: &[u8], right: &[u8]) -> Vec<u8> {
        let node_num = (1u32 << (self.lms.h() - child_height - 1)) + parent_idx;
        Sha256::new()
            .chain_update(self.id)
            .chain_update(node_num.to_be_bytes())
            .chain_update(D_INTR)
            .chain_update(left)
            .chain_update(right)
            .finalize()
            .to_vec()
    }
}
