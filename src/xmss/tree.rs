//! Per-tree machinery: leaf construction (WOTS+ public key through an
//! L-tree), the XMSS hash framing for the shared traversal engine, and the
//! reduced private-key wire form carrying the traversal state.

use zeroize::Zeroize;

use crate::error::{Error, Result};
use crate::merkle::{NodeStack, Traversal, TreeHash};
use crate::xmss::address::{Adrs, ADDR_TYPE_HASHTREE, ADDR_TYPE_LTREE, ADDR_TYPE_OTS};
use crate::xmss::hash::{ots_seed, rand_hash};
use crate::xmss::params::{WotsAlgorithm, XmssAlgorithm};
use crate::xmss::wots;

/// Compresses a WOTS+ public-key vector to a single `n`-byte leaf by
/// pairwise randomized hashing, promoting the odd element of each round.
pub(crate) fn ltree(
    alg: WotsAlgorithm,
    wpk: &mut Vec<Vec<u8>>,
    seed: &[u8],
    adrs: &mut Adrs,
) -> Vec<u8> {
    let family = alg.hash();
    let mut l = alg.len();
    let mut height = 0u32;
    adrs.set_tree_height(0);
    while l > 1 {
        for i in 0..l / 2 {
            adrs.set_tree_index(i as u32);
            wpk[i] = rand_hash(family, &wpk[2 * i].clone(), &wpk[2 * i + 1].clone(), seed, adrs);
        }
        if l & 1 == 1 {
            wpk[l / 2] = wpk[l - 1].clone();
        }
        l = l.div_ceil(2);
        height += 1;
        adrs.set_tree_height(height);
    }
    adrs.set_tree_height(0);
    adrs.set_tree_index(0);
    adrs.set_ltree(0);
    wpk[0].clone()
}

/// The XMSS hash framing for the shared traversal engine: leaves are WOTS+
/// public keys folded through an L-tree, interior nodes use `rand_hash` at a
/// `HASHTREE` address.
pub(crate) struct XmssTreeHash<'a> {
    pub alg: XmssAlgorithm,
    pub skseed: &'a [u8],
    pub seed: &'a [u8],
    pub layer: u32,
    pub idx_tree: u64,
}

impl XmssTreeHash<'_> {
    fn base_adrs(&self, type_val: u32) -> Adrs {
        let mut adrs = Adrs::new();
        adrs.set_layer(self.layer);
        adrs.set_tree(self.idx_tree);
        adrs.set_type(type_val);
        adrs
    }
}

impl TreeHash for XmssTreeHash<'_> {
    fn leaf(&self, leaf: u32) -> Vec<u8> {
        let wots_alg = self.alg.wots();
        let mut adrs = self.base_adrs(ADDR_TYPE_OTS);
        adrs.set_ots(leaf);
        let mut leaf_seed = ots_seed(self.alg.hash(), self.skseed, &mut adrs);
        let mut sk = wots::expand_sk(wots_alg, &leaf_seed);
        let mut wpk = wots::pk_gen(wots_alg, &sk, self.seed, &mut adrs);
        leaf_seed.zeroize();
        for x in &mut sk {
            x.zeroize();
        }
        adrs.set_type(ADDR_TYPE_LTREE);
        adrs.set_ltree(leaf);
        ltree(wots_alg, &mut wpk, self.seed, &mut adrs)
    }

    fn combine(&self, child_height: u32, parent_idx: u32, left: &[u8], right: &[u8]) -> Vec<u8> {
        let mut adrs = self.base_adrs(ADDR_TYPE_HASHTREE);
        adrs.set_tree_height(child_height);
        adrs.set_tree_index(parent_idx);
        rand_hash(self.alg.hash(), left, right, self.seed, &mut adrs)
    }
}

/// One XMSS tree at a `(layer, idx_tree)` address, with its traversal state
/// and its own copies of the seeds.
pub(crate) struct XmssTree {
    pub alg: XmssAlgorithm,
    pub layer: u32,
    pub idx_tree: u64,
    pub skseed: Vec<u8>,
    pub seed: Vec<u8>,
    pub state: Traversal,
}

impl XmssTree {
    /// Builds the tree at the given address with one full sweep.
    pub fn generate(
        alg: XmssAlgorithm,
        skseed: &[u8],
        seed: &[u8],
        layer: u32,
        idx_tree: u64,
    ) -> Self {
        let th = XmssTreeHash {
            alg,
            skseed,
            seed,
            layer,
            idx_tree,
        };
        let state = Traversal::generate(alg.h(), &th);
        XmssTree {
            alg,
            layer,
            idx_tree,
            skseed: skseed.to_vec(),
            seed: seed.to_vec(),
            state,
        }
    }

    /// The next unused leaf index within this tree.
    pub fn idx(&self) -> u32 {
        self.state.leaf()
    }

    pub fn root(&self) -> &[u8] {
        self.state.root()
    }

    pub fn is_exhausted(&self) -> bool {
        self.idx() >= self.alg.leaves()
    }

    /// Signs an `n`-byte value with the current leaf's WOTS+ key, returns
    /// the signature and the authentication path, and advances the state.
    pub fn tree_sig(&mut self, message: &[u8]) -> (Vec<Vec<u8>>, Vec<Vec<u8>>) {
        let wots_alg = self.alg.wots();
        let mut adrs = Adrs::new();
        adrs.set_layer(self.layer);
        adrs.set_tree(self.idx_tree);
        adrs.set_type(ADDR_TYPE_OTS);
        adrs.set_ots(self.idx());
        let mut leaf_seed = ots_seed(self.alg.hash(), &self.skseed, &mut adrs);
        let wots_sig = wots::sign(wots_alg, message, &leaf_seed, &self.seed, &mut adrs);
        leaf_seed.zeroize();
        let auth = self.state.auth_path().to_vec();

        let th = XmssTreeHash {
            alg: self.alg,
            skseed: &self.skseed,
            seed: &self.seed,
            layer: self.layer,
            idx_tree: self.idx_tree,
        };
        self.state.advance(&th);
        (wots_sig, auth)
    }

    /// The reduced wire form:
    /// `u32(idx) || u32(idxtree) || root || auth_path || stacks`.
    pub fn reduced_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&self.idx().to_be_bytes());
        out.extend_from_slice(&(self.idx_tree as u32).to_be_bytes());
        out.extend_from_slice(self.state.root());
        for node in self.state.auth_path() {
            out.extend_from_slice(node);
        }
        for stack in self.state.stacks() {
            let bytes = stack.to_bytes();
            out.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
            out.extend_from_slice(&bytes);
        }
        out
    }

    /// Parses the leading reduced form off `bytes`, returning the rest.
    pub fn split_parse_reduced<'a>(
        alg: XmssAlgorithm,
        layer: u32,
        skseed: &[u8],
        seed: &[u8],
        bytes: &'a [u8],
    ) -> Result<(Self, &'a [u8])> {
        let n = alg.n();
        let h = alg.h() as usize;
        if bytes.len() < 8 + n + n * h {
            return Err(Error::Parse("XMSS traversal state"));
        }
        let idx = u32::from_be_bytes(bytes[..4].try_into().expect("ok"));
        let idx_tree = u64::from(u32::from_be_bytes(bytes[4..8].try_into().expect("ok")));
        let root = bytes[8..8 + n].to_vec();
        let mut rest = &bytes[8 + n..];
        let auth: Vec<Vec<u8>> = rest[..n * h].chunks_exact(n).map(<[u8]>::to_vec).collect();
        rest = &rest[n * h..];

        let mut stacks = Vec::with_capacity(h);
        for level in 0..h {
            if rest.len() < 4 {
                return Err(Error::Parse("XMSS traversal state"));
            }
            let stack_len = u32::from_be_bytes(rest[..4].try_into().expect("ok")) as usize;
            rest = &rest[4..];
            if rest.len() < stack_len {
                return Err(Error::Parse("XMSS traversal state"));
            }
            let stack = NodeStack::parse(&rest[..stack_len], n)?;
            if stack.target != level as u32 {
                return Err(Error::Parse("XMSS traversal state"));
            }
            stacks.push(stack);
            rest = &rest[stack_len..];
        }

        let state = Traversal::from_parts(alg.h(), idx, root, auth, stacks)?;
        Ok((
            XmssTree {
                alg,
                layer,
                idx_tree,
                skseed: skseed.to_vec(),
                seed: seed.to_vec(),
                state,
            },
            rest,
        ))
    }
}

impl Drop for XmssTree {
    fn drop(&mut self) {
        self.skseed.zeroize();
    }
}

/// Recomputes the tree root implied by a WOTS+ signature, a leaf index and
/// an authentication path; `adrs` carries the layer and tree address.
pub(crate) fn root_from_sig(
    alg: XmssAlgorithm,
    message: &[u8],
    wots_sig: &[Vec<u8>],
    auth: &[Vec<u8>],
    seed: &[u8],
    leaf_idx: u32,
    adrs: &mut Adrs,
) -> Vec<u8> {
    let wots_alg = alg.wots();
    adrs.set_type(ADDR_TYPE_OTS);
    adrs.set_ots(leaf_idx);
    let mut wpk = wots::pk_from_sig(wots_alg, message, wots_sig, seed, adrs);
    adrs.set_type(ADDR_TYPE_LTREE);
    adrs.set_ltree(leaf_idx);
    let mut node = ltree(wots_alg, &mut wpk, seed, adrs);

    adrs.set_type(ADDR_TYPE_HASHTREE);
    let mut tree_idx = leaf_idx;
    for (k, sibling) in auth.iter().enumerate() {
        adrs.set_tree_height(k as u32);
        let odd = tree_idx & 1 == 1;
        tree_idx >>= 1;
        adrs.set_tree_index(tree_idx);
        node = if odd {
            rand_hash(alg.hash(), sibling, &node, seed, adrs)
        } else {
            rand_hash(alg.hash(), &node, sibling, seed, adrs)
        };
    }
    node
}
