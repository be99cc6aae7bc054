//! Authentication-path maintenance for sequential Merkle-tree signing.
//!
//! Both signature families share the same traversal machinery: one stack per
//! tree level builds the next node needed on that level while the current
//! authentication path is served from precomputed nodes. The families differ
//! only in how a leaf is produced and how two siblings are combined, which is
//! captured by the [`TreeHash`] seam.

use crate::error::{Error, Result};

/// Leaf generation and sibling combination for one concrete tree.
///
/// `combine` receives the height of the two children and the index of the
/// resulting parent node within its level.
pub(crate) trait TreeHash {
    fn leaf(&self, leaf: u32) -> Vec<u8>;
    fn combine(&self, child_height: u32, parent_idx: u32, left: &[u8], right: &[u8]) -> Vec<u8>;
}

/// A single tree node held by a traversal stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Node {
    pub height: u32,
    pub idx: u32,
    pub content: Vec<u8>,
}

impl Node {
    /// Wire form: `u32(height) || u32(idx) || content`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(8 + self.content.len());
        out.extend_from_slice(&self.height.to_be_bytes());
        out.extend_from_slice(&self.idx.to_be_bytes());
        out.extend_from_slice(&self.content);
        out
    }

    fn parse(bytes: &[u8], n: usize) -> Result<Self> {
        if bytes.len() != 8 + n {
            return Err(Error::Parse("traversal node"));
        }
        Ok(Node {
            height: u32::from_be_bytes(bytes[..4].try_into().expect("4-byte slice")),
            idx: u32::from_be_bytes(bytes[4..8].try_into().expect("4-byte slice")),
            content: bytes[8..].to_vec(),
        })
    }
}

/// A treehash stack working towards one node of height `target`.
///
/// `leaf_idx` is the index of the next leaf this stack will consume.
#[derive(Clone, Debug)]
pub(crate) struct NodeStack {
    nodes: Vec<Node>,
    pub target: u32,
    pub leaf_idx: u32,
}

impl NodeStack {
    pub fn new(target: u32, leaf_idx: u32) -> Self {
        NodeStack {
            nodes: Vec::new(),
            target,
            leaf_idx,
        }
    }

    /// Drops all nodes and retargets the stack at a new starting leaf.
    pub fn reset(&mut self, leaf_idx: u32, target: u32) {
        self.leaf_idx = leaf_idx;
        self.target = target;
        self.nodes.clear();
    }

    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub fn top(&self) -> Option<&Node> {
        self.nodes.last()
    }

    fn is_complete(&self) -> bool {
        self.nodes
            .last()
            .is_some_and(|node| node.height == self.target)
    }

    /// The scheduling priority of this stack: the lowest height it still has
    /// in flight, its target if it is empty, or `u32::MAX` once its node is
    /// complete.
    pub fn low(&self) -> u32 {
        if self.nodes.is_empty() {
            return self.target;
        }
        if self.is_complete() {
            return u32::MAX;
        }
        self.nodes
            .iter()
            .map(|node| node.height)
            .min()
            .expect("stack is non-empty")
    }

    /// Runs `steps` unit updates: either the next leaf is generated or the
    /// two equal-height top nodes are combined into their parent.
    pub fn update(&mut self, steps: usize, th: &dyn TreeHash) {
        if self.is_complete() {
            return;
        }
        for _ in 0..steps {
            let len = self.nodes.len();
            if len >= 2 && self.nodes[len - 2].height == self.nodes[len - 1].height {
                let right = self.nodes.pop().expect("two nodes present");
                let left = self.nodes.pop().expect("two nodes present");
                let idx = right.idx >> 1;
                let height = right.height + 1;
                let content = th.combine(right.height, idx, &left.content, &right.content);
                self.push(Node {
                    height,
                    idx,
                    content,
                });
                continue;
            }
            let content = th.leaf(self.leaf_idx);
            self.push(Node {
                height: 0,
                idx: self.leaf_idx,
                content,
            });
            self.leaf_idx += 1;
        }
    }

    /// Wire form: `u32(count) || u32(target) || u32(leaf_idx) || nodes`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&(self.nodes.len() as u32).to_be_bytes());
        out.extend_from_slice(&self.target.to_be_bytes());
        out.extend_from_slice(&self.leaf_idx.to_be_bytes());
        for node in &self.nodes {
            out.extend_from_slice(&node.to_bytes());
        }
        out
    }

    pub fn parse(bytes: &[u8], n: usize) -> Result<Self> {
        if bytes.len() < 12 {
            return Err(Error::Parse("traversal stack"));
        }
        let count = u32::from_be_bytes(bytes[..4].try_into().expect("4-byte slice")) as usize;
        let target = u32::from_be_bytes(bytes[4..8].try_into().expect("4-byte slice"));
        let leaf_idx = u32::from_be_bytes(bytes[8..12].try_into().expect("4-byte slice"));
        let node_len = 8 + n;
        if bytes.len() - 12 != count * node_len {
            return Err(Error::Parse("traversal stack"));
        }
        let mut nodes = Vec::with_capacity(count);
        for chunk in bytes[12..].chunks_exact(node_len) {
            let node = Node::parse(chunk, n)?;
            if node.height > target {
                return Err(Error::Parse("traversal stack"));
            }
            nodes.push(node);
        }
        Ok(NodeStack {
            nodes,
            target,
            leaf_idx,
        })
    }
}

/// The per-tree signing state: the leaf counter, the root, the current
/// authentication path and one treehash stack per level.
#[derive(Clone, Debug)]
pub(crate) struct Traversal {
    height: u32,
    leaf: u32,
    root: Vec<u8>,
    auth: Vec<Vec<u8>>,
    stacks: Vec<NodeStack>,
}

impl Traversal {
    /// Builds the whole tree once, recording the root, the authentication
    /// path of leaf 0 and the initial stack contents.
    pub fn generate(height: u32, th: &dyn TreeHash) -> Self {
        let mut main = NodeStack::new(height, 0);
        let mut stacks = Vec::with_capacity(height as usize);
        let mut auth = Vec::with_capacity(height as usize);
        for level in 0..height {
            main.update(1, th);
            let mut stack = NodeStack::new(level, 1 << level);
            stack.push(main.top().expect("node just produced").clone());
            stacks.push(stack);
            main.update((1usize << (level + 1)) - 1, th);
            auth.push(main.top().expect("sibling just produced").content.clone());
        }
        main.update(1, th);
        let root = main.top().expect("root just produced").content.clone();
        Traversal {
            height,
            leaf: 0,
            root,
            auth,
            stacks,
        }
    }

    /// Reassembles a traversal from its parsed wire components.
    pub fn from_parts(
        height: u32,
        leaf: u32,
        root: Vec<u8>,
        auth: Vec<Vec<u8>>,
        stacks: Vec<NodeStack>,
    ) -> Result<Self> {
        if leaf > 1 << height {
            return Err(Error::Parse("leaf counter out of range"));
        }
        if auth.len() != height as usize || stacks.len() != height as usize {
            return Err(Error::Parse("traversal state"));
        }
        Ok(Traversal {
            height,
            leaf,
            root,
            auth,
            stacks,
        })
    }

    /// The next unused leaf index (the counter `q`).
    pub fn leaf(&self) -> u32 {
        self.leaf
    }

    pub fn capacity(&self) -> u32 {
        1 << self.height
    }

    pub fn root(&self) -> &[u8] {
        &self.root
    }

    /// The authentication path for the current leaf, one node per level.
    pub fn auth_path(&self) -> &[Vec<u8>] {
        &self.auth
    }

    pub fn stacks(&self) -> &[NodeStack] {
        &self.stacks
    }

    /// Consumes the current leaf: rolls the authentication path towards the
    /// next one and schedules `2h - 1` unit updates across the stacks.
    ///
    /// The final leaf only bumps the counter; there is no next path to build.
    pub fn advance(&mut self, th: &dyn TreeHash) {
        if self.leaf + 1 == self.capacity() {
            self.leaf += 1;
            return;
        }
        self.refresh();
        self.build(th);
        self.leaf += 1;
    }

    fn refresh(&mut self) {
        for level in 0..self.height {
            if (self.leaf + 1) % (1u32 << level) == 0 {
                let node = self.stacks[level as usize]
                    .top()
                    .expect("scheduled node is complete");
                self.auth[level as usize] = node.content.clone();
                let start = ((self.leaf + 1) + (1 << level)) ^ (1 << level);
                self.stacks[level as usize].reset(start, level);
            }
        }
    }

    fn build(&mut self, th: &dyn TreeHash) {
        for _ in 0..(2 * self.height - 1) {
            let mut focus = 0;
            let mut min = u32::MAX;
            for (i, stack) in self.stacks.iter().enumerate() {
                let low = stack.low();
                if low < min {
                    min = low;
                    focus = i;
                }
            }
            self.stacks[focus].update(1, th);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha2::{Digest, Sha256};

    /// An unkeyed toy framing, enough to exercise the traversal schedule.
    struct PlainHash;

    impl TreeHash for PlainHash {
        fn leaf(&self, leaf: u32) -> Vec<u8> {
            Sha256::digest(leaf.to_be_bytes()).to_vec()
        }

        fn combine(&self, _child_height: u32, _parent_idx: u32, l: &[u8], r: &[u8]) -> Vec<u8> {
            Sha256::new()
                .chain_update(l)
                .chain_update(r)
                .finalize()
                .to_vec()
        }
    }

    fn full_tree(height: u32) -> Vec<Vec<Vec<u8>>> {
        let th = PlainHash;
        let mut levels = vec![
            (0..1u32 << height)
                .map(|i| th.leaf(i))
                .collect::<Vec<_>>(),
        ];
        for _ in 0..height {
            let below = levels.last().unwrap();
            let above = below
                .chunks(2)
                .map(|pair| th.combine(0, 0, &pair[0], &pair[1]))
                .collect();
            levels.push(above);
        }
        levels
    }

    fn reference_auth_path(levels: &[Vec<Vec<u8>>], height: u32, leaf: u32) -> Vec<Vec<u8>> {
        (0..height)
            .map(|k| levels[k as usize][((leaf >> k) ^ 1) as usize].clone())
            .collect()
    }

    #[test]
    fn traversal_matches_reference_paths() {
        for height in [2u32, 3, 4, 5] {
            let th = PlainHash;
            let levels = full_tree(height);
            let mut trav = Traversal::generate(height, &th);
            assert_eq!(trav.root(), &levels[height as usize][0][..]);
            for leaf in 0..(1u32 << height) {
                assert_eq!(trav.leaf(), leaf);
                assert_eq!(
                    trav.auth_path(),
                    &reference_auth_path(&levels, height, leaf)[..],
                    "auth path mismatch at height {height} leaf {leaf}"
                );
                trav.advance(&th);
            }
            assert_eq!(trav.leaf(), 1 << height);
        }
    }

    #[test]
    fn stack_round_trip() {
        let th = PlainHash;
        let mut stack = NodeStack::new(3, 0);
        stack.update(5, &th);
        let bytes = stack.to_bytes();
        let parsed = NodeStack::parse(&bytes, 32).unwrap();
        assert_eq!(parsed.target, stack.target);
        assert_eq!(parsed.leaf_idx, stack.leaf_idx);
        assert_eq!(parsed.to_bytes(), bytes);
    }

    #[test]
    fn stack_parse_rejects_truncation() {
        let th = PlainHash;
        let mut stack = NodeStack::new(2, 0);
        stack.update(3, &th);
        let bytes = stack.to_bytes();
        assert!(NodeStack::parse(&bytes[..bytes.len() - 1], 32).is_err());
        assert!(NodeStack::parse(&bytes[..8], 32).is_err());
    }
}
