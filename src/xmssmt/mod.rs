//! XMSS^MT: multi-tree XMSS (RFC 8391 section 4.2).
//!
//! `d` layers of XMSS sub-trees of height `h` each. Layer `d - 1` carries
//! the public root; each layer's current sub-tree signs the root of the
//! sub-tree below it, and layer 0 signs messages. Exhausted sub-trees are
//! regenerated lazily at the next tree index and the affected chain
//! signatures are refreshed.

use rand_core::CryptoRngCore;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::error::{Error, Result};
use crate::xmss::address::Adrs;
use crate::xmss::hash::{h_msg, prf, to_bytes};
use crate::xmss::params::XmssMtAlgorithm;
use crate::xmss::tree::{root_from_sig, XmssTree};

/// One layer's WOTS+ signature and authentication path.
#[derive(Clone, Debug, PartialEq, Eq)]
struct LayerSig {
    wots_sig: Vec<Vec<u8>>,
    auth: Vec<Vec<u8>>,
}

impl LayerSig {
    fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for chain in &self.wots_sig {
            out.extend_from_slice(chain);
        }
        for node in &self.auth {
            out.extend_from_slice(node);
        }
        out
    }

    fn parse(alg: XmssMtAlgorithm, bytes: &[u8]) -> Result<Self> {
        let n = alg.n();
        let xmss = alg.xmss();
        if bytes.len() != (xmss.len() + xmss.h() as usize) * n {
            return Err(Error::Parse("XMSS^MT layer signature"));
        }
        let wots_sig = bytes[..xmss.len() * n]
            .chunks_exact(n)
            .map(<[u8]>::to_vec)
            .collect();
        let auth = bytes[xmss.len() * n..]
            .chunks_exact(n)
            .map(<[u8]>::to_vec)
            .collect();
        Ok(LayerSig { wots_sig, auth })
    }
}

/// A stateful XMSS^MT signing key.
///
/// Owns the `d` sub-tree signers (layer `ℓ` at index `ℓ`), the `d - 1`
/// chain signatures and the global 64-bit index. All layers share the same
/// seed triple; sub-trees are told apart purely by their `(layer, idxtree)`
/// hash addresses.
pub struct SigningKey {
    alg: XmssMtAlgorithm,
    idx: u64,
    seed: Vec<u8>,
    skseed: Vec<u8>,
    skprf: Vec<u8>,
    trees: Vec<XmssTree>,
    chain_sigs: Vec<LayerSig>,
    root: Vec<u8>,
}

/// An XMSS^MT verifying key: the top-layer root and the public seed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifyingKey {
    alg: XmssMtAlgorithm,
    root: Vec<u8>,
    seed: Vec<u8>,
}

/// An XMSS^MT signature: the global index, the randomizer and one
/// (WOTS+ signature, authentication path) pair per layer, message layer
/// first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    alg: XmssMtAlgorithm,
    idx: u64,
    r: Vec<u8>,
    layers: Vec<LayerSig>,
}

impl SigningKey {
    /// Generates a fresh key: three random `n`-byte seeds, one sub-tree per
    /// layer at tree index 0, and the initial chain signatures.
    pub fn new(alg: XmssMtAlgorithm, rng: &mut impl CryptoRngCore) -> Result<Self> {
        let n = alg.n();
        let mut skprf = vec![0u8; n];
        rng.try_fill_bytes(&mut skprf)?;
        let mut seed = vec![0u8; n];
        rng.try_fill_bytes(&mut seed)?;
        let mut skseed = vec![0u8; n];
        rng.try_fill_bytes(&mut skseed)?;
        let key = Self::from_seeds(alg, &skseed, &seed, &skprf);
        skseed.zeroize();
        skprf.zeroize();
        Ok(key)
    }

    /// Deterministically builds a key from `3n` seed bytes laid out as
    /// `skseed || skprf || seed`.
    pub fn from_seed(alg: XmssMtAlgorithm, seed_material: &[u8]) -> Result<Self> {
        let n = alg.n();
        if seed_material.len() != 3 * n {
            return Err(Error::InvalidKey("XMSS^MT seed material"));
        }
        Ok(Self::from_seeds(
            alg,
            &seed_material[..n],
            &seed_material[2 * n..],
            &seed_material[n..2 * n],
        ))
    }

    /// Deterministically builds the key from caller-supplied seeds.
    fn from_seeds(alg: XmssMtAlgorithm, skseed: &[u8], seed: &[u8], skprf: &[u8]) -> Self {
        let xmss = alg.xmss();
        let d = alg.d() as usize;
        let mut trees: Vec<XmssTree> = (0..d)
            .map(|layer| XmssTree::generate(xmss, skseed, seed, layer as u32, 0))
            .collect();
        let root = trees[d - 1].root().to_vec();

        let mut chain_sigs = vec![
            LayerSig {
                wots_sig: Vec::new(),
                auth: Vec::new(),
            };
            d - 1
        ];
        for layer in (1..d).rev() {
            let lower_root = trees[layer - 1].root().to_vec();
            let (wots_sig, auth) = trees[layer].tree_sig(&lower_root);
            chain_sigs[layer - 1] = LayerSig { wots_sig, auth };
        }

        SigningKey {
            alg,
            idx: 0,
            seed: seed.to_vec(),
            skseed: skseed.to_vec(),
            skprf: skprf.to_vec(),
            trees,
            chain_sigs,
            root,
        }
    }

    /// The parameter set of this key.
    pub fn algorithm(&self) -> XmssMtAlgorithm {
        self.alg
    }

    /// The global signature index.
    pub fn idx(&self) -> u64 {
        self.idx
    }

    /// The total signature capacity, `2^(d*h)`.
    pub fn capacity(&self) -> u64 {
        1u64 << self.alg.total_height()
    }

    /// Whether the global index has reached the capacity.
    pub fn is_exhausted(&self) -> bool {
        self.idx >= self.capacity()
    }

    /// Checks the layer bookkeeping and the global index.
    pub fn validate(&self) -> Result<()> {
        if self.trees.len() != self.alg.d() as usize
            || self.chain_sigs.len() + 1 != self.trees.len()
            || self.idx > self.capacity()
        {
            return Err(Error::InvalidKey("XMSS^MT private key"));
        }
        Ok(())
    }

    /// Derives the corresponding verifying key.
    pub fn public(&self) -> VerifyingKey {
        VerifyingKey {
            alg: self.alg,
            root: self.root.clone(),
            seed: self.seed.clone(),
        }
    }

    /// Signs `message` with the layer-0 sub-tree, rolling over exhausted
    /// sub-trees and refreshing the affected chain signatures first.
    pub fn sign(&mut self, message: &[u8]) -> Result<Signature> {
        self.validate()?;
        if self.is_exhausted() {
            return Err(Error::ExhaustedKey);
        }
        let xmss = self.alg.xmss();
        let n = self.alg.n();
        let d = self.alg.d() as usize;

        // Regenerate consecutive exhausted layers at their next tree index.
        // The global bound above guarantees a layer with capacity exists.
        let mut rolled = 0usize;
        while rolled < d - 1 && self.trees[rolled].is_exhausted() {
            let next_tree = self.trees[rolled].idx_tree + 1;
            self.trees[rolled] =
                XmssTree::generate(xmss, &self.skseed, &self.seed, rolled as u32, next_tree);
            rolled += 1;
        }
        for layer in 1..=rolled {
            let lower_root = self.trees[layer - 1].root().to_vec();
            let (wots_sig, auth) = self.trees[layer].tree_sig(&lower_root);
            self.chain_sigs[layer - 1] = LayerSig { wots_sig, auth };
        }

        let family = self.alg.hash();
        let r = prf(family, &self.skprf, &to_bytes(self.idx, 32));
        let mut key = Vec::with_capacity(3 * n);
        key.extend_from_slice(&r);
        key.extend_from_slice(&self.root);
        key.extend_from_slice(&to_bytes(self.idx, n));
        let digest = h_msg(family, &key, message);

        let (wots_sig, auth) = self.trees[0].tree_sig(&digest);
        let mut layers = Vec::with_capacity(d);
        layers.push(LayerSig { wots_sig, auth });
        layers.extend(self.chain_sigs.iter().cloned());

        let idx = self.idx;
        self.idx += 1;
        Ok(Signature {
            alg: self.alg,
            idx,
            r,
            layers,
        })
    }

    /// Wire form: `u32(oid) || u64(idx) || seed || skseed || skprf`
    /// followed by each layer's length-prefixed reduced state and the
    /// `d - 1` chain signatures.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&self.alg.typecode().to_be_bytes());
        out.extend_from_slice(&self.idx.to_be_bytes());
        out.extend_from_slice(&self.seed);
        out.extend_from_slice(&self.skseed);
        out.extend_from_slice(&self.skprf);
        for tree in &self.trees {
            let reduced = tree.reduced_bytes();
            out.extend_from_slice(&(reduced.len() as u32).to_be_bytes());
            out.extend_from_slice(&reduced);
        }
        for sig in &self.chain_sigs {
            out.extend_from_slice(&sig.to_bytes());
        }
        out
    }
}

impl TryFrom<&[u8]> for SigningKey {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 12 {
            return Err(Error::Parse("XMSS^MT private key"));
        }
        let alg =
            XmssMtAlgorithm::from_typecode(u32::from_be_bytes(bytes[..4].try_into().expect("ok")))?;
        let xmss = alg.xmss();
        let n = alg.n();
        let d = alg.d() as usize;
        let idx = u64::from_be_bytes(bytes[4..12].try_into().expect("ok"));
        if idx > 1u64 << alg.total_height() {
            return Err(Error::Parse("XMSS^MT private key"));
        }
        let mut rest = &bytes[12..];
        if rest.len() < 3 * n {
            return Err(Error::Parse("XMSS^MT private key"));
        }
        let seed = rest[..n].to_vec();
        let skseed = rest[n..2 * n].to_vec();
        let skprf = rest[2 * n..3 * n].to_vec();
        rest = &rest[3 * n..];

        let mut trees = Vec::with_capacity(d);
        for layer in 0..d {
            if rest.len() < 4 {
                return Err(Error::Parse("XMSS^MT private key"));
            }
            let reduced_len = u32::from_be_bytes(rest[..4].try_into().expect("ok")) as usize;
            rest = &rest[4..];
            if rest.len() < reduced_len {
                return Err(Error::Parse("XMSS^MT private key"));
            }
            let (tree, leftover) = XmssTree::split_parse_reduced(
                xmss,
                layer as u32,
                &skseed,
                &seed,
                &rest[..reduced_len],
            )?;
            if !leftover.is_empty() {
                return Err(Error::Parse("XMSS^MT private key"));
            }
            trees.push(tree);
            rest = &rest[reduced_len..];
        }

        let chain_sig_len = (xmss.len() + xmss.h() as usize) * n;
        if rest.len() != chain_sig_len * (d - 1) {
            return Err(Error::Parse("XMSS^MT private key"));
        }
        let mut chain_sigs = Vec::with_capacity(d - 1);
        for chunk in rest.chunks_exact(chain_sig_len) {
            chain_sigs.push(LayerSig::parse(alg, chunk)?);
        }

        let root = trees[d - 1].root().to_vec();
        let key = SigningKey {
            alg,
            idx,
            seed,
            skseed,
            skprf,
            trees,
            chain_sigs,
            root,
        };
        key.validate()
            .map_err(|_| Error::Parse("XMSS^MT private key"))?;
        Ok(key)
    }
}

impl core::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SigningKey")
            .field("alg", &self.alg)
            .field("idx", &self.idx)
            .field("seeds", &"[REDACTED]")
            .finish()
    }
}

impl Drop for SigningKey {
    fn drop(&mut self) {
        self.skseed.zeroize();
        self.skprf.zeroize();
    }
}

impl signature::SignerMut<Signature> for SigningKey {
    fn try_sign(&mut self, msg: &[u8]) -> core::result::Result<Signature, signature::Error> {
        self.sign(msg).map_err(signature::Error::from)
    }
}

impl signature::Keypair for SigningKey {
    type VerifyingKey = VerifyingKey;

    fn verifying_key(&self) -> VerifyingKey {
        self.public()
    }
}

impl VerifyingKey {
    /// The parameter set of this key.
    pub fn algorithm(&self) -> XmssMtAlgorithm {
        self.alg
    }

    /// The top-layer tree root.
    pub fn root(&self) -> &[u8] {
        &self.root
    }

    /// The public bitmask seed.
    pub fn seed(&self) -> &[u8] {
        &self.seed
    }

    /// Basic sanity checks; all fields are length-checked by construction.
    pub fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Verifies `signature` over `message`, walking the layers from the
    /// message signature up to a top-layer root candidate.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<()> {
        self.validate()?;
        if signature.alg != self.alg || signature.idx >= 1u64 << self.alg.total_height() {
            return Err(Error::InvalidSignature);
        }
        let xmss = self.alg.xmss();
        let n = self.alg.n();
        let h = xmss.h();
        let leaf_mask = (1u64 << h) - 1;

        let mut key = Vec::with_capacity(3 * n);
        key.extend_from_slice(&signature.r);
        key.extend_from_slice(&self.root);
        key.extend_from_slice(&to_bytes(signature.idx, n));
        let mut node = h_msg(self.alg.hash(), &key, message);

        let mut idx_leaf = (signature.idx & leaf_mask) as u32;
        let mut idx_tree = signature.idx >> h;
        for (layer, sig) in signature.layers.iter().enumerate() {
            let mut adrs = Adrs::new();
            adrs.set_layer(layer as u32);
            adrs.set_tree(idx_tree);
            node = root_from_sig(
                xmss,
                &node,
                &sig.wots_sig,
                &sig.auth,
                &self.seed,
                idx_leaf,
                &mut adrs,
            );
            idx_leaf = (idx_tree & leaf_mask) as u32;
            idx_tree >>= h;
        }

        if bool::from(node.ct_eq(&self.root)) {
            Ok(())
        } else {
            Err(Error::InvalidSignature)
        }
    }

    /// Wire form: `u32(oid) || root || seed`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.alg.pub_len());
        out.extend_from_slice(&self.alg.typecode().to_be_bytes());
        out.extend_from_slice(&self.root);
        out.extend_from_slice(&self.seed);
        out
    }
}

/// Tries to parse a [`VerifyingKey`] from an exact slice
impl TryFrom<&[u8]> for VerifyingKey {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 4 {
            return Err(Error::Parse("XMSS^MT public key"));
        }
        let alg =
            XmssMtAlgorithm::from_typecode(u32::from_be_bytes(bytes[..4].try_into().expect("ok")))?;
        if bytes.len() != alg.pub_len() {
            return Err(Error::Parse("XMSS^MT public key"));
        }
        let n = alg.n();
        Ok(VerifyingKey {
            alg,
            root: bytes[4..4 + n].to_vec(),
            seed: bytes[4 + n..].to_vec(),
        })
    }
}

impl signature::Verifier<Signature> for VerifyingKey {
    fn verify(&self, msg: &[u8], signature: &Signature) -> core::result::Result<(), signature::Error> {
        self.verify(msg, signature).map_err(signature::Error::from)
    }
}

impl Signature {
    /// The parameter set this signature was issued under.
    pub fn algorithm(&self) -> XmssMtAlgorithm {
        self.alg
    }

    /// The global index this signature was issued at.
    pub fn idx(&self) -> u64 {
        self.idx
    }

    /// Wire form: `toByte(idx, ceil(H/8)) || r || layer signatures`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.alg.sig_len());
        out.extend_from_slice(&to_bytes(self.idx, self.alg.idx_len()));
        out.extend_from_slice(&self.r);
        for layer in &self.layers {
            out.extend_from_slice(&layer.to_bytes());
        }
        out
    }

    /// Parses a signature for the given parameter set; the wire form carries
    /// no typecode, so the length must match `alg` exactly.
    pub fn from_bytes(alg: XmssMtAlgorithm, bytes: &[u8]) -> Result<Self> {
        if bytes.len() != alg.sig_len() {
            return Err(Error::Parse("XMSS^MT signature"));
        }
        let n = alg.n();
        let xmss = alg.xmss();
        let idx_len = alg.idx_len();
        let idx = bytes[..idx_len]
            .iter()
            .fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
        if idx >= 1u64 << alg.total_height() {
            return Err(Error::Parse("XMSS^MT signature"));
        }
        let r = bytes[idx_len..idx_len + n].to_vec();
        let layer_len = (xmss.len() + xmss.h() as usize) * n;
        let layers = bytes[idx_len + n..]
            .chunks_exact(layer_len)
            .map(|chunk| LayerSig::parse(alg, chunk))
            .collect::<Result<Vec<_>>>()?;
        Ok(Signature {
            alg,
            idx,
            r,
            layers,
        })
    }
}

impl From<Signature> for Vec<u8> {
    fn from(sig: Signature) -> Vec<u8> {
        sig.to_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xmss::params::XmssMtAlgorithm;
    use rand::thread_rng;

    // H20/D4 over H5 sub-trees keeps rollover cheap enough to exercise.
    const ALG: XmssMtAlgorithm = XmssMtAlgorithm::XmssMtShakeH20D4W256;

    #[test]
    fn test_sign_verify_and_rollover() {
        let mut rng = thread_rng();
        let mut sk = SigningKey::new(ALG, &mut rng).unwrap();
        let pk = sk.public();

        // 40 signatures cross the first sub-tree boundary (2^5 = 32)
        for i in 0..40u64 {
            let msg = i.to_be_bytes();
            let sig = sk.sign(&msg).unwrap();
            assert_eq!(sig.idx(), i);
            assert!(pk.verify(&msg, &sig).is_ok(), "signature {i} rejected");
        }
        assert_eq!(sk.trees[0].idx_tree, 1);
    }

    #[test]
    fn test_signature_round_trip() {
        let mut rng = thread_rng();
        let mut sk = SigningKey::new(ALG, &mut rng).unwrap();
        let pk = sk.public();
        let sig = sk.sign(b"multi-tree").unwrap();

        let bytes = sig.to_bytes();
        assert_eq!(bytes.len(), ALG.sig_len());
        let sig2 = Signature::from_bytes(ALG, &bytes).unwrap();
        assert_eq!(sig, sig2);
        assert!(pk.verify(b"multi-tree", &sig2).is_ok());
    }

    #[test]
    fn test_private_key_round_trip() {
        let mut rng = thread_rng();
        let mut sk = SigningKey::new(ALG, &mut rng).unwrap();
        let pk = sk.public();
        for i in 0..3u64 {
            sk.sign(&i.to_be_bytes()).unwrap();
        }

        let bytes = sk.to_bytes();
        let mut sk2 = SigningKey::try_from(bytes.as_slice()).unwrap();
        assert_eq!(sk2.idx(), 3);
        assert_eq!(sk2.to_bytes(), bytes);

        let sig = sk2.sign(b"resumed").unwrap();
        assert_eq!(sig.idx(), 3);
        assert!(pk.verify(b"resumed", &sig).is_ok());
    }

    #[test]
    fn test_deterministic_keygen() {
        let n = ALG.n();
        let seed_material: Vec<u8> = (0..3 * n).map(|i| i as u8).collect();
        let sk1 = SigningKey::from_seed(ALG, &seed_material).unwrap();
        let mut sk2 = SigningKey::from_seed(ALG, &seed_material).unwrap();
        assert_eq!(sk1.public(), sk2.public());

        let sig = sk2.sign(b"deterministic").unwrap();
        assert!(sk1.public().verify(b"deterministic", &sig).is_ok());

        assert!(SigningKey::from_seed(ALG, &seed_material[1..]).is_err());
    }

    #[test]
    fn test_public_key_round_trip() {
        let mut rng = thread_rng();
        let sk = SigningKey::new(ALG, &mut rng).unwrap();
        let pk = sk.public();
        let bytes = pk.to_bytes();
        assert_eq!(bytes.len(), ALG.pub_len());
        let pk2 = VerifyingKey::try_from(bytes.as_slice()).unwrap();
        assert_eq!(pk, pk2);
    }
}
