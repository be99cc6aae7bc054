//! Contains the XMSS [`SigningKey`]

use rand_core::CryptoRngCore;
use zeroize::Zeroize;

use crate::error::{Error, Result};
use crate::xmss::hash::{h_msg, prf, to_bytes};
use crate::xmss::params::XmssAlgorithm;
use crate::xmss::public::VerifyingKey;
use crate::xmss::signature::Signature;
use crate::xmss::tree::XmssTree;

/// A stateful XMSS signing key.
///
/// Holds the PRF key for the per-signature randomizer and the tree with its
/// traversal state. Signing is deterministic: all randomness was fixed at
/// key generation.
pub struct SigningKey {
    alg: XmssAlgorithm,
    skprf: Vec<u8>,
    tree: XmssTree,
}

impl SigningKey {
    /// Generates a fresh key from three random `n`-byte seeds.
    pub fn new(alg: XmssAlgorithm, rng: &mut impl CryptoRngCore) -> Result<Self> {
        let n = alg.n();
        let mut skseed = vec![0u8; n];
        rng.try_fill_bytes(&mut skseed)?;
        let mut seed = vec![0u8; n];
        rng.try_fill_bytes(&mut seed)?;
        let mut skprf = vec![0u8; n];
        rng.try_fill_bytes(&mut skprf)?;
        let key = Self::from_seeds(alg, &skseed, &seed, &skprf, 0, 0);
        skseed.zeroize();
        skprf.zeroize();
        Ok(key)
    }

    /// Deterministically builds the key for a `(layer, idx_tree)` address
    /// from caller-supplied seeds.
    pub(crate) fn from_seeds(
        alg: XmssAlgorithm,
        skseed: &[u8],
        seed: &[u8],
        skprf: &[u8],
        layer: u32,
        idx_tree: u64,
    ) -> Self {
        SigningKey {
            alg,
            skprf: skprf.to_vec(),
            tree: XmssTree::generate(alg, skseed, seed, layer, idx_tree),
        }
    }

    /// Deterministically builds a key from `3n` seed bytes laid out as
    /// `skseed || skprf || seed`.
    pub fn from_seed(alg: XmssAlgorithm, seed_material: &[u8]) -> Result<Self> {
        let n = alg.n();
        if seed_material.len() != 3 * n {
            return Err(Error::InvalidKey("XMSS seed material"));
        }
        Ok(Self::from_seeds(
            alg,
            &seed_material[..n],
            &seed_material[2 * n..],
            &seed_material[n..2 * n],
            0,
            0,
        ))
    }

    /// The parameter set of this key.
    pub fn algorithm(&self) -> XmssAlgorithm {
        self.alg
    }

    /// The index of the next one-time key to be consumed.
    pub fn idx(&self) -> u32 {
        self.tree.idx()
    }

    /// Whether every one-time key under this tree has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.tree.is_exhausted()
    }

    /// Checks that the leaf counter has not run past the tree.
    pub fn validate(&self) -> Result<()> {
        if self.idx() > self.alg.leaves() {
            return Err(Error::InvalidKey("XMSS private key"));
        }
        Ok(())
    }

    /// Derives the corresponding verifying key.
    pub fn public(&self) -> VerifyingKey {
        VerifyingKey::from_parts(self.alg, self.tree.root().to_vec(), self.tree.seed.clone())
    }

    /// Signs `message` with the current leaf and advances the key.
    ///
    /// `r = PRF(skprf, toByte(idx, 32))` randomizes the message hash; the
    /// WOTS+ key of leaf `idx` signs the digest.
    pub fn sign(&mut self, message: &[u8]) -> Result<Signature> {
        self.validate()?;
        if self.is_exhausted() {
            return Err(Error::ExhaustedKey);
        }
        let family = self.alg.hash();
        let n = self.alg.n();
        let idx = self.idx();

        let r = prf(family, &self.skprf, &to_bytes(u64::from(idx), 32));
        let mut key = Vec::with_capacity(3 * n);
        key.extend_from_slice(&r);
        key.extend_from_slice(self.tree.root());
        key.extend_from_slice(&to_bytes(u64::from(idx), n));
        let digest = h_msg(family, &key, message);

        let (wots_sig, auth) = self.tree.tree_sig(&digest);
        Ok(Signature::from_parts(self.alg, idx, r, wots_sig, auth))
    }

    /// Wire form:
    /// `u32(oid) || skprf || u32(layer) || reduced_state || skseed || seed`
    /// where the reduced state is
    /// `u32(idx) || u32(idxtree) || root || auth_path || stacks`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&self.alg.typecode().to_be_bytes());
        out.extend_from_slice(&self.skprf);
        out.extend_from_slice(&self.tree.layer.to_be_bytes());
        out.extend_from_slice(&self.tree.reduced_bytes());
        out.extend_from_slice(&self.tree.skseed);
        out.extend_from_slice(&self.tree.seed);
        out
    }
}

impl TryFrom<&[u8]> for SigningKey {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 4 {
            return Err(Error::Parse("XMSS private key"));
        }
        let alg =
            XmssAlgorithm::from_typecode(u32::from_be_bytes(bytes[..4].try_into().expect("ok")))?;
        let n = alg.n();
        let rest = &bytes[4..];
        if rest.len() < n + 4 {
            return Err(Error::Parse("XMSS private key"));
        }
        let skprf = rest[..n].to_vec();
        let layer = u32::from_be_bytes(rest[n..n + 4].try_into().expect("ok"));
        let rest = &rest[n + 4..];

        // The traversal state is parsed against placeholder seeds, which are
        // patched in once the trailing skseed || seed fields are read.
        let (mut tree, rest) = XmssTree::split_parse_reduced(alg, layer, &[], &[], rest)?;
        if rest.len() != 2 * n {
            return Err(Error::Parse("XMSS private key"));
        }
        tree.skseed = rest[..n].to_vec();
        tree.seed = rest[n..].to_vec();

        let key = SigningKey { alg, skprf, tree };
        key.validate()
            .map_err(|_| Error::Parse("XMSS private key"))?;
        Ok(key)
    }
}

impl core::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SigningKey")
            .field("alg", &self.alg)
            .field("idx", &self.idx())
            .field("seeds", &"[REDACTED]")
            .finish()
    }
}

impl Drop for SigningKey {
    fn drop(&mut self) {
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
