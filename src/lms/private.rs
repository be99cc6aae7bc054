//! Contains the LMS [`SigningKey`]

use rand_core::CryptoRngCore;
use signature::RandomizedSignerMut;
use zeroize::Zeroize;

use crate::constants::{HASH_LEN, ID_LEN};
use crate::error::{Error, Result};
use crate::lmots;
use crate::lms::modes::LmsAlgorithm;
use crate::lms::public::VerifyingKey;
use crate::lms::signature::Signature;
use crate::lms::treehash::LmsTreeHash;
use crate::merkle::Traversal;
use crate::types::Identifier;

/// A stateful LMS signing key over `2^h` LM-OTS leaves.
///
/// The key owns its leaf counter `q` and the traversal state that maintains
/// the authentication path as `q` advances; signing therefore requires
/// exclusive (`&mut`) access. Exhausted keys refuse to sign.
pub struct SigningKey {
    lms: LmsAlgorithm,
    ots: lmots::LmsOtsAlgorithm,
    id: Identifier,
    seed: [u8; HASH_LEN],
    state: Traversal,
}

impl SigningKey {
    /// Generates a fresh key: a random identifier and seed, followed by one
    /// full sweep of the tree to record the root and the initial
    /// authentication state.
    pub fn new(
        lms: LmsAlgorithm,
        ots: lmots::LmsOtsAlgorithm,
        rng: &mut impl CryptoRngCore,
    ) -> Result<Self> {
        let mut id = [0u8; ID_LEN];
        rng.try_fill_bytes(&mut id)?;
        let mut seed = [0u8; HASH_LEN];
        rng.try_fill_bytes(&mut seed)?;
        Ok(Self::from_seed(lms, ots, id, seed))
    }

    /// Deterministically rebuilds the key with counter zero from its
    /// identifier and seed.
    pub fn from_seed(
        lms: LmsAlgorithm,
        ots: lmots::LmsOtsAlgorithm,
        id: Identifier,
        seed: [u8; HASH_LEN],
    ) -> Self {
        let th = LmsTreeHash {
            lms,
            ots,
            id: &id,
            seed: &seed,
        };
        let state = Traversal::generate(lms.h(), &th);
        SigningKey {
            lms,
            ots,
            id,
            seed,
            state,
        }
    }

    /// Rebuilds the key at counter `q` by replaying `q` traversal steps.
    fn from_parts(
        lms: LmsAlgorithm,
        ots: lmots::LmsOtsAlgorithm,
        q: u32,
        id: Identifier,
        seed: [u8; HASH_LEN],
    ) -> Self {
        let mut key = Self::from_seed(lms, ots, id, seed);
        let th = LmsTreeHash {
            lms,
            ots,
            id: &key.id,
            seed: &key.seed,
        };
        for _ in 0..q {
            key.state.advance(&th);
        }
        key
    }

    /// The LMS parameter set of this key.
    pub fn algorithm(&self) -> LmsAlgorithm {
        self.lms
    }

    /// The LM-OTS parameter set of the leaves.
    pub fn ots_algorithm(&self) -> lmots::LmsOtsAlgorithm {
        self.ots
    }

    /// The leaf counter: the index of the next one-time key to be consumed.
    pub fn q(&self) -> u32 {
        self.state.leaf()
    }

    /// Whether every one-time key under this tree has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.q() >= self.lms.leaves()
    }

    /// Checks that the leaf counter is still within the tree.
    pub fn validate(&self) -> Result<()> {
        if self.is_exhausted() {
            return Err(Error::InvalidKey("LMS private key"));
        }
        Ok(())
    }

    /// Derives the corresponding verifying key.
    pub fn public(&self) -> VerifyingKey {
        let mut root = [0u8; HASH_LEN];
        root.copy_from_slice(self.state.root());
        VerifyingKey::from_parts(self.lms, self.ots, self.id, root)
    }

    /// Signs `message` with the current leaf and advances the key.
    ///
    /// The counter and traversal state are only touched once the one-time
    /// signature has been produced; a failure leaves the key unchanged.
    pub fn sign(&mut self, rng: &mut impl CryptoRngCore, message: &[u8]) -> Result<Signature> {
        if self.is_exhausted() {
            return Err(Error::ExhaustedKey);
        }
        let q = self.q();
        let mut ots_key = lmots::SigningKey::from_seed(self.ots, q, self.id, self.seed);
        let ots_sig = ots_key.sign(rng, message)?;

        let path = self
            .state
            .auth_path()
            .iter()
            .map(|node| {
                let mut out = [0u8; HASH_LEN];
                out.copy_from_slice(node);
                out
            })
            .collect();

        let th = LmsTreeHash {
            lms: self.lms,
            ots: self.ots,
            id: &self.id,
            seed: &self.seed,
        };
        self.state.advance(&th);

        Ok(Signature::from_parts(q, ots_sig, self.lms, path))
    }

    /// Wire form: `u32(lmstype) || u32(otstype) || u32(q) || I || seed`.
    ///
    /// The traversal state is not serialized; parsing replays the counter.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.lms.priv_len());
        out.extend_from_slice(&self.lms.typecode().to_be_bytes());
        out.extend_from_slice(&self.ots.typecode().to_be_bytes());
        out.extend_from_slice(&self.q().to_be_bytes());
        out.extend_from_slice(&self.id);
        out.extend_from_slice(&self.seed);
        out
    }
}

impl TryFrom<&[u8]> for SigningKey {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 8 {
            return Err(Error::Parse("LMS private key"));
        }
        let lms =
            LmsAlgorithm::from_typecode(u32::from_be_bytes(bytes[..4].try_into().expect("ok")))?;
        let ots = lmots::LmsOtsAlgorithm::from_typecode(u32::from_be_bytes(
            bytes[4..8].try_into().expect("ok"),
        ))?;
        if bytes.len() != lms.priv_len() {
            return Err(Error::Parse("LMS private key"));
        }
        let q = u32::from_be_bytes(bytes[8..12].try_into().expect("ok"));
        if q > lms.leaves() {
            return Err(Error::Parse("LMS private key"));
        }
        let id: Identifier = bytes[12..12 + ID_LEN].try_into().expect("ok");
        let seed: [u8; HASH_LEN] = bytes[12 + ID_LEN..].try_into().expect("ok");
        Ok(Self::from_parts(lms, ots, q, id, seed))
    }
}

impl core::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SigningKey")
            .field("lms", &self.lms)
            .field("ots", &self.ots)
            .field("id", &self.id)
            .field("q", &self.q())
            .field("seed", &"[REDACTED]")
            .finish()
    }
}

impl Drop for SigningKey {
    fn drop(&mut self) {
        self.seed.zeroize();
    }
}

impl RandomizedSignerMut<Signature> for SigningKey {
    fn try_sign_with_rng(
        &mut self,
        rng: &mut impl CryptoRngCore,
        msg: &[u8],
    ) -> core::result::Result<Signature, signature::Error> {
        self.sign(rng, msg).map_err(signature::Error::from)
    }
}

impl signature::Keypair for SigningKey {
    type VerifyingKey = VerifyingKey;

    fn verifying_key(&self) -> VerifyingKey {
        self.public()
    }
}
