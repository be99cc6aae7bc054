//! Contains the LM-OTS [`SigningKey`]

use digest::Digest;
use rand_core::CryptoRngCore;
use sha2::Sha256;
use signature::RandomizedSignerMut;
use zeroize::Zeroize;

use crate::constants::{D_MESG, D_PBLC, HASH_LEN, ID_LEN};
use crate::error::{Error, Result};
use crate::lmots::modes::LmsOtsAlgorithm;
use crate::lmots::public::VerifyingKey;
use crate::lmots::signature::Signature;
use crate::lmots::util::{chain, digits};
use crate::types::Identifier;

/// An LM-OTS signing key.
///
/// The `p` chain secrets are derived on demand from the 32-byte seed as
/// `H(I || u32(q) || u16(i) || u8(0xff) || seed)` (RFC 8554 Appendix A), so
/// only the seed is kept and serialized.
///
/// A key signs exactly one message. The signer latches after its signature
/// and any further [`SigningKey::sign`] fails with [`Error::ExhaustedKey`].
pub struct SigningKey {
    alg: LmsOtsAlgorithm,
    q: u32,
    id: Identifier,
    seed: [u8; HASH_LEN],
    used: bool,
}

impl SigningKey {
    /// Generates a fresh signing key with a random identifier and seed.
    ///
    /// Outside of an LMS tree the leaf number `q` is fixed at zero.
    pub fn new(alg: LmsOtsAlgorithm, rng: &mut impl CryptoRngCore) -> Result<Self> {
        let mut id = [0u8; ID_LEN];
        rng.try_fill_bytes(&mut id)?;
        let mut seed = [0u8; HASH_LEN];
        rng.try_fill_bytes(&mut seed)?;
        Ok(Self::from_seed(alg, 0, id, seed))
    }

    /// Rebuilds the signing key for leaf `q` of the tree identified by `id`.
    pub fn from_seed(alg: LmsOtsAlgorithm, q: u32, id: Identifier, seed: [u8; HASH_LEN]) -> Self {
        SigningKey {
            alg,
            q,
            id,
            seed,
            used: false,
        }
    }

    /// The parameter set this key was generated for.
    pub fn algorithm(&self) -> LmsOtsAlgorithm {
        self.alg
    }

    /// Whether the one-time signature of this key is still available.
    pub fn is_valid(&self) -> bool {
        !self.used
    }

    /// Basic sanity checks; lengths and the typecode are enforced by
    /// construction, so a constructed key is always valid.
    pub fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// The chain-`i` secret `x_i`.
    fn chain_secret(&self, i: u16) -> [u8; HASH_LEN] {
        Sha256::new()
            .chain_update(self.id)
            .chain_update(self.q.to_be_bytes())
            .chain_update(i.to_be_bytes())
            .chain_update([0xffu8])
            .chain_update(self.seed)
            .finalize()
            .into()
    }

    /// Derives the corresponding verifying key.
    pub fn public(&self) -> VerifyingKey {
        let chain_end = ((1u16 << self.alg.w()) - 1) as u8;
        let mut hasher = Sha256::new()
            .chain_update(self.id)
            .chain_update(self.q.to_be_bytes())
            .chain_update(D_PBLC);
        for i in 0..self.alg.p() as u16 {
            let x = self.chain_secret(i);
            let y = chain(&self.id, self.q, i, 0, chain_end, &x);
            hasher.update(y);
        }
        VerifyingKey::from_parts(self.alg, self.q, self.id, hasher.finalize().into())
    }

    /// Produces the one-time signature over `message`, consuming the key's
    /// single signature and drawing the randomizer `C` from `rng`.
    pub fn sign(&mut self, rng: &mut impl CryptoRngCore, message: &[u8]) -> Result<Signature> {
        self.validate()?;
        if self.used {
            return Err(Error::ExhaustedKey);
        }

        let mut c = [0u8; HASH_LEN];
        rng.try_fill_bytes(&mut c)?;

        let q_digest: [u8; HASH_LEN] = Sha256::new()
            .chain_update(self.id)
            .chain_update(self.q.to_be_bytes())
            .chain_update(D_MESG)
            .chain_update(c)
            .chain_update(message)
            .finalize()
            .into();

        let mut y = Vec::with_capacity(self.alg.p() * HASH_LEN);
        for (i, digit) in digits(self.alg, &q_digest).into_iter().enumerate() {
            let x = self.chain_secret(i as u16);
            y.extend_from_slice(&chain(&self.id, self.q, i as u16, 0, digit, &x));
        }

        self.used = true;
        Ok(Signature::from_parts(self.alg, c, y))
    }

    /// Wire form: `u32(otstype) || I || u32(q) || seed`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + ID_LEN + 4 + HASH_LEN);
        out.extend_from_slice(&self.alg.typecode().to_be_bytes());
        out.extend_from_slice(&self.id);
        out.extend_from_slice(&self.q.to_be_bytes());
        out.extend_from_slice(&self.seed);
        out
    }
}

impl TryFrom<&[u8]> for SigningKey {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 4 {
            return Err(Error::Parse("LM-OTS private key"));
        }
        let alg =
            LmsOtsAlgorithm::from_typecode(u32::from_be_bytes(bytes[..4].try_into().expect("ok")))?;
        if bytes.len() != 4 + ID_LEN + 4 + HASH_LEN {
            return Err(Error::Parse("LM-OTS private key"));
        }
        let id: Identifier = bytes[4..4 + ID_LEN].try_into().expect("ok");
        let q = u32::from_be_bytes(bytes[4 + ID_LEN..8 + ID_LEN].try_into().expect("ok"));
        let seed: [u8; HASH_LEN] = bytes[8 + ID_LEN..].try_into().expect("ok");
        Ok(Self::from_seed(alg, q, id, seed))
    }
}

impl core::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SigningKey")
            .field("alg", &self.alg)
            .field("q", &self.q)
            .field("id", &self.id)
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
