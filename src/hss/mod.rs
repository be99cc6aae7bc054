//! HSS: the Hierarchical Signature System (RFC 8554 section 6).
//!
//! `L` layers of LMS trees. Layer 0 is the root of trust; each layer signs
//! the serialized public key of the layer below it, and the deepest layer
//! signs messages. When a lower tree exhausts, it is regenerated and the
//! chain of public-key signatures is refreshed, multiplying the signature
//! capacity without growing any single tree.

use rand_core::CryptoRngCore;
use signature::RandomizedSignerMut;

use crate::error::{Error, Result};
use crate::lmots::LmsOtsAlgorithm;
use crate::lms;
use crate::lms::LmsAlgorithm;

/// The maximum number of HSS layers permitted by RFC 8554.
pub const MAX_LEVELS: u32 = 8;

/// An HSS signing key: one LMS signing key per layer plus the signatures
/// chaining each layer's public key to its parent.
pub struct SigningKey {
    levels: u32,
    keys: Vec<lms::SigningKey>,
    pubs: Vec<lms::VerifyingKey>,
    chain_sigs: Vec<lms::Signature>,
}

/// An HSS verifying key: the level count and the layer-0 LMS public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifyingKey {
    levels: u32,
    lms_pub: lms::VerifyingKey,
}

/// An HSS signature: `L - 1` pairs of (chain signature, next-layer public
/// key) followed by the deepest layer's signature over the message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    chain: Vec<(lms::Signature, lms::VerifyingKey)>,
    message_sig: lms::Signature,
}

impl SigningKey {
    /// Generates `levels` fresh LMS trees and signs each layer's public key
    /// with the layer above it.
    pub fn new(
        lms_alg: LmsAlgorithm,
        ots_alg: LmsOtsAlgorithm,
        levels: u32,
        rng: &mut impl CryptoRngCore,
    ) -> Result<Self> {
        if levels < 1 || levels > MAX_LEVELS {
            return Err(Error::InvalidKey("HSS level count"));
        }
        let mut keys = Vec::with_capacity(levels as usize);
        let mut pubs = Vec::with_capacity(levels as usize);
        for _ in 0..levels {
            let key = lms::SigningKey::new(lms_alg, ots_alg, rng)?;
            pubs.push(key.public());
            keys.push(key);
        }
        let mut chain_sigs = Vec::with_capacity(levels as usize - 1);
        for i in 0..levels as usize - 1 {
            let sig = keys[i].sign(rng, &pubs[i + 1].to_bytes())?;
            chain_sigs.push(sig);
        }
        Ok(SigningKey {
            levels,
            keys,
            pubs,
            chain_sigs,
        })
    }

    /// The number of layers `L`.
    pub fn levels(&self) -> u32 {
        self.levels
    }

    /// Derives the corresponding verifying key.
    pub fn public(&self) -> VerifyingKey {
        VerifyingKey {
            levels: self.levels,
            lms_pub: self.pubs[0].clone(),
        }
    }

    /// Checks the layer bookkeeping is intact.
    pub fn validate(&self) -> Result<()> {
        if self.keys.len() != self.levels as usize
            || self.pubs.len() != self.keys.len()
            || self.chain_sigs.len() + 1 != self.keys.len()
        {
            return Err(Error::InvalidKey("HSS private key"));
        }
        Ok(())
    }

    /// Signs `message` with the deepest layer, regenerating exhausted lower
    /// trees first. Fails with [`Error::ExhaustedKey`] once every layer is at
    /// capacity.
    pub fn sign(&mut self, rng: &mut impl CryptoRngCore, message: &[u8]) -> Result<Signature> {
        self.validate()?;

        // Drop exhausted trees from the tail of the chain. The upper layers
        // advance only when a child is regenerated, so exhaustion always
        // shows up at the deepest surviving layer first.
        while self.keys.last().map(lms::SigningKey::is_exhausted) == Some(true) {
            if self.keys.len() == 1 {
                return Err(Error::ExhaustedKey);
            }
            self.keys.pop();
            self.pubs.pop();
            self.chain_sigs.pop();
        }

        // Regrow the chain with fresh trees, each signed by its parent.
        while self.keys.len() < self.levels as usize {
            let key = lms::SigningKey::new(
                self.keys[0].algorithm(),
                self.keys[0].ots_algorithm(),
                rng,
            )?;
            let pk = key.public();
            let parent = self.keys.len() - 1;
            let sig = self.keys[parent].sign(rng, &pk.to_bytes())?;
            self.keys.push(key);
            self.pubs.push(pk);
            self.chain_sigs.push(sig);
        }

        let message_sig = self
            .keys
            .last_mut()
            .expect("at least one layer")
            .sign(rng, message)?;

        let chain = self
            .chain_sigs
            .iter()
            .cloned()
            .zip(self.pubs[1..].iter().cloned())
            .collect();
        Ok(Signature {
            chain,
            message_sig,
        })
    }

    /// Wire form: `u32(L)` followed by the `L` serialized LMS private keys.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&self.levels.to_be_bytes());
        for key in &self.keys {
            out.extend_from_slice(&key.to_bytes());
        }
        out
    }

    /// Parses a serialized HSS private key, rebuilding each layer's public
    /// key and re-signing the chain. Re-signing consumes one leaf of every
    /// layer above the deepest, which keeps the one-time property intact for
    /// chain signatures issued before serialization.
    pub fn parse(bytes: &[u8], rng: &mut impl CryptoRngCore) -> Result<Self> {
        if bytes.len() < 4 {
            return Err(Error::Parse("HSS private key"));
        }
        let levels = u32::from_be_bytes(bytes[..4].try_into().expect("ok"));
        if levels < 1 || levels > MAX_LEVELS {
            return Err(Error::Parse("HSS private key"));
        }
        let mut rest = &bytes[4..];
        let mut keys = Vec::with_capacity(levels as usize);
        for _ in 0..levels {
            if rest.len() < 8 {
                return Err(Error::Parse("HSS private key"));
            }
            let lms_alg = LmsAlgorithm::from_typecode(u32::from_be_bytes(
                rest[..4].try_into().expect("ok"),
            ))?;
            let len = lms_alg.priv_len();
            if rest.len() < len {
                return Err(Error::Parse("HSS private key"));
            }
            keys.push(lms::SigningKey::try_from(&rest[..len])?);
            rest = &rest[len..];
        }
        if !rest.is_empty() {
            return Err(Error::Parse("HSS private key"));
        }

        let pubs: Vec<_> = keys.iter().map(lms::SigningKey::public).collect();
        let mut chain_sigs = Vec::with_capacity(levels as usize - 1);
        for i in 0..levels as usize - 1 {
            let sig = keys[i].sign(rng, &pubs[i + 1].to_bytes())?;
            chain_sigs.push(sig);
        }
        Ok(SigningKey {
            levels,
            keys,
            pubs,
            chain_sigs,
        })
    }
}

impl core::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SigningKey")
            .field("levels", &self.levels)
            .field("keys", &"[REDACTED]")
            .finish()
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

impl VerifyingKey {
    /// The number of layers `L`.
    pub fn levels(&self) -> u32 {
        self.levels
    }

    /// The layer-0 LMS public key.
    pub fn lms_public(&self) -> &lms::VerifyingKey {
        &self.lms_pub
    }

    /// Checks the level count against the RFC bound.
    pub fn validate(&self) -> Result<()> {
        if self.levels < 1 || self.levels > MAX_LEVELS {
            return Err(Error::InvalidKey("HSS public key"));
        }
        Ok(())
    }

    /// Verifies an HSS signature: each chain link is checked against the
    /// layer above it, then the deepest signature is checked over `message`.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<()> {
        self.validate()?;
        if signature.chain.len() + 1 != self.levels as usize {
            return Err(Error::InvalidSignature);
        }
        let mut pk = &self.lms_pub;
        for (sig, next_pk) in &signature.chain {
            pk.verify(&next_pk.to_bytes(), sig)?;
            pk = next_pk;
        }
        pk.verify(message, &signature.message_sig)
    }

    /// Wire form: `u32(L) || lms_public_key`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + self.lms_pub.algorithm().pub_len());
        out.extend_from_slice(&self.levels.to_be_bytes());
        out.extend_from_slice(&self.lms_pub.to_bytes());
        out
    }
}

impl TryFrom<&[u8]> for VerifyingKey {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 4 {
            return Err(Error::Parse("HSS public key"));
        }
        let levels = u32::from_be_bytes(bytes[..4].try_into().expect("ok"));
        if levels < 1 || levels > MAX_LEVELS {
            return Err(Error::Parse("HSS public key"));
        }
        let lms_pub = lms::VerifyingKey::try_from(&bytes[4..])?;
        Ok(VerifyingKey { levels, lms_pub })
    }
}

impl signature::Verifier<Signature> for VerifyingKey {
    fn verify(&self, msg: &[u8], signature: &Signature) -> core::result::Result<(), signature::Error> {
        self.verify(msg, signature).map_err(signature::Error::from)
    }
}

impl Signature {
    /// The chained (signature, next-layer public key) pairs, topmost first.
    pub fn chain(&self) -> &[(lms::Signature, lms::VerifyingKey)] {
        &self.chain
    }

    /// The deepest layer's signature over the message itself.
    pub fn message_signature(&self) -> &lms::Signature {
        &self.message_sig
    }

    /// Wire form: `u32(L-1) || (sig_i || pub_{i+1})* || sig_{L-1}`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&(self.chain.len() as u32).to_be_bytes());
        for (sig, pk) in &self.chain {
            out.extend_from_slice(&sig.to_bytes());
            out.extend_from_slice(&pk.to_bytes());
        }
        out.extend_from_slice(&self.message_sig.to_bytes());
        out
    }
}

/// Tries to parse a [`Signature`] from an exact slice, walking the chain and
/// deriving every length from the embedded typecodes.
impl TryFrom<&[u8]> for Signature {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 4 {
            return Err(Error::Parse("HSS signature"));
        }
        let nspk = u32::from_be_bytes(bytes[..4].try_into().expect("ok"));
        if nspk >= MAX_LEVELS {
            return Err(Error::Parse("HSS signature"));
        }
        let mut rest = &bytes[4..];
        let mut chain = Vec::with_capacity(nspk as usize);
        for _ in 0..nspk {
            let (sig, after_sig) = lms::Signature::split_parse(rest)?;
            let (pk, after_pk) = lms::VerifyingKey::split_parse(after_sig)?;
            chain.push((sig, pk));
            rest = after_pk;
        }
        let (message_sig, rest) = lms::Signature::split_parse(rest)?;
        if !rest.is_empty() {
            return Err(Error::Parse("HSS signature"));
        }
        Ok(Signature {
            chain,
            message_sig,
        })
    }
}

impl From<Signature> for Vec<u8> {
    fn from(sig: Signature) -> Vec<u8> {
        sig.to_bytes()
    }
}

impl signature::SignatureEncoding for Signature {
    type Repr = Vec<u8>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::thread_rng;

    #[test]
    fn test_sign_and_verify_two_levels() {
        let mut rng = thread_rng();
        let mut sk = SigningKey::new(
            LmsAlgorithm::LmsSha256M32H5,
            LmsOtsAlgorithm::LmsOtsSha256N32W4,
            2,
            &mut rng,
        )
        .unwrap();
        let pk = sk.public();

        let msg = b"hierarchies of trees";
        let sig = sk.sign(&mut rng, msg).unwrap();
        assert!(pk.verify(msg, &sig).is_ok());

        // wrong message fails
        assert!(pk.verify(b"other message", &sig).is_err());
    }

    #[test]
    fn test_signature_round_trip() {
        let mut rng = thread_rng();
        let mut sk = SigningKey::new(
            LmsAlgorithm::LmsSha256M32H5,
            LmsOtsAlgorithm::LmsOtsSha256N32W8,
            2,
            &mut rng,
        )
        .unwrap();
        let pk = sk.public();
        let sig = sk.sign(&mut rng, b"round trip").unwrap();
        let sig2 = Signature::try_from(sig.to_bytes().as_slice()).unwrap();
        assert_eq!(sig, sig2);
        assert!(pk.verify(b"round trip", &sig2).is_ok());
    }

    #[test]
    fn test_level_bounds() {
        let mut rng = thread_rng();
        assert!(SigningKey::new(
            LmsAlgorithm::LmsSha256M32H5,
            LmsOtsAlgorithm::LmsOtsSha256N32W8,
            0,
            &mut rng,
        )
        .is_err());
        assert!(SigningKey::new(
            LmsAlgorithm::LmsSha256M32H5,
            LmsOtsAlgorithm::LmsOtsSha256N32W8,
            9,
            &mut rng,
        )
        .is_err());
    }

    #[test]
    fn test_public_key_round_trip() {
        let mut rng = thread_rng();
        let sk = SigningKey::new(
            LmsAlgorithm::LmsSha256M32H5,
            LmsOtsAlgorithm::LmsOtsSha256N32W8,
            3,
            &mut rng,
        )
        .unwrap();
        let pk = sk.public();
        let bytes = pk.to_bytes();
        assert_eq!(bytes.len(), 4 + 56);
        let pk2 = VerifyingKey::try_from(bytes.as_slice()).unwrap();
        assert_eq!(pk, pk2);
    }
}
