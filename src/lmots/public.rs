//! Contains the LM-OTS [`VerifyingKey`]

use subtle::ConstantTimeEq;

use crate::constants::{HASH_LEN, ID_LEN};
use crate::error::{Error, Result};
use crate::lmots::modes::LmsOtsAlgorithm;
use crate::lmots::signature::Signature;
use crate::types::Identifier;

/// An LM-OTS verifying key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifyingKey {
    alg: LmsOtsAlgorithm,
    q: u32,
    id: Identifier,
    k: [u8; HASH_LEN],
}

impl VerifyingKey {
    pub(crate) fn from_parts(
        alg: LmsOtsAlgorithm,
        q: u32,
        id: Identifier,
        k: [u8; HASH_LEN],
    ) -> Self {
        VerifyingKey { alg, q, id, k }
    }

    /// The parameter set this key was generated for.
    pub fn algorithm(&self) -> LmsOtsAlgorithm {
        self.alg
    }

    /// The leaf number this key is bound to.
    pub fn q(&self) -> u32 {
        self.q
    }

    /// The 16-byte identifier `I`.
    pub fn id(&self) -> &Identifier {
        &self.id
    }

    /// The hashed public key value `K`.
    pub fn k(&self) -> &[u8; HASH_LEN] {
        &self.k
    }

    /// Basic sanity checks; all fields are length-checked by construction.
    pub fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Verifies `signature` over `message` by recomputing the public-key
    /// candidate `Kc` (RFC 8554 algorithm 4a/4b).
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<()> {
        self.validate()?;
        if signature.algorithm() != self.alg {
            return Err(Error::InvalidSignature);
        }
        let kc = signature.candidate(&self.id, self.q, message);
        if bool::from(kc.ct_eq(&self.k)) {
            Ok(())
        } else {
            Err(Error::InvalidSignature)
        }
    }

    /// Wire form: `u32(otstype) || I || u32(q) || K`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.alg.pub_len());
        out.extend_from_slice(&self.alg.typecode().to_be_bytes());
        out.extend_from_slice(&self.id);
        out.extend_from_slice(&self.q.to_be_bytes());
        out.extend_from_slice(&self.k);
        out
    }
}

impl TryFrom<&[u8]> for VerifyingKey {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 4 {
            return Err(Error::Parse("LM-OTS public key"));
        }
        let alg =
            LmsOtsAlgorithm::from_typecode(u32::from_be_bytes(bytes[..4].try_into().expect("ok")))?;
        if bytes.len() != alg.pub_len() {
            return Err(Error::Parse("LM-OTS public key"));
        }
        let id: Identifier = bytes[4..4 + ID_LEN].try_into().expect("ok");
        let q = u32::from_be_bytes(bytes[4 + ID_LEN..8 + ID_LEN].try_into().expect("ok"));
        let k: [u8; HASH_LEN] = bytes[8 + ID_LEN..].try_into().expect("ok");
        Ok(VerifyingKey { alg, q, id, k })
    }
}

impl signature::Verifier<Signature> for VerifyingKey {
    fn verify(&self, msg: &[u8], signature: &Signature) -> core::result::Result<(), signature::Error> {
        self.verify(msg, signature).map_err(signature::Error::from)
    }
}
