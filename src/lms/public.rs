//! Contains the LMS [`VerifyingKey`]

use digest::Digest;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::constants::{D_INTR, D_LEAF, HASH_LEN, ID_LEN};
use crate::error::{Error, Result};
use crate::lmots;
use crate::lms::modes::LmsAlgorithm;
use crate::lms::signature::Signature;
use crate::types::Identifier;

/// An LMS verifying key: the typecode pair, the identifier `I` and the tree
/// root `T[1]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifyingKey {
    lms: LmsAlgorithm,
    ots: lmots::LmsOtsAlgorithm,
    id: Identifier,
    root: [u8; HASH_LEN],
}

impl VerifyingKey {
    pub(crate) fn from_parts(
        lms: LmsAlgorithm,
        ots: lmots::LmsOtsAlgorithm,
        id: Identifier,
        root: [u8; HASH_LEN],
    ) -> Self {
        VerifyingKey {
            lms,
            ots,
            id,
            root,
        }
    }

    /// The LMS parameter set of this key.
    pub fn algorithm(&self) -> LmsAlgorithm {
        self.lms
    }

    /// The LM-OTS parameter set of the leaves.
    pub fn ots_algorithm(&self) -> lmots::LmsOtsAlgorithm {
        self.ots
    }

    /// The 16-byte identifier `I`.
    pub fn id(&self) -> &Identifier {
        &self.id
    }

    /// The root node `T[1]`.
    pub fn root(&self) -> &[u8; HASH_LEN] {
        &self.root
    }

    /// Basic sanity checks; all fields are length-checked by construction.
    pub fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Verifies `signature` over `message`: recomputes the LM-OTS public-key
    /// candidate, the leaf hash, and walks the authentication path up to a
    /// root candidate (RFC 8554 algorithm 6a).
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<()> {
        self.validate()?;
        if signature.algorithm() != self.lms
            || signature.ots_signature().algorithm() != self.ots
            || signature.q() >= self.lms.leaves()
        {
            return Err(Error::InvalidSignature);
        }

        let candidate = signature
            .ots_signature()
            .candidate(&self.id, signature.q(), message);

        let mut node_num = self.lms.leaves() + signature.q();
        let mut tmp: [u8; HASH_LEN] = Sha256::new()
            .chain_update(self.id)
            .chain_update(node_num.to_be_bytes())
            .chain_update(D_LEAF)
            .chain_update(candidate)
            .finalize()
            .into();

        for node in signature.path() {
            let mut hasher = Sha256::new()
                .chain_update(self.id)
                .chain_update((node_num / 2).to_be_bytes())
                .chain_update(D_INTR);
            if node_num % 2 == 1 {
                hasher.update(node);
                hasher.update(tmp);
            } else {
                hasher.update(tmp);
                hasher.update(node);
            }
            tmp = hasher.finalize().into();
            node_num /= 2;
        }

        if bool::from(tmp.ct_eq(&self.root)) {
            Ok(())
        } else {
            Err(Error::InvalidSignature)
        }
    }

    /// Wire form: `u32(lmstype) || u32(otstype) || I || T[1]`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.lms.pub_len());
        out.extend_from_slice(&self.lms.typecode().to_be_bytes());
        out.extend_from_slice(&self.ots.typecode().to_be_bytes());
        out.extend_from_slice(&self.id);
        out.extend_from_slice(&self.root);
        out
    }

    /// Parses the leading LMS public key off `bytes`, returning the rest.
    pub(crate) fn split_parse(bytes: &[u8]) -> Result<(Self, &[u8])> {
        if bytes.len() < 8 {
            return Err(Error::Parse("LMS public key"));
        }
        let lms =
            LmsAlgorithm::from_typecode(u32::from_be_bytes(bytes[..4].try_into().expect("ok")))?;
        let ots = lmots::LmsOtsAlgorithm::from_typecode(u32::from_be_bytes(
            bytes[4..8].try_into().expect("ok"),
        ))?;
        let len = lms.pub_len();
        if bytes.len() < len {
            return Err(Error::Parse("LMS public key"));
        }
        let id: Identifier = bytes[8..8 + ID_LEN].try_into().expect("ok");
        let root: [u8; HASH_LEN] = bytes[8 + ID_LEN..len].try_into().expect("ok");
        Ok((
            VerifyingKey {
                lms,
                ots,
                id,
                root,
            },
            &bytes[len..],
        ))
    }
}

/// Tries to parse a [`VerifyingKey`] from an exact slice
impl TryFrom<&[u8]> for VerifyingKey {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        let (pk, rest) = VerifyingKey::split_parse(bytes)?;
        if !rest.is_empty() {
            return Err(Error::Parse("LMS public key"));
        }
        Ok(pk)
    }
}

impl signature::Verifier<Signature> for VerifyingKey {
    fn verify(&self, msg: &[u8], signature: &Signature) -> core::result::Result<(), signature::Error> {
        self.verify(msg, signature).map_err(signature::Error::from)
    }
}
