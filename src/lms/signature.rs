//! Contains the LMS [`Signature`] type

use crate::constants::HASH_LEN;
use crate::error::{Error, Result};
use crate::lmots;
use crate::lms::modes::LmsAlgorithm;

/// An LMS signature: the leaf number, the LM-OTS signature of that leaf and
/// the authentication path to the root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    q: u32,
    ots_sig: lmots::Signature,
    lms: LmsAlgorithm,
    path: Vec<[u8; HASH_LEN]>,
}

impl Signature {
    pub(crate) fn from_parts(
        q: u32,
        ots_sig: lmots::Signature,
        lms: LmsAlgorithm,
        path: Vec<[u8; HASH_LEN]>,
    ) -> Self {
        Signature {
            q,
            ots_sig,
            lms,
            path,
        }
    }

    /// The leaf number this signature was issued at.
    pub fn q(&self) -> u32 {
        self.q
    }

    /// The LMS parameter set embedded in the signature.
    pub fn algorithm(&self) -> LmsAlgorithm {
        self.lms
    }

    /// The embedded LM-OTS signature.
    pub fn ots_signature(&self) -> &lmots::Signature {
        &self.ots_sig
    }

    /// The authentication path, one node per tree level.
    pub fn path(&self) -> &[[u8; HASH_LEN]] {
        &self.path
    }

    /// The serialized length for the embedded parameter sets.
    pub fn encoded_len(&self) -> usize {
        8 + self.ots_sig.algorithm().sig_len() + self.lms.m() * self.lms.h() as usize
    }

    /// Wire form: `u32(q) || ots_signature || u32(lmstype) || path`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        out.extend_from_slice(&self.q.to_be_bytes());
        out.extend_from_slice(&self.ots_sig.to_bytes());
        out.extend_from_slice(&self.lms.typecode().to_be_bytes());
        for node in &self.path {
            out.extend_from_slice(node);
        }
        out
    }

    /// Parses the leading LMS signature off `bytes`, returning the rest.
    /// Follows the validations in algorithm 6a of RFC 8554; all lengths are
    /// derived from the embedded typecodes.
    pub(crate) fn split_parse(bytes: &[u8]) -> Result<(Self, &[u8])> {
        if bytes.len() < 8 {
            return Err(Error::Parse("LMS signature"));
        }
        let q = u32::from_be_bytes(bytes[..4].try_into().expect("ok"));
        let (ots_sig, rest) = lmots::Signature::split_parse(&bytes[4..])?;
        if rest.len() < 4 {
            return Err(Error::Parse("LMS signature"));
        }
        let lms =
            LmsAlgorithm::from_typecode(u32::from_be_bytes(rest[..4].try_into().expect("ok")))?;
        if q >= lms.leaves() {
            return Err(Error::Parse("LMS signature"));
        }
        let path_len = lms.m() * lms.h() as usize;
        let rest = &rest[4..];
        if rest.len() < path_len {
            return Err(Error::Parse("LMS signature"));
        }
        let path = rest[..path_len]
            .chunks_exact(HASH_LEN)
            .map(|chunk| chunk.try_into().expect("m-byte chunk"))
            .collect();
        Ok((
            Signature {
                q,
                ots_sig,
                lms,
                path,
            },
            &rest[path_len..],
        ))
    }
}

/// Tries to parse a [`Signature`] from an exact slice
impl TryFrom<&[u8]> for Signature {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        let (sig, rest) = Signature::split_parse(bytes)?;
        if !rest.is_empty() {
            return Err(Error::Parse("LMS signature"));
        }
        Ok(sig)
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
