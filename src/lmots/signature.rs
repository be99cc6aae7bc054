//! Contains the LM-OTS [`Signature`] type

use digest::Digest;
use sha2::Sha256;

use crate::constants::{D_MESG, D_PBLC, HASH_LEN};
use crate::error::{Error, Result};
use crate::lmots::modes::LmsOtsAlgorithm;
use crate::lmots::util::{chain, digits};
use crate::types::Identifier;

/// An LM-OTS signature: the randomizer `C` followed by the `p` chain values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    alg: LmsOtsAlgorithm,
    c: [u8; HASH_LEN],
    y: Vec<u8>,
}

impl Signature {
    pub(crate) fn from_parts(alg: LmsOtsAlgorithm, c: [u8; HASH_LEN], y: Vec<u8>) -> Self {
        Signature { alg, c, y }
    }

    /// The parameter set embedded in the signature.
    pub fn algorithm(&self) -> LmsOtsAlgorithm {
        self.alg
    }

    /// The randomizer `C`.
    pub fn c(&self) -> &[u8; HASH_LEN] {
        &self.c
    }

    /// The chain values `y[0..p]`, flattened.
    pub fn y(&self) -> &[u8] {
        &self.y
    }

    /// Recomputes the public-key candidate `Kc` from the signature and the
    /// message (RFC 8554 algorithm 4b).
    pub(crate) fn candidate(&self, id: &Identifier, q: u32, message: &[u8]) -> [u8; HASH_LEN] {
        let n = self.alg.n();
        let chain_end = ((1u16 << self.alg.w()) - 1) as u8;

        let q_digest: [u8; HASH_LEN] = Sha256::new()
            .chain_update(id)
            .chain_update(q.to_be_bytes())
            .chain_update(D_MESG)
            .chain_update(self.c)
            .chain_update(message)
            .finalize()
            .into();

        let mut hasher = Sha256::new()
            .chain_update(id)
            .chain_update(q.to_be_bytes())
            .chain_update(D_PBLC);
        for (i, digit) in digits(self.alg, &q_digest).into_iter().enumerate() {
            let y: [u8; HASH_LEN] = self.y[i * n..(i + 1) * n].try_into().expect("n-byte chunk");
            let z = chain(id, q, i as u16, digit, chain_end, &y);
            hasher.update(z);
        }
        hasher.finalize().into()
    }

    /// Wire form: `u32(otstype) || C || y[0] || ... || y[p-1]`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.alg.sig_len());
        out.extend_from_slice(&self.alg.typecode().to_be_bytes());
        out.extend_from_slice(&self.c);
        out.extend_from_slice(&self.y);
        out
    }

    /// Parses the leading LM-OTS signature off `bytes`, returning the
    /// remainder. The typecode is read from the wire and determines the
    /// exact length consumed.
    pub(crate) fn split_parse(bytes: &[u8]) -> Result<(Self, &[u8])> {
        if bytes.len() < 4 {
            return Err(Error::Parse("LM-OTS signature"));
        }
        let alg =
            LmsOtsAlgorithm::from_typecode(u32::from_be_bytes(bytes[..4].try_into().expect("ok")))?;
        let len = alg.sig_len();
        if bytes.len() < len {
            return Err(Error::Parse("LM-OTS signature"));
        }
        let c: [u8; HASH_LEN] = bytes[4..4 + HASH_LEN].try_into().expect("ok");
        let y = bytes[4 + HASH_LEN..len].to_vec();
        Ok((Signature { alg, c, y }, &bytes[len..]))
    }
}

/// Tries to parse a [`Signature`] from an exact slice
impl TryFrom<&[u8]> for Signature {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        let (sig, rest) = Signature::split_parse(bytes)?;
        if !rest.is_empty() {
            return Err(Error::Parse("LM-OTS signature"));
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
