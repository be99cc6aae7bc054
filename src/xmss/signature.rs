//! Contains the XMSS [`Signature`] type

use crate::error::{Error, Result};
use crate::xmss::params::XmssAlgorithm;

/// An XMSS signature: the leaf index, the randomizer `r`, the WOTS+
/// signature and the authentication path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    alg: XmssAlgorithm,
    idx: u32,
    r: Vec<u8>,
    wots_sig: Vec<Vec<u8>>,
    auth: Vec<Vec<u8>>,
}

impl Signature {
    pub(crate) fn from_parts(
        alg: XmssAlgorithm,
        idx: u32,
        r: Vec<u8>,
        wots_sig: Vec<Vec<u8>>,
        auth: Vec<Vec<u8>>,
    ) -> Self {
        Signature {
            alg,
            idx,
            r,
            wots_sig,
            auth,
        }
    }

    /// The parameter set this signature was issued under.
    pub fn algorithm(&self) -> XmssAlgorithm {
        self.alg
    }

    /// The leaf index this signature was issued at.
    pub fn idx(&self) -> u32 {
        self.idx
    }

    /// The randomizer `r` fed into the message hash.
    pub fn r(&self) -> &[u8] {
        &self.r
    }

    pub(crate) fn wots_sig(&self) -> &[Vec<u8>] {
        &self.wots_sig
    }

    pub(crate) fn auth(&self) -> &[Vec<u8>] {
        &self.auth
    }

    /// Wire form: `u32(idx) || r || wots_sig || auth_path`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.alg.sig_len());
        out.extend_from_slice(&self.idx.to_be_bytes());
        out.extend_from_slice(&self.r);
        for chain in &self.wots_sig {
            out.extend_from_slice(chain);
        }
        for node in &self.auth {
            out.extend_from_slice(node);
        }
        out
    }

    /// Parses a signature for the given parameter set; the wire form carries
    /// no typecode, so the length must match `alg` exactly.
    pub fn from_bytes(alg: XmssAlgorithm, bytes: &[u8]) -> Result<Self> {
        if bytes.len() != alg.sig_len() {
            return Err(Error::Parse("XMSS signature"));
        }
        let n = alg.n();
        let idx = u32::from_be_bytes(bytes[..4].try_into().expect("ok"));
        if idx >= alg.leaves() {
            return Err(Error::Parse("XMSS signature"));
        }
        let r = bytes[4..4 + n].to_vec();
        let rest = &bytes[4 + n..];
        let wots_sig = rest[..alg.len() * n]
            .chunks_exact(n)
            .map(<[u8]>::to_vec)
            .collect();
        let auth = rest[alg.len() * n..]
            .chunks_exact(n)
            .map(<[u8]>::to_vec)
            .collect();
        Ok(Signature {
            alg,
            idx,
            r,
            wots_sig,
            auth,
        })
    }
}

impl From<Signature> for Vec<u8> {
    fn from(sig: Signature) -> Vec<u8> {
        sig.to_bytes()
    }
}
