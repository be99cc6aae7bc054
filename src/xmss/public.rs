//! Contains the XMSS [`VerifyingKey`]

use subtle::ConstantTimeEq;

use crate::error::{Error, Result};
use crate::xmss::address::Adrs;
use crate::xmss::hash::{h_msg, to_bytes};
use crate::xmss::params::XmssAlgorithm;
use crate::xmss::signature::Signature;
use crate::xmss::tree::root_from_sig;

/// An XMSS verifying key: the tree root and the public seed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifyingKey {
    alg: XmssAlgorithm,
    root: Vec<u8>,
    seed: Vec<u8>,
}

impl VerifyingKey {
    pub(crate) fn from_parts(alg: XmssAlgorithm, root: Vec<u8>, seed: Vec<u8>) -> Self {
        VerifyingKey { alg, root, seed }
    }

    /// The parameter set of this key.
    pub fn algorithm(&self) -> XmssAlgorithm {
        self.alg
    }

    /// The tree root.
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

    /// Verifies `signature` over `message`: recomputes the randomized
    /// message digest, walks the WOTS+ signature and the authentication path
    /// up to a root candidate and compares it to the stored root.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<()> {
        self.validate()?;
        if signature.algorithm() != self.alg || signature.idx() >= self.alg.leaves() {
            return Err(Error::InvalidSignature);
        }
        let n = self.alg.n();
        let mut key = Vec::with_capacity(3 * n);
        key.extend_from_slice(signature.r());
        key.extend_from_slice(&self.root);
        key.extend_from_slice(&to_bytes(u64::from(signature.idx()), n));
        let digest = h_msg(self.alg.hash(), &key, message);

        let mut adrs = Adrs::new();
        let candidate = root_from_sig(
            self.alg,
            &digest,
            signature.wots_sig(),
            signature.auth(),
            &self.seed,
            signature.idx(),
            &mut adrs,
        );
        if bool::from(candidate.ct_eq(&self.root)) {
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
            return Err(Error::Parse("XMSS public key"));
        }
        let alg =
            XmssAlgorithm::from_typecode(u32::from_be_bytes(bytes[..4].try_into().expect("ok")))?;
        if bytes.len() != alg.pub_len() {
            return Err(Error::Parse("XMSS public key"));
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
