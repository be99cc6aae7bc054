//! Keyed hash framing for the XMSS family.
//!
//! Every call is `hash(toByte(id, n) || key || message)` where the function
//! id selects the domain: `F = 0`, `H = 1`, `H_msg = 2`, `PRF = 3`.

use digest::{Digest, ExtendableOutput, Update, XofReader};
use sha2::{Sha256, Sha512};
use sha3::{Shake128, Shake256};
use zeroize::Zeroize;

use crate::xmss::address::Adrs;
use crate::xmss::params::HashFamily;

const FN_F: u64 = 0;
const FN_H: u64 = 1;
const FN_HMSG: u64 = 2;
const FN_PRF: u64 = 3;

/// `toByte(x, len)`: `x` as `len` big-endian bytes.
pub(crate) fn to_bytes(x: u64, len: usize) -> Vec<u8> {
    let mut out = vec![0u8; len];
    let be = x.to_be_bytes();
    let copy = len.min(8);
    out[len - copy..].copy_from_slice(&be[8 - copy..]);
    out
}

pub(crate) fn xor(x: &[u8], y: &[u8]) -> Vec<u8> {
    x.iter().zip(y).map(|(a, b)| a ^ b).collect()
}

fn keyed_hash(family: HashFamily, id: u64, key: &[u8], message: &[u8]) -> Vec<u8> {
    let n = family.n();
    let mut buf = Vec::with_capacity(2 * n + message.len());
    buf.extend_from_slice(&to_bytes(id, n));
    buf.extend_from_slice(key);
    buf.extend_from_slice(message);
    let out = match family {
        HashFamily::Sha2W256 => Sha256::digest(&buf).to_vec(),
        HashFamily::Sha2W512 => Sha512::digest(&buf).to_vec(),
        HashFamily::Shake128 => {
            let mut hasher = Shake128::default();
            hasher.update(&buf);
            let mut out = vec![0u8; n];
            hasher.finalize_xof().read(&mut out);
            out
        }
        HashFamily::Shake256 => {
            let mut hasher = Shake256::default();
            hasher.update(&buf);
            let mut out = vec![0u8; n];
            hasher.finalize_xof().read(&mut out);
            out
        }
    };
    buf.zeroize();
    out
}

/// The chaining function `F`.
pub(crate) fn f(family: HashFamily, key: &[u8], message: &[u8]) -> Vec<u8> {
    keyed_hash(family, FN_F, key, message)
}

/// The node-combining function `H`.
pub(crate) fn h(family: HashFamily, key: &[u8], message: &[u8]) -> Vec<u8> {
    keyed_hash(family, FN_H, key, message)
}

/// The message-compression function `H_msg`.
pub(crate) fn h_msg(family: HashFamily, key: &[u8], message: &[u8]) -> Vec<u8> {
    keyed_hash(family, FN_HMSG, key, message)
}

/// The pseudorandom function `PRF`.
pub(crate) fn prf(family: HashFamily, key: &[u8], message: &[u8]) -> Vec<u8> {
    keyed_hash(family, FN_PRF, key, message)
}

/// The randomized tree hash: `H((left ^ bm0) || (right ^ bm1), key)` with
/// the key and both bitmasks drawn from `PRF(seed, adrs)` at keyAndMask
/// values 0, 1, 2.
pub(crate) fn rand_hash(
    family: HashFamily,
    left: &[u8],
    right: &[u8],
    seed: &[u8],
    adrs: &mut Adrs,
) -> Vec<u8> {
    adrs.set_key_and_mask(0);
    let key = prf(family, seed, adrs.as_bytes());
    adrs.set_key_and_mask(1);
    let bm0 = prf(family, seed, adrs.as_bytes());
    adrs.set_key_and_mask(2);
    let bm1 = prf(family, seed, adrs.as_bytes());
    adrs.set_key_and_mask(0);

    let mut message = xor(left, &bm0);
    message.extend_from_slice(&xor(right, &bm1));
    h(family, &key, &message)
}

/// Derives the per-leaf WOTS+ secret seed: `PRF(skseed, adrs)` with the
/// chain, hash and keyAndMask words zeroed.
pub(crate) fn ots_seed(family: HashFamily, skseed: &[u8], adrs: &mut Adrs) -> Vec<u8> {
    adrs.set_chain(0);
    adrs.set_hash(0);
    adrs.set_key_and_mask(0);
    prf(family, skseed, adrs.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_bytes_widths() {
        assert_eq!(to_bytes(0x0102, 4), vec![0, 0, 1, 2]);
        assert_eq!(to_bytes(3, 32)[31], 3);
        assert!(to_bytes(3, 32)[..31].iter().all(|&b| b == 0));
        assert_eq!(to_bytes(u64::MAX, 2), vec![0xff, 0xff]);
    }

    #[test]
    fn output_lengths_follow_family() {
        for family in [
            HashFamily::Sha2W256,
            HashFamily::Sha2W512,
            HashFamily::Shake128,
            HashFamily::Shake256,
        ] {
            let key = vec![7u8; family.n()];
            assert_eq!(prf(family, &key, &[0u8; 32]).len(), family.n());
            assert_eq!(f(family, &key, &key).len(), family.n());
        }
    }

    #[test]
    fn domains_are_separated() {
        let family = HashFamily::Sha2W256;
        let key = [1u8; 32];
        let msg = [2u8; 32];
        assert_ne!(f(family, &key, &msg), h(family, &key, &msg));
        assert_ne!(h(family, &key, &msg), prf(family, &key, &msg));
    }
}
