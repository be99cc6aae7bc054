//! WOTS+ one-time signatures over bitmask-randomized hash chains.

use zeroize::Zeroize;

use crate::xmss::address::Adrs;
use crate::xmss::hash::{f, prf, to_bytes, xor};
use crate::xmss::params::WotsAlgorithm;

/// Expands a per-leaf seed into the `len` chain-start secrets,
/// `sk[i] = PRF(seed, toByte(i, 32))`.
pub(crate) fn expand_sk(alg: WotsAlgorithm, seed: &[u8]) -> Vec<Vec<u8>> {
    (0..alg.len() as u64)
        .map(|i| prf(alg.hash(), seed, &to_bytes(i, 32)))
        .collect()
}

/// The chain function: advances `value` through hash iterations
/// `start..start + steps`, each keyed and masked via `PRF(seed, adrs)`.
pub(crate) fn chain(
    alg: WotsAlgorithm,
    value: &[u8],
    start: u32,
    steps: u32,
    seed: &[u8],
    adrs: &mut Adrs,
) -> Vec<u8> {
    let family = alg.hash();
    let mut tmp = value.to_vec();
    for j in start..start + steps {
        adrs.set_hash(j);
        adrs.set_key_and_mask(0);
        let key = prf(family, seed, adrs.as_bytes());
        adrs.set_key_and_mask(1);
        let bm = prf(family, seed, adrs.as_bytes());
        tmp = f(family, &key, &xor(&tmp, &bm));
    }
    adrs.set_hash(0);
    adrs.set_key_and_mask(0);
    tmp
}

/// Interprets `input` as `out_len` base-`w` digits.
pub(crate) fn base_w(alg: WotsAlgorithm, input: &[u8], out_len: usize) -> Vec<u32> {
    let mut digits = Vec::with_capacity(out_len);
    let mut total: u32 = 0;
    let mut bits = 0u32;
    let mut consumed = 0usize;
    for _ in 0..out_len {
        if bits == 0 {
            total = u32::from(input[consumed]);
            consumed += 1;
            bits = 8;
        }
        bits -= alg.lg_w();
        digits.push((total >> bits) & (alg.w() - 1));
    }
    digits
}

/// Maps a message to its `len` chain lengths: the base-`w` digits of the
/// message followed by the digits of the Winternitz checksum.
pub(crate) fn chain_lengths(alg: WotsAlgorithm, message: &[u8]) -> Vec<u32> {
    let mut lengths = base_w(alg, message, alg.len1());
    let mut csum: u32 = lengths.iter().map(|&d| alg.w() - 1 - d).sum();
    csum <<= 8 - ((alg.len2() as u32 * alg.lg_w()) % 8);
    let csum_len = (alg.len2() * alg.lg_w() as usize).div_ceil(8);
    lengths.extend(base_w(
        alg,
        &to_bytes(u64::from(csum), csum_len),
        alg.len2(),
    ));
    lengths
}

/// Derives the public chain ends from the secret chain starts.
pub(crate) fn pk_gen(
    alg: WotsAlgorithm,
    sk: &[Vec<u8>],
    seed: &[u8],
    adrs: &mut Adrs,
) -> Vec<Vec<u8>> {
    let pk = sk
        .iter()
        .enumerate()
        .map(|(i, x)| {
            adrs.set_chain(i as u32);
            chain(alg, x, 0, alg.w() - 1, seed, adrs)
        })
        .collect();
    adrs.set_chain(0);
    pk
}

/// Signs an `n`-byte message digest: chain `i` stops at digit `i`.
pub(crate) fn sign(
    alg: WotsAlgorithm,
    message: &[u8],
    seed_sk: &[u8],
    seed: &[u8],
    adrs: &mut Adrs,
) -> Vec<Vec<u8>> {
    let lengths = chain_lengths(alg, message);
    let mut sk = expand_sk(alg, seed_sk);
    let sig = sk
        .iter()
        .zip(&lengths)
        .enumerate()
        .map(|(i, (x, &steps))| {
            adrs.set_chain(i as u32);
            chain(alg, x, 0, steps, seed, adrs)
        })
        .collect();
    adrs.set_chain(0);
    for x in &mut sk {
        x.zeroize();
    }
    sig
}

/// Recomputes the public chain ends from a signature: chain `i` resumes at
/// digit `i` and runs to `w - 1`.
pub(crate) fn pk_from_sig(
    alg: WotsAlgorithm,
    message: &[u8],
    sig: &[Vec<u8>],
    seed: &[u8],
    adrs: &mut Adrs,
) -> Vec<Vec<u8>> {
    let lengths = chain_lengths(alg, message);
    let pk = sig
        .iter()
        .zip(&lengths)
        .enumerate()
        .map(|(i, (y, &start))| {
            adrs.set_chain(i as u32);
            chain(alg, y, start, alg.w() - 1 - start, seed, adrs)
        })
        .collect();
    adrs.set_chain(0);
    pk
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_w_digits() {
        let alg = WotsAlgorithm::WotspSha2W256;
        assert_eq!(base_w(alg, &[0x12, 0x34], 4), vec![1, 2, 3, 4]);
        assert_eq!(base_w(alg, &[0xff], 2), vec![15, 15]);
    }

    #[test]
    fn chain_lengths_checksum() {
        let alg = WotsAlgorithm::WotspSha2W256;
        let msg = vec![0u8; alg.n()];
        let lengths = chain_lengths(alg, &msg);
        assert_eq!(lengths.len(), alg.len());
        // all-zero message: csum = 64 * 15 = 960, shifted by 4 bits
        assert_eq!(&lengths[alg.len1()..], &[3, 12, 0]);
    }

    #[test]
    fn sign_then_recover_pk() {
        let alg = WotsAlgorithm::WotspSha2W256;
        let seed_sk = vec![0x42u8; alg.n()];
        let seed = vec![0x17u8; alg.n()];
        let msg = vec![0xabu8; alg.n()];

        let mut adrs = Adrs::new();
        let sk = expand_sk(alg, &seed_sk);
        let pk = pk_gen(alg, &sk, &seed, &mut adrs);

        let mut adrs = Adrs::new();
        let sig = sign(alg, &msg, &seed_sk, &seed, &mut adrs);

        let mut adrs = Adrs::new();
        let recovered = pk_from_sig(alg, &msg, &sig, &seed, &mut adrs);
        assert_eq!(pk, recovered);

        let mut adrs = Adrs::new();
        let other = pk_from_sig(alg, &vec![0xacu8; alg.n()], &sig, &seed, &mut adrs);
        assert_ne!(pk, other);
    }
}
