use digest::Digest;
use sha2::Sha256;

use crate::constants::HASH_LEN;
use crate::lmots::modes::LmsOtsAlgorithm;
use crate::types::Identifier;

/// Returns an iterator over the w-bit Winternitz coefficients of the input
/// bytes, the Coef function of RFC 8554 section 3.1.3.
pub(crate) fn coefs<'a>(
    bytes: impl IntoIterator<Item = &'a u8>,
    w: usize,
) -> impl Iterator<Item = u8> {
    let mask: u8 = ((1u16 << w) - 1) as u8;
    let entries_per_byte = 8 / w;
    bytes
        .into_iter()
        .copied()
        .flat_map(move |byte| (0..entries_per_byte).map(move |i| (byte >> (8 - w - i * w)) & mask))
}

/// The checksum of RFC 8554 section 4.4: the sum of the negated message
/// coefficients, shifted into position.
pub(crate) fn checksum(alg: LmsOtsAlgorithm, digest: &[u8; HASH_LEN]) -> u16 {
    let w = alg.w();
    let sum: u32 = coefs(digest, w)
        .take(alg.u())
        .map(|c| ((1u32 << w) - 1) - u32::from(c))
        .sum();
    (sum << alg.ls()) as u16
}

/// Expands a message digest into its `p` signing coefficients:
/// `Coef(Q || u16(cksm(Q)), i, w)` for `i` in `0..p`.
pub(crate) fn digits(alg: LmsOtsAlgorithm, digest: &[u8; HASH_LEN]) -> Vec<u8> {
    let mut buf = [0u8; HASH_LEN + 2];
    buf[..HASH_LEN].copy_from_slice(digest);
    buf[HASH_LEN..].copy_from_slice(&checksum(alg, digest).to_be_bytes());
    coefs(&buf, alg.w()).take(alg.p()).collect()
}

/// Walks one Winternitz chain: applies the iteration hash for step indices
/// `from..to`, starting from `value`.
pub(crate) fn chain(
    id: &Identifier,
    q: u32,
    i: u16,
    from: u8,
    to: u8,
    value: &[u8; HASH_LEN],
) -> [u8; HASH_LEN] {
    let mut tmp = *value;
    for j in from..to {
        tmp = Sha256::new()
            .chain_update(id)
            .chain_update(q.to_be_bytes())
            .chain_update(i.to_be_bytes())
            .chain_update([j])
            .chain_update(tmp)
            .finalize()
            .into();
    }
    tmp
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coef_test_w1() {
        let s = [0x12, 0x34];
        let cs = coefs(&s, 1).collect::<Vec<_>>();
        assert_eq!(cs, vec![0, 0, 0, 1, 0, 0, 1, 0, 0, 0, 1, 1, 0, 1, 0, 0]);
    }

    #[test]
    fn coef_test_w2() {
        let s = [0x12, 0x34];
        let cs = coefs(&s, 2).collect::<Vec<_>>();
        assert_eq!(cs, vec![0, 1, 0, 2, 0, 3, 1, 0]);
    }

    #[test]
    fn coef_test_w4() {
        let s = [0x12, 0x34];
        let cs = coefs(&s, 4).collect::<Vec<_>>();
        assert_eq!(cs, vec![1, 2, 3, 4]);
    }

    #[test]
    fn coef_test_w8() {
        let s = [0x12, 0x34];
        let cs = coefs(&s, 8).collect::<Vec<_>>();
        assert_eq!(cs, vec![0x12, 0x34]);
    }

    #[test]
    fn checksum_zero_w1() {
        let digest = [0u8; HASH_LEN];
        let d = digits(LmsOtsAlgorithm::LmsOtsSha256N32W1, &digest);
        // all-zero message: checksum is 256 << 7 = 0x8000
        assert_eq!(&d[256..], &[1, 0, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn checksum_ones_w1() {
        let digest = [0xff; HASH_LEN];
        let d = digits(LmsOtsAlgorithm::LmsOtsSha256N32W1, &digest);
        assert_eq!(&d[256..], &[0, 0, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn checksum_ten_w4() {
        let digest = [0xaa; HASH_LEN];
        let d = digits(LmsOtsAlgorithm::LmsOtsSha256N32W4, &digest);
        assert_eq!(&d[64..], &[0x01, 0x04, 0x00]);
    }

    #[test]
    fn digits_zero_w8() {
        let digest = [0u8; HASH_LEN];
        let d = digits(LmsOtsAlgorithm::LmsOtsSha256N32W8, &digest);
        let mut expected = vec![0u8; 34];
        expected[32] = 0x1f;
        expected[33] = 0xe0;
        assert_eq!(d, expected);
    }
}
