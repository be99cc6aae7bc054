//! WOTS+, XMSS and XMSS^MT parameter registries

use crate::error::{Error, Result};
use static_assertions::const_assert_eq;

/// The hash families underlying the XMSS parameter sets.
///
/// The `n = 32` families frame every call with a 32-byte function-id prefix,
/// the `n = 64` families with a 64-byte prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HashFamily {
    /// SHA-256, `n = 32`
    Sha2W256,
    /// SHA-512, `n = 64`
    Sha2W512,
    /// SHAKE128 with 32 bytes of output
    Shake128,
    /// SHAKE256 with 64 bytes of output
    Shake256,
}

impl HashFamily {
    /// The output (and prefix) length in bytes.
    pub const fn n(self) -> usize {
        match self {
            Self::Sha2W256 | Self::Shake128 => 32,
            Self::Sha2W512 | Self::Shake256 => 64,
        }
    }
}

/// The WOTS+ parameter sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WotsAlgorithm {
    /// `WOTSP-SHA2_256`
    WotspSha2W256 = 0x0100_0001,
    /// `WOTSP-SHA2_512`
    WotspSha2W512 = 0x0200_0002,
    /// `WOTSP-SHAKE_256`
    WotspShake256 = 0x0300_0003,
    /// `WOTSP-SHAKE_512`
    WotspShake512 = 0x0400_0004,
}

impl WotsAlgorithm {
    /// The typecode value of this parameter set.
    pub const fn typecode(self) -> u32 {
        self as u32
    }

    /// The hash family used for chaining and PRF calls.
    pub const fn hash(self) -> HashFamily {
        match self {
            Self::WotspSha2W256 => HashFamily::Sha2W256,
            Self::WotspSha2W512 => HashFamily::Sha2W512,
            Self::WotspShake256 => HashFamily::Shake128,
            Self::WotspShake512 => HashFamily::Shake256,
        }
    }

    /// The chain-value length in bytes.
    pub const fn n(self) -> usize {
        self.hash().n()
    }

    /// The Winternitz parameter; all registered sets use `w = 16`.
    pub const fn w(self) -> u32 {
        16
    }

    /// `log2(w)`
    pub const fn lg_w(self) -> u32 {
        4
    }

    /// The number of message chains: `ceil(8n / lg(w))`.
    pub const fn len1(self) -> usize {
        8 * self.n() / self.lg_w() as usize
    }

    /// The number of checksum chains.
    pub const fn len2(self) -> usize {
        3
    }

    /// The total chain count `len = len1 + len2`.
    pub const fn len(self) -> usize {
        self.len1() + self.len2()
    }
}

// len2 = floor(log2(len1 * (w - 1)) / log2(w)) + 1 collapses to 3 for both
// n = 32 (len1 = 64) and n = 64 (len1 = 128).
const_assert_eq!(WotsAlgorithm::WotspSha2W256.len(), 67);
const_assert_eq!(WotsAlgorithm::WotspSha2W512.len(), 131);

/// The XMSS single-tree parameter sets.
///
/// The `H5` variants only appear as sub-trees of the multi-tree sets but are
/// ordinary parameter sets in their own right.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum XmssAlgorithm {
    /// `XMSS-SHA2_H10_W256`
    XmssSha2H10W256 = 0x0100_0001,
    /// `XMSS-SHA2_H16_W256`
    XmssSha2H16W256 = 0x0200_0002,
    /// `XMSS-SHA2_H20_W256`
    XmssSha2H20W256 = 0x0300_0003,
    /// `XMSS-SHA2_H10_W512`
    XmssSha2H10W512 = 0x0400_0004,
    /// `XMSS-SHA2_H16_W512`
    XmssSha2H16W512 = 0x0500_0005,
    /// `XMSS-SHA2_H20_W512`
    XmssSha2H20W512 = 0x0600_0006,
    /// `XMSS-SHAKE_H10_W256`
    XmssShakeH10W256 = 0x0700_0007,
    /// `XMSS-SHAKE_H16_W256`
    XmssShakeH16W256 = 0x0800_0008,
    /// `XMSS-SHAKE_H20_W256`
    XmssShakeH20W256 = 0x0900_0009,
    /// `XMSS-SHAKE_H10_W512`
    XmssShakeH10W512 = 0x0a00_000a,
    /// `XMSS-SHAKE_H16_W512`
    XmssShakeH16W512 = 0x0b00_000b,
    /// `XMSS-SHAKE_H20_W512`
    XmssShakeH20W512 = 0x0c00_000c,
    /// `XMSS-SHA2_H5_W256`
    XmssSha2H5W256 = 0x0d00_000d,
    /// `XMSS-SHA2_H5_W512`
    XmssSha2H5W512 = 0x0e00_000e,
    /// `XMSS-SHAKE_H5_W256`
    XmssShakeH5W256 = 0x0f00_000f,
    /// `XMSS-SHAKE_H5_W512`
    XmssShakeH5W512 = 0x1000_0010,
}

impl XmssAlgorithm {
    /// The typecode value of this parameter set.
    pub const fn typecode(self) -> u32 {
        self as u32
    }

    /// Looks a typecode up in the registry.
    pub fn from_typecode(typecode: u32) -> Result<Self> {
        match typecode {
            0x0100_0001 => Ok(Self::XmssSha2H10W256),
            0x0200_0002 => Ok(Self::XmssSha2H16W256),
            0x0300_0003 => Ok(Self::XmssSha2H20W256),
            0x0400_0004 => Ok(Self::XmssSha2H10W512),
            0x0500_0005 => Ok(Self::XmssSha2H16W512),
            0x0600_0006 => Ok(Self::XmssSha2H20W512),
            0x0700_0007 => Ok(Self::XmssShakeH10W256),
            0x0800_0008 => Ok(Self::XmssShakeH16W256),
            0x0900_0009 => Ok(Self::XmssShakeH20W256),
            0x0a00_000a => Ok(Self::XmssShakeH10W512),
            0x0b00_000b => Ok(Self::XmssShakeH16W512),
            0x0c00_000c => Ok(Self::XmssShakeH20W512),
            0x0d00_000d => Ok(Self::XmssSha2H5W256),
            0x0e00_000e => Ok(Self::XmssSha2H5W512),
            0x0f00_000f => Ok(Self::XmssShakeH5W256),
            0x1000_0010 => Ok(Self::XmssShakeH5W512),
            other => Err(Error::InvalidTypecode(other)),
        }
    }

    /// The WOTS+ parameter set of the leaves.
    pub const fn wots(self) -> WotsAlgorithm {
        match self {
            Self::XmssSha2H10W256
            | Self::XmssSha2H16W256
            | Self::XmssSha2H20W256
            | Self::XmssSha2H5W256 => WotsAlgorithm::WotspSha2W256,
            Self::XmssSha2H10W512
            | Self::XmssSha2H16W512
            | Self::XmssSha2H20W512
            | Self::XmssSha2H5W512 => WotsAlgorithm::WotspSha2W512,
            Self::XmssShakeH10W256
            | Self::XmssShakeH16W256
            | Self::XmssShakeH20W256
            | Self::XmssShakeH5W256 => WotsAlgorithm::WotspShake256,
            Self::XmssShakeH10W512
            | Self::XmssShakeH16W512
            | Self::XmssShakeH20W512
            | Self::XmssShakeH5W512 => WotsAlgorithm::WotspShake512,
        }
    }

    /// The hash family of this parameter set.
    pub const fn hash(self) -> HashFamily {
        self.wots().hash()
    }

    /// The node and seed length in bytes.
    pub const fn n(self) -> usize {
        self.hash().n()
    }

    /// The WOTS+ chain count.
    pub const fn len(self) -> usize {
        self.wots().len()
    }

    /// The tree height.
    pub const fn h(self) -> u32 {
        match self {
            Self::XmssSha2H5W256
            | Self::XmssSha2H5W512
            | Self::XmssShakeH5W256
            | Self::XmssShakeH5W512 => 5,
            Self::XmssSha2H10W256 | Self::XmssSha2H10W512 | Self::XmssShakeH10W256
            | Self::XmssShakeH10W512 => 10,
            Self::XmssSha2H16W256 | Self::XmssSha2H16W512 | Self::XmssShakeH16W256
            | Self::XmssShakeH16W512 => 16,
            Self::XmssSha2H20W256 | Self::XmssSha2H20W512 | Self::XmssShakeH20W256
            | Self::XmssShakeH20W512 => 20,
        }
    }

    /// The number of leaves, `2^h`.
    pub const fn leaves(self) -> u32 {
        1 << self.h()
    }

    /// The length of a serialized signature:
    /// `u32(idx) || r || wots_sig || auth_path`.
    pub const fn sig_len(self) -> usize {
        4 + self.n() + self.len() * self.n() + self.h() as usize * self.n()
    }

    /// The length of a serialized public key: `u32(oid) || root || seed`.
    pub const fn pub_len(self) -> usize {
        4 + 2 * self.n()
    }
}

const_assert_eq!(XmssAlgorithm::XmssSha2H10W256.sig_len(), 2500);
const_assert_eq!(XmssAlgorithm::XmssSha2H10W256.pub_len(), 68);

/// The XMSS^MT multi-tree parameter sets: an underlying XMSS sub-tree type
/// and a layer count `d`; the total height is `H = d * h`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum XmssMtAlgorithm {
    /// `XMSSMT-SHA2_H20_D2_W256`
    XmssMtSha2H20D2W256 = 0x0100_0001,
    /// `XMSSMT-SHA2_H20_D4_W256`
    XmssMtSha2H20D4W256 = 0x0200_0002,
    /// `XMSSMT-SHA2_H40_D2_W256`
    XmssMtSha2H40D2W256 = 0x0300_0003,
    /// `XMSSMT-SHA2_H40_D4_W256`
    XmssMtSha2H40D4W256 = 0x0400_0004,
    /// `XMSSMT-SHA2_H40_D8_W256`
    XmssMtSha2H40D8W256 = 0x0500_0005,
    /// `XMSSMT-SHA2_H60_D3_W256`
    XmssMtSha2H60D3W256 = 0x0600_0006,
    /// `XMSSMT-SHA2_H60_D6_W256`
    XmssMtSha2H60D6W256 = 0x0700_0007,
    /// `XMSSMT-SHA2_H60_D12_W256`
    XmssMtSha2H60D12W256 = 0x0800_0008,
    /// `XMSSMT-SHA2_H20_D2_W512`
    XmssMtSha2H20D2W512 = 0x0900_0009,
    /// `XMSSMT-SHA2_H20_D4_W512`
    XmssMtSha2H20D4W512 = 0x0a00_000a,
    /// `XMSSMT-SHA2_H40_D2_W512`
    XmssMtSha2H40D2W512 = 0x0b00_000b,
    /// `XMSSMT-SHA2_H40_D4_W512`
    XmssMtSha2H40D4W512 = 0x0c00_000c,
    /// `XMSSMT-SHA2_H40_D8_W512`
    XmssMtSha2H40D8W512 = 0x0d00_000d,
    /// `XMSSMT-SHA2_H60_D3_W512`
    XmssMtSha2H60D3W512 = 0x0e00_000e,
    /// `XMSSMT-SHA2_H60_D6_W512`
    XmssMtSha2H60D6W512 = 0x0f00_000f,
    /// `XMSSMT-SHA2_H60_D12_W512`
    XmssMtSha2H60D12W512 = 0x0101_0101,
    /// `XMSSMT-SHAKE_H20_D2_W256`
    XmssMtShakeH20D2W256 = 0x0201_0102,
    /// `XMSSMT-SHAKE_H20_D4_W256`
    XmssMtShakeH20D4W256 = 0x0301_0103,
    /// `XMSSMT-SHAKE_H40_D2_W256`
    XmssMtShakeH40D2W256 = 0x0401_0104,
    /// `XMSSMT-SHAKE_H40_D4_W256`
    XmssMtShakeH40D4W256 = 0x0501_0105,
    /// `XMSSMT-SHAKE_H40_D8_W256`
    XmssMtShakeH40D8W256 = 0x0601_0106,
    /// `XMSSMT-SHAKE_H60_D3_W256`
    XmssMtShakeH60D3W256 = 0x0701_0107,
    /// `XMSSMT-SHAKE_H60_D6_W256`
    XmssMtShakeH60D6W256 = 0x0801_0108,
    /// `XMSSMT-SHAKE_H60_D12_W256`
    XmssMtShakeH60D12W256 = 0x0901_0109,
    /// `XMSSMT-SHAKE_H20_D2_W512`
    XmssMtShakeH20D2W512 = 0x0a01_010a,
    /// `XMSSMT-SHAKE_H20_D4_W512`
    XmssMtShakeH20D4W512 = 0x0b01_010b,
    /// `XMSSMT-SHAKE_H40_D2_W512`
    XmssMtShakeH40D2W512 = 0x0c01_010c,
    /// `XMSSMT-SHAKE_H40_D4_W512`
    XmssMtShakeH40D4W512 = 0x0d01_010d,
    /// `XMSSMT-SHAKE_H40_D8_W512`
    XmssMtShakeH40D8W512 = 0x0e01_010e,
    /// `XMSSMT-SHAKE_H60_D3_W512`
    XmssMtShakeH60D3W512 = 0x0f01_010f,
    /// `XMSSMT-SHAKE_H60_D6_W512`
    XmssMtShakeH60D6W512 = 0x0102_0201,
    /// `XMSSMT-SHAKE_H60_D12_W512`
    XmssMtShakeH60D12W512 = 0x0202_0202,
}

impl XmssMtAlgorithm {
    /// The typecode value of this parameter set.
    pub const fn typecode(self) -> u32 {
        self as u32
    }

    /// Looks a typecode up in the registry.
    pub fn from_typecode(typecode: u32) -> Result<Self> {
        match typecode {
            0x0100_0001 => Ok(Self::XmssMtSha2H20D2W256),
            0x0200_0002 => Ok(Self::XmssMtSha2H20D4W256),
            0x0300_0003 => Ok(Self::XmssMtSha2H40D2W256),
            0x0400_0004 => Ok(Self::XmssMtSha2H40D4W256),
            0x0500_0005 => Ok(Self::XmssMtSha2H40D8W256),
            0x0600_0006 => Ok(Self::XmssMtSha2H60D3W256),
            0x0700_0007 => Ok(Self::XmssMtSha2H60D6W256),
            0x0800_0008 => Ok(Self::XmssMtSha2H60D12W256),
            0x0900_0009 => Ok(Self::XmssMtSha2H20D2W512),
            0x0a00_000a => Ok(Self::XmssMtSha2H20D4W512),
            0x0b00_000b => Ok(Self::XmssMtSha2H40D2W512),
            0x0c00_000c => Ok(Self::XmssMtSha2H40D4W512),
            0x0d00_000d => Ok(Self::XmssMtSha2H40D8W512),
            0x0e00_000e => Ok(Self::XmssMtSha2H60D3W512),
            0x0f00_000f => Ok(Self::XmssMtSha2H60D6W512),
            0x0101_0101 => Ok(Self::XmssMtSha2H60D12W512),
            0x0201_0102 => Ok(Self::XmssMtShakeH20D2W256),
            0x0301_0103 => Ok(Self::XmssMtShakeH20D4W256),
            0x0401_0104 => Ok(Self::XmssMtShakeH40D2W256),
            0x0501_0105 => Ok(Self::XmssMtShakeH40D4W256),
            0x0601_0106 => Ok(Self::XmssMtShakeH40D8W256),
            0x0701_0107 => Ok(Self::XmssMtShakeH60D3W256),
            0x0801_0108 => Ok(Self::XmssMtShakeH60D6W256),
            0x0901_0109 => Ok(Self::XmssMtShakeH60D12W256),
            0x0a01_010a => Ok(Self::XmssMtShakeH20D2W512),
            0x0b01_010b => Ok(Self::XmssMtShakeH20D4W512),
            0x0c01_010c => Ok(Self::XmssMtShakeH40D2W512),
            0x0d01_010d => Ok(Self::XmssMtShakeH40D4W512),
            0x0e01_010e => Ok(Self::XmssMtShakeH40D8W512),
            0x0f01_010f => Ok(Self::XmssMtShakeH60D3W512),
            0x0102_0201 => Ok(Self::XmssMtShakeH60D6W512),
            0x0202_0202 => Ok(Self::XmssMtShakeH60D12W512),
            other => Err(Error::InvalidTypecode(other)),
        }
    }

    /// The XMSS parameter set of each sub-tree.
    pub const fn xmss(self) -> XmssAlgorithm {
        match self {
            Self::XmssMtSha2H20D2W256 => XmssAlgorithm::XmssSha2H10W256,
            Self::XmssMtSha2H20D4W256 => XmssAlgorithm::XmssSha2H5W256,
            Self::XmssMtSha2H40D2W256 => XmssAlgorithm::XmssSha2H20W256,
            Self::XmssMtSha2H40D4W256 => XmssAlgorithm::XmssSha2H10W256,
            Self::XmssMtSha2H40D8W256 => XmssAlgorithm::XmssSha2H5W256,
            Self::XmssMtSha2H60D3W256 => XmssAlgorithm::XmssSha2H20W256,
            Self::XmssMtSha2H60D6W256 => XmssAlgorithm::XmssSha2H10W256,
            Self::XmssMtSha2H60D12W256 => XmssAlgorithm::XmssSha2H5W256,
            Self::XmssMtSha2H20D2W512 => XmssAlgorithm::XmssSha2H10W512,
            Self::XmssMtSha2H20D4W512 => XmssAlgorithm::XmssSha2H5W512,
            Self::XmssMtSha2H40D2W512 => XmssAlgorithm::XmssSha2H20W512,
            Self::XmssMtSha2H40D4W512 => XmssAlgorithm::XmssSha2H10W512,
            Self::XmssMtSha2H40D8W512 => XmssAlgorithm::XmssSha2H5W512,
            Self::XmssMtSha2H60D3W512 => XmssAlgorithm::XmssSha2H20W512,
            Self::XmssMtSha2H60D6W512 => XmssAlgorithm::XmssSha2H10W512,
            Self::XmssMtSha2H60D12W512 => XmssAlgorithm::XmssSha2H5W512,
            Self::XmssMtShakeH20D2W256 => XmssAlgorithm::XmssShakeH10W256,
            Self::XmssMtShakeH20D4W256 => XmssAlgorithm::XmssShakeH5W256,
            Self::XmssMtShakeH40D2W256 => XmssAlgorithm::XmssShakeH20W256,
            Self::XmssMtShakeH40D4W256 => XmssAlgorithm::XmssShakeH10W256,
            Self::XmssMtShakeH40D8W256 => XmssAlgorithm::XmssShakeH5W256,
            Self::XmssMtShakeH60D3W256 => XmssAlgorithm::XmssShakeH20W256,
            Self::XmssMtShakeH60D6W256 => XmssAlgorithm::XmssShakeH10W256,
            Self::XmssMtShakeH60D12W256 => XmssAlgorithm::XmssShakeH5W256,
            Self::XmssMtShakeH20D2W512 => XmssAlgorithm::XmssShakeH10W512,
            Self::XmssMtShakeH20D4W512 => XmssAlgorithm::XmssShakeH5W512,
            Self::XmssMtShakeH40D2W512 => XmssAlgorithm::XmssShakeH20W512,
            Self::XmssMtShakeH40D4W512 => XmssAlgorithm::XmssShakeH10W512,
            Self::XmssMtShakeH40D8W512 => XmssAlgorithm::XmssShakeH5W512,
            Self::XmssMtShakeH60D3W512 => XmssAlgorithm::XmssShakeH20W512,
            Self::XmssMtShakeH60D6W512 => XmssAlgorithm::XmssShakeH10W512,
            Self::XmssMtShakeH60D12W512 => XmssAlgorithm::XmssShakeH5W512,
        }
    }

    /// The number of layers `d`.
    pub const fn d(self) -> u32 {
        match self {
            Self::XmssMtSha2H20D2W256
            | Self::XmssMtSha2H40D2W256
            | Self::XmssMtSha2H20D2W512
            | Self::XmssMtSha2H40D2W512
            | Self::XmssMtShakeH20D2W256
            | Self::XmssMtShakeH40D2W256
            | Self::XmssMtShakeH20D2W512
            | Self::XmssMtShakeH40D2W512 => 2,
            Self::XmssMtSha2H60D3W256 | Self::XmssMtSha2H60D3W512 | Self::XmssMtShakeH60D3W256
            | Self::XmssMtShakeH60D3W512 => 3,
            Self::XmssMtSha2H20D4W256
            | Self::XmssMtSha2H40D4W256
            | Self::XmssMtSha2H20D4W512
            | Self::XmssMtSha2H40D4W512
            | Self::XmssMtShakeH20D4W256
            | Self::XmssMtShakeH40D4W256
            | Self::XmssMtShakeH20D4W512
            | Self::XmssMtShakeH40D4W512 => 4,
            Self::XmssMtSha2H60D6W256 | Self::XmssMtSha2H60D6W512 | Self::XmssMtShakeH60D6W256
            | Self::XmssMtShakeH60D6W512 => 6,
            Self::XmssMtSha2H40D8W256 | Self::XmssMtSha2H40D8W512 | Self::XmssMtShakeH40D8W256
            | Self::XmssMtShakeH40D8W512 => 8,
            Self::XmssMtSha2H60D12W256
            | Self::XmssMtSha2H60D12W512
            | Self::XmssMtShakeH60D12W256
            | Self::XmssMtShakeH60D12W512 => 12,
        }
    }

    /// The hash family of this parameter set.
    pub const fn hash(self) -> HashFamily {
        self.xmss().hash()
    }

    /// The node and seed length in bytes.
    pub const fn n(self) -> usize {
        self.xmss().n()
    }

    /// The total height `H = d * h`.
    pub const fn total_height(self) -> u32 {
        self.d() * self.xmss().h()
    }

    /// The number of bytes used to encode the global index on the wire,
    /// `ceil(H / 8)`.
    pub const fn idx_len(self) -> usize {
        (self.total_height() as usize).div_ceil(8)
    }

    /// The length of a serialized signature:
    /// `idx || r || d * (wots_sig || auth_path)`.
    pub const fn sig_len(self) -> usize {
        self.idx_len()
            + self.n()
            + (self.xmss().len() + self.xmss().h() as usize) * self.n() * self.d() as usize
    }

    /// The length of a serialized public key: `u32(oid) || root || seed`.
    pub const fn pub_len(self) -> usize {
        4 + 2 * self.n()
    }
}

const_assert_eq!(XmssMtAlgorithm::XmssMtSha2H20D2W256.total_height(), 20);
const_assert_eq!(XmssMtAlgorithm::XmssMtSha2H60D12W256.total_height(), 60);
const_assert_eq!(XmssMtAlgorithm::XmssMtSha2H20D2W256.idx_len(), 3);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typecode_round_trip() {
        for alg in [
            XmssAlgorithm::XmssSha2H10W256,
            XmssAlgorithm::XmssShakeH20W512,
            XmssAlgorithm::XmssSha2H5W256,
        ] {
            assert_eq!(XmssAlgorithm::from_typecode(alg.typecode()).unwrap(), alg);
        }
        for alg in [
            XmssMtAlgorithm::XmssMtSha2H20D2W256,
            XmssMtAlgorithm::XmssMtShakeH60D12W512,
            XmssMtAlgorithm::XmssMtSha2H60D12W512,
        ] {
            assert_eq!(XmssMtAlgorithm::from_typecode(alg.typecode()).unwrap(), alg);
        }
        assert!(XmssAlgorithm::from_typecode(0xdead_beef).is_err());
        assert!(XmssMtAlgorithm::from_typecode(0xdead_beef).is_err());
    }

    #[test]
    fn derived_lengths() {
        // len2 per its defining formula, not the collapsed constant
        for alg in [WotsAlgorithm::WotspSha2W256, WotsAlgorithm::WotspShake512] {
            let len1 = alg.len1() as f64;
            let w = alg.w() as f64;
            let len2 = ((len1 * (w - 1.0)).log2() / w.log2()).floor() as usize + 1;
            assert_eq!(alg.len2(), len2);
        }
        assert_eq!(XmssAlgorithm::XmssSha2H10W512.sig_len(), 4 + 64 + 131 * 64 + 10 * 64);
        assert_eq!(XmssMtAlgorithm::XmssMtSha2H60D3W256.idx_len(), 8);
        assert_eq!(
            XmssMtAlgorithm::XmssMtSha2H20D2W256.sig_len(),
            3 + 32 + 2 * (67 + 10) * 32
        );
    }
}
