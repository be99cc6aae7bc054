//! LM-OTS parameter registry

use crate::constants::HASH_LEN;
use crate::error::{Error, Result};
use static_assertions::const_assert_eq;

/// The LM-OTS parameter sets of RFC 8554 section 4.1.
///
/// Each variant fixes the Winternitz width `w`, the number of hash chains
/// `p`, the checksum left-shift `ls` and the hash output length `n = 32`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LmsOtsAlgorithm {
    /// `LMOTS_SHA256_N32_W1`
    LmsOtsSha256N32W1 = 1,
    /// `LMOTS_SHA256_N32_W2`
    LmsOtsSha256N32W2 = 2,
    /// `LMOTS_SHA256_N32_W4`
    LmsOtsSha256N32W4 = 3,
    /// `LMOTS_SHA256_N32_W8`
    LmsOtsSha256N32W8 = 4,
}

impl LmsOtsAlgorithm {
    /// The `lmots_algorithm_type` value carried on the wire.
    pub const fn typecode(self) -> u32 {
        self as u32
    }

    /// Looks a typecode up in the registry.
    pub fn from_typecode(typecode: u32) -> Result<Self> {
        match typecode {
            1 => Ok(Self::LmsOtsSha256N32W1),
            2 => Ok(Self::LmsOtsSha256N32W2),
            3 => Ok(Self::LmsOtsSha256N32W4),
            4 => Ok(Self::LmsOtsSha256N32W8),
            other => Err(Error::InvalidTypecode(other)),
        }
    }

    /// The width in bits of each Winternitz coefficient.
    pub const fn w(self) -> usize {
        match self {
            Self::LmsOtsSha256N32W1 => 1,
            Self::LmsOtsSha256N32W2 => 2,
            Self::LmsOtsSha256N32W4 => 4,
            Self::LmsOtsSha256N32W8 => 8,
        }
    }

    /// The number of `n`-byte chains in a key and signature.
    pub const fn p(self) -> usize {
        match self {
            Self::LmsOtsSha256N32W1 => 265,
            Self::LmsOtsSha256N32W2 => 133,
            Self::LmsOtsSha256N32W4 => 67,
            Self::LmsOtsSha256N32W8 => 34,
        }
    }

    /// The checksum left-shift.
    pub const fn ls(self) -> u32 {
        match self {
            Self::LmsOtsSha256N32W1 => 7,
            Self::LmsOtsSha256N32W2 => 6,
            Self::LmsOtsSha256N32W4 => 4,
            Self::LmsOtsSha256N32W8 => 0,
        }
    }

    /// The hash output length in bytes.
    pub const fn n(self) -> usize {
        HASH_LEN
    }

    /// The number of message coefficients (`u = 8n/w`).
    pub const fn u(self) -> usize {
        8 * self.n() / self.w()
    }

    /// The length of a serialized signature: `u32(type) || C || y[0..p]`.
    pub const fn sig_len(self) -> usize {
        4 + self.n() * (self.p() + 1)
    }

    /// The length of a serialized public key.
    pub const fn pub_len(self) -> usize {
        4 + crate::constants::ID_LEN + 4 + self.n()
    }
}

// The p/ls columns are the RFC 8554 table; the derived lengths follow.
const_assert_eq!(LmsOtsAlgorithm::LmsOtsSha256N32W1.sig_len(), 8516);
const_assert_eq!(LmsOtsAlgorithm::LmsOtsSha256N32W2.sig_len(), 4292);
const_assert_eq!(LmsOtsAlgorithm::LmsOtsSha256N32W4.sig_len(), 2180);
const_assert_eq!(LmsOtsAlgorithm::LmsOtsSha256N32W8.sig_len(), 1124);
const_assert_eq!(LmsOtsAlgorithm::LmsOtsSha256N32W1.u(), 256);
const_assert_eq!(LmsOtsAlgorithm::LmsOtsSha256N32W8.u(), 32);
