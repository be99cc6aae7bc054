//! LMS parameter registry

use crate::constants::HASH_LEN;
use crate::error::{Error, Result};
use static_assertions::const_assert_eq;

/// The LMS parameter sets of RFC 8554 section 5.1, all over SHA-256.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LmsAlgorithm {
    /// `LMS_SHA256_M32_H5`
    LmsSha256M32H5 = 5,
    /// `LMS_SHA256_M32_H10`
    LmsSha256M32H10 = 6,
    /// `LMS_SHA256_M32_H15`
    LmsSha256M32H15 = 7,
    /// `LMS_SHA256_M32_H20`
    LmsSha256M32H20 = 8,
    /// `LMS_SHA256_M32_H25`
    LmsSha256M32H25 = 9,
}

impl LmsAlgorithm {
    /// The `lms_algorithm_type` value carried on the wire.
    pub const fn typecode(self) -> u32 {
        self as u32
    }

    /// Looks a typecode up in the registry.
    pub fn from_typecode(typecode: u32) -> Result<Self> {
        match typecode {
            5 => Ok(Self::LmsSha256M32H5),
            6 => Ok(Self::LmsSha256M32H10),
            7 => Ok(Self::LmsSha256M32H15),
            8 => Ok(Self::LmsSha256M32H20),
            9 => Ok(Self::LmsSha256M32H25),
            other => Err(Error::InvalidTypecode(other)),
        }
    }

    /// The number of bytes of each tree node.
    pub const fn m(self) -> usize {
        HASH_LEN
    }

    /// The height of the tree.
    pub const fn h(self) -> u32 {
        match self {
            Self::LmsSha256M32H5 => 5,
            Self::LmsSha256M32H10 => 10,
            Self::LmsSha256M32H15 => 15,
            Self::LmsSha256M32H20 => 20,
            Self::LmsSha256M32H25 => 25,
        }
    }

    /// The number of leaves, `2^h`.
    pub const fn leaves(self) -> u32 {
        1 << self.h()
    }

    /// The length of a serialized public key.
    pub const fn pub_len(self) -> usize {
        4 + 4 + crate::constants::ID_LEN + self.m()
    }

    /// The length of a serialized private key.
    pub const fn priv_len(self) -> usize {
        4 + 4 + 4 + crate::constants::ID_LEN + HASH_LEN
    }
}

const_assert_eq!(LmsAlgorithm::LmsSha256M32H5.leaves(), 32);
const_assert_eq!(LmsAlgorithm::LmsSha256M32H25.leaves(), 1 << 25);
const_assert_eq!(LmsAlgorithm::LmsSha256M32H5.pub_len(), 56);
