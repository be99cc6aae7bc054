//! XMSS: the eXtended Merkle Signature Scheme (RFC 8391).
//!
//! One Merkle tree of height `h` over `2^h` WOTS+ leaves, with every hash
//! call keyed and bitmask-randomized through a structured 32-byte address.
//! The signing key maintains its authentication path incrementally and the
//! full traversal state round-trips through the private-key wire form.

pub(crate) mod address;
pub(crate) mod hash;
pub(crate) mod params;
mod private;
mod public;
mod signature;
pub(crate) mod tree;
pub(crate) mod wots;

pub use params::{HashFamily, WotsAlgorithm, XmssAlgorithm, XmssMtAlgorithm};
pub use private::SigningKey;
pub use public::VerifyingKey;
pub use self::signature::Signature;
