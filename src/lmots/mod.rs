//! LM-OTS: the Leighton-Micali one-time signature scheme (RFC 8554 section 4).

pub(crate) mod modes;
mod private;
mod public;
mod signature;
pub(crate) mod util;

pub use modes::LmsOtsAlgorithm;
pub use private::SigningKey;
pub use public::VerifyingKey;
pub use self::signature::Signature;
