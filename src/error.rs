//! Error types

/// Errors produced by key generation, signing, verification and parsing.
///
/// Every failure is fatal to the operation that produced it; nothing is
/// retried internally and no partial state is left behind.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An algorithm typecode was not found in the parameter registry.
    #[error("unknown algorithm typecode 0x{0:08x}")]
    InvalidTypecode(u32),

    /// A serialized key or signature failed structural validation.
    #[error("malformed {0}")]
    Parse(&'static str),

    /// A key failed its validity checks.
    #[error("invalid {0}")]
    InvalidKey(&'static str),

    /// A signature did not verify.
    #[error("signature verification failed")]
    InvalidSignature,

    /// All one-time keys under this private key have been consumed.
    #[error("attempted overuse of a one-time key")]
    ExhaustedKey,

    /// The entropy source failed to produce bytes.
    #[error("randomness source failure")]
    Randomness(#[from] rand_core::Error),
}

/// Result type used throughout this crate.
pub type Result<T> = core::result::Result<T, Error>;

impl From<Error> for signature::Error {
    fn from(err: Error) -> signature::Error {
        signature::Error::from_source(err)
    }
}
