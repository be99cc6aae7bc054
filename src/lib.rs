//! Pure Rust implementation of two families of stateful hash-based
//! signature schemes:
//!
//! - **LM-OTS / LMS / HSS** as defined in [RFC 8554]
//! - **WOTS+ / XMSS / XMSS^MT** as defined in [RFC 8391]
//!
//! Both families build Merkle trees over one-time signature keys and derive
//! their security from the hash function alone, at the price of *state*: a
//! private key must never sign twice with the same one-time key. Signing
//! therefore takes `&mut self`, every key carries its leaf counter, and a
//! serialized private key resumes exactly where it left off.
//!
//! # One-time state
//!
//! Callers are responsible for durably storing the serialized private key
//! *before* releasing a signature produced by it. This crate advances the
//! counter in memory but never persists anything on its own.
//!
//! # Example
//!
//! ```
//! use hbs::lms::{LmsAlgorithm, SigningKey};
//! use hbs::lmots::LmsOtsAlgorithm;
//!
//! let mut rng = rand::thread_rng();
//! let mut sk = SigningKey::new(
//!     LmsAlgorithm::LmsSha256M32H5,
//!     LmsOtsAlgorithm::LmsOtsSha256N32W4,
//!     &mut rng,
//! )?;
//! let pk = sk.public();
//!
//! let sig = sk.sign(&mut rng, b"hello")?;
//! pk.verify(b"hello", &sig)?;
//! # Ok::<(), hbs::Error>(())
//! ```
//!
//! [RFC 8554]: https://datatracker.ietf.org/doc/html/rfc8554
//! [RFC 8391]: https://datatracker.ietf.org/doc/html/rfc8391

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod constants;
mod error;
mod merkle;
mod types;

pub mod hss;
pub mod lmots;
pub mod lms;
pub mod xmss;
pub mod xmssmt;

pub use error::{Error, Result};
pub use types::Identifier;
