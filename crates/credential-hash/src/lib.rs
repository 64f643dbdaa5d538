//! # credential-hash
//!
//! Password verifier construction and verification for the gateway.
//!
//! ## Modules
//!
//! - `digest`: the `Hasher` capability over fixed-output SHA-2 digests
//! - `history`: rolling ring of intermediate hashes used by CryptL7
//! - `cryptl7`: the adaptive CryptL7 mixing engine
//! - `verifier`: `$L7H$` verifier encoding, decoding, and verification
//! - `sha512_crypt`: glibc-compatible SHA-512-crypt for imported hashes
//! - `consteq`: constant-time byte comparison
//! - `registry`: prefix dispatch across verifier families
//! - `pool`: bounded blocking pool for running hash jobs off async threads

pub mod consteq;
pub mod cryptl7;
pub mod digest;
pub mod history;
pub mod pool;
pub mod registry;
pub mod sha512_crypt;
pub mod verifier;

pub use cryptl7::CryptL7;
pub use digest::{DigestAlgorithm, Hasher, Sha2Hasher};
pub use pool::HashingPool;
pub use registry::{HashFamily, PasswordHasherRegistry};
pub use verifier::{DecodedVerifier, VerifierCodec};
