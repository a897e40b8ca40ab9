//! Option fingerprints.
//!
//! A fingerprint identifies an `(image URL, options)` pair so callers can key
//! their own memoization of resolution results. It is an equality key, not a
//! trust boundary, so a fast non-cryptographic hash (32-bit FNV-1) is used.

use crate::error::Result;
use crate::options::Options;

const FNV32_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV32_PRIME: u32 = 0x0100_0193;

/// Computes the fingerprint of an image URL and its selection options.
///
/// The options are serialized to JSON (field order is fixed by the struct
/// definition), the raw image URL bytes are appended, and the result is
/// hashed with 32-bit FNV-1 and rendered in decimal. Equal inputs produce
/// equal fingerprints across processes and runs.
///
/// # Errors
///
/// Returns [`crate::Error::Serialization`] if the options cannot be serialized.
///
/// # Examples
///
/// ```
/// use tagwatch_core::{fingerprint, Options};
///
/// let a = fingerprint("docker.io/library/nginx", &Options::default())?;
/// let b = fingerprint("docker.io/library/nginx", &Options::default())?;
/// assert_eq!(a, b);
/// # Ok::<(), tagwatch_core::Error>(())
/// ```
pub fn fingerprint(image_url: &str, options: &Options) -> Result<String> {
    let mut bytes = serde_json::to_vec(options)?;
    bytes.extend_from_slice(image_url.as_bytes());
    Ok(fnv32(&bytes).to_string())
}

fn fnv32(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV32_OFFSET_BASIS, |hash, byte| {
        hash.wrapping_mul(FNV32_PRIME) ^ u32::from(*byte)
    })
}
