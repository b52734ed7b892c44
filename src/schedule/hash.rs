//! Deterministic per-owner value spreading.
//!
//! A hash token (`H`) in a specification stands for one concrete field
//! value chosen deterministically from the owner's [`Seed`]. Two owners
//! with the same nominal schedule land on different instants, while one
//! owner resolves to the same instant across restarts.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::field::FieldPosition;
use crate::error::{Result, TempoError};

/// Opaque deterministic seed driving hash-token resolution.
///
/// The default (zero) seed is used before an owner identity is known.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Seed(u64);

impl Seed {
    /// Derive a seed from an owner identity string.
    ///
    /// The derivation is a stable content hash, so the same identity
    /// yields the same seed across processes and restarts.
    pub fn from_owner(identity: &str) -> Result<Self> {
        if identity.is_empty() {
            return Err(TempoError::SeedDerivation);
        }
        let digest = Sha256::digest(identity.as_bytes());
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        Ok(Self(u64::from_be_bytes(head)))
    }

    /// Construct a seed from a raw value. Mostly useful in tests.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

/// Resolve one concrete value in `[lo, hi]` for a hash token.
///
/// Pure and deterministic: identical seed, field position, and bounds
/// always produce the identical value. The field position participates so
/// that `H H * * *` does not pin minute and hour to the same offset.
pub fn resolve(seed: Seed, position: FieldPosition, lo: u32, hi: u32) -> u32 {
    debug_assert!(lo <= hi, "resolve bounds must be ordered");

    let mut hasher = Sha256::new();
    hasher.update(seed.0.to_be_bytes());
    hasher.update([position.index()]);
    let digest = hasher.finalize();

    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    let raw = u64::from_be_bytes(head);

    let span = u64::from(hi - lo) + 1;
    lo + (raw % span) as u32
}
