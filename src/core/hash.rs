/// Coordinate hashing: the only source of variation in generation.
///
/// A prompt is addressed by a seed plus a small tuple of integer
/// coordinates. XXH32 seeded with the world seed absorbs the coordinates
/// as little-endian 4-byte words, so a digest is identical on every host.

use xxhash_rust::xxh32::{xxh32, Xxh32};

/// Hash a seed and an ordered coordinate tuple to a 32-bit digest.
pub fn coordinate_hash(seed: u32, coords: &[i32]) -> u32 {
    let mut hasher = Xxh32::new(seed);
    for coord in coords {
        hasher.update(&coord.to_le_bytes());
    }
    hasher.digest()
}

/// Hash an arbitrary identifier string with seed 0.
pub fn identity_hash(identifier: &str) -> u32 {
    xxh32(identifier.as_bytes(), 0)
}

/// Map a digest onto `0..pool_size`.
///
/// `pool_size` must be non-zero; profiles are validated at load so every
/// pool reaching this point has at least one entry.
#[inline]
pub fn to_index(hash: u32, pool_size: usize) -> usize {
    hash as usize % pool_size
}
