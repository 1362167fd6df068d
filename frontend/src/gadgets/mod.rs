/// Bits with constant folding, bytes and 32-bit words.
pub mod bits;

/// Range checks.
pub mod range;

/// The SHA-256 hash over byte variables.
pub mod sha256;
