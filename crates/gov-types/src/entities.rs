//! # Chain Primitives
//!
//! Type aliases shared by the feed, the mirror, and the persistence gateway.

// Re-export U256 from primitive-types for use across all crates
pub use primitive_types::U256;

/// A 32-byte keccak-256 hash.
pub type Hash = [u8; 32];

/// A 20-byte Ethereum-style address.
pub type Address = [u8; 20];

/// A canonical proposal identifier (keccak-256 of the immutable fields).
pub type ProposalId = Hash;

/// A chain identifier (EIP-155 style).
pub type ChainId = u64;

/// A block height.
pub type BlockNumber = u64;

/// Render a byte slice as a `0x`-prefixed lowercase hex string.
pub fn to_hex0x(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Shorten a `0x`-prefixed hex string for log output (`0x1234..abcd`).
pub fn shorten_hex(s: &str) -> String {
    if s.len() <= 12 {
        return s.to_string();
    }
    format!("{}..{}", &s[..6], &s[s.len() - 4..])
}
