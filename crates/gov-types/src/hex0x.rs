//! # Hex Serde Helpers
//!
//! `0x`-prefixed hex (de)serialization for the byte-valued record fields.
//! The persistence file and every wire payload use this shape, so the
//! helpers accept input with or without the prefix and always emit it.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serializer};

/// Decode a hex string, tolerating an optional `0x` prefix.
pub fn decode(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(s.strip_prefix("0x").unwrap_or(s))
}

/// Serde for fixed-width byte arrays (`[u8; N]`).
pub mod array {
    use super::*;

    /// Serialize as a `0x`-prefixed hex string.
    pub fn serialize<S: Serializer, const N: usize>(
        value: &[u8; N],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&crate::entities::to_hex0x(value))
    }

    /// Deserialize from a hex string, enforcing the exact width.
    pub fn deserialize<'de, D: Deserializer<'de>, const N: usize>(
        deserializer: D,
    ) -> Result<[u8; N], D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = decode(&s).map_err(DeError::custom)?;
        bytes
            .try_into()
            .map_err(|b: Vec<u8>| DeError::custom(format!("expected {} bytes, got {}", N, b.len())))
    }
}

/// Serde for sequences of fixed-width byte arrays (`Vec<[u8; N]>`).
pub mod array_vec {
    use super::*;

    /// Serialize each element as a `0x`-prefixed hex string.
    pub fn serialize<S: Serializer, const N: usize>(
        values: &[[u8; N]],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let encoded: Vec<String> = values
            .iter()
            .map(|v| crate::entities::to_hex0x(v))
            .collect();
        serde::Serialize::serialize(&encoded, serializer)
    }

    /// Deserialize from a sequence of hex strings.
    pub fn deserialize<'de, D: Deserializer<'de>, const N: usize>(
        deserializer: D,
    ) -> Result<Vec<[u8; N]>, D::Error> {
        let strings = Vec::<String>::deserialize(deserializer)?;
        strings
            .into_iter()
            .map(|s| {
                let bytes = decode(&s).map_err(DeError::custom)?;
                bytes.try_into().map_err(|b: Vec<u8>| {
                    DeError::custom(format!("expected {} bytes, got {}", N, b.len()))
                })
            })
            .collect()
    }
}

/// Serde for sequences of variable-length byte strings (`Vec<Vec<u8>>`).
pub mod bytes_vec {
    use super::*;

    /// Serialize each element as a `0x`-prefixed hex string.
    pub fn serialize<S: Serializer>(
        values: &[Vec<u8>],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let encoded: Vec<String> = values
            .iter()
            .map(|v| crate::entities::to_hex0x(v))
            .collect();
        serde::Serialize::serialize(&encoded, serializer)
    }

    /// Deserialize from a sequence of hex strings.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Vec<u8>>, D::Error> {
        let strings = Vec::<String>::deserialize(deserializer)?;
        strings
            .into_iter()
            .map(|s| decode(&s).map_err(DeError::custom))
            .collect()
    }
}
