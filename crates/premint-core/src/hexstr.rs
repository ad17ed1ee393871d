//! `0x`-prefixed hex rendering for bytes shown to operators and written to
//! artifacts.

/// Encode bytes as lower-case hex with a `0x` prefix.
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    format!("0x{}", hex::encode(bytes.as_ref()))
}

/// Decode hex, accepting input with or without the `0x` prefix.
pub fn decode(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let trimmed = s.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    hex::decode(digits)
}

/// Decode hex into a fixed-size array.
pub fn decode_array<const N: usize>(s: &str) -> Result<[u8; N], String> {
    let bytes = decode(s).map_err(|e| format!("invalid hex: {e}"))?;
    if bytes.len() != N {
        return Err(format!("expected {N} bytes, got {}", bytes.len()));
    }
    let mut array = [0u8; N];
    array.copy_from_slice(&bytes);
    Ok(array)
}

/// Serde adapter for `Vec<u8>` fields stored as `0x` hex strings.
pub mod bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize bytes as a hex string.
    pub fn serialize<S: Serializer>(value: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::encode(value))
    }

    /// Deserialize bytes from a hex string.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::decode(&s).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for `Option<Vec<u8>>` fields stored as hex strings or null.
pub mod option {
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize optional bytes as a hex string or null.
    pub fn serialize<S: Serializer>(
        value: &Option<Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(bytes) => serializer.serialize_some(&super::encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize optional bytes from a hex string or null.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<u8>>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|s| super::decode(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_is_optional_when_decoding() {
        assert_eq!(decode("0x0aff").unwrap(), vec![0x0a, 0xff]);
        assert_eq!(decode("0aff").unwrap(), vec![0x0a, 0xff]);
        assert_eq!(encode([0x0a, 0xff]), "0x0aff");
    }

    #[test]
    fn fixed_size_decoding_checks_length() {
        assert!(decode_array::<2>("0x0aff").is_ok());
        assert!(decode_array::<3>("0x0aff").is_err());
    }
}
