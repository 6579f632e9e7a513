use std::str::FromStr;

use serde::Serialize;

/// A fixed-size binary digest, printed and parsed as lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<const N: usize>(pub [u8; N]);

impl<const N: usize> Id<N> {
    pub const fn new(from: [u8; N]) -> Id<N> {
        Id(from)
    }

    pub fn as_string(&self) -> String {
        hex::encode(self.0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }
}

impl<const N: usize> Default for Id<N> {
    fn default() -> Self {
        Id([0; N])
    }
}

impl<const N: usize> AsRef<[u8]> for Id<N> {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl<const N: usize> std::fmt::Debug for Id<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for byte in self.0 {
            write!(f, "{:02x?}", byte)?;
        }
        Ok(())
    }
}

impl<const N: usize> std::fmt::Display for Id<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

impl<const N: usize> FromStr for Id<N> {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut out = [0u8; N];
        if s.len() != N * 2 {
            anyhow::bail!("expected a hex string of length {}", N * 2)
        };
        hex::decode_to_slice(s, &mut out)?;
        Ok(Id(out))
    }
}

// Hex for JSON and friends, raw bytes for binary formats.
impl<const N: usize> Serialize for Id<N> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.as_string())
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

/// A 20-byte SHA-1 digest: v1 piece hashes, whole-file and head hashes.
pub type Id20 = Id<20>;
/// A 32-byte SHA-256 digest: merkle leaves, piece roots and file roots.
pub type Id32 = Id<32>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_id32_from_str_roundtrips_through_display() {
        let s = "06f04cc728bef957a658876ef807f0514e4d715392969998efef584d2c3e435e";
        let id = Id32::from_str(s).unwrap();
        assert_eq!(id.as_string(), s);
        assert_eq!(format!("{id}"), s);
        assert_eq!(format!("{id:?}"), s);
    }

    #[test]
    fn test_id20_from_str_rejects_wrong_length() {
        assert!(Id20::from_str("abcd").is_err());
        assert!(Id20::from_str(&"zz".repeat(20)).is_err());
    }

    #[test]
    fn test_serialize_json_as_hex() {
        let id = Id20::new([0xab; 20]);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", "ab".repeat(20)));
    }

    #[test]
    fn test_is_zero() {
        assert!(Id32::default().is_zero());
        let mut id = Id32::default();
        id.0[31] = 1;
        assert!(!id.is_zero());
    }
}
