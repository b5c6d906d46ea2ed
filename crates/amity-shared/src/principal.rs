use serde::{Deserialize, Serialize};

/// Account identity = 32-byte public key of the external ledger.
///
/// The key is opaque to the reducer: authentication happens before an
/// operation reaches us, so this crate never verifies signatures.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Principal(pub [u8; 32]);

impl Principal {
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// First 8 hex chars, for log lines.
    pub fn short(&self) -> String {
        self.to_hex()[..8].to_string()
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_roundtrip() {
        let p = Principal([0x5A; 32]);
        let restored = Principal::from_hex(&p.to_hex()).unwrap();
        assert_eq!(p, restored);
    }

    #[test]
    fn test_from_hex_rejects_short_input() {
        assert!(Principal::from_hex("deadbeef").is_err());
    }

    #[test]
    fn test_short_display() {
        let p = Principal([0xAB; 32]);
        assert_eq!(p.short(), "abababab");
    }
}
