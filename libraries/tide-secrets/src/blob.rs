//! Credential vault blob encoding.
//!
//! Layout handed to the vault, in field order:
//!
//! | Field                | Width     | Contents                          |
//! |----------------------|-----------|-----------------------------------|
//! | `CredentialBlobSize` | `u32`     | byte count of the blob            |
//! | `CredentialBlob`     | n bytes   | UTF-16LE text, no terminator      |
//!
//! Kept platform-neutral so the encoding is exercised on every host.

use crate::error::{CredentialError, Result};

/// Length-prefixed UTF-16LE credential blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultBlob {
    bytes: Vec<u8>,
}

impl VaultBlob {
    /// Largest blob the vault accepts for a generic credential
    /// (`CRED_MAX_CREDENTIAL_BLOB_SIZE`).
    pub const MAX_LEN: usize = 5 * 512;

    /// Encode text as UTF-16LE.
    pub fn encode(text: &str) -> Result<Self> {
        let bytes: Vec<u8> = text.encode_utf16().flat_map(u16::to_le_bytes).collect();
        if bytes.len() > Self::MAX_LEN {
            return Err(CredentialError::TooLarge(bytes.len(), Self::MAX_LEN));
        }
        Ok(Self { bytes })
    }

    /// Wrap bytes read back from the vault.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Decode the UTF-16LE payload.
    ///
    /// A trailing NUL written by other tools is dropped.
    pub fn decode(&self) -> Result<String> {
        if self.bytes.len() % 2 != 0 {
            return Err(CredentialError::Malformed(format!(
                "odd blob length {}",
                self.bytes.len()
            )));
        }

        let units: Vec<u16> = self
            .bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();

        let text = String::from_utf16(&units)
            .map_err(|e| CredentialError::Malformed(e.to_string()))?;
        Ok(text.trim_end_matches('\0').to_string())
    }

    /// Value for the `CredentialBlobSize` field.
    pub fn len_u32(&self) -> u32 {
        // encode() caps the length well below u32::MAX
        self.bytes.len() as u32
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Mutable view for handing the buffer to the vault.
    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_is_utf16le() {
        let blob = VaultBlob::encode("{}").unwrap();
        assert_eq!(blob.as_bytes(), &[b'{', 0, b'}', 0]);
        assert_eq!(blob.len_u32(), 4);
    }

    #[test]
    fn test_non_ascii_survives() {
        let text = r#"{"token-type":"Bearer ✓ 𝄞"}"#;
        let blob = VaultBlob::encode(text).unwrap();
        assert_eq!(blob.decode().unwrap(), text);
    }

    #[test]
    fn test_trailing_nul_dropped() {
        let blob = VaultBlob::from_bytes(vec![b'a', 0, 0, 0]);
        assert_eq!(blob.decode().unwrap(), "a");
    }

    #[test]
    fn test_odd_length_is_malformed() {
        let blob = VaultBlob::from_bytes(vec![b'a', 0, b'b']);
        assert!(matches!(blob.decode(), Err(CredentialError::Malformed(_))));
    }

    #[test]
    fn test_lone_surrogate_is_malformed() {
        let blob = VaultBlob::from_bytes(0xD800u16.to_le_bytes().to_vec());
        assert!(blob.decode().is_err());
    }

    #[test]
    fn test_oversized_payload_rejected() {
        let text = "x".repeat(VaultBlob::MAX_LEN / 2 + 1);
        assert!(matches!(
            VaultBlob::encode(&text),
            Err(CredentialError::TooLarge(len, max)) if len == VaultBlob::MAX_LEN + 2 && max == VaultBlob::MAX_LEN
        ));
        assert!(VaultBlob::encode(&"x".repeat(VaultBlob::MAX_LEN / 2)).is_ok());
    }
}
