//! Entry identifier codec.
//!
//! Outlook hands out entry IDs as long upper-case hex strings. They are
//! returned to callers base64-encoded, which is roughly a third shorter, and
//! accepted back in either form.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Length of a typical hex entry ID; anything else is treated as base64.
const HEX_ENTRY_ID_LEN: usize = 140;

/// Encodes a hex entry ID for output. Falls back to the input on bad hex.
#[must_use]
pub fn encode_entry_id(hex_id: &str) -> String {
    hex::decode(hex_id).map_or_else(|_| hex_id.to_string(), |bytes| STANDARD.encode(bytes))
}

/// Store-scoped item reference as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Wraps a caller-supplied identifier, rejecting empty input.
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidInput("entry_id must not be empty".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The identifier exactly as supplied.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Native hex form: 140 hex chars pass through upper-cased, otherwise
    /// base64 is decoded. Undecodable input is returned unchanged.
    #[must_use]
    pub fn to_hex(&self) -> String {
        let raw = self.0.as_str();
        if raw.len() == HEX_ENTRY_ID_LEN && raw.chars().all(|c| c.is_ascii_hexdigit()) {
            return raw.to_ascii_uppercase();
        }
        STANDARD
            .decode(raw)
            .map_or_else(|_| raw.to_string(), hex::encode_upper)
    }

    /// Shortened form for error messages.
    #[must_use]
    pub fn display_prefix(&self) -> String {
        let hex = self.to_hex();
        if hex.chars().count() > 40 {
            format!("{}...", hex.chars().take(40).collect::<String>())
        } else {
            hex
        }
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEX: &str = "00000000A1B2C3D4E5F60718293A4B5C6D7E8F90";

    #[test]
    fn encoded_id_decodes_back_to_upper_hex() {
        let encoded = encode_entry_id(&HEX.to_lowercase());
        let id = EntryId::parse(&encoded).unwrap();
        assert_eq!(id.to_hex(), HEX);
    }

    #[test]
    fn full_length_hex_passes_through() {
        let hex = "ab".repeat(70);
        let id = EntryId::parse(&hex).unwrap();
        assert_eq!(id.to_hex(), hex.to_uppercase());
    }

    #[test]
    fn garbage_is_passed_through() {
        let id = EntryId::parse("not*base64").unwrap();
        assert_eq!(id.to_hex(), "not*base64");
    }

    #[test]
    fn empty_id_is_invalid_input() {
        let err = EntryId::parse("   ").unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test]
    fn display_prefix_truncates_long_ids() {
        let id = EntryId::parse(&"CD".repeat(70)).unwrap();
        let prefix = id.display_prefix();
        assert!(prefix.ends_with("..."));
        assert_eq!(prefix.len(), 43);
    }
}
