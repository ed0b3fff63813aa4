//! Credential bundle and the session it is captured from.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Readable view of the live streaming session.
///
/// The store reads these at `save()` time, never at construction, so a token
/// rotated after startup is what gets persisted.
pub trait SessionTokens: Send + Sync {
    /// Token type, normally `Bearer`
    fn token_type(&self) -> String;
    /// Current access token
    fn access_token(&self) -> String;
    /// Current refresh token
    fn refresh_token(&self) -> String;
    /// Access token expiry, as the session reports it
    fn expiry_time(&self) -> String;
}

/// A fixed set of session values.
///
/// Used where the tokens come from somewhere other than a live session
/// object (command line, tests).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub token_type: String,
    pub access_token: String,
    pub refresh_token: String,
    pub expiry_time: String,
}

impl SessionTokens for SessionSnapshot {
    fn token_type(&self) -> String {
        self.token_type.clone()
    }

    fn access_token(&self) -> String {
        self.access_token.clone()
    }

    fn refresh_token(&self) -> String {
        self.refresh_token.clone()
    }

    fn expiry_time(&self) -> String {
        self.expiry_time.clone()
    }
}

/// Persisted token set.
///
/// Serialized as a flat JSON object with hyphenated keys. A bundle only counts
/// when all three required keys are present; `expiry-time` is informational.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialBundle {
    #[serde(rename = "token-type", default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,

    #[serde(rename = "access-token", default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    #[serde(rename = "refresh-token", default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    #[serde(rename = "expiry-time", default, skip_serializing_if = "Option::is_none")]
    pub expiry_time: Option<String>,
}

impl CredentialBundle {
    /// Capture all four fields from a session right now.
    pub fn capture(session: &dyn SessionTokens) -> Self {
        Self {
            token_type: Some(session.token_type()),
            access_token: Some(session.access_token()),
            refresh_token: Some(session.refresh_token()),
            expiry_time: Some(session.expiry_time()),
        }
    }

    /// Decode a stored payload.
    pub fn from_json(payload: &str) -> serde_json::Result<Self> {
        serde_json::from_str(payload)
    }

    /// Encode for storage.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// True iff token type, access token and refresh token are all present.
    ///
    /// Expiry is not checked.
    pub fn is_complete(&self) -> bool {
        self.token_type.is_some() && self.access_token.is_some() && self.refresh_token.is_some()
    }

    /// Whether no field is set at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Parse the stored expiry.
    ///
    /// Accepts RFC 3339 and the `YYYY-MM-DD[ HH:MM:SS[.ffffff][+HH:MM]]`
    /// shape sessions usually print. Naive times are taken as UTC.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.expiry_time.as_deref()?.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        for fmt in ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M:%S%.f%:z"] {
            if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
                return Some(dt.with_timezone(&Utc));
            }
        }
        for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
                return Some(naive.and_utc());
            }
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }
}
