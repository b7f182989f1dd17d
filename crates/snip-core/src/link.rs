use crate::error::CoreError;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A validated identifier of a short link.
///
/// The id doubles as the storage key and as the public path segment of the
/// redirect URL (`/s/{id}`). Valid ids are non-empty and contain only
/// `[a-zA-Z0-9_-]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LinkId(String);

impl LinkId {
    /// Creates a new `LinkId` after validating the input.
    pub fn new(id: impl Into<String>) -> Result<Self, CoreError> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    /// Creates a `LinkId` without validation.
    ///
    /// Use this only for ids produced by trusted internal sources
    /// (e.g. generators drawing from an alphanumeric alphabet).
    pub fn new_unchecked(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Builds the public short URL for this id under `base_url`.
    pub fn short_url(&self, base_url: &str) -> String {
        format!("{}/s/{}", base_url.trim_end_matches('/'), self.0)
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(id: &str) -> Result<(), CoreError> {
        if id.is_empty() {
            return Err(CoreError::InvalidLinkId("id cannot be empty".to_string()));
        }

        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(CoreError::InvalidLinkId(format!(
                "must contain only alphanumeric characters, hyphens, or underscores: '{}'",
                id
            )));
        }

        Ok(())
    }
}

impl Display for LinkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for LinkId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LinkId> for String {
    fn from(value: LinkId) -> Self {
        value.0
    }
}

/// A stored short link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    /// Public identifier, also the storage key.
    pub id: LinkId,
    /// The URL visitors are sent to.
    pub original_url: String,
    /// Set once when the link is created.
    pub created_at: Timestamp,
    /// Number of redirects served so far.
    #[serde(default)]
    pub clicks: u64,
    /// When the link was last followed, if ever.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_clicked: Option<Timestamp>,
}

impl Link {
    /// Creates a fresh record with no clicks.
    pub fn new(id: LinkId, original_url: impl Into<String>, created_at: Timestamp) -> Self {
        Self {
            id,
            original_url: original_url.into(),
            created_at,
            clicks: 0,
            last_clicked: None,
        }
    }

    /// Counts one click at `at`.
    pub fn record_click(&mut self, at: Timestamp) {
        self.clicks = self.clicks.saturating_add(1);
        self.last_clicked = Some(at);
    }
}
