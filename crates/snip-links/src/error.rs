use crate::fetch::FetchError;
use snip_core::StorageError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LinkError>;

/// Which operation ran into an id that is already in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdConflict {
    /// A create asked for a custom path that exists.
    CustomPath,
    /// A rename targeted an id that exists.
    Rename,
}

impl IdConflict {
    fn message(self) -> &'static str {
        match self {
            IdConflict::CustomPath => "Custom path already exists, please choose another one",
            IdConflict::Rename => "Link ID already exists",
        }
    }
}

/// Errors returned by link operations.
///
/// The display text of the validation variants is shown to users as is.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("Invalid URL format")]
    InvalidUrl(String),
    #[error("Custom path can only contain alphanumeric characters, hyphens, and underscores")]
    InvalidId(String),
    #[error("{}", .conflict.message())]
    DuplicateId { id: String, conflict: IdConflict },
    #[error("could not find a free link id after {attempts} attempts")]
    IdSpaceExhausted { attempts: usize },
    #[error("Failed to fetch original content")]
    Fetch(#[source] FetchError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl LinkError {
    /// Whether the error was caused by the caller's input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LinkError::InvalidUrl(_) | LinkError::InvalidId(_) | LinkError::DuplicateId { .. }
        )
    }
}

impl From<FetchError> for LinkError {
    fn from(value: FetchError) -> Self {
        LinkError::Fetch(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_facing_messages() {
        assert_eq!(
            LinkError::InvalidUrl("nope".into()).to_string(),
            "Invalid URL format"
        );
        assert_eq!(
            LinkError::InvalidId("bad id!".into()).to_string(),
            "Custom path can only contain alphanumeric characters, hyphens, and underscores"
        );
        assert_eq!(
            LinkError::DuplicateId {
                id: "abc".into(),
                conflict: IdConflict::CustomPath
            }
            .to_string(),
            "Custom path already exists, please choose another one"
        );
        assert_eq!(
            LinkError::DuplicateId {
                id: "abc".into(),
                conflict: IdConflict::Rename
            }
            .to_string(),
            "Link ID already exists"
        );
    }

    #[test]
    fn storage_errors_are_not_validation_errors() {
        let err: LinkError = StorageError::Unavailable("down".into()).into();
        assert!(!err.is_validation());
        assert!(LinkError::InvalidUrl(String::new()).is_validation());
    }
}
