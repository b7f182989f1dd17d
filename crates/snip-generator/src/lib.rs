pub mod random;
pub mod seq;

pub use random::RandomGenerator;
pub use seq::SeqGenerator;

use snip_core::LinkId;
use thiserror::Error;

/// Trait for generating link ids.
///
/// Implementations are pure generators that don't interact with storage, so
/// a generated id may already be taken. Callers are expected to retry.
pub trait Generator: Send + Sync + 'static {
    type Output: Into<LinkId>;

    fn generate(&self) -> Self::Output;
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("id length must be between {min} and {max}, got {got}")]
    InvalidLength { min: usize, max: usize, got: usize },
    #[error("id prefix must contain only alphanumeric characters, hyphens, or underscores: '{0}'")]
    InvalidPrefix(String),
}
