use crate::{Generator, GeneratorError};
use snip_core::LinkId;
use std::sync::atomic::{AtomicU64, Ordering};

/// Hands out `{prefix}{n:06}` in increasing order.
///
/// Useful where ids must be predictable, such as tests and fixtures.
#[derive(Debug)]
pub struct SeqGenerator {
    prefix: String,
    next: AtomicU64,
}

impl SeqGenerator {
    pub fn new() -> Self {
        Self {
            prefix: String::new(),
            next: AtomicU64::new(0),
        }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Result<Self, GeneratorError> {
        let prefix = prefix.into();
        if !prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(GeneratorError::InvalidPrefix(prefix));
        }
        Ok(Self {
            prefix,
            next: AtomicU64::new(0),
        })
    }

    /// Starts counting at `offset` instead of zero.
    pub fn with_offset(self, offset: u64) -> Self {
        self.next.store(offset, Ordering::Relaxed);
        self
    }
}

impl Default for SeqGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for SeqGenerator {
    type Output = LinkId;

    fn generate(&self) -> Self::Output {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        LinkId::new_unchecked(format!("{}{:06}", self.prefix, n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn counts_up_from_zero() {
        let generator = SeqGenerator::new();
        assert_eq!(generator.generate().as_str(), "000000");
        assert_eq!(generator.generate().as_str(), "000001");
    }

    #[test]
    fn prefix_and_offset() {
        let generator = SeqGenerator::with_prefix("t-").unwrap().with_offset(41);
        assert_eq!(generator.generate().as_str(), "t-000041");
        assert_eq!(generator.generate().as_str(), "t-000042");
    }

    #[test]
    fn invalid_prefix_is_rejected() {
        assert!(SeqGenerator::with_prefix("a/b").is_err());
    }

    #[test]
    fn concurrent_callers_get_distinct_ids() {
        let generator = Arc::new(SeqGenerator::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let generator = Arc::clone(&generator);
                std::thread::spawn(move || {
                    (0..250)
                        .map(|_| generator.generate())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut all: Vec<_> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 1000);
    }
}
