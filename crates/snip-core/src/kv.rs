use crate::error::StorageError;
use async_trait::async_trait;
use std::fmt::Display;

/// Result type for key-value engine operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A hierarchical key made of ordered string segments, e.g. `("links", "abc")`.
///
/// Keys order segment by segment, so every key sharing a prefix sorts
/// contiguously; engines rely on this for prefix scans.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(Vec<String>);

impl Key {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Returns the final segment, if any.
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Whether `prefix` is a leading run of this key's segments.
    pub fn starts_with(&self, prefix: &Key) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.join(":"))
    }
}

/// A precondition of an [`AtomicWrite`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Check {
    pub key: Key,
    /// `None` requires the key to be absent, `Some` requires this exact value.
    pub expected: Option<Vec<u8>>,
}

/// A write applied by an [`AtomicWrite`] once all checks pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Set { key: Key, value: Vec<u8> },
    Delete { key: Key },
}

/// A batch of checks and mutations committed as one step.
///
/// Either every check holds and every mutation is applied, or nothing is
/// written at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AtomicWrite {
    checks: Vec<Check>,
    mutations: Vec<Mutation>,
}

impl AtomicWrite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires `key` to be absent at commit time.
    pub fn check_absent(mut self, key: Key) -> Self {
        self.checks.push(Check {
            key,
            expected: None,
        });
        self
    }

    /// Requires `key` to hold exactly `value` at commit time.
    pub fn check_value(mut self, key: Key, value: Vec<u8>) -> Self {
        self.checks.push(Check {
            key,
            expected: Some(value),
        });
        self
    }

    pub fn set(mut self, key: Key, value: Vec<u8>) -> Self {
        self.mutations.push(Mutation::Set { key, value });
        self
    }

    pub fn delete(mut self, key: Key) -> Self {
        self.mutations.push(Mutation::Delete { key });
        self
    }

    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    pub fn into_parts(self) -> (Vec<Check>, Vec<Mutation>) {
        (self.checks, self.mutations)
    }
}

/// The storage engine contract: point reads and writes on opaque byte values,
/// an ordered prefix scan, and atomic batches.
#[async_trait]
pub trait KvStore: Send + Sync + 'static {
    /// Returns the value stored under `key`, or `None` if absent.
    async fn get(&self, key: &Key) -> Result<Option<Vec<u8>>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &Key, value: Vec<u8>) -> Result<()>;

    /// Removes `key`. Returns `true` if a value was removed.
    /// It is not an error if the key does not exist.
    async fn delete(&self, key: &Key) -> Result<bool>;

    /// Returns every entry whose key starts with `prefix`, ordered by key.
    async fn list(&self, prefix: &Key) -> Result<Vec<(Key, Vec<u8>)>>;

    /// Commits `write` atomically.
    ///
    /// Returns `Ok(false)` when a check failed; in that case nothing was
    /// written.
    async fn atomic(&self, write: AtomicWrite) -> Result<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_sharing_a_prefix_sort_together() {
        let mut keys = vec![
            Key::new(["users", "a"]),
            Key::new(["links", "b"]),
            Key::new(["links", "a"]),
            Key::new(["linksx", "a"]),
        ];
        keys.sort();

        assert_eq!(
            keys,
            vec![
                Key::new(["links", "a"]),
                Key::new(["links", "b"]),
                Key::new(["linksx", "a"]),
                Key::new(["users", "a"]),
            ]
        );
    }

    #[test]
    fn prefix_matches_whole_segments_only() {
        let prefix = Key::new(["links"]);
        assert!(Key::new(["links", "abc"]).starts_with(&prefix));
        assert!(!Key::new(["linksx", "abc"]).starts_with(&prefix));
    }

    #[test]
    fn display_joins_segments() {
        assert_eq!(Key::new(["links", "abc"]).to_string(), "links:abc");
        assert_eq!(Key::new(["links", "abc"]).last(), Some("abc"));
    }

    #[test]
    fn atomic_write_keeps_insertion_order() {
        let write = AtomicWrite::new()
            .check_absent(Key::new(["links", "new"]))
            .check_value(Key::new(["links", "old"]), b"v".to_vec())
            .delete(Key::new(["links", "old"]))
            .set(Key::new(["links", "new"]), b"v".to_vec());

        assert_eq!(write.checks().len(), 2);
        assert_eq!(
            write.mutations()[0],
            Mutation::Delete {
                key: Key::new(["links", "old"])
            }
        );
        let (checks, mutations) = write.into_parts();
        assert_eq!(checks[0].expected, None);
        assert_eq!(mutations.len(), 2);
    }
}
