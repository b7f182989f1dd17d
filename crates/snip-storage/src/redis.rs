use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, RedisError, Script};
use snip_core::kv::{AtomicWrite, Key, KvStore, Mutation, Result};
use snip_core::StorageError;
use std::sync::Arc;
use tracing::{debug, trace};

const SCAN_BATCH: usize = 200;

/// Applies an [`AtomicWrite`] inside Redis.
///
/// `ARGV[1]` holds the number of checks `n`. `KEYS[1..n]` are the checked
/// keys and `KEYS[n+1..]` the mutated ones. After `ARGV[1]` the arguments come
/// in pairs: `(flag, value)` per check, where flag `0` means "must be absent"
/// and `1` means "must equal value", then `(op, value)` per mutation with op
/// `set` or `del`.
const ATOMIC_WRITE_SCRIPT: &str = r#"
local n = tonumber(ARGV[1])
local a = 2
for i = 1, n do
  local current = redis.call('GET', KEYS[i])
  if ARGV[a] == '0' then
    if current then return 0 end
  else
    if current ~= ARGV[a + 1] then return 0 end
  end
  a = a + 2
end
for i = n + 1, #KEYS do
  if ARGV[a] == 'set' then
    redis.call('SET', KEYS[i], ARGV[a + 1])
  else
    redis.call('DEL', KEYS[i])
  end
  a = a + 2
end
return 1
"#;

/// Redis implementation of the [`KvStore`] contract.
///
/// Keys are stored as `{namespace}:{segment}:{segment}...`. Prefix scans walk
/// `SCAN MATCH` and sort client side; atomic batches run as one Lua script so
/// checks and writes happen in a single server-side step.
#[derive(Clone)]
pub struct RedisKv {
    conn: ConnectionManager,
    namespace: String,
    script: Arc<Script>,
}

impl std::fmt::Debug for RedisKv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisKv")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

impl RedisKv {
    /// Creates a store over an established connection manager.
    pub fn new(conn: ConnectionManager, namespace: impl Into<String>) -> Self {
        Self {
            conn,
            namespace: namespace.into(),
            script: Arc::new(Script::new(ATOMIC_WRITE_SCRIPT)),
        }
    }

    /// Opens a connection to `redis_url` and waits until it is usable.
    pub async fn connect(redis_url: &str, namespace: impl Into<String>) -> Result<Self> {
        let client = redis::Client::open(redis_url).map_err(map_redis_error)?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(map_redis_error)?;
        let namespace = namespace.into();
        debug!(namespace = %namespace, "connected to redis");
        Ok(Self::new(conn, namespace))
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn encode_key(&self, key: &Key) -> String {
        encode_key(&self.namespace, key)
    }
}

fn encode_key(namespace: &str, key: &Key) -> String {
    let mut encoded = String::from(namespace);
    for segment in key.segments() {
        encoded.push(':');
        encoded.push_str(segment);
    }
    encoded
}

fn decode_key(namespace: &str, raw: &str) -> Option<Key> {
    let rest = raw.strip_prefix(namespace)?.strip_prefix(':')?;
    Some(Key::new(rest.split(':')))
}

/// Escapes the glob metacharacters understood by `SCAN MATCH`.
fn escape_glob(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn map_redis_error(err: RedisError) -> StorageError {
    let message = err.to_string();

    if err.is_timeout() {
        StorageError::Timeout(message)
    } else if err.is_connection_refusal() || err.is_connection_dropped() || err.is_io_error() {
        StorageError::Unavailable(message)
    } else {
        StorageError::Query(message)
    }
}

#[async_trait]
impl KvStore for RedisKv {
    async fn get(&self, key: &Key) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn
            .get(self.encode_key(key))
            .await
            .map_err(map_redis_error)?;
        Ok(value)
    }

    async fn set(&self, key: &Key, value: Vec<u8>) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .set(self.encode_key(key), value)
            .await
            .map_err(map_redis_error)?;
        Ok(())
    }

    async fn delete(&self, key: &Key) -> Result<bool> {
        let mut conn = self.conn.clone();
        let removed: u64 = conn
            .del(self.encode_key(key))
            .await
            .map_err(map_redis_error)?;
        Ok(removed > 0)
    }

    async fn list(&self, prefix: &Key) -> Result<Vec<(Key, Vec<u8>)>> {
        let pattern = format!("{}:*", escape_glob(&self.encode_key(prefix)));
        trace!(pattern = %pattern, "scanning redis keys");

        let mut conn = self.conn.clone();
        let mut cursor: u64 = 0;
        let mut raw_keys: Vec<String> = Vec::new();
        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(map_redis_error)?;
            raw_keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }

        // SCAN may return a key more than once.
        raw_keys.sort();
        raw_keys.dedup();

        let mut keyed: Vec<(Key, String)> = raw_keys
            .into_iter()
            .filter_map(|raw| decode_key(&self.namespace, &raw).map(|key| (key, raw)))
            .collect();
        keyed.sort_by(|a, b| a.0.cmp(&b.0));

        if keyed.is_empty() {
            return Ok(Vec::new());
        }

        let raw: Vec<&str> = keyed.iter().map(|(_, raw)| raw.as_str()).collect();
        let values: Vec<Option<Vec<u8>>> = redis::cmd("MGET")
            .arg(&raw)
            .query_async(&mut conn)
            .await
            .map_err(map_redis_error)?;

        // Keys deleted between SCAN and MGET come back as nil and are skipped.
        let entries = keyed
            .into_iter()
            .zip(values)
            .filter_map(|((key, _), value)| value.map(|value| (key, value)))
            .collect();
        Ok(entries)
    }

    async fn atomic(&self, write: AtomicWrite) -> Result<bool> {
        let (checks, mutations) = write.into_parts();
        let mut invocation = self.script.prepare_invoke();

        invocation.arg(checks.len());
        for check in &checks {
            invocation.key(self.encode_key(&check.key));
            match &check.expected {
                None => {
                    invocation.arg("0").arg("");
                }
                Some(value) => {
                    invocation.arg("1").arg(value.as_slice());
                }
            }
        }
        for mutation in &mutations {
            match mutation {
                Mutation::Set { key, value } => {
                    invocation
                        .key(self.encode_key(key))
                        .arg("set")
                        .arg(value.as_slice());
                }
                Mutation::Delete { key } => {
                    invocation.key(self.encode_key(key)).arg("del").arg("");
                }
            }
        }

        let mut conn = self.conn.clone();
        let committed: i64 = invocation
            .invoke_async(&mut conn)
            .await
            .map_err(map_redis_error)?;
        trace!(committed = committed == 1, "atomic write finished");
        Ok(committed == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_encoding_round_trips_under_namespace() {
        let key = Key::new(["links", "abc-123"]);
        let encoded = encode_key("snip", &key);

        assert_eq!(encoded, "snip:links:abc-123");
        assert_eq!(decode_key("snip", &encoded), Some(key));
    }

    #[test]
    fn decode_rejects_foreign_namespace() {
        assert_eq!(decode_key("snip", "other:links:abc"), None);
        assert_eq!(decode_key("snip", "snipx:links:abc"), None);
    }

    #[test]
    fn glob_metacharacters_are_escaped() {
        assert_eq!(escape_glob("snip:links"), "snip:links");
        assert_eq!(escape_glob("a*b?[c]\\"), "a\\*b\\?\\[c\\]\\\\");
    }
}
