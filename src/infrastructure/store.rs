//! # Record Stores
//!
//! `FileStore` keeps every table in one pretty-printed JSON file and rewrites it
//! after each mutation. `RedisStore` (feature `redis`) maps each table to a hash.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::domain::traits::RecordStore;

type Tables = HashMap<String, BTreeMap<String, Value>>;

pub struct FileStore {
    path: Option<PathBuf>,
    tables: Mutex<Tables>,
}

impl FileStore {
    /// Store without a backing file.
    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self {
            path: None,
            tables: Mutex::new(Tables::new()),
        }
    }

    /// Loads `path` if it exists, otherwise starts empty and creates it on first write.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let tables = match tokio::fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Tables::new(),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };
        Ok(Self {
            path: Some(path),
            tables: Mutex::new(tables),
        })
    }

    async fn save(&self, tables: &Tables) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(tables)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, path)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

#[async_trait]
impl RecordStore for FileStore {
    async fn get_record(&self, table: &str, key: &str) -> Result<Option<Value>> {
        let tables = self.tables.lock().await;
        Ok(tables.get(table).and_then(|t| t.get(key)).cloned())
    }

    async fn upsert_record(&self, table: &str, key: &str, fields: Value) -> Result<()> {
        // Held across the save so concurrent writers cannot interleave.
        let mut tables = self.tables.lock().await;
        let record = tables
            .entry(table.to_string())
            .or_default()
            .entry(key.to_string())
            .or_insert(Value::Null);
        match (record, fields) {
            (Value::Object(existing), Value::Object(update)) => existing.extend(update),
            (slot, fields) => *slot = fields,
        }
        self.save(&tables).await
    }

    async fn delete_record(&self, table: &str, key: &str) -> Result<bool> {
        let mut tables = self.tables.lock().await;
        let removed = tables
            .get_mut(table)
            .and_then(|t| t.remove(key))
            .is_some();
        if removed {
            self.save(&tables).await?;
        }
        Ok(removed)
    }

    async fn list_records(&self, table: &str) -> Result<Vec<(String, Value)>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .get(table)
            .map(|t| t.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default())
    }
}

#[cfg(feature = "redis")]
pub use self::redis_store::RedisStore;

#[cfg(feature = "redis")]
mod redis_store {
    use super::*;
    use redis::AsyncCommands;
    use redis::aio::ConnectionManager;

    /// Field merge run server-side; a script executes atomically.
    const MERGE_SCRIPT: &str = r#"
local current = redis.call('HGET', KEYS[1], ARGV[1])
if current then
    local record = cjson.decode(current)
    local update = cjson.decode(ARGV[2])
    if type(record) == 'table' and type(update) == 'table' then
        for k, v in pairs(update) do record[k] = v end
        redis.call('HSET', KEYS[1], ARGV[1], cjson.encode(record))
        return 1
    end
end
redis.call('HSET', KEYS[1], ARGV[1], ARGV[2])
return 1
"#;

    pub struct RedisStore {
        conn: ConnectionManager,
        merge: redis::Script,
    }

    fn hash_key(table: &str) -> String {
        format!("records:{table}")
    }

    impl RedisStore {
        pub async fn connect(url: &str) -> Result<Self> {
            let client = redis::Client::open(url).context("Invalid redis url")?;
            let conn = ConnectionManager::new(client)
                .await
                .context("Failed to connect to redis")?;
            Ok(Self {
                conn,
                merge: redis::Script::new(MERGE_SCRIPT),
            })
        }
    }

    #[async_trait]
    impl RecordStore for RedisStore {
        async fn get_record(&self, table: &str, key: &str) -> Result<Option<Value>> {
            let mut conn = self.conn.clone();
            let raw: Option<String> = conn.hget(hash_key(table), key).await?;
            raw.map(|s| serde_json::from_str(&s).context("Corrupt record in redis"))
                .transpose()
        }

        async fn upsert_record(&self, table: &str, key: &str, fields: Value) -> Result<()> {
            let mut conn = self.conn.clone();
            let _: i64 = self
                .merge
                .key(hash_key(table))
                .arg(key)
                .arg(serde_json::to_string(&fields)?)
                .invoke_async(&mut conn)
                .await
                .context("Redis upsert failed")?;
            Ok(())
        }

        async fn delete_record(&self, table: &str, key: &str) -> Result<bool> {
            let mut conn = self.conn.clone();
            let removed: usize = conn.hdel(hash_key(table), key).await?;
            Ok(removed > 0)
        }

        async fn list_records(&self, table: &str) -> Result<Vec<(String, Value)>> {
            let mut conn = self.conn.clone();
            let all: HashMap<String, String> = conn.hgetall(hash_key(table)).await?;
            let mut records = Vec::with_capacity(all.len());
            for (key, raw) in all {
                match serde_json::from_str(&raw) {
                    Ok(value) => records.push((key, value)),
                    Err(e) => tracing::warn!(table, key = %key, "Skipping corrupt redis record: {}", e),
                }
            }
            records.sort_by(|a, b| a.0.cmp(&b.0));
            Ok(records)
        }
    }

}
