use crate::domain::{CacheStats, CACHE_TTL_HOURS};
use crate::ports::CacheStore;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared::{Error, Result};
use std::marker::PhantomData;
use std::path::Path;

/// What actually lands in sled: the domain value plus its TTL bookkeeping.
#[derive(Serialize, Deserialize)]
struct Envelope<V> {
    value: V,
    cached_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

/// Sled-backed cache store with fixed 24h expiry, one database file per
/// domain. Values are serialized as JSON envelopes carrying `cached_at`
/// and `expires_at`; an expired row reads as a miss but stays on disk
/// until [`CacheStore::sweep_expired`] removes it.
pub struct SledCacheStore<V> {
    db: sled::Db,
    _value: PhantomData<fn() -> V>,
}

impl<V> SledCacheStore<V>
where
    V: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    /// Open (or create) the store at `path`, creating the parent directory
    /// if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Internal(format!("Failed to create data directory: {}", e)))?;
        }

        let db = sled::open(path)
            .map_err(|e| Error::Internal(format!("Failed to open Sled database: {}", e)))?;

        Ok(Self {
            db,
            _value: PhantomData,
        })
    }

    fn write_envelope(&self, key: &str, envelope: &Envelope<V>) -> Result<()> {
        let bytes = serde_json::to_vec(envelope)
            .map_err(|e| Error::Internal(format!("Failed to serialize cache entry: {}", e)))?;

        self.db
            .insert(key.as_bytes(), bytes)
            .map_err(|e| Error::Internal(format!("Failed to write cache entry: {}", e)))?;

        self.db
            .flush()
            .map_err(|e| Error::Internal(format!("Failed to flush database: {}", e)))?;

        Ok(())
    }

    fn read_envelope(&self, key: &str) -> Result<Option<Envelope<V>>> {
        let value = self
            .db
            .get(key.as_bytes())
            .map_err(|e| Error::Internal(format!("Failed to read cache entry: {}", e)))?;

        match value {
            Some(bytes) => {
                let envelope: Envelope<V> = serde_json::from_slice(&bytes).map_err(|e| {
                    Error::Internal(format!("Failed to deserialize cache entry: {}", e))
                })?;
                Ok(Some(envelope))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl<V> CacheStore<V> for SledCacheStore<V>
where
    V: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn get(&self, key: &str) -> Result<Option<V>> {
        match self.read_envelope(key)? {
            Some(envelope) if envelope.expires_at > Utc::now() => Ok(Some(envelope.value)),
            // Expired rows read as a miss; sweep_expired reclaims them.
            Some(_) => Ok(None),
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, value: &V) -> Result<()> {
        let now = Utc::now();
        let envelope = Envelope {
            value: value.clone(),
            cached_at: now,
            expires_at: now + Duration::hours(CACHE_TTL_HOURS),
        };
        self.write_envelope(key, &envelope)
    }

    async fn stats(&self) -> Result<CacheStats> {
        let now = Utc::now();
        let mut stats = CacheStats::default();

        for row in self.db.iter() {
            let (_, bytes) =
                row.map_err(|e| Error::Internal(format!("Failed to iterate database: {}", e)))?;
            let envelope: Envelope<V> = serde_json::from_slice(&bytes)
                .map_err(|e| Error::Internal(format!("Failed to deserialize cache entry: {}", e)))?;

            stats.total += 1;
            if envelope.expires_at > now {
                stats.valid += 1;
            } else {
                stats.expired += 1;
            }
        }

        Ok(stats)
    }

    async fn sweep_expired(&self) -> Result<u64> {
        let now = Utc::now();
        let mut expired_keys = Vec::new();

        for row in self.db.iter() {
            let (key, bytes) =
                row.map_err(|e| Error::Internal(format!("Failed to iterate database: {}", e)))?;
            let envelope: Envelope<V> = serde_json::from_slice(&bytes)
                .map_err(|e| Error::Internal(format!("Failed to deserialize cache entry: {}", e)))?;

            if envelope.expires_at <= now {
                expired_keys.push(key);
            }
        }

        let mut removed = 0u64;
        for key in expired_keys {
            let existed = self
                .db
                .remove(&key)
                .map_err(|e| Error::Internal(format!("Failed to delete cache entry: {}", e)))?
                .is_some();
            if existed {
                removed += 1;
            }
        }

        self.db
            .flush()
            .map_err(|e| Error::Internal(format!("Failed to flush database: {}", e)))?;

        Ok(removed)
    }
}
