//! Bounded in-memory session store.
//!
//! Records live in a moka cache capped at [`MAX_SESSIONS`] entries and
//! evicted after [`SESSION_IDLE`] without access, so a client that discards
//! its cookie on every request cannot grow memory without bound.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tower_sessions::cookie::time::OffsetDateTime;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store::{self, SessionStore};

/// Most sessions held at once; least recently used ones are evicted first.
pub const MAX_SESSIONS: u64 = 10_000;

/// Idle time after which a record is dropped from the cache.
pub const SESSION_IDLE: Duration = Duration::from_secs(60 * 60);

/// Session store backed by a size- and idle-bounded moka cache.
#[derive(Clone, Debug)]
pub struct BoundedMemoryStore {
    records: Cache<Id, Record>,
}

impl Default for BoundedMemoryStore {
    fn default() -> Self {
        Self::new(MAX_SESSIONS, SESSION_IDLE)
    }
}

impl BoundedMemoryStore {
    #[must_use]
    pub fn new(max_sessions: u64, idle: Duration) -> Self {
        Self {
            records: Cache::builder()
                .max_capacity(max_sessions)
                .time_to_idle(idle)
                .build(),
        }
    }

    /// Number of records currently held (after pending evictions run).
    pub async fn session_count(&self) -> u64 {
        self.records.run_pending_tasks().await;
        self.records.entry_count()
    }
}

#[async_trait]
impl SessionStore for BoundedMemoryStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        while self.records.contains_key(&record.id) {
            record.id = Id::default();
        }
        self.records.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.records.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        let Some(record) = self.records.get(session_id).await else {
            return Ok(None);
        };

        if record.expiry_date <= OffsetDateTime::now_utc() {
            self.records.invalidate(session_id).await;
            return Ok(None);
        }

        Ok(Some(record))
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        self.records.invalidate(session_id).await;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use tower_sessions::cookie::time;

    use super::*;

    fn record(expires_in: time::Duration) -> Record {
        Record {
            id: Id::default(),
            data: HashMap::new(),
            expiry_date: OffsetDateTime::now_utc() + expires_in,
        }
    }

    #[tokio::test]
    async fn test_save_load_delete() {
        let store = BoundedMemoryStore::default();
        let mut rec = record(time::Duration::minutes(5));
        store.create(&mut rec).await.unwrap();

        let loaded = store.load(&rec.id).await.unwrap().unwrap();
        assert_eq!(loaded.id, rec.id);

        store.delete(&rec.id).await.unwrap();
        assert!(store.load(&rec.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_record_is_not_loaded() {
        let store = BoundedMemoryStore::default();
        let mut rec = record(time::Duration::seconds(-1));
        store.create(&mut rec).await.unwrap();

        assert!(store.load(&rec.id).await.unwrap().is_none());
        assert_eq!(store.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_capacity_bounds_record_count() {
        let store = BoundedMemoryStore::new(8, SESSION_IDLE);
        for _ in 0..200 {
            let mut rec = record(time::Duration::minutes(5));
            store.create(&mut rec).await.unwrap();
        }

        assert!(store.session_count().await <= 8);
    }
}
