//! SQLite-backed encounter storage.

use std::sync::Arc;

use async_trait::async_trait;
use initiative_domain::{Encounter, EncounterId};
use sqlx::{Row, SqlitePool};

use crate::infrastructure::document::{self, DEFAULT_KEY_PREFIX};
use crate::infrastructure::ports::{ClockPort, EncounterRepo, RepoError};

/// SQLite implementation of the encounter storage port.
pub struct SqliteEncounterStore {
    pool: SqlitePool,
    prefix: String,
    clock: Arc<dyn ClockPort>,
}

impl SqliteEncounterStore {
    pub async fn new(db_path: &str, clock: Arc<dyn ClockPort>) -> Result<Self, RepoError> {
        let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
            .await
            .map_err(|e| RepoError::database("connect", e))?;
        Self::from_pool(pool, clock).await
    }

    /// Wrap an existing pool, creating the table if needed.
    pub async fn from_pool(pool: SqlitePool, clock: Arc<dyn ClockPort>) -> Result<Self, RepoError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS encounters (
                storage_key TEXT PRIMARY KEY NOT NULL,
                document TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| RepoError::database("migrate", e))?;

        Ok(Self {
            pool,
            prefix: DEFAULT_KEY_PREFIX.to_string(),
            clock,
        })
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// When the stored document for `id` was last written, as RFC 3339.
    pub async fn updated_at(&self, id: &EncounterId) -> Result<Option<String>, RepoError> {
        let row = sqlx::query("SELECT updated_at FROM encounters WHERE storage_key = ?")
            .bind(document::storage_key(&self.prefix, id))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get", e))?;
        Ok(row.map(|row| row.get("updated_at")))
    }
}

#[async_trait]
impl EncounterRepo for SqliteEncounterStore {
    async fn get(&self, id: &EncounterId) -> Result<Option<Encounter>, RepoError> {
        let row = sqlx::query("SELECT document FROM encounters WHERE storage_key = ?")
            .bind(document::storage_key(&self.prefix, id))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get", e))?;

        Ok(row.and_then(|row| {
            let raw: String = row.get("document");
            document::decode(id, &raw)
        }))
    }

    async fn save(&self, encounter: &Encounter) -> Result<(), RepoError> {
        let raw = document::encode(encounter)?;
        let now = self.clock.now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO encounters (storage_key, document, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(storage_key) DO UPDATE SET
                document = excluded.document,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(document::storage_key(&self.prefix, &encounter.id))
        .bind(raw)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("save", e))?;

        Ok(())
    }

    async fn delete(&self, id: &EncounterId) -> Result<(), RepoError> {
        sqlx::query("DELETE FROM encounters WHERE storage_key = ?")
            .bind(document::storage_key(&self.prefix, id))
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("delete", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::MockClockPort;
    use chrono::{TimeZone, Utc};

    fn id() -> EncounterId {
        EncounterId::parse("ABCDEFGHJKLM").expect("valid id")
    }

    async fn store(dir: &tempfile::TempDir) -> SqliteEncounterStore {
        let clock = Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).single().expect("valid time"),
        ));
        let path = dir.path().join("encounters.db");
        SqliteEncounterStore::new(path.to_str().expect("utf-8 path"), clock)
            .await
            .expect("open store")
    }

    #[tokio::test]
    async fn save_then_get_returns_the_document() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store(&dir).await;
        let mut encounter = Encounter::new(id());
        encounter.total_malice = 5;

        store.save(&encounter).await.expect("save");

        assert_eq!(store.get(&id()).await.expect("get"), Some(encounter));
        assert_eq!(
            store.updated_at(&id()).await.expect("updated_at").as_deref(),
            Some("2025-03-01T12:00:00+00:00")
        );
    }

    #[tokio::test]
    async fn save_upserts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store(&dir).await;
        let mut encounter = store.create(&id()).await.expect("create");
        encounter.current_round = 6;
        store.save(&encounter).await.expect("save");

        let loaded = store.get(&id()).await.expect("get").expect("present");
        assert_eq!(loaded.current_round, 6);
    }

    #[tokio::test]
    async fn documents_survive_reopening() {
        let dir = tempfile::tempdir().expect("tempdir");
        store(&dir).await.create(&id()).await.expect("create");

        let reopened = store(&dir).await;
        assert!(reopened.get(&id()).await.expect("get").is_some());
    }

    #[tokio::test]
    async fn delete_missing_succeeds() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store(&dir).await;
        store.delete(&id()).await.expect("delete");
        assert_eq!(store.get(&id()).await.expect("get"), None);
    }

    #[tokio::test]
    async fn updated_at_follows_each_save() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut clock = MockClockPort::new();
        let mut seq = mockall::Sequence::new();
        for hour in [9, 10] {
            clock
                .expect_now()
                .times(1)
                .in_sequence(&mut seq)
                .return_const(Utc.with_ymd_and_hms(2025, 3, 1, hour, 0, 0).single().expect("valid time"));
        }
        let path = dir.path().join("encounters.db");
        let store = SqliteEncounterStore::new(path.to_str().expect("utf-8 path"), Arc::new(clock))
            .await
            .expect("open store");

        store.create(&id()).await.expect("create");
        assert_eq!(
            store.updated_at(&id()).await.expect("updated_at").as_deref(),
            Some("2025-03-01T09:00:00+00:00")
        );
        store.save(&Encounter::new(id())).await.expect("save");
        assert_eq!(
            store.updated_at(&id()).await.expect("updated_at").as_deref(),
            Some("2025-03-01T10:00:00+00:00")
        );
    }

    #[tokio::test]
    async fn malformed_rows_read_as_absent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store(&dir).await;
        sqlx::query("INSERT INTO encounters (storage_key, document, updated_at) VALUES (?, ?, ?)")
            .bind(document::storage_key(DEFAULT_KEY_PREFIX, &id()))
            .bind("[]")
            .bind("2025-01-01T00:00:00+00:00")
            .execute(&store.pool)
            .await
            .expect("seed row");

        assert_eq!(store.get(&id()).await.expect("get"), None);
    }
}
