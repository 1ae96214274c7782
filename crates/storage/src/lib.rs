use anyhow::{Context, Result};
use async_trait::async_trait;
use shared::domain::PokemonId;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};
use std::{
    collections::HashMap,
    fs,
    path::PathBuf,
    str::FromStr,
    sync::Arc,
};
use tokio::sync::RwLock;
use tracing::{debug, warn};

pub const FAVORITES_STORAGE_KEY: &str = "pokemon_favorites";

pub const MEMORY_DATABASE_URL: &str = "sqlite::memory:";

/// String-to-string persistence used by the client between runs.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        let location = DatabaseLocation::of(database_url);
        location.create_parent_dir()?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        // every connection to an in-memory url opens its own empty database
        let max_connections = if location == DatabaseLocation::Memory {
            1
        } else {
            5
        };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(connect_options)
            .await
            .with_context(|| format!("failed to open database '{database_url}'"))?;

        let storage = Self { pool };
        storage.ensure_kv_table().await?;
        Ok(storage)
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    async fn ensure_kv_table(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key        TEXT PRIMARY KEY NOT NULL,
                value      TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("failed to create kv_store table")?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for Storage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to read key '{key}'"))?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to write key '{key}'"))?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), value.into());
        Self {
            entries: RwLock::new(entries),
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// In-memory mirror of the favorite ids, read once at load and written
/// through to the backing store on every change. Ids keep insertion order.
pub struct FavoritesStore {
    backend: Arc<dyn KeyValueStore>,
    ids: Vec<PokemonId>,
}

impl FavoritesStore {
    pub async fn load(backend: Arc<dyn KeyValueStore>) -> Result<Self> {
        let raw = backend.get(FAVORITES_STORAGE_KEY).await?;
        let ids = match raw {
            None => Vec::new(),
            Some(raw) => parse_favorites(&raw),
        };
        debug!(count = ids.len(), "favorites loaded");
        Ok(Self { backend, ids })
    }

    pub fn ids(&self) -> &[PokemonId] {
        &self.ids
    }

    pub fn is_favorite(&self, id: PokemonId) -> bool {
        self.ids.contains(&id)
    }

    pub async fn add(&mut self, id: PokemonId) -> Result<()> {
        if self.is_favorite(id) {
            return Ok(());
        }
        self.ids.push(id);
        self.persist().await
    }

    pub async fn remove(&mut self, id: PokemonId) -> Result<()> {
        self.ids.retain(|existing| *existing != id);
        self.persist().await
    }

    /// Flips membership and returns whether `id` is a favorite afterwards.
    pub async fn toggle(&mut self, id: PokemonId) -> Result<bool> {
        if self.is_favorite(id) {
            self.remove(id).await?;
            Ok(false)
        } else {
            self.add(id).await?;
            Ok(true)
        }
    }

    async fn persist(&self) -> Result<()> {
        let encoded = serde_json::to_string(&self.ids).context("failed to encode favorites")?;
        self.backend.set(FAVORITES_STORAGE_KEY, &encoded).await
    }
}

fn parse_favorites(raw: &str) -> Vec<PokemonId> {
    match serde_json::from_str::<Vec<PokemonId>>(raw) {
        Ok(mut ids) => {
            let mut seen = Vec::with_capacity(ids.len());
            ids.retain(|id| {
                if seen.contains(id) {
                    false
                } else {
                    seen.push(*id);
                    true
                }
            });
            ids
        }
        Err(error) => {
            warn!(%error, "stored favorites are unreadable; starting empty");
            Vec::new()
        }
    }
}

/// What a database url refers to on this machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    Memory,
    File(PathBuf),
    /// Anything not addressed with the `sqlite:` scheme.
    Foreign,
}

impl DatabaseLocation {
    pub fn of(database_url: &str) -> Self {
        if database_url.starts_with(MEMORY_DATABASE_URL) {
            return Self::Memory;
        }
        let Some(rest) = database_url.strip_prefix("sqlite:") else {
            return Self::Foreign;
        };
        let rest = rest.strip_prefix("//").unwrap_or(rest);
        match rest.split_once('?').map_or(rest, |(path, _options)| path) {
            "" => Self::Memory,
            path => Self::File(PathBuf::from(path)),
        }
    }

    /// Creates the directory a file database will live in.
    pub fn create_parent_dir(&self) -> Result<()> {
        let Self::File(path) = self else {
            return Ok(());
        };
        match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir)
                .with_context(|| format!("cannot create database directory {}", dir.display())),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
