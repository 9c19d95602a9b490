use anyhow::Context;
use async_trait::async_trait;
use bacheca_core::StoredMessage;
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};

/// Contratto dello store: solo inserimento, nessuna lettura.
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn insert(&self, record: &StoredMessage) -> anyhow::Result<()>;
}

/// Store su SQLite. Il pool viene creato una volta all'avvio e condiviso da tutte le connessioni.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connette e applica le migrazioni.
    pub async fn open(db_url: &str) -> anyhow::Result<Self> {
        let pool = connect_pool(db_url).await?;
        run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl MessageStore for SqliteStore {
    async fn insert(&self, record: &StoredMessage) -> anyhow::Result<()> {
        sqlx::query("INSERT INTO messages (username, message, date) VALUES (?, ?, ?)")
            .bind(&record.username)
            .bind(&record.message)
            .bind(&record.date)
            .execute(&self.pool)
            .await
            .context("insert message")?;
        Ok(())
    }
}

// Dato un percorso di file, restituisce un URL SQLite valido. Crea le directory genitrici se non esistono.
pub fn sqlite_url_for_path(p: &Path) -> anyhow::Result<String> {
    let abs = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };
    if let Some(parent) = abs.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create parent dirs for {:?}", parent))?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&abs)
        .with_context(|| format!("create/open sqlite file {:?}", abs))?;
    let s = abs.to_string_lossy().replace('\\', "/");
    Ok(format!("sqlite://{}", s))
}

/// Costruisce l'URL SQLite a partire dal valore di DATABASE_URL.
/// Accetta un percorso, un URL "sqlite://..." oppure "sqlite::memory:".
pub fn build_sqlite_url(raw: &str) -> anyhow::Result<String> {
    if raw == "sqlite::memory:" {
        return Ok(raw.to_string());
    }
    let path_part = raw
        .strip_prefix("sqlite://")
        .or_else(|| raw.strip_prefix("sqlite:"))
        .unwrap_or(raw);
    sqlite_url_for_path(&PathBuf::from(path_part))
}

// Connect to the database and return a connection pool.
pub async fn connect_pool(db_url: &str) -> anyhow::Result<SqlitePool> {
    let pool = SqlitePool::connect(db_url)
        .await
        .with_context(|| format!("connect to sqlite via {}", db_url))?;
    Ok(pool)
}

// Crea la tabella dei messaggi se non esiste.
pub async fn run_migrations(pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS messages (
            id       INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL,
            message  TEXT NOT NULL,
            date     TEXT NOT NULL
        );"#,
    )
    .execute(pool)
    .await
    .context("apply migration: messages")?;
    Ok(())
}
