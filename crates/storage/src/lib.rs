use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use shared::domain::SessionToken;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::debug;

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        // One writer; also keeps `sqlite::memory:` on a single shared database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(connect_options)
            .await
            .with_context(|| format!("failed to open token store at '{database_url}'"))?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    pub async fn save_session_token(&self, entry: &str, token: &SessionToken) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO session_tokens (entry, token, expires_at)
            VALUES (?, ?, ?)
            ON CONFLICT(entry) DO UPDATE SET
                token = excluded.token,
                expires_at = excluded.expires_at,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(entry)
        .bind(&token.token)
        .bind(token.expires_at)
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to persist session token entry '{entry}'"))?;
        debug!(entry, expires_at = %token.expires_at, "storage: session token saved");
        Ok(())
    }

    pub async fn load_session_token(&self, entry: &str) -> Result<Option<SessionToken>> {
        let row = sqlx::query("SELECT token, expires_at FROM session_tokens WHERE entry = ?")
            .bind(entry)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to read session token entry '{entry}'"))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let token: String = row.try_get("token")?;
        let expires_at: DateTime<Utc> = row.try_get("expires_at")?;
        Ok(Some(SessionToken { token, expires_at }))
    }

    /// Returns whether an entry existed.
    pub async fn clear_session_token(&self, entry: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM session_tokens WHERE entry = ?")
            .bind(entry)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to clear session token entry '{entry}'"))?;
        Ok(result.rows_affected() > 0)
    }
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url == "sqlite::memory:" || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
