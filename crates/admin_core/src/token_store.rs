use anyhow::{Context, Result};
use async_trait::async_trait;
use shared::domain::SessionToken;
use storage::Storage;
use tokio::sync::Mutex;

pub const DEFAULT_TOKEN_ENTRY: &str = "admin_token";

/// Where the admin token survives between runs. One named entry per store.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn load(&self) -> Result<Option<SessionToken>>;
    async fn save(&self, token: &SessionToken) -> Result<()>;
    async fn clear(&self) -> Result<()>;
}

#[derive(Default)]
pub struct MemoryTokenStore {
    entry: Mutex<Option<SessionToken>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: SessionToken) -> Self {
        Self {
            entry: Mutex::new(Some(token)),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<SessionToken>> {
        Ok(self.entry.lock().await.clone())
    }

    async fn save(&self, token: &SessionToken) -> Result<()> {
        *self.entry.lock().await = Some(token.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.entry.lock().await.take();
        Ok(())
    }
}

pub struct DurableTokenStore {
    store: Storage,
    entry: String,
}

impl DurableTokenStore {
    pub fn new(store: Storage, entry: impl Into<String>) -> Self {
        Self {
            store,
            entry: entry.into(),
        }
    }

    pub async fn open(database_url: &str, entry: impl Into<String>) -> Result<Self> {
        let store = Storage::new(database_url)
            .await
            .with_context(|| format!("failed to initialize token storage at '{database_url}'"))?;
        Ok(Self::new(store, entry))
    }
}

#[async_trait]
impl TokenStore for DurableTokenStore {
    async fn load(&self) -> Result<Option<SessionToken>> {
        self.store.load_session_token(&self.entry).await
    }

    async fn save(&self, token: &SessionToken) -> Result<()> {
        self.store.save_session_token(&self.entry, token).await
    }

    async fn clear(&self) -> Result<()> {
        self.store.clear_session_token(&self.entry).await?;
        Ok(())
    }
}
