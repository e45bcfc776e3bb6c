//! Wires the session controller to the catalog controller: the catalog only
//! ever sees the session value, and every successful authentication loads the
//! current page.

use std::sync::Arc;

use shared::domain::ProductId;

use crate::{
    api::CatalogApi,
    catalog::{CatalogController, Confirm, FetchOutcome, MutationReceipt, RemoveOutcome},
    error::{ApiError, AuthError, FetchError, SubmitError},
    session::{Session, SessionController},
    token_store::TokenStore,
};

pub struct AdminConsole {
    session: SessionController,
    catalog: CatalogController,
}

impl AdminConsole {
    pub fn new(api: Arc<dyn CatalogApi>, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            session: SessionController::new(Arc::clone(&api), tokens),
            catalog: CatalogController::new(api),
        }
    }

    pub fn session(&self) -> &Session {
        self.session.session()
    }

    pub fn session_controller(&mut self) -> &mut SessionController {
        &mut self.session
    }

    pub fn catalog(&self) -> &CatalogController {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut CatalogController {
        &mut self.catalog
    }

    pub fn is_loading(&self) -> bool {
        self.session.is_loading() || self.catalog.is_loading()
    }

    /// Startup: verify a persisted token and, if accepted, load the listing.
    pub async fn start(&mut self) -> bool {
        if !self.session.verify().await {
            return false;
        }
        let _ = self.refresh().await;
        true
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<Session, AuthError> {
        let session = self.session.login(username, password).await?;
        let _ = self.refresh().await;
        Ok(session)
    }

    pub async fn logout(&mut self) {
        self.session.logout().await;
    }

    pub async fn refresh(&mut self) -> Result<FetchOutcome, FetchError> {
        self.catalog.refresh(self.session.session()).await
    }

    pub async fn next_page(&mut self) -> Result<FetchOutcome, FetchError> {
        self.catalog.next_page(self.session.session()).await
    }

    pub async fn previous_page(&mut self) -> Result<FetchOutcome, FetchError> {
        self.catalog.previous_page(self.session.session()).await
    }

    pub async fn go_to_page(&mut self, page: u32) -> Result<FetchOutcome, FetchError> {
        self.catalog.go_to_page(self.session.session(), page).await
    }

    pub async fn submit(&mut self) -> Result<MutationReceipt, SubmitError> {
        self.catalog.submit(self.session.session()).await
    }

    pub async fn remove(
        &mut self,
        id: &ProductId,
        confirm: &mut dyn Confirm,
    ) -> Result<RemoveOutcome, ApiError> {
        self.catalog
            .remove(self.session.session(), id, confirm)
            .await
    }
}

#[cfg(test)]
#[path = "tests/console_tests.rs"]
mod tests;
