use std::sync::Arc;

use shared::domain::{PaginationDescriptor, Product, ProductId};
use tracing::{error, info};

use crate::{
    api::CatalogApi,
    error::{ApiError, FetchError, ProductAction, SubmitError},
    form::{FormMode, ProductDraft, ProductForm},
    pagination::{PageWindow, PagerView},
    session::Session,
};

/// Blocking yes/no question asked before destructive actions.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// No authenticated session; nothing was requested.
    Skipped,
    Loaded { products: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationReceipt {
    pub action: ProductAction,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Cancelled,
    Removed(MutationReceipt),
}

pub struct CatalogController {
    api: Arc<dyn CatalogApi>,
    products: Vec<Product>,
    pagination: PaginationDescriptor,
    window: PageWindow,
    form: Option<ProductForm>,
    loading: bool,
}

impl CatalogController {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self {
            api,
            products: Vec::new(),
            pagination: PaginationDescriptor::default(),
            window: PageWindow::default(),
            form: None,
            loading: false,
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == id)
    }

    pub fn pagination(&self) -> &PaginationDescriptor {
        &self.pagination
    }

    pub fn window(&self) -> PageWindow {
        self.window
    }

    pub fn pager(&self) -> PagerView {
        self.window.view(&self.pagination)
    }

    pub fn form(&self) -> Option<&ProductForm> {
        self.form.as_ref()
    }

    pub fn draft_mut(&mut self) -> Option<&mut ProductDraft> {
        self.form.as_mut().map(|form| &mut form.draft)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Replaces products and descriptor together, or leaves both untouched.
    /// Navigation goes through the window-aware methods below.
    pub(crate) async fn fetch_page(
        &mut self,
        session: &Session,
        page: u32,
    ) -> Result<FetchOutcome, FetchError> {
        let Some(token) = session.authenticated_token() else {
            return Ok(FetchOutcome::Skipped);
        };

        self.loading = true;
        let result = self.api.list_products(token, page).await;
        self.loading = false;

        match result {
            Ok(listing) => {
                let count = listing.products.len();
                self.products = listing.products;
                self.pagination = listing.pagination;
                info!(
                    "catalog: loaded page={page} products={count} total_pages={}",
                    self.pagination.total_pages
                );
                Ok(FetchOutcome::Loaded { products: count })
            }
            Err(err) => {
                error!("catalog: listing page={page} failed: {err}");
                Err(err.into())
            }
        }
    }

    pub async fn refresh(&mut self, session: &Session) -> Result<FetchOutcome, FetchError> {
        self.fetch_page(session, self.window.current_page()).await
    }

    /// Disabled unless the store reported a next page.
    pub async fn next_page(&mut self, session: &Session) -> Result<FetchOutcome, FetchError> {
        if !self.pagination.has_next {
            return Ok(FetchOutcome::Skipped);
        }
        let total_pages = self.pagination.total_pages;
        self.move_window(session, |window| {
            window.advance(total_pages);
            true
        })
        .await
    }

    /// Disabled unless the store reported a previous page.
    pub async fn previous_page(&mut self, session: &Session) -> Result<FetchOutcome, FetchError> {
        if !self.pagination.has_pre {
            return Ok(FetchOutcome::Skipped);
        }
        self.move_window(session, |window| {
            window.retreat();
            true
        })
        .await
    }

    pub async fn go_to_page(
        &mut self,
        session: &Session,
        page: u32,
    ) -> Result<FetchOutcome, FetchError> {
        let total_pages = self.pagination.total_pages;
        self.move_window(session, |window| window.select(page, total_pages))
            .await
    }

    // The window only keeps its new position once the page behind it loaded.
    async fn move_window(
        &mut self,
        session: &Session,
        step: impl FnOnce(&mut PageWindow) -> bool,
    ) -> Result<FetchOutcome, FetchError> {
        let previous = self.window;
        if !step(&mut self.window) || self.window.current_page() == previous.current_page() {
            self.window = previous;
            return Ok(FetchOutcome::Skipped);
        }
        let result = self.refresh(session).await;
        if result.is_err() {
            self.window = previous;
        }
        result
    }

    pub fn open_create(&mut self) -> &mut ProductForm {
        self.form.insert(ProductForm::creating())
    }

    /// Opens the form on a copy of a listed product. `None` if it is not on this page.
    pub fn open_edit(&mut self, id: &ProductId) -> Option<&mut ProductForm> {
        let form = ProductForm::editing(self.product(id)?);
        Some(self.form.insert(form))
    }

    /// Discards the transient product.
    pub fn close_form(&mut self) {
        self.form = None;
    }

    pub async fn submit(&mut self, session: &Session) -> Result<MutationReceipt, SubmitError> {
        let form = self.form.as_mut().ok_or(SubmitError::FormClosed)?;
        let payload = form.draft.validate()?;
        let token = session
            .authenticated_token()
            .ok_or(ApiError::NotAuthenticated)?;
        let mode = form.mode().clone();

        form.set_open(false);
        self.loading = true;
        let (action, result) = match &mode {
            FormMode::Creating => (
                ProductAction::Create,
                self.api.create_product(token, &payload).await,
            ),
            FormMode::Editing(id) => (
                ProductAction::Update,
                self.api.update_product(token, id, &payload).await,
            ),
        };
        self.loading = false;

        match result {
            Ok(status) => {
                let message = status
                    .message_text()
                    .unwrap_or_else(|| default_notice(action).to_string());
                info!("catalog: {action} succeeded: {message}");
                self.form = None;
                self.refresh_after_mutation(session).await;
                Ok(MutationReceipt { action, message })
            }
            Err(source) => {
                if let Some(form) = self.form.as_mut() {
                    form.set_open(true);
                }
                Err(ApiError::Rejected { action, source }.into())
            }
        }
    }

    pub async fn remove(
        &mut self,
        session: &Session,
        id: &ProductId,
        confirm: &mut dyn Confirm,
    ) -> Result<RemoveOutcome, ApiError> {
        let label = self
            .product(id)
            .map(|product| product.title.clone())
            .unwrap_or_else(|| id.to_string());
        if !confirm.confirm(&format!("Delete product '{label}'?")) {
            return Ok(RemoveOutcome::Cancelled);
        }
        let token = session
            .authenticated_token()
            .ok_or(ApiError::NotAuthenticated)?;

        self.loading = true;
        let result = self.api.delete_product(token, id).await;
        self.loading = false;

        let status = result.map_err(|source| ApiError::Rejected {
            action: ProductAction::Delete,
            source,
        })?;
        let message = status
            .message_text()
            .unwrap_or_else(|| default_notice(ProductAction::Delete).to_string());
        info!("catalog: delete id={id} succeeded: {message}");
        self.refresh_after_mutation(session).await;
        Ok(RemoveOutcome::Removed(MutationReceipt {
            action: ProductAction::Delete,
            message,
        }))
    }

    // A failed reload keeps the previous list; the mutation itself succeeded.
    async fn refresh_after_mutation(&mut self, session: &Session) {
        let _ = self.refresh(session).await;
    }
}

fn default_notice(action: ProductAction) -> &'static str {
    match action {
        ProductAction::Create => "product created",
        ProductAction::Update => "product updated",
        ProductAction::Delete => "product deleted",
    }
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;
