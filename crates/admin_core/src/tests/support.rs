use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use shared::{
    domain::{PaginationDescriptor, Product, ProductId},
    error::ApiStatus,
    protocol::{ProductListResponse, ProductPayload, SigninRequest, SigninResponse},
};
use tokio::sync::Mutex;

use crate::{api::CatalogApi, error::RemoteError};

pub const PASSWORD: &str = "secret";
pub const TOKEN: &str = "token-1";

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SignIn { username: String },
    CheckSession { token: String },
    SignOut { token: String },
    ListProducts { token: String, page: u32 },
    CreateProduct { token: String, payload: ProductPayload },
    UpdateProduct { token: String, id: ProductId, payload: ProductPayload },
    DeleteProduct { token: String, id: ProductId },
}

/// In-memory store double: accepts one password, issues one token, serves
/// two products per page.
pub struct FakeCatalogApi {
    calls: Mutex<Vec<Call>>,
    total_pages: u32,
    token_lifetime: Duration,
    logout_fails: bool,
    listing_fails: AtomicBool,
    mutation_error: Mutex<Option<String>>,
}

impl FakeCatalogApi {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            total_pages: 12,
            token_lifetime: Duration::days(7),
            logout_fails: false,
            listing_fails: AtomicBool::new(false),
            mutation_error: Mutex::new(None),
        }
    }

    pub fn with_total_pages(mut self, total_pages: u32) -> Self {
        self.total_pages = total_pages;
        self
    }

    pub fn with_failing_logout(mut self) -> Self {
        self.logout_fails = true;
        self
    }

    pub fn set_listing_fails(&self, fails: bool) {
        self.listing_fails.store(fails, Ordering::SeqCst);
    }

    pub async fn set_mutation_error(&self, message: Option<&str>) {
        *self.mutation_error.lock().await = message.map(str::to_string);
    }

    pub async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    pub async fn clear_calls(&self) {
        self.calls.lock().await.clear();
    }

    async fn record(&self, call: Call) {
        self.calls.lock().await.push(call);
    }

    fn authorize(&self, token: &str) -> Result<(), RemoteError> {
        if token == TOKEN {
            Ok(())
        } else {
            Err(RemoteError::rejected(401, "invalid token"))
        }
    }

    async fn mutation_result(&self, message: &str) -> Result<ApiStatus, RemoteError> {
        match self.mutation_error.lock().await.clone() {
            Some(err) => Err(RemoteError::rejected(400, err)),
            None => Ok(ApiStatus::ok(message)),
        }
    }
}

pub fn sample_product(id: &str) -> Product {
    Product {
        id: ProductId::new(id),
        image_url: format!("https://img/{id}.png"),
        images_url: Vec::new(),
        title: format!("Product {id}"),
        category: "tea".into(),
        unit: "box".into(),
        origin_price: 300.0,
        price: 250.0,
        description: String::new(),
        content: String::new(),
        is_enabled: true,
    }
}

#[async_trait]
impl CatalogApi for FakeCatalogApi {
    async fn sign_in(&self, request: &SigninRequest) -> Result<SigninResponse, RemoteError> {
        self.record(Call::SignIn {
            username: request.username.clone(),
        })
        .await;
        if request.password != PASSWORD {
            return Err(RemoteError::rejected(400, "wrong password"));
        }
        Ok(SigninResponse {
            success: true,
            token: TOKEN.to_string(),
            expired: (Utc::now() + self.token_lifetime).timestamp_millis(),
            uid: Some("admin".into()),
            message: None,
        })
    }

    async fn check_session(&self, token: &str) -> Result<(), RemoteError> {
        self.record(Call::CheckSession {
            token: token.to_string(),
        })
        .await;
        self.authorize(token)
    }

    async fn sign_out(&self, token: &str) -> Result<(), RemoteError> {
        self.record(Call::SignOut {
            token: token.to_string(),
        })
        .await;
        if self.logout_fails {
            return Err(RemoteError::rejected(500, "logout unavailable"));
        }
        Ok(())
    }

    async fn list_products(
        &self,
        token: &str,
        page: u32,
    ) -> Result<ProductListResponse, RemoteError> {
        self.record(Call::ListProducts {
            token: token.to_string(),
            page,
        })
        .await;
        self.authorize(token)?;
        if self.listing_fails.load(Ordering::SeqCst) {
            return Err(RemoteError::rejected(503, "listing unavailable"));
        }
        Ok(ProductListResponse {
            success: true,
            products: vec![
                sample_product(&format!("p{page}-a")),
                sample_product(&format!("p{page}-b")),
            ],
            pagination: PaginationDescriptor {
                total_pages: self.total_pages,
                has_pre: page > 1,
                has_next: page < self.total_pages,
                category: String::new(),
            },
        })
    }

    async fn create_product(
        &self,
        token: &str,
        payload: &ProductPayload,
    ) -> Result<ApiStatus, RemoteError> {
        self.record(Call::CreateProduct {
            token: token.to_string(),
            payload: payload.clone(),
        })
        .await;
        self.authorize(token)?;
        self.mutation_result("created").await
    }

    async fn update_product(
        &self,
        token: &str,
        id: &ProductId,
        payload: &ProductPayload,
    ) -> Result<ApiStatus, RemoteError> {
        self.record(Call::UpdateProduct {
            token: token.to_string(),
            id: id.clone(),
            payload: payload.clone(),
        })
        .await;
        self.authorize(token)?;
        self.mutation_result("updated").await
    }

    async fn delete_product(&self, token: &str, id: &ProductId) -> Result<ApiStatus, RemoteError> {
        self.record(Call::DeleteProduct {
            token: token.to_string(),
            id: id.clone(),
        })
        .await;
        self.authorize(token)?;
        self.mutation_result("deleted").await
    }
}
