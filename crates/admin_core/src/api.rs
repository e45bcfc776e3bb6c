use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::ProductId,
    error::ApiStatus,
    protocol::{DataEnvelope, ProductListResponse, ProductPayload, SigninRequest, SigninResponse},
};
use tracing::debug;

use crate::error::RemoteError;

/// Remote product store. Every authenticated call takes the token explicitly.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn sign_in(&self, request: &SigninRequest) -> Result<SigninResponse, RemoteError>;
    async fn check_session(&self, token: &str) -> Result<(), RemoteError>;
    async fn sign_out(&self, token: &str) -> Result<(), RemoteError>;
    async fn list_products(
        &self,
        token: &str,
        page: u32,
    ) -> Result<ProductListResponse, RemoteError>;
    async fn create_product(
        &self,
        token: &str,
        payload: &ProductPayload,
    ) -> Result<ApiStatus, RemoteError>;
    async fn update_product(
        &self,
        token: &str,
        id: &ProductId,
        payload: &ProductPayload,
    ) -> Result<ApiStatus, RemoteError>;
    async fn delete_product(&self, token: &str, id: &ProductId) -> Result<ApiStatus, RemoteError>;
}

pub struct HttpCatalogApi {
    http: Client,
    base_url: String,
    api_path: String,
}

impl HttpCatalogApi {
    pub fn new(base_url: impl Into<String>, api_path: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url, api_path)
    }

    pub fn with_client(
        http: Client,
        base_url: impl Into<String>,
        api_path: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_path: api_path.into().trim_matches('/').to_string(),
        }
    }

    fn url(&self, suffix: &str) -> String {
        format!("{}{}", self.base_url, suffix)
    }

    fn store_url(&self, suffix: &str) -> String {
        format!("{}/api/{}{}", self.base_url, self.api_path, suffix)
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogApi {
    async fn sign_in(&self, request: &SigninRequest) -> Result<SigninResponse, RemoteError> {
        let res = self
            .http
            .post(self.url("/admin/signin"))
            .json(request)
            .send()
            .await?;
        decode(res).await
    }

    async fn check_session(&self, token: &str) -> Result<(), RemoteError> {
        let res = self
            .http
            .post(self.url("/api/user/check"))
            .header(AUTHORIZATION, token)
            .send()
            .await?;
        let _: ApiStatus = decode(res).await?;
        Ok(())
    }

    async fn sign_out(&self, token: &str) -> Result<(), RemoteError> {
        let res = self
            .http
            .post(self.url("/logout"))
            .header(AUTHORIZATION, token)
            .send()
            .await?;
        let _: ApiStatus = decode(res).await?;
        Ok(())
    }

    async fn list_products(
        &self,
        token: &str,
        page: u32,
    ) -> Result<ProductListResponse, RemoteError> {
        let res = self
            .http
            .get(self.store_url("/admin/products"))
            .query(&[("page", page)])
            .header(AUTHORIZATION, token)
            .send()
            .await?;
        decode(res).await
    }

    async fn create_product(
        &self,
        token: &str,
        payload: &ProductPayload,
    ) -> Result<ApiStatus, RemoteError> {
        let res = self
            .http
            .post(self.store_url("/admin/product"))
            .header(AUTHORIZATION, token)
            .json(&DataEnvelope { data: payload })
            .send()
            .await?;
        decode(res).await
    }

    async fn update_product(
        &self,
        token: &str,
        id: &ProductId,
        payload: &ProductPayload,
    ) -> Result<ApiStatus, RemoteError> {
        let res = self
            .http
            .put(self.store_url(&format!("/admin/product/{id}")))
            .header(AUTHORIZATION, token)
            .json(&DataEnvelope { data: payload })
            .send()
            .await?;
        decode(res).await
    }

    async fn delete_product(&self, token: &str, id: &ProductId) -> Result<ApiStatus, RemoteError> {
        let res = self
            .http
            .delete(self.store_url(&format!("/admin/product/{id}")))
            .header(AUTHORIZATION, token)
            .send()
            .await?;
        decode(res).await
    }
}

/// A response fails on a non-2xx status or on `success: false` in the body.
async fn decode<T: DeserializeOwned>(res: Response) -> Result<T, RemoteError> {
    let status = res.status();
    let body = res.text().await?;
    let envelope: ApiStatus = serde_json::from_str(&body).unwrap_or_default();

    if !status.is_success() || envelope.is_rejected() {
        let message = envelope.message_text().unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request rejected")
                .to_string()
        });
        debug!(status = status.as_u16(), %message, "api: store rejected request");
        return Err(RemoteError::rejected(status.as_u16(), message));
    }

    serde_json::from_str(&body).map_err(|err| RemoteError::Decode(err.to_string()))
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
