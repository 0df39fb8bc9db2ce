//! HTTP access to the product and stock APIs.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;

use stockroom_core::{DomainError, ProductId};
use stockroom_inventory::{MovementKind, MovementRequest, StockMovement};
use stockroom_products::{Product, ProductDraft};

use crate::error::{ClientError, ClientResult, ErrorBody};
use crate::identity::IdentityProvider;

/// Remote product catalog. The API is the authority; callers keep only a cache.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list(&self) -> ClientResult<Vec<Product>>;
    async fn create(&self, draft: &ProductDraft) -> ClientResult<Product>;
    async fn update(&self, id: &ProductId, draft: &ProductDraft) -> ClientResult<Product>;
    async fn delete(&self, id: &ProductId) -> ClientResult<()>;
    async fn record_movement(
        &self,
        kind: MovementKind,
        request: &MovementRequest,
    ) -> ClientResult<StockMovement>;
    async fn movement_history(&self, id: &ProductId) -> ClientResult<Vec<StockMovement>>;
}

/// `ProductRepository` over the REST API at `api_root` (e.g. `http://host/api`).
///
/// Stock endpoints live under their own root, `{api_root}/v2/stock` unless
/// set with [`HttpProductRepository::with_stock_root`].
pub struct HttpProductRepository {
    http: reqwest::Client,
    api_root: String,
    stock_root: String,
    identity: Arc<dyn IdentityProvider>,
}

impl HttpProductRepository {
    pub fn new(api_root: impl Into<String>, identity: Arc<dyn IdentityProvider>) -> Self {
        let api_root = api_root.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            stock_root: format!("{api_root}/v2/stock"),
            api_root,
            identity,
        }
    }

    pub fn with_stock_root(mut self, stock_root: impl Into<String>) -> Self {
        self.stock_root = stock_root.into().trim_end_matches('/').to_string();
        self
    }

    fn products_url(&self) -> String {
        format!("{}/products", self.api_root)
    }

    fn product_url(&self, id: &ProductId) -> String {
        format!("{}/products/{}", self.api_root, id)
    }

    fn stock_url(&self, path: &str) -> String {
        format!("{}/{}", self.stock_root, path)
    }

    async fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        match self.identity.access_token().await {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send(&self, req: RequestBuilder) -> ClientResult<Response> {
        let resp = self.authorized(req).await.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), "API request rejected");
        Err(ClientError::ServerRejection {
            status: status.as_u16(),
            message: ErrorBody::message_from(&body),
        })
    }

    async fn json<T: DeserializeOwned>(&self, req: RequestBuilder) -> ClientResult<T> {
        let resp = self.send(req).await?;
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ProductRepository for HttpProductRepository {
    async fn list(&self) -> ClientResult<Vec<Product>> {
        tracing::debug!("fetching products");
        self.json(self.http.get(self.products_url())).await
    }

    async fn create(&self, draft: &ProductDraft) -> ClientResult<Product> {
        self.json(self.http.post(self.products_url()).json(draft)).await
    }

    async fn update(&self, id: &ProductId, draft: &ProductDraft) -> ClientResult<Product> {
        self.json(self.http.put(self.product_url(id)).json(draft)).await
    }

    async fn delete(&self, id: &ProductId) -> ClientResult<()> {
        self.send(self.http.delete(self.product_url(id))).await?;
        Ok(())
    }

    async fn record_movement(
        &self,
        kind: MovementKind,
        request: &MovementRequest,
    ) -> ClientResult<StockMovement> {
        let endpoint = kind.endpoint().ok_or_else(|| {
            DomainError::validation(format!("{} cannot be requested", kind.description()))
        })?;
        self.json(self.http.post(self.stock_url(endpoint)).json(request))
            .await
    }

    async fn movement_history(&self, id: &ProductId) -> ClientResult<Vec<StockMovement>> {
        self.json(self.http.get(self.stock_url(&format!("history/{id}"))))
            .await
    }
}
