use std::future::Future;
use std::time::Duration;

use reqwest::{Client, ClientBuilder, Response};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::structs::{Product, ProductId, ProductInput};

/// The REST backend as seen by the cache and the row actions.
pub trait ProductApi: Send + Sync + 'static {
    fn list(&self) -> impl Future<Output = Result<Vec<Product>, ApiError>> + Send;

    fn delete(&self, id: &ProductId) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn create(&self, input: &ProductInput) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn update(
        &self,
        id: &ProductId,
        input: &ProductInput,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpProductApi {
    client: Client,
    base_url: String,
}

impl HttpProductApi {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(2))
            .build()
            .map_err(|e| ApiError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn collection_url(&self) -> String {
        format!("{}/products", self.base_url)
    }

    fn item_url(&self, id: &ProductId) -> String {
        format!("{}/products/{}", self.base_url, id)
    }
}

/// Turns a non-2xx response into `ApiError::Status`, keeping the body text
/// for the log.
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| status.canonical_reason().unwrap_or_default().to_string());
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

impl ProductApi for HttpProductApi {
    #[tracing::instrument(skip(self), fields(url = %self.collection_url()))]
    async fn list(&self) -> Result<Vec<Product>, ApiError> {
        let response = self.client.get(self.collection_url()).send().await?;
        let response = check_status(response).await?;
        let products: Vec<Product> = response.json().await?;
        tracing::debug!(count = products.len(), "listed products");
        Ok(products)
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: &ProductId) -> Result<(), ApiError> {
        let response = self.client.delete(self.item_url(id)).send().await?;
        check_status(response).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn create(&self, input: &ProductInput) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.collection_url())
            .json(input)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn update(&self, id: &ProductId, input: &ProductInput) -> Result<(), ApiError> {
        let response = self
            .client
            .put(self.item_url(id))
            .json(input)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}
