//! Storefront backend client implementation

use crate::config::ApiConfig;
use crate::error::ConfigError;
use crate::types::{ErrorBody, ProductList};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use storefront_core::{
    ApiError, ApiFuture, Order, OrderReceipt, ProductApi, ProductId, ProductItem,
};
use url::Url;

/// Storefront backend client
#[derive(Clone, Debug)]
pub struct ProductApiClient {
    client: Client,
    api_url: Url,
    cdn_url: Url,
}

impl ProductApiClient {
    /// Create a new client with configuration from the environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration is missing or invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(&ApiConfig::from_env()?)
    }

    /// Create a new client with explicit configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] for a malformed URL, or
    /// [`ConfigError::Client`] if the HTTP client cannot be built
    pub fn new(config: &ApiConfig) -> Result<Self, ConfigError> {
        let api_url = config.parsed_api_url()?;
        let cdn_url = config.parsed_cdn_url()?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;

        Ok(Self {
            client,
            api_url,
            cdn_url,
        })
    }

    /// Fetch the whole catalog
    ///
    /// Image paths are turned into absolute CDN URLs.
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, rejected requests, or undecodable bodies
    pub async fn get_product_list(&self) -> Result<Vec<ProductItem>, ApiError> {
        let url = self.endpoint(&["product"]);
        tracing::debug!(%url, "fetching catalog");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let list: ProductList = read_json(response).await?;
        if list.total != list.items.len() {
            tracing::debug!(total = list.total, items = list.items.len(), "catalog total differs from items");
        }

        Ok(list
            .items
            .into_iter()
            .map(|item| self.with_cdn_image(item))
            .collect())
    }

    /// Fetch a single product
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, rejected requests, or undecodable bodies
    pub async fn get_product(&self, id: &ProductId) -> Result<ProductItem, ApiError> {
        let url = self.endpoint(&["product", id.as_str()]);
        tracing::debug!(%url, "fetching product");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let item: ProductItem = read_json(response).await?;
        Ok(self.with_cdn_image(item))
    }

    /// Place an order
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, rejected orders, or undecodable bodies
    pub async fn order_products(&self, order: &Order) -> Result<OrderReceipt, ApiError> {
        let url = self.endpoint(&["order"]);
        tracing::debug!(%url, items = order.items.len(), total = %order.total, "placing order");

        let response = self
            .client
            .post(url)
            .json(order)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        read_json(response).await
    }

    /// `segments` appended to the backend base URL
    fn endpoint(&self, segments: &[&str]) -> Url {
        join(&self.api_url, segments.iter().copied())
    }

    /// Turns a relative image path into an absolute CDN URL
    fn with_cdn_image(&self, mut item: ProductItem) -> ProductItem {
        if !item.image.is_empty() && Url::parse(&item.image).is_err() {
            let segments = item.image.split('/').filter(|s| !s.is_empty());
            item.image = join(&self.cdn_url, segments).into();
        }
        item
    }
}

impl ProductApi for ProductApiClient {
    fn fetch_catalog(&self) -> ApiFuture<'_, Vec<ProductItem>> {
        Box::pin(self.get_product_list())
    }

    fn submit_order(&self, order: Order) -> ApiFuture<'_, OrderReceipt> {
        Box::pin(async move { self.order_products(&order).await })
    }
}

fn join<'a>(base: &Url, segments: impl IntoIterator<Item = &'a str>) -> Url {
    let mut url = base.clone();
    // http(s) URLs always have a path to extend
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Decode a success body, or turn an error status into [`ApiError::Rejected`]
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();

    if status.is_success() {
        return response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()));
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body).map_or_else(
        |_| {
            if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_string()
            } else {
                body.clone()
            }
        },
        |parsed| parsed.error,
    );

    tracing::warn!(status = status.as_u16(), %message, "backend rejected request");
    Err(ApiError::Rejected {
        status: status.as_u16(),
        message,
    })
}
