//! # Storefront API Client
//!
//! HTTP client for the storefront backend: the catalog source and the order
//! sink behind [`storefront_core::ProductApi`].
//!
//! ## Example
//!
//! ```no_run
//! use storefront_api::ProductApiClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads STOREFRONT_API_URL, STOREFRONT_CDN_URL, STOREFRONT_TIMEOUT_SECS
//!     let client = ProductApiClient::from_env()?;
//!
//!     let catalog = client.get_product_list().await?;
//!     println!("{} products", catalog.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Endpoints
//!
//! - `GET {api}/product` - the catalog, as `{ total, items }`
//! - `GET {api}/product/{id}` - one product
//! - `POST {api}/order` - place an order, answered with `{ id, total }`
//!
//! Error responses carry `{ error }`, surfaced as
//! [`ApiError::Rejected`](storefront_core::ApiError::Rejected).

pub mod client;
pub mod config;
pub mod error;
pub mod types;

// Re-export main types for convenience
pub use client::ProductApiClient;
pub use config::ApiConfig;
pub use error::ConfigError;
pub use types::{ErrorBody, ProductList};
