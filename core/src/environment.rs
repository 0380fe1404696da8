//! External dependencies of the storefront, abstracted for testability.
//!
//! The only collaborator with side effects is the backend HTTP API. It is
//! injected as a [`ProductApi`] trait object so tests can swap in a scripted
//! mock.
//!
//! # Implementations
//!
//! - `ProductApiClient` (in `storefront-api` crate): reqwest-based production client
//! - `MockProductApi` (in `storefront-testing` crate): scripted responses, recorded orders

use crate::order::{Order, OrderReceipt};
use crate::product::ProductItem;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Boxed future returned by [`ProductApi`] methods
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send + 'a>>;

/// Errors reported by the backend API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never got a response (connection refused, timeout, ...).
    #[error("Transport error: {0}")]
    Transport(String),

    /// A response arrived but its body could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The backend answered with a non-success status.
    #[error("Request rejected ({status}): {message}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Message from the response's `error` field
        message: String,
    },
}

/// Backend collaborator: catalog source and order sink.
///
/// # Dyn Compatibility
///
/// Methods return [`ApiFuture`] instead of using `async fn` so the runtime
/// can hold an `Arc<dyn ProductApi>`.
pub trait ProductApi: Send + Sync {
    /// Fetches the full catalog, in backend order.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`]; the caller leaves its state unchanged.
    fn fetch_catalog(&self) -> ApiFuture<'_, Vec<ProductItem>>;

    /// Places `order`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`]; the order was not placed.
    fn submit_order(&self, order: Order) -> ApiFuture<'_, OrderReceipt>;
}
