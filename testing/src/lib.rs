//! # Storefront Testing
//!
//! Testing utilities and helpers for the storefront.
//!
//! This crate provides:
//! - A scripted [`MockProductApi`] standing in for the backend
//! - [`EventRecorder`] for asserting on what went over the bus
//! - Fixtures: a sample catalog and filled-in checkout forms
//! - [`StateTest`], a given/when/then harness for [`AppState`] methods
//! - proptest strategies for catalog and basket operations
//!
//! ## Example
//!
//! ```ignore
//! use storefront_testing::{fixtures, EventRecorder, MockProductApi};
//! use storefront_runtime::Storefront;
//!
//! #[tokio::test]
//! async fn test_checkout() {
//!     let api = Arc::new(MockProductApi::with_catalog(fixtures::sample_catalog()));
//!     let storefront = Storefront::new(api.clone());
//!     let recorder = EventRecorder::attach(storefront.bus());
//!
//!     storefront.load_catalog().await.unwrap();
//!     assert_eq!(recorder.count(names::CATALOG_CHANGED), 1);
//! }
//! ```
//!
//! [`AppState`]: storefront_core::AppState

pub mod fixtures;
pub mod recorder;

/// Mock implementations of environment traits
pub mod mocks {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex, PoisonError};
    use storefront_core::{ApiError, ApiFuture, Order, OrderReceipt, ProductApi, ProductItem};
    use tokio::sync::Notify;

    /// Scripted backend
    ///
    /// Serves a fixed catalog (or a fixed error) and answers order
    /// submissions from a queue of scripted results. With the queue empty,
    /// every order is accepted with a sequential id. Submitted orders are
    /// recorded for inspection.
    ///
    /// # Example
    ///
    /// ```
    /// use storefront_testing::mocks::MockProductApi;
    /// use storefront_core::ApiError;
    ///
    /// let api = MockProductApi::new();
    /// api.push_submit_result(Err(ApiError::Transport("offline".into())));
    /// assert_eq!(api.submitted_orders().len(), 0);
    /// ```
    #[derive(Debug, Default)]
    pub struct MockProductApi {
        catalog: Mutex<Option<Result<Vec<ProductItem>, ApiError>>>,
        submit_results: Mutex<VecDeque<Result<OrderReceipt, ApiError>>>,
        orders: Mutex<Vec<Order>>,
        gate: Mutex<Option<Arc<Notify>>>,
        fetch_calls: AtomicUsize,
    }

    impl MockProductApi {
        /// Backend with an empty catalog that accepts every order
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Backend serving `items`
        #[must_use]
        pub fn with_catalog(items: Vec<ProductItem>) -> Self {
            let api = Self::new();
            api.set_catalog(Ok(items));
            api
        }

        /// Replace what `fetch_catalog` returns
        pub fn set_catalog(&self, result: Result<Vec<ProductItem>, ApiError>) {
            *lock(&self.catalog) = Some(result);
        }

        /// Queue the result of the next unanswered `submit_order`
        pub fn push_submit_result(&self, result: Result<OrderReceipt, ApiError>) {
            lock(&self.submit_results).push_back(result);
        }

        /// Make every following submission wait until the returned
        /// [`Notify`] is notified once per submission
        #[must_use]
        pub fn hold_submissions(&self) -> Arc<Notify> {
            let gate = Arc::new(Notify::new());
            *lock(&self.gate) = Some(Arc::clone(&gate));
            gate
        }

        /// Orders received so far, in arrival order
        #[must_use]
        pub fn submitted_orders(&self) -> Vec<Order> {
            lock(&self.orders).clone()
        }

        /// Number of `fetch_catalog` calls
        #[must_use]
        pub fn fetch_count(&self) -> usize {
            self.fetch_calls.load(Ordering::SeqCst)
        }
    }

    impl ProductApi for MockProductApi {
        fn fetch_catalog(&self) -> ApiFuture<'_, Vec<ProductItem>> {
            self.fetch_calls.fetch_add(1, Ordering::SeqCst);
            let result = lock(&self.catalog).clone().unwrap_or_else(|| Ok(Vec::new()));
            Box::pin(async move { result })
        }

        fn submit_order(&self, order: Order) -> ApiFuture<'_, OrderReceipt> {
            Box::pin(async move {
                let sequence = {
                    let mut orders = lock(&self.orders);
                    orders.push(order.clone());
                    orders.len()
                };

                let gate = lock(&self.gate).clone();
                if let Some(gate) = gate {
                    gate.notified().await;
                }

                lock(&self.submit_results).pop_front().unwrap_or_else(|| {
                    Ok(OrderReceipt {
                        id: format!("order-{sequence}"),
                        total: order.total,
                    })
                })
            })
        }
    }

    fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
        mutex.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Test helpers and utilities
pub mod helpers {
    use tracing_subscriber::EnvFilter;

    /// Install a test-friendly tracing subscriber
    ///
    /// Honors `RUST_LOG`, defaulting to `debug` for the storefront crates.
    /// Safe to call from every test; only the first call installs anything.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("storefront_core=debug,storefront_runtime=debug"));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use proptest::prelude::*;
    use storefront_core::{Category, Price, ProductId, ProductItem};

    /// One basket operation
    #[derive(Clone, Debug)]
    pub enum BasketOp {
        /// Add the product with this id
        Add(ProductId),
        /// Remove the product with this id
        Remove(ProductId),
    }

    /// Ids drawn from a small pool so duplicates are frequent
    pub fn product_id() -> impl Strategy<Value = ProductId> {
        (0..6u8).prop_map(|n| ProductId::new(format!("p{n}")))
    }

    /// A price between 1 and 100 000
    pub fn price() -> impl Strategy<Value = Price> {
        (1..=100_000u64).prop_map(Price::new)
    }

    /// A purchasable product with the given id
    pub fn priced_item(id: ProductId) -> impl Strategy<Value = ProductItem> {
        price().prop_map(move |price| {
            ProductItem::new(id.clone(), format!("Item {id}"), Category::Other, Some(price))
        })
    }

    /// A catalog covering the whole [`product_id`] pool, every item priced
    pub fn full_catalog() -> impl Strategy<Value = Vec<ProductItem>> {
        (0..6u8)
            .map(|n| priced_item(ProductId::new(format!("p{n}"))))
            .collect::<Vec<_>>()
    }

    /// A single add or remove
    pub fn basket_op() -> impl Strategy<Value = BasketOp> {
        prop_oneof![
            3 => product_id().prop_map(BasketOp::Add),
            1 => product_id().prop_map(BasketOp::Remove),
        ]
    }

    /// A sequence of up to `max` basket operations
    pub fn basket_ops(max: usize) -> impl Strategy<Value = Vec<BasketOp>> {
        prop::collection::vec(basket_op(), 0..=max)
    }
}

// Re-export commonly used items
pub use fixtures::{sample_catalog, PRICED_ID, UNPRICED_ID};
pub use mocks::MockProductApi;
pub use recorder::EventRecorder;
pub use state_test::StateTest;
