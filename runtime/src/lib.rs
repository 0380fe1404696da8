//! # Storefront Runtime
//!
//! Runtime that ties the storefront together.
//!
//! A [`Storefront`] owns one [`AppState`], one [`EventBus`], and one
//! [`ProductApi`]. Views publish intent events on the bus; the runtime maps
//! them to state mutations and publishes the resulting change events back.
//!
//! ## Core Components
//!
//! - **`Storefront`**: State behind a lock, plus the bus and the backend API
//! - **Intent wiring**: `bind_intents` subscribes one handler per intent
//! - **Async operations**: `load_catalog` and `submit_order` talk to the backend
//!
//! ## Example
//!
//! ```ignore
//! use storefront_runtime::Storefront;
//! use storefront_core::{names, StorefrontEvent};
//!
//! let storefront = Storefront::new(api);
//! storefront.bind_intents()?;
//!
//! storefront.bus().on(names::COUNT_CHANGED, |event| {
//!     if let StorefrontEvent::CountChanged { count } = event {
//!         println!("{count} in basket");
//!     }
//! });
//!
//! storefront.load_catalog().await?;
//! storefront.publish(&StorefrontEvent::ItemAdded { id: ProductId::new("a") });
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use storefront_core::{
    names, AppState, ContactField, DeliveryField, Emitted, EventBus, Matcher, OrderReceipt,
    ProductApi, StorefrontEvent, SubscriptionId,
};

/// Error types for the storefront runtime
pub mod error {
    use storefront_core::{ApiError, CheckoutError, EventBusError};
    use thiserror::Error;

    /// Errors that can occur during storefront operations
    #[derive(Error, Debug)]
    pub enum StorefrontError {
        /// The backend call failed
        ///
        /// State is left unchanged; retrying is up to the caller.
        #[error("Backend request failed: {0}")]
        Api(#[from] ApiError),

        /// The order is not ready to be submitted
        #[error("Order not ready: {0}")]
        Checkout(#[from] CheckoutError),

        /// Another submission has not finished yet
        #[error("An order submission is already in progress")]
        SubmitInProgress,

        /// An intent subscription could not be registered
        #[error("Failed to bind intents: {0}")]
        Bus(#[from] EventBusError),

        /// `bind_intents` was already called on this storefront
        #[error("Intents are already bound")]
        AlreadyBound,
    }
}

pub use error::StorefrontError;

/// Guard that clears a busy flag on drop
struct FlagGuard<'a>(&'a AtomicBool);

impl Drop for FlagGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

struct Inner {
    state: Mutex<AppState>,
    outbox: Mutex<VecDeque<StorefrontEvent>>,
    publishing: AtomicBool,
    bus: EventBus<StorefrontEvent>,
    api: Arc<dyn ProductApi>,
    submitting: AtomicBool,
    bound: AtomicBool,
}

/// The storefront runtime
///
/// Cheap to clone; clones share state, bus, and API.
///
/// # Locking
///
/// State lives behind a mutex that is only held while an [`AppState`] method
/// runs. Change events go into an outbox in mutation order and are published
/// after the lock is released, so every handler observes the updated state
/// and may call back into the runtime.
///
/// Only the outermost `update` publishes. An `update` made by a handler
/// appends its events behind the ones still waiting, so the last event of
/// each kind a view receives always describes the final state.
///
/// Calling [`Storefront::update`] or [`Storefront::state`] from inside an
/// `update` closure deadlocks.
#[derive(Clone)]
pub struct Storefront {
    inner: Arc<Inner>,
}

impl fmt::Debug for Storefront {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storefront")
            .field("bus", &self.inner.bus)
            .field("submitting", &self.inner.submitting.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl Storefront {
    /// Create a storefront with empty state
    #[must_use]
    pub fn new(api: Arc<dyn ProductApi>) -> Self {
        Self::with_state(AppState::new(), api)
    }

    /// Create a storefront starting from `state`
    #[must_use]
    pub fn with_state(state: AppState, api: Arc<dyn ProductApi>) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(state),
                outbox: Mutex::new(VecDeque::new()),
                publishing: AtomicBool::new(false),
                bus: EventBus::new(),
                api,
                submitting: AtomicBool::new(false),
                bound: AtomicBool::new(false),
            }),
        }
    }

    /// The bus views subscribe to and publish intents on
    #[must_use]
    pub fn bus(&self) -> &EventBus<StorefrontEvent> {
        &self.inner.bus
    }

    /// Publish an event on the bus; returns the number of handlers invoked
    pub fn publish(&self, event: &StorefrontEvent) -> usize {
        self.inner.bus.emit(event)
    }

    /// Read current state via a closure
    ///
    /// ```ignore
    /// let count = storefront.state(AppState::count);
    /// ```
    pub fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&AppState) -> T,
    {
        let state = self.inner.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    /// Mutate state, then publish the change events the mutation returned
    ///
    /// Returns the number of events the mutation produced. When called from
    /// a handler they are published once the events ahead of them are.
    pub fn update<F>(&self, f: F) -> usize
    where
        F: FnOnce(&mut AppState) -> Emitted,
    {
        let produced = {
            let mut state = self.inner.state.lock().unwrap_or_else(PoisonError::into_inner);
            let emitted: Emitted = f(&mut state);
            let produced = emitted.len();
            // Queued under the state lock so the outbox follows mutation order
            self.outbox().extend(emitted);
            produced
        };

        self.drain_outbox();
        produced
    }

    /// Subscribe the handlers that turn intent events into state mutations
    ///
    /// Handlers hold a weak reference to the runtime; once every
    /// `Storefront` clone is dropped they do nothing.
    ///
    /// # Errors
    ///
    /// - [`StorefrontError::AlreadyBound`] on every call after the first
    /// - [`StorefrontError::Bus`] if an input pattern fails to compile
    pub fn bind_intents(&self) -> Result<Vec<SubscriptionId>, StorefrontError> {
        let order_inputs = Matcher::pattern(names::ORDER_INPUT_PATTERN)?;
        let contact_inputs = Matcher::pattern(names::CONTACTS_INPUT_PATTERN)?;

        if self.inner.bound.swap(true, Ordering::AcqRel) {
            tracing::warn!("intents already bound");
            return Err(StorefrontError::AlreadyBound);
        }

        let ids = vec![
            self.bind(names::CARD_SELECT, |sf, event| {
                if let StorefrontEvent::CardSelected { id } = event {
                    sf.update(|s| s.set_preview(id));
                }
            }),
            self.bind(names::ITEM_CHECK, |sf, event| {
                if let StorefrontEvent::ItemChecked { id } = event {
                    sf.update(|s| {
                        let mut emitted = s.toggle_basket_item(id);
                        emitted.extend(s.set_preview(id));
                        emitted
                    });
                }
            }),
            self.bind(names::ITEM_ADD, |sf, event| {
                if let StorefrontEvent::ItemAdded { id } = event {
                    sf.update(|s| s.add_item_to_basket(id));
                }
            }),
            self.bind(names::ITEM_DELETE, |sf, event| {
                if let StorefrontEvent::ItemDeleted { id } = event {
                    sf.update(|s| s.delete_item_from_basket(id));
                }
            }),
            self.bind(names::ORDER_OPEN, |sf, _| {
                sf.update(AppState::open_delivery_step);
            }),
            self.bind(order_inputs, |sf, event| match event {
                StorefrontEvent::PaymentInput { value } => {
                    sf.update(|s| s.set_order_field(DeliveryField::Payment, value));
                }
                StorefrontEvent::AddressInput { value } => {
                    sf.update(|s| s.set_order_field(DeliveryField::Address, value));
                }
                other => tracing::debug!(event = ?other, "unhandled delivery input"),
            }),
            self.bind(names::ORDER_SUBMIT, |sf, _| {
                sf.update(AppState::open_contacts_step);
            }),
            self.bind(contact_inputs, |sf, event| match event {
                StorefrontEvent::EmailInput { value } => {
                    sf.update(|s| s.set_contact_field(ContactField::Email, value));
                }
                StorefrontEvent::PhoneInput { value } => {
                    sf.update(|s| s.set_contact_field(ContactField::Phone, value));
                }
                other => tracing::debug!(event = ?other, "unhandled contact input"),
            }),
            self.bind(names::CHECKOUT_CLOSE, |sf, _| {
                sf.update(AppState::close_checkout);
            }),
            self.bind(names::CONTACTS_SUBMIT, |sf, _| sf.spawn_submit()),
        ];

        tracing::debug!(handlers = ids.len(), "intents bound");
        Ok(ids)
    }

    /// Fetch the catalog and replace the current one
    ///
    /// Returns the number of products loaded.
    ///
    /// # Errors
    ///
    /// [`StorefrontError::Api`] if the fetch fails; state is left unchanged.
    #[tracing::instrument(skip(self), name = "storefront_load_catalog")]
    pub async fn load_catalog(&self) -> Result<usize, StorefrontError> {
        match self.inner.api.fetch_catalog().await {
            Ok(items) => {
                let count = items.len();
                self.update(|s| s.set_catalog(items));
                tracing::info!(items = count, "catalog loaded");
                Ok(count)
            }
            Err(error) => {
                tracing::error!(%error, "failed to load catalog");
                Err(error.into())
            }
        }
    }

    /// Submit the current order
    ///
    /// On success the ordered products leave the basket, the submitted form
    /// values are cleared, and checkout closes. Products added and fields
    /// edited while the request was in flight stay. On failure nothing
    /// changes, so the user can simply try again.
    ///
    /// # Errors
    ///
    /// - [`StorefrontError::SubmitInProgress`] if a submission is already running
    /// - [`StorefrontError::Checkout`] if the order is not ready
    /// - [`StorefrontError::Api`] if the backend refused or could not be reached
    #[tracing::instrument(skip(self), name = "storefront_submit_order")]
    pub async fn submit_order(&self) -> Result<OrderReceipt, StorefrontError> {
        if self.inner.submitting.swap(true, Ordering::AcqRel) {
            tracing::warn!("order submission already in progress");
            return Err(StorefrontError::SubmitInProgress);
        }
        let _guard = FlagGuard(&self.inner.submitting);

        let order = self
            .state(AppState::checkout_order)
            .inspect_err(|error| tracing::warn!(%error, "order not ready"))?;
        tracing::debug!(items = order.items.len(), total = %order.total, "submitting order");

        match self.inner.api.submit_order(order.clone()).await {
            Ok(receipt) => {
                tracing::info!(order_id = %receipt.id, total = %receipt.total, "order placed");
                self.update(|s| s.complete_order(&order, receipt.clone()));
                Ok(receipt)
            }
            Err(error) => {
                tracing::error!(%error, "order submission failed");
                Err(error.into())
            }
        }
    }

    /// Whether an order submission is currently running
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.inner.submitting.load(Ordering::Acquire)
    }

    fn outbox(&self) -> MutexGuard<'_, VecDeque<StorefrontEvent>> {
        self.inner.outbox.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publish queued change events until the outbox is empty.
    ///
    /// Returns at once if another call is already publishing; that call
    /// delivers whatever was queued.
    fn drain_outbox(&self) {
        while !self.inner.publishing.swap(true, Ordering::AcqRel) {
            {
                let _publishing = FlagGuard(&self.inner.publishing);
                loop {
                    let next = self.outbox().pop_front();
                    let Some(event) = next else { break };
                    self.inner.bus.emit(&event);
                }
            }

            // Events queued between the last pop and the flag reset
            if self.outbox().is_empty() {
                break;
            }
        }
    }

    fn bind<F>(&self, matcher: impl Into<Matcher>, handler: F) -> SubscriptionId
    where
        F: Fn(&Self, &StorefrontEvent) + Send + Sync + 'static,
    {
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        self.inner.bus.subscribe(matcher, move |event| {
            if let Some(inner) = weak.upgrade() {
                handler(&Self { inner }, event);
            }
        })
    }

    fn spawn_submit(&self) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::error!("no async runtime available; order not submitted");
            return;
        };

        let storefront = self.clone();
        handle.spawn(async move {
            // Failures are logged inside submit_order
            let _ = storefront.submit_order().await;
        });
    }
}
