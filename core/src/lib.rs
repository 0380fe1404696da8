//! # Storefront Core
//!
//! State and event coordination for the storefront client.
//!
//! This crate holds everything with real invariants: the catalog, the basket,
//! the two-step checkout forms and their validation, the order payload, and
//! the publish/subscribe bus that decouples state from the views rendering it.
//!
//! ## Core Concepts
//!
//! - **`AppState`**: Single source of truth, mutated only through its methods
//! - **Emitted events**: Every mutation returns the change events it produced
//! - **`EventBus`**: Synchronous dispatcher with exact and pattern subscriptions
//! - **Validation**: Pure functions producing a [`FormErrors`] map
//! - **Environment**: The HTTP collaborator, injected as a [`ProductApi`] trait object
//!
//! ## Architecture Principles
//!
//! - Accept, then report: invalid input is stored and surfaced as form errors
//! - Values, not references: the basket holds copies of catalog items
//! - No DOM, no I/O: renderers subscribe, the runtime performs I/O
//!
//! ## Example
//!
//! ```
//! use storefront_core::{AppState, Category, Price, ProductId, ProductItem};
//!
//! let mut state = AppState::new();
//! state.set_catalog(vec![ProductItem::new(
//!     ProductId::new("a"),
//!     "+1 hour",
//!     Category::SoftSkill,
//!     Some(Price::new(750)),
//! )]);
//!
//! let events = state.add_item_to_basket(&ProductId::new("a"));
//! assert_eq!(events.len(), 2);
//! assert_eq!(state.total(), Price::new(750));
//! ```

// Lets `#[derive(BusEvent)]` refer to this crate by name from inside it.
extern crate self as storefront_core;

// Re-export commonly used types
pub use serde::{Deserialize, Serialize};
pub use smallvec::{smallvec, SmallVec};

pub mod basket;
pub mod environment;
pub mod event;
pub mod event_bus;
pub mod form;
pub mod order;
pub mod product;
pub mod state;

pub use basket::Basket;
pub use environment::{ApiError, ApiFuture, ProductApi};
pub use event::{names, StorefrontEvent};
pub use event_bus::{BusEvent, EventBus, EventBusError, Matcher, SubscriptionId};
pub use form::{
    validate_contacts, validate_delivery, ContactField, ContactForm, DeliveryField, DeliveryForm,
    FormErrors, OrderField, Payment,
};
pub use order::{build_order_items, finalize_order, Order, OrderReceipt};
pub use product::{Category, Description, Price, ProductId, ProductItem};
pub use state::{AppState, CheckoutError, CheckoutStep, Emitted};
pub use storefront_macros::BusEvent;

/// Report a broken invariant.
///
/// Invariant violations are defensive no-ops that never reach the user. They
/// are logged at `warn` in debug builds or with the `strict` feature; other
/// builds compile the report out.
#[cfg(any(debug_assertions, feature = "strict"))]
pub(crate) fn invariant_violation(what: &str, id: &ProductId) {
    tracing::warn!(product_id = %id, "invariant violation: {what}");
}

#[cfg(not(any(debug_assertions, feature = "strict")))]
#[inline]
pub(crate) fn invariant_violation(_what: &str, _id: &ProductId) {}
