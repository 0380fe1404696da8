//! The application state: single source of truth for the storefront.
//!
//! [`AppState`] owns the catalog, the basket, the preview selection, both
//! checkout forms, and the current checkout step. Every mutating method
//! returns the change events it produced ([`Emitted`]). The caller publishes
//! them once the method has returned, so subscribers never see a partially
//! applied change.
//!
//! # Accept, then report
//!
//! Form input is always stored, valid or not. Problems surface through
//! [`FormErrors`] in the `*-errors-changed` events, never as a rejected call.
//! Calls that would break an invariant (an unknown id, an unpriced item, a
//! step out of order) are no-ops that emit nothing.
//!
//! # Checkout
//!
//! ```text
//!            open_delivery_step()          open_contacts_step()
//! Browsing ─────────────────────► Delivery ───────────────────► Contacts
//!    ▲     (basket not empty)        │      (delivery valid)       │
//!    │                               │                             │
//!    └────────── close_checkout() ───┴──── complete_order() ───────┘
//! ```

use crate::basket::Basket;
use crate::event::StorefrontEvent;
use crate::form::{
    validate_contacts, validate_delivery, ContactField, ContactForm, DeliveryField, DeliveryForm,
    FormErrors, Payment,
};
use crate::order::{build_order_items, finalize_order, Order, OrderReceipt};
use crate::product::{Price, ProductId, ProductItem};
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};
use std::fmt;
use thiserror::Error;

/// Change events produced by one state mutation, in emission order
pub type Emitted = SmallVec<[StorefrontEvent; 4]>;

/// Where the user is in the two-step checkout
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutStep {
    /// Not checking out
    #[default]
    Browsing,
    /// Filling in payment method and address
    Delivery,
    /// Filling in email and phone
    Contacts,
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Browsing => write!(f, "browsing"),
            Self::Delivery => write!(f, "delivery"),
            Self::Contacts => write!(f, "contacts"),
        }
    }
}

/// Why the current order cannot be submitted
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// Nothing to order
    #[error("Basket is empty")]
    EmptyBasket,

    /// Submission is only possible from the contacts step
    #[error("Cannot submit from the {step} step")]
    WrongStep {
        /// Current step
        step: CheckoutStep,
    },

    /// At least one form field is invalid
    #[error("Order form is invalid: {}", .0.summary())]
    Invalid(FormErrors),
}

/// Storefront application state
#[derive(Clone, Debug, Default)]
pub struct AppState {
    catalog: Vec<ProductItem>,
    basket: Basket,
    preview: Option<ProductId>,
    delivery: DeliveryForm,
    contacts: ContactForm,
    items: Vec<ProductId>,
    total: Price,
    form_errors: FormErrors,
    step: CheckoutStep,
}

impl AppState {
    /// Creates an empty state: no catalog, empty basket, blank forms
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Catalog & preview ==========

    /// Replaces the catalog.
    ///
    /// Basket entries missing from the new catalog, or no longer for sale,
    /// are dropped; the rest are refreshed from it. A preview of a product
    /// that disappeared is cleared and reported with `preview-cleared`.
    pub fn set_catalog(&mut self, items: Vec<ProductItem>) -> Emitted {
        self.catalog = items;
        tracing::debug!(items = self.catalog.len(), "catalog replaced");

        let stale = self
            .preview
            .as_ref()
            .is_some_and(|id| self.find(id).is_none());
        let stale_preview = if stale { self.preview.take() } else { None };

        let catalog = &self.catalog;
        let basket_changed = self.basket.refresh(|held| {
            catalog
                .iter()
                .find(|item| item.id == held.id && item.is_purchasable())
                .cloned()
        });

        let mut emitted: Emitted = smallvec![StorefrontEvent::CatalogChanged {
            catalog: self.catalog.clone(),
        }];
        if let Some(id) = stale_preview {
            tracing::debug!(product_id = %id, "previewed product left the catalog");
            emitted.push(StorefrontEvent::PreviewCleared { id });
        }
        if basket_changed {
            tracing::debug!(count = self.basket.count(), "basket pruned against new catalog");
            emitted.extend(self.basket_changed());
        }
        emitted
    }

    /// Shows the product with `id` in the detail view.
    ///
    /// Ignored if the catalog has no such product.
    pub fn set_preview(&mut self, id: &ProductId) -> Emitted {
        let Some(item) = self.find(id).cloned() else {
            crate::invariant_violation("preview of product outside catalog", id);
            return Emitted::new();
        };

        self.preview = Some(id.clone());
        smallvec![StorefrontEvent::PreviewChanged {
            in_basket: self.basket.contains(id),
            item,
        }]
    }

    // ========== Basket ==========

    /// Adds the catalog product with `id` to the basket.
    ///
    /// Unknown and unpriced products are rejected without any emission. A
    /// product already in the basket stays once; the change events are still
    /// emitted so views re-render from a fresh snapshot.
    pub fn add_item_to_basket(&mut self, id: &ProductId) -> Emitted {
        let Some(item) = self.find(id).cloned() else {
            crate::invariant_violation("add of product outside catalog", id);
            return Emitted::new();
        };
        if !item.is_purchasable() {
            crate::invariant_violation("add of product that is not for sale", id);
            return Emitted::new();
        }

        if self.basket.add(item) {
            tracing::debug!(product_id = %id, "added to basket");
        } else {
            crate::invariant_violation("duplicate basket add", id);
        }
        self.basket_changed()
    }

    /// Removes the product with `id` from the basket. Absent ids are a no-op.
    pub fn delete_item_from_basket(&mut self, id: &ProductId) -> Emitted {
        if self.basket.remove(id) {
            tracing::debug!(product_id = %id, "removed from basket");
        }
        self.basket_changed()
    }

    /// Adds the product if it is not in the basket, removes it otherwise
    pub fn toggle_basket_item(&mut self, id: &ProductId) -> Emitted {
        if self.basket.contains(id) {
            self.delete_item_from_basket(id)
        } else {
            self.add_item_to_basket(id)
        }
    }

    /// Empties the basket; used once an order has been accepted
    pub fn clear_basket(&mut self) -> Emitted {
        self.basket.clear();
        tracing::debug!("basket cleared");
        self.basket_changed()
    }

    // ========== Checkout forms ==========

    /// Stores delivery-form input and re-validates the delivery form
    pub fn set_order_field(&mut self, field: DeliveryField, value: &str) -> Emitted {
        self.delivery.set(field, value);
        let errors = self.validate_order_form();
        smallvec![StorefrontEvent::OrderFormErrorsChanged { errors }]
    }

    /// Stores contact-form input and re-validates the contact form.
    ///
    /// `contacts-valid` follows the errors event only when the form is valid.
    pub fn set_contact_field(&mut self, field: ContactField, value: &str) -> Emitted {
        self.contacts.set(field, value);
        let errors = self.validate_contacts_form();
        let valid = errors.is_valid();

        let mut emitted: Emitted = smallvec![StorefrontEvent::ContactsFormErrorsChanged { errors }];
        if valid {
            emitted.push(StorefrontEvent::ContactsValid);
        }
        emitted
    }

    /// Clears payment, address, email, and phone. Items and total are kept.
    pub fn reset_order_fields(&mut self) {
        self.delivery = DeliveryForm::default();
        self.contacts = ContactForm::default();
        self.form_errors = FormErrors::new();
    }

    // ========== Checkout steps ==========

    /// Starts checkout from the basket.
    ///
    /// Ignored when the basket is empty.
    pub fn open_delivery_step(&mut self) -> Emitted {
        if self.basket.is_empty() {
            tracing::warn!("checkout requested with an empty basket");
            return Emitted::new();
        }
        self.items = build_order_items(&self.basket);
        self.set_step(CheckoutStep::Delivery)
    }

    /// Moves from the delivery step to the contacts step.
    ///
    /// Only allowed from the delivery step with a valid delivery form; an
    /// invalid form re-emits its errors instead.
    pub fn open_contacts_step(&mut self) -> Emitted {
        if self.step != CheckoutStep::Delivery {
            tracing::warn!(step = %self.step, "contacts step requested out of order");
            return Emitted::new();
        }

        let errors = self.validate_order_form();
        if !errors.is_valid() {
            tracing::debug!(errors = %errors.summary(), "delivery form still invalid");
            return smallvec![StorefrontEvent::OrderFormErrorsChanged { errors }];
        }

        self.items = build_order_items(&self.basket);
        self.set_step(CheckoutStep::Contacts)
    }

    /// Leaves checkout. Entered form data is kept for the next attempt.
    pub fn close_checkout(&mut self) -> Emitted {
        if self.step == CheckoutStep::Browsing {
            return Emitted::new();
        }
        self.set_step(CheckoutStep::Browsing)
    }

    /// The order ready for submission.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::WrongStep`] unless on the contacts step
    /// - [`CheckoutError::EmptyBasket`] if there is nothing to order
    /// - [`CheckoutError::Invalid`] with the errors of both forms combined
    pub fn checkout_order(&self) -> Result<Order, CheckoutError> {
        if self.step != CheckoutStep::Contacts {
            return Err(CheckoutError::WrongStep { step: self.step });
        }
        if self.basket.is_empty() {
            return Err(CheckoutError::EmptyBasket);
        }

        let errors = validate_delivery(&self.delivery).merged(validate_contacts(&self.contacts));
        if !errors.is_valid() {
            return Err(CheckoutError::Invalid(errors));
        }

        Ok(finalize_order(
            &self.delivery,
            &self.contacts,
            build_order_items(&self.basket),
            self.basket.total(),
        ))
    }

    /// Applies the backend's acceptance of `order` and returns to browsing.
    ///
    /// Only the products in `order` leave the basket, and only fields still
    /// holding the submitted value are cleared. Products added and fields
    /// edited while the request was in flight are kept.
    pub fn complete_order(&mut self, order: &Order, receipt: OrderReceipt) -> Emitted {
        tracing::debug!(order_id = %receipt.id, total = %receipt.total, "order accepted");

        if self.delivery.payment == order.payment {
            self.delivery.payment = Payment::Unset;
        }
        if self.delivery.address == order.address {
            self.delivery.address.clear();
        }
        if self.contacts.email == order.email {
            self.contacts.email.clear();
        }
        if self.contacts.phone == order.phone {
            self.contacts.phone.clear();
        }
        self.form_errors = FormErrors::new();

        for id in &order.items {
            self.basket.remove(id);
        }
        if !self.basket.is_empty() {
            tracing::debug!(kept = self.basket.count(), "basket keeps items added during submission");
        }

        let mut emitted = self.basket_changed();
        if self.step != CheckoutStep::Browsing {
            emitted.extend(self.set_step(CheckoutStep::Browsing));
        }
        emitted.push(StorefrontEvent::OrderSubmitted { receipt });
        emitted
    }

    // ========== Accessors ==========

    /// Current catalog
    #[must_use]
    pub fn catalog(&self) -> &[ProductItem] {
        &self.catalog
    }

    /// Current basket
    #[must_use]
    pub const fn basket(&self) -> &Basket {
        &self.basket
    }

    /// Product shown in the detail view
    #[must_use]
    pub fn preview(&self) -> Option<&ProductItem> {
        self.preview.as_ref().and_then(|id| self.find(id))
    }

    /// Snapshot of the order as entered so far
    #[must_use]
    pub fn order(&self) -> Order {
        finalize_order(&self.delivery, &self.contacts, self.items.clone(), self.total)
    }

    /// Errors from the most recent validation
    #[must_use]
    pub const fn form_errors(&self) -> &FormErrors {
        &self.form_errors
    }

    /// Current checkout step
    #[must_use]
    pub const fn step(&self) -> CheckoutStep {
        self.step
    }

    /// Basket total
    #[must_use]
    pub fn total(&self) -> Price {
        self.basket.total()
    }

    /// Number of items in the basket
    #[must_use]
    pub fn count(&self) -> usize {
        self.basket.count()
    }

    /// Looks a product up in the catalog
    #[must_use]
    pub fn find(&self, id: &ProductId) -> Option<&ProductItem> {
        self.catalog.iter().find(|item| &item.id == id)
    }

    // ========== Internals ==========

    fn validate_order_form(&mut self) -> FormErrors {
        self.form_errors = validate_delivery(&self.delivery);
        self.form_errors.clone()
    }

    fn validate_contacts_form(&mut self) -> FormErrors {
        self.form_errors = validate_contacts(&self.contacts);
        self.form_errors.clone()
    }

    /// Recomputes the order summary and reports the basket.
    fn basket_changed(&mut self) -> Emitted {
        self.items = build_order_items(&self.basket);
        self.total = self.basket.total();

        smallvec![
            StorefrontEvent::BasketChanged {
                items: self.basket.items().to_vec(),
                total: self.total,
            },
            StorefrontEvent::CountChanged {
                count: self.basket.count(),
            },
        ]
    }

    fn set_step(&mut self, step: CheckoutStep) -> Emitted {
        tracing::debug!(from = %self.step, to = %step, "checkout step");
        self.step = step;
        smallvec![StorefrontEvent::CheckoutStepChanged { step }]
    }
}
