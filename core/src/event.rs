//! Events exchanged between the storefront state and its views.
//!
//! Two classes travel over the same bus:
//!
//! - **Change events** are emitted after an [`AppState`](crate::AppState)
//!   mutation and carry a snapshot of the data that changed. Views subscribe
//!   to them and re-render.
//! - **Intent events** are published by views when the user does something.
//!   The runtime subscribes to them and calls the matching state method.
//!
//! Event names are the contract with renderers; see [`names`].

use crate::form::FormErrors;
use crate::order::OrderReceipt;
use crate::product::{Price, ProductId, ProductItem};
use crate::state::CheckoutStep;
use storefront_macros::BusEvent;

/// Event names, for subscribers that match on strings
pub mod names {
    /// Catalog replaced
    pub const CATALOG_CHANGED: &str = "catalog-changed";
    /// Preview selection changed
    pub const PREVIEW_CHANGED: &str = "preview-changed";
    /// Previewed product left the catalog
    pub const PREVIEW_CLEARED: &str = "preview-cleared";
    /// Basket contents changed
    pub const BASKET_CHANGED: &str = "basket-changed";
    /// Basket size changed
    pub const COUNT_CHANGED: &str = "count-changed";
    /// Delivery form validated
    pub const ORDER_FORM_ERRORS_CHANGED: &str = "orderform-errors-changed";
    /// Contact form validated
    pub const CONTACTS_FORM_ERRORS_CHANGED: &str = "contactsform-errors-changed";
    /// Contact form became fully valid
    pub const CONTACTS_VALID: &str = "contacts-valid";
    /// Checkout moved to another step
    pub const CHECKOUT_STEP_CHANGED: &str = "checkout-step-changed";
    /// Backend accepted the order
    pub const ORDER_SUBMITTED: &str = "order-submitted";

    /// A catalog card was clicked
    pub const CARD_SELECT: &str = "card:select";
    /// The preview's basket button was clicked
    pub const ITEM_CHECK: &str = "item:check";
    /// Add an item to the basket
    pub const ITEM_ADD: &str = "item:add";
    /// Remove an item from the basket
    pub const ITEM_DELETE: &str = "item:delete";
    /// Checkout started from the basket
    pub const ORDER_OPEN: &str = "order:open";
    /// Payment button clicked
    pub const ORDER_PAYMENT_CHANGE: &str = "order.payment:change";
    /// Address typed
    pub const ORDER_ADDRESS_CHANGE: &str = "order.address:change";
    /// Delivery step submitted
    pub const ORDER_SUBMIT: &str = "order:submit";
    /// Email typed
    pub const CONTACTS_EMAIL_CHANGE: &str = "contacts.email:change";
    /// Phone typed
    pub const CONTACTS_PHONE_CHANGE: &str = "contacts.phone:change";
    /// Contact step submitted
    pub const CONTACTS_SUBMIT: &str = "contacts:submit";
    /// Checkout dismissed
    pub const CHECKOUT_CLOSE: &str = "checkout:close";

    /// Every delivery-form input event
    pub const ORDER_INPUT_PATTERN: &str = r"^order\..*:change$";
    /// Every contact-form input event
    pub const CONTACTS_INPUT_PATTERN: &str = r"^contacts\..*:change$";
}

/// Everything that travels over the storefront [`EventBus`](crate::EventBus)
#[derive(BusEvent, Clone, Debug, PartialEq)]
pub enum StorefrontEvent {
    // ========== Changes ==========
    /// The catalog was replaced
    #[change("catalog-changed")]
    CatalogChanged {
        /// New catalog, in backend order
        catalog: Vec<ProductItem>,
    },

    /// A product was selected for the detail view
    #[change("preview-changed")]
    PreviewChanged {
        /// The selected product
        item: ProductItem,
        /// Whether it is already in the basket
        in_basket: bool,
    },

    /// The previewed product is gone from the catalog; close the detail view
    #[change("preview-cleared")]
    PreviewCleared {
        /// Id of the product that was showing
        id: ProductId,
    },

    /// Basket contents changed
    #[change("basket-changed")]
    BasketChanged {
        /// Basket items in display order
        items: Vec<ProductItem>,
        /// Basket total
        total: Price,
    },

    /// Basket size changed
    #[change("count-changed")]
    CountChanged {
        /// Number of items in the basket
        count: usize,
    },

    /// The delivery form was re-validated
    #[change("orderform-errors-changed")]
    OrderFormErrorsChanged {
        /// Current delivery errors; empty when valid
        errors: FormErrors,
    },

    /// The contact form was re-validated
    #[change("contactsform-errors-changed")]
    ContactsFormErrorsChanged {
        /// Current contact errors; empty when valid
        errors: FormErrors,
    },

    /// The contact form became fully valid
    #[change("contacts-valid")]
    ContactsValid,

    /// Checkout moved to another step
    #[change("checkout-step-changed")]
    CheckoutStepChanged {
        /// The step now showing
        step: CheckoutStep,
    },

    /// The backend accepted the order
    #[change("order-submitted")]
    OrderSubmitted {
        /// Backend acknowledgement
        receipt: OrderReceipt,
    },

    // ========== Intents ==========
    /// A catalog card was clicked
    #[intent("card:select")]
    CardSelected {
        /// Product behind the card
        id: ProductId,
    },

    /// The preview's basket button was clicked
    #[intent("item:check")]
    ItemChecked {
        /// Previewed product
        id: ProductId,
    },

    /// Add a product to the basket
    #[intent("item:add")]
    ItemAdded {
        /// Product to add
        id: ProductId,
    },

    /// Remove a product from the basket
    #[intent("item:delete")]
    ItemDeleted {
        /// Product to remove
        id: ProductId,
    },

    /// Checkout started from the basket view
    #[intent("order:open")]
    OrderOpened,

    /// A payment button was clicked
    #[intent("order.payment:change")]
    PaymentInput {
        /// Button name (`"card"` or `"cash"`)
        value: String,
    },

    /// The address input changed
    #[intent("order.address:change")]
    AddressInput {
        /// Current input text
        value: String,
    },

    /// The delivery step was submitted
    #[intent("order:submit")]
    OrderSubmit,

    /// The email input changed
    #[intent("contacts.email:change")]
    EmailInput {
        /// Current input text
        value: String,
    },

    /// The phone input changed
    #[intent("contacts.phone:change")]
    PhoneInput {
        /// Current input text
        value: String,
    },

    /// The contact step was submitted
    #[intent("contacts:submit")]
    ContactsSubmit,

    /// The checkout modal was dismissed
    #[intent("checkout:close")]
    CheckoutClosed,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use crate::event_bus::BusEvent;

    #[test]
    fn change_events_are_named() {
        let event = StorefrontEvent::CountChanged { count: 1 };
        assert_eq!(event.name(), names::COUNT_CHANGED);
        assert!(event.is_change());
        assert!(!event.is_intent());
    }

    #[test]
    fn intent_events_are_named() {
        let event = StorefrontEvent::AddressInput {
            value: "Main St".to_string(),
        };
        assert_eq!(event.name(), names::ORDER_ADDRESS_CHANGE);
        assert!(event.is_intent());
        assert!(!event.is_change());

        assert_eq!(StorefrontEvent::ContactsSubmit.name(), names::CONTACTS_SUBMIT);
    }

    #[test]
    fn input_patterns_split_by_form() {
        let order = regex::Regex::new(names::ORDER_INPUT_PATTERN).unwrap();
        let contacts = regex::Regex::new(names::CONTACTS_INPUT_PATTERN).unwrap();

        assert!(order.is_match(names::ORDER_PAYMENT_CHANGE));
        assert!(order.is_match(names::ORDER_ADDRESS_CHANGE));
        assert!(!order.is_match(names::ORDER_SUBMIT));
        assert!(!order.is_match(names::CONTACTS_EMAIL_CHANGE));

        assert!(contacts.is_match(names::CONTACTS_EMAIL_CHANGE));
        assert!(contacts.is_match(names::CONTACTS_PHONE_CHANGE));
        assert!(!contacts.is_match(names::CONTACTS_SUBMIT));
    }
}
