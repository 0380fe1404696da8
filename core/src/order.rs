//! Order assembly.
//!
//! An order is the flat payload the backend accepts: both checkout forms plus
//! the basket's item ids and total. Nothing here validates; callers check the
//! forms first.

use crate::basket::Basket;
use crate::form::{ContactForm, DeliveryForm, Payment};
use crate::product::{Price, ProductId};
use serde::{Deserialize, Serialize};

/// Order payload submitted to the backend
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Payment method
    pub payment: Payment,
    /// Delivery address
    pub address: String,
    /// Email address
    pub email: String,
    /// Phone number
    pub phone: String,
    /// Ids of the ordered products, in basket order
    pub items: Vec<ProductId>,
    /// Sum of the ordered products' prices
    pub total: Price,
}

impl Order {
    /// The delivery part of the order
    #[must_use]
    pub fn delivery(&self) -> DeliveryForm {
        DeliveryForm {
            payment: self.payment,
            address: self.address.clone(),
        }
    }

    /// The contact part of the order
    #[must_use]
    pub fn contacts(&self) -> ContactForm {
        ContactForm {
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }
}

/// Backend acknowledgement of a placed order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReceipt {
    /// Backend-assigned order id
    pub id: String,
    /// Total the backend charged
    pub total: Price,
}

/// Item ids of `basket`, in basket order.
#[must_use]
pub fn build_order_items(basket: &Basket) -> Vec<ProductId> {
    basket.ids()
}

/// Merges both forms and the basket summary into one payload.
#[must_use]
pub fn finalize_order(
    delivery: &DeliveryForm,
    contacts: &ContactForm,
    items: Vec<ProductId>,
    total: Price,
) -> Order {
    Order {
        payment: delivery.payment,
        address: delivery.address.clone(),
        email: contacts.email.clone(),
        phone: contacts.phone.clone(),
        items,
        total,
    }
}
