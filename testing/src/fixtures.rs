//! Canned data for tests.

use storefront_core::{
    Category, ContactForm, DeliveryForm, Description, OrderReceipt, Payment, Price, ProductId,
    ProductItem,
};

/// Id of a purchasable product in [`sample_catalog`] (price 750)
pub const PRICED_ID: &str = "854cef69-976d-4c2a-a18c-2aa45046c390";

/// Id of a second purchasable product in [`sample_catalog`] (price 2500)
pub const SECOND_PRICED_ID: &str = "c101ab44-ed99-4a54-990d-47aa2bb4e7d9";

/// Id of the product in [`sample_catalog`] that is not for sale
pub const UNPRICED_ID: &str = "b06cde61-912f-4663-9751-09956c0eed67";

/// A purchasable product
#[must_use]
pub fn priced_item(id: &str, price: u64) -> ProductItem {
    ProductItem::new(ProductId::new(id), format!("Item {id}"), Category::Other, Some(Price::new(price)))
}

/// A product that is not for sale
#[must_use]
pub fn unpriced_item(id: &str) -> ProductItem {
    ProductItem::new(ProductId::new(id), format!("Item {id}"), Category::Other, None)
}

/// Four products: three for sale, one free giveaway
#[must_use]
pub fn sample_catalog() -> Vec<ProductItem> {
    vec![
        ProductItem {
            description: Description::Text("If you plan your day, it will last longer.".to_string()),
            image: "/5_Dots.svg".to_string(),
            ..ProductItem::new(
                ProductId::new(PRICED_ID),
                "+1 hour in a day",
                Category::SoftSkill,
                Some(Price::new(750)),
            )
        },
        ProductItem {
            description: Description::Lines(vec![
                "Ships with a cape.".to_string(),
                "Cape not included.".to_string(),
            ]),
            image: "/Shell.svg".to_string(),
            ..ProductItem::new(
                ProductId::new(SECOND_PRICED_ID),
                "Framework cube",
                Category::HardSkill,
                Some(Price::new(2500)),
            )
        },
        ProductItem {
            image: "/Asterisk_2.svg".to_string(),
            ..ProductItem::new(
                ProductId::new(UNPRICED_ID),
                "Mom timer",
                Category::Other,
                None,
            )
        },
        ProductItem {
            image: "/Soft_Flower.svg".to_string(),
            ..ProductItem::new(
                ProductId::new("412bcf81-7e75-4e70-bdb9-d3c73c9803b7"),
                "Fedorov's notebook",
                Category::Additional,
                Some(Price::new(480)),
            )
        },
    ]
}

/// A delivery form that passes validation
#[must_use]
pub fn filled_delivery() -> DeliveryForm {
    DeliveryForm {
        payment: Payment::Card,
        address: "Spb Vosstania 1".to_string(),
    }
}

/// A contact form that passes validation
#[must_use]
pub fn filled_contacts() -> ContactForm {
    ContactForm {
        email: "test@test.ru".to_string(),
        phone: "+71234567890".to_string(),
    }
}

/// Backend acknowledgement for an order of `total`
#[must_use]
pub fn receipt(id: &str, total: u64) -> OrderReceipt {
    OrderReceipt {
        id: id.to_string(),
        total: Price::new(total),
    }
}
