//! Wire types of the storefront backend

use serde::{Deserialize, Serialize};
use storefront_core::ProductItem;

/// Response body of `GET /product`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductList {
    /// Number of products on the backend
    pub total: usize,
    /// The products, in backend order
    pub items: Vec<ProductItem>,
}

/// Body the backend sends with a non-success status
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    /// Human-readable reason
    pub error: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use storefront_core::{Category, Description, Price};

    #[test]
    fn product_list_deserialization() {
        let json = serde_json::json!({
            "total": 2,
            "items": [
                {
                    "id": "854cef69-976d-4c2a-a18c-2aa45046c390",
                    "description": "If you plan your day, it will last longer.",
                    "image": "/5_Dots.svg",
                    "title": "+1 hour in a day",
                    "category": "soft-skill",
                    "price": 750
                },
                {
                    "id": "b06cde61-912f-4663-9751-09956c0eed67",
                    "description": "Will get your mom to call you back.",
                    "image": "/Asterisk_2.svg",
                    "title": "Mom timer",
                    "category": "other",
                    "price": null
                }
            ]
        });

        let list: ProductList = serde_json::from_value(json).unwrap();
        assert_eq!(list.total, 2);
        assert_eq!(list.items[0].category, Category::SoftSkill);
        assert_eq!(list.items[0].price, Some(Price::new(750)));
        assert_eq!(
            list.items[0].description,
            Description::Text("If you plan your day, it will last longer.".to_string())
        );
        assert!(!list.items[1].is_purchasable());
    }

    #[test]
    fn error_body_deserialization() {
        let body: ErrorBody = serde_json::from_str(r#"{"error":"Wrong total"}"#).unwrap();
        assert_eq!(body.error, "Wrong total");
    }
}
