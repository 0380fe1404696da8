//! Headless storefront checkout.
//!
//! Loads the catalog from a live backend, then plays the part of the views:
//! publishes the intents a shopper would trigger, logs every change event the
//! state answers with, and finally places the order.
//!
//! # Usage
//!
//! ```bash
//! STOREFRONT_API_URL=https://larek-api.nomoreparties.co/api/weblarek \
//! STOREFRONT_CDN_URL=https://larek-api.nomoreparties.co/content/weblarek \
//!   cargo run --bin checkout-demo
//! ```
//!
//! `RUST_LOG` overrides the default `info` filter, e.g. `RUST_LOG=debug`.

use anyhow::{bail, Context};
use std::sync::Arc;
use storefront_api::{ApiConfig, ProductApiClient};
use storefront_core::{BusEvent, Matcher, StorefrontEvent};
use storefront_runtime::Storefront;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("=== Storefront Checkout Demo ===");

    let config = ApiConfig::from_env().context("loading backend configuration")?;
    info!(api = %config.api_url, cdn = %config.cdn_url, "backend configured");
    let client = ProductApiClient::new(&config)?;

    let storefront = Storefront::new(Arc::new(client));
    storefront.bind_intents()?;
    storefront.bus().subscribe(Matcher::any(), log_change);

    let loaded = storefront.load_catalog().await?;
    info!(products = loaded, "catalog ready");

    let picks: Vec<_> = storefront.state(|s| {
        s.catalog()
            .iter()
            .filter(|item| item.is_purchasable())
            .take(2)
            .map(|item| item.id.clone())
            .collect()
    });
    if picks.is_empty() {
        bail!("the catalog has nothing for sale");
    }

    info!("--- Browsing ---");
    for id in &picks {
        storefront.publish(&StorefrontEvent::CardSelected { id: id.clone() });
        storefront.publish(&StorefrontEvent::ItemChecked { id: id.clone() });
    }

    info!("--- Delivery ---");
    storefront.publish(&StorefrontEvent::OrderOpened);
    storefront.publish(&StorefrontEvent::AddressInput { value: String::new() });
    storefront.publish(&StorefrontEvent::AddressInput {
        value: "Spb Vosstania 1".to_string(),
    });
    storefront.publish(&StorefrontEvent::PaymentInput {
        value: "card".to_string(),
    });
    storefront.publish(&StorefrontEvent::OrderSubmit);

    info!("--- Contacts ---");
    storefront.publish(&StorefrontEvent::EmailInput {
        value: "test@test.ru".to_string(),
    });
    storefront.publish(&StorefrontEvent::PhoneInput {
        value: "+71234567890".to_string(),
    });

    info!("--- Submitting ---");
    let receipt = storefront.submit_order().await?;
    info!(order_id = %receipt.id, total = %receipt.total, "order placed");

    Ok(())
}

fn log_change(event: &StorefrontEvent) {
    if !event.is_change() {
        return;
    }

    match event {
        StorefrontEvent::CatalogChanged { catalog } => {
            info!(event = event.name(), products = catalog.len());
        }
        StorefrontEvent::PreviewChanged { item, in_basket } => {
            info!(event = event.name(), title = %item.title, in_basket);
        }
        StorefrontEvent::PreviewCleared { id } => {
            info!(event = event.name(), product_id = %id);
        }
        StorefrontEvent::BasketChanged { items, total } => {
            info!(event = event.name(), items = items.len(), %total);
        }
        StorefrontEvent::CountChanged { count } => {
            info!(event = event.name(), count);
        }
        StorefrontEvent::OrderFormErrorsChanged { errors }
        | StorefrontEvent::ContactsFormErrorsChanged { errors } => {
            info!(event = event.name(), errors = %errors.summary());
        }
        StorefrontEvent::CheckoutStepChanged { step } => {
            info!(event = event.name(), %step);
        }
        StorefrontEvent::OrderSubmitted { receipt } => {
            info!(event = event.name(), order_id = %receipt.id);
        }
        other => info!(event = other.name()),
    }
}
