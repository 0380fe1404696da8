//! Checkout scenarios driven through `AppState` and the event bus

#![allow(clippy::unwrap_used)] // Tests can unwrap
#![allow(clippy::panic)] // Tests can panic

use std::sync::{Arc, Mutex};
use storefront_core::{
    names, validate_contacts, validate_delivery, AppState, CheckoutStep, ContactField,
    DeliveryField, EventBus, FormErrors, OrderField, Payment, Price, ProductId, StorefrontEvent,
};
use storefront_testing::fixtures::{self, PRICED_ID, SECOND_PRICED_ID, UNPRICED_ID};
use storefront_testing::state_test::assertions;
use storefront_testing::{EventRecorder, StateTest};

fn publish(bus: &EventBus<StorefrontEvent>, emitted: impl IntoIterator<Item = StorefrontEvent>) {
    for event in emitted {
        bus.emit(&event);
    }
}

#[test]
fn delivery_form_validation_table() {
    let errors = validate_delivery(&storefront_core::DeliveryForm {
        payment: Payment::Unset,
        address: String::new(),
    });
    assert!(errors.contains(OrderField::Payment));
    assert!(errors.contains(OrderField::Address));

    let errors = validate_delivery(&storefront_core::DeliveryForm {
        payment: Payment::Card,
        address: "x".to_string(),
    });
    assert!(errors.is_valid());

    let errors = validate_contacts(&storefront_core::ContactForm {
        email: String::new(),
        phone: "1".to_string(),
    });
    assert_eq!(errors.iter().map(|(field, _)| field).collect::<Vec<_>>(), vec![OrderField::Email]);
}

#[test]
fn filling_delivery_form_clears_errors() {
    StateTest::new()
        .given(|state| state.set_order_field(DeliveryField::Address, "Main St"))
        .when(|state| state.set_order_field(DeliveryField::Payment, "card"))
        .then_events(|events| {
            assert_eq!(
                events,
                [StorefrontEvent::OrderFormErrorsChanged {
                    errors: FormErrors::new()
                }]
            );
        })
        .run();
}

#[test]
fn unpriced_item_rejected_without_basket_event() {
    StateTest::new()
        .given_catalog(vec![fixtures::priced_item("a", 100), fixtures::unpriced_item("b")])
        .when(|state| state.add_item_to_basket(&ProductId::new("b")))
        .then_state(|state| {
            assert_eq!(state.count(), 0);
            assert_eq!(state.total(), Price::ZERO);
        })
        .then_events(assertions::assert_no_events)
        .run();
}

#[test]
fn clear_then_reset_keeps_order_summary() {
    let mut state = AppState::new();
    state.set_catalog(fixtures::sample_catalog());
    state.add_item_to_basket(&ProductId::new(PRICED_ID));
    state.set_order_field(DeliveryField::Address, "Main St");

    state.clear_basket();
    assert_eq!(state.count(), 0);
    assert_eq!(state.total(), Price::ZERO);

    let before = state.order();
    state.reset_order_fields();
    let after = state.order();
    assert_eq!(after.items, before.items);
    assert_eq!(after.total, before.total);
    assert!(after.address.is_empty());
}

#[test]
fn basket_handler_sees_updated_state_from_nested_emit() {
    let bus = EventBus::<StorefrontEvent>::new();
    let state = Arc::new(Mutex::new(AppState::new()));
    let observed = Arc::new(Mutex::new(Vec::new()));

    // basket-changed re-publishes the count, like a header view refreshing itself
    let nested_bus = bus.clone();
    let reader = Arc::clone(&state);
    bus.on(names::BASKET_CHANGED, move |_| {
        let count = reader.lock().unwrap().count();
        nested_bus.emit(&StorefrontEvent::CountChanged { count });
    });

    let sink = Arc::clone(&observed);
    bus.on(names::COUNT_CHANGED, move |event| {
        if let StorefrontEvent::CountChanged { count } = event {
            sink.lock().unwrap().push(*count);
        }
    });

    let emitted = {
        let mut state = state.lock().unwrap();
        state.set_catalog(fixtures::sample_catalog());
        state.add_item_to_basket(&ProductId::new(PRICED_ID))
    };
    publish(&bus, emitted);

    // nested emit from the basket handler, then the state's own count event
    assert_eq!(*observed.lock().unwrap(), vec![1, 1]);
}

#[test]
fn full_checkout_event_sequence() {
    let bus = EventBus::new();
    let recorder = EventRecorder::attach(&bus);
    let mut state = AppState::new();

    publish(&bus, state.set_catalog(fixtures::sample_catalog()));
    publish(&bus, state.set_preview(&ProductId::new(PRICED_ID)));
    publish(&bus, state.add_item_to_basket(&ProductId::new(PRICED_ID)));
    publish(&bus, state.add_item_to_basket(&ProductId::new(SECOND_PRICED_ID)));
    publish(&bus, state.add_item_to_basket(&ProductId::new(UNPRICED_ID)));
    publish(&bus, state.open_delivery_step());
    publish(&bus, state.set_order_field(DeliveryField::Payment, "cash"));
    publish(&bus, state.set_order_field(DeliveryField::Address, "Spb Vosstania 1"));
    publish(&bus, state.open_contacts_step());
    publish(&bus, state.set_contact_field(ContactField::Email, "test@test.ru"));
    publish(&bus, state.set_contact_field(ContactField::Phone, "+71234567890"));

    assert_eq!(
        recorder.names(),
        vec![
            names::CATALOG_CHANGED,
            names::PREVIEW_CHANGED,
            names::BASKET_CHANGED,
            names::COUNT_CHANGED,
            names::BASKET_CHANGED,
            names::COUNT_CHANGED,
            names::CHECKOUT_STEP_CHANGED,
            names::ORDER_FORM_ERRORS_CHANGED,
            names::ORDER_FORM_ERRORS_CHANGED,
            names::CHECKOUT_STEP_CHANGED,
            names::CONTACTS_FORM_ERRORS_CHANGED,
            names::CONTACTS_FORM_ERRORS_CHANGED,
            names::CONTACTS_VALID,
        ]
    );
    assert_eq!(state.step(), CheckoutStep::Contacts);

    let order = state.checkout_order().unwrap();
    assert_eq!(order.payment, Payment::Cash);
    assert_eq!(order.total, Price::new(3250));
    assert_eq!(
        order.items,
        vec![ProductId::new(PRICED_ID), ProductId::new(SECOND_PRICED_ID)]
    );

    publish(&bus, state.complete_order(&order, fixtures::receipt("order-1", 3250)));
    let Some(StorefrontEvent::OrderSubmitted { receipt }) = recorder.last(names::ORDER_SUBMITTED) else {
        panic!("order-submitted not recorded");
    };
    assert_eq!(receipt.total, Price::new(3250));
    assert_eq!(state.count(), 0);
    assert_eq!(recorder.last(names::COUNT_CHANGED), Some(StorefrontEvent::CountChanged { count: 0 }));
}

#[test]
fn preview_reports_basket_membership() {
    StateTest::new()
        .given_catalog(fixtures::sample_catalog())
        .given(|state| state.add_item_to_basket(&ProductId::new(PRICED_ID)))
        .when(|state| state.set_preview(&ProductId::new(PRICED_ID)))
        .then_events(|events| {
            let [StorefrontEvent::PreviewChanged { in_basket, item }] = events else {
                panic!("expected a single preview-changed, got {events:?}");
            };
            assert!(*in_basket);
            assert_eq!(item.price, Some(Price::new(750)));
        })
        .run();
}
