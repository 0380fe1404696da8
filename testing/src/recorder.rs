//! Captures events published on a bus.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use storefront_core::{BusEvent, EventBus, Matcher, StorefrontEvent, SubscriptionId};

/// Records every event a bus delivers to it, in delivery order
///
/// Clones share the same log.
///
/// # Example
///
/// ```
/// use storefront_core::{names, EventBus, StorefrontEvent};
/// use storefront_testing::EventRecorder;
///
/// let bus = EventBus::new();
/// let recorder = EventRecorder::attach(&bus);
///
/// bus.emit(&StorefrontEvent::CountChanged { count: 2 });
/// assert_eq!(recorder.names(), vec![names::COUNT_CHANGED]);
/// ```
#[derive(Debug)]
pub struct EventRecorder<E = StorefrontEvent> {
    events: Arc<Mutex<Vec<E>>>,
    subscription: Option<SubscriptionId>,
}

impl<E> Clone for EventRecorder<E> {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
            subscription: self.subscription,
        }
    }
}

impl<E> EventRecorder<E>
where
    E: BusEvent + Clone + Send + 'static,
{
    /// Record every event on `bus`
    #[must_use]
    pub fn attach(bus: &EventBus<E>) -> Self {
        Self::attach_matching(bus, Matcher::any())
    }

    /// Record only events whose name `matcher` accepts
    #[must_use]
    pub fn attach_matching(bus: &EventBus<E>, matcher: impl Into<Matcher>) -> Self {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let subscription = bus.subscribe(matcher, move |event: &E| {
            sink.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(event.clone());
        });

        Self {
            events,
            subscription: Some(subscription),
        }
    }

    /// Stop recording; events captured so far are kept
    pub fn detach(&mut self, bus: &EventBus<E>) {
        if let Some(id) = self.subscription.take() {
            bus.unsubscribe(id);
        }
    }

    /// Everything recorded so far
    #[must_use]
    pub fn events(&self) -> Vec<E> {
        self.lock().clone()
    }

    /// Names of the recorded events
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.lock().iter().map(|event| event.name().to_string()).collect()
    }

    /// How many recorded events are called `name`
    #[must_use]
    pub fn count(&self, name: &str) -> usize {
        self.lock().iter().filter(|event| event.name() == name).count()
    }

    /// The most recent event called `name`
    #[must_use]
    pub fn last(&self, name: &str) -> Option<E> {
        self.lock().iter().rev().find(|event| event.name() == name).cloned()
    }

    /// Forget everything recorded so far
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<E>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
