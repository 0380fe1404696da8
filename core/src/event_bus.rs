//! Synchronous publish/subscribe bus that decouples state from views.
//!
//! The [`EventBus`] delivers every emitted event to each subscriber whose
//! [`Matcher`] accepts the event's name. Delivery is synchronous and in
//! registration order, so a call to [`EventBus::emit`] returns only after
//! every matching handler (and anything those handlers emitted in turn) has
//! finished.
//!
//! # Dispatch
//!
//! ```text
//!  emit(event)
//!      │
//!      ├──► exact table ── name ──► [h1, h4]
//!      │
//!      └──► pattern list ─ test ──► [h2]
//!                                     │
//!                        merge by registration order
//!                                     │
//!                                     ▼
//!                           h1(event), h2(event), h4(event)
//! ```
//!
//! Exact subscriptions live in a table keyed by event name; pattern and
//! predicate subscriptions live in a secondary list that is tested on every
//! emission. Both are cheap at the volumes a storefront produces.
//!
//! # Re-entrancy
//!
//! The registry lock is released before any handler runs. A handler may emit,
//! subscribe, or unsubscribe on the same bus. There is no cycle detection:
//! two handlers that emit each other's events loop forever.
//!
//! # Example
//!
//! ```
//! use storefront_core::event_bus::{BusEvent, EventBus, Matcher};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! struct Ping(&'static str);
//!
//! impl BusEvent for Ping {
//!     fn name(&self) -> &str {
//!         self.0
//!     }
//! }
//!
//! let bus = EventBus::new();
//! let seen = Arc::new(AtomicUsize::new(0));
//!
//! let counter = Arc::clone(&seen);
//! bus.subscribe(Matcher::pattern(r"^order\.").unwrap(), move |_: &Ping| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! bus.emit(&Ping("order.address:change"));
//! bus.emit(&Ping("contacts.email:change"));
//! assert_eq!(seen.load(Ordering::SeqCst), 1);
//! ```

use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;

/// An event that can travel over an [`EventBus`].
///
/// The name is what matchers are tested against. Payload shape is entirely the
/// implementor's business; the bus never inspects it.
pub trait BusEvent {
    /// Name used for subscription matching (e.g. `"basket-changed"`).
    fn name(&self) -> &str;
}

/// Errors that can occur when building subscriptions.
#[derive(Error, Debug, Clone)]
pub enum EventBusError {
    /// The pattern was not a valid regular expression
    #[error("Invalid subscription pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The rejected pattern
        pattern: String,
        /// Why it was rejected
        reason: String,
    },
}

/// Identifies one subscription; returned by [`EventBus::subscribe`].
///
/// Ids grow monotonically, so they double as the registration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

type NamePredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Decides which event names a subscription receives.
#[derive(Clone)]
pub enum Matcher {
    /// Matches one event name exactly
    Exact(String),
    /// Matches names accepted by a regular expression
    Pattern(Regex),
    /// Matches names accepted by an arbitrary predicate
    Predicate(NamePredicate),
}

impl Matcher {
    /// Match a single event name.
    #[must_use]
    pub fn exact(name: impl Into<String>) -> Self {
        Self::Exact(name.into())
    }

    /// Match every event name accepted by `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`EventBusError::InvalidPattern`] if `pattern` does not compile.
    pub fn pattern(pattern: &str) -> Result<Self, EventBusError> {
        Regex::new(pattern)
            .map(Self::Pattern)
            .map_err(|e| EventBusError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })
    }

    /// Match every event name accepted by `predicate`.
    #[must_use]
    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(predicate))
    }

    /// Match every event.
    #[must_use]
    pub fn any() -> Self {
        Self::predicate(|_| true)
    }

    /// Check whether `name` is accepted.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Exact(expected) => expected == name,
            Self::Pattern(regex) => regex.is_match(name),
            Self::Predicate(predicate) => predicate(name),
        }
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(name) => f.debug_tuple("Matcher::Exact").field(name).finish(),
            Self::Pattern(regex) => f
                .debug_tuple("Matcher::Pattern")
                .field(&regex.as_str())
                .finish(),
            Self::Predicate(_) => write!(f, "Matcher::Predicate(<fn>)"),
        }
    }
}

impl From<&str> for Matcher {
    fn from(name: &str) -> Self {
        Self::exact(name)
    }
}

type Handler<E> = Arc<dyn Fn(&E) + Send + Sync>;

struct Subscriber<E> {
    id: SubscriptionId,
    handler: Handler<E>,
}

impl<E> Clone for Subscriber<E> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            handler: Arc::clone(&self.handler),
        }
    }
}

struct Registry<E> {
    next_id: u64,
    exact: HashMap<String, Vec<Subscriber<E>>>,
    patterns: Vec<(Matcher, Subscriber<E>)>,
}

impl<E> Registry<E> {
    fn new() -> Self {
        Self {
            next_id: 0,
            exact: HashMap::new(),
            patterns: Vec::new(),
        }
    }

    fn len(&self) -> usize {
        self.exact.values().map(Vec::len).sum::<usize>() + self.patterns.len()
    }

    /// Matching subscribers, in registration order.
    fn matching(&self, name: &str) -> Vec<Subscriber<E>> {
        let mut found: Vec<Subscriber<E>> = self
            .exact
            .get(name)
            .map(|subs| subs.to_vec())
            .unwrap_or_default();

        found.extend(
            self.patterns
                .iter()
                .filter(|(matcher, _)| matcher.matches(name))
                .map(|(_, sub)| sub.clone()),
        );

        // Each list is already ordered; only the merge needs sorting.
        found.sort_by_key(|sub| sub.id);
        found
    }
}

/// Synchronous, re-entrant publish/subscribe dispatcher.
///
/// `EventBus` is a handle: clones share the same subscriptions.
///
/// # Thread Safety
///
/// Handlers must be `Send + Sync`, so the bus can be shared with async tasks
/// that complete network operations and publish the outcome.
pub struct EventBus<E> {
    registry: Arc<RwLock<Registry<E>>>,
}

impl<E> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl<E> EventBus<E> {
    /// Create a bus with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: Arc::new(RwLock::new(Registry::new())),
        }
    }

    /// Register `handler` for every event whose name `matcher` accepts.
    pub fn subscribe<F>(&self, matcher: impl Into<Matcher>, handler: F) -> SubscriptionId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let matcher = matcher.into();
        let mut registry = self
            .registry
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let id = SubscriptionId(registry.next_id);
        registry.next_id += 1;

        let subscriber = Subscriber {
            id,
            handler: Arc::new(handler),
        };

        tracing::trace!(subscription = %id, ?matcher, "subscribed");
        match matcher {
            Matcher::Exact(name) => registry.exact.entry(name).or_default().push(subscriber),
            other => registry.patterns.push((other, subscriber)),
        }

        id
    }

    /// Shorthand for an exact-name subscription.
    pub fn on<F>(&self, name: &str, handler: F) -> SubscriptionId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.subscribe(Matcher::exact(name), handler)
    }

    /// Remove a subscription.
    ///
    /// Returns `false` if `id` was not registered. An emission already in
    /// flight still reaches the removed handler.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut registry = self
            .registry
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let before = registry.len();
        registry.exact.retain(|_, subs| {
            subs.retain(|sub| sub.id != id);
            !subs.is_empty()
        });
        registry.patterns.retain(|(_, sub)| sub.id != id);

        let removed = registry.len() < before;
        tracing::trace!(subscription = %id, removed, "unsubscribed");
        removed
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl<E: BusEvent> EventBus<E> {
    /// Deliver `event` to every matching handler, in registration order.
    ///
    /// Returns the number of handlers invoked. Having no subscribers is not
    /// an error.
    pub fn emit(&self, event: &E) -> usize {
        let name = event.name();
        let subscribers = self
            .registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .matching(name);

        tracing::trace!(event = name, handlers = subscribers.len(), "emitting");
        for subscriber in &subscribers {
            (subscriber.handler)(event);
        }

        subscribers.len()
    }
}
