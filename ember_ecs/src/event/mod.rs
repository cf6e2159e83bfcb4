//! Typed publish/subscribe channel between *systems* of ECS.

use std::any::{type_name, Any};

use anymap2::AnyMap;

use crate::error::{RegistryError, Result};
use crate::{Entity, Registry, System};

mod tests;

/// Any `'static` type can be sent through the [`EventBus`].
pub trait Event: Any {}

impl<T> Event for T where T: Any {}

/// Outcome of one subscriber for one event.
enum Delivery {
    Delivered,
    /// The subscriber is alive but could not run right now.
    Skipped,
    /// The subscriber is dead and must be dropped.
    Dropped,
}

type Handler<E> = Box<dyn FnMut(&E, &mut Registry) -> Delivery>;

/// Subscribers of events of type `E` in order of subscription.
struct Subscribers<E>(Vec<Handler<E>>);

/// Event bus which dispatches events to subscribers immediately.
///
/// Subscriptions are usually renewed every frame: the bus is [reset](EventBus::reset)
/// and every system subscribes again to the events it is interested in.
///
pub struct EventBus {
    subscribers: AnyMap,
}

impl EventBus {
    /// Creates a bus without subscribers.
    pub fn new() -> Self {
        Self {
            subscribers: AnyMap::new(),
        }
    }

    /// Subscribes a free function or closure to events of type `E`.
    pub fn subscribe<E, F>(&mut self, mut handler: F)
    where
        E: Event,
        F: FnMut(&E, &mut Registry) + 'static,
    {
        self.push::<E>(Box::new(move |event: &E, registry: &mut Registry| {
            handler(event, registry);
            Delivery::Delivered
        }));
    }

    /// Subscribes the system of type `S`, which is added to the registry, to events of type `E`.
    ///
    /// The subscription is bound to this very instance of the system:
    /// once it is removed from the registry, the subscription is dropped on the next emit.
    /// Like [`Registry::with_system`], `method` receives the current members of the system.
    ///
    /// # Errors
    ///
    /// An error is returned if the system was not added to the registry.
    ///
    pub fn subscribe_system<E, S, F>(&mut self, registry: &Registry, mut method: F) -> Result<()>
    where
        E: Event,
        S: System,
        F: FnMut(&mut S, &[Entity], &E, &mut Registry) + 'static,
    {
        let key = registry.system_key::<S>()?;
        self.push::<E>(Box::new(move |event: &E, registry: &mut Registry| {
            let result = registry.with_system_key(key, |system: &mut S, entities, registry| {
                method(system, entities, event, registry)
            });
            match result {
                Ok(()) => Delivery::Delivered,
                Err(RegistryError::SystemInUse(name)) => {
                    log::warn!(
                        "event `{}` was not delivered to system `{}`: system is in use",
                        type_name::<E>(),
                        name,
                    );
                    Delivery::Skipped
                }
                Err(_) => {
                    log::debug!(
                        "subscription of system `{}` to event `{}` was dropped",
                        type_name::<S>(),
                        type_name::<E>(),
                    );
                    Delivery::Dropped
                }
            }
        }));
        Ok(())
    }

    /// Sends the event to every subscriber of its type in order of subscription.
    ///
    /// All subscribers have finished by the time this function returns.
    /// Returns how many subscribers received the event.
    ///
    pub fn emit<E>(&mut self, registry: &mut Registry, event: E) -> usize
    where
        E: Event,
    {
        let subscribers = match self.subscribers.get_mut::<Subscribers<E>>() {
            Some(subscribers) => subscribers,
            None => return 0,
        };

        let mut delivered = 0;
        subscribers.0.retain_mut(|handler| match handler(&event, registry) {
            Delivery::Delivered => {
                delivered += 1;
                true
            }
            Delivery::Skipped => true,
            Delivery::Dropped => false,
        });
        delivered
    }

    /// Drops all subscriptions to events of type `E`.
    pub fn unsubscribe_all<E>(&mut self)
    where
        E: Event,
    {
        self.subscribers.remove::<Subscribers<E>>();
    }

    /// Drops all subscriptions to events of all types.
    pub fn reset(&mut self) {
        self.subscribers.clear();
    }

    /// Number of subscriptions to events of type `E`.
    pub fn subscriber_count<E>(&self) -> usize
    where
        E: Event,
    {
        self.subscribers
            .get::<Subscribers<E>>()
            .map_or(0, |subscribers| subscribers.0.len())
    }

    fn push<E>(&mut self, handler: Handler<E>)
    where
        E: Event,
    {
        match self.subscribers.get_mut::<Subscribers<E>>() {
            Some(subscribers) => subscribers.0.push(handler),
            None => {
                self.subscribers.insert(Subscribers(vec![handler]));
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
