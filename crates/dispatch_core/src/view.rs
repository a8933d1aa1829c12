use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    rc::Rc,
};

use shared::{
    domain::{ObserverId, ObserverOwner},
    error::DispatchError,
};
use tracing::{debug, trace, warn};

use crate::{
    config::FailurePolicy,
    facade::Facade,
    mediator::{downcast_mediator, Mediator},
    notification::Notification,
    observer::{NotifyFn, Observer},
};

/// Observer and mediator registries plus the broadcast loop.
pub struct View {
    observers: RefCell<HashMap<String, Vec<Rc<Observer>>>>,
    mediators: RefCell<HashMap<String, Rc<dyn Mediator>>>,
    mediator_observers: RefCell<HashMap<String, ObserverId>>,
    next_observer_id: Cell<ObserverId>,
    failure_policy: FailurePolicy,
}

impl View {
    pub fn new(failure_policy: FailurePolicy) -> Self {
        Self {
            observers: RefCell::new(HashMap::new()),
            mediators: RefCell::new(HashMap::new()),
            mediator_observers: RefCell::new(HashMap::new()),
            next_observer_id: Cell::new(ObserverId(1)),
            failure_policy,
        }
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    /// Builds an observer with a fresh id. It is not subscribed to anything until passed to
    /// [`View::register_observer`].
    pub fn create_observer(&self, owner: ObserverOwner, notify: NotifyFn) -> Rc<Observer> {
        let id = self.next_observer_id.get();
        self.next_observer_id.set(id.next());
        Rc::new(Observer::new(id, owner, notify))
    }

    /// Appends `observer` to the list for `name`. No deduplication.
    pub fn register_observer(&self, name: &str, observer: Rc<Observer>) -> ObserverId {
        let id = observer.id();
        debug!(notification = name, observer = %id, owner = ?observer.owner(), "registering observer");
        self.observers
            .borrow_mut()
            .entry(name.to_string())
            .or_default()
            .push(observer);
        id
    }

    /// Creates an observer for `notify` and subscribes it to `name`.
    pub fn observe(&self, name: &str, notify: NotifyFn) -> ObserverId {
        let observer = self.create_observer(ObserverOwner::External, notify);
        self.register_observer(name, observer)
    }

    /// Removes the last-registered observer with `id` from the list for `name`.
    ///
    /// Drops the list entirely once it is empty. Returns `false` when nothing matched.
    pub fn remove_observer(&self, name: &str, id: ObserverId) -> bool {
        let mut observers = self.observers.borrow_mut();
        let Some(list) = observers.get_mut(name) else {
            debug!(notification = name, observer = %id, "no observers registered for notification");
            return false;
        };

        let removed = match list.iter().rposition(|observer| observer.compare_notify_context(id)) {
            Some(index) => {
                list.remove(index);
                true
            }
            None => false,
        };

        if list.is_empty() {
            observers.remove(name);
        }
        if removed {
            debug!(notification = name, observer = %id, "removed observer");
        }
        removed
    }

    /// Delivers `notification` to a snapshot of the observers registered under its name, then
    /// returns it to the pool.
    ///
    /// Observers added or removed while the fan-out runs only affect later broadcasts.
    pub fn notify_observers(
        &self,
        facade: &Facade,
        notification: Notification,
    ) -> Result<(), DispatchError> {
        if notification.is_released() {
            trace!("notification already released; not broadcasting");
            return Ok(());
        }
        let snapshot = self.observers.borrow().get(notification.name()).cloned();
        let result = match snapshot {
            Some(observers) => self.fan_out(facade, &notification, &observers),
            None => {
                trace!(notification = notification.name(), "no observers for notification");
                Ok(())
            }
        };
        facade.pool().release(notification);
        result
    }

    fn fan_out(
        &self,
        facade: &Facade,
        notification: &Notification,
        observers: &[Rc<Observer>],
    ) -> Result<(), DispatchError> {
        let mut failures = Vec::new();
        for observer in observers {
            trace!(
                notification = notification.name(),
                observer = %observer.id(),
                "delivering notification"
            );
            let Err(source) = observer.notify_observer(facade, notification) else {
                continue;
            };
            warn!(
                notification = notification.name(),
                observer = %observer.id(),
                owner = ?observer.owner(),
                error = %source,
                "observer failed"
            );
            match self.failure_policy {
                FailurePolicy::Abort => {
                    return Err(DispatchError::ObserverFailed {
                        notification: notification.name().to_string(),
                        source,
                    });
                }
                FailurePolicy::Continue => failures.push(source),
            }
        }

        let failed = failures.len();
        let Some(first) = failures.into_iter().next() else {
            return Ok(());
        };
        let notification = notification.name().to_string();
        if failed == 1 {
            Err(DispatchError::ObserverFailed {
                notification,
                source: first,
            })
        } else {
            Err(DispatchError::ObserverFailures {
                notification,
                failed,
                first,
            })
        }
    }

    pub fn observer_count(&self, name: &str) -> usize {
        self.observers.borrow().get(name).map_or(0, Vec::len)
    }

    pub fn has_observers(&self, name: &str) -> bool {
        self.observers.borrow().contains_key(name)
    }

    pub fn observed_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.observers.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    /// Registers `mediator` and subscribes one shared observer to all of its interests.
    ///
    /// Returns `false` without touching anything when the name is already taken.
    pub fn register_mediator(&self, facade: &Facade, mediator: Rc<dyn Mediator>) -> bool {
        let name = mediator.name().to_string();
        {
            let mut mediators = self.mediators.borrow_mut();
            if mediators.contains_key(&name) {
                debug!(mediator = %name, "mediator already registered; ignoring");
                return false;
            }
            mediators.insert(name.clone(), Rc::clone(&mediator));
        }

        let interests = mediator.interests();
        if !interests.is_empty() {
            let handler = Rc::clone(&mediator);
            let observer = self.create_observer(
                ObserverOwner::Mediator(name.clone()),
                Rc::new(move |facade: &Facade, notification: &Notification| {
                    handler.handle_notification(facade, notification)
                }),
            );
            for interest in &interests {
                self.register_observer(interest, Rc::clone(&observer));
            }
            self.mediator_observers
                .borrow_mut()
                .insert(name.clone(), observer.id());
        }

        debug!(mediator = %name, interests = interests.len(), "registered mediator");
        mediator.on_register(facade);
        true
    }

    pub fn retrieve_mediator(&self, name: &str) -> Option<Rc<dyn Mediator>> {
        self.mediators.borrow().get(name).cloned()
    }

    pub fn retrieve_mediator_as<T: Mediator>(&self, name: &str) -> Option<Rc<T>> {
        self.retrieve_mediator(name).and_then(downcast_mediator::<T>)
    }

    pub fn has_mediator(&self, name: &str) -> bool {
        self.mediators.borrow().contains_key(name)
    }

    pub fn mediator_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.mediators.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    /// Unsubscribes the mediator from its current interests, drops it from the registry and runs
    /// its removal hook.
    pub fn remove_mediator(&self, facade: &Facade, name: &str) -> Option<Rc<dyn Mediator>> {
        let mediator = self.retrieve_mediator(name)?;

        let observer_id = self.mediator_observers.borrow_mut().remove(name);
        if let Some(observer_id) = observer_id {
            for interest in &mediator.interests() {
                self.remove_observer(interest, observer_id);
            }
        }

        self.mediators.borrow_mut().remove(name);
        debug!(mediator = name, "removed mediator");
        mediator.on_remove(facade);
        Some(mediator)
    }
}

impl Default for View {
    fn default() -> Self {
        Self::new(FailurePolicy::default())
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
