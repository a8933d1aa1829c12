use std::rc::{Rc, Weak};

use shared::{domain::ObserverId, error::DispatchError};
use tracing::{debug, info};

use crate::{
    command::CommandFactory,
    config::Settings,
    controller::Controller,
    mediator::Mediator,
    model::Model,
    notification::{Body, Notification, NotificationPool},
    notifier::Notifier,
    observer::NotifyFn,
    proxy::Proxy,
    view::View,
};

/// Owns the model, view and controller registries and the notification pool.
///
/// Facades are independent of each other; nothing is global.
pub struct Facade {
    model: Model,
    view: View,
    controller: Controller,
    pool: NotificationPool,
    settings: Settings,
    this: Weak<Facade>,
}

impl Facade {
    pub fn new() -> Rc<Self> {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Rc<Self> {
        debug!(
            pooling_enabled = settings.pooling_enabled,
            pool_capacity = settings.pool_capacity,
            failure_policy = ?settings.failure_policy,
            "creating facade"
        );
        Rc::new_cyclic(|this| Self {
            model: Model::new(),
            view: View::new(settings.failure_policy),
            controller: Controller::new(),
            pool: NotificationPool::new(settings.pool_capacity, settings.pooling_enabled),
            settings,
            this: this.clone(),
        })
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn pool(&self) -> &NotificationPool {
        &self.pool
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn notifier(&self) -> Notifier {
        Notifier::new(self.this.clone())
    }

    pub fn register_command(&self, name: &str, factory: CommandFactory) {
        self.controller.register_command(&self.view, name, factory);
    }

    pub fn remove_command(&self, name: &str) -> bool {
        self.controller.remove_command(&self.view, name)
    }

    pub fn has_command(&self, name: &str) -> bool {
        self.controller.has_command(name)
    }

    pub fn register_proxy(&self, proxy: Rc<dyn Proxy>) {
        self.model.register_proxy(self, proxy);
    }

    pub fn retrieve_proxy(&self, name: &str) -> Option<Rc<dyn Proxy>> {
        self.model.retrieve_proxy(name)
    }

    pub fn retrieve_proxy_as<T: Proxy>(&self, name: &str) -> Option<Rc<T>> {
        self.model.retrieve_proxy_as(name)
    }

    pub fn remove_proxy(&self, name: &str) -> Option<Rc<dyn Proxy>> {
        self.model.remove_proxy(self, name)
    }

    pub fn has_proxy(&self, name: &str) -> bool {
        self.model.has_proxy(name)
    }

    pub fn register_mediator(&self, mediator: Rc<dyn Mediator>) -> bool {
        self.view.register_mediator(self, mediator)
    }

    pub fn retrieve_mediator(&self, name: &str) -> Option<Rc<dyn Mediator>> {
        self.view.retrieve_mediator(name)
    }

    pub fn retrieve_mediator_as<T: Mediator>(&self, name: &str) -> Option<Rc<T>> {
        self.view.retrieve_mediator_as(name)
    }

    pub fn remove_mediator(&self, name: &str) -> Option<Rc<dyn Mediator>> {
        self.view.remove_mediator(self, name)
    }

    pub fn has_mediator(&self, name: &str) -> bool {
        self.view.has_mediator(name)
    }

    /// Subscribes a bare callback to `name`. Remove it with [`Facade::remove_observer`].
    pub fn observe(&self, name: &str, notify: NotifyFn) -> ObserverId {
        self.view.observe(name, notify)
    }

    pub fn remove_observer(&self, name: &str, id: ObserverId) -> bool {
        self.view.remove_observer(name, id)
    }

    pub fn notify_observers(&self, notification: Notification) -> Result<(), DispatchError> {
        self.view.notify_observers(self, notification)
    }

    pub fn send_notification(
        &self,
        name: &str,
        body: Option<Body>,
        kind: Option<&str>,
    ) -> Result<(), DispatchError> {
        let notification = self.pool.allocate(name, body, kind);
        self.notify_observers(notification)
    }

    /// Removes every mediator, proxy and command, running the mediator and proxy removal hooks.
    pub fn teardown(&self) {
        let mediators = self.view.mediator_names();
        let proxies = self.model.proxy_names();
        let commands = self.controller.command_names();
        info!(
            mediators = mediators.len(),
            proxies = proxies.len(),
            commands = commands.len(),
            "tearing down facade"
        );
        for name in &mediators {
            self.remove_mediator(name);
        }
        for name in &proxies {
            self.remove_proxy(name);
        }
        for name in &commands {
            self.remove_command(name);
        }
    }
}

#[cfg(test)]
#[path = "tests/facade_tests.rs"]
mod tests;
