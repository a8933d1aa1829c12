use std::{cell::RefCell, collections::HashMap, rc::Rc};

use shared::domain::{ObserverId, ObserverOwner};
use tracing::{debug, trace};

use crate::{command::CommandFactory, facade::Facade, notification::Notification, view::View};

/// Command registry. Holds one observer per notification name that has a command mapped.
#[derive(Default)]
pub struct Controller {
    commands: RefCell<HashMap<String, CommandFactory>>,
    command_observers: RefCell<HashMap<String, ObserverId>>,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `name` to `factory`. The observer for `name` is created on the first mapping only;
    /// later calls just replace the factory.
    pub fn register_command(&self, view: &View, name: &str, factory: CommandFactory) {
        let first_mapping = !self.commands.borrow().contains_key(name);
        if first_mapping {
            let observer = view.create_observer(
                ObserverOwner::Controller,
                Rc::new(|facade: &Facade, notification: &Notification| {
                    facade.controller().execute_command(facade, notification)
                }),
            );
            let observer_id = view.register_observer(name, observer);
            self.command_observers
                .borrow_mut()
                .insert(name.to_string(), observer_id);
        }
        self.commands
            .borrow_mut()
            .insert(name.to_string(), factory);
        debug!(notification = name, replaced = !first_mapping, "registered command");
    }

    /// Builds a fresh command for the notification's name and executes it. Does nothing when the
    /// mapping is gone.
    pub fn execute_command(&self, facade: &Facade, notification: &Notification) -> anyhow::Result<()> {
        let factory = self.commands.borrow().get(notification.name()).cloned();
        let Some(factory) = factory else {
            trace!(notification = notification.name(), "no command mapped; skipping");
            return Ok(());
        };
        let command = factory();
        command.execute(facade, notification)
    }

    pub fn has_command(&self, name: &str) -> bool {
        self.commands.borrow().contains_key(name)
    }

    pub fn command_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.commands.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn remove_command(&self, view: &View, name: &str) -> bool {
        if self.commands.borrow_mut().remove(name).is_none() {
            return false;
        }
        let observer_id = self.command_observers.borrow_mut().remove(name);
        if let Some(observer_id) = observer_id {
            view.remove_observer(name, observer_id);
        }
        debug!(notification = name, "removed command");
        true
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
