//! Name-keyed publish/subscribe dispatch for model, view and command registries.
//!
//! A [`Facade`] owns the three registries ([`Model`], [`View`], [`Controller`]) and the
//! [`NotificationPool`]. Everything runs on one thread: a broadcast invokes every observer
//! registered under the notification's name, synchronously and in registration order.

use std::{any::Any, rc::Rc};

pub mod command;
pub mod config;
pub mod controller;
pub mod facade;
pub mod mediator;
pub mod model;
pub mod notification;
pub mod notifier;
pub mod observer;
pub mod proxy;
pub mod view;

pub use command::{command_factory, Command, CommandFactory, MacroCommand};
pub use config::{load_settings, load_settings_from, FailurePolicy, Settings};
pub use controller::Controller;
pub use facade::Facade;
pub use mediator::Mediator;
pub use model::Model;
pub use notification::{Body, Notification, NotificationPool};
pub use notifier::Notifier;
pub use observer::{NotifyFn, Observer};
pub use proxy::Proxy;
pub use shared::{domain::ObserverId, error::DispatchError};
pub use view::View;

/// Lets registries hand back the concrete type behind an `Rc<dyn Mediator>` or `Rc<dyn Proxy>`.
pub trait AsAny: Any {
    fn into_any_rc(self: Rc<Self>) -> Rc<dyn Any>;
}

impl<T: Any> AsAny for T {
    fn into_any_rc(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}
