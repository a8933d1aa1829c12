use std::rc::Rc;

use crate::{facade::Facade, notification::Notification, AsAny};

/// Application component bridging a view element to the notification system.
pub trait Mediator: AsAny {
    fn name(&self) -> &str;

    /// Notification names this mediator is subscribed to while registered.
    ///
    /// Queried at registration and again at removal.
    fn interests(&self) -> Vec<String> {
        Vec::new()
    }

    fn handle_notification(&self, _facade: &Facade, _notification: &Notification) -> anyhow::Result<()> {
        Ok(())
    }

    fn on_register(&self, _facade: &Facade) {}

    fn on_remove(&self, _facade: &Facade) {}
}

pub fn downcast_mediator<T: Mediator>(mediator: Rc<dyn Mediator>) -> Option<Rc<T>> {
    <dyn Mediator as AsAny>::into_any_rc(mediator)
        .downcast::<T>()
        .ok()
}
