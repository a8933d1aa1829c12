use std::rc::{Rc, Weak};

use shared::error::DispatchError;

use crate::{facade::Facade, notification::Body};

/// Send handle for mediators, proxies and commands that live outside a dispatch callback.
///
/// Holds a weak reference, so embedding one in a registered mediator or proxy does not keep the
/// facade alive.
#[derive(Clone, Default)]
pub struct Notifier {
    facade: Weak<Facade>,
}

impl Notifier {
    pub(crate) fn new(facade: Weak<Facade>) -> Self {
        Self { facade }
    }

    pub fn detached() -> Self {
        Self::default()
    }

    pub fn is_attached(&self) -> bool {
        self.facade.strong_count() > 0
    }

    pub fn facade(&self) -> Result<Rc<Facade>, DispatchError> {
        self.facade.upgrade().ok_or(DispatchError::FacadeDropped)
    }

    pub fn send_notification(
        &self,
        name: &str,
        body: Option<Body>,
        kind: Option<&str>,
    ) -> Result<(), DispatchError> {
        self.facade()?.send_notification(name, body, kind)
    }
}

#[cfg(test)]
#[path = "tests/notifier_tests.rs"]
mod tests;
