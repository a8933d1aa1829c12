use std::{fmt, rc::Rc};

use shared::domain::{ObserverId, ObserverOwner};

use crate::{facade::Facade, notification::Notification};

pub type NotifyFn = Rc<dyn Fn(&Facade, &Notification) -> anyhow::Result<()>>;

/// A callback registered with the [`crate::View`] under one or more notification names.
///
/// The id is the removal key: one observer shared across several names is removed from each
/// list by the same id.
pub struct Observer {
    id: ObserverId,
    owner: ObserverOwner,
    notify: NotifyFn,
}

impl Observer {
    pub(crate) fn new(id: ObserverId, owner: ObserverOwner, notify: NotifyFn) -> Self {
        Self { id, owner, notify }
    }

    pub fn id(&self) -> ObserverId {
        self.id
    }

    pub fn owner(&self) -> &ObserverOwner {
        &self.owner
    }

    pub fn notify_observer(&self, facade: &Facade, notification: &Notification) -> anyhow::Result<()> {
        (self.notify)(facade, notification)
    }

    pub fn compare_notify_context(&self, id: ObserverId) -> bool {
        self.id == id
    }
}

impl fmt::Debug for Observer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observer")
            .field("id", &self.id)
            .field("owner", &self.owner)
            .finish()
    }
}
