use std::{any::Any, cell::RefCell, fmt, rc::Rc};

use shared::protocol::NotificationSummary;
use tracing::trace;

/// Opaque payload carried by a notification. Receivers downcast with [`Notification::body_as`].
pub type Body = Rc<dyn Any>;

pub struct Notification {
    name: String,
    body: Option<Body>,
    kind: Option<String>,
    released: bool,
}

impl Notification {
    pub fn new(name: impl Into<String>, body: Option<Body>, kind: Option<String>) -> Self {
        Self {
            name: name.into(),
            body,
            kind,
            released: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    pub fn body_as<T: Any>(&self) -> Option<&T> {
        self.body.as_deref().and_then(|body| body.downcast_ref::<T>())
    }

    pub fn set_body(&mut self, body: Option<Body>) {
        self.body = body;
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn set_kind(&mut self, kind: Option<String>) {
        self.kind = kind;
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Clears every field and marks the notification released.
    ///
    /// Returns `false` when it was already released; only the first call has any effect.
    pub fn dispose(&mut self) -> bool {
        if self.released {
            return false;
        }
        self.name.clear();
        self.body = None;
        self.kind = None;
        self.released = true;
        true
    }

    pub fn summary(&self) -> NotificationSummary {
        NotificationSummary {
            name: self.name.clone(),
            kind: self.kind.clone(),
            has_body: self.body.is_some(),
        }
    }

    fn reuse(&mut self, name: &str, body: Option<Body>, kind: Option<&str>) {
        self.name.clear();
        self.name.push_str(name);
        self.body = body;
        self.kind = kind.map(str::to_string);
        self.released = false;
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Notification Name: {}", self.name)?;
        write!(
            f,
            "\nBody:{}",
            if self.body.is_some() { "object" } else { "null" }
        )?;
        write!(f, "\nType:{}", self.kind.as_deref().unwrap_or("null"))
    }
}

impl fmt::Debug for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notification")
            .field("name", &self.name)
            .field("has_body", &self.body.is_some())
            .field("kind", &self.kind)
            .field("released", &self.released)
            .finish()
    }
}

/// Free list of released notifications, reused by [`NotificationPool::allocate`].
pub struct NotificationPool {
    free: RefCell<Vec<Notification>>,
    capacity: usize,
    enabled: bool,
}

impl NotificationPool {
    pub fn new(capacity: usize, enabled: bool) -> Self {
        Self {
            free: RefCell::new(Vec::new()),
            capacity,
            enabled,
        }
    }

    pub fn allocate(&self, name: &str, body: Option<Body>, kind: Option<&str>) -> Notification {
        let reused = self.free.borrow_mut().pop();
        match reused {
            Some(mut notification) => {
                notification.reuse(name, body, kind);
                notification
            }
            None => Notification::new(name, body, kind.map(str::to_string)),
        }
    }

    /// Disposes `notification` and keeps it for reuse.
    ///
    /// A notification that was already disposed by its holder is dropped instead of pooled, so the
    /// free list never holds the same slot twice.
    pub fn release(&self, mut notification: Notification) {
        if notification.is_released() {
            trace!("notification already released; not pooled");
            return;
        }
        if !self.enabled {
            return;
        }
        let mut free = self.free.borrow_mut();
        if free.len() >= self.capacity {
            trace!(
                notification = notification.name(),
                capacity = self.capacity,
                "pool full; dropping notification"
            );
            return;
        }
        notification.dispose();
        free.push(notification);
    }

    pub fn free_len(&self) -> usize {
        self.free.borrow().len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for NotificationPool {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_POOL_CAPACITY, true)
    }
}

#[cfg(test)]
#[path = "tests/notification_tests.rs"]
mod tests;
