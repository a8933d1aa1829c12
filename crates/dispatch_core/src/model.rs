use std::{cell::RefCell, collections::HashMap, rc::Rc};

use tracing::debug;

use crate::{
    facade::Facade,
    proxy::{downcast_proxy, Proxy},
};

/// Proxy registry.
#[derive(Default)]
pub struct Model {
    proxies: RefCell<HashMap<String, Rc<dyn Proxy>>>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `proxy` under its name, replacing any proxy already registered there, then runs its
    /// registration hook. A replaced proxy does not get its removal hook.
    pub fn register_proxy(&self, facade: &Facade, proxy: Rc<dyn Proxy>) {
        let name = proxy.name().to_string();
        let replaced = self
            .proxies
            .borrow_mut()
            .insert(name.clone(), Rc::clone(&proxy))
            .is_some();
        debug!(proxy = %name, replaced, "registered proxy");
        proxy.on_register(facade);
    }

    pub fn retrieve_proxy(&self, name: &str) -> Option<Rc<dyn Proxy>> {
        self.proxies.borrow().get(name).cloned()
    }

    pub fn retrieve_proxy_as<T: Proxy>(&self, name: &str) -> Option<Rc<T>> {
        self.retrieve_proxy(name).and_then(downcast_proxy::<T>)
    }

    pub fn has_proxy(&self, name: &str) -> bool {
        self.proxies.borrow().contains_key(name)
    }

    pub fn proxy_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.proxies.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn remove_proxy(&self, facade: &Facade, name: &str) -> Option<Rc<dyn Proxy>> {
        let proxy = self.proxies.borrow_mut().remove(name)?;
        debug!(proxy = name, "removed proxy");
        proxy.on_remove(facade);
        Some(proxy)
    }
}

#[cfg(test)]
#[path = "tests/model_tests.rs"]
mod tests;
