use std::rc::Rc;

use crate::{facade::Facade, AsAny};

/// Application component holding model data, registered by name.
pub trait Proxy: AsAny {
    fn name(&self) -> &str;

    fn on_register(&self, _facade: &Facade) {}

    fn on_remove(&self, _facade: &Facade) {}
}

pub fn downcast_proxy<T: Proxy>(proxy: Rc<dyn Proxy>) -> Option<Rc<T>> {
    <dyn Proxy as AsAny>::into_any_rc(proxy).downcast::<T>().ok()
}
