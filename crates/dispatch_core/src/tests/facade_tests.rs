use std::cell::RefCell;

use super::*;
use crate::command::{command_factory, Command};

type Log = Rc<RefCell<Vec<String>>>;

struct Panel {
    log: Log,
}

impl Mediator for Panel {
    fn name(&self) -> &str {
        "panel"
    }

    fn interests(&self) -> Vec<String> {
        vec!["refresh".into()]
    }

    fn handle_notification(&self, _facade: &Facade, notification: &Notification) -> anyhow::Result<()> {
        self.log
            .borrow_mut()
            .push(format!("panel:{}", notification.name()));
        Ok(())
    }

    fn on_remove(&self, _facade: &Facade) {
        self.log.borrow_mut().push("panel:removed".into());
    }
}

struct Store {
    log: Log,
}

impl Proxy for Store {
    fn name(&self) -> &str {
        "store"
    }

    fn on_register(&self, facade: &Facade) {
        self.log.borrow_mut().push("store:registered".into());
        facade
            .send_notification("refresh", None, Some("store"))
            .expect("refresh broadcast");
    }

    fn on_remove(&self, _facade: &Facade) {
        self.log.borrow_mut().push("store:removed".into());
    }
}

#[derive(Default)]
struct Noop;

impl Command for Noop {
    fn execute(&self, _facade: &Facade, _notification: &Notification) -> anyhow::Result<()> {
        Ok(())
    }
}

#[test]
fn proxy_registration_hook_can_broadcast() {
    let facade = Facade::new();
    let log: Log = Rc::default();
    facade.register_mediator(Rc::new(Panel {
        log: Rc::clone(&log),
    }));
    facade.register_proxy(Rc::new(Store {
        log: Rc::clone(&log),
    }));

    assert_eq!(*log.borrow(), vec!["store:registered", "panel:refresh"]);
}

#[test]
fn nested_broadcast_completes_before_outer_fan_out_continues() {
    let facade = Facade::new();
    let log: Log = Rc::default();

    let outer_log = Rc::clone(&log);
    facade.observe(
        "outer",
        Rc::new(move |facade: &Facade, _notification: &Notification| {
            outer_log.borrow_mut().push("outer-1".into());
            facade.send_notification("inner", None, None)?;
            outer_log.borrow_mut().push("outer-1 done".into());
            Ok(())
        }),
    );
    let second_log = Rc::clone(&log);
    facade.observe(
        "outer",
        Rc::new(move |_facade: &Facade, notification: &Notification| {
            second_log
                .borrow_mut()
                .push(format!("outer-2:{}", notification.name()));
            Ok(())
        }),
    );
    let inner_log = Rc::clone(&log);
    facade.observe(
        "inner",
        Rc::new(move |_facade: &Facade, _notification: &Notification| {
            inner_log.borrow_mut().push("inner".into());
            Ok(())
        }),
    );

    facade.send_notification("outer", None, None).expect("send outer");
    assert_eq!(
        *log.borrow(),
        vec!["outer-1", "inner", "outer-1 done", "outer-2:outer"]
    );
}

#[test]
fn notify_observers_accepts_a_prebuilt_notification() {
    let facade = Facade::new();
    let log: Log = Rc::default();
    facade.register_mediator(Rc::new(Panel {
        log: Rc::clone(&log),
    }));

    facade
        .notify_observers(Notification::new("refresh", None, None))
        .expect("notify");
    assert_eq!(*log.borrow(), vec!["panel:refresh"]);
    assert_eq!(facade.pool().free_len(), 1);
}

#[test]
fn send_notification_reuses_pooled_notifications() {
    let facade = Facade::new();
    facade.send_notification("one", None, None).expect("one");
    facade.send_notification("two", None, None).expect("two");
    assert_eq!(facade.pool().free_len(), 1);
}

#[test]
fn teardown_removes_everything_and_runs_hooks() {
    let facade = Facade::new();
    let log: Log = Rc::default();
    facade.register_mediator(Rc::new(Panel {
        log: Rc::clone(&log),
    }));
    facade.register_proxy(Rc::new(Store {
        log: Rc::clone(&log),
    }));
    facade.register_command("noop", command_factory::<Noop>());
    log.borrow_mut().clear();

    facade.teardown();
    assert_eq!(*log.borrow(), vec!["panel:removed", "store:removed"]);
    assert!(!facade.has_mediator("panel"));
    assert!(!facade.has_proxy("store"));
    assert!(!facade.has_command("noop"));
    assert!(facade.view().observed_names().is_empty());
}

#[test]
fn facades_are_independent() {
    let first = Facade::new();
    let second = Facade::new();
    first.register_command("noop", command_factory::<Noop>());
    assert!(first.has_command("noop"));
    assert!(!second.has_command("noop"));
}
