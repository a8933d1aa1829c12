//! Counter demo wired onto a [`Facade`]: one proxy holding a number, one mediator tracing what it
//! sees, and commands changing the number.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use anyhow::{anyhow, bail, Context, Result};
use dispatch_core::{
    command_factory, Body, Command, CommandFactory, Facade, MacroCommand, Mediator, Notification,
    Notifier, Proxy,
};
use shared::{
    domain::ObserverOwner,
    error::ErrorReport,
    protocol::{NotificationSummary, TraceEvent},
};

pub const STARTUP: &str = "startup";
pub const INCREMENT: &str = "increment";
pub const RESET: &str = "reset";
pub const COUNTER_CHANGED: &str = "counter_changed";

#[derive(Debug, Clone, PartialEq)]
pub struct NotificationArg {
    pub name: String,
    pub kind: Option<String>,
    pub body: Option<serde_json::Value>,
}

impl NotificationArg {
    /// Parses `name[:type][=json-body]`.
    pub fn parse(raw: &str) -> Result<Self> {
        let (head, body) = match raw.split_once('=') {
            Some((head, body)) => {
                let body = serde_json::from_str(body)
                    .with_context(|| format!("invalid JSON body in '{raw}'"))?;
                (head, Some(body))
            }
            None => (raw, None),
        };
        let (name, kind) = match head.split_once(':') {
            Some((name, kind)) => (name.trim(), Some(kind.trim().to_string())),
            None => (head.trim(), None),
        };
        if name.is_empty() {
            bail!("notification name missing in '{raw}'");
        }
        Ok(Self {
            name: name.to_string(),
            kind,
            body,
        })
    }

    fn summary(&self) -> NotificationSummary {
        NotificationSummary {
            name: self.name.clone(),
            kind: self.kind.clone(),
            has_body: self.body.is_some(),
        }
    }
}

#[derive(Default)]
pub struct TraceProxy {
    events: RefCell<Vec<TraceEvent>>,
}

impl TraceProxy {
    pub const NAME: &'static str = "trace";

    pub fn record(&self, event: TraceEvent) {
        self.events.borrow_mut().push(event);
    }

    pub fn take(&self) -> Vec<TraceEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }
}

impl Proxy for TraceProxy {
    fn name(&self) -> &str {
        Self::NAME
    }
}

fn record(facade: &Facade, event: TraceEvent) {
    if let Some(trace) = facade.retrieve_proxy_as::<TraceProxy>(TraceProxy::NAME) {
        trace.record(event);
    }
}

pub struct CounterProxy {
    value: Cell<i64>,
    notifier: Notifier,
}

impl CounterProxy {
    pub const NAME: &'static str = "counter";

    pub fn value(&self) -> i64 {
        self.value.get()
    }

    fn set(&self, facade: &Facade, value: i64) -> Result<()> {
        self.value.set(value);
        record(
            facade,
            TraceEvent::ProxyUpdated {
                proxy: Self::NAME.to_string(),
                value: value.into(),
            },
        );
        self.notifier
            .send_notification(COUNTER_CHANGED, Some(Rc::new(value)), None)?;
        Ok(())
    }
}

impl Proxy for CounterProxy {
    fn name(&self) -> &str {
        Self::NAME
    }
}

pub struct TraceMediator;

impl TraceMediator {
    pub const NAME: &'static str = "trace_view";
}

impl Mediator for TraceMediator {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn interests(&self) -> Vec<String> {
        [INCREMENT, RESET, COUNTER_CHANGED]
            .iter()
            .map(|name| name.to_string())
            .collect()
    }

    fn handle_notification(&self, facade: &Facade, notification: &Notification) -> Result<()> {
        record(
            facade,
            TraceEvent::Delivered {
                owner: ObserverOwner::Mediator(Self::NAME.to_string()),
                notification: notification.summary(),
            },
        );
        Ok(())
    }
}

#[derive(Default)]
struct PrepModelCommand;

impl Command for PrepModelCommand {
    fn execute(&self, facade: &Facade, _notification: &Notification) -> Result<()> {
        facade.register_proxy(Rc::new(CounterProxy {
            value: Cell::new(0),
            notifier: facade.notifier(),
        }));
        Ok(())
    }
}

#[derive(Default)]
struct PrepViewCommand;

impl Command for PrepViewCommand {
    fn execute(&self, facade: &Facade, _notification: &Notification) -> Result<()> {
        facade.register_mediator(Rc::new(TraceMediator));
        Ok(())
    }
}

fn counter(facade: &Facade) -> Result<Rc<CounterProxy>> {
    facade
        .retrieve_proxy_as::<CounterProxy>(CounterProxy::NAME)
        .ok_or_else(|| anyhow!("counter proxy is not registered"))
}

fn executed(facade: &Facade, command: &str, notification: &Notification) {
    record(
        facade,
        TraceEvent::CommandExecuted {
            command: command.to_string(),
            notification: notification.summary(),
        },
    );
}

#[derive(Default)]
struct IncrementCommand;

impl Command for IncrementCommand {
    fn execute(&self, facade: &Facade, notification: &Notification) -> Result<()> {
        let delta = match notification.body_as::<serde_json::Value>() {
            None => 1,
            Some(value) => value
                .as_i64()
                .ok_or_else(|| anyhow!("increment expects an integer body, got {value}"))?,
        };
        executed(facade, "increment", notification);
        let counter = counter(facade)?;
        let value = counter
            .value()
            .checked_add(delta)
            .ok_or_else(|| anyhow!("counter overflow"))?;
        counter.set(facade, value)
    }
}

#[derive(Default)]
struct ResetCommand;

impl Command for ResetCommand {
    fn execute(&self, facade: &Facade, notification: &Notification) -> Result<()> {
        executed(facade, "reset", notification);
        counter(facade)?.set(facade, 0)
    }
}

fn startup_factory() -> CommandFactory {
    Rc::new(|| {
        Box::new(
            MacroCommand::new()
                .with(command_factory::<PrepModelCommand>())
                .with(command_factory::<PrepViewCommand>()),
        ) as Box<dyn Command>
    })
}

/// Registers the trace proxy and demo commands, then runs the startup command.
pub fn install(facade: &Facade) -> Result<()> {
    facade.register_proxy(Rc::new(TraceProxy::default()));
    facade.register_command(STARTUP, startup_factory());
    facade.register_command(INCREMENT, command_factory::<IncrementCommand>());
    facade.register_command(RESET, command_factory::<ResetCommand>());
    facade.send_notification(STARTUP, None, None)?;
    Ok(())
}

/// Sends each notification in order and returns everything the trace proxy recorded.
pub fn run(facade: &Facade, args: &[NotificationArg]) -> Vec<TraceEvent> {
    for arg in args {
        record(
            facade,
            TraceEvent::Sent {
                notification: arg.summary(),
            },
        );
        let body = arg.body.clone().map(|value| Rc::new(value) as Body);
        if let Err(error) = facade.send_notification(&arg.name, body, arg.kind.as_deref()) {
            record(
                facade,
                TraceEvent::Failed {
                    notification: arg.name.clone(),
                    error: ErrorReport::from(&error),
                },
            );
        }
    }

    facade
        .retrieve_proxy_as::<TraceProxy>(TraceProxy::NAME)
        .map(|trace| trace.take())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn installed() -> Rc<Facade> {
        let facade = Facade::new();
        install(&facade).expect("install demo");
        facade
    }

    fn arg(raw: &str) -> NotificationArg {
        NotificationArg::parse(raw).expect("notification arg")
    }

    #[test]
    fn parses_name_kind_and_body() {
        assert_eq!(
            arg("increment:bulk=5"),
            NotificationArg {
                name: "increment".into(),
                kind: Some("bulk".into()),
                body: Some(serde_json::json!(5)),
            }
        );
        assert_eq!(arg(" reset ").name, "reset");
        assert!(NotificationArg::parse("=1").is_err());
        assert!(NotificationArg::parse("increment={").is_err());
    }

    #[test]
    fn startup_registers_counter_and_mediator() {
        let facade = installed();
        assert!(facade.has_proxy(CounterProxy::NAME));
        assert!(facade.has_mediator(TraceMediator::NAME));
    }

    #[test]
    fn increments_accumulate_and_reset_clears() {
        let facade = installed();
        run(&facade, &[arg("increment=5"), arg("increment")]);
        assert_eq!(counter(&facade).expect("counter").value(), 6);

        run(&facade, &[arg("reset")]);
        assert_eq!(counter(&facade).expect("counter").value(), 0);
    }

    #[test]
    fn trace_follows_dispatch_order() {
        let facade = installed();
        let trace = run(&facade, &[arg("increment=2")]);
        let kinds: Vec<&str> = trace
            .iter()
            .map(|event| match event {
                TraceEvent::Sent { .. } => "sent",
                TraceEvent::Delivered { .. } => "delivered",
                TraceEvent::CommandExecuted { .. } => "command",
                TraceEvent::ProxyUpdated { .. } => "proxy",
                TraceEvent::Failed { .. } => "failed",
            })
            .collect();
        // The controller subscribed to `increment` before the mediator did.
        assert_eq!(kinds, vec!["sent", "command", "proxy", "delivered", "delivered"]);
    }

    #[test]
    fn bad_body_is_reported_in_the_trace() {
        let facade = installed();
        let trace = run(&facade, &[arg("increment=\"lots\"")]);
        assert!(matches!(trace.last(), Some(TraceEvent::Failed { notification, .. }) if notification == INCREMENT));
        assert_eq!(counter(&facade).expect("counter").value(), 0);
    }

    #[test]
    fn overflowing_increment_is_reported_in_the_trace() {
        let facade = installed();
        let trace = run(&facade, &vec![arg("increment=9223372036854775807"); 2]);
        assert!(matches!(
            trace.last(),
            Some(TraceEvent::Failed { notification, error })
                if notification == INCREMENT && error.message.contains("counter overflow")
        ));
        assert_eq!(counter(&facade).expect("counter").value(), i64::MAX);
    }
}
