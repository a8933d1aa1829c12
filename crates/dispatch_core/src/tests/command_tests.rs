use std::cell::RefCell;

use super::*;

thread_local! {
    static CALLS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

fn record(call: String) {
    CALLS.with(|calls| calls.borrow_mut().push(call));
}

fn take_calls() -> Vec<String> {
    CALLS.with(|calls| calls.borrow_mut().drain(..).collect())
}

#[derive(Default)]
struct First;

impl Command for First {
    fn execute(&self, _facade: &Facade, notification: &Notification) -> anyhow::Result<()> {
        record(format!("first:{}", notification.name()));
        Ok(())
    }
}

#[derive(Default)]
struct Second;

impl Command for Second {
    fn execute(&self, _facade: &Facade, notification: &Notification) -> anyhow::Result<()> {
        record(format!("second:{}", notification.name()));
        Ok(())
    }
}

#[derive(Default)]
struct Failing;

impl Command for Failing {
    fn execute(&self, _facade: &Facade, _notification: &Notification) -> anyhow::Result<()> {
        record("failing".into());
        anyhow::bail!("sub-command failed")
    }
}

#[test]
fn macro_command_runs_sub_commands_in_order() {
    take_calls();
    let facade = Facade::new();
    let command = MacroCommand::new()
        .with(command_factory::<First>())
        .with(command_factory::<Second>());
    assert_eq!(command.len(), 2);

    command
        .execute(&facade, &Notification::new("startup", None, None))
        .expect("macro command");
    assert_eq!(take_calls(), vec!["first:startup", "second:startup"]);
}

#[test]
fn macro_command_stops_at_first_failure() {
    take_calls();
    let facade = Facade::new();
    let mut command = MacroCommand::new();
    command.add_sub_command(command_factory::<First>());
    command.add_sub_command(command_factory::<Failing>());
    command.add_sub_command(command_factory::<Second>());

    let error = command
        .execute(&facade, &Notification::new("startup", None, None))
        .expect_err("failing sub-command");
    assert_eq!(error.to_string(), "sub-command failed");
    assert_eq!(take_calls(), vec!["first:startup", "failing"]);
}

#[test]
fn empty_macro_command_is_a_no_op() {
    let facade = Facade::new();
    let command = MacroCommand::new();
    assert!(command.is_empty());
    command
        .execute(&facade, &Notification::new("noop", None, None))
        .expect("empty macro");
}
