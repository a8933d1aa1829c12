use std::rc::Rc;

use crate::{facade::Facade, notification::Notification};

/// Handler instantiated fresh for every matching notification.
pub trait Command {
    fn execute(&self, facade: &Facade, notification: &Notification) -> anyhow::Result<()>;
}

pub type CommandFactory = Rc<dyn Fn() -> Box<dyn Command>>;

pub fn command_factory<C>() -> CommandFactory
where
    C: Command + Default + 'static,
{
    Rc::new(|| Box::new(C::default()))
}

/// Runs an ordered list of sub-commands against the same notification.
///
/// Each sub-command is built from its factory at execution time. The first failure stops the
/// chain.
#[derive(Default)]
pub struct MacroCommand {
    sub_commands: Vec<CommandFactory>,
}

impl MacroCommand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, factory: CommandFactory) -> Self {
        self.add_sub_command(factory);
        self
    }

    pub fn add_sub_command(&mut self, factory: CommandFactory) {
        self.sub_commands.push(factory);
    }

    pub fn len(&self) -> usize {
        self.sub_commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sub_commands.is_empty()
    }
}

impl Command for MacroCommand {
    fn execute(&self, facade: &Facade, notification: &Notification) -> anyhow::Result<()> {
        for factory in &self.sub_commands {
            let command = factory();
            command.execute(facade, notification)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/command_tests.rs"]
mod tests;
