use super::{ClientPipelineArgs, Command, CommandContext, Session};
use crate::core::{Result, ShellError};
use crate::gate::CommandState;
use std::sync::Arc;

/// Commands known to the shell, looked up by name
#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Arc<dyn Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a command; a later registration under the same name wins
    pub fn register(&mut self, command: Arc<dyn Command>) {
        self.commands.retain(|existing| existing.name() != command.name());
        self.commands.push(command);
    }

    pub fn get(&self, name: &str) -> Result<&Arc<dyn Command>> {
        self.commands
            .iter()
            .find(|command| command.name() == name)
            .ok_or_else(|| ShellError::CommandNotFound(name.to_string()))
    }

    pub async fn query_state(
        &self,
        name: &str,
        session: &Session,
        context: &CommandContext,
    ) -> Result<CommandState> {
        self.get(name)?.query_state(session, context).await
    }

    pub async fn execute(&self, name: &str, session: &Session, context: &CommandContext) -> Result<()> {
        self.get(name)?.execute(session, context).await
    }

    pub async fn resume(
        &self,
        name: &str,
        method: &str,
        session: &Session,
        args: &ClientPipelineArgs,
    ) -> Result<()> {
        self.get(name)?.resume(session, method, args).await
    }

    /// Names of registered commands, in registration order
    pub fn list_commands(&self) -> Vec<&str> {
        self.commands.iter().map(|command| command.name()).collect()
    }
}
