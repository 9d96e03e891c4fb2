use super::{ClientPipelineArgs, Session};
use crate::content::Item;
use crate::core::Result;
use crate::gate::CommandState;
use async_trait::async_trait;

/// Items selected in the shell when a command is queried or invoked
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    pub items: Vec<Item>,
}

impl CommandContext {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    pub fn single(item: Item) -> Self {
        Self { items: vec![item] }
    }

    /// The selected item when exactly one is selected
    pub fn single_item(&self) -> Option<&Item> {
        match self.items.as_slice() {
            [item] => Some(item),
            _ => None,
        }
    }
}

#[async_trait]
pub trait Command: Send + Sync {
    /// Name the shell dispatches on, e.g. `item:addversion`
    fn name(&self) -> &str;

    /// State returned when none of the command's own rules object
    fn base_state(&self) -> CommandState {
        CommandState::Enabled
    }

    async fn query_state(&self, session: &Session, context: &CommandContext) -> Result<CommandState>;

    async fn execute(&self, session: &Session, context: &CommandContext) -> Result<()>;

    /// Continues work scheduled with [`super::ClientPage::start`]
    async fn resume(&self, session: &Session, method: &str, args: &ClientPipelineArgs) -> Result<()>;
}
