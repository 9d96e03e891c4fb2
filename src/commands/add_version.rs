use crate::content::Item;
use crate::core::{ItemReference, Result, ShellError};
use crate::gate::{self, CommandState, ItemFacts};
use crate::shell::{
    ClientPipelineArgs, Command, CommandContext, Session, ShellConfig, format_item,
};
use async_trait::async_trait;
use tracing::{Instrument, Level, event, info_span};

/// How a run of the add-version continuation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddVersionOutcome {
    /// A version was created. `notified` is false for an item's first version.
    VersionAdded { item: Item, notified: bool },
    /// The re-check refused the actor
    Denied,
    /// The reference no longer resolves; the user was alerted
    NotFound,
    /// Unsaved client edits were kept
    Declined,
}

/// Adds a version to the selected item
///
/// `execute` only captures the item reference and schedules [`AddVersion::RUN`];
/// the version is created when the client resumes that continuation.
#[derive(Debug, Clone)]
pub struct AddVersion {
    name: String,
    version_added_message: String,
    item_not_found_alert: String,
}

impl Default for AddVersion {
    fn default() -> Self {
        Self::from_config(&ShellConfig::default())
    }
}

impl AddVersion {
    pub const RUN: &'static str = "Run";

    pub fn from_config(config: &ShellConfig) -> Self {
        Self {
            name: config.add_version_command.clone(),
            version_added_message: config.version_added_message.clone(),
            item_not_found_alert: config.item_not_found_alert.clone(),
        }
    }

    /// `item:versionadded(id={...},version=3,language=en)`
    pub fn version_added_payload(&self, item: &Item) -> String {
        format!(
            "{}(id={},version={},language={})",
            self.version_added_message, item.id, item.version, item.language
        )
    }

    async fn selection_facts(&self, session: &Session, context: &CommandContext) -> Result<Vec<ItemFacts>> {
        let Some(item) = context.single_item() else {
            return Ok(Vec::new());
        };

        let facts = session.content_database().facts(item, session.actor()).await?;
        Ok(vec![facts])
    }

    /// Re-resolves the item from `args` and adds a version if the actor is
    /// still allowed to.
    pub async fn run(&self, session: &Session, args: &ClientPipelineArgs) -> Result<AddVersionOutcome> {
        let reference = args.item_reference()?;
        let span = info_span!(
            "command.add_version.run",
            item = %reference.id,
            language = %reference.language,
            version = reference.version.number(),
            user = %session.actor().username()
        );

        self.run_resolved(session, reference).instrument(span).await
    }

    async fn run_resolved(
        &self,
        session: &Session,
        reference: ItemReference,
    ) -> Result<AddVersionOutcome> {
        let database = session.content_database();

        let Some(item) = database.get_item(&reference).await? else {
            event!(Level::INFO, "item no longer resolves");
            session.client().alert(&self.item_not_found_alert).await?;
            return Ok(AddVersionOutcome::NotFound);
        };

        let facts = match database.facts(&item, session.actor()).await {
            Ok(facts) => facts,
            Err(ShellError::ItemNotFound(_)) => {
                session.client().alert(&self.item_not_found_alert).await?;
                return Ok(AddVersionOutcome::NotFound);
            }
            Err(err) => return Err(err),
        };

        if !gate::may_execute(session.is_administrator(), &facts) {
            event!(Level::DEBUG, ?facts, "add version denied on re-check");
            return Ok(AddVersionOutcome::Denied);
        }

        if !session.client().check_modified().await? {
            event!(Level::DEBUG, "unsaved client changes kept");
            return Ok(AddVersionOutcome::Declined);
        }

        let existing = database.version_numbers(&item, false).await?;

        session
            .audit()
            .audit(session.actor(), &format!("Add version: {}", format_item(&item)));

        let added = database.add_version(&item).await?;

        let notified = !existing.is_empty();
        if notified {
            session
                .client()
                .send_message(&self.name, self.version_added_payload(&added))
                .await?;
        }

        event!(
            Level::INFO,
            new_version = added.version.number(),
            notified,
            "version added"
        );

        Ok(AddVersionOutcome::VersionAdded {
            item: added,
            notified,
        })
    }
}

#[async_trait]
impl Command for AddVersion {
    fn name(&self) -> &str {
        &self.name
    }

    async fn query_state(&self, session: &Session, context: &CommandContext) -> Result<CommandState> {
        let selection = match self.selection_facts(session, context).await {
            Ok(selection) => selection,
            Err(ShellError::ItemNotFound(id)) => {
                event!(Level::TRACE, command = %self.name, item = %id, "selected item is gone");
                return Ok(CommandState::Hidden);
            }
            Err(err) => return Err(err),
        };
        let verdict = gate::evaluate(session.is_administrator(), &selection, self.base_state());

        event!(
            Level::TRACE,
            command = %self.name,
            state = ?verdict.state,
            rule = ?verdict.rule,
            "command state evaluated"
        );

        Ok(verdict.state)
    }

    async fn execute(&self, session: &Session, context: &CommandContext) -> Result<()> {
        let Some(item) = context.single_item() else {
            return Ok(());
        };

        let args = ClientPipelineArgs::from(&item.reference());
        session.client().start(&self.name, AddVersion::RUN, args).await
    }

    async fn resume(&self, session: &Session, method: &str, args: &ClientPipelineArgs) -> Result<()> {
        match method {
            AddVersion::RUN => self.run(session, args).await.map(|_| ()),
            other => Err(ShellError::UnknownContinuation(self.name.clone(), other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ItemId, VersionNumber};

    #[test]
    fn test_version_added_payload() {
        let command = AddVersion::default();
        let item = Item {
            id: ItemId::from_u128(0x110D559F_DEA5_42EA_9C1C_8A5DF7E70EF9),
            language: "en".parse().unwrap(),
            version: VersionNumber::new(3),
            template_id: ItemId::from_u128(0x76036F5E_CBCE_46D1_AF0A_4143F9B557AA),
            name: "Home".into(),
            path: "/sitecore/content/Home".into(),
            is_fallback: false,
            database: "master".into(),
        };

        assert_eq!(
            command.version_added_payload(&item),
            "item:versionadded(id={110D559F-DEA5-42EA-9C1C-8A5DF7E70EF9},version=3,language=en)"
        );
    }

    #[test]
    fn test_name_comes_from_config() {
        let command = AddVersion::from_config(&ShellConfig::new().add_version_command("custom:addversion"));
        assert_eq!(command.name(), "custom:addversion");
        assert_eq!(command.base_state(), CommandState::Enabled);
    }
}
