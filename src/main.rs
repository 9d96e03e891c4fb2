use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use contentshell::shell::LogAuditLog;
use contentshell::{
    Actor, BufferedClientPage, CommandContext, ContentDatabase, InMemoryContentDatabase,
    ItemReference, Shell, ShellConfig, VersionNumber,
};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "contentshell")]
#[command(about = "Run content shell commands against a JSON content fixture")]
struct Cli {
    /// Content database fixture: {"name": "master", "items": [...]}
    #[arg(long)]
    fixture: PathBuf,

    /// Shell configuration (JSON); defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    user: String,

    #[arg(long = "role")]
    roles: Vec<String>,

    #[arg(long)]
    admin: bool,

    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the add-version state for an item
    State {
        #[command(flatten)]
        target: Target,
    },
    /// Add a version to an item
    AddVersion {
        #[command(flatten)]
        target: Target,
        /// Pretend the page has unsaved edits
        #[arg(long)]
        unsaved_changes: bool,
        /// Answer "discard" when asked about unsaved edits
        #[arg(long)]
        discard_changes: bool,
    },
}

#[derive(clap::Args)]
struct Target {
    #[arg(long)]
    id: String,
    #[arg(long)]
    language: String,
    /// Version number; 0 selects the latest
    #[arg(long, default_value_t = 0)]
    version: u32,
}

impl Target {
    fn reference(&self) -> Result<ItemReference> {
        Ok(ItemReference::new(
            self.id.parse()?,
            self.language.parse()?,
            VersionNumber::new(self.version),
        ))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            ShellConfig::from_json_str(&json)?
        }
        None => ShellConfig::default(),
    };

    let fixture = fs::read_to_string(&cli.fixture)
        .with_context(|| format!("failed to read {}", cli.fixture.display()))?;
    let database = InMemoryContentDatabase::from_json_str(&fixture)
        .with_context(|| format!("invalid fixture {}", cli.fixture.display()))?;

    let mut shell = Shell::new(config)?;
    shell.add_database(Arc::new(database));

    let actor = if cli.admin {
        Actor::administrator(cli.user.clone())
    } else {
        Actor::new(cli.user.clone(), cli.roles.clone())
    };

    match &cli.command {
        Command::State { target } => {
            let page = Arc::new(BufferedClientPage::new());
            let session = shell.open_session(actor, page, Arc::new(LogAuditLog))?;
            let context = select(session.content_database().as_ref(), target).await?;
            let state = shell
                .query_state(&shell.config().add_version_command, &session, &context)
                .await?;
            println!("{}", serde_json::to_string(&state)?);
        }
        Command::AddVersion {
            target,
            unsaved_changes,
            discard_changes,
        } => {
            let command = shell.config().add_version_command.clone();

            // Render phase: state check and invocation.
            let page = Arc::new(BufferedClientPage::new());
            let session = shell.open_session(actor.clone(), page.clone(), Arc::new(LogAuditLog))?;
            let context = select(session.content_database().as_ref(), target).await?;
            let state = shell.query_state(&command, &session, &context).await?;
            if !state.is_enabled() {
                return Err(anyhow!("{} is {:?} for this item", command, state));
            }
            shell.execute(&command, &session, &context).await?;

            // Round trip: pending continuations run in a fresh session.
            let pending = page.take_pending().await;
            let next_page = Arc::new(BufferedClientPage::new());
            next_page
                .set_unsaved_changes(*unsaved_changes, *discard_changes)
                .await;
            let next_session = shell.open_session(actor, next_page.clone(), Arc::new(LogAuditLog))?;
            for call in pending {
                shell
                    .registry()
                    .resume(&call.command, &call.method, &next_session, &call.args)
                    .await?;
            }

            for message in next_page.messages().await {
                println!("message: {}", message.payload);
            }
            for alert in next_page.alerts().await {
                println!("alert: {}", alert);
            }
        }
    }

    Ok(())
}

async fn select(database: &dyn ContentDatabase, target: &Target) -> Result<CommandContext> {
    let reference = target.reference()?;
    let item = database
        .get_item(&reference)
        .await?
        .ok_or_else(|| anyhow!("item {} not found", reference))?;
    Ok(CommandContext::single(item))
}
