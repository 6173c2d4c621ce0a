//! Command handling for the `markstack` binary.
//!
//! Argument parsing and output live here so they can be driven from tests
//! with a mock transport; `main.rs` only wires up logging and HTTP.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use markstack_client::{BookmarkClient, ClientConfig, FormSubmitter, SubmitOutcome};
use markstack_form::{schemas, FieldValues, FormState, ObjectSchema};
use markstack_model::{Bookmark, Outcome};
use markstack_types::EntityId;
use std::future::Future;
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "markstack")]
#[command(about = "Organize bookmarks into folders")]
pub struct Cli {
    /// JSON config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// GraphQL endpoint (overrides config and environment)
    #[arg(short, long)]
    pub endpoint: Option<String>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Check credentials
    Login { email: String, password: String },
    /// Show a folder's sub-folders and bookmarks
    Folder { id: EntityId },
    /// Add a bookmark to a folder
    Add { folder: EntityId, url: String },
    /// Create a folder
    Mkdir {
        name: String,
        #[arg(long)]
        parent: Option<EntityId>,
    },
    /// Move bookmarks to the trash, or delete them for good with --hard
    Rm {
        #[arg(required = true)]
        ids: Vec<EntityId>,
        #[arg(long)]
        hard: bool,
    },
    /// Move a bookmark into another folder
    Mv { id: EntityId, folder: EntityId },
    /// List bookmarks in the trash
    Trash,
    /// List every bookmark
    All,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Login { .. } => "login",
            Command::Folder { .. } => "folder",
            Command::Add { .. } => "add",
            Command::Mkdir { .. } => "mkdir",
            Command::Rm { .. } => "rm",
            Command::Mv { .. } => "mv",
            Command::Trash => "trash",
            Command::All => "all",
        }
    }
}

/// Resolves the effective config: file, then environment, then flags.
pub fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let base = match &cli.config {
        Some(path) => ClientConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ClientConfig::default(),
    };
    let mut config = base.apply_env().context("invalid MARKSTACK_* environment")?;
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint = endpoint.clone();
        config.validate()?;
    }
    Ok(config)
}

/// Runs one command against `client`, writing human-readable output.
pub async fn run(client: &BookmarkClient, command: Command, out: &mut dyn Write) -> Result<()> {
    debug!(command = command.name(), "running command");
    match command {
        Command::Login { email, password } => {
            let mut form = FormState::new(schemas::login_defaults(), schemas::login());
            form.handle_change("email", email)?;
            form.handle_change("password", password)?;
            let user = submit(&mut form, |values| async move {
                client
                    .login(values.get_or_empty("email"), values.get_or_empty("password"))
                    .await
            })
            .await?;
            writeln!(out, "Signed in as {} (user {})", user.email, user.id)?;
        }
        Command::Folder { id } => {
            let children = expect_ok(client.folder_children(id).await?)?;
            let listed = expect_ok(client.folder_bookmarks(id).await?)?;
            writeln!(out, "{} (folder {})", listed.folder.name, listed.folder.id)?;
            for child in &children.children {
                writeln!(out, "  [{}] {}/", child.id, child.name)?;
            }
            write_bookmarks(out, &listed.bookmarks)?;
        }
        Command::Add { folder, url } => {
            let mut form = FormState::new(schemas::create_bookmark_defaults(), schemas::create_bookmark());
            form.handle_change("url", url)?;
            let bookmark = submit(&mut form, |values| async move {
                let url = values.get_or_empty("url").to_string();
                client.create_bookmark(folder, &url).await
            })
            .await?;
            writeln!(out, "Added bookmark {} to folder {folder}", bookmark.id)?;
        }
        Command::Mkdir { name, parent } => {
            let mut form = FormState::new(schemas::create_folder_defaults(), schemas::create_folder());
            form.handle_change("name", name)?;
            let created = submit(&mut form, |values| async move {
                let name = values.get_or_empty("name").to_string();
                client.create_folder(&name, parent).await
            })
            .await?;
            writeln!(out, "Created folder {} ({})", created.name, created.id)?;
        }
        Command::Rm { ids, hard } => {
            if hard {
                let deleted = expect_ok(client.hard_delete_bookmarks(&ids).await?)?;
                writeln!(out, "Deleted {} bookmark(s)", deleted.len())?;
            } else {
                for id in ids {
                    let trashed = expect_ok(client.soft_delete_bookmark(id).await?)?;
                    writeln!(out, "Moved {} to trash", trashed.display_title())?;
                }
            }
        }
        Command::Mv { id, folder } => {
            let moved = expect_ok(client.move_bookmark(id, folder).await?)?;
            writeln!(out, "Moved {} to folder {folder}", moved.display_title())?;
        }
        Command::Trash => {
            let bookmarks = expect_ok(client.deleted_bookmarks().await?)?;
            write_bookmarks(out, &bookmarks)?;
        }
        Command::All => {
            let bookmarks = expect_ok(client.all_bookmarks().await?)?;
            write_bookmarks(out, &bookmarks)?;
        }
    }
    Ok(())
}

fn write_bookmarks(out: &mut dyn Write, bookmarks: &[Bookmark]) -> Result<()> {
    if bookmarks.is_empty() {
        writeln!(out, "  (no bookmarks)")?;
    }
    for bookmark in bookmarks {
        writeln!(out, "  [{}] {} <{}>", bookmark.id, bookmark.display_title(), bookmark.url)?;
    }
    Ok(())
}

fn expect_ok<T>(outcome: Outcome<T>) -> Result<T> {
    match outcome {
        Outcome::Ok(value) => Ok(value),
        Outcome::Invalid(error) => Err(anyhow!("{error}")),
        Outcome::Failed(error) => Err(anyhow!("{error}")),
    }
}

/// Submits a one-shot form and turns every non-success into an error
/// carrying the messages the form would display.
async fn submit<T, F, Fut>(form: &mut FormState<ObjectSchema>, send: F) -> Result<T>
where
    F: FnOnce(FieldValues) -> Fut,
    Fut: Future<Output = markstack_client::ClientResult<Outcome<T>>>,
{
    match FormSubmitter::new().submit(form, send).await {
        SubmitOutcome::Completed(Outcome::Ok(value)) => Ok(value),
        SubmitOutcome::Failed(error) => Err(error).context("request failed"),
        SubmitOutcome::Suppressed => bail!("duplicate submission"),
        SubmitOutcome::Empty => bail!("nothing to submit"),
        SubmitOutcome::Invalid(_) | SubmitOutcome::Completed(_) => bail!(form_messages(form)),
    }
}

fn form_messages(form: &FormState<ObjectSchema>) -> String {
    let mut messages: Vec<String> = form
        .values()
        .iter()
        .filter_map(|(field, _)| form.visible_error(field).map(|m| format!("{field}: {m}")))
        .collect();
    if let Some(message) = form.form_error() {
        messages.push(message.to_string());
    }
    messages.join("\n")
}
