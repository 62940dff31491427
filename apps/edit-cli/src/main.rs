//! gamestall listing editor entry point.

mod config;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use gamestall_catalog::{Credentials, GameId, HttpCatalog};
use gamestall_editor::{EditFlow, EditableGame, EditorError, FieldEdit, GameField, SubmitOutcome};
use gamestall_notify::{Notice, NoticeKind};
use tracing_subscriber::EnvFilter;

use crate::config::{EditorConfig, TOKEN_ENV};

/// Edit one game listing in the catalog.
///
/// Loads the listing, applies the given field values in order and submits
/// them. Without any field values (or with `--show`) it only prints the
/// current listing.
#[derive(Debug, Parser)]
#[command(name = "gamestall-edit", version)]
struct Args {
    /// Catalog id of the game to edit.
    game_id: String,

    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    description: Option<String>,

    /// One of Action, Adventure, RPG, Strategy, Puzzle, Indie, Simulation, Sports.
    #[arg(long)]
    genre: Option<String>,

    /// Non-negative amount with at most two decimals, e.g. 9.99.
    #[arg(long)]
    price: Option<String>,

    /// Cover image URL; pass an empty string to clear it.
    #[arg(long)]
    cover_image: Option<String>,

    /// Download URL; pass an empty string to clear it.
    #[arg(long)]
    download_link: Option<String>,

    /// Overrides `api_url` from the config file.
    #[arg(long)]
    api_url: Option<String>,

    /// Bearer token (defaults to $GAMESTALL_TOKEN, then the config file).
    #[arg(long)]
    token: Option<String>,

    /// Print the listing and exit without submitting.
    #[arg(long)]
    show: bool,
}

impl Args {
    /// Requested edits, in form order.
    fn edits(&self) -> Vec<FieldEdit> {
        [
            (GameField::Title, &self.title),
            (GameField::Description, &self.description),
            (GameField::Genre, &self.genre),
            (GameField::Price, &self.price),
            (GameField::CoverImageUrl, &self.cover_image),
            (GameField::DownloadUrl, &self.download_link),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_ref().map(|v| FieldEdit::new(field, v.clone())))
        .collect()
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "edit failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<ExitCode> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting gamestall editor");

    // Load configuration.
    let mut editor_config = match EditorConfig::load() {
        Ok(c) => {
            tracing::info!(api_url = %c.api_url, "configuration loaded");
            c
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to load config, using defaults");
            EditorConfig::default()
        }
    };
    if let Some(url) = &args.api_url {
        editor_config.api_url = url.clone();
    }

    let edits = args.edits();
    let submitting = !args.show && !edits.is_empty();
    let env_token = std::env::var(TOKEN_ENV).ok();
    let credentials = editor_config
        .resolve_token(args.token.as_deref(), env_token.as_deref())
        .map(Credentials::bearer);
    if submitting && credentials.is_none() {
        anyhow::bail!("no bearer token: pass --token or set {TOKEN_ENV}");
    }

    let catalog = HttpCatalog::new(&editor_config.api_url, editor_config.request_timeout())
        .context("failed to build HTTP client")?;
    let flow = EditFlow::new(
        catalog,
        GameId::new(args.game_id.clone()),
        editor_config.dashboard_route.clone(),
    );

    flow.load().await?;
    print_notices(flow.drain_notices());
    if let Some(game) = flow.game() {
        print_game(&game);
    }

    let Some(credentials) = credentials.filter(|_| submitting) else {
        return Ok(ExitCode::SUCCESS);
    };
    if flow.is_degraded() {
        anyhow::bail!("game {} could not be loaded; nothing was submitted", flow.game_id());
    }

    for edit in edits {
        flow.edit(edit)?;
    }
    let dirty: Vec<&str> = flow.dirty_fields().into_iter().map(GameField::label).collect();
    if dirty.is_empty() {
        println!("No changes; submitting current values.");
    } else {
        println!("Changed: {}", dirty.join(", "));
    }

    let outcome = flow.submit(&credentials).await;
    print_notices(flow.drain_notices());

    match outcome {
        Ok(SubmitOutcome::Navigated(route)) => {
            println!("-> {route}");
            Ok(ExitCode::SUCCESS)
        }
        Ok(SubmitOutcome::Rejected(_) | SubmitOutcome::Ignored) => Ok(ExitCode::FAILURE),
        Err(EditorError::Validation(_)) => Ok(ExitCode::FAILURE),
        Err(e) => Err(e.into()),
    }
}

fn print_game(game: &EditableGame) {
    for field in GameField::ALL {
        let marker = if field.is_required() { "*" } else { " " };
        println!("{:<16}{marker} {}", field.label(), game.get(field));
    }
}

fn print_notices(notices: Vec<Notice>) {
    for notice in notices {
        let tag = match (notice.kind, notice.blocking) {
            (_, true) => "ALERT",
            (NoticeKind::Error, false) => "error",
            (NoticeKind::Success, false) => "ok",
            (NoticeKind::Info, false) => "info",
        };
        println!("[{tag}] {}", notice.text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_follow_form_order() {
        let args = Args::parse_from([
            "gamestall-edit",
            "g1",
            "--download-link",
            "",
            "--price",
            "9.99",
            "--title",
            "New",
        ]);
        assert_eq!(
            args.edits(),
            vec![
                FieldEdit::Title("New".into()),
                FieldEdit::Price("9.99".into()),
                FieldEdit::DownloadUrl(String::new()),
            ]
        );
    }

    #[test]
    fn show_only_has_no_edits() {
        let args = Args::parse_from(["gamestall-edit", "g1", "--show"]);
        assert!(args.show);
        assert!(args.edits().is_empty());
        assert_eq!(args.game_id, "g1");
    }

    #[test]
    fn overrides_parsed() {
        let args = Args::parse_from([
            "gamestall-edit",
            "g1",
            "--api-url",
            "https://games.example/api",
            "--token",
            "t",
        ]);
        assert_eq!(args.api_url.as_deref(), Some("https://games.example/api"));
        assert_eq!(args.token.as_deref(), Some("t"));
    }
}
