//! # CLI Layer
//!
//! This module is **one possible UI client** for deckmap. It is the only place that:
//! - Knows about terminal I/O (stdout, stderr, prompts)
//! - Installs the tracing subscriber
//! - Builds the tokio runtime
//! - Decides exit codes
//! - Starts Anki when the bridge is down and `auto-launch` is on
//!
//! Handlers call the [`DeckmapApi`](deckmap::api::DeckmapApi) and hand its results to
//! `print`. Business logic stays in the library.

use super::print::{
    print_config, print_decks, print_full_decks, print_messages, print_outcome, print_preview,
    print_remote_decks,
};
use super::setup::{AddArgs, CardArgs, Cli, Commands};
use clap::Parser;
use colored::Colorize;
use deckmap::api::{CmdResult, ConfigAction};
use deckmap::error::Result;
use deckmap::init::{initialize, DeckmapContext};
use deckmap::model::{CardRequest, DeckConfiguration};
use deckmap::remote::launcher::{ensure_running, LaunchOutcome};
use std::io::{BufRead, IsTerminal, Read, Write};
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing::warn;
use tracing_subscriber::EnvFilter;

pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = initialize()?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match cli.command {
        Some(Commands::List { full, json }) => handle_list(&ctx, full, json),
        Some(Commands::Add(args)) => handle_add(&ctx, &runtime, args),
        Some(Commands::Remove { deck_id }) => handle_remove(&ctx, deck_id),
        Some(Commands::Import { file, replace }) => handle_import(&ctx, &file, replace),
        Some(Commands::Export) => handle_export(&ctx),
        Some(Commands::Decks) => handle_remote_decks(&ctx, &runtime),
        Some(Commands::Card(args)) => handle_card(&ctx, &runtime, args),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        None => handle_list(&ctx, false, false),
    }
}

/// `RUST_LOG` wins; otherwise warnings only, or debug output for deckmap with `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "deckmap=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn exit_code(result: &CmdResult) -> ExitCode {
    if result.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Start Anki if it is configured to and the bridge is not answering.
/// A failed launch is only a warning: the command then reports connectivity itself.
fn prepare_anki(ctx: &DeckmapContext, runtime: &Runtime) {
    if !ctx.config.auto_launch {
        return;
    }
    let settings = ctx.config.launch_settings();
    match runtime.block_on(ensure_running(ctx.api.client(), &settings)) {
        Ok(LaunchOutcome::Launched) => eprintln!("{}", "Started Anki.".dimmed()),
        Ok(LaunchOutcome::AlreadyRunning) => {}
        Err(e) => warn!("{}", e),
    }
}

fn handle_list(ctx: &DeckmapContext, full: bool, json: bool) -> Result<ExitCode> {
    let result = ctx.api.list_decks()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&result.configurations)?);
        return Ok(ExitCode::SUCCESS);
    }
    if full {
        print_full_decks(&result.configurations);
    } else {
        print_decks(&result.configurations);
    }
    print_messages(&result.messages);
    Ok(exit_code(&result))
}

fn handle_add(ctx: &DeckmapContext, runtime: &Runtime, args: AddArgs) -> Result<ExitCode> {
    let (deck_id, deck_name) = match (args.deck_id, args.deck_name) {
        (Some(id), Some(name)) => (id, name),
        (id, name) => {
            prepare_anki(ctx, runtime);
            let deck = runtime.block_on(ctx.api.resolve_deck(id, name.as_deref()))?;
            (deck.id, deck.name)
        }
    };

    let config = DeckConfiguration {
        deck_id,
        deck_name,
        purpose: args.purpose,
        note_type: args.note_type,
        front_template: args.front_template,
        back_template: args.back_template,
        front_example: args.front_example,
        back_example: args.back_example,
    };
    let result = ctx.api.add_deck(config)?;
    print_messages(&result.messages);
    Ok(exit_code(&result))
}

fn handle_remove(ctx: &DeckmapContext, deck_id: i64) -> Result<ExitCode> {
    let result = ctx.api.remove_deck(deck_id)?;
    print_messages(&result.messages);
    Ok(exit_code(&result))
}

fn handle_import(ctx: &DeckmapContext, file: &str, replace: bool) -> Result<ExitCode> {
    let raw = if file == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(file)?
    };

    let result = ctx.api.import_decks(&raw, replace)?;
    print_messages(&result.messages);
    Ok(exit_code(&result))
}

fn handle_export(ctx: &DeckmapContext) -> Result<ExitCode> {
    let result = ctx.api.export_decks()?;
    if let Some(document) = &result.exported {
        println!("{}", document);
    }
    // Keep stdout a clean document.
    for message in &result.messages {
        eprintln!("{}", message.content.yellow());
    }
    Ok(exit_code(&result))
}

fn handle_remote_decks(ctx: &DeckmapContext, runtime: &Runtime) -> Result<ExitCode> {
    prepare_anki(ctx, runtime);
    let result = runtime.block_on(ctx.api.remote_decks())?;
    print_remote_decks(&result.remote_decks);
    print_messages(&result.messages);
    Ok(exit_code(&result))
}

fn handle_card(ctx: &DeckmapContext, runtime: &Runtime, args: CardArgs) -> Result<ExitCode> {
    let request = CardRequest {
        deck_id: args.deck_id,
        note_type: args.note_type,
        front: args.front,
        back: args.back,
        text: args.text,
        extra: args.extra,
        tags: args.tags,
    };

    let outcome = match ctx.api.check_card(&request) {
        Some(invalid) => invalid,
        None => {
            let interactive = std::io::stdin().is_terminal() && !args.json;
            if !args.yes && interactive {
                print_preview(&ctx.api.preview_card(&request)?);
                if !confirm("Create this card in Anki?")? {
                    println!("{}", "Cancelled.".dimmed());
                    return Ok(ExitCode::SUCCESS);
                }
            }

            prepare_anki(ctx, runtime);
            runtime.block_on(ctx.api.create_card(&request))
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(&outcome);
    }

    Ok(if outcome.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn handle_config(
    ctx: &DeckmapContext,
    key: Option<String>,
    value: Option<String>,
) -> Result<ExitCode> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };

    let result = ctx.api.config(action)?;
    if result.messages.is_empty() {
        if let Some(config) = &result.config {
            print_config(config);
        }
    }
    print_messages(&result.messages);
    Ok(exit_code(&result))
}
