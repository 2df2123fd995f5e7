//! Aura CLI - a private, PIN-protected wellness journal
//!
//! Check-ins and journal entries live in a local SQLite store. With a PIN
//! enabled, each profile's document is encrypted at rest and the CLI asks
//! for the PIN (or reads AURA_PIN) before touching it.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod ui;

use clap::{CommandFactory, Parser};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::app::AppContext;
use crate::cli::{Cli, Commands, JournalSubcommand, PinSubcommand};
use crate::constants::exit_codes;
use crate::errors::classify;
use crate::ui::print_error;

/// Log to stderr so stdout stays clean for JSON output. `AURA_LOG` takes
/// an `EnvFilter` directive; the default only shows warnings.
fn init_logging() {
    let filter = EnvFilter::try_from_env("AURA_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .compact(),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() {
    init_logging();

    let cli = Cli::parse();
    let ctx = AppContext::new(&cli);

    if let Err(err) = run(&ctx, &cli).await {
        let ui_ctx = ctx.ui_context(false, None);
        tracing::debug!(error = ?err, "command failed");

        let code = match classify(&err) {
            Some(cli_err) => {
                print_error(&ui_ctx, &cli_err.to_string(), cli_err.hint());
                cli_err.exit_code()
            }
            None => {
                print_error(&ui_ctx, &format!("{:#}", err), None);
                exit_codes::FAILURE
            }
        };
        std::process::exit(code);
    }
}

async fn run(ctx: &AppContext<'_>, cli: &Cli) -> anyhow::Result<()> {
    let Some(command) = &cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    match command {
        Commands::Init(args) => commands::handle_init(ctx, args),
        Commands::Status(args) => commands::handle_status(ctx, args).await,
        Commands::Register(args) => commands::handle_register(ctx, args),
        Commands::Login(args) => commands::handle_login(ctx, args),
        Commands::Logout => commands::handle_logout(ctx),
        Commands::Show => commands::handle_show(ctx).await,
        Commands::Checkin(args) => commands::handle_checkin(ctx, args).await,
        Commands::Journal { command } => match command {
            JournalSubcommand::Add { text } => commands::handle_journal_add(ctx, text).await,
            JournalSubcommand::List(args) => commands::handle_journal_list(ctx, args).await,
        },
        Commands::Moods(args) => commands::handle_moods(ctx, args).await,
        Commands::Pin { command } => match command {
            PinSubcommand::Set => commands::handle_pin_set(ctx).await,
            PinSubcommand::Remove => commands::handle_pin_remove(ctx).await,
            PinSubcommand::Change => commands::handle_pin_change(ctx).await,
        },
        Commands::Export(args) => commands::handle_export(ctx, args).await,
        Commands::Reset(args) => commands::handle_reset(ctx, args).await,
        Commands::Completions { shell } => commands::handle_completions(*shell),
    }
}
