use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use aura_core::VERSION;

/// Aura - a private, PIN-protected wellness journal that never leaves your device
#[derive(Parser)]
#[command(name = "aura")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the store database
    #[arg(short, long, global = true, env = "AURA_STORE")]
    pub store: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Use ASCII symbols instead of unicode
    #[arg(long, global = true)]
    pub ascii: bool,

    /// Disable interactive prompts
    #[arg(long, global = true)]
    pub no_input: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the config file and create the store
    Init(InitArgs),

    /// Show who is signed in and whether the vault is locked
    Status(JsonArgs),

    /// Create a local profile and sign in to it
    Register(CredentialsArgs),

    /// Sign in to an existing profile
    Login(CredentialsArgs),

    /// Sign out of the current profile
    Logout,

    /// Print the profile document
    Show,

    /// Record how you feel today
    Checkin(CheckinArgs),

    /// Write or read journal entries
    Journal {
        #[command(subcommand)]
        command: JournalSubcommand,
    },

    /// List recorded check-ins
    Moods(ListArgs),

    /// Set, remove or change the PIN
    Pin {
        #[command(subcommand)]
        command: PinSubcommand,
    },

    /// Export the decrypted document as JSON
    Export(ExportArgs),

    /// Delete all data for the current profile
    Reset(ResetArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Where the store will be created
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// Profile to use when nobody is signed in
    #[arg(long)]
    pub profile: Option<String>,

    /// Overwrite an existing config
    #[arg(long)]
    pub force: bool,
}

/// Arguments for commands that only toggle JSON output
#[derive(Args)]
pub struct JsonArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `register` and `login`
#[derive(Args)]
pub struct CredentialsArgs {
    /// Username
    #[arg(value_name = "USER")]
    pub user: String,
}

/// Arguments for the `checkin` command
#[derive(Args)]
pub struct CheckinArgs {
    /// One of: calm, tense, tired, down
    #[arg(long, short)]
    pub mood: String,

    /// Energy level from 0 to 100
    #[arg(long, short, default_value_t = 55)]
    pub energy: i64,

    /// Free-form note
    #[arg(long)]
    pub note: Option<String>,

    /// One thing you are grateful for
    #[arg(long)]
    pub gratitude: Option<String>,

    /// Tags (repeatable)
    #[arg(short, long, value_name = "TAG")]
    pub tag: Vec<String>,
}

#[derive(Subcommand)]
pub enum JournalSubcommand {
    /// Write today's entry (replaces an earlier one from today)
    Add {
        /// Entry text
        #[arg(value_name = "TEXT")]
        text: String,
    },

    /// List journal entries
    List(ListArgs),
}

/// Arguments for list commands
#[derive(Args)]
pub struct ListArgs {
    /// Limit to the most recent N
    #[arg(long)]
    pub limit: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Output format (table, plain)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,
}

#[derive(Subcommand)]
pub enum PinSubcommand {
    /// Protect the profile with a PIN
    Set,
    /// Remove PIN protection
    Remove,
    /// Replace the PIN
    Change,
}

/// Arguments for the `export` command
#[derive(Args)]
pub struct ExportArgs {
    /// Write to this file instead of stdout
    #[arg(long, short, value_name = "PATH")]
    pub output: Option<String>,
}

/// Arguments for the `reset` command
#[derive(Args)]
pub struct ResetArgs {
    /// Confirm deletion
    #[arg(long)]
    pub yes: bool,
}
