mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    codex::CodexSubcommand, research::ResearchSubcommand, slash::SlashFormat,
    study::StudySubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "uxkit",
    about = "UX research toolkit — studies, research artifacts and slash commands",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .uxkit/ or .git/)
    #[arg(long, global = true, env = "UXKIT_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize uxkit in the current project
    Init {
        /// Also enable the Codex integration and write .codex/prompts/
        #[arg(long)]
        codex: bool,
    },

    /// Manage research studies
    Study {
        #[command(subcommand)]
        subcommand: StudySubcommand,
    },

    /// Produce research artifacts for a study
    Research {
        #[command(subcommand)]
        subcommand: ResearchSubcommand,
    },

    /// Run a slash command, e.g. uxkit slash "/study:list"
    Slash {
        /// The full command string, starting with '/'
        command: String,

        /// Describe what the command would do without touching disk
        #[arg(long)]
        preview: bool,

        /// Response rendering
        #[arg(long, value_enum, default_value_t = SlashFormat::Display)]
        format: SlashFormat,
    },

    /// List the available slash commands
    #[command(name = "commands")]
    ListCommands,

    /// Show help for one slash command, or an overview of all of them
    HelpCommand { name: Option<String> },

    /// Inspect and drive the external Codex CLI
    Codex {
        #[command(subcommand)]
        subcommand: CodexSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init { codex } => cmd::init::run(&root, codex),
        Commands::Study { subcommand } => cmd::study::run(&root, subcommand, cli.json),
        Commands::Research { subcommand } => cmd::research::run(&root, subcommand, cli.json),
        Commands::Slash {
            command,
            preview,
            format,
        } => cmd::slash::run(&root, &command, preview, format, cli.json),
        Commands::ListCommands => cmd::slash::list(cli.json),
        Commands::HelpCommand { name } => cmd::slash::help(name.as_deref(), cli.json),
        Commands::Codex { subcommand } => cmd::codex::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        // The command already printed its own failure record.
        if e.downcast_ref::<output::Reported>().is_none() {
            eprintln!("error: {e:#}");
        }
        std::process::exit(1);
    }
}
