use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "focusflow", version, about = "FocusFlow work/break timer")]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Completed work sessions per day
    Tally {
        #[command(subcommand)]
        action: commands::tally::TallyAction,
    },
    /// To-do list
    Todo {
        #[command(subcommand)]
        action: commands::todo::TodoAction,
    },
    /// Video playlist
    Playlist {
        #[command(subcommand)]
        action: commands::playlist::PlaylistAction,
    },
    /// Sound cues
    Sound {
        #[command(subcommand)]
        action: commands::sound::SoundAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("FOCUSFLOW_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Tally { action } => commands::tally::run(action),
        Commands::Todo { action } => commands::todo::run(action),
        Commands::Playlist { action } => commands::playlist::run(action),
        Commands::Sound { action } => commands::sound::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => commands::completions::run(shell),
    };

    if let Err(e) = result {
        tracing::debug!("command failed: {e:?}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
