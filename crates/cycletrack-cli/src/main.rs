use clap::{Parser, Subcommand};
use cycletrack_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "cycletrack-cli", version, about = "cycletrack CLI")]
struct Cli {
    /// Subject to act on (defaults to `default_subject` from config)
    #[arg(long, global = true)]
    subject: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Daily entry journaling
    Entry {
        #[command(subcommand)]
        action: commands::entry::EntryAction,
    },
    /// Cycle profile management
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },
    /// Cycle phase, prediction and history
    Cycle {
        #[command(subcommand)]
        action: commands::cycle::CycleAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    let (config, load_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    init_tracing(&config);
    if let Some(e) = load_error {
        tracing::warn!("Failed to load config, falling back to defaults: {}", e);
    }

    let subject = cli
        .subject
        .unwrap_or_else(|| config.default_subject.clone());
    tracing::debug!("Using subject {}", subject);

    let result = match cli.command {
        Commands::Entry { action } => commands::entry::run(action, &subject),
        Commands::Profile { action } => commands::profile::run(action, &subject, &config),
        Commands::Cycle { action } => commands::cycle::run(action, &subject, &config),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
