use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "chronos-cli", version, about = "Chronos classroom observation CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive observation session
    Observe {
        /// Subject under observation (defaults to the first configured subject)
        #[arg(long)]
        subject: Option<String>,
    },
    /// Inspect the configured mode/action taxonomy
    Taxonomy {
        #[command(subcommand)]
        action: commands::taxonomy::TaxonomyAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Observe { subject } => commands::observe::run(subject),
        Commands::Taxonomy { action } => commands::taxonomy::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
