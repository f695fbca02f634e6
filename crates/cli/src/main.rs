//! Heimdall CLI: the main entry point.
//!
//! Commands:
//! - `ask`     Run a command through the full pipeline
//! - `route`   Show which backend a command would go to
//! - `config`  Show, initialize or check configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

use commands::Selection;

#[derive(Parser)]
#[command(
    name = "heimdall",
    about = "Heimdall: route coding prompts to the right AI backend",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Use this config file instead of ~/.heimdall/config.toml
    #[arg(long, global = true, env = "HEIMDALL_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a command to the selected backend and print the reply
    Ask {
        /// The command, e.g. `deepseek optimize this loop`
        #[arg(required = true, trailing_var_arg = true)]
        command: Vec<String>,

        /// File to treat as the active document
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Selected character range in the file, as `start:end`
        #[arg(short, long, requires = "file")]
        selection: Option<Selection>,

        /// Print the full response envelope as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the routing decision without calling any backend
    Route {
        #[arg(required = true, trailing_var_arg = true)]
        command: Vec<String>,

        /// File to treat as the active document
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration (secrets redacted)
    Show,
    /// Write a starter config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Check every backend's credentials and endpoint
    Check,
}

fn init_tracing(verbose: bool, json: bool) {
    let filter = if verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.log_json);

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Ask {
            command,
            file,
            selection,
            json,
        } => commands::ask::run(config_path, &command.join(" "), file, selection, json).await?,
        Commands::Route { command, file } => {
            commands::route::run(config_path, &command.join(" "), file).await?
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show(config_path).await?,
            ConfigAction::Init { force } => commands::config_cmd::init(config_path, force).await?,
            ConfigAction::Check => commands::config_cmd::check(config_path).await?,
        },
    }

    Ok(())
}
