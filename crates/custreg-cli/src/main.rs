use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "custreg")]
#[command(about = "Register customers and list the ones already registered", long_about = None)]
struct Cli {
    /// Config file to use instead of ~/.config/custreg/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use a process-local table instead of Supabase
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and register a new customer
    Register(commands::register::RegisterArgs),
    /// Show registered customers, most recent first
    List,
    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the config file path
    Path,
    /// Print the effective configuration with the key redacted
    Show,
    /// Write a config template if none exists
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let ctx = commands::Context::load(cli.config, cli.offline)?;

    match cli.command {
        Commands::Register(args) => commands::register::run(&ctx, args).await?,
        Commands::List => commands::list::run(&ctx).await?,
        Commands::Config { action } => match action {
            ConfigAction::Path => commands::config::path(&ctx),
            ConfigAction::Show => commands::config::show(&ctx)?,
            ConfigAction::Init => commands::config::init(&ctx)?,
        },
    }

    Ok(())
}
