mod cli;
mod commands;

use std::path::Path;

use clap::Parser;
use color_eyre::eyre::Result;
use discourse_core::config::LOG_ENV_VAR;
use discourse_core::Config;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use commands::Context;

/// Log filter: `DISCOURSE_LOG` when set, else `logging.level` from config.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let config = commands::load_config(cli.config.as_deref())?;
    init_tracing(&config.logging.level);

    dispatch(cli.command, config, cli.schema.as_deref()).await
}

async fn dispatch(command: Commands, config: Config, schema: Option<&Path>) -> Result<()> {
    // `init` runs before any schema file exists, so the schema is only
    // loaded by the commands that use it.
    let context = move || Context::new(config, schema);

    match command {
        Commands::Init { force } => commands::init(force)?,
        Commands::Types => commands::types(&context()?),
        Commands::Labels => commands::labels(&context()?),
        Commands::Match { title } => commands::match_title(&context()?, &title.join(" ")),
        Commands::Compile { files } => commands::compile(&context()?, &files)?,
        Commands::Run {
            file,
            saved,
            sort,
            json,
        } => {
            let ctx = context()?;
            commands::run(&ctx, file.as_deref(), saved.as_deref(), sort, json).await?
        }
        Commands::Query { command } => commands::query(&context()?, command)?,
    }

    Ok(())
}
