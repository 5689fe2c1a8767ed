mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use commands::helpers::{resolve_domain, AppContext};
use focusgate_core::config::context_file_path;
use focusgate_core::AiQuestionGenerator;

#[derive(Parser)]
#[command(name = "focusgate")]
#[command(about = "Decide whether websites are productive for your current task", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List configured activity domains
    Domains,
    /// Answer questions about your task and save them as context
    Contextualize {
        /// Activity domain (work, school, personal, ...)
        #[arg(short, long)]
        domain: String,
        /// Where to save the answers (defaults to the data directory)
        #[arg(long)]
        context_file: Option<PathBuf>,
    },
    /// Classify a single URL
    Classify {
        url: String,
        /// Activity domain (work, school, personal, ...)
        #[arg(short, long)]
        domain: String,
        /// Saved context to use (defaults to the data directory)
        #[arg(long)]
        context_file: Option<PathBuf>,
        /// Ignore saved context
        #[arg(long)]
        no_context: bool,
    },
    /// Contextualize, then classify URLs interactively
    Session {
        /// Activity domain (work, school, personal, ...)
        #[arg(short, long)]
        domain: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .target(env_logger::Target::Stderr)
        .init();

    let app = AppContext::load()?;

    match cli.command {
        Commands::Domains => {
            commands::domains::handle_domains_command(&app.store);
            Ok(())
        }
        Commands::Contextualize {
            domain,
            context_file,
        } => {
            let domain = resolve_domain(&app.store, &domain)?;
            let context_path = match context_file {
                Some(path) => path,
                None => context_file_path()?,
            };
            let ai = app.ai_service().await?;
            commands::contextualize::handle_contextualize_command(
                &app.store,
                &domain,
                Arc::new(AiQuestionGenerator::new(ai)),
                &context_path,
            )
            .await
        }
        Commands::Classify {
            url,
            domain,
            context_file,
            no_context,
        } => {
            let domain = resolve_domain(&app.store, &domain)?;
            let context_path = match (no_context, context_file) {
                (true, _) => None,
                (false, Some(path)) => Some(path),
                (false, None) => Some(context_file_path()?),
            };
            let engine = app.engine(app.ai_service().await?)?;
            commands::classify::handle_classify_command(
                &engine,
                &url,
                &domain,
                context_path.as_deref(),
            )
            .await
        }
        Commands::Session { domain } => {
            let domain = resolve_domain(&app.store, &domain)?;
            let ai = app.ai_service().await?;
            commands::session::handle_session_command(
                &app.store,
                &domain,
                Arc::new(AiQuestionGenerator::new(Arc::clone(&ai))),
                app.engine(ai)?,
                app.config.cache_size,
            )
            .await
        }
    }
}
