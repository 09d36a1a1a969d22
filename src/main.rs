use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

mod cli;

use cli::Cli;
use cli::commands::Commands;
use redator::config::Config;
use redator::domain::UserId;
use redator::editor::{Editor, EditorModels};
use redator::format::{build_document, render_docx};
use redator::llm::{CompletionProvider, OpenRouterClient};
use redator::prompt::ConsolidationStyle;
use redator::server::{self, ServerState};
use redator::session::JwtSessionAuthority;
use redator::storage::{JsonlStorage, TopicStore};
use redator::workspace::Workspace;

fn setup_logging(verbose: bool, config: &Config) -> Result<()> {
    let default_level = config.log_level.clone().unwrap_or_else(|| "info".to_string());
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level));

    if verbose {
        builder.target(env_logger::Target::Stderr).init();
        return Ok(());
    }

    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("redator")
        .join("logs");
    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("redator.log");
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );
    builder.target(env_logger::Target::Pipe(target)).init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn open_storage(config: &Config) -> Result<Arc<JsonlStorage>> {
    let storage = JsonlStorage::new(&config.storage.data_dir)
        .context(format!("Failed to open data dir {}", config.storage.data_dir.display()))?;
    Ok(Arc::new(storage))
}

fn provider(config: &Config) -> Result<Arc<dyn CompletionProvider>> {
    let client = OpenRouterClient::from_env(&config.llm.api_key_env, config.llm.openrouter())
        .context("Failed to create completion client")?;
    Ok(Arc::new(client))
}

fn sessions(config: &Config) -> Result<JwtSessionAuthority> {
    JwtSessionAuthority::from_env(&config.session.secret_env, config.session.ttl_secs)
        .context("Failed to create session authority")
}

fn editor(config: &Config) -> Result<Editor<JsonlStorage>> {
    let store = TopicStore::new(open_storage(config)?);
    let models = EditorModels {
        verify: config.llm.verify_model.clone(),
        consolidate: config.llm.consolidate_model.clone(),
    };
    Editor::new(store, provider(config)?, models).context("Failed to create editor")
}

async fn run_application(cli: Cli, mut config: Config) -> Result<()> {
    info!("Starting application");

    match cli.command {
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            handle_serve(config).await
        }
        Commands::Token { user } => handle_token(&user, &config),
        Commands::Topics { user } => handle_topics(&user, &config),
        Commands::Verify { user, topic } => handle_verify(&user, &topic, &config).await,
        Commands::Consolidate {
            user,
            topic,
            docx,
            style,
        } => handle_consolidate(&user, &topic, docx.as_deref(), style.map(Into::into), &config).await,
    }
}

async fn handle_serve(config: Config) -> Result<()> {
    println!("{} {}", "Serving on".green(), config.server.bind);
    let storage = open_storage(&config)?;
    let provider = provider(&config)?;
    let sessions = Arc::new(sessions(&config)?);

    let state = ServerState::new(storage, provider, sessions, config).context("Failed to build server state")?;
    server::serve(state).await.context("Server failed")?;
    Ok(())
}

fn handle_token(user: &str, config: &Config) -> Result<()> {
    let token = sessions(config)?.issue(&UserId::new(user)).context("Failed to issue token")?;
    println!("{}", token);
    Ok(())
}

fn handle_topics(user: &str, config: &Config) -> Result<()> {
    let workspace = Workspace::new(TopicStore::new(open_storage(config)?));
    let topics = workspace.list_topics(&UserId::new(user))?;

    if topics.is_empty() {
        println!("{}", "No topics".yellow());
        return Ok(());
    }
    for topic in topics {
        println!("{}  {}  {}", topic.id.cyan(), topic.created_at.dimmed(), topic.title);
    }
    Ok(())
}

async fn handle_verify(user: &str, topic_id: &str, config: &Config) -> Result<()> {
    let (topic, report) = editor(config)?.verify(&UserId::new(user), topic_id).await?;

    println!("{} {}", "Topic:".bold(), topic.title);
    let status = if report.is_approved() {
        report.status.green()
    } else {
        report.status.yellow()
    };
    println!("{} {}", "Status:".bold(), status);
    println!("\n{}\n{}", "Análise".bold(), report.analysis);
    println!("\n{}\n{}", "Sugestão".bold(), report.suggestion_or_placeholder());
    Ok(())
}

async fn handle_consolidate(
    user: &str,
    topic_id: &str,
    docx: Option<&Path>,
    style: Option<ConsolidationStyle>,
    config: &Config,
) -> Result<()> {
    let editor = editor(config)?;
    let user = UserId::new(user);

    match docx {
        None => {
            let style = style.unwrap_or(ConsolidationStyle::Classic);
            let result = editor.consolidate(&user, topic_id, style).await?;
            println!("{}", result.text);
        }
        Some(path) => {
            let style = style.unwrap_or(ConsolidationStyle::Extended);
            let result = editor.consolidate(&user, topic_id, style).await?;
            let document = build_document(
                config.document.title_for(&result.topic.title),
                &result.text,
                &config.document.layout(),
            );
            let bytes = render_docx(&document)?;
            fs::write(path, bytes).context(format!("Failed to write {}", path.display()))?;
            println!("{} {}", "Wrote".green(), path.display());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(cli.is_verbose(), &config).context("Failed to setup logging")?;
    info!("Starting with config from: {:?}", cli.config);

    run_application(cli, config).await.context("Application failed")?;

    Ok(())
}
