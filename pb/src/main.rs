//! Promptboard CLI entry point

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{CommandFactory, FromArgMatches};
use colored::*;
use eyre::{Context, Result, eyre};
use tracing::{debug, info};

use promptboard::cli::{Cli, Command, FilterArgs, OutputFormat, generate_after_help, get_log_path};
use promptboard::config::Config;
use promptboard::{Board, BoardStatus, EmptyState, render_text};
use promptstore::{PromptForm, SubmitOutcome, facets, import_tsv_file, write_catalog};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_path = get_log_path();
    let log_dir = log_path.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = Cli::command().after_help(generate_after_help());
    let cli = Cli::from_arg_matches(&cmd.get_matches())?;

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());

    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(source = %config.static_source, storage = ?config.storage_dir, "Promptboard loaded config");

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::List { filters, format } => {
            debug!(?filters, ?format, "main: matched List command");
            cmd_list(&config, &filters, format).await
        }
        Command::Render { filters, output } => {
            debug!(?filters, ?output, "main: matched Render command");
            cmd_render(&config, &filters, output.as_deref()).await
        }
        Command::Submit {
            title,
            school_type,
            subject,
            content,
            content_file,
            description,
        } => {
            debug!(%title, %school_type, %subject, "main: matched Submit command");
            let content = match (content, content_file) {
                (Some(content), _) => content,
                (None, Some(path)) => fs::read_to_string(&path)
                    .context(format!("Failed to read prompt text from {}", path.display()))?,
                (None, None) => String::new(),
            };
            let mut form = PromptForm {
                title,
                school_type,
                subject,
                content,
                description: description.unwrap_or_default(),
            };
            cmd_submit(&config, &mut form).await
        }
        Command::Copy { id, position, filters } => {
            debug!(?id, ?position, ?filters, "main: matched Copy command");
            cmd_copy(&config, id.as_deref(), position, &filters).await
        }
        Command::Facets { format } => {
            debug!(?format, "main: matched Facets command");
            cmd_facets(&config, format).await
        }
        Command::Import { input, output } => {
            debug!(?input, ?output, "main: matched Import command");
            cmd_import(&config, &input, output.as_deref())
        }
    }
}

/// Build the board and load it, reporting a failed load on stderr
async fn open_board(config: &Config) -> Result<Board> {
    let store = config.open_store()?;
    let renderer = config.renderer()?;
    let mut board = Board::new(store, renderer).with_feedback(config.copy_feedback());
    if let BoardStatus::Failed(message) = board.reload().await {
        eprintln!("{} {}", "✗".red(), message);
    }
    Ok(board)
}

async fn cmd_list(config: &Config, filters: &FilterArgs, format: OutputFormat) -> Result<()> {
    let mut board = open_board(config).await?;
    board.set_query(filters.to_query());
    let visible = board.visible();

    match format {
        OutputFormat::Text => {
            if visible.is_empty() {
                let empty = if board.prompts().is_empty() {
                    EmptyState::NoData
                } else {
                    EmptyState::NoMatches
                };
                println!("{}", empty.message().dimmed());
            } else {
                print!("{}", render_text(board.renderer(), &visible));
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&visible)?);
        }
        OutputFormat::Html => {
            println!("{}", board.render_list()?);
        }
    }
    Ok(())
}

async fn cmd_render(config: &Config, filters: &FilterArgs, output: Option<&Path>) -> Result<()> {
    let mut board = open_board(config).await?;
    board.set_query(filters.to_query());
    let html = board.render_page()?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).context(format!("Failed to create {}", parent.display()))?;
            }
            fs::write(path, html).context(format!("Failed to write {}", path.display()))?;
            println!("{} Wrote {}", "✓".green(), path.display());
        }
        None => print!("{}", html),
    }
    Ok(())
}

async fn cmd_submit(config: &Config, form: &mut PromptForm) -> Result<()> {
    let mut board = open_board(config).await?;
    match board.submit(form).await? {
        SubmitOutcome::Saved(record) => {
            println!("  id: {}", record.id.yellow());
        }
        SubmitOutcome::Ignored => {
            debug!("cmd_submit: form incomplete, nothing saved");
        }
    }
    Ok(())
}

async fn cmd_copy(config: &Config, id: Option<&str>, position: Option<usize>, filters: &FilterArgs) -> Result<()> {
    let mut board = open_board(config).await?;
    board.set_query(filters.to_query());

    let position = match (position, id) {
        (Some(position), _) => position,
        (None, Some(id)) => board
            .position_of(id)
            .ok_or_else(|| eyre!("No prompt with id '{}'", id))?,
        (None, None) => return Err(eyre!("Pass a prompt id or --position")),
    };
    if !board.copy(position).await? {
        return Err(eyre!("No prompt at position {}", position));
    }
    println!("{} {} #{}", "✓".green(), board.card_state(position).label(), position);
    Ok(())
}

async fn cmd_facets(config: &Config, format: OutputFormat) -> Result<()> {
    let board = open_board(config).await?;
    let facets = facets(board.prompts());
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&facets)?),
        OutputFormat::Text | OutputFormat::Html => {
            println!("{}", "School types:".bold());
            for school_type in &facets.school_types {
                println!("  {}", school_type);
            }
            println!("{}", "Subjects:".bold());
            for subject in &facets.subjects {
                println!("  {}", subject);
            }
        }
    }
    Ok(())
}

fn cmd_import(config: &Config, input: &Path, output: Option<&Path>) -> Result<()> {
    let output = match output {
        Some(path) => path.to_path_buf(),
        None if config.static_source.starts_with("http://") || config.static_source.starts_with("https://") => {
            return Err(eyre!(
                "Static source {} is a URL; pass --output to choose a file",
                config.static_source
            ));
        }
        None => PathBuf::from(&config.static_source),
    };

    let records = import_tsv_file(input, Utc::now()).context(format!("Failed to import {}", input.display()))?;
    write_catalog(&output, &records).context(format!("Failed to write {}", output.display()))?;

    info!(count = records.len(), ?output, "Imported catalog");
    println!("{} Imported {} prompts into {}", "✓".green(), records.len(), output.display());
    Ok(())
}
