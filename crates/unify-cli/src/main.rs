//! unify: command-line front end for the device-local document vault.
//!
//! Every command prints JSON on stdout; logs go to stderr (or `LOG_FILE`).

mod config;

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use unify_core::{defaults, parse_id, suggested_name, DocumentCategory, StoredDocument};
use unify_vault::{DocumentVault, FilesystemSlotStore, LocalFile};
use uuid::Uuid;

use crate::config::{CliConfig, LogFormat};

#[derive(Parser)]
#[command(name = "unify")]
#[command(author, version, about = "Keep copies of your important documents on this device")]
#[command(propagate_version = true)]
struct Cli {
    /// Data directory (overrides UNIFY_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List stored documents, newest first
    List {
        /// Only show documents in this category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Store a copy of a file
    Add {
        /// Image or PDF to store
        path: PathBuf,

        /// Display name (default: file name up to the first '.')
        #[arg(short, long)]
        name: Option<String>,

        /// Category (English name or Portuguese label)
        #[arg(short, long, default_value = "Identification")]
        category: String,
    },

    /// Write a stored document back to disk
    Export {
        /// Document id
        id: String,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Delete a stored document (cannot be undone)
    Delete {
        /// Document id
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show the available categories
    Categories,
}

/// Listing view of a document; the payload itself is never printed.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DocumentSummary<'a> {
    id: Uuid,
    name: &'a str,
    category: DocumentCategory,
    category_label: &'static str,
    date: &'a str,
    mime_type: &'a str,
    is_image: bool,
}

impl<'a> From<&'a StoredDocument> for DocumentSummary<'a> {
    fn from(doc: &'a StoredDocument) -> Self {
        Self {
            id: doc.id,
            name: &doc.name,
            category: doc.category,
            category_label: doc.category.label_pt(),
            date: &doc.date,
            mime_type: &doc.mime_type,
            is_image: doc.is_image(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = match CliConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(dir) = cli.data_dir.clone() {
        config.data_dir = dir;
    }

    let _log_guard = init_tracing(&config);

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Install the tracing subscriber. Returns the file appender guard, which must
/// live until exit so buffered lines are flushed.
fn init_tracing(config: &CliConfig) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| defaults::LOG_FILTER.into());
    let registry = tracing_subscriber::registry().with(env_filter);

    let guard = if let Some(ref path) = config.log_file {
        let file_dir = path.parent().unwrap_or(Path::new("."));
        let file_name = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("unify.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        match config.log_format {
            LogFormat::Json => registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(non_blocking))
                .init(),
            LogFormat::Text => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false),
                )
                .init(),
        }
        Some(guard)
    } else {
        match config.log_format {
            LogFormat::Json => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init(),
            LogFormat::Text => registry
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init(),
        }
        None
    };

    info!(
        subsystem = "cli",
        log_format = ?config.log_format,
        log_file = config.log_file.as_ref().map(|p| p.display().to_string()).as_deref().unwrap_or("(stderr)"),
        "Logging initialized"
    );
    guard
}

async fn run(command: Commands, config: &CliConfig) -> anyhow::Result<()> {
    let store = FilesystemSlotStore::new(&config.data_dir);

    match command {
        Commands::List { category } => {
            let vault = DocumentVault::open(store, config.vault_config());
            cmd_list(&vault, category.as_deref())
        }
        Commands::Add {
            path,
            name,
            category,
        } => {
            store
                .validate()
                .with_context(|| format!("data directory {} is not usable", config.data_dir.display()))?;
            let mut vault = DocumentVault::open(store, config.vault_config());
            cmd_add(&mut vault, &path, name.as_deref(), &category).await
        }
        Commands::Export { id, output } => {
            let vault = DocumentVault::open(store, config.vault_config());
            cmd_export(&vault, &id, &output)
        }
        Commands::Delete { id, yes } => {
            store
                .validate()
                .with_context(|| format!("data directory {} is not usable", config.data_dir.display()))?;
            let mut vault = DocumentVault::open(store, config.vault_config());
            cmd_delete(&mut vault, &id, yes)
        }
        Commands::Categories => cmd_categories(),
    }
}

fn parse_category(input: &str) -> anyhow::Result<DocumentCategory> {
    input.parse::<DocumentCategory>().map_err(|e| anyhow!(e))
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_list(vault: &DocumentVault<FilesystemSlotStore>, category: Option<&str>) -> anyhow::Result<()> {
    let documents: Vec<DocumentSummary> = match category {
        Some(c) => vault
            .list_by_category(parse_category(c)?)
            .into_iter()
            .map(DocumentSummary::from)
            .collect(),
        None => vault.list().iter().map(DocumentSummary::from).collect(),
    };
    print_json(&documents)
}

async fn cmd_add(
    vault: &mut DocumentVault<FilesystemSlotStore>,
    path: &Path,
    name: Option<&str>,
    category: &str,
) -> anyhow::Result<()> {
    let category = parse_category(category)?;
    let source = LocalFile::new(path);

    let name = match name {
        Some(n) => n.to_string(),
        None => source
            .file_name()
            .and_then(suggested_name)
            .ok_or_else(|| anyhow!("cannot derive a name from {}; pass --name", path.display()))?,
    };

    let document = vault.add(&source, &name, category).await?;
    print_json(&DocumentSummary::from(&document))
}

fn cmd_export(
    vault: &DocumentVault<FilesystemSlotStore>,
    id: &str,
    output_dir: &Path,
) -> anyhow::Result<()> {
    let id = parse_id(id)?;
    let exported = vault.export(id)?;

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("cannot create {}", output_dir.display()))?;
    let path = output_dir.join(&exported.filename);
    std::fs::write(&path, &exported.bytes)
        .with_context(|| format!("cannot write {}", path.display()))?;

    print_json(&serde_json::json!({
        "id": id,
        "path": path.to_string_lossy(),
        "mimeType": exported.mime_type,
        "bytes": exported.bytes.len(),
    }))
}

fn cmd_delete(
    vault: &mut DocumentVault<FilesystemSlotStore>,
    id: &str,
    yes: bool,
) -> anyhow::Result<()> {
    let id = parse_id(id)?;
    let token = vault.request_delete(id);

    if !yes {
        let label = vault
            .get(id)
            .map(|d| d.name.clone())
            .unwrap_or_else(|| id.to_string());
        if !confirm(&format!("Delete \"{}\"? This cannot be undone. [y/N] ", label))? {
            vault.cancel_delete(&token);
            return print_json(&serde_json::json!({ "id": id, "deleted": false, "cancelled": true }));
        }
    }

    let deleted = vault.confirm_delete(token)?;
    print_json(&serde_json::json!({ "id": id, "deleted": deleted }))
}

fn cmd_categories() -> anyhow::Result<()> {
    let categories: Vec<_> = DocumentCategory::ALL
        .iter()
        .map(|c| serde_json::json!({ "name": c.as_str(), "label": c.label_pt() }))
        .collect();
    print_json(&categories)
}

/// Ask a yes/no question on stderr and read the answer from stdin.
fn confirm(prompt: &str) -> anyhow::Result<bool> {
    let mut stderr = std::io::stderr();
    write!(stderr, "{}", prompt)?;
    stderr.flush()?;

    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer)? == 0 {
        bail!("no answer on stdin; pass --yes to delete without confirmation");
    }
    Ok(is_affirmative(&answer))
}

fn is_affirmative(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "s" | "sim"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_add() {
        let cli = Cli::try_parse_from([
            "unify", "add", "passport.jpg", "--name", "Passport", "--category", "Saúde",
        ])
        .unwrap();
        match cli.command {
            Commands::Add {
                path,
                name,
                category,
            } => {
                assert_eq!(path, PathBuf::from("passport.jpg"));
                assert_eq!(name.as_deref(), Some("Passport"));
                assert_eq!(parse_category(&category).unwrap(), DocumentCategory::Health);
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_cli_global_data_dir() {
        let cli = Cli::try_parse_from(["unify", "list", "--data-dir", "/tmp/v"]).unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/v")));
    }

    #[test]
    fn test_unknown_category_is_error() {
        assert!(parse_category("Pets").is_err());
    }

    #[test]
    fn test_affirmative_answers() {
        assert!(is_affirmative("y\n"));
        assert!(is_affirmative(" Sim "));
        assert!(!is_affirmative("\n"));
        assert!(!is_affirmative("no"));
    }

    #[test]
    fn test_summary_omits_payload() {
        let doc = StoredDocument {
            id: Uuid::nil(),
            name: "Payslip".to_string(),
            category: DocumentCategory::Work,
            date: "16/10/2026".to_string(),
            mime_type: "application/pdf".to_string(),
            data: unify_core::data_uri::encode("application/pdf", b"%PDF"),
        };
        let json = serde_json::to_value(DocumentSummary::from(&doc)).unwrap();
        assert!(json.get("data").is_none());
        assert_eq!(json["categoryLabel"], "Trabalho");
        assert_eq!(json["isImage"], false);
    }

    #[tokio::test]
    async fn test_add_export_delete_flow() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("lease.pdf");
        std::fs::write(&source, b"%PDF-1.7\n").unwrap();

        let store = FilesystemSlotStore::new(tmp.path().join("data"));
        let mut vault = DocumentVault::with_defaults(store);
        cmd_add(&mut vault, &source, None, "Housing").await.unwrap();

        let doc = vault.list()[0].clone();
        assert_eq!(doc.name, "lease");

        let out = tmp.path().join("out");
        cmd_export(&vault, &doc.id.to_string(), &out).unwrap();
        assert_eq!(std::fs::read(out.join("lease.pdf")).unwrap(), b"%PDF-1.7\n");

        cmd_delete(&mut vault, &doc.id.to_string(), true).unwrap();
        assert!(vault.is_empty());
    }
}
