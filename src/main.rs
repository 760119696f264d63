//! tcxsync CLI - model reconciliation and backup tool for .tcx documents
//!
//! Usage: tcxsync <COMMAND>
//!
//! Commands:
//!   convert  Convert component classes to named domains
//!   revert   Convert named domains back to component classes
//!   backup   Create a trusted snapshot for a document
//!   restore  Reconcile a document against its trusted snapshot
//!   list     List .tcx documents under a directory
//!   watch    Watch documents and reconcile external edits continuously

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use is_terminal::IsTerminal;

use tcxsync::error::TcxError;
use tcxsync::model::Model;
use tcxsync::snapshot::SnapshotStore;
use tcxsync::{classes_to_domains, document, domains_to_classes, list_tcx_files};

/// tcxsync - model reconciliation and backup tool for .tcx documents
#[derive(Parser, Debug)]
#[command(name = "tcxsync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output format for CI
    #[arg(long, default_value = "false")]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert component classes to named domains
    Convert {
        /// Source .tcx document (prompted when omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Class names to convert (prompted when omitted)
        #[arg(short, long, value_delimiter = ',')]
        classes: Vec<String>,

        /// Output document (prompted when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert named domains back to component classes
    Revert {
        /// Source .tcx document (prompted when omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Domain names to convert (prompted when omitted)
        #[arg(short, long, value_delimiter = ',')]
        domains: Vec<String>,

        /// Output document (prompted when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Create a trusted snapshot for a document
    Backup {
        /// Source .tcx document (prompted when omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Reconcile a document against its trusted snapshot
    Restore {
        /// Source .tcx document (prompted when omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// List .tcx documents under a directory
    List {
        /// Directory to search
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },

    /// Watch documents and reconcile external edits continuously
    Watch {
        /// Directory to watch
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert { file, classes, output } => {
            cmd_convert(file, classes, output, cli.json)
        }
        Commands::Revert { file, domains, output } => cmd_revert(file, domains, output, cli.json),
        Commands::Backup { file } => cmd_backup(file, cli.json),
        Commands::Restore { file } => cmd_restore(file, cli.json),
        Commands::List { dir } => cmd_list(&dir, cli.json),
        Commands::Watch { dir } => cmd_watch(&dir, cli.json),
    }
}

fn cmd_convert(
    file: Option<PathBuf>,
    classes: Vec<String>,
    output: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let file = resolve_file(file, "Select a file:")?;
    let text = std::fs::read_to_string(&file)?;
    let doc = document::decode(&file, &text)?;

    let available: Vec<String> = doc
        .model
        .component_classes
        .iter()
        .map(|c| c.name.clone())
        .collect();
    let selected = resolve_selection(classes, &available, "Select classes to convert:")?;

    let named_domains = classes_to_domains(&doc.model.component_classes, &selected);

    let output = resolve_output(output)?;
    write_new_document(
        &output,
        &Model {
            named_domains,
            ..Model::default()
        },
    )?;

    if json {
        let event = serde_json::json!({
            "event": "convert",
            "file": file.display().to_string(),
            "output": output.display().to_string(),
            "selected": selected,
        });
        println!("{}", serde_json::to_string(&event)?);
    } else {
        println!("✓ {} was created", output.display());
    }

    Ok(())
}

fn cmd_revert(
    file: Option<PathBuf>,
    domains: Vec<String>,
    output: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let file = resolve_file(file, "Select a file:")?;
    let text = std::fs::read_to_string(&file)?;
    let doc = document::decode(&file, &text)?;

    let available: Vec<String> = doc
        .model
        .named_domains
        .iter()
        .map(|d| d.name.clone())
        .collect();
    let selected = resolve_selection(domains, &available, "Select domains to convert:")?;

    let component_classes = domains_to_classes(&doc.model.named_domains, &selected);

    let output = resolve_output(output)?;
    write_new_document(
        &output,
        &Model {
            component_classes,
            ..Model::default()
        },
    )?;

    if json {
        let event = serde_json::json!({
            "event": "revert",
            "file": file.display().to_string(),
            "output": output.display().to_string(),
            "selected": selected,
        });
        println!("{}", serde_json::to_string(&event)?);
    } else {
        println!("✓ {} was created", output.display());
    }

    Ok(())
}

fn cmd_backup(file: Option<PathBuf>, json: bool) -> Result<()> {
    let file = resolve_file(file, "Select a file to back up:")?;
    let store = SnapshotStore::default();
    store.create(&file)?;

    let backup = tcxsync::snapshot_path(&file);
    if json {
        let event = serde_json::json!({
            "event": "backup",
            "file": file.display().to_string(),
            "backup": backup.display().to_string(),
        });
        println!("{}", serde_json::to_string(&event)?);
    } else {
        println!("✓ {} was created", backup.display());
    }

    Ok(())
}

fn cmd_restore(file: Option<PathBuf>, json: bool) -> Result<()> {
    let file = resolve_file(file, "Select a file to restore:")?;
    let store = SnapshotStore::default();
    store.restore(&file)?;

    if json {
        let event = serde_json::json!({
            "event": "restore",
            "file": file.display().to_string(),
        });
        println!("{}", serde_json::to_string(&event)?);
    } else {
        println!("✓ {} was restored", file.display());
    }

    Ok(())
}

fn cmd_list(dir: &Path, json: bool) -> Result<()> {
    let files = list_tcx_files(dir);

    if json {
        for file in &files {
            let event = serde_json::json!({
                "event": "document",
                "path": file.display().to_string(),
            });
            println!("{}", serde_json::to_string(&event)?);
        }
    } else {
        println!("Found {} documents:", files.len());
        for file in &files {
            println!("  - {}", file.display());
        }
    }

    Ok(())
}

fn cmd_watch(dir: &Path, json: bool) -> Result<()> {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tcxsync::watcher::{watch, WatchEvent, WatchOptions};

    let options = WatchOptions {
        root: dir.to_path_buf(),
        json,
    };

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();

    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })?;

    if !json {
        println!("👀 Watching: {}", dir.display());
        println!("Press Ctrl+C to stop\n");
    }

    watch(options, running, |event| {
        if json {
            println!("{}", event.to_json());
        } else {
            match event {
                WatchEvent::WatchStarted { root } => {
                    println!("📂 Tracking documents under: {}", root);
                }
                WatchEvent::SnapshotCreated { path } => {
                    println!("✓ Snapshot created: {}", path);
                }
                WatchEvent::FileChanged { path } => {
                    println!("📝 Changed: {}", path);
                }
                WatchEvent::SnapshotRefreshed { path } => {
                    println!("✓ Trusted edit, snapshot refreshed: {}", path);
                }
                WatchEvent::Restored { path, editor } => {
                    println!("♻ Untrusted edit ({}), restored: {}", editor, path);
                }
                WatchEvent::Ignored { path } => {
                    println!("− Unknown editor, left as-is: {}", path);
                }
                WatchEvent::Error { message } => {
                    eprintln!("✗ Error: {}", message);
                }
                WatchEvent::Shutdown => {
                    println!("\n👋 Shutting down...");
                }
            }
        }
    })?;

    Ok(())
}

// === Prompt helpers (interactive collaborators, not engine logic) ===

fn resolve_file(file: Option<PathBuf>, prompt: &str) -> Result<PathBuf> {
    if let Some(file) = file {
        return Ok(file);
    }

    if !std::io::stdin().is_terminal() {
        anyhow::bail!("no file given - pass --file when not running interactively");
    }

    let files = list_tcx_files(Path::new("."));
    if files.is_empty() {
        anyhow::bail!("no .tcx documents found in the current directory");
    }

    let items: Vec<String> = files.iter().map(|f| f.display().to_string()).collect();
    let selection = dialoguer::Select::new()
        .with_prompt(prompt)
        .items(&items)
        .default(0)
        .interact()?;

    Ok(files[selection].clone())
}

/// Validate or prompt for a selection; an empty result is an error here,
/// never inside the transformer
fn resolve_selection(given: Vec<String>, available: &[String], prompt: &str) -> Result<Vec<String>> {
    if !given.is_empty() {
        return Ok(given);
    }

    if !std::io::stdin().is_terminal() {
        return Err(TcxError::EmptySelection.into());
    }

    if available.is_empty() {
        return Err(TcxError::EmptySelection.into());
    }

    let chosen = dialoguer::MultiSelect::new()
        .with_prompt(prompt)
        .items(available)
        .interact()?;

    if chosen.is_empty() {
        return Err(TcxError::EmptySelection.into());
    }

    Ok(chosen.into_iter().map(|i| available[i].clone()).collect())
}

fn resolve_output(output: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(output) = output {
        return Ok(output);
    }

    if !std::io::stdin().is_terminal() {
        anyhow::bail!("no output file given - pass --output when not running interactively");
    }

    let name: String = dialoguer::Input::new()
        .with_prompt("Enter file name")
        .validate_with(|input: &String| {
            if input.trim().is_empty() {
                Err("Error: no file name entered")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    Ok(PathBuf::from(name))
}

/// Write a converted document; refuses to overwrite an existing file
fn write_new_document(output: &Path, model: &Model) -> Result<()> {
    if output.exists() {
        anyhow::bail!("{} already exists", output.display());
    }
    let text = document::encode(model)?;
    std::fs::write(output, text)?;
    Ok(())
}
