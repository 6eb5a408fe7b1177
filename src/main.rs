use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use prose_patcher::{CheckerClient, CheckerConfig, Debouncer, EditorSession, Issue};
use similar::{ChangeTag, TextDiff};
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Parser)]
#[command(name = "prose-patcher")]
#[command(about = "Grammar and style corrections from a remote checker", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the checker endpoint URL
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Override the text language (e.g. en-US)
    #[arg(short, long, global = true)]
    language: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a file (or stdin) and list the issues found
    Check {
        /// Input file; reads stdin when omitted
        file: Option<PathBuf>,

        /// Emit issues as JSON
        #[arg(long)]
        json: bool,
    },

    /// Apply every suggested fix
    Fix {
        /// Input file; reads stdin and writes stdout when omitted
        file: Option<PathBuf>,

        /// Show what would change without modifying the file
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Show a unified diff of the changes
        #[arg(short, long)]
        diff: bool,
    },

    /// Read lines from stdin, re-checking after each quiet interval
    Live,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    match cli.command {
        Commands::Check { file, json } => cmd_check(&config, file.as_deref(), json).await,
        Commands::Fix {
            file,
            dry_run,
            diff,
        } => cmd_fix(&config, file.as_deref(), dry_run, diff).await,
        Commands::Live => cmd_live(&config).await,
    }
}

/// Merge config file and command-line overrides.
fn resolve_config(cli: &Cli) -> Result<CheckerConfig> {
    let mut config = match &cli.config {
        Some(path) => CheckerConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => CheckerConfig::default(),
    };

    if let Some(endpoint) = &cli.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(language) = &cli.language {
        config.language = language.clone();
    }
    config.validate()?;
    Ok(config)
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
        }
        None => std::io::read_to_string(std::io::stdin().lock()).context("reading stdin"),
    }
}

async fn cmd_check(config: &CheckerConfig, file: Option<&Path>, json: bool) -> Result<()> {
    let text = read_input(file)?;
    if text.trim().is_empty() {
        println!("{}", "Nothing to check.".dimmed());
        return Ok(());
    }

    let client = CheckerClient::new(config)?;
    let report = client.check(&text).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(report.issues())?);
        return Ok(());
    }

    print_issues(&text, report.issues());
    Ok(())
}

async fn cmd_fix(
    config: &CheckerConfig,
    file: Option<&Path>,
    dry_run: bool,
    diff: bool,
) -> Result<()> {
    let text = read_input(file)?;
    let mut session = EditorSession::new(text);

    let client = CheckerClient::new(config)?;
    let report = client.check(session.text()).await?;
    let total = report.issues().len();
    session.ingest(report)?;

    let before = session.text().to_string();
    let applied = session.apply_all()?;

    if applied == 0 {
        eprintln!("{}", "Nothing to fix.".green());
        if file.is_none() {
            print!("{before}");
        }
        return Ok(());
    }

    if diff {
        print_diff(&before, session.text());
    }

    let summary = format!("Applied {applied} of {total} suggestion(s)");
    match file {
        Some(path) if !dry_run => {
            write_atomic(path, session.text())
                .with_context(|| format!("writing {}", path.display()))?;
            println!("{}", format!("{summary} to {}.", path.display()).green());
        }
        _ => {
            if !diff {
                print!("{}", session.text());
            }
            eprintln!("{}", format!("{summary}.").yellow());
        }
    }
    Ok(())
}

/// Live mode: accumulate stdin lines into the session and schedule a
/// debounced re-check after each one. A report that comes back after the
/// buffer has grown further is rejected at ingest and silently dropped.
async fn cmd_live(config: &CheckerConfig) -> Result<()> {
    let client = Arc::new(CheckerClient::new(config)?);
    let session = Arc::new(Mutex::new(EditorSession::default()));
    let mut debouncer = Debouncer::new(config.debounce());

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        {
            let mut session = session.lock().await;
            let mut text = session.text().to_string();
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(&line);
            session.replace_text(text);
        }

        let client = client.clone();
        let session = session.clone();
        debouncer.schedule(async move {
            let text = session.lock().await.text().to_string();
            if text.trim().is_empty() {
                return;
            }
            match client.check(&text).await {
                Ok(report) => {
                    let mut session = session.lock().await;
                    if let Ok(count) = session.ingest(report) {
                        eprintln!("{}", format!("{count} issue(s) outstanding.").yellow());
                    }
                }
                Err(error) => eprintln!("{}", format!("Check failed: {error}").red()),
            }
        });
    }

    // End of input: drop any pending re-check and report on the final text.
    debouncer.cancel();
    let text = session.lock().await.text().to_string();
    if text.trim().is_empty() {
        return Ok(());
    }
    let report = client.check(&text).await?;
    print_issues(&text, report.issues());
    Ok(())
}

fn print_issues(text: &str, issues: &[Issue]) {
    if issues.is_empty() {
        println!("{}", "No issues found.".green().bold());
        return;
    }

    for (index, issue) in issues.iter().enumerate() {
        let flagged: String = text
            .chars()
            .skip(issue.offset)
            .take(issue.length)
            .collect();
        println!(
            "{} {} {}",
            format!("[{index}]").bold(),
            format!("\"{flagged}\"").red(),
            issue.label().dimmed()
        );
        if !issue.message.is_empty() {
            println!("    {}", issue.message);
        }
    }
    println!("{}", format!("{} issue(s) found.", issues.len()).yellow());
}

fn print_diff(original: &str, updated: &str) {
    let diff = TextDiff::from_lines(original, updated);
    for change in diff.iter_all_changes() {
        let line = change.to_string();
        match change.tag() {
            ChangeTag::Delete => print!("{}{}", "-".red(), line.red()),
            ChangeTag::Insert => print!("{}{}", "+".green(), line.green()),
            ChangeTag::Equal => print!(" {line}"),
        }
    }
}

/// Atomic file rewrite: tempfile in the same directory, fsync, rename.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content.as_bytes())?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
