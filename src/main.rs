use clap::{Parser, Subcommand};
mod config;
mod git;
mod ui;

use git::{Commit, CommitSource, GitLog};
use is_terminal::IsTerminal;
use std::path::PathBuf;
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(
    name = "commit-picker",
    version,
    about = "Pick a single git commit from an interactive list",
    long_about = "An interactive terminal picker that lists the commits of a git repository, lets you move through them with the arrow keys and prints the hash of the commit you confirm with Enter."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Repository to read commits from
    #[arg(long, short = 'C', default_value = ".")]
    repo: PathBuf,

    /// Hash of the currently selected commit (marked with a star)
    #[arg(long, short, default_value = "")]
    selected: String,

    /// Load at most this many commits
    #[arg(long, short = 'n')]
    max_count: Option<usize>,

    /// Show full commit hashes
    #[arg(long)]
    full_hash: bool,

    /// Verbose output
    #[arg(long, short)]
    verbose: bool,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive picker (default)
    Pick,
    /// Print the commit list without the interactive picker
    List {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Show or modify saved config
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the saved configuration (default)
    Show,
    /// Set a config key (max_count, full_hash)
    Set { key: String, value: String },
    /// Remove a config key
    Unset { key: String },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli) {
        eprintln!("Logging error: {e}");
        std::process::exit(1);
    }

    let result = match cli.command {
        None | Some(Commands::Pick) => handle_pick(&cli).await,
        Some(Commands::List { json }) => handle_list(&cli, json).await,
        Some(Commands::Config { ref action }) => handle_config(action.as_ref()),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Initialise the tracing subscriber when `--verbose` or `--log-file` is given.
fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    if let Some(path) = &cli.log_file {
        let file = std::fs::File::create(path)?;
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(file))
            .init();
    } else if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

/// Build the commit source from CLI flags and saved config.
fn commit_source(cli: &Cli) -> anyhow::Result<GitLog> {
    let settings = config::load_config()?.resolve(cli.max_count, cli.full_hash);
    tracing::debug!(?settings, repo = %cli.repo.display(), "Resolved settings");
    Ok(GitLog::new(&cli.repo)
        .with_max_count(settings.max_count)
        .with_full_hash(settings.full_hash))
}

/// Run the interactive picker and print the confirmed hash.
///
/// Returns `Ok(false)` when the user quit without confirming.
async fn handle_pick(cli: &Cli) -> anyhow::Result<bool> {
    if !std::io::stdin().is_terminal() {
        anyhow::bail!("The interactive picker needs a terminal; use `commit-picker list` instead");
    }

    let source = commit_source(cli)?;
    let (tx, mut rx) = mpsc::unbounded_channel();

    // Run UI in background task and handle messages in main thread
    let mut ui_task = tokio::spawn({
        let selected = cli.selected.clone();
        async move { ui::run(source, selected, tx).await }
    });

    let mut chosen: Option<String> = None;
    let mut closed = false;
    loop {
        tokio::select! {
            // Handle UI messages
            msg = rx.recv(), if !closed => {
                match msg {
                    Some(ui::PickerMessage::Selected { hash }) => {
                        tracing::info!(%hash, "Commit selected");
                        chosen = Some(hash);
                    }
                    None => closed = true,
                }
            }
            // Wait for UI task to complete
            ui_result = &mut ui_task => {
                ui_result??;
                break;
            }
        }
    }

    // The picker may have sent its message right before finishing.
    while let Ok(ui::PickerMessage::Selected { hash }) = rx.try_recv() {
        chosen = Some(hash);
    }

    match chosen {
        Some(hash) => {
            println!("{hash}");
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Print the commit list as text or JSON.
async fn handle_list(cli: &Cli, json: bool) -> anyhow::Result<bool> {
    let source = commit_source(cli)?;
    let commits = source.load_commits().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&commits)?);
    } else {
        for commit in &commits {
            println!("{}", format_commit_line(commit, &cli.selected));
        }
    }
    Ok(true)
}

/// One plain-text line per commit: selection marker, hash, tags, summary.
fn format_commit_line(commit: &Commit, selected: &str) -> String {
    let marker = if commit.hash == selected { '*' } else { ' ' };
    let tags: String = commit.tags.iter().map(|t| format!("({t}) ")).collect();
    format!("{marker} {} {tags}{}", commit.hash, commit.summary)
}

fn handle_config(action: Option<&ConfigAction>) -> anyhow::Result<bool> {
    match action {
        None | Some(ConfigAction::Show) => {
            let path = config::config_file_path()?;
            let config = config::load_config_from(&path)?;
            println!("# {}", path.display());
            print!("{}", toml::to_string_pretty(&config)?);
        }
        Some(ConfigAction::Set { key, value }) => {
            config::update_config_value(key, value)?;
            println!("Set {key} = {value}");
        }
        Some(ConfigAction::Unset { key }) => {
            config::delete_config_value(key)?;
            println!("Unset {key}");
        }
    }
    Ok(true)
}
