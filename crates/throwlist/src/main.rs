//! CLI entry point for throwlist.

use std::path::PathBuf;

use anyhow::{Context, Result, ensure};
use clap::{Parser, Subcommand, ValueEnum};
use throwlist_app::{AppConfig, TaskService};
use throwlist_core::{DateOnly, ThrowAction, View};
use throwlist_store_json::JsonStore;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod commands;

/// Today, Future and Removed task lists with bulk throw-forward.
#[derive(Parser, Debug)]
#[command(
    name = "throwlist",
    version,
    about = "throwlist: a personal task list you can throw forward"
)]
struct Cli {
    /// Task store file (overrides `store_path` from the config file).
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Owner whose tasks are shown and changed.
    #[arg(long, global = true)]
    owner: Option<String>,

    /// Reference date as YYYY-MM-DD (defaults to today's local date).
    #[arg(long, global = true)]
    date: Option<DateOnly>,

    /// Config file (defaults to `<config dir>/throwlist/config.toml`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a task, due on the reference date unless `--due` is given.
    Add {
        title: String,
        /// Priority band, 1 (highest) to 24 (lowest).
        #[arg(long, allow_hyphen_values = true)]
        band: Option<i64>,
        /// Due date as YYYY-MM-DD (defaults to the reference date).
        #[arg(long)]
        due: Option<String>,
    },

    /// List tasks of one view.
    Ls {
        #[arg(value_enum, default_value_t = LsView::Today)]
        view: LsView,
    },

    /// Push a Today task to tomorrow.
    Advance { id: String },

    /// Mark a Today task done for the reference date.
    Done { id: String },

    /// Remove a task without counting it as thrown.
    Rm { id: String },

    /// Throw several Today tasks at once.
    Throw {
        #[arg(required = true)]
        ids: Vec<String>,
        /// Days (1, 2, 7, 30, 90, 365), `complete`, `remove` or `swipe`.
        #[arg(long)]
        by: ThrowAction,
    },

    /// Bring Future or Removed tasks back to the reference date.
    Restore {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Move a Today task to a position in the Today list.
    Move {
        id: String,
        #[arg(allow_hyphen_values = true)]
        index: i64,
    },

    /// Move a Today task to the end of a band.
    Band {
        id: String,
        #[arg(allow_hyphen_values = true)]
        band: i64,
    },
}

/// Which part of the board `ls` prints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LsView {
    Today,
    Future,
    Removed,
    All,
}

impl LsView {
    fn views(self) -> &'static [View] {
        match self {
            Self::Today => &[View::Today],
            Self::Future => &[View::Future],
            Self::Removed => &[View::Removed],
            Self::All => &[View::Today, View::Future, View::Removed],
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    install_tracing();

    let config = load_config(&cli)?;
    let store_path = resolve_store_path(&cli, &config)?;
    let reference = cli.date.unwrap_or_else(DateOnly::today);
    debug!(store = %store_path.display(), owner = %config.owner, %reference, "Starting");

    let store = JsonStore::open(&store_path)
        .with_context(|| format!("failed to open task store {}", store_path.display()))?;
    let service = TaskService::new(store, &config);
    commands::run(cli.cmd, &service, reference, &mut std::io::stdout().lock())
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match (&cli.config, dirs::config_dir()) {
        (Some(path), _) => AppConfig::from_file(path)?,
        (None, Some(dir)) => AppConfig::from_config_dir(dir)?,
        (None, None) => AppConfig::default(),
    };
    if let Some(owner) = &cli.owner {
        ensure!(!owner.trim().is_empty(), "--owner must not be empty");
        config.owner = owner.trim().to_owned();
    }
    Ok(config)
}

fn resolve_store_path(cli: &Cli, config: &AppConfig) -> Result<PathBuf> {
    if let Some(path) = cli.store.clone().or_else(|| config.store_path.clone()) {
        return Ok(path);
    }
    let data_dir = dirs::data_dir().context("Could not determine data directory; pass --store")?;
    Ok(config.store_path_or(&data_dir))
}

fn install_tracing() {
    // RUST_LOG overrides the default INFO level.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .compact()
        .try_init();
}
