use anyhow::{anyhow, Context, Result};
use chrono::Local;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::cell::RefCell;
use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;
use std::{io, time::Duration};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ghwatch::{
    apply_event, render_plain, spawn_poller, ui, update, App, Command, Config, ConfigOverrides,
    FetchOrchestrator, GitHubClient, Message, ViewState,
};

const DEFAULT_LOG_FILTER: &str = "ghwatch=info";

/// Watch your open GitHub pull requests and their CI status
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Repository to watch (owner/name or GitHub URL); repeatable
    #[arg(short = 'r', long = "repo")]
    repos: Vec<String>,

    /// GitHub login whose pull requests are shown
    #[arg(short = 'u', long = "user")]
    user: Option<String>,

    /// Seconds between refresh cycles
    #[arg(long)]
    interval: Option<u64>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// GitHub REST API base URL
    #[arg(long)]
    api_base: Option<String>,

    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fetch once, print the result and exit
    #[arg(long)]
    once: bool,

    /// Write logs here instead of the cache directory
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            repositories: self.repos.clone(),
            username: self.user.clone(),
            refresh_interval_secs: self.interval,
            request_timeout_secs: self.timeout,
            api_base: self.api_base.clone(),
            config_path: self.config.clone(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli)?;

    let config = Config::load(cli.overrides()).context("Failed to load configuration")?;
    info!(
        repositories = config.repositories.len(),
        username = %config.username,
        "configuration loaded"
    );

    if cli.once {
        return run_once(config);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config.username.clone(), config.repositories.clone())
        .with_poller(spawn_poller(config));

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

/// Logs go to stderr in one-shot mode and to a file while the TUI owns the terminal
fn init_logging(cli: &Cli) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    if cli.once {
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .try_init()
            .map_err(|e| anyhow!(e));
    }

    let path = match &cli.log_file {
        Some(path) => path.clone(),
        None => dirs::cache_dir()
            .ok_or_else(|| anyhow!("Could not determine cache directory"))?
            .join("ghwatch")
            .join("ghwatch.log"),
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file = File::options()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!(e))
}

/// Run a single cycle and print the folded view state
fn run_once(config: Config) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let state = RefCell::new(ViewState::new());
    let summary = runtime.block_on(async {
        let client = GitHubClient::new(&config.token, &config.api_base, config.request_timeout)?;
        let mut orchestrator = FetchOrchestrator::from_config(client, &config);
        let summary = orchestrator
            .run_cycle(|event| apply_event(&mut state.borrow_mut(), event, &Local::now()))
            .await;
        Ok::<_, ghwatch::FetchError>(summary)
    })?;
    info!(
        pull_requests = summary.pull_requests,
        failures = summary.failures(),
        "one-shot cycle finished"
    );

    print!(
        "{}",
        render_plain(&state.borrow(), &config.username, &Local::now())
    );
    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        // Drain everything the poller has sent since the last frame
        while let Some(poller_update) = app.check_poller() {
            if let Some(cmd) = update(app, Message::Poller(poller_update), &Local::now()) {
                if handle_command(app, cmd) {
                    return Ok(());
                }
            }
        }

        // Update spinner
        if let Some(cmd) = update(app, Message::Tick, &Local::now()) {
            if handle_command(app, cmd) {
                return Ok(());
            }
        }

        terminal.draw(|f| ui(f, app))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(msg) = key_to_message(app, key.code) {
                        if let Some(cmd) = update(app, msg, &Local::now()) {
                            if handle_command(app, cmd) {
                                return Ok(());
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Handle a command returned from update; true means exit
fn handle_command(app: &mut App, cmd: Command) -> bool {
    match cmd {
        Command::Quit => true,
        Command::Refresh => {
            app.request_refresh();
            false
        }
    }
}

/// Convert a key press to a message based on current app state
fn key_to_message(app: &App, key: KeyCode) -> Option<Message> {
    // Help popup - any key dismisses
    if app.show_help_popup {
        return Some(Message::DismissHelp);
    }

    // Search mode
    if app.search_mode {
        return match key {
            KeyCode::Esc => Some(Message::ExitSearchMode { clear: true }),
            KeyCode::Enter => Some(Message::ExitSearchMode { clear: false }),
            KeyCode::Backspace => Some(Message::SearchBackspace),
            KeyCode::Char(c) => Some(Message::SearchInput(c)),
            KeyCode::Down | KeyCode::Tab => Some(Message::NextItem),
            KeyCode::Up | KeyCode::BackTab => Some(Message::PreviousItem),
            _ => None,
        };
    }

    // Normal mode
    match key {
        KeyCode::Char('q') => Some(Message::Quit),
        KeyCode::Char('/') => Some(Message::EnterSearchMode),
        KeyCode::Esc if !app.search_query.is_empty() => {
            Some(Message::ExitSearchMode { clear: true })
        }
        KeyCode::Char('j') | KeyCode::Down => Some(Message::NextItem),
        KeyCode::Char('k') | KeyCode::Up => Some(Message::PreviousItem),
        KeyCode::Char('o') | KeyCode::Enter => Some(Message::OpenSelected),
        KeyCode::Char('r') => Some(Message::Refresh),
        KeyCode::Char('?') => Some(Message::ToggleHelp),
        KeyCode::Char('g') => Some(Message::GoToTop),
        KeyCode::Char('G') => Some(Message::GoToBottom),
        _ => None,
    }
}
