//! Mnada TUI - a terminal client for the Mnada auction house.
//!
//! This application provides a keyboard-driven interface for signing in,
//! registering, and working the admin, auctioneer and client dashboards.

mod app;
mod ui;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mnada_core::api::ApiClient;
use mnada_core::auth::flow::{self, LOGIN_FALLBACK};
use mnada_core::auth::{CredentialStore, MemoryCredentialStore};
use mnada_core::config::Config;
use mnada_core::SessionGate;

use app::{App, AppState, PASSWORD_ENV, USERNAME_ENV};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file name prefix; the appender adds the date.
const LOG_FILE_PREFIX: &str = "mnada.log";

/// Command-line options
#[derive(Debug, Default)]
struct Options {
    whoami: bool,
    logout: bool,
    login: bool,
    ephemeral: bool,
}

impl Options {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut options = Options::default();
        for arg in args {
            match arg.as_str() {
                "--whoami" => options.whoami = true,
                "--logout" => options.logout = true,
                "--login" => options.login = true,
                "--ephemeral" => options.ephemeral = true,
                other => anyhow::bail!(
                    "Unknown argument: {other}\nUsage: mnada [--ephemeral] [--whoami | --logout | --login]"
                ),
            }
        }
        Ok(options)
    }
}

/// Initialize the tracing subscriber, writing to a daily log file so the
/// terminal UI is not disturbed.
fn init_tracing(log_dir: &Path) -> WorkerGuard {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();
    guard
}

fn log_dir(config: &Config) -> PathBuf {
    let dir = config
        .data_dir()
        .unwrap_or_else(|_| std::env::temp_dir().join("mnada"));
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("Warning: could not create log directory {}: {}", dir.display(), e);
    }
    dir
}

fn open_store(config: &Config, ephemeral: bool) -> Result<Box<dyn CredentialStore + Send>> {
    if ephemeral {
        return Ok(Box::new(MemoryCredentialStore::new()));
    }
    config.credential_store()
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let options = Options::parse(std::env::args().skip(1))?;
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config ({e}), using defaults");
            Config::default()
        }
    };

    let _guard = init_tracing(&log_dir(&config));
    info!("Mnada TUI starting");

    let store = open_store(&config, options.ephemeral)?;

    if options.whoami {
        let gate = SessionGate::initialize(store);
        println!("{}", gate.current_role().display_name());
        return Ok(());
    }
    if options.logout {
        let mut gate = SessionGate::initialize(store);
        gate.logout();
        println!("Signed out.");
        return Ok(());
    }
    if options.login {
        return login_interactive(config, store, options.ephemeral).await;
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = match App::new(store, !options.ephemeral) {
        Ok(mut app) => run_app(&mut terminal, &mut app).await,
        Err(e) => Err(e),
    };

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("Mnada TUI shutting down");
    Ok(())
}

/// Sign in from the command line and store the session.
async fn login_interactive(
    mut config: Config,
    store: Box<dyn CredentialStore + Send>,
    ephemeral: bool,
) -> Result<()> {
    let mut gate = SessionGate::initialize(store);
    if gate.session().is_authenticated() {
        println!(
            "Already signed in as {}. Run with --logout first.",
            gate.current_role().display_name()
        );
        return Ok(());
    }

    println!("\n=== Mnada Login ===\n");

    let username = match std::env::var(USERNAME_ENV) {
        Ok(username) => username,
        Err(_) => prompt_username(config.last_username.as_deref())?,
    };
    let password = match std::env::var(PASSWORD_ENV) {
        Ok(password) => password,
        Err(_) => rpassword::prompt_password("Password: ")
            .context("Failed to read password")?,
    };

    println!("\nAuthenticating...");

    let api = ApiClient::new(&config.api_base_url())?;
    match flow::sign_in(&api, &mut gate, &username, &password).await {
        Ok(role) => {
            config.last_username = Some(username.trim().to_string());
            if !ephemeral {
                config.save()?;
            }
            println!("Signed in as {}.\n", role.display_name());
            Ok(())
        }
        Err(e) => {
            anyhow::bail!(e.user_message(LOGIN_FALLBACK))
        }
    }
}

fn prompt_username(last: Option<&str>) -> Result<String> {
    match last {
        Some(last) => print!("Username [{}]: ", last),
        None => print!("Username: "),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    Ok(match (input.is_empty(), last) {
        (true, Some(last)) => last.to_string(),
        _ => input.to_string(),
    })
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                if handle_input(app, key)? {
                    return Ok(());
                }
            }
        }

        // Check for completed background tasks
        app.check_background_tasks();

        // Check if we should quit
        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_options() {
        let options = Options::parse(args(&["--ephemeral", "--whoami"])).unwrap();
        assert!(options.ephemeral);
        assert!(options.whoami);
        assert!(!options.login);

        assert!(!Options::parse(args(&[])).unwrap().ephemeral);
        assert!(Options::parse(args(&["--bogus"])).is_err());
    }
}
