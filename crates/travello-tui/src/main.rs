//! Travello - a terminal client for the Travello account service.
//!
//! With no arguments this runs the full-screen TUI. The `login`, `logout` and
//! `whoami` subcommands do the same work from a plain shell.

mod app;
mod ui;

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use travello_core::auth::open_token_store;
use travello_core::forms::{display_name, LoginForm, ProfileView};
use travello_core::i18n::Message;
use travello_core::{
    AuthApi, AuthService, Config, HttpClient, SessionContext, SessionState, TokenStore,
};

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log files are named `travello.<date>.log`
const LOG_FILE_PREFIX: &str = "travello";
const LOG_FILE_SUFFIX: &str = "log";

const USAGE: &str = "\
Usage: travello [COMMAND]

Commands:
  (none)   Open the terminal interface
  login    Sign in from the command line
  logout   Forget the stored session
  whoami   Show who the stored session belongs to

Environment:
  TRAVELLO_SERVER_URL   API base URL override
  RUST_LOG              Log filter (default: warn)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Tui,
    Login,
    Logout,
    Whoami,
    Help,
}

impl Command {
    fn parse(args: &[String]) -> Option<Self> {
        match args {
            [] => Some(Command::Tui),
            [arg] => match arg.as_str() {
                "login" => Some(Command::Login),
                "logout" => Some(Command::Logout),
                "whoami" => Some(Command::Whoami),
                "-h" | "--help" | "help" => Some(Command::Help),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Initialize the tracing subscriber for logging.
///
/// The TUI owns the terminal, so it logs to a daily file in `log_dir`; the
/// subcommands log to stderr. Use RUST_LOG to control the level (e.g. RUST_LOG=debug).
fn init_tracing(log_dir: Option<PathBuf>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let Some(dir) = log_dir else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr))
            .with(filter)
            .init();
        return None;
    };

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .build(&dir);

    match appender {
        Ok(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .init();
            Some(guard)
        }
        Err(e) => {
            // Writing to stderr would scribble over the TUI
            eprintln!("Logging disabled: cannot open {}: {}", dir.display(), e);
            None
        }
    }
}

/// Token store, HTTP client and auth service, wired from the config
fn build_services(config: &Config) -> Result<(Arc<dyn AuthApi>, Arc<dyn TokenStore>)> {
    let store = open_token_store(config.token_backend, config.data_dir()?);
    let http = HttpClient::new(&config.api_base_url(), Arc::clone(&store))?;
    let api: Arc<dyn AuthApi> = Arc::new(AuthService::new(http));
    Ok((api, store))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = Command::parse(&args) else {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    };
    if command == Command::Help {
        println!("{}", USAGE);
        return Ok(());
    }

    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    let log_dir = match command {
        Command::Tui => config.log_dir().ok(),
        _ => None,
    };
    let _log_guard = init_tracing(log_dir);
    if let Some(e) = config_error {
        warn!(error = %e, "Failed to load config, using defaults");
    }
    info!(server = %config.api_base_url(), backend = ?config.token_backend, "Travello starting");

    let (api, store) = build_services(&config)?;

    match command {
        Command::Tui => run_tui(config, api, store).await,
        Command::Login => run_login(config, api, store).await,
        Command::Logout => {
            SessionContext::new(api, store).log_out_user();
            println!("Logged out.");
            Ok(())
        }
        Command::Whoami => run_whoami(api, store).await,
        Command::Help => Ok(()),
    }
}

// ============================================================================
// Subcommands
// ============================================================================

fn prompt_email(default: &str) -> Result<String> {
    if default.is_empty() {
        print!("Email: ");
    } else {
        print!("Email [{}]: ", default);
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input.to_string())
    }
}

async fn run_login(
    mut config: Config,
    api: Arc<dyn AuthApi>,
    store: Arc<dyn TokenStore>,
) -> Result<()> {
    let locale = config.locale;
    let session = SessionContext::new(Arc::clone(&api), store);

    let email = prompt_email(config.last_email.as_deref().unwrap_or_default())?;
    let password = rpassword::prompt_password("Password: ")?;

    let mut form = LoginForm::new(api, session.clone(), locale);
    form.email = email.clone();
    form.password = password;

    if form.submit().await.is_none() {
        let message = form.error().unwrap_or(locale.text(Message::LoginFailed));
        bail!("{}", message);
    }

    println!("{}", ProfileView::new(session, locale).greeting());

    config.last_email = Some(email);
    if let Err(e) = config.save() {
        warn!(error = %e, "Failed to save config");
    }
    Ok(())
}

async fn run_whoami(api: Arc<dyn AuthApi>, store: Arc<dyn TokenStore>) -> Result<()> {
    let session = SessionContext::new(api, store);
    match session.authenticate_user().await {
        SessionState::Authenticated(user) => {
            let email = user.email.as_deref().unwrap_or("-");
            println!("{} <{}>", display_name(Some(&user)), email);
        }
        _ => println!("not logged in"),
    }
    Ok(())
}

// ============================================================================
// Terminal interface
// ============================================================================

async fn run_tui(
    config: Config,
    api: Arc<dyn AuthApi>,
    store: Arc<dyn TokenStore>,
) -> Result<()> {
    let original_config = config.clone();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, api, store);
    app.start();

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if app.config != original_config {
        if let Err(e) = app.config.save() {
            warn!(error = %e, "Failed to save config");
        }
    }

    info!("Travello shutting down");
    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Windows reports releases too
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                if handle_input(app, key) {
                    return Ok(());
                }
            }
        }

        // Apply finished logins/signups, then expire messages and follow redirects
        app.check_background_tasks();
        app.tick();

        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
