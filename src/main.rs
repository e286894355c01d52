mod api;
mod cli_messages;
mod config;
mod consts;
mod countdown;
mod dashboard;
mod environment;
mod events;
mod i18n;
mod logging;
mod notifications;
mod portfolio;
mod session;
mod ui;

use crate::api::{DashboardApi, Endpoints, StatusClient};
use crate::config::{Config, get_config_path};
use crate::consts::cli_consts::ENVIRONMENT_VAR;
use crate::countdown::{Interval, IntervalError};
use crate::environment::resolve_base_url;
use crate::i18n::{Language, language_prefixed_path};
use crate::session::{SessionSettings, run_headless_mode, run_tui_mode, setup_session};
use clap::{Parser, Subcommand};
use std::error::Error;
use std::path::Path;

#[derive(Parser)]
#[command(author, version, long_about = None)]
/// Command-line arguments
struct Args {
    /// Command to execute
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Open the rebalancing dashboard
    Start {
        /// Dashboard base URL, e.g. https://trader.example.com/dashboard/
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,

        /// Override the status endpoint
        #[arg(long, value_name = "URL")]
        status_url: Option<String>,

        /// Override the portfolio refresh endpoint
        #[arg(long, value_name = "URL")]
        refresh_url: Option<String>,

        /// Override the manual rebalance endpoint
        #[arg(long, value_name = "URL")]
        rebalance_url: Option<String>,

        /// Time between rebalances: seconds, `1h30m` or `D H M S`
        #[arg(long, value_name = "INTERVAL")]
        default_interval: Option<Interval>,

        /// Interface language (en, uk)
        #[arg(long, value_name = "LANGUAGE")]
        language: Option<Language>,

        /// Run without the terminal UI, printing activity to stdout
        #[arg(long, action = clap::ArgAction::SetTrue)]
        headless: bool,

        /// Enable background colors in the terminal UI
        #[arg(long, action = clap::ArgAction::SetTrue)]
        with_background: bool,
    },
    /// Save connection and display settings
    Configure {
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,

        /// Value of the dashboard's `sessionid` cookie
        #[arg(long, value_name = "SESSION_ID")]
        session_cookie: Option<String>,

        /// Value of the dashboard's `csrftoken` cookie
        #[arg(long, value_name = "TOKEN")]
        csrf_token: Option<String>,

        #[arg(long, value_name = "LANGUAGE")]
        language: Option<Language>,

        #[arg(long, value_name = "INTERVAL")]
        default_interval: Option<Interval>,
    },
    /// Switch the dashboard language for this session and remember it
    SetLanguage {
        #[arg(long, value_name = "LANGUAGE")]
        language: Language,

        /// Page to continue on after switching
        #[arg(long, value_name = "PATH", default_value = "/dashboard/")]
        next: String,
    },
    /// Clear the saved configuration.
    Logout,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    log::set_max_level(logging::get_rust_log_level().into());

    let config_path = get_config_path()?;
    let environment = std::env::var(ENVIRONMENT_VAR).ok();
    let args = Args::parse();
    match args.command {
        Command::Start {
            base_url,
            status_url,
            refresh_url,
            rebalance_url,
            default_interval,
            language,
            headless,
            with_background,
        } => {
            let config = Config::load_or_default(&config_path)
                .map_err(|e| format!("Failed to load config: {}", e))?;
            let base_url = resolve_base_url(base_url, &config, environment.as_deref());
            let endpoints = Endpoints::from_base(&base_url)?
                .with_status_url(status_url.or(config.status_url.clone()))
                .with_refresh_url(refresh_url.or(config.refresh_url.clone()))
                .with_rebalance_url(rebalance_url.or(config.rebalance_url.clone()));

            let default_interval_secs = default_interval
                .map(|interval| interval.total_secs())
                .unwrap_or(config.default_interval_secs);
            if default_interval_secs == 0 {
                return Err(IntervalError::Zero.into());
            }

            let settings = SessionSettings {
                endpoints,
                default_interval_secs,
                language: language.unwrap_or(config.language),
                session_cookie: config.session_cookie,
                csrf_token: config.csrf_token,
            };
            start(settings, headless, with_background).await
        }
        Command::Configure {
            base_url,
            session_cookie,
            csrf_token,
            language,
            default_interval,
        } => configure(
            &config_path,
            base_url,
            session_cookie,
            csrf_token,
            language,
            default_interval,
        ),
        Command::SetLanguage { language, next } => {
            set_language(&config_path, environment.as_deref(), language, &next).await
        }
        Command::Logout => {
            print_cmd_info!("Logging out", "clearing {}", config_path.display());
            Config::clear(&config_path).map_err(Into::into)
        }
    }
}

/// Starts the dashboard in TUI or headless mode.
async fn start(
    settings: SessionSettings,
    headless: bool,
    with_background: bool,
) -> Result<(), Box<dyn Error>> {
    let session = setup_session(settings)?;
    if headless {
        run_headless_mode(session).await
    } else {
        run_tui_mode(session, with_background).await
    }
}

fn configure(
    config_path: &Path,
    base_url: Option<String>,
    session_cookie: Option<String>,
    csrf_token: Option<String>,
    language: Option<Language>,
    default_interval: Option<Interval>,
) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load_or_default(config_path)
        .map_err(|e| format!("Failed to load config: {}", e))?;

    if let Some(base_url) = base_url {
        // Reject URLs the client could not use later.
        Endpoints::from_base(&base_url)?;
        config.base_url = Some(base_url);
    }
    if let Some(interval) = default_interval {
        let secs = interval.total_secs();
        if secs == 0 {
            return Err(IntervalError::Zero.into());
        }
        config.default_interval_secs = secs;
    }
    if session_cookie.is_some() {
        config.session_cookie = session_cookie;
    }
    if csrf_token.is_some() {
        config.csrf_token = csrf_token;
    }
    if let Some(language) = language {
        config.language = language;
    }

    config
        .save(config_path)
        .map_err(|e| format!("Failed to save config: {}", e))?;
    print_cmd_success!("Configuration saved", "{}", config_path.display());
    Ok(())
}

async fn set_language(
    config_path: &Path,
    environment: Option<&str>,
    language: Language,
    next: &str,
) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load_or_default(config_path)
        .map_err(|e| format!("Failed to load config: {}", e))?;
    let base_url = resolve_base_url(None, &config, environment);
    let client = StatusClient::new(Endpoints::from_base(&base_url)?)?
        .with_session_cookie(config.session_cookie.clone())
        .with_csrf_token(config.csrf_token.clone());

    if let Err(e) = client.set_language(language, next).await {
        print_cmd_error!("Failed to switch language", "{}", e);
        return Err(e.into());
    }

    config.language = language;
    config
        .save(config_path)
        .map_err(|e| format!("Failed to save config: {}", e))?;
    print_cmd_success!(
        "Language switched",
        "{}",
        language_prefixed_path(language, next)
    );
    Ok(())
}
