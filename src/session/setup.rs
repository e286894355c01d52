//! Session setup and initialization

use crate::api::{DashboardApi, Endpoints, StatusClient};
use crate::consts::cli_consts::{ACTION_QUEUE_SIZE, EVENT_QUEUE_SIZE, INBOX_QUEUE_SIZE};
use crate::dashboard::{Action, Dashboard, DashboardConfig, DashboardView};
use crate::events::{Event, EventSender};
use crate::i18n::Language;
use std::error::Error;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;

/// Everything needed to talk to one dashboard server.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub endpoints: Endpoints,
    pub default_interval_secs: u64,
    pub language: Language,
    pub session_cookie: Option<String>,
    pub csrf_token: Option<String>,
}

/// Session data for both TUI and headless modes
#[derive(Debug)]
pub struct SessionData {
    /// Activity events from the orchestrator
    pub event_receiver: mpsc::Receiver<Event>,
    /// Latest dashboard snapshot
    pub view_receiver: watch::Receiver<DashboardView>,
    /// Operator input into the orchestrator
    pub action_sender: mpsc::Sender<Action>,
    /// Join handle of the orchestrator task
    pub join_handles: Vec<JoinHandle<()>>,
    /// Shutdown sender to stop the orchestrator
    pub shutdown_sender: broadcast::Sender<()>,
    pub base_url: String,
    pub language: Language,
}

/// Builds the HTTP client and spawns the dashboard orchestrator.
///
/// # Returns
/// * `Ok(SessionData)` - Orchestrator running, channels ready for a front end
/// * `Err` - The HTTP client could not be built
pub fn setup_session(settings: SessionSettings) -> Result<SessionData, Box<dyn Error>> {
    let client = StatusClient::new(settings.endpoints)?
        .with_session_cookie(settings.session_cookie)
        .with_csrf_token(settings.csrf_token);
    let base_url = client.endpoints().base_url.clone();

    Ok(spawn_dashboard(
        Arc::new(client),
        base_url,
        settings.default_interval_secs,
        settings.language,
    ))
}

fn spawn_dashboard(
    api: Arc<dyn DashboardApi>,
    base_url: String,
    default_interval_secs: u64,
    language: Language,
) -> SessionData {
    let (event_sender, event_receiver) = mpsc::channel::<Event>(EVENT_QUEUE_SIZE);
    let (inbox_sender, inbox_receiver) = mpsc::channel(INBOX_QUEUE_SIZE);
    let (action_sender, action_receiver) = mpsc::channel(ACTION_QUEUE_SIZE);
    let (view_sender, view_receiver) = watch::channel(DashboardView::default());
    let (shutdown_sender, _) = broadcast::channel(1);

    let dashboard = Dashboard::new(
        api,
        DashboardConfig {
            default_interval_secs,
            language,
        },
        inbox_sender,
        EventSender::new(event_sender),
        view_sender,
    );
    let handle = tokio::spawn(dashboard.run(
        inbox_receiver,
        action_receiver,
        shutdown_sender.subscribe(),
    ));

    SessionData {
        event_receiver,
        view_receiver,
        action_sender,
        join_handles: vec![handle],
        shutdown_sender,
        base_url,
        language,
    }
}
