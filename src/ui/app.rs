//! Main application state and UI loop

use crate::consts::cli_consts::ui::frame_poll;
use crate::dashboard::{Action, DashboardView};
use crate::events::Event as DashboardEvent;
use crate::i18n::Language;
use crate::ui::dashboard::state::KeyOutcome;
use crate::ui::dashboard::{DashboardState, render_dashboard};
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{Terminal, backend::Backend};
use tokio::sync::{broadcast, mpsc, watch};

/// UI configuration data grouped by concern
#[derive(Debug, Clone)]
pub struct UIConfig {
    pub with_background_color: bool,
    pub base_url: String,
    pub language: Language,
}

impl UIConfig {
    pub fn new(with_background_color: bool, base_url: String, language: Language) -> Self {
        Self {
            with_background_color,
            base_url,
            language,
        }
    }
}

/// Application state
#[derive(Debug)]
pub struct App {
    state: DashboardState,

    /// Snapshots published by the orchestrator.
    view_receiver: watch::Receiver<DashboardView>,

    /// Activity events from the orchestrator.
    event_receiver: mpsc::Receiver<DashboardEvent>,

    /// Operator input for the orchestrator.
    action_sender: mpsc::Sender<Action>,

    /// Broadcasts shutdown signal to the orchestrator.
    shutdown_sender: broadcast::Sender<()>,
}

impl App {
    pub fn new(
        view_receiver: watch::Receiver<DashboardView>,
        event_receiver: mpsc::Receiver<DashboardEvent>,
        action_sender: mpsc::Sender<Action>,
        shutdown_sender: broadcast::Sender<()>,
        ui_config: UIConfig,
    ) -> Self {
        Self {
            state: DashboardState::new(ui_config),
            view_receiver,
            event_receiver,
            action_sender,
            shutdown_sender,
        }
    }

    /// Pull everything the orchestrator produced since the last frame.
    fn sync(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            self.state.add_to_activity_log(event);
        }
        if self.view_receiver.has_changed().unwrap_or(false) {
            self.state.view = self.view_receiver.borrow_and_update().clone();
        }
    }

    fn dispatch(&self, action: Action) {
        if let Err(e) = self.action_sender.try_send(action) {
            log::warn!("dropping {:?}: {}", action, e);
        }
    }
}

/// Runs the application UI in a loop, handling key presses and rendering the dashboard.
pub async fn run<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> std::io::Result<()> {
    loop {
        app.sync();
        terminal.draw(|f| render_dashboard(f, &app.state))?;

        // Poll for key events
        if event::poll(frame_poll())? {
            if let Event::Key(key) = event::read()? {
                // Skip events that are not KeyEventKind::Press
                if key.kind == KeyEventKind::Release {
                    continue;
                }

                match app.state.handle_key(key.code) {
                    KeyOutcome::Quit => {
                        let _ = app.shutdown_sender.send(());
                        return Ok(());
                    }
                    KeyOutcome::Dispatch(action) => app.dispatch(action),
                    KeyOutcome::Handled => {}
                }
            }
        }
    }
}
