//! Dashboard orchestrator
//!
//! A single task owns every piece of dashboard state. The tick and poll
//! sources, and every network call it spawns, report back through the inbox;
//! user input arrives on a separate action channel. After each message or
//! action a fresh [`DashboardView`] is published on a watch channel.

pub mod view;

pub use view::DashboardView;

use crate::api::DashboardApi;
use crate::api::error::ApiError;
use crate::api::error_handler::ErrorHandler;
use crate::api::types::{PortfolioSnapshot, RebalanceResponse, RefreshResponse, StatusResponse};
use crate::consts::cli_consts::countdown::tick_interval;
use crate::consts::cli_consts::polling::status_poll_interval;
use crate::consts::cli_consts::ui::{flash_duration, notification_ttl};
use crate::countdown::{Countdown, Interval, PeriodicSource, RebalanceTrigger, TickOutcome};
use crate::events::{Event, EventSender, EventType, Source};
use crate::i18n::{Language, Translations};
use crate::logging::LogLevel;
use crate::notifications::{Notifier, Severity};
use crate::portfolio::PortfolioRenderer;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::Instant;

/// Who asked for a portfolio refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOrigin {
    /// Initial load; failures fall back to the status endpoint silently.
    Startup,
    User,
}

/// Inbox of the orchestrator task.
#[derive(Debug)]
pub enum Message {
    Tick {
        generation: u64,
    },
    Poll {
        generation: u64,
    },
    StatusLoaded {
        want_portfolio: bool,
        result: Result<StatusResponse, ApiError>,
    },
    RefreshFinished {
        origin: RefreshOrigin,
        result: Result<PortfolioSnapshot, ApiError>,
    },
    /// `status` is the follow-up status load of a successful countdown
    /// rebalance, fetched before the countdown is reset.
    RebalanceFinished {
        trigger: RebalanceTrigger,
        result: Result<RebalanceResponse, ApiError>,
        status: Option<Result<StatusResponse, ApiError>>,
    },
}

/// Operator input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ToggleTimer,
    SaveDefaultInterval(Interval),
    SetNext(Interval),
    RebalanceNow,
    RefreshPortfolio,
}

#[derive(Debug, Clone, Copy)]
pub struct DashboardConfig {
    pub default_interval_secs: u64,
    pub language: Language,
}

pub struct Dashboard {
    api: Arc<dyn DashboardApi>,
    countdown: Countdown,
    renderer: PortfolioRenderer,
    notifier: Notifier,
    translations: Translations,
    error_handler: ErrorHandler,
    ticker: PeriodicSource,
    poller: PeriodicSource,
    inbox: mpsc::Sender<Message>,
    events: EventSender,
    view: DashboardView,
    view_sender: watch::Sender<DashboardView>,
}

impl Dashboard {
    pub fn new(
        api: Arc<dyn DashboardApi>,
        config: DashboardConfig,
        inbox: mpsc::Sender<Message>,
        events: EventSender,
        view_sender: watch::Sender<DashboardView>,
    ) -> Self {
        Self {
            api,
            countdown: Countdown::new(config.default_interval_secs),
            renderer: PortfolioRenderer::new(),
            notifier: Notifier::new(notification_ttl()),
            translations: Translations::for_language(config.language),
            error_handler: ErrorHandler::new(),
            ticker: PeriodicSource::new(tick_interval()),
            poller: PeriodicSource::new(status_poll_interval()),
            inbox,
            events,
            view: DashboardView::default(),
            view_sender,
        }
    }

    #[cfg(test)]
    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    /// Initial load, then start the tick and poll sources.
    ///
    /// Loads run in order: portfolio refresh (status with portfolio on
    /// failure), then status for the last rebalance record. The countdown
    /// starts from the default interval once both are done.
    pub async fn start(&mut self) {
        self.events
            .send(
                Source::Status,
                "Loading dashboard".to_string(),
                EventType::Refresh,
                LogLevel::Info,
            )
            .await;

        let refreshed = self
            .api
            .refresh_portfolio()
            .await
            .and_then(RefreshResponse::into_result);
        self.on_refresh_finished(RefreshOrigin::Startup, refreshed)
            .await;

        let status = self.api.fetch_status().await;
        self.on_status_loaded(false, status).await;

        self.countdown.reset();
        self.restart_ticker();
        self.poller
            .restart(self.inbox.clone(), |generation| Message::Poll { generation });
        self.publish();
    }

    /// Drive the dashboard until shutdown.
    pub async fn run(
        mut self,
        mut inbox: mpsc::Receiver<Message>,
        mut actions: mpsc::Receiver<Action>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        tokio::select! {
            _ = self.start() => {}
            _ = shutdown.recv() => return,
        }

        loop {
            tokio::select! {
                _ = shutdown.recv() => break,
                Some(message) = inbox.recv() => self.handle_message(message).await,
                Some(action) = actions.recv() => self.handle_action(action).await,
                else => break,
            }
        }

        self.ticker.stop();
        self.poller.stop();
        log::debug!("dashboard orchestrator stopped");
    }

    pub async fn handle_message(&mut self, message: Message) {
        match message {
            Message::Tick { generation } => {
                if self.ticker.is_current(generation) {
                    self.on_tick().await;
                }
            }
            Message::Poll { generation } => {
                if self.poller.is_current(generation) {
                    self.spawn_status(true);
                }
            }
            Message::StatusLoaded {
                want_portfolio,
                result,
            } => self.on_status_loaded(want_portfolio, result).await,
            Message::RefreshFinished { origin, result } => {
                self.on_refresh_finished(origin, result).await
            }
            Message::RebalanceFinished {
                trigger,
                result,
                status,
            } => self.on_rebalance_finished(trigger, result, status).await,
        }
        self.publish();
    }

    pub async fn handle_action(&mut self, action: Action) {
        match action {
            Action::ToggleTimer => {
                let paused = self.countdown.toggle();
                let msg = if paused { "Timer paused" } else { "Timer resumed" };
                self.events
                    .send(
                        Source::Countdown,
                        msg.to_string(),
                        EventType::StateChange,
                        LogLevel::Info,
                    )
                    .await;
            }
            Action::SaveDefaultInterval(interval) => {
                let secs = self.countdown.set_default_interval(interval);
                let msg = format!(
                    "{}: {} {}",
                    self.translations.get("newDefaultInterval"),
                    secs,
                    self.translations.get("sec")
                );
                self.notify(msg, Severity::Success).await;
            }
            Action::SetNext(interval) => {
                let secs = self.countdown.set_next(interval);
                self.restart_ticker();
                let msg = format!(
                    "{} {} {}",
                    self.translations.get("nextRebalanceIn"),
                    secs,
                    self.translations.get("sec")
                );
                self.notify(msg, Severity::Info).await;
            }
            Action::RebalanceNow => self.begin_rebalance(RebalanceTrigger::Manual).await,
            Action::RefreshPortfolio => {
                if self.view.refreshing {
                    log::debug!("refresh already in progress");
                } else {
                    self.view.refreshing = true;
                    self.spawn_refresh();
                }
            }
        }
        self.publish();
    }

    fn restart_ticker(&mut self) {
        self.ticker
            .restart(self.inbox.clone(), |generation| Message::Tick { generation });
    }

    async fn on_tick(&mut self) {
        if let TickOutcome::Expired = self.countdown.tick() {
            self.events
                .send(
                    Source::Countdown,
                    "Countdown reached zero".to_string(),
                    EventType::StateChange,
                    LogLevel::Info,
                )
                .await;
            self.begin_rebalance(RebalanceTrigger::Countdown).await;
        }
    }

    async fn begin_rebalance(&mut self, trigger: RebalanceTrigger) {
        if !self.countdown.try_begin_rebalance() {
            self.events
                .send(
                    Source::Rebalance,
                    "Rebalance already in progress".to_string(),
                    EventType::Waiting,
                    LogLevel::Debug,
                )
                .await;
            if trigger == RebalanceTrigger::Manual {
                let msg = self.translations.get("rebalancingInProgress").to_string();
                self.notify(msg, Severity::Warning).await;
            }
            return;
        }

        self.events
            .send(
                Source::Rebalance,
                format!("{} rebalance started", trigger),
                EventType::Refresh,
                LogLevel::Info,
            )
            .await;

        let api = Arc::clone(&self.api);
        let inbox = self.inbox.clone();
        tokio::spawn(async move {
            let result = api
                .trigger_rebalance()
                .await
                .and_then(RebalanceResponse::into_result);
            let status = match (trigger, &result) {
                (RebalanceTrigger::Countdown, Ok(_)) => Some(api.fetch_status().await),
                _ => None,
            };
            let _ = inbox
                .send(Message::RebalanceFinished {
                    trigger,
                    result,
                    status,
                })
                .await;
        });
    }

    fn spawn_status(&self, want_portfolio: bool) {
        let api = Arc::clone(&self.api);
        let inbox = self.inbox.clone();
        tokio::spawn(async move {
            let result = api.fetch_status().await;
            let _ = inbox
                .send(Message::StatusLoaded {
                    want_portfolio,
                    result,
                })
                .await;
        });
    }

    fn spawn_refresh(&self) {
        let api = Arc::clone(&self.api);
        let inbox = self.inbox.clone();
        tokio::spawn(async move {
            let result = api
                .refresh_portfolio()
                .await
                .and_then(RefreshResponse::into_result);
            let _ = inbox
                .send(Message::RefreshFinished {
                    origin: RefreshOrigin::User,
                    result,
                })
                .await;
        });
    }

    async fn on_rebalance_finished(
        &mut self,
        trigger: RebalanceTrigger,
        result: Result<RebalanceResponse, ApiError>,
        status: Option<Result<StatusResponse, ApiError>>,
    ) {
        match result {
            Ok(response) => {
                if let Some(dry_run) = response.dry_run {
                    self.view.dry_run_mode = Some(dry_run);
                }
                if let Some(record) = response.rebalance_log() {
                    self.view.set_rebalance_log(record);
                }
                self.events
                    .send(
                        Source::Rebalance,
                        format!("{} rebalance completed", trigger),
                        EventType::Success,
                        LogLevel::Info,
                    )
                    .await;
                if trigger == RebalanceTrigger::Manual {
                    let msg = self.translations.get("rebalanceCompleted").to_string();
                    self.notify(msg, Severity::Success).await;
                }
                // The countdown restarts only once the post-rebalance
                // status has been rendered.
                match status {
                    Some(status) => {
                        self.on_status_loaded(true, status).await;
                        self.countdown.finish_rebalance(trigger);
                    }
                    None => {
                        self.countdown.finish_rebalance(trigger);
                        self.spawn_status(true);
                    }
                }
            }
            Err(e) => {
                self.countdown.finish_rebalance(trigger);
                self.report_error(Source::Rebalance, &e).await;
                let msg = match (trigger, &e) {
                    (RebalanceTrigger::Countdown, _) => {
                        format!("{}: {}", self.translations.get("rebalanceError"), e)
                    }
                    (RebalanceTrigger::Manual, ApiError::Application(reason)) => {
                        format!("{}: {}", self.translations.get("error"), reason)
                    }
                    (RebalanceTrigger::Manual, _) => {
                        self.translations.get("rebalanceFailed").to_string()
                    }
                };
                self.notify(msg, Severity::Error).await;
            }
        }
    }

    async fn on_refresh_finished(
        &mut self,
        origin: RefreshOrigin,
        result: Result<PortfolioSnapshot, ApiError>,
    ) {
        if origin == RefreshOrigin::User {
            self.view.refreshing = false;
        }

        match result {
            Ok(snapshot) => {
                self.show_portfolio(&snapshot);
                match origin {
                    RefreshOrigin::User => {
                        let msg = self.translations.get("portfolioRefreshed").to_string();
                        self.notify(msg, Severity::Success).await;
                    }
                    RefreshOrigin::Startup => {
                        self.events
                            .send(
                                Source::Status,
                                format!("Portfolio loaded ({} assets)", snapshot.len()),
                                EventType::Success,
                                LogLevel::Info,
                            )
                            .await;
                    }
                }
            }
            Err(e) if origin == RefreshOrigin::Startup => {
                self.report_error(Source::Status, &e).await;
                self.events
                    .send(
                        Source::Status,
                        "Refresh failed, falling back to status".to_string(),
                        EventType::Waiting,
                        LogLevel::Warn,
                    )
                    .await;
                let status = self.api.fetch_status().await;
                self.on_status_loaded(true, status).await;
            }
            Err(ApiError::Application(reason)) => {
                let msg = format!("{}: {}", self.translations.get("error"), reason);
                self.notify(msg, Severity::Error).await;
            }
            Err(e) => {
                self.report_error(Source::Status, &e).await;
                let msg = self.translations.get("refreshFailed").to_string();
                self.notify(msg, Severity::Error).await;
            }
        }
    }

    async fn on_status_loaded(
        &mut self,
        want_portfolio: bool,
        result: Result<StatusResponse, ApiError>,
    ) {
        let status = match result {
            Ok(status) => status,
            Err(e) => {
                self.report_error(Source::Status, &e).await;
                self.notify(format!("Failed to fetch status: {}", e), Severity::Error)
                    .await;
                return;
            }
        };

        if self.countdown.merge_remaining(status.remaining) {
            log::debug!(
                "countdown synced to server: {}s",
                self.countdown.remaining_secs()
            );
        }
        if want_portfolio {
            if let Some(snapshot) = &status.portfolio {
                self.show_portfolio(snapshot);
            }
        }
        if let Some(record) = status.rebalance_log() {
            self.view.set_rebalance_log(record);
        }
        if status.is_running.is_some() {
            self.view.trader_running = status.is_running;
        }
        if status.dry_run_mode.is_some() {
            self.view.dry_run_mode = status.dry_run_mode;
        }

        self.events
            .send(
                Source::Status,
                "Status updated".to_string(),
                EventType::Refresh,
                LogLevel::Debug,
            )
            .await;
    }

    fn show_portfolio(&mut self, snapshot: &PortfolioSnapshot) {
        let rendered = self.renderer.render(snapshot, &self.translations);
        if rendered.flash.is_some() {
            self.view.flash_until = Some(Instant::now() + flash_duration());
        }
        self.view.portfolio = Some(rendered);
    }

    async fn notify(&mut self, message: String, severity: Severity) {
        self.notifier.notify(message.clone(), severity);
        self.events
            .send_event(Event::notice(message, severity))
            .await;
    }

    /// Activity-log entry for a failed call, leveled by how serious it is.
    async fn report_error(&self, source: Source, error: &ApiError) {
        let level = self.error_handler.classify_error(error);
        let mut msg = error.to_string();
        if self.error_handler.recovers_on_next_poll(error) {
            msg.push_str(" (will retry on next poll)");
        }
        self.events
            .send(source, msg, EventType::Error, level)
            .await;
    }

    fn publish(&mut self) {
        let now = Instant::now();
        self.view.notifications = self.notifier.visible(now);
        self.view.timer_text = self.countdown.timer_text(&self.translations);
        self.view.remaining_secs = self.countdown.remaining_secs();
        self.view.default_interval_secs = self.countdown.default_interval_secs();
        self.view.phase = self.countdown.phase();
        self.view.paused = self.countdown.is_paused();
        self.view.rebalancing = self.countdown.rebalance_in_flight();
        if self.view.flash_until.is_some_and(|until| now >= until) {
            self.view.flash_until = None;
        }
        self.view_sender.send_replace(self.view.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockDashboardApi;
    use crate::api::types::{Holding, HoldingEntry};
    use std::time::Duration;

    struct Harness {
        dashboard: Dashboard,
        inbox: mpsc::Receiver<Message>,
        _events: mpsc::Receiver<Event>,
        view: watch::Receiver<DashboardView>,
    }

    fn harness(api: MockDashboardApi, default_interval_secs: u64) -> Harness {
        let (inbox_sender, inbox) = mpsc::channel(64);
        let (event_sender, events) = mpsc::channel(256);
        let (view_sender, view) = watch::channel(DashboardView::default());
        let dashboard = Dashboard::new(
            Arc::new(api),
            DashboardConfig {
                default_interval_secs,
                language: Language::En,
            },
            inbox_sender,
            EventSender::new(event_sender),
            view_sender,
        );
        Harness {
            dashboard,
            inbox,
            _events: events,
            view,
        }
    }

    fn portfolio(usdc_value: f64) -> PortfolioSnapshot {
        PortfolioSnapshot::new().with(
            "BTC",
            HoldingEntry::Structured(Holding {
                free: 1.0,
                locked: 0.0,
                usdc_value,
            }),
        )
    }

    fn refresh_ok(usdc_value: f64) -> RefreshResponse {
        RefreshResponse {
            status: "ok".to_string(),
            portfolio: Some(portfolio(usdc_value)),
            error: None,
        }
    }

    /// Server that answers reads successfully and has nothing to say about the countdown.
    fn quiet_server() -> MockDashboardApi {
        let mut api = MockDashboardApi::new();
        api.expect_refresh_portfolio()
            .returning(|| Ok(refresh_ok(100.0)));
        api.expect_fetch_status()
            .returning(|| Ok(StatusResponse::default()));
        api
    }

    fn http_error(status: u16) -> ApiError {
        ApiError::Http {
            status,
            message: "upstream unavailable".to_string(),
        }
    }

    impl Harness {
        /// Handle queued messages until a rebalance completion has been processed.
        async fn pump_until_rebalance_finished(&mut self) {
            while let Some(message) = self.inbox.recv().await {
                let finished = matches!(message, Message::RebalanceFinished { .. });
                self.dashboard.handle_message(message).await;
                if finished {
                    return;
                }
            }
        }

        /// Handle whatever is queued right now.
        async fn drain(&mut self) {
            while let Ok(message) = self.inbox.try_recv() {
                self.dashboard.handle_message(message).await;
            }
        }

        fn error_notifications(&self) -> Vec<String> {
            self.view
                .borrow()
                .notifications
                .iter()
                .filter(|n| n.severity == Severity::Error)
                .map(|n| n.message.clone())
                .collect()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_expiry_triggers_exactly_one_rebalance() {
        let mut api = quiet_server();
        api.expect_trigger_rebalance()
            .times(1)
            .returning(|| Ok(RebalanceResponse::ok()));

        let mut h = harness(api, 3);
        h.dashboard.start().await;
        assert_eq!(h.dashboard.countdown().remaining_secs(), 3);

        h.pump_until_rebalance_finished().await;

        assert!(!h.dashboard.countdown().rebalance_in_flight());
        assert_eq!(h.dashboard.countdown().remaining_secs(), 3);
        assert!(h.error_notifications().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_resets_after_post_rebalance_status_is_rendered() {
        let mut api = MockDashboardApi::new();
        api.expect_refresh_portfolio()
            .returning(|| Ok(refresh_ok(100.0)));
        api.expect_fetch_status().returning(|| {
            Ok(StatusResponse {
                remaining: Some(999),
                portfolio: Some(portfolio(500.0)),
                ..StatusResponse::default()
            })
        });
        api.expect_trigger_rebalance()
            .times(1)
            .returning(|| Ok(RebalanceResponse::ok()));

        let mut h = harness(api, 3);
        h.dashboard.start().await;
        assert_eq!(h.view.borrow().portfolio.as_ref().unwrap().total, 100.0);

        h.pump_until_rebalance_finished().await;

        // The server's remaining arrives mid-rebalance and loses to the reset.
        assert_eq!(h.dashboard.countdown().remaining_secs(), 3);
        assert!(!h.dashboard.countdown().rebalance_in_flight());
        let view = h.view.borrow();
        assert_eq!(view.portfolio.as_ref().unwrap().total, 500.0);
        assert_eq!(view.remaining_secs, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn status_poll_rerenders_portfolio() {
        let mut api = MockDashboardApi::new();
        api.expect_refresh_portfolio()
            .times(1)
            .returning(|| Ok(refresh_ok(100.0)));
        let mut calls = 0;
        api.expect_fetch_status().times(2).returning(move || {
            calls += 1;
            Ok(StatusResponse {
                portfolio: (calls > 1).then(|| portfolio(250.0)),
                ..StatusResponse::default()
            })
        });

        let mut h = harness(api, 3600);
        h.dashboard.start().await;
        assert_eq!(h.view.borrow().portfolio.as_ref().unwrap().total, 100.0);

        tokio::time::sleep(status_poll_interval()).await;
        while let Some(message) = h.inbox.recv().await {
            let loaded = matches!(message, Message::StatusLoaded { .. });
            h.dashboard.handle_message(message).await;
            if loaded {
                break;
            }
        }

        let view = h.view.borrow();
        assert_eq!(view.portfolio.as_ref().unwrap().total, 250.0);
        assert!(view.remaining_secs < 3600);
    }

    #[tokio::test(start_paused = true)]
    async fn second_trigger_while_in_flight_makes_no_call() {
        let mut api = quiet_server();
        api.expect_trigger_rebalance()
            .times(1)
            .returning(|| Ok(RebalanceResponse::ok()));

        let mut h = harness(api, 3600);
        h.dashboard.handle_action(Action::RebalanceNow).await;
        assert!(h.dashboard.countdown().rebalance_in_flight());
        assert!(h.view.borrow().rebalancing);
        h.dashboard.handle_action(Action::RebalanceNow).await;
        let warnings: Vec<_> = h
            .view
            .borrow()
            .notifications
            .iter()
            .filter(|n| n.severity == Severity::Warning)
            .map(|n| n.message.clone())
            .collect();
        assert_eq!(warnings, vec!["Rebalancing in progress...".to_string()]);

        h.pump_until_rebalance_finished().await;
        assert!(!h.dashboard.countdown().rebalance_in_flight());

        let view = h.view.borrow();
        let completed: Vec<_> = view
            .notifications
            .iter()
            .filter(|n| n.message == "Rebalance completed")
            .collect();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].severity, Severity::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn transport_failure_resets_countdown_with_one_notification() {
        let mut api = quiet_server();
        api.expect_trigger_rebalance()
            .times(1)
            .returning(|| Err(http_error(502)));

        let mut h = harness(api, 2);
        h.dashboard.start().await;
        h.pump_until_rebalance_finished().await;

        assert_eq!(h.dashboard.countdown().remaining_secs(), 2);
        assert!(!h.dashboard.countdown().rebalance_in_flight());
        let errors = h.error_notifications();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Rebalance error: HTTP error with status 502"));
    }

    #[tokio::test(start_paused = true)]
    async fn manual_rebalance_failures_are_worded_by_kind() {
        let mut api = quiet_server();
        let mut calls = 0;
        api.expect_trigger_rebalance().times(2).returning(move || {
            calls += 1;
            if calls == 1 {
                Err(ApiError::Application("Insufficient balance".to_string()))
            } else {
                Err(http_error(503))
            }
        });

        let mut h = harness(api, 3600);
        h.dashboard.handle_action(Action::RebalanceNow).await;
        h.pump_until_rebalance_finished().await;
        h.dashboard.handle_action(Action::RebalanceNow).await;
        h.pump_until_rebalance_finished().await;

        assert_eq!(
            h.error_notifications(),
            vec![
                "Error: Insufficient balance".to_string(),
                "Rebalance failed".to_string()
            ]
        );
        // A manual rebalance leaves a running countdown alone.
        assert_eq!(h.dashboard.countdown().remaining_secs(), 3600);
    }

    #[tokio::test(start_paused = true)]
    async fn set_next_restarts_ticking_without_double_decrement() {
        let mut h = harness(quiet_server(), 3600);
        h.dashboard.start().await;

        // Let the first ticker queue a tick that is never handled.
        tokio::time::sleep(Duration::from_millis(1500)).await;
        h.dashboard
            .handle_action(Action::SetNext(Interval::new(0, 0, 1, 0)))
            .await;
        assert_eq!(h.dashboard.countdown().remaining_secs(), 60);

        h.drain().await;
        assert_eq!(h.dashboard.countdown().remaining_secs(), 60);

        tokio::time::sleep(Duration::from_millis(1200)).await;
        h.drain().await;
        assert_eq!(h.dashboard.countdown().remaining_secs(), 59);

        let view = h.view.borrow();
        assert!(
            view.notifications
                .iter()
                .any(|n| n.message == "Next rebalance in 60 sec" && n.severity == Severity::Info)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn paused_timer_ignores_ticks_and_server_countdown() {
        let mut h = harness(quiet_server(), 3600);
        h.dashboard.start().await;
        h.dashboard.handle_action(Action::ToggleTimer).await;
        assert!(h.view.borrow().paused);

        tokio::time::sleep(Duration::from_secs(3)).await;
        h.drain().await;
        assert_eq!(h.dashboard.countdown().remaining_secs(), 3600);

        let status = StatusResponse {
            remaining: Some(10),
            ..StatusResponse::default()
        };
        h.dashboard
            .handle_message(Message::StatusLoaded {
                want_portfolio: false,
                result: Ok(status.clone()),
            })
            .await;
        assert_eq!(h.dashboard.countdown().remaining_secs(), 3600);

        h.dashboard.handle_action(Action::ToggleTimer).await;
        h.dashboard
            .handle_message(Message::StatusLoaded {
                want_portfolio: false,
                result: Ok(status),
            })
            .await;
        assert_eq!(h.dashboard.countdown().remaining_secs(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn save_default_interval_only_changes_the_next_cycle() {
        let mut h = harness(quiet_server(), 3600);
        h.dashboard
            .handle_action(Action::SaveDefaultInterval(Interval::new(0, 2, 0, 0)))
            .await;

        assert_eq!(h.dashboard.countdown().remaining_secs(), 3600);
        assert_eq!(h.dashboard.countdown().default_interval_secs(), 7200);
        let view = h.view.borrow();
        assert_eq!(view.notifications[0].message, "New default interval: 7200 sec");
        assert_eq!(view.notifications[0].severity, Severity::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_outcomes_are_reported() {
        let mut api = MockDashboardApi::new();
        let mut calls = 0;
        api.expect_refresh_portfolio().times(3).returning(move || {
            calls += 1;
            match calls {
                1 => Ok(refresh_ok(40000.0)),
                2 => Ok(RefreshResponse {
                    status: "error".to_string(),
                    portfolio: None,
                    error: Some("Exchange down".to_string()),
                }),
                _ => Err(http_error(500)),
            }
        });

        let mut h = harness(api, 3600);
        for _ in 0..3 {
            h.dashboard.handle_action(Action::RefreshPortfolio).await;
            assert!(h.view.borrow().refreshing);
            let message = h.inbox.recv().await.unwrap();
            h.dashboard.handle_message(message).await;
            assert!(!h.view.borrow().refreshing);
        }

        let view = h.view.borrow();
        let messages: Vec<_> = view.notifications.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["Portfolio refreshed", "Error: Exchange down", "Portfolio refresh failed"]
        );
        assert_eq!(view.portfolio.as_ref().unwrap().total, 40000.0);
    }

    #[tokio::test(start_paused = true)]
    async fn startup_falls_back_to_status_when_refresh_fails() {
        let mut api = MockDashboardApi::new();
        api.expect_refresh_portfolio()
            .times(1)
            .returning(|| Err(http_error(500)));
        api.expect_fetch_status().times(2).returning(|| {
            Ok(StatusResponse {
                remaining: Some(42),
                portfolio: Some(portfolio(1234.5)),
                rebalance: Some(serde_json::json!({"orders": []})),
                is_running: Some(true),
                dry_run_mode: Some(true),
            })
        });

        let mut h = harness(api, 900);
        h.dashboard.start().await;

        let view = h.view.borrow();
        assert_eq!(view.portfolio.as_ref().unwrap().total, 1234.5);
        assert!(view.rebalance_log.as_deref().unwrap().contains("\"orders\""));
        assert_eq!(view.trader_running, Some(true));
        assert_eq!(view.dry_run_mode, Some(true));
        // The countdown starts from the default, not the server value.
        assert_eq!(view.remaining_secs, 900);
        assert!(view.notifications.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn status_failure_is_notified() {
        let mut h = harness(quiet_server(), 3600);
        h.dashboard
            .handle_message(Message::StatusLoaded {
                want_portfolio: true,
                result: Err(http_error(502)),
            })
            .await;

        let errors = h.error_notifications();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Failed to fetch status: HTTP error with status 502"));
    }

    #[tokio::test(start_paused = true)]
    async fn total_change_flashes_briefly() {
        let mut h = harness(quiet_server(), 3600);
        h.dashboard.start().await;

        let status = StatusResponse {
            portfolio: Some(portfolio(150.0)),
            ..StatusResponse::default()
        };
        h.dashboard
            .handle_message(Message::StatusLoaded {
                want_portfolio: true,
                result: Ok(status),
            })
            .await;

        let now = Instant::now();
        let view = h.view.borrow().clone();
        assert_eq!(view.flash_at(now), Some(crate::portfolio::Flash::Up));
        assert_eq!(view.flash_at(now + flash_duration()), None);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_poll_generations_are_ignored() {
        let mut api = MockDashboardApi::new();
        api.expect_fetch_status().times(0);

        let mut h = harness(api, 3600);
        h.dashboard
            .handle_message(Message::Poll { generation: 7 })
            .await;
        h.dashboard
            .handle_message(Message::Tick { generation: 7 })
            .await;
        assert_eq!(h.dashboard.countdown().remaining_secs(), 3600);
    }

    #[tokio::test(start_paused = true)]
    async fn run_stops_on_shutdown() {
        let (inbox_sender, inbox) = mpsc::channel(64);
        let (event_sender, _events) = mpsc::channel(256);
        let (view_sender, view) = watch::channel(DashboardView::default());
        let (_action_sender, actions) = mpsc::channel(16);
        let (shutdown_sender, shutdown) = broadcast::channel(1);

        let dashboard = Dashboard::new(
            Arc::new(quiet_server()),
            DashboardConfig {
                default_interval_secs: 5,
                language: Language::Uk,
            },
            inbox_sender,
            EventSender::new(event_sender),
            view_sender,
        );
        let handle = tokio::spawn(dashboard.run(inbox, actions, shutdown));

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(view.borrow().remaining_secs, 3);
        assert!(view.borrow().timer_text.starts_with("Залишилось"));

        shutdown_sender.send(()).unwrap();
        handle.await.unwrap();
    }
}
