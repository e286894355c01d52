//! Dashboard state management
//!
//! Holds the latest orchestrator snapshot, the activity log and the input mode,
//! and turns key presses into orchestrator actions.

use crate::consts::cli_consts::MAX_ACTIVITY_LOGS;
use crate::countdown::{Interval, IntervalError};
use crate::dashboard::{Action, DashboardView};
use crate::events::Event as DashboardEvent;
use crate::i18n::Translations;
use crate::ui::app::UIConfig;
use crossterm::event::KeyCode;
use std::collections::VecDeque;

/// Which countdown setting an interval prompt edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalTarget {
    Next,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Waiting for y/n before a manual rebalance.
    ConfirmRebalance,
    EditInterval {
        target: IntervalTarget,
        buffer: String,
    },
}

/// What the UI loop should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    Handled,
    Dispatch(Action),
    Quit,
}

#[derive(Debug)]
pub struct DashboardState {
    /// Latest snapshot published by the orchestrator.
    pub view: DashboardView,
    /// Activity logs for display
    pub activity_logs: VecDeque<DashboardEvent>,
    pub input_mode: InputMode,
    /// Parse error of the last interval prompt, shown until the next key press.
    pub input_error: Option<String>,
    pub translations: Translations,
    pub base_url: String,
    /// Whether to enable background colors
    pub with_background_color: bool,
}

impl DashboardState {
    pub fn new(ui_config: UIConfig) -> Self {
        Self {
            view: DashboardView::default(),
            activity_logs: VecDeque::new(),
            input_mode: InputMode::Normal,
            input_error: None,
            translations: Translations::for_language(ui_config.language),
            base_url: ui_config.base_url,
            with_background_color: ui_config.with_background_color,
        }
    }

    /// Add an event to activity logs with size limit
    pub fn add_to_activity_log(&mut self, event: DashboardEvent) {
        if self.activity_logs.len() >= MAX_ACTIVITY_LOGS {
            self.activity_logs.pop_front();
        }
        self.activity_logs.push_back(event);
    }

    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        self.translations.get(key)
    }

    pub fn handle_key(&mut self, code: KeyCode) -> KeyOutcome {
        self.input_error = None;
        match std::mem::replace(&mut self.input_mode, InputMode::Normal) {
            InputMode::Normal => self.handle_normal_key(code),
            InputMode::ConfirmRebalance => match code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    KeyOutcome::Dispatch(Action::RebalanceNow)
                }
                _ => KeyOutcome::Handled,
            },
            InputMode::EditInterval { target, mut buffer } => match code {
                KeyCode::Esc => KeyOutcome::Handled,
                KeyCode::Enter => match buffer.parse::<Interval>().and_then(|interval| {
                    if interval.total_secs() == 0 {
                        Err(IntervalError::Zero)
                    } else {
                        Ok(interval)
                    }
                }) {
                    Ok(interval) => KeyOutcome::Dispatch(match target {
                        IntervalTarget::Next => Action::SetNext(interval),
                        IntervalTarget::Default => Action::SaveDefaultInterval(interval),
                    }),
                    Err(e) => {
                        self.input_error = Some(e.to_string());
                        self.input_mode = InputMode::EditInterval { target, buffer };
                        KeyOutcome::Handled
                    }
                },
                KeyCode::Backspace => {
                    buffer.pop();
                    self.input_mode = InputMode::EditInterval { target, buffer };
                    KeyOutcome::Handled
                }
                KeyCode::Char(c) => {
                    buffer.push(c);
                    self.input_mode = InputMode::EditInterval { target, buffer };
                    KeyOutcome::Handled
                }
                _ => {
                    self.input_mode = InputMode::EditInterval { target, buffer };
                    KeyOutcome::Handled
                }
            },
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode) -> KeyOutcome {
        match code {
            KeyCode::Esc | KeyCode::Char('q') => KeyOutcome::Quit,
            KeyCode::Char(' ') | KeyCode::Char('p') => KeyOutcome::Dispatch(Action::ToggleTimer),
            KeyCode::Char('f') => KeyOutcome::Dispatch(Action::RefreshPortfolio),
            KeyCode::Char('r') => {
                if !self.view.rebalancing {
                    self.input_mode = InputMode::ConfirmRebalance;
                }
                KeyOutcome::Handled
            }
            KeyCode::Char('n') => self.open_prompt(IntervalTarget::Next),
            KeyCode::Char('d') => self.open_prompt(IntervalTarget::Default),
            _ => KeyOutcome::Handled,
        }
    }

    fn open_prompt(&mut self, target: IntervalTarget) -> KeyOutcome {
        self.input_mode = InputMode::EditInterval {
            target,
            buffer: String::new(),
        };
        KeyOutcome::Handled
    }
}
