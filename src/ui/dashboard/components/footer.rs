//! Dashboard footer component
//!
//! Key hints, or the active prompt when one is open

use super::super::state::{DashboardState, InputMode, IntervalTarget};
use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

/// Footer line for the current input mode.
pub fn footer_text(state: &DashboardState) -> (String, Color) {
    match &state.input_mode {
        InputMode::ConfirmRebalance => (
            format!("{} [Y] / [N]", state.t("executeRebalance")),
            Color::LightYellow,
        ),
        InputMode::EditInterval { target, buffer } => {
            let label = match target {
                IntervalTarget::Next => state.t("nextRebalanceIn"),
                IntervalTarget::Default => state.t("newDefaultInterval"),
            };
            let text = match &state.input_error {
                Some(error) => format!("{}: {}_  ({})", label, buffer, error),
                None => format!("{}: {}_  (e.g. 1h30m or 0 1 30 0) [Enter] [Esc]", label, buffer),
            };
            let color = if state.input_error.is_some() {
                Color::LightRed
            } else {
                Color::LightYellow
            };
            (text, color)
        }
        InputMode::Normal => {
            let timer = if state.view.paused {
                state.t("startTimer")
            } else {
                state.t("stopTimer")
            };
            let rebalance = if state.view.rebalancing {
                state.t("rebalancing")
            } else {
                state.t("rebalanceNow")
            };
            let refresh = if state.view.refreshing {
                state.t("refreshing")
            } else {
                state.t("refreshPortfolio")
            };
            (
                format!(
                    "[Space] {} | [R] {} | [F] {} | [N] {} | [D] {} | [Q] Quit",
                    timer,
                    rebalance,
                    refresh,
                    state.t("nextRebalanceIn"),
                    state.t("newDefaultInterval"),
                ),
                Color::Cyan,
            )
        }
    }
}

pub fn render_footer(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let (text, color) = footer_text(state);

    let footer = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_type(BorderType::Thick),
        );
    f.render_widget(footer, area);
}
