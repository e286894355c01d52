//! Dashboard header component
//!
//! Renders the title, server flags and the countdown gauge

use super::super::state::DashboardState;
use super::super::utils::elapsed_percent;
use crate::countdown::Phase;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph};

/// Render header with title and countdown progress.
pub fn render_header(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let header_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(2)])
        .split(area);

    let version = env!("CARGO_PKG_VERSION");
    let mut title_spans = vec![Span::styled(
        format!("REBALANCE DASHBOARD v{}  {}", version, state.base_url),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(running) = state.view.trader_running {
        let (label, color) = if running {
            (state.t("traderRunning"), Color::LightGreen)
        } else {
            (state.t("traderStopped"), Color::LightRed)
        };
        title_spans.push(Span::styled(format!("  [{}]", label), Style::default().fg(color)));
    }
    if let Some(dry_run) = state.view.dry_run_mode {
        let (label, color) = if dry_run {
            (state.t("dryRun"), Color::LightYellow)
        } else {
            (state.t("liveMode"), Color::LightMagenta)
        };
        title_spans.push(Span::styled(format!("  [{}]", label), Style::default().fg(color)));
    }

    let title = Paragraph::new(Line::from(title_spans))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_type(BorderType::Thick),
        );
    f.render_widget(title, header_chunks[0]);

    let view = &state.view;
    let (label, gauge_color) = match view.phase {
        Phase::ZeroTriggering => (view.timer_text.clone(), Color::LightRed),
        Phase::Paused => (
            format!("{} ({})", view.timer_text, state.t("paused")),
            Color::Yellow,
        ),
        Phase::Idle if view.remaining_secs == 0 => (view.timer_text.clone(), Color::Red),
        Phase::Idle => (view.timer_text.clone(), Color::LightBlue),
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .gauge_style(
            Style::default()
                .fg(gauge_color)
                .add_modifier(Modifier::BOLD),
        )
        .percent(elapsed_percent(view.remaining_secs, view.default_interval_secs).min(100))
        .label(label);

    f.render_widget(gauge, header_chunks[1]);
}
