//! Notification stack component

use super::super::state::DashboardState;
use super::super::utils::severity_color;
use ratatui::Frame;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph, Wrap};
use tokio::time::Instant;

/// Render visible notifications, newest at the bottom.
pub fn render_notifications(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let max_lines = area.height.saturating_sub(2) as usize;
    let visible: Vec<_> = state.view.visible_notifications(Instant::now()).collect();
    let skip = visible.len().saturating_sub(max_lines.max(1));

    let lines: Vec<Line> = visible
        .into_iter()
        .skip(skip)
        .map(|notification| {
            let color = severity_color(notification.severity);
            Line::from(vec![
                Span::styled(
                    format!("{} ", notification.severity.icon()),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(notification.message.clone(), Style::default().fg(color)),
            ])
        })
        .collect();

    let block = Block::default()
        .title(state.t("notifications").to_uppercase())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
        .padding(Padding::horizontal(1));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}
