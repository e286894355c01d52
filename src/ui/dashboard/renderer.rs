//! Dashboard main renderer

use super::components::{footer, header, logs, notifications, portfolio, rebalance_log};
use super::state::DashboardState;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::{Color, Style};
use ratatui::widgets::Block;

pub fn render_dashboard(f: &mut Frame, state: &DashboardState) {
    if state.with_background_color {
        f.render_widget(
            Block::default().style(Style::default().bg(Color::Rgb(16, 20, 24))),
            f.area(),
        );
    }

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Fill(1),
            Constraint::Percentage(25),
            Constraint::Length(3),
        ])
        .margin(1)
        .split(f.area());

    header::render_header(f, main_chunks[0], state);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(main_chunks[1]);

    let side_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Fill(1), Constraint::Length(7)])
        .split(content_chunks[1]);

    portfolio::render_portfolio(f, content_chunks[0], state);
    rebalance_log::render_rebalance_log(f, side_chunks[0], state);
    notifications::render_notifications(f, side_chunks[1], state);
    logs::render_logs_panel(f, main_chunks[2], state);
    footer::render_footer(f, main_chunks[3], state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{Holding, HoldingEntry, PortfolioSnapshot};
    use crate::i18n::{Language, Translations};
    use crate::portfolio::render;
    use crate::ui::app::UIConfig;
    use ratatui::{Terminal, backend::TestBackend};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[tokio::test]
    async fn dashboard_draws_timer_portfolio_and_log() {
        let mut state = DashboardState::new(UIConfig::new(
            false,
            "http://127.0.0.1:8000/".to_string(),
            Language::En,
        ));
        let snapshot = PortfolioSnapshot::new().with(
            "BTC",
            HoldingEntry::Structured(Holding {
                free: 0.5,
                locked: 0.0,
                usdc_value: 30000.0,
            }),
        );
        state.view.timer_text = "Remaining: 0d 0h 59m 59s".to_string();
        state.view.remaining_secs = 3599;
        state.view.default_interval_secs = 3600;
        state.view.portfolio = Some(render(
            &snapshot,
            0.0,
            &Translations::for_language(Language::En),
        ));
        state.view.rebalance_log = Some("{\n  \"orders\": 2\n}".to_string());

        let mut terminal = Terminal::new(TestBackend::new(160, 40)).unwrap();
        terminal.draw(|f| render_dashboard(f, &state)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Remaining: 0d 0h 59m 59s"));
        assert!(text.contains("BTC"));
        assert!(text.contains("$30000.00"));
        assert!(text.contains("\"orders\": 2"));
        assert!(text.contains("[Space]"));
    }
}
