//! Portfolio table component

use super::super::state::DashboardState;
use super::super::utils::flash_color;
use ratatui::Frame;
use ratatui::layout::Constraint;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Padding, Paragraph, Row, Table};
use tokio::time::Instant;

pub fn render_portfolio(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let title = if state.view.refreshing {
        format!("{} - {}", state.t("portfolio").to_uppercase(), state.t("refreshing"))
    } else {
        state.t("portfolio").to_uppercase()
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
        .padding(Padding::horizontal(1));

    let Some(portfolio) = &state.view.portfolio else {
        f.render_widget(Paragraph::new("Loading...").block(block), area);
        return;
    };

    let flash = state.view.flash_at(Instant::now());
    let rows: Vec<Row> = portfolio
        .rows
        .iter()
        .map(|row| {
            if row.is_total {
                let value_style = match flash {
                    Some(direction) => Style::default()
                        .fg(Color::Black)
                        .bg(flash_color(direction)),
                    None => Style::default().fg(Color::LightGreen),
                }
                .add_modifier(Modifier::BOLD);
                Row::new(vec![
                    Cell::from(row.symbol.clone())
                        .style(Style::default().add_modifier(Modifier::BOLD)),
                    Cell::from(row.balance.clone()),
                    Cell::from(row.value.clone()).style(value_style),
                ])
            } else {
                Row::new(vec![
                    Cell::from(row.symbol.clone()).style(
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Cell::from(row.balance.clone()),
                    Cell::from(row.value.clone()).style(Style::default().fg(Color::LightGreen)),
                ])
            }
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Fill(1),
            Constraint::Length(16),
        ],
    )
    .block(block);

    f.render_widget(table, area);
}
