//! Last rebalance record with JSON highlighting

use super::super::state::DashboardState;
use ratatui::Frame;
use ratatui::prelude::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph, Wrap};

const KEY_COLOR: Color = Color::Cyan;
const STRING_COLOR: Color = Color::LightGreen;
const NUMBER_COLOR: Color = Color::LightYellow;
const BOOLEAN_COLOR: Color = Color::LightMagenta;

/// Style one line of pretty-printed JSON: keys, string, number and boolean values.
pub fn highlight_json_line(line: &str) -> Line<'static> {
    let indent_len = line.len() - line.trim_start().len();
    let (indent, rest) = line.split_at(indent_len);
    let mut spans = vec![Span::raw(indent.to_string())];

    let value = match split_key(rest) {
        Some((key, value)) => {
            spans.push(Span::styled(key.to_string(), Style::default().fg(KEY_COLOR)));
            value
        }
        None => rest,
    };

    let trimmed = value.trim_end_matches(',');
    let trailing = &value[trimmed.len()..];
    let color = if trimmed.starts_with('"') && trimmed.len() > 1 {
        Some(STRING_COLOR)
    } else if trimmed == "true" || trimmed == "false" {
        Some(BOOLEAN_COLOR)
    } else if trimmed.parse::<f64>().is_ok() {
        Some(NUMBER_COLOR)
    } else {
        None
    };
    match color {
        Some(color) => spans.push(Span::styled(trimmed.to_string(), Style::default().fg(color))),
        None => spans.push(Span::raw(trimmed.to_string())),
    }
    if !trailing.is_empty() {
        spans.push(Span::raw(trailing.to_string()));
    }

    Line::from(spans)
}

/// `"key": value` -> (`"key": `, `value`)
fn split_key(text: &str) -> Option<(&str, &str)> {
    if !text.starts_with('"') {
        return None;
    }
    let mut escaped = false;
    for (i, c) in text.char_indices().skip(1) {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' => {
                let key_end = i + 1;
                return text[key_end..]
                    .starts_with(": ")
                    .then(|| text.split_at(key_end + 2));
            }
            _ => {}
        }
    }
    None
}

pub fn render_rebalance_log(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let lines: Vec<Line> = match &state.view.rebalance_log {
        Some(record) => record.lines().map(highlight_json_line).collect(),
        None => vec![Line::from(Span::styled(
            "-",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    let block = Block::default()
        .title(state.t("lastRebalance").to_uppercase())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
        .padding(Padding::horizontal(1));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}
