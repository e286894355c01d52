//! Portfolio table rendering
//!
//! Turns a snapshot into display rows plus a total row. The only thing carried
//! between renders is the previous total, used to pick the flash direction.

use crate::api::types::{HoldingEntry, PortfolioSnapshot};
use crate::i18n::Translations;

/// Direction of the total-value flash cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortfolioRow {
    pub symbol: String,
    pub balance: String,
    pub value: String,
    pub is_total: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPortfolio {
    pub rows: Vec<PortfolioRow>,
    pub total: f64,
    pub flash: Option<Flash>,
}

fn format_usd(value: f64) -> String {
    format!("${:.2}", value)
}

/// Render `snapshot`. A `previous_total` of zero marks the first render and
/// never produces a flash.
pub fn render(
    snapshot: &PortfolioSnapshot,
    previous_total: f64,
    t: &Translations,
) -> RenderedPortfolio {
    let mut rows = Vec::with_capacity(snapshot.len() + 1);
    let total = snapshot.total_value();

    for (symbol, entry) in snapshot.iter() {
        let (balance, usdc_value) = match entry {
            HoldingEntry::Structured(holding) => (
                format!(
                    "{:.6} ({}: {:.6})",
                    holding.total(),
                    t.get("free"),
                    holding.free
                ),
                holding.usdc_value,
            ),
            HoldingEntry::Display(raw) => (raw.clone(), 0.0),
        };
        rows.push(PortfolioRow {
            symbol: symbol.to_string(),
            balance,
            value: format_usd(usdc_value),
            is_total: false,
        });
    }

    rows.push(PortfolioRow {
        symbol: t.get("total").to_string(),
        balance: "-".to_string(),
        value: format_usd(total),
        is_total: true,
    });

    let flash = if previous_total != 0.0 && total > previous_total {
        Some(Flash::Up)
    } else if previous_total != 0.0 && total < previous_total {
        Some(Flash::Down)
    } else {
        None
    };

    RenderedPortfolio { rows, total, flash }
}

/// Keeps the previously rendered total between renders.
#[derive(Debug, Default)]
pub struct PortfolioRenderer {
    previous_total: f64,
}

impl PortfolioRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn previous_total(&self) -> f64 {
        self.previous_total
    }

    pub fn render(&mut self, snapshot: &PortfolioSnapshot, t: &Translations) -> RenderedPortfolio {
        let rendered = render(snapshot, self.previous_total, t);
        self.previous_total = rendered.total;
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::Holding;
    use crate::i18n::Language;

    fn btc(usdc_value: f64) -> PortfolioSnapshot {
        PortfolioSnapshot::new().with(
            "BTC",
            HoldingEntry::Structured(Holding {
                free: 1.0,
                locked: 0.0,
                usdc_value,
            }),
        )
    }

    fn en() -> Translations {
        Translations::for_language(Language::En)
    }

    #[test]
    fn first_render_shows_total_without_flash() {
        let rendered = render(&btc(50000.0), 0.0, &en());
        let total_row = rendered.rows.last().unwrap();
        assert!(total_row.is_total);
        assert_eq!(total_row.symbol, "Total");
        assert_eq!(total_row.balance, "-");
        assert_eq!(total_row.value, "$50000.00");
        assert_eq!(rendered.total, 50000.0);
        assert_eq!(rendered.flash, None);
    }

    #[test]
    fn flash_follows_sign_of_delta() {
        assert_eq!(render(&btc(50000.0), 40000.0, &en()).flash, Some(Flash::Up));
        assert_eq!(render(&btc(30000.0), 40000.0, &en()).flash, Some(Flash::Down));
        assert_eq!(render(&btc(40000.0), 40000.0, &en()).flash, None);
    }

    #[test]
    fn structured_rows_show_total_and_free() {
        let snapshot = PortfolioSnapshot::new().with(
            "ETH",
            HoldingEntry::Structured(Holding {
                free: 1.5,
                locked: 0.25,
                usdc_value: 5250.456,
            }),
        );
        let rendered = render(&snapshot, 0.0, &en());
        assert_eq!(
            rendered.rows[0],
            PortfolioRow {
                symbol: "ETH".to_string(),
                balance: "1.750000 (free: 1.500000)".to_string(),
                value: "$5250.46".to_string(),
                is_total: false,
            }
        );
    }

    #[test]
    fn display_entries_contribute_nothing() {
        let snapshot = btc(100.0)
            .with("NOTE", HoldingEntry::Display("rate limited".to_string()))
            .with(
                "ADA",
                HoldingEntry::Structured(Holding {
                    free: 10.0,
                    locked: 0.0,
                    usdc_value: 5.5,
                }),
            );
        let rendered = render(&snapshot, 0.0, &en());
        let symbols: Vec<_> = rendered.rows.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["BTC", "NOTE", "ADA", "Total"]);
        assert_eq!(rendered.rows[1].balance, "rate limited");
        assert_eq!(rendered.rows[1].value, "$0.00");
        assert_eq!(rendered.total, 105.5);
    }

    #[test]
    fn empty_snapshot_renders_zero_total() {
        let rendered = render(&PortfolioSnapshot::new(), 10.0, &en());
        assert_eq!(rendered.rows.len(), 1);
        assert_eq!(rendered.rows[0].value, "$0.00");
        assert_eq!(rendered.flash, Some(Flash::Down));
    }

    #[test]
    fn renderer_remembers_previous_total() {
        let mut renderer = PortfolioRenderer::new();
        assert_eq!(renderer.render(&btc(40000.0), &en()).flash, None);
        assert_eq!(renderer.previous_total(), 40000.0);
        assert_eq!(renderer.render(&btc(41000.0), &en()).flash, Some(Flash::Up));
        assert_eq!(renderer.render(&btc(41000.0), &en()).flash, None);
        assert_eq!(renderer.render(&btc(39000.0), &en()).flash, Some(Flash::Down));
    }

    #[test]
    fn translated_labels() {
        let rendered = render(&btc(1.0), 0.0, &Translations::for_language(Language::Uk));
        assert_eq!(rendered.rows[0].balance, "1.000000 (вільно: 1.000000)");
        assert_eq!(rendered.rows[1].symbol, "Всього");
    }
}
