//! Translation lookup
//!
//! Keys missing from the active table resolve to themselves.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Languages served by the dashboard site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Uk,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Uk];

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Uk => "uk",
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Language::En),
            "uk" => Ok(Language::Uk),
            other => Err(format!("unsupported language '{}' (expected en or uk)", other)),
        }
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

const EN: &[(&str, &str)] = &[
    ("free", "free"),
    ("total", "Total"),
    ("remaining", "Remaining"),
    ("rebalanceTimeReached", "Rebalance time reached"),
    ("rebalancingInProgress", "Rebalancing in progress..."),
    ("rebalanceError", "Rebalance error"),
    ("rebalanceCompleted", "Rebalance completed"),
    ("rebalanceFailed", "Rebalance failed"),
    ("executeRebalance", "Execute rebalance now?"),
    ("rebalancing", "Rebalancing..."),
    ("rebalanceNow", "Rebalance now"),
    ("refreshing", "Refreshing..."),
    ("refreshPortfolio", "Refresh portfolio"),
    ("portfolioRefreshed", "Portfolio refreshed"),
    ("refreshFailed", "Portfolio refresh failed"),
    ("error", "Error"),
    ("startTimer", "Start timer"),
    ("stopTimer", "Stop timer"),
    ("newDefaultInterval", "New default interval"),
    ("nextRebalanceIn", "Next rebalance in"),
    ("sec", "sec"),
    ("paused", "Paused"),
    ("portfolio", "Portfolio"),
    ("lastRebalance", "Last rebalance"),
    ("notifications", "Notifications"),
    ("traderRunning", "Trader running"),
    ("traderStopped", "Trader stopped"),
    ("dryRun", "Dry run"),
    ("liveMode", "Live"),
];

const UK: &[(&str, &str)] = &[
    ("free", "вільно"),
    ("total", "Всього"),
    ("remaining", "Залишилось"),
    ("rebalanceTimeReached", "Час ребалансування настав"),
    ("rebalancingInProgress", "Виконується ребалансування..."),
    ("rebalanceError", "Помилка ребалансування"),
    ("rebalanceCompleted", "Ребалансування завершено"),
    ("rebalanceFailed", "Ребалансування не вдалося"),
    ("executeRebalance", "Виконати ребалансування зараз?"),
    ("rebalancing", "Ребалансування..."),
    ("rebalanceNow", "Ребалансувати зараз"),
    ("refreshing", "Оновлення..."),
    ("refreshPortfolio", "Оновити портфель"),
    ("portfolioRefreshed", "Портфель оновлено"),
    ("refreshFailed", "Не вдалося оновити портфель"),
    ("error", "Помилка"),
    ("startTimer", "Запустити таймер"),
    ("stopTimer", "Зупинити таймер"),
    ("newDefaultInterval", "Новий інтервал за замовчуванням"),
    ("nextRebalanceIn", "Наступне ребалансування через"),
    ("sec", "с"),
    ("paused", "Пауза"),
    ("portfolio", "Портфель"),
    ("lastRebalance", "Останнє ребалансування"),
    ("notifications", "Сповіщення"),
    ("traderRunning", "Трейдер працює"),
    ("traderStopped", "Трейдер зупинено"),
    ("dryRun", "Тестовий режим"),
    ("liveMode", "Реальні операції"),
];

#[derive(Debug, Clone, Default)]
pub struct Translations {
    table: HashMap<String, String>,
}

impl Translations {
    pub fn for_language(language: Language) -> Self {
        let source = match language {
            Language::En => EN,
            Language::Uk => UK,
        };
        Self {
            table: source
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Resolve `key`, falling back to the key itself.
    pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
        self.table.get(key).map(String::as_str).unwrap_or(key)
    }
}

/// Path the site serves in `language`, e.g. `/en/dashboard/` -> `/uk/dashboard/`.
///
/// An existing language prefix is replaced rather than nested.
pub fn language_prefixed_path(language: Language, path: &str) -> String {
    let mut parts: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    if parts
        .first()
        .is_some_and(|first| Language::ALL.iter().any(|l| l.code() == *first))
    {
        parts.remove(0);
    }
    let mut prefixed = format!("/{}/{}", language.code(), parts.join("/"));
    if prefixed.ends_with("//") {
        prefixed.pop();
    }
    prefixed
}
