use serde::Serialize;

use crate::config::OutcomeLabels;
use crate::types::Row;

/// Win/loss counts of a set of games. `total` only counts wins and losses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Metrics {
    pub win: u64,
    pub lose: u64,
    pub total: u64,
    pub win_rate: f64,
}

/// One dashboard summary card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricCard {
    pub label: &'static str,
    pub value: String,
}

impl Metrics {
    pub fn cards(&self) -> [MetricCard; 3] {
        [
            MetricCard {
                label: "対局数",
                value: format!("{} 局", self.total),
            },
            MetricCard {
                label: "勝率",
                value: format!("{:.1} %", self.win_rate),
            },
            MetricCard {
                label: "勝ち/負け",
                value: format!("{}勝 / {}敗", self.win, self.lose),
            },
        ]
    }
}

/// Percentage of wins among decided games; 0.0 when nothing was decided.
pub fn win_rate(win: u64, total: u64) -> f64 {
    if total > 0 {
        win as f64 / total as f64 * 100.0
    } else {
        0.0
    }
}

/// Counts exact matches of the win and lose labels in `outcome_column`.
/// Any other value, or a missing column, counts toward neither.
pub fn compute_metrics(
    rows: &[&Row],
    outcome_column: Option<usize>,
    labels: OutcomeLabels<'_>,
) -> Metrics {
    let mut win = 0;
    let mut lose = 0;
    for outcome in rows.iter().filter_map(|row| row.get(outcome_column)) {
        if outcome == labels.win {
            win += 1;
        } else if outcome == labels.lose {
            lose += 1;
        }
    }

    let total = win + lose;
    Metrics {
        win,
        lose,
        total,
        win_rate: win_rate(win, total),
    }
}
