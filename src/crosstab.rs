use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::OutcomeLabels;
use crate::metrics::win_rate;
use crate::types::Row;

/// One line of the per-strategy table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeRow {
    pub strategy: String,
    pub win: u64,
    pub lose: u64,
    pub total: u64,
    /// e.g. `"66.7%"`; `"0.0%"` when the group has no decided games.
    pub win_rate: String,
    /// Rows in the group, including draws and other outcomes.
    pub games: u64,
}

#[derive(Default)]
struct Tally {
    win: u64,
    lose: u64,
    games: u64,
}

/// Strategy × outcome cross-tabulation, ordered by strategy label.
pub fn summarize_by_strategy(
    rows: &[&Row],
    strategy_column: Option<usize>,
    outcome_column: Option<usize>,
    labels: OutcomeLabels<'_>,
) -> Vec<OutcomeRow> {
    let mut groups: BTreeMap<&str, Tally> = BTreeMap::new();
    for row in rows {
        let Some(strategy) = row.get(strategy_column) else {
            continue;
        };

        let tally = groups.entry(strategy).or_default();
        tally.games += 1;
        match row.get(outcome_column) {
            Some(outcome) if outcome == labels.win => tally.win += 1,
            Some(outcome) if outcome == labels.lose => tally.lose += 1,
            _ => {}
        }
    }

    groups
        .into_iter()
        .map(|(strategy, tally)| {
            let total = tally.win + tally.lose;
            OutcomeRow {
                strategy: strategy.to_string(),
                win: tally.win,
                lose: tally.lose,
                total,
                win_rate: format_percent(win_rate(tally.win, total)),
                games: tally.games,
            }
        })
        .collect()
}

fn format_percent(rate: f64) -> String {
    format!("{rate:.1}%")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StatsConfig;

    const STRATEGY: Option<usize> = Some(0);
    const OUTCOME: Option<usize> = Some(1);

    fn rows(games: &[(&str, &str)]) -> Vec<Row> {
        games
            .iter()
            .map(|(strategy, outcome)| Row::new(vec![strategy.to_string(), outcome.to_string()]))
            .collect()
    }

    #[test]
    fn test_loss_only_group_is_zero_percent() {
        let config = StatsConfig::default();
        let rows = rows(&[("中飛車", "負け"), ("中飛車", "負け"), ("中飛車", "負け")]);
        let refs: Vec<&Row> = rows.iter().collect();

        let summary = summarize_by_strategy(&refs, STRATEGY, OUTCOME, config.labels());
        assert_eq!(
            summary,
            [OutcomeRow {
                strategy: "中飛車".to_string(),
                win: 0,
                lose: 3,
                total: 3,
                win_rate: "0.0%".to_string(),
                games: 3,
            }]
        );
    }

    #[test]
    fn test_groups_sorted_by_label_with_totals_matching_counts() {
        let config = StatsConfig::default();
        let rows = rows(&[
            ("四間飛車", "勝ち"),
            ("中飛車", "勝ち"),
            ("四間飛車", "負け"),
            ("四間飛車", "勝ち"),
            ("中飛車", "負け"),
        ]);
        let refs: Vec<&Row> = rows.iter().collect();

        let summary = summarize_by_strategy(&refs, STRATEGY, OUTCOME, config.labels());
        let labels: Vec<&str> = summary.iter().map(|row| row.strategy.as_str()).collect();
        let mut sorted = labels.clone();
        sorted.sort();
        assert_eq!(labels, sorted);

        for row in &summary {
            let count = refs
                .iter()
                .filter(|r| r.get(STRATEGY) == Some(row.strategy.as_str()))
                .count() as u64;
            assert_eq!(row.total, count);
            assert_eq!(row.games, count);
        }

        let shikenbisha = summary.iter().find(|r| r.strategy == "四間飛車").unwrap();
        assert_eq!((shikenbisha.win, shikenbisha.lose), (2, 1));
        assert_eq!(shikenbisha.win_rate, "66.7%");
    }

    #[test]
    fn test_group_without_decided_games_is_zero_percent() {
        let config = StatsConfig::default();
        let rows = rows(&[("角換わり", "引き分け")]);
        let refs: Vec<&Row> = rows.iter().collect();

        let summary = summarize_by_strategy(&refs, STRATEGY, OUTCOME, config.labels());
        assert_eq!(summary[0].total, 0);
        assert_eq!(summary[0].games, 1);
        assert_eq!(summary[0].win_rate, "0.0%");
    }

    #[test]
    fn test_missing_strategy_column_is_empty() {
        let config = StatsConfig::default();
        let rows = rows(&[("中飛車", "勝ち")]);
        let refs: Vec<&Row> = rows.iter().collect();

        assert!(summarize_by_strategy(&refs, None, OUTCOME, config.labels()).is_empty());
    }

    #[test]
    fn test_missing_outcome_column_counts_games_only() {
        let config = StatsConfig::default();
        let rows = rows(&[("中飛車", "勝ち"), ("中飛車", "負け")]);
        let refs: Vec<&Row> = rows.iter().collect();

        let summary = summarize_by_strategy(&refs, STRATEGY, None, config.labels());
        assert_eq!((summary[0].win, summary[0].lose, summary[0].games), (0, 0, 2));
    }

    #[test]
    fn test_format_percent_rounds_to_one_decimal() {
        assert_eq!(format_percent(50.0), "50.0%");
        assert_eq!(format_percent(100.0 / 3.0), "33.3%");
        assert_eq!(format_percent(0.0), "0.0%");
    }
}
