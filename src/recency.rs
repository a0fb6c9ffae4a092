use chrono::NaiveDateTime;
use serde::Serialize;

use crate::datetime::parse_timestamp;
use crate::error::ErrorAccumulator;
use crate::log;
use crate::types::{RecentN, Row};

/// How the recency window was ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "column", rename_all = "snake_case")]
pub enum RecencyOrder {
    /// Newest first by the parsed timestamps of this column.
    ByColumn(String),
    /// No usable date column; the first rows are taken as the newest.
    Positional,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecencyWindow<'a> {
    pub n: RecentN,
    pub order: RecencyOrder,
    pub rows: Vec<&'a Row>,
    /// Date values that could not be parsed, `"; "`-joined.
    pub diagnostics: Option<String>,
}

/// Takes the `n` most recent rows.
///
/// Only the preferred date column is considered. It is used when at least one
/// of its values parses; rows whose value does not parse sort after every
/// dated row and keep their relative order. Otherwise the first `n` rows are
/// returned in their original order.
pub fn recent_rows<'a>(
    rows: &[&'a Row],
    n: RecentN,
    date_column: Option<(usize, &str)>,
) -> RecencyWindow<'a> {
    let mut diagnostics = ErrorAccumulator::default();

    if let Some((idx, name)) = date_column {
        let timestamps: Vec<Option<NaiveDateTime>> = rows
            .iter()
            .map(|row| {
                let raw = row.get(Some(idx)).unwrap_or_default();
                parse_timestamp(raw).unwrap_or_else(|reason| {
                    diagnostics.push(format!("Conversion error: {name}='{raw}' ({reason})"));
                    None
                })
            })
            .collect();

        if !diagnostics.is_empty() {
            log::warn(format!(
                "{} value(s) in '{name}' could not be parsed as dates",
                diagnostics.len()
            ));
        }

        if timestamps.iter().any(Option::is_some) {
            let mut ordered: Vec<(Option<NaiveDateTime>, &'a Row)> =
                timestamps.into_iter().zip(rows.iter().copied()).collect();
            // `None < Some(_)`, so a stable descending sort puts undated rows last.
            ordered.sort_by(|left, right| right.0.cmp(&left.0));

            return RecencyWindow {
                n,
                order: RecencyOrder::ByColumn(name.to_string()),
                rows: ordered
                    .into_iter()
                    .take(n.get())
                    .map(|(_, row)| row)
                    .collect(),
                diagnostics: diagnostics.finish(),
            };
        }

        log::info(format!(
            "no parseable dates in '{name}'; using original row order"
        ));
    }

    RecencyWindow {
        n,
        order: RecencyOrder::Positional,
        rows: rows.iter().take(n.get()).copied().collect(),
        diagnostics: diagnostics.finish(),
    }
}
