use crate::types::Dimension;

pub const DEFAULT_SIDE_COLUMN: &str = "先後";
pub const DEFAULT_STRATEGY_COLUMN: &str = "対象の戦法";
pub const DEFAULT_TIME_COLUMN: &str = "持ち時間";
pub const DEFAULT_RESULT_COLUMN: &str = "勝敗";
pub const DEFAULT_DATE_COLUMN: &str = "対局日時";

pub const DEFAULT_WIN_LABEL: &str = "勝ち";
pub const DEFAULT_LOSE_LABEL: &str = "負け";

/// Column names and outcome labels used by one pipeline run.
///
/// The defaults match the shogi-extend CSV export. Every field can be
/// overridden per call; nothing here is read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsConfig {
    pub side_column: String,
    pub strategy_column: String,
    pub time_column: String,
    pub result_column: String,
    pub date_column: String,
    pub win_label: String,
    pub lose_label: String,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            side_column: DEFAULT_SIDE_COLUMN.to_string(),
            strategy_column: DEFAULT_STRATEGY_COLUMN.to_string(),
            time_column: DEFAULT_TIME_COLUMN.to_string(),
            result_column: DEFAULT_RESULT_COLUMN.to_string(),
            date_column: DEFAULT_DATE_COLUMN.to_string(),
            win_label: DEFAULT_WIN_LABEL.to_string(),
            lose_label: DEFAULT_LOSE_LABEL.to_string(),
        }
    }
}

impl StatsConfig {
    pub fn column_for(&self, dimension: Dimension) -> &str {
        match dimension {
            Dimension::Side => &self.side_column,
            Dimension::Strategy => &self.strategy_column,
            Dimension::TimeControl => &self.time_column,
        }
    }

    /// Returns an [`OutcomeLabels`] view borrowing this config.
    pub fn labels(&self) -> OutcomeLabels<'_> {
        OutcomeLabels {
            win: &self.win_label,
            lose: &self.lose_label,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutcomeLabels<'a> {
    pub win: &'a str,
    pub lose: &'a str,
}
