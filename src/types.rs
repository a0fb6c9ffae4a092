use serde::{Deserialize, Serialize};

use crate::error::StatsError;

/// One CSV record; cells are positional and kept as their exact source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Row {
    cells: Vec<String>,
}

impl Row {
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    /// Reads the cell at a column resolved with [`GameRecordTable::column_index`].
    /// An absent column reads as `None`.
    pub fn get(&self, column: Option<usize>) -> Option<&str> {
        column.and_then(|idx| self.cells.get(idx)).map(String::as_str)
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }
}

/// Uploaded game history, column names and row order exactly as in the CSV.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameRecordTable {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl GameRecordTable {
    /// First column with this exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dimension {
    Side,
    Strategy,
    TimeControl,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Dimension::Side, Dimension::Strategy, Dimension::TimeControl];

    /// Short name used in SQL output and named parameters.
    pub fn name(self) -> &'static str {
        match self {
            Self::Side => "side",
            Self::Strategy => "strategy",
            Self::TimeControl => "time",
        }
    }
}

/// Distinct observed values per dimension, in first-appearance order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub sides: Vec<String>,
    pub strategies: Vec<String>,
    pub times: Vec<String>,
}

impl FilterOptions {
    pub fn get(&self, dimension: Dimension) -> &[String] {
        match dimension {
            Dimension::Side => &self.sides,
            Dimension::Strategy => &self.strategies,
            Dimension::TimeControl => &self.times,
        }
    }
}

/// Values the user currently has selected. An empty list selects nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub sides: Vec<String>,
    pub strategies: Vec<String>,
    pub times: Vec<String>,
}

impl FilterSelection {
    /// Selects every observed value; the initial dashboard state.
    pub fn all(options: &FilterOptions) -> Self {
        Self {
            sides: options.sides.clone(),
            strategies: options.strategies.clone(),
            times: options.times.clone(),
        }
    }

    pub fn get(&self, dimension: Dimension) -> &[String] {
        match dimension {
            Dimension::Side => &self.sides,
            Dimension::Strategy => &self.strategies,
            Dimension::TimeControl => &self.times,
        }
    }

    pub fn set(&mut self, dimension: Dimension, values: Vec<String>) {
        match dimension {
            Dimension::Side => self.sides = values,
            Dimension::Strategy => self.strategies = values,
            Dimension::TimeControl => self.times = values,
        }
    }
}

/// Size of the recency window; one of 10, 20, 30, 40, 50.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RecentN(usize);

impl RecentN {
    pub const CHOICES: [usize; 5] = [10, 20, 30, 40, 50];

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for RecentN {
    fn default() -> Self {
        Self(10)
    }
}

impl TryFrom<i64> for RecentN {
    type Error = StatsError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::CHOICES
            .iter()
            .copied()
            .find(|choice| *choice as i64 == value)
            .map(Self)
            .ok_or(StatsError::InvalidRecentCount(value))
    }
}
