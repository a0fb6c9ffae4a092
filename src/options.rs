use crate::config::StatsConfig;
use crate::log;
use crate::types::{Dimension, FilterOptions, GameRecordTable};

/// Distinct values of each filter column, in first-appearance order.
/// A column missing from the table yields no options.
pub fn derive_options(table: &GameRecordTable, config: &StatsConfig) -> FilterOptions {
    FilterOptions {
        sides: distinct_values(table, config.column_for(Dimension::Side)),
        strategies: distinct_values(table, config.column_for(Dimension::Strategy)),
        times: distinct_values(table, config.column_for(Dimension::TimeControl)),
    }
}

fn distinct_values(table: &GameRecordTable, column: &str) -> Vec<String> {
    let Some(idx) = table.column_index(column) else {
        log::info(format!("column '{column}' not found; no filter options"));
        return Vec::new();
    };

    let mut values: Vec<String> = Vec::new();
    for value in table.rows.iter().filter_map(|row| row.get(Some(idx))) {
        if !values.iter().any(|seen| seen == value) {
            values.push(value.to_string());
        }
    }
    values
}
