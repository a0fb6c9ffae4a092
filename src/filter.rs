use crate::config::StatsConfig;
use crate::types::{Dimension, FilterSelection, GameRecordTable, Row};

/// Rows matching every dimension of `selection`, in table order.
///
/// Within a dimension any selected value matches; across dimensions all must
/// match. An empty selection, or a filter column absent from the table,
/// matches no rows.
pub fn filter_rows<'a>(
    table: &'a GameRecordTable,
    selection: &FilterSelection,
    config: &StatsConfig,
) -> Vec<&'a Row> {
    let criteria: Vec<(Option<usize>, &[String])> = Dimension::ALL
        .iter()
        .map(|&dimension| {
            (
                table.column_index(config.column_for(dimension)),
                selection.get(dimension),
            )
        })
        .collect();

    table
        .rows
        .iter()
        .filter(|row| {
            criteria.iter().all(|(column, selected)| match row.get(*column) {
                Some(value) => selected.iter().any(|s| s == value),
                None => false,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{Encoding, load_table};
    use crate::options::derive_options;

    const GAMES: &str = "先後,対象の戦法,持ち時間,勝敗\n\
                         ▲,四間飛車,10分,勝ち\n\
                         △,四間飛車,10分,負け\n\
                         ▲,中飛車,3分,勝ち\n\
                         △,中飛車,10分,負け\n\
                         ▲,四間飛車,3分,負け\n";

    fn table() -> GameRecordTable {
        load_table(GAMES.as_bytes(), Encoding::Utf8).unwrap()
    }

    fn values(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_default_selection_keeps_every_row() {
        let table = table();
        let config = StatsConfig::default();
        let selection = FilterSelection::all(&derive_options(&table, &config));

        let rows = filter_rows(&table, &selection, &config);
        assert_eq!(rows.len(), table.rows.len());
        assert!(rows.iter().zip(table.rows.iter()).all(|(a, b)| *a == b));
    }

    #[test]
    fn test_and_across_dimensions_or_within() {
        let table = table();
        let config = StatsConfig::default();
        let selection = FilterSelection {
            sides: values(&["▲"]),
            strategies: values(&["四間飛車", "中飛車"]),
            times: values(&["10分"]),
        };

        let rows = filter_rows(&table, &selection, &config);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cells(), ["▲", "四間飛車", "10分", "勝ち"]);
    }

    #[test]
    fn test_result_is_ordered_subset_satisfying_selection() {
        let table = table();
        let config = StatsConfig::default();
        let selection = FilterSelection {
            sides: values(&["▲", "△"]),
            strategies: values(&["四間飛車"]),
            times: values(&["10分", "3分"]),
        };

        let rows = filter_rows(&table, &selection, &config);
        let positions: Vec<usize> = rows
            .iter()
            .map(|row| table.rows.iter().position(|r| r == *row).unwrap())
            .collect();
        assert_eq!(positions, [0, 1, 4]);
        for row in rows {
            assert!(selection.sides.iter().any(|v| Some(v.as_str()) == row.get(Some(0))));
            assert!(selection.strategies.iter().any(|v| Some(v.as_str()) == row.get(Some(1))));
            assert!(selection.times.iter().any(|v| Some(v.as_str()) == row.get(Some(2))));
        }
    }

    #[test]
    fn test_empty_selection_in_any_dimension_matches_nothing() {
        let table = table();
        let config = StatsConfig::default();
        let mut selection = FilterSelection::all(&derive_options(&table, &config));
        selection.set(Dimension::TimeControl, Vec::new());

        assert!(filter_rows(&table, &selection, &config).is_empty());
    }

    #[test]
    fn test_missing_filter_column_matches_nothing() {
        let table = load_table("先後,勝敗\n▲,勝ち\n".as_bytes(), Encoding::Utf8).unwrap();
        let config = StatsConfig::default();
        let selection = FilterSelection {
            sides: values(&["▲"]),
            strategies: values(&["四間飛車"]),
            times: values(&["10分"]),
        };

        assert!(filter_rows(&table, &selection, &config).is_empty());
    }
}
