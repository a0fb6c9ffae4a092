use std::borrow::Cow;
use std::error::Error;
use std::ffi::CString;

use duckdb::core::{DataChunkHandle, Inserter, LogicalTypeHandle, LogicalTypeId};
use duckdb::vtab::BindInfo;

use crate::types::{Dimension, Row};
use crate::view::ViewModel;

pub(crate) const ROWS_PER_CHUNK: usize = 2048;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum ColumnType {
    Varchar,
    UBigint,
    Double,
}

impl ColumnType {
    fn to_handle(self) -> LogicalTypeHandle {
        match self {
            Self::Varchar => LogicalTypeHandle::from(LogicalTypeId::Varchar),
            Self::UBigint => LogicalTypeHandle::from(LogicalTypeId::UBigint),
            Self::Double => LogicalTypeHandle::from(LogicalTypeId::Double),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ResultColumn {
    pub name: String,
    pub column_type: ColumnType,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Cell {
    Varchar(String),
    UBigint(u64),
    Double(f64),
}

/// A fully materialized table-function result, emitted chunk by chunk.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ResultSet {
    pub columns: Vec<ResultColumn>,
    pub rows: Vec<Vec<Cell>>,
}

impl ResultSet {
    fn with_columns(columns: &[(&str, ColumnType)]) -> Self {
        Self {
            columns: columns
                .iter()
                .map(|(name, column_type)| ResultColumn {
                    name: name.to_string(),
                    column_type: *column_type,
                })
                .collect(),
            rows: Vec::new(),
        }
    }

    /// Source columns as VARCHAR, rows exactly as uploaded. Header names
    /// become C strings at bind, so NULs in them are replaced here.
    pub(crate) fn verbatim(columns: &[String], rows: &[Row]) -> Self {
        Self {
            columns: columns
                .iter()
                .map(|name| ResultColumn {
                    name: sanitize_for_cstring(name).into_owned(),
                    column_type: ColumnType::Varchar,
                })
                .collect(),
            rows: rows
                .iter()
                .map(|row| row.cells().iter().cloned().map(Cell::Varchar).collect())
                .collect(),
        }
    }

    pub(crate) fn games(view: &ViewModel) -> Self {
        let rows = view.filtered.as_ref().map_or(&[][..], |s| &s.rows[..]);
        Self::verbatim(&view.columns, rows)
    }

    pub(crate) fn recent(view: &ViewModel) -> Self {
        let rows = view.recent.as_ref().map_or(&[][..], |r| &r.section.rows[..]);
        Self::verbatim(&view.columns, rows)
    }

    pub(crate) fn summary(view: &ViewModel) -> Self {
        let mut result = Self::with_columns(&[
            ("strategy", ColumnType::Varchar),
            ("win", ColumnType::UBigint),
            ("lose", ColumnType::UBigint),
            ("total", ColumnType::UBigint),
            ("win_rate", ColumnType::Varchar),
        ]);
        result.rows = view
            .by_strategy
            .iter()
            .map(|row| {
                vec![
                    Cell::Varchar(row.strategy.clone()),
                    Cell::UBigint(row.win),
                    Cell::UBigint(row.lose),
                    Cell::UBigint(row.total),
                    Cell::Varchar(row.win_rate.clone()),
                ]
            })
            .collect();
        result
    }

    pub(crate) fn metrics(view: &ViewModel) -> Self {
        let mut result = Self::with_columns(&[
            ("scope", ColumnType::Varchar),
            ("games", ColumnType::UBigint),
            ("win", ColumnType::UBigint),
            ("lose", ColumnType::UBigint),
            ("total", ColumnType::UBigint),
            ("win_rate", ColumnType::Double),
        ]);

        let filtered = view.filtered.as_ref();
        let recent = view.recent.as_ref().map(|r| &r.section);
        for (scope, section) in [("filtered", filtered), ("recent", recent)] {
            let metrics = section.map(|s| s.metrics).unwrap_or_default();
            let games = section.map_or(0, |s| s.rows.len() as u64);
            result.rows.push(vec![
                Cell::Varchar(scope.to_string()),
                Cell::UBigint(games),
                Cell::UBigint(metrics.win),
                Cell::UBigint(metrics.lose),
                Cell::UBigint(metrics.total),
                Cell::Double(metrics.win_rate),
            ]);
        }
        result
    }

    pub(crate) fn filter_options(view: &ViewModel) -> Self {
        let mut result = Self::with_columns(&[
            ("dimension", ColumnType::Varchar),
            ("value", ColumnType::Varchar),
        ]);
        for dimension in Dimension::ALL {
            for value in view.options.get(dimension) {
                result.rows.push(vec![
                    Cell::Varchar(dimension.name().to_string()),
                    Cell::Varchar(value.clone()),
                ]);
            }
        }
        result
    }

    pub(crate) fn declare_columns(&self, bind: &BindInfo) {
        for column in &self.columns {
            bind.add_result_column(&column.name, column.column_type.to_handle());
        }
    }

    /// Rows of the chunk starting at `start`.
    pub(crate) fn page(&self, start: usize) -> &[Vec<Cell>] {
        let start = start.min(self.rows.len());
        let end = (start + ROWS_PER_CHUNK).min(self.rows.len());
        &self.rows[start..end]
    }
}

pub(crate) fn sanitize_for_cstring(value: &str) -> Cow<'_, str> {
    if value.contains('\0') {
        Cow::Owned(value.replace('\0', " "))
    } else {
        Cow::Borrowed(value)
    }
}

/// Writes one page of rows into a DuckDB output chunk and sets its length.
pub(crate) fn write_page(
    output: &mut DataChunkHandle,
    rows: &[Vec<Cell>],
) -> Result<(), Box<dyn Error>> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            let mut vector = output.flat_vector(col_idx);
            match cell {
                Cell::Varchar(value) => {
                    vector.insert(row_idx, CString::new(sanitize_for_cstring(value).as_ref())?);
                }
                Cell::UBigint(value) => vector.as_mut_slice::<u64>()[row_idx] = *value,
                Cell::Double(value) => vector.as_mut_slice::<f64>()[row_idx] = *value,
            }
        }
    }
    output.set_len(rows.len());
    Ok(())
}
