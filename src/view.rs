use serde::{Deserialize, Serialize};

use crate::config::StatsConfig;
use crate::crosstab::{OutcomeRow, summarize_by_strategy};
use crate::error::StatsError;
use crate::filter::filter_rows;
use crate::ingest::{Encoding, load_table};
use crate::metrics::{MetricCard, Metrics, compute_metrics};
use crate::options::derive_options;
use crate::recency::{RecencyOrder, recent_rows};
use crate::types::{Dimension, FilterOptions, FilterSelection, GameRecordTable, RecentN, Row};

pub const UPLOAD_PROMPT: &str = "← サイドバーからCSVファイルをアップロードしてください。";
pub const NO_MATCHING_DATA: &str =
    "選択された条件に該当するデータがありません。フィルターを調整してください。";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    UploadPrompt,
    NoMatchingData,
}

impl Notice {
    pub fn message(self) -> &'static str {
        match self {
            Self::UploadPrompt => UPLOAD_PROMPT,
            Self::NoMatchingData => NO_MATCHING_DATA,
        }
    }
}

/// Serializes a [`Notice`] together with its display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoticeView(pub Notice);

impl Serialize for NoticeView {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("Notice", 2)?;
        state.serialize_field("kind", &self.0)?;
        state.serialize_field("message", self.0.message())?;
        state.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub metrics: Metrics,
    pub cards: [MetricCard; 3],
    pub rows: Vec<Row>,
}

impl Section {
    fn new(metrics: Metrics, rows: Vec<Row>) -> Self {
        Self {
            cards: metrics.cards(),
            metrics,
            rows,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentSection {
    pub n: RecentN,
    pub order: RecencyOrder,
    pub diagnostics: Option<String>,
    #[serde(flatten)]
    pub section: Section,
}

/// Everything the dashboard shows for one set of inputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub columns: Vec<String>,
    pub options: FilterOptions,
    pub selection: FilterSelection,
    pub filtered: Option<Section>,
    pub recent: Option<RecentSection>,
    pub by_strategy: Vec<OutcomeRow>,
    pub notice: Option<NoticeView>,
}

impl ViewModel {
    /// Initial state before any file is supplied.
    pub fn upload_prompt() -> Self {
        Self {
            columns: Vec::new(),
            options: FilterOptions::default(),
            selection: FilterSelection::default(),
            filtered: None,
            recent: None,
            by_strategy: Vec::new(),
            notice: Some(NoticeView(Notice::UploadPrompt)),
        }
    }

    pub fn to_json(&self) -> Result<String, StatsError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// User input of one dashboard interaction. `None` keeps the default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewRequest {
    pub sides: Option<Vec<String>>,
    pub strategies: Option<Vec<String>>,
    pub times: Option<Vec<String>>,
    pub recent: Option<i64>,
}

impl ViewRequest {
    pub fn from_json(raw: &str) -> Result<Self, StatsError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Starts from "everything selected" and applies the overrides.
    pub fn selection(&self, options: &FilterOptions) -> FilterSelection {
        let mut selection = FilterSelection::all(options);
        for (dimension, values) in [
            (Dimension::Side, &self.sides),
            (Dimension::Strategy, &self.strategies),
            (Dimension::TimeControl, &self.times),
        ] {
            if let Some(values) = values {
                selection.set(dimension, values.clone());
            }
        }
        selection
    }

    pub fn recent_n(&self) -> Result<RecentN, StatsError> {
        self.recent.map_or(Ok(RecentN::default()), RecentN::try_from)
    }
}

/// Runs filter, metrics, recency and cross-tab over an already loaded table.
pub fn render(
    table: &GameRecordTable,
    selection: &FilterSelection,
    recent_n: RecentN,
    config: &StatsConfig,
) -> ViewModel {
    let options = derive_options(table, config);
    let filtered = filter_rows(table, selection, config);

    let mut view = ViewModel {
        columns: table.columns.clone(),
        options,
        selection: selection.clone(),
        filtered: None,
        recent: None,
        by_strategy: Vec::new(),
        notice: None,
    };

    if filtered.is_empty() {
        view.notice = Some(NoticeView(Notice::NoMatchingData));
        return view;
    }

    let outcome_column = table.column_index(&config.result_column);
    let labels = config.labels();

    let date_column = table
        .column_index(&config.date_column)
        .map(|idx| (idx, config.date_column.as_str()));
    let window = recent_rows(&filtered, recent_n, date_column);

    view.recent = Some(RecentSection {
        n: window.n,
        order: window.order,
        diagnostics: window.diagnostics,
        section: Section::new(
            compute_metrics(&window.rows, outcome_column, labels),
            owned_rows(&window.rows),
        ),
    });
    view.by_strategy = summarize_by_strategy(
        &filtered,
        table.column_index(&config.strategy_column),
        outcome_column,
        labels,
    );
    view.filtered = Some(Section::new(
        compute_metrics(&filtered, outcome_column, labels),
        owned_rows(&filtered),
    ));
    view
}

fn owned_rows(rows: &[&Row]) -> Vec<Row> {
    rows.iter().map(|row| (*row).clone()).collect()
}

/// Full pipeline from an optional upload. No upload is the prompt state,
/// not an error.
pub fn render_upload(
    upload: Option<&[u8]>,
    encoding: Encoding,
    request: &ViewRequest,
    config: &StatsConfig,
) -> Result<ViewModel, StatsError> {
    let Some(bytes) = upload else {
        return Ok(ViewModel::upload_prompt());
    };

    let recent_n = request.recent_n()?;
    let table = load_table(bytes, encoding)?;
    Ok(render_with(&table, request, recent_n, config))
}

/// Renders a loaded table for one request.
pub fn render_request(
    table: &GameRecordTable,
    request: &ViewRequest,
    config: &StatsConfig,
) -> Result<ViewModel, StatsError> {
    let recent_n = request.recent_n()?;
    Ok(render_with(table, request, recent_n, config))
}

fn render_with(
    table: &GameRecordTable,
    request: &ViewRequest,
    recent_n: RecentN,
    config: &StatsConfig,
) -> ViewModel {
    let selection = request.selection(&derive_options(table, config));
    render(table, &selection, recent_n, config)
}
