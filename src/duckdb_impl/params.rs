use std::error::Error;
use std::path::PathBuf;

use duckdb::core::{LogicalTypeHandle, LogicalTypeId};
use duckdb::vtab::BindInfo;

use super::bind_info_ffi::{get_named_parameter_i64, get_named_parameter_varchar};
use crate::config::StatsConfig;
use crate::error::StatsError;
use crate::ingest::{Compression, Encoding, read_table_file};
use crate::view::{ViewModel, ViewRequest, render_request};

pub(crate) const RECENT_PARAM: &str = "n";

const SELECTION_PARAMS: [&str; 3] = ["sides", "strategies", "times"];
const CONFIG_PARAMS: [&str; 7] = [
    "side_column",
    "strategy_column",
    "time_column",
    "result_column",
    "date_column",
    "win_label",
    "lose_label",
];

/// Named-parameter lookup; `None` for omitted or NULL.
pub(crate) trait NamedParameters {
    fn varchar(&self, name: &str) -> Result<Option<String>, Box<dyn Error>>;
    fn bigint(&self, name: &str) -> Result<Option<i64>, Box<dyn Error>>;
}

impl NamedParameters for BindInfo {
    fn varchar(&self, name: &str) -> Result<Option<String>, Box<dyn Error>> {
        Ok(get_named_parameter_varchar(self, name)?.into_option())
    }

    fn bigint(&self, name: &str) -> Result<Option<i64>, Box<dyn Error>> {
        Ok(get_named_parameter_i64(self, name)?.into_option())
    }
}

/// Everything one table-function call needs to run the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StatsCall {
    pub path: PathBuf,
    pub encoding: Encoding,
    pub compression: Compression,
    pub config: StatsConfig,
    pub request: ViewRequest,
}

impl StatsCall {
    pub(crate) fn resolve(
        path: String,
        params: &impl NamedParameters,
        with_recent: bool,
    ) -> Result<Self, Box<dyn Error>> {
        let encoding = match non_null_text(params.varchar("encoding")?) {
            None => Encoding::default(),
            Some(raw) => Encoding::parse(&raw)?,
        };
        let compression = match non_null_text(params.varchar("compression")?) {
            None => Compression::default(),
            Some(raw) => Compression::parse(&raw)?,
        };

        let mut config = StatsConfig::default();
        for name in CONFIG_PARAMS {
            if let Some(value) = params.varchar(name)? {
                *config_field(&mut config, name) = value;
            }
        }

        let mut request = ViewRequest::default();
        for name in SELECTION_PARAMS {
            let Some(raw) = params.varchar(name)? else {
                continue;
            };
            let values = Some(parse_selection(name, &raw)?);
            match name {
                "sides" => request.sides = values,
                "strategies" => request.strategies = values,
                _ => request.times = values,
            }
        }
        if with_recent {
            request.recent = params.bigint(RECENT_PARAM)?;
        }
        // Reject a bad `n` at bind time, before the file is read.
        request.recent_n()?;

        Ok(Self {
            path: PathBuf::from(path),
            encoding,
            compression,
            config,
            request,
        })
    }

    pub(crate) fn run(&self) -> Result<ViewModel, StatsError> {
        let table = read_table_file(&self.path, self.encoding, self.compression)?;
        render_request(&table, &self.request, &self.config)
    }
}

fn config_field<'a>(config: &'a mut StatsConfig, name: &str) -> &'a mut String {
    match name {
        "side_column" => &mut config.side_column,
        "strategy_column" => &mut config.strategy_column,
        "time_column" => &mut config.time_column,
        "result_column" => &mut config.result_column,
        "date_column" => &mut config.date_column,
        "win_label" => &mut config.win_label,
        _ => &mut config.lose_label,
    }
}

/// The literal text `null` behaves like SQL NULL.
fn non_null_text(raw: Option<String>) -> Option<String> {
    raw.filter(|value| !value.trim().eq_ignore_ascii_case("null"))
}

/// Parses a JSON array of selected values, e.g. `'["▲","△"]'`.
pub(crate) fn parse_selection(
    parameter: &'static str,
    raw: &str,
) -> Result<Vec<String>, StatsError> {
    serde_json::from_str(raw).map_err(|source| StatsError::InvalidSelection { parameter, source })
}

pub(crate) fn named_parameters(with_recent: bool) -> Vec<(String, LogicalTypeHandle)> {
    let mut params: Vec<(String, LogicalTypeHandle)> = ["encoding", "compression"]
        .into_iter()
        .chain(SELECTION_PARAMS)
        .chain(CONFIG_PARAMS)
        .map(|name| {
            (
                name.to_string(),
                LogicalTypeHandle::from(LogicalTypeId::Varchar),
            )
        })
        .collect();
    if with_recent {
        params.push((
            RECENT_PARAM.to_string(),
            LogicalTypeHandle::from(LogicalTypeId::Bigint),
        ));
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakeParams {
        varchars: HashMap<&'static str, &'static str>,
        bigints: HashMap<&'static str, i64>,
    }

    impl NamedParameters for FakeParams {
        fn varchar(&self, name: &str) -> Result<Option<String>, Box<dyn Error>> {
            Ok(self.varchars.get(name).map(|v| v.to_string()))
        }

        fn bigint(&self, name: &str) -> Result<Option<i64>, Box<dyn Error>> {
            Ok(self.bigints.get(name).copied())
        }
    }

    fn with_varchars(pairs: &[(&'static str, &'static str)]) -> FakeParams {
        FakeParams {
            varchars: pairs.iter().copied().collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_when_nothing_is_given() {
        let call = StatsCall::resolve("games.csv".to_string(), &FakeParams::default(), true)
            .unwrap();
        assert_eq!(call.path, PathBuf::from("games.csv"));
        assert_eq!(call.encoding, Encoding::Utf8);
        assert_eq!(call.compression, Compression::Plain);
        assert_eq!(call.config, StatsConfig::default());
        assert_eq!(call.request, ViewRequest::default());
    }

    #[test]
    fn test_overrides_are_applied() {
        let mut params = with_varchars(&[
            ("encoding", "shift_jis"),
            ("compression", "ZSTD"),
            ("strategies", r#"["中飛車","四間飛車"]"#),
            ("sides", "[]"),
            ("result_column", "結果"),
            ("win_label", "○"),
        ]);
        params.bigints.insert(RECENT_PARAM, 30);

        let call = StatsCall::resolve("g.csv.zst".to_string(), &params, true).unwrap();
        assert_eq!(call.encoding, Encoding::ShiftJis);
        assert_eq!(call.compression, Compression::Zstd);
        assert_eq!(call.config.result_column, "結果");
        assert_eq!(call.config.win_label, "○");
        assert_eq!(call.config.lose_label, "負け");
        assert_eq!(
            call.request.strategies,
            Some(vec!["中飛車".to_string(), "四間飛車".to_string()])
        );
        assert_eq!(call.request.sides, Some(Vec::new()));
        assert_eq!(call.request.times, None);
        assert_eq!(call.request.recent, Some(30));
    }

    #[test]
    fn test_null_text_means_default() {
        let params = with_varchars(&[("encoding", "NULL"), ("compression", " null ")]);
        let call = StatsCall::resolve("g.csv".to_string(), &params, false).unwrap();
        assert_eq!(call.encoding, Encoding::Utf8);
        assert_eq!(call.compression, Compression::Plain);
    }

    #[test]
    fn test_recent_ignored_without_recent_parameter() {
        let mut params = FakeParams::default();
        params.bigints.insert(RECENT_PARAM, 15);
        let call = StatsCall::resolve("g.csv".to_string(), &params, false).unwrap();
        assert_eq!(call.request.recent, None);
    }

    #[test]
    fn test_invalid_values_fail_with_parameter_named() {
        let err = StatsCall::resolve(
            "g.csv".to_string(),
            &with_varchars(&[("encoding", "latin1")]),
            false,
        )
        .unwrap_err();
        assert!(err.to_string().contains("'latin1'"));

        let err = StatsCall::resolve(
            "g.csv".to_string(),
            &with_varchars(&[("compression", "gzip")]),
            false,
        )
        .unwrap_err();
        assert!(err.to_string().contains("'gzip'"));

        let err = StatsCall::resolve(
            "g.csv".to_string(),
            &with_varchars(&[("times", "10分")]),
            false,
        )
        .unwrap_err();
        assert!(err.to_string().contains("times"));

        let mut params = FakeParams::default();
        params.bigints.insert(RECENT_PARAM, 25);
        let err = StatsCall::resolve("g.csv".to_string(), &params, true).unwrap_err();
        assert!(err.to_string().contains("25"));
    }

    #[test]
    fn test_parse_selection_rejects_non_string_arrays() {
        assert_eq!(parse_selection("sides", r#"["▲"]"#).unwrap(), ["▲"]);
        assert!(matches!(
            parse_selection("sides", "[1, 2]"),
            Err(StatsError::InvalidSelection { parameter: "sides", .. })
        ));
    }

    #[test]
    fn test_run_reads_file_and_renders() {
        let dir = std::env::temp_dir().join(format!("swars_stats_params_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("games.csv");
        std::fs::write(
            &path,
            "先後,対象の戦法,持ち時間,勝敗\n▲,中飛車,3分,勝ち\n△,中飛車,3分,負け\n",
        )
        .unwrap();

        let params = with_varchars(&[("sides", r#"["▲"]"#)]);
        let call = StatsCall::resolve(path.to_string_lossy().into_owned(), &params, false).unwrap();
        let view = call.run().unwrap();
        let filtered = view.filtered.unwrap();
        assert_eq!(filtered.rows.len(), 1);
        assert_eq!(filtered.metrics.win, 1);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
