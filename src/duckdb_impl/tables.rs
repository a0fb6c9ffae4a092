use std::error::Error;
use std::marker::PhantomData;
use std::sync::Mutex;

use duckdb::core::{DataChunkHandle, LogicalTypeHandle, LogicalTypeId};
use duckdb::vtab::{BindInfo, InitInfo, TableFunctionInfo, VTab};

use super::params::{StatsCall, named_parameters};
use super::result_set::{ResultSet, write_page};
use crate::log;
use crate::view::ViewModel;

const PATH_PARAM_INDEX: u64 = 0;

/// One `swars_*` table function: which parameters it takes and how a
/// rendered view becomes rows.
pub(crate) trait StatsTable {
    const WITH_RECENT: bool;

    fn result_set(view: &ViewModel) -> ResultSet;
}

pub(crate) struct GamesTable;
pub(crate) struct RecentTable;
pub(crate) struct SummaryTable;
pub(crate) struct MetricsTable;
pub(crate) struct FilterOptionsTable;

impl StatsTable for GamesTable {
    const WITH_RECENT: bool = false;

    fn result_set(view: &ViewModel) -> ResultSet {
        ResultSet::games(view)
    }
}

impl StatsTable for RecentTable {
    const WITH_RECENT: bool = true;

    fn result_set(view: &ViewModel) -> ResultSet {
        ResultSet::recent(view)
    }
}

impl StatsTable for SummaryTable {
    const WITH_RECENT: bool = false;

    fn result_set(view: &ViewModel) -> ResultSet {
        ResultSet::summary(view)
    }
}

impl StatsTable for MetricsTable {
    const WITH_RECENT: bool = true;

    fn result_set(view: &ViewModel) -> ResultSet {
        ResultSet::metrics(view)
    }
}

impl StatsTable for FilterOptionsTable {
    const WITH_RECENT: bool = false;

    fn result_set(view: &ViewModel) -> ResultSet {
        ResultSet::filter_options(view)
    }
}

#[repr(C)]
pub(crate) struct StatsBindData {
    result: ResultSet,
}

#[repr(C)]
pub(crate) struct StatsInitData {
    next_row: Mutex<usize>,
}

pub(crate) struct StatsVTab<T>(PhantomData<T>);

impl<T: StatsTable> VTab for StatsVTab<T> {
    type InitData = StatsInitData;
    type BindData = StatsBindData;

    fn bind(bind: &BindInfo) -> Result<Self::BindData, Box<dyn Error>> {
        let path = bind.get_parameter(PATH_PARAM_INDEX).to_string();
        let call = StatsCall::resolve(path, bind, T::WITH_RECENT)?;

        // The whole pipeline runs here so the output schema can follow the CSV header.
        let view = call.run()?;
        let result = T::result_set(&view);
        log::debug(format!(
            "{}: {} result rows from '{}'",
            std::any::type_name::<T>(),
            result.rows.len(),
            call.path.display()
        ));

        result.declare_columns(bind);
        Ok(StatsBindData { result })
    }

    fn init(_: &InitInfo) -> Result<Self::InitData, Box<dyn Error>> {
        Ok(StatsInitData {
            next_row: Mutex::new(0),
        })
    }

    fn func(
        func: &TableFunctionInfo<Self>,
        output: &mut DataChunkHandle,
    ) -> Result<(), Box<dyn Error>> {
        let init_data = func.get_init_data();
        let bind_data = func.get_bind_data();

        let mut next_row = init_data
            .next_row
            .lock()
            .map_err(|_| "swars_stats: scan state lock poisoned")?;
        let page = bind_data.result.page(*next_row);
        write_page(output, page)?;
        *next_row += page.len();
        Ok(())
    }

    fn parameters() -> Option<Vec<LogicalTypeHandle>> {
        Some(vec![
            LogicalTypeHandle::from(LogicalTypeId::Varchar), // CSV path (required)
        ])
    }

    fn named_parameters() -> Option<Vec<(String, LogicalTypeHandle)>> {
        Some(named_parameters(T::WITH_RECENT))
    }
}
