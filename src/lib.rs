mod config;
mod crosstab;
mod datetime;
mod duckdb_impl;
mod error;
mod filter;
mod ingest;
mod log;
mod metrics;
mod options;
mod recency;
mod types;
mod view;

use duckdb::{Connection, Result};
use duckdb_ext_macros::duckdb_extension;
use duckdb_impl::{
    FilterOptionsTable, GamesTable, MetricsTable, RecentTable, StatsVTab, SummaryTable,
    SwarsViewJsonScalar,
};
use std::error::Error;

#[duckdb_extension(name = "swars_stats", api_version = "v1.0.0")]
pub unsafe fn extension_entrypoint(con: Connection) -> Result<(), Box<dyn Error>> {
    // Table functions
    con.register_table_function::<StatsVTab<GamesTable>>("swars_games")?;
    con.register_table_function::<StatsVTab<RecentTable>>("swars_recent")?;
    con.register_table_function::<StatsVTab<SummaryTable>>("swars_summary")?;
    con.register_table_function::<StatsVTab<MetricsTable>>("swars_metrics")?;
    con.register_table_function::<StatsVTab<FilterOptionsTable>>("swars_filter_options")?;

    // Scalar functions
    con.register_scalar_function::<SwarsViewJsonScalar>("swars_view_json")?;

    Ok(())
}
