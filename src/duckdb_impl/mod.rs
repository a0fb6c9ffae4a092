mod bind_info_ffi;
mod params;
mod render;
mod result_set;
mod scalar;
mod tables;

pub(crate) use render::SwarsViewJsonScalar;
pub(crate) use tables::{
    FilterOptionsTable, GamesTable, MetricsTable, RecentTable, StatsVTab, SummaryTable,
};
