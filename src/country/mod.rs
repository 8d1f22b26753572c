//! Country history page: bundled country picker, per-country history fetch
//! and the line chart fed from it.

mod history;
mod list;
mod page;

pub use history::{
    CountryHistory, HISTORY_BASE_URL, HistoryEntry, HistorySource, HistoryStatus, HistorySummary,
    HttpHistorySource, StatusTotals, format_history_date,
};
pub use list::{COUNTRIES, Country, find_by_code, find_by_name, partition_columns, search};
pub use page::{CountryPage, LOADING_LABEL, PICKER_COLUMNS};
