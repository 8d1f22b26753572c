mod bar_chart;
mod data_table;
mod line_chart;
mod pie_chart;
pub mod transition;

pub use bar_chart::{BAR_CHART_TAG, BAR_HEIGHT_PX, BarBlock, BarChart, bar_width, parse_bar_values};
pub use data_table::{
    ACTIVE_ROW_CLASS, CellKey, ColumnConfig, DATA_TABLE_TAG, DataTable, TableCell, TableConfig,
    TableRow,
};
pub use line_chart::{LINE_CHART_TAG, LineChart, LineChartConfig, LineChartData, LineSeriesConfig};
pub use pie_chart::{
    LEGEND_ELEMENT_HEIGHT, LegendEntry, PIE_CHART_TAG, PieArc, PieChart, PieChartConfig, PieDatum,
    PieLayout, pie_angles,
};
pub use transition::{ArcAngles, ArcTransition, TRANSITION_DURATION, ease_cubic_in_out};
