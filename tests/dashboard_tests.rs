use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use covid_dash::api::{
    Dashboard, DashboardConfig, DatasetOrigin, StaticSummarySource, SummarySource,
};
use covid_dash::events::{EventContext, EventListener, WidgetEvent};
use covid_dash::render::NullRenderer;
use covid_dash::widgets::TableCell;
use covid_dash::{DashError, DashResult};
use serde_json::{Value, json};

struct FailingSource;

impl SummarySource for FailingSource {
    fn location(&self) -> &str {
        "https://example.invalid/summary"
    }

    fn fetch(&mut self) -> DashResult<Value> {
        Err(DashError::Fetch("connection refused".to_owned()))
    }
}

fn remote_body() -> Value {
    json!({
        "Global": { "TotalConfirmed": 1000, "TotalDeaths": 100, "TotalRecovered": 300 },
        "Countries": [
            { "Country": "Small", "TotalConfirmed": 10, "TotalDeaths": 1, "TotalRecovered": 2 },
            { "Country": "Large", "TotalConfirmed": 700, "TotalDeaths": 70, "TotalRecovered": 200 },
            { "Country": "Medium", "TotalConfirmed": 290, "TotalDeaths": 29, "TotalRecovered": 98 }
        ],
        "Date": "2020-04-15T10:07:28Z"
    })
}

fn loaded_dashboard() -> Dashboard<StaticSummarySource, Vec<String>> {
    let source = StaticSummarySource::new("test://summary", remote_body());
    let mut dashboard =
        Dashboard::new(DashboardConfig::default(), source, Vec::new()).expect("dashboard");
    assert_eq!(dashboard.load().expect("load"), DatasetOrigin::Remote);
    dashboard
}

fn table_country(dashboard: &Dashboard<StaticSummarySource, Vec<String>>, row: usize) -> String {
    match &dashboard.table().widget().rows()[row].cells[0] {
        TableCell::Text(text) => text.clone(),
        other => panic!("expected text cell, got {other:?}"),
    }
}

fn pie_values<S: SummarySource, A: covid_dash::api::AlertSink>(
    dashboard: &Dashboard<S, A>,
) -> Vec<f64> {
    dashboard
        .pie()
        .widget()
        .arcs()
        .iter()
        .map(|arc| arc.value)
        .collect()
}

#[derive(Clone, Default)]
struct RecordingListener {
    seen: Rc<RefCell<Vec<(String, Option<String>, bool)>>>,
}

impl EventListener for RecordingListener {
    fn id(&self) -> &str {
        "recorder"
    }

    fn on_event(&mut self, event: &WidgetEvent, context: &EventContext) {
        let country = event.detail["Country"].as_str().unwrap_or_default().to_owned();
        self.seen
            .borrow_mut()
            .push((country, context.chart_title.clone(), context.reset_visible));
    }
}

#[test]
fn remote_load_sorts_countries_and_feeds_widgets() {
    let dashboard = loaded_dashboard();
    assert!(dashboard.alerts().is_empty());

    let names: Vec<String> = (0..3).map(|row| table_country(&dashboard, row)).collect();
    assert_eq!(names, ["Large", "Medium", "Small"]);
    assert_eq!(dashboard.pie().widget().title(), Some("Global"));
    assert_eq!(pie_values(&dashboard), [1000.0, 100.0, 300.0]);
    assert!(!dashboard.reset_control_visible());
    assert_eq!(dashboard.store().origin(), Some(DatasetOrigin::Remote));
}

#[test]
fn fetch_failure_alerts_and_falls_back_to_static_data() {
    let mut dashboard =
        Dashboard::new(DashboardConfig::default(), FailingSource, Vec::new()).expect("dashboard");
    assert_eq!(dashboard.load().expect("load"), DatasetOrigin::StaticFallback);

    let alerts = dashboard.alerts();
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].starts_with("Error when loading data from https://example.invalid/summary"));
    assert!(alerts[0].ends_with("Loading static data instead."));
    assert!(alerts[0].contains("connection refused"));

    assert_eq!(pie_values(&dashboard), [2_000_464.0, 112_924.0, 533_504.0]);
    let rows = dashboard.table().widget().rows();
    assert!(rows.len() > 10);
    assert!(matches!(&rows[0].cells[0], TableCell::Text(name) if name == "US"));

    let mut renderer = NullRenderer::default();
    dashboard.render(&mut renderer).expect("render");
    assert_eq!(renderer.frames_rendered, 1);
    assert_eq!(renderer.last_arc_count, 3);
}

#[test]
fn body_without_global_is_treated_like_a_failed_fetch() {
    let mut body = remote_body();
    body.as_object_mut().expect("object").remove("Global");
    let source = StaticSummarySource::new("test://summary", body);
    let mut dashboard =
        Dashboard::new(DashboardConfig::default(), source, Vec::new()).expect("dashboard");

    assert_eq!(dashboard.load().expect("load"), DatasetOrigin::StaticFallback);
    assert_eq!(dashboard.alerts().len(), 1);
    assert!(dashboard.alerts()[0].contains("missing `Global`"));
    dashboard.build_render_frame().expect("frame").validate().expect("valid");
}

#[test]
fn row_click_redirects_pie_and_shows_reset() {
    let mut dashboard = loaded_dashboard();
    dashboard.click_row(1).expect("click");

    assert_eq!(dashboard.pie().widget().title(), Some("Medium"));
    assert_eq!(pie_values(&dashboard), [290.0, 29.0, 98.0]);
    assert!(dashboard.reset_control_visible());
    assert_eq!(dashboard.selected_row(), Some(1));
    assert!(dashboard.pie().widget().is_animating());

    dashboard.tick(Duration::from_secs(1));
    assert!(!dashboard.pie().widget().is_animating());
}

#[test]
fn reset_restores_global_and_clears_selection() {
    let mut dashboard = loaded_dashboard();
    dashboard.click_row(0).expect("click");
    assert!(dashboard.table().widget().rows()[0].active);

    dashboard.reset_selection().expect("reset");
    assert_eq!(dashboard.pie().widget().title(), Some("Global"));
    assert_eq!(pie_values(&dashboard), [1000.0, 100.0, 300.0]);
    assert!(!dashboard.reset_control_visible());
    assert_eq!(dashboard.selected_row(), None);
    assert!(dashboard.table().widget().rows().iter().all(|row| !row.active));
}

#[test]
fn reset_before_load_reports_missing_dataset() {
    let source = StaticSummarySource::new("test://summary", remote_body());
    let mut dashboard =
        Dashboard::new(DashboardConfig::default(), source, Vec::new()).expect("dashboard");
    assert!(matches!(dashboard.reset_selection(), Err(DashError::NotLoaded)));
}

#[test]
fn out_of_range_click_is_rejected() {
    let mut dashboard = loaded_dashboard();
    let err = dashboard.click_row(3).expect_err("no fourth row");
    assert!(matches!(err, DashError::RowOutOfRange { index: 3, len: 3 }));
    assert!(!dashboard.reset_control_visible());
}

#[test]
fn listeners_observe_events_after_the_dashboard_reacts() {
    let mut dashboard = loaded_dashboard();
    let listener = RecordingListener::default();
    let seen = Rc::clone(&listener.seen);
    dashboard
        .register_listener(Box::new(listener.clone()))
        .expect("register");
    let err = dashboard
        .register_listener(Box::new(listener))
        .expect_err("duplicate id");
    assert!(matches!(err, DashError::DuplicateListener(ref id) if id == "recorder"));

    dashboard.click_row(2).expect("click");
    assert_eq!(
        seen.borrow().as_slice(),
        [("Small".to_owned(), Some("Small".to_owned()), true)]
    );

    assert!(dashboard.unregister_listener("recorder"));
    dashboard.click_row(0).expect("click");
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn container_width_feeds_the_next_pie_update() {
    let mut dashboard = loaded_dashboard();
    assert_eq!(dashboard.pie().widget().layout().width, 400.0);

    dashboard.set_container_width(350.0);
    dashboard.click_row(0).expect("click");
    assert_eq!(dashboard.pie().widget().layout().width, 300.0);
}

#[test]
fn composed_frame_places_pie_right_of_table() {
    let dashboard = loaded_dashboard();
    let table = dashboard.table().render_frame().expect("table frame");
    let pie = dashboard.pie().render_frame().expect("pie frame");
    let frame = dashboard.build_render_frame().expect("frame");
    frame.validate().expect("valid");

    assert_eq!(frame.arcs.len(), 3);
    assert!(frame.arcs.iter().all(|arc| arc.cx > f64::from(table.viewport.width)));
    assert!(frame.viewport.width > table.viewport.width);
    assert_eq!(
        frame.primitive_count(),
        table.primitive_count() + pie.primitive_count()
    );
}

#[test]
fn invalid_config_is_rejected_up_front() {
    let config = DashboardConfig::default().with_container_width(f64::NAN);
    let result = Dashboard::new(config, FailingSource, Vec::new());
    assert!(matches!(result, Err(DashError::InvalidData(_))));
}

fn body_with_deaths(deaths: Value) -> Value {
    json!({
        "Global": {
            "TotalConfirmed": 2_000_000,
            "TotalDeaths": 400_000,
            "TotalRecovered": 200_000
        },
        "Countries": [
            {
                "Country": "Textland",
                "TotalConfirmed": 1_000_000,
                "TotalDeaths": deaths,
                "TotalRecovered": 200_000
            }
        ],
        "Date": "2020-04-15T10:07:28Z"
    })
}

fn summary_bar_widths<S: SummarySource, A: covid_dash::api::AlertSink>(
    dashboard: &Dashboard<S, A>,
) -> Vec<f64> {
    let bar = dashboard
        .table()
        .widget()
        .nested_widget(0, 1)
        .expect("summary bar");
    let frame = bar.render_frame().expect("bar frame");
    frame.rects.iter().map(|rect| rect.width).collect()
}

#[test]
fn numeric_string_counts_load_like_numbers() {
    let source = StaticSummarySource::new("test://summary", body_with_deaths(json!("400000")));
    let mut dashboard =
        Dashboard::new(DashboardConfig::default(), source, Vec::new()).expect("dashboard");

    assert_eq!(dashboard.load().expect("load"), DatasetOrigin::Remote);
    assert!(dashboard.alerts().is_empty());
    assert_eq!(table_country_of(&dashboard), "Textland");
    assert_eq!(summary_bar_widths(&dashboard), [75.0, 30.0, 15.0]);

    dashboard.click_row(0).expect("click");
    assert_eq!(pie_values(&dashboard), [1_000_000.0, 400_000.0, 200_000.0]);
}

#[test]
fn non_numeric_count_draws_an_empty_block() {
    let source = StaticSummarySource::new("test://summary", body_with_deaths(json!("n/a")));
    let mut dashboard =
        Dashboard::new(DashboardConfig::default(), source, Vec::new()).expect("dashboard");

    assert_eq!(dashboard.load().expect("load"), DatasetOrigin::Remote);
    assert!(dashboard.alerts().is_empty());
    assert_eq!(summary_bar_widths(&dashboard), [75.0, 15.0]);
    dashboard.build_render_frame().expect("frame").validate().expect("valid");
}

fn table_country_of<S: SummarySource, A: covid_dash::api::AlertSink>(
    dashboard: &Dashboard<S, A>,
) -> String {
    match &dashboard.table().widget().rows()[0].cells[0] {
        TableCell::Text(text) => text.clone(),
        other => panic!("expected text cell, got {other:?}"),
    }
}
