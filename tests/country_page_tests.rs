use std::collections::HashMap;

use covid_dash::DashError;
use covid_dash::country::{
    COUNTRIES, CountryHistory, CountryPage, HistoryEntry, HistorySource, HistoryStatus,
    LOADING_LABEL, PICKER_COLUMNS,
};
use covid_dash::host::{Widget, WidgetLifecycle};
use covid_dash::DashResult;

#[derive(Default)]
struct FakeHistory {
    series: HashMap<HistoryStatus, Vec<(&'static str, f64)>>,
    calls: Vec<(String, HistoryStatus)>,
    fail: bool,
}

impl FakeHistory {
    fn spain() -> Self {
        let mut series = HashMap::new();
        series.insert(
            HistoryStatus::Confirmed,
            vec![
                ("2020-04-13T00:00:00Z", 169_496.0),
                ("2020-04-14T00:00:00Z", 172_541.0),
                ("2020-04-15T00:00:00Z", 177_633.0),
            ],
        );
        series.insert(
            HistoryStatus::Recovered,
            vec![
                ("2020-04-13T00:00:00Z", 64_727.0),
                ("2020-04-14T00:00:00Z", 67_504.0),
                ("2020-04-15T00:00:00Z", 70_853.0),
            ],
        );
        series.insert(
            HistoryStatus::Deaths,
            vec![
                ("2020-04-13T00:00:00Z", 17_489.0),
                ("2020-04-14T00:00:00Z", 18_056.0),
                ("2020-04-15T00:00:00Z", 18_708.0),
            ],
        );
        Self {
            series,
            ..Self::default()
        }
    }
}

impl HistorySource for FakeHistory {
    fn fetch(&mut self, country: &str, status: HistoryStatus) -> DashResult<Vec<HistoryEntry>> {
        self.calls.push((country.to_owned(), status));
        if self.fail {
            return Err(DashError::Fetch("offline".to_owned()));
        }
        Ok(self
            .series
            .get(&status)
            .map(|points| {
                points
                    .iter()
                    .map(|(date, cases)| HistoryEntry {
                        date: (*date).to_owned(),
                        cases: *cases,
                    })
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[test]
fn history_is_fetched_per_status_in_order() {
    let mut source = FakeHistory::spain();
    let history = CountryHistory::fetch(&mut source, "Spain").expect("history");

    let statuses: Vec<HistoryStatus> = source.calls.iter().map(|(_, status)| *status).collect();
    assert_eq!(statuses, HistoryStatus::ALL);
    assert!(source.calls.iter().all(|(country, _)| country == "Spain"));
    assert_eq!(history.date_labels(), ["13 Apr", "14 Apr", "15 Apr"]);
    assert_eq!(history.deaths, [17_489.0, 18_056.0, 18_708.0]);
}

#[test]
fn summary_reports_totals_and_daily_increase() {
    let mut source = FakeHistory::spain();
    let summary = CountryHistory::fetch(&mut source, "Spain")
        .expect("history")
        .summary();

    let cases = summary.cases.expect("cases");
    assert_eq!(cases.total, 177_633.0);
    assert_eq!(cases.new, Some(5_092.0));
    assert_eq!(cases.new_label(), "+5092");
    assert_eq!(summary.recovered.expect("recovered").new, Some(3_349.0));
    assert_eq!(summary.deaths.expect("deaths").new, Some(652.0));
}

#[test]
fn empty_history_has_no_totals() {
    let mut source = FakeHistory::default();
    let summary = CountryHistory::fetch(&mut source, "Nowhere")
        .expect("history")
        .summary();
    assert!(summary.cases.is_none());
    assert!(summary.deaths.is_none());
}

#[test]
fn selecting_a_country_draws_the_line_chart() {
    let mut page = CountryPage::new(FakeHistory::spain());
    page.toggle_picker();
    assert!(page.is_picker_open());

    page.select_country("Spain").expect("select");
    assert!(!page.is_picker_open());
    assert_eq!(page.heading(), "Spain");
    assert_eq!(page.chart().widget().lifecycle(), WidgetLifecycle::Rendered);

    let frame = page.render_frame().expect("frame");
    frame.validate().expect("valid");
    assert_eq!(frame.lines.len(), 6, "two segments per series");
    assert!(frame.texts.iter().any(|text| text.text == "15 Apr"));
    assert!(frame.texts.iter().any(|text| text.text == "Recovered"));
}

#[test]
fn failed_fetch_clears_loading_and_keeps_previous_chart() {
    let mut page = CountryPage::new(FakeHistory {
        fail: true,
        ..FakeHistory::default()
    });
    let err = page.select_country("Italy").expect_err("offline");
    assert!(matches!(err, DashError::Fetch(_)));
    assert_ne!(page.heading(), LOADING_LABEL);
    assert!(page.history().is_none());
    assert!(page.render_frame().expect("frame").is_empty());
}

#[test]
fn picker_search_and_columns() {
    let mut page = CountryPage::new(FakeHistory::default());
    page.set_search("sw");
    let names: Vec<&str> = page.visible_countries().iter().map(|c| c.name).collect();
    assert_eq!(names, ["Switzerland", "Sweden"]);

    page.toggle_picker();
    assert_eq!(page.visible_countries().len(), COUNTRIES.len(), "opening resets search");

    let columns = page.columns();
    assert_eq!(columns.len(), PICKER_COLUMNS);
    assert_eq!(columns[0].len(), COUNTRIES.len().div_ceil(PICKER_COLUMNS));
    assert_eq!(columns.iter().map(|c| c.len()).sum::<usize>(), COUNTRIES.len());
}

#[test]
fn visitor_code_resolves_to_picker_country() {
    let country = CountryPage::<FakeHistory>::country_for_code("gb").expect("GB");
    assert_eq!(country.name, "UK");
    assert!(CountryPage::<FakeHistory>::country_for_code("ZZ").is_none());
}
