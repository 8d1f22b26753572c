use std::cell::Cell;
use std::f64::consts::TAU;
use std::rc::Rc;
use std::time::Duration;

use approx::assert_relative_eq;
use covid_dash::DashError;
use covid_dash::core::NumberLocale;
use covid_dash::host::{Element, FixedWidth, Widget, WidgetLifecycle};
use covid_dash::widgets::{PieChart, PieChartConfig, PieDatum, TRANSITION_DURATION};
use indexmap::IndexMap;

fn config(colors: &[&str]) -> PieChartConfig {
    let mut category_labels = IndexMap::new();
    category_labels.insert("TotalConfirmed".to_owned(), "Total Confirmed".to_owned());
    category_labels.insert("TotalDeaths".to_owned(), "Total Deaths".to_owned());
    category_labels.insert("TotalRecovered".to_owned(), "Total Recovered".to_owned());
    PieChartConfig {
        colors: colors.iter().map(|c| (*c).to_owned()).collect(),
        category_labels,
    }
}

fn data_json(data: &[(&str, f64)]) -> String {
    let data: Vec<PieDatum> = data
        .iter()
        .map(|(label, value)| PieDatum::new(*label, *value))
        .collect();
    serde_json::to_string(&data).expect("data json")
}

fn chart(width: f64) -> Element<PieChart> {
    let mut element = Element::new(PieChart::new(FixedWidth(width)));
    element
        .set_attribute(
            "config",
            config(&["#4b9dd1", "#f78851", "#a2d9a3"])
                .to_attribute()
                .expect("config json"),
        )
        .expect("config");
    element
}

#[test]
fn arc_spans_follow_values_in_input_order() {
    let mut element = chart(450.0);
    element
        .set_attribute("data", data_json(&[("A", 30.0), ("B", 70.0)]))
        .expect("data");

    let arcs = element.widget().arcs();
    assert_eq!(arcs.len(), 2);
    assert_eq!(arcs[0].label, "A");
    assert_relative_eq!(arcs[0].current().start, 0.0);
    assert_relative_eq!(arcs[0].current().span(), 0.3 * TAU);
    assert_relative_eq!(arcs[1].current().start, 0.3 * TAU);
    assert_relative_eq!(arcs[1].current().span(), 0.7 * TAU);
}

#[test]
fn colors_stay_bound_to_labels_across_updates() {
    let mut element = chart(450.0);
    element
        .set_attribute("data", data_json(&[("A", 1.0), ("B", 2.0), ("C", 3.0)]))
        .expect("data");
    let before: Vec<_> = element
        .widget()
        .arcs()
        .iter()
        .map(|arc| (arc.label.clone(), arc.color.clone()))
        .collect();

    element
        .set_attribute("data", data_json(&[("C", 9.0), ("A", 5.0), ("B", 1.0)]))
        .expect("data");
    for (label, color) in before {
        let arc = element.widget().arc(&label).expect("arc still present");
        assert_eq!(arc.color, color, "color of {label} changed");
    }
}

#[test]
fn new_labels_take_the_next_color_in_first_seen_order() {
    let mut element = chart(450.0);
    element
        .set_attribute("data", data_json(&[("A", 1.0), ("B", 1.0)]))
        .expect("data");
    element
        .set_attribute("data", data_json(&[("D", 1.0), ("B", 1.0)]))
        .expect("data");

    let widget = element.widget();
    assert_eq!(widget.arc("B").and_then(|a| a.color.as_deref()), Some("#f78851"));
    assert_eq!(widget.arc("D").and_then(|a| a.color.as_deref()), Some("#a2d9a3"));
    assert!(widget.arc("A").is_none(), "removed labels leave the pie");
}

#[test]
fn updated_arcs_animate_from_their_previous_extent() {
    let mut element = chart(450.0);
    element
        .set_attribute("data", data_json(&[("A", 50.0), ("B", 50.0)]))
        .expect("data");
    assert!(!element.widget().is_animating(), "entering arcs start at target");

    element
        .set_attribute("data", data_json(&[("A", 25.0), ("B", 75.0)]))
        .expect("data");
    let widget = element.widget();
    assert!(widget.is_animating());
    let a = widget.arc("A").expect("A");
    assert_relative_eq!(a.current().end, 0.5 * TAU);
    assert_relative_eq!(a.target.end, 0.25 * TAU);

    element.tick(TRANSITION_DURATION / 2);
    let mid = element.widget().arc("A").expect("A").current();
    assert_relative_eq!(mid.end, 0.375 * TAU, epsilon = 1e-9);

    element.tick(TRANSITION_DURATION);
    let widget = element.widget();
    assert!(!widget.is_animating());
    assert_relative_eq!(widget.arc("A").expect("A").current().end, 0.25 * TAU);
}

#[test]
fn mid_flight_update_retargets_from_the_animated_value() {
    let mut element = chart(450.0);
    element
        .set_attribute("data", data_json(&[("A", 50.0), ("B", 50.0)]))
        .expect("data");
    element
        .set_attribute("data", data_json(&[("A", 25.0), ("B", 75.0)]))
        .expect("data");
    element.tick(TRANSITION_DURATION / 2);
    let mid = element.widget().arc("A").expect("A").current();

    element
        .set_attribute("data", data_json(&[("A", 75.0), ("B", 25.0)]))
        .expect("data");
    let arc = element.widget().arc("A").expect("A");
    assert_eq!(arc.current(), mid);
    assert_relative_eq!(arc.target.end, 0.75 * TAU);

    element.tick(Duration::from_secs(1));
    assert_relative_eq!(element.widget().arc("A").expect("A").current().end, 0.75 * TAU);
}

#[test]
fn layout_is_remeasured_from_the_container_on_each_update() {
    let width = Rc::new(Cell::new(450.0));
    let mut element = Element::new(PieChart::new(Rc::clone(&width)));
    element
        .set_attribute("config", config(&["red"]).to_attribute().expect("json"))
        .expect("config");
    element
        .set_attribute("data", data_json(&[("A", 1.0)]))
        .expect("data");
    let layout = element.widget().layout();
    assert_relative_eq!(layout.width, 400.0);
    assert_relative_eq!(layout.height, 400.0);
    assert_relative_eq!(layout.margin_top, 60.0);

    width.set(250.0);
    element
        .set_attribute("data", data_json(&[("A", 2.0)]))
        .expect("data");
    assert_relative_eq!(element.widget().layout().width, 200.0);

    width.set(10.0);
    element
        .set_attribute("data", data_json(&[("A", 3.0)]))
        .expect("data");
    assert_relative_eq!(element.widget().layout().width, 0.0);
}

#[test]
fn legend_lists_categories_with_cycled_colors() {
    let mut element = Element::new(PieChart::new(FixedWidth(450.0)));
    element
        .set_attribute("config", config(&["#111", "#222"]).to_attribute().expect("json"))
        .expect("config");

    let legend = element.widget().legend();
    let labels: Vec<&str> = legend.iter().map(|entry| entry.label.as_str()).collect();
    assert_eq!(labels, ["Total Confirmed", "Total Deaths", "Total Recovered"]);
    assert_eq!(legend[2].color.as_deref(), Some("#111"));
}

#[test]
fn frame_has_title_legend_arcs_and_value_labels() {
    let mut element = chart(450.0);
    element.set_attribute("chart-title", "Global").expect("title");
    element
        .set_attribute(
            "data",
            data_json(&[
                ("Total Confirmed", 2_000_464.0),
                ("Total Deaths", 112_924.0),
                ("Total Recovered", 533_504.0),
            ]),
        )
        .expect("data");

    let frame = element.render_frame().expect("frame");
    frame.validate().expect("valid frame");
    assert_eq!(frame.arcs.len(), 3);
    assert_eq!(frame.rects.len(), 3, "one swatch per category");
    assert!(frame.texts.iter().any(|text| text.text == "GLOBAL" && text.bold));
    assert!(frame.texts.iter().any(|text| text.text == "2,000,464"));
    assert!(frame.arcs.iter().all(|arc| arc.inner_radius == 0.0));
    assert_relative_eq!(frame.arcs[0].outer_radius, 200.0);

    let swatch_ys: Vec<f64> = frame.rects.iter().map(|rect| rect.y).collect();
    assert_relative_eq!(swatch_ys[1] - swatch_ys[0], 23.0);
}

#[test]
fn value_labels_follow_locale() {
    let chart = PieChart::new(FixedWidth(450.0)).with_locale(NumberLocale::EsEs);
    let mut element = Element::new(chart);
    element
        .set_attribute("config", config(&["red"]).to_attribute().expect("json"))
        .expect("config");
    element
        .set_attribute("data", data_json(&[("A", 112_924.0)]))
        .expect("data");
    let widget = element.widget();
    assert_eq!(widget.value_label(&widget.arcs()[0]), "112.924");
}

#[test]
fn waits_for_config_and_data_before_drawing_arcs() {
    let mut element = Element::new(PieChart::new(FixedWidth(450.0)));
    element
        .set_attribute("data", data_json(&[("A", 1.0)]))
        .expect("data");
    assert!(element.widget().arcs().is_empty());
    assert_eq!(element.widget().lifecycle(), WidgetLifecycle::AttributesPartial);
    assert!(element.render_frame().expect("frame").is_empty());
}

#[test]
fn zero_and_empty_data_render_no_wedges() {
    let mut element = chart(450.0);
    element.set_attribute("data", "[]").expect("data");
    assert!(element.widget().arcs().is_empty());

    element
        .set_attribute("data", data_json(&[("A", 0.0), ("B", 0.0)]))
        .expect("data");
    assert!(element.widget().arcs().iter().all(|arc| arc.current().span() == 0.0));
    element.render_frame().expect("frame").validate().expect("valid");
}

#[test]
fn malformed_data_is_a_parse_fault() {
    let mut element = chart(450.0);
    let err = element
        .set_attribute("data", "[{\"label\":")
        .expect_err("malformed data");
    assert!(matches!(err, DashError::AttributeParse { ref attribute, .. } if attribute == "data"));
}

#[test]
fn same_data_twice_keeps_arc_count() {
    let mut element = chart(450.0);
    let data = data_json(&[("A", 30.0), ("B", 70.0)]);
    element.set_attribute("data", data.clone()).expect("data");
    element.set_attribute("data", data).expect("same data");

    let widget = element.widget();
    assert_eq!(widget.arcs().len(), 2);
    assert!(!widget.is_animating());
    assert_eq!(element.render_frame().expect("frame").arcs.len(), 2);
}
