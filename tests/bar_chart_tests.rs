use covid_dash::DashError;
use covid_dash::host::{Element, Widget, WidgetLifecycle};
use covid_dash::widgets::{BAR_HEIGHT_PX, BarChart};

fn ready_chart(colors: &str, data: &str) -> Element<BarChart> {
    let mut element = Element::new(BarChart::new());
    element.set_attribute("colors", colors).expect("colors");
    element.set_attribute("maxWidth", "100").expect("maxWidth");
    element.set_attribute("maxVal", "1000").expect("maxVal");
    element.set_attribute("data", data).expect("data");
    element
}

#[test]
fn block_width_is_floored_proportion_of_max() {
    let element = ready_chart("red", "500,999,1000");
    let widths: Vec<i64> = element
        .widget()
        .blocks()
        .iter()
        .map(|block| block.width_px)
        .collect();
    assert_eq!(widths, [50, 99, 100]);
    assert!(element.widget().blocks().iter().all(|b| b.height_px == BAR_HEIGHT_PX));
}

#[test]
fn colors_cycle_by_index() {
    let element = ready_chart("#a,#b,#c", "1,2,3,4,5");
    let colors: Vec<&str> = element
        .widget()
        .blocks()
        .iter()
        .map(|block| block.color.as_str())
        .collect();
    assert_eq!(colors, ["#a", "#b", "#c", "#a", "#b"]);
}

#[test]
fn renders_only_after_last_required_attribute() {
    let mut element = Element::new(BarChart::new());
    assert_eq!(element.widget().lifecycle(), WidgetLifecycle::Unattached);

    element.set_attribute("data", "1,2").expect("data");
    element.set_attribute("maxval", "10").expect("maxval");
    element.set_attribute("colors", "red").expect("colors");
    assert_eq!(element.widget().lifecycle(), WidgetLifecycle::AttributesPartial);
    assert!(element.widget().blocks().is_empty());
    assert!(element.render_frame().expect("frame").is_empty());

    element.set_attribute("maxwidth", "100").expect("maxwidth");
    assert_eq!(element.widget().lifecycle(), WidgetLifecycle::Rendered);
    assert_eq!(element.widget().blocks().len(), 2);
    assert_eq!(element.widget().render_count(), 1);
}

#[test]
fn later_change_rebuilds_every_block() {
    let mut element = ready_chart("red,blue", "100,200");
    element.set_attribute("maxWidth", "50").expect("maxWidth");
    let widths: Vec<i64> = element
        .widget()
        .blocks()
        .iter()
        .map(|block| block.width_px)
        .collect();
    assert_eq!(widths, [5, 10]);
    assert_eq!(element.widget().render_count(), 2);
}

#[test]
fn negative_values_keep_negative_widths_and_take_no_space() {
    let element = ready_chart("red", "-100,300");
    assert_eq!(element.widget().blocks()[0].width_px, -10);

    let frame = element.render_frame().expect("frame");
    assert_eq!(frame.rects.len(), 1);
    assert_eq!(frame.rects[0].x, 0.0);
    assert_eq!(frame.rects[0].width, 30.0);
    frame.validate().expect("valid frame");
}

#[test]
fn frame_lays_blocks_left_to_right() {
    let element = ready_chart("#4b9dd1,#f78851", "100,200");
    let frame = element.render_frame().expect("frame");
    let xs: Vec<f64> = frame.rects.iter().map(|rect| rect.x).collect();
    assert_eq!(xs, [0.0, 10.0]);
    assert_eq!(frame.viewport.width, 30);
    assert_eq!(frame.viewport.height, 20);
}

#[test]
fn empty_data_renders_nothing() {
    let element = ready_chart("red", "");
    assert!(element.widget().blocks().is_empty());
    assert!(element.render_frame().expect("frame").is_empty());
}

#[test]
fn json_data_from_table_cells_is_accepted() {
    let element = ready_chart("red,green,blue", "[162488,21067,37130]");
    let widths: Vec<i64> = element
        .widget()
        .blocks()
        .iter()
        .map(|block| block.width_px)
        .collect();
    assert_eq!(widths, [16248, 2106, 3713]);
}

#[test]
fn non_numeric_input_is_a_parse_fault() {
    let mut element = Element::new(BarChart::new());
    let err = element
        .set_attribute("maxVal", "lots")
        .expect_err("non-numeric maxVal must fail");
    assert!(matches!(
        err,
        DashError::AttributeParse { ref attribute, .. } if attribute == "maxval"
    ));

    let err = element
        .set_attribute("data", "[1, ")
        .expect_err("malformed json must fail");
    assert!(matches!(err, DashError::AttributeParse { .. }));
}

#[test]
fn unobserved_attributes_are_stored_but_ignored() {
    let mut element = ready_chart("red", "100");
    element.set_attribute("title", "ignored").expect("title");
    assert_eq!(element.attribute("title"), Some("ignored"));
    assert_eq!(element.widget().render_count(), 1);
}

#[test]
fn blank_colors_hold_the_chart_back() {
    let mut element = Element::new(BarChart::new());
    element.set_attribute("colors", " ").expect("colors");
    element.set_attribute("maxWidth", "100").expect("maxWidth");
    element.set_attribute("maxVal", "1000").expect("maxVal");
    element.set_attribute("data", "500").expect("data");

    assert!(!element.widget().is_ready());
    assert_eq!(element.widget().render_count(), 0);
    assert!(element.widget().blocks().is_empty());
    assert!(element.render_frame().expect("frame").is_empty());

    element.set_attribute("colors", "red").expect("colors");
    assert_eq!(element.widget().render_count(), 1);
    assert_eq!(element.widget().blocks()[0].color, "red");
}

#[test]
fn json_string_values_draw_like_numbers() {
    let element = ready_chart("red", r#"["500", "n/a", 250]"#);
    let widths: Vec<i64> = element
        .widget()
        .blocks()
        .iter()
        .map(|block| block.width_px)
        .collect();
    assert_eq!(widths, [50, 0, 25]);
    assert_eq!(element.render_frame().expect("frame").rects.len(), 2);
}
