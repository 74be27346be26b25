use std::f64::consts::TAU;
use std::path::Path;

use chord_rs_renderer::behavior::{
    Behavior, BehaviorOptions, HighlightState, Interaction, Message, Modifiers, PointerEvent,
};
use chord_rs_renderer::host::{DefaultPalette, IdentityLocalizer, LocalSelectionManager, SelectionManager};
use chord_rs_renderer::layout::chord::chord_layout;
use chord_rs_renderer::{ChordLayout, ChordTable, Config, compute_layout, parse_input, render_svg};

const DIMMED: f64 = 0.3;
const FULL: f64 = 1.0;

fn assert_valid_svg(svg: &str, fixture: &str) {
    assert!(svg.contains("<svg"), "{fixture}: missing <svg tag");
    assert!(svg.contains("</svg>"), "{fixture}: missing </svg tag");
    assert!(!svg.contains("NaN"), "{fixture}: NaN in output");
}

fn read_fixture(name: &str) -> ChordTable {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    let input = std::fs::read_to_string(&path).expect("fixture read failed");
    parse_input(&input).expect("parse failed")
}

fn layout(table: &ChordTable) -> Option<ChordLayout> {
    let config = Config::default();
    let mut palette = DefaultPalette::from_theme(&config.theme);
    compute_layout(table, &config, &mut palette, &IdentityLocalizer)
}

fn behavior(table: &ChordTable) -> Behavior<LocalSelectionManager> {
    Behavior::new(
        LocalSelectionManager::new(),
        BehaviorOptions::from_table(table, &Config::default().layout),
    )
}

fn click(arc: usize, ctrl: bool) -> Message {
    Message::Interaction(Interaction::ArcClick {
        arc,
        event: Some(PointerEvent {
            modifiers: Modifiers {
                ctrl,
                ..Modifiers::default()
            },
            ..PointerEvent::default()
        }),
    })
}

fn arc_index(layout: &ChordLayout, label: &str) -> usize {
    layout
        .arcs
        .iter()
        .find(|arc| arc.data.label == label)
        .map(|arc| arc.index)
        .expect("arc label")
}

#[test]
fn render_all_fixtures() {
    // Keep this list explicit so new fixtures must be added intentionally.
    let fixtures = [
        "trade.csv",
        "people.json",
        "highlights_zero.json",
        "no_values.json",
        "zero_row.csv",
    ];
    let config = Config::default();
    for fixture in fixtures {
        let table = read_fixture(fixture);
        let layout = layout(&table).unwrap_or_else(|| panic!("{fixture}: no layout"));
        let svg = render_svg(&layout, &config.theme, &config.layout);
        assert_valid_svg(&svg, fixture);
        assert_eq!(
            svg.matches("class=\"slice\"").count(),
            layout.arcs.len(),
            "{fixture}: one path per arc"
        );
    }
}

#[test]
fn matrix_is_square_and_non_negative() {
    for fixture in ["trade.csv", "people.json", "no_values.json", "zero_row.csv"] {
        let layout = layout(&read_fixture(fixture)).unwrap();
        let data = &layout.data;
        assert_eq!(data.matrix.len(), data.labels.len(), "{fixture}");
        for row in &data.matrix {
            assert_eq!(row.len(), data.matrix.len(), "{fixture}");
            assert!(row.iter().all(|value| *value >= 0.0), "{fixture}");
        }
    }
}

#[test]
fn arcs_cover_the_circle_once() {
    let config = Config::default();
    let layout = layout(&read_fixture("trade.csv")).unwrap();
    let mut covered = 0.0;
    let mut previous_end = 0.0;
    for arc in &layout.arcs {
        assert!(arc.end_angle >= arc.start_angle);
        assert!(arc.start_angle >= previous_end - 1e-9);
        previous_end = arc.end_angle;
        covered += arc.end_angle - arc.start_angle + config.layout.padding;
    }
    assert!((covered - TAU).abs() < 1e-9);
}

#[test]
fn all_zero_matrix_has_no_nan() {
    let table = parse_input("A,B,0\nB,C,0\n").unwrap();
    let layout = layout(&table).unwrap();
    assert!(layout.chords.is_empty());
    for arc in &layout.arcs {
        assert_eq!((arc.start_angle, arc.end_angle, arc.value), (0.0, 0.0, 0.0));
    }
}

#[test]
fn zero_row_keeps_its_label() {
    let layout = layout(&read_fixture("zero_row.csv")).unwrap();
    let c = arc_index(&layout, "C");
    let arc = layout.arc(c).unwrap();
    assert!(arc.start_angle.is_finite());
    assert_eq!(arc.start_angle, arc.end_angle);
    assert_eq!(arc.value, 0.0);
    assert!(layout.data.labels.iter().any(|label| label.label == "C"));
}

#[test]
fn empty_categories_have_no_layout() {
    let table: ChordTable =
        chord_rs_renderer::parse_table_json(r#"{"category": {"values": []}, "values": []}"#).unwrap();
    assert!(layout(&table).is_none());
}

#[test]
fn two_node_flows_scale_arcs_and_select_one() {
    let geometry = chord_layout(&[vec![0.0, 10.0], vec![5.0, 0.0]], 0.1);
    let spans: Vec<f64> = geometry
        .groups
        .iter()
        .map(|group| group.end_angle - group.start_angle)
        .collect();
    assert_eq!(geometry.groups[0].value, 10.0);
    assert_eq!(geometry.groups[1].value, 5.0);
    assert!((spans[0] / spans[1] - 2.0).abs() < 1e-9);
    assert_eq!(geometry.chords.len(), 1);
    assert_eq!(geometry.chords[0].source.value, 10.0);
    assert_eq!(geometry.chords[0].target.value, 5.0);

    let table = parse_input("A,B,10\nB,A,5\n").unwrap();
    let mut layout = layout(&table).unwrap();
    let a = arc_index(&layout, "A");
    let b = arc_index(&layout, "B");
    assert_eq!(layout.arc(a).unwrap().value, 10.0);
    assert_eq!(layout.arc(b).unwrap().value, 5.0);

    let mut behavior = behavior(&table);
    behavior.post(click(a, false));
    behavior.process(&mut layout);
    assert!(layout.arc(a).unwrap().selected);
    assert!(!layout.arc(b).unwrap().selected);
    assert_eq!(layout.arc(a).unwrap().opacity, FULL);
    assert_eq!(layout.arc(b).unwrap().opacity, DIMMED);
    assert!(layout.chords.iter().all(|chord| chord.opacity == FULL));
}

#[test]
fn repeated_click_keeps_one_selection() {
    let table = read_fixture("trade.csv");
    let mut layout = layout(&table).unwrap();
    let china = arc_index(&layout, "China");
    let mut behavior = behavior(&table);
    behavior.post(click(china, false));
    behavior.post(click(china, false));
    behavior.process(&mut layout);
    assert_eq!(behavior.selection_manager().selection_ids().len(), 1);
    assert_eq!(layout.arcs.iter().filter(|arc| arc.selected).count(), 1);
}

#[test]
fn partially_highlighted_arc_stays_dimmed() {
    let table = read_fixture("people.json");
    let mut layout = layout(&table).unwrap();
    let behavior = behavior(&table);
    assert_eq!(behavior.sync_and_render(&mut layout), HighlightState::Active);

    let henry = arc_index(&layout, "Henry");
    let lucas = arc_index(&layout, "Lucas");
    for chord in &layout.chords {
        let pair = [chord.source.index, chord.target.index];
        let lit = pair.contains(&henry) && pair.contains(&lucas);
        assert_eq!(chord.has_highlight, lit);
        assert_eq!(chord.opacity, if lit { FULL } else { DIMMED });
    }
    // Henry and Lucas each touch one highlighted ribbon and some plain ones.
    assert!(layout.arcs.iter().all(|arc| arc.opacity == DIMMED));
}

#[test]
fn zero_highlight_field_dims_while_no_field_does_not() {
    let zeros = read_fixture("highlights_zero.json");
    let mut dimmed = layout(&zeros).unwrap();
    assert_eq!(
        behavior(&zeros).sync_and_render(&mut dimmed),
        HighlightState::EmptyHighlightField
    );
    assert!(dimmed.arcs.iter().all(|arc| arc.opacity == DIMMED));
    assert!(dimmed.chords.iter().all(|chord| chord.opacity == DIMMED));

    let plain = read_fixture("trade.csv");
    let mut opaque = layout(&plain).unwrap();
    assert_eq!(behavior(&plain).sync_and_render(&mut opaque), HighlightState::Idle);
    assert!(opaque.arcs.iter().all(|arc| arc.opacity == FULL));
    assert!(opaque.chords.iter().all(|chord| chord.opacity == FULL));
}

#[test]
fn missing_values_synthesize_unit_flows() {
    let layout = layout(&read_fixture("no_values.json")).unwrap();
    assert_eq!(layout.data.max_value, 1.0);
    assert!(layout.data.different_from_to);
    assert_eq!(layout.arcs.len(), 6);
    assert!(layout.data.labels.iter().any(|label| label.label == "Series0"));
}

#[test]
fn asymmetric_tooltips_name_both_ends() {
    let layout = layout(&read_fixture("highlights_zero.json")).unwrap();
    assert!(layout.data.different_from_to);
    let chord = &layout.chords[0];
    let tooltip = layout.chord_tooltip(chord);
    assert!(tooltip.iter().any(|item| item.display_name == "Region"));
    assert!(tooltip.iter().any(|item| item.display_name == "Market"));
}
