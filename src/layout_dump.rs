use crate::layout::{ChordLayout, TooltipItem};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Flattened view of a computed layout for inspection and regression diffs.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub width: f64,
    pub height: f64,
    pub radius: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub different_from_to: bool,
    pub tick_unit: f64,
    pub arcs: Vec<ArcDump>,
    pub chords: Vec<ChordDump>,
    pub labels: Vec<LabelDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcDump {
    pub index: usize,
    pub label: String,
    pub start_angle: f64,
    pub end_angle: f64,
    pub value: f64,
    pub fill: String,
    pub selected: bool,
    pub opacity: f64,
    pub ticks: Vec<String>,
    pub tooltip: Vec<TooltipItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordDump {
    pub source: String,
    pub target: String,
    pub source_value: f64,
    pub target_value: f64,
    pub opacity: f64,
    pub tooltip: Vec<TooltipItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelDump {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub anchor: String,
}

impl LayoutDump {
    pub fn from_layout(layout: &ChordLayout) -> Self {
        let label_of = |index: usize| {
            layout
                .data
                .labels
                .get(index)
                .map(|label| label.label.clone())
                .unwrap_or_default()
        };

        let arcs = layout
            .arcs
            .iter()
            .map(|arc| ArcDump {
                index: arc.index,
                label: arc.data.label.clone(),
                start_angle: arc.start_angle,
                end_angle: arc.end_angle,
                value: arc.value,
                fill: arc.data.fill_color.clone(),
                selected: arc.selected,
                opacity: arc.opacity,
                ticks: arc.angle_labels.iter().map(|tick| tick.label.clone()).collect(),
                tooltip: layout.arc_tooltip(arc.index),
            })
            .collect();

        let chords = layout
            .chords
            .iter()
            .map(|chord| ChordDump {
                source: label_of(chord.source.index),
                target: label_of(chord.target.index),
                source_value: chord.source.value,
                target_value: chord.target.value,
                opacity: chord.opacity,
                tooltip: layout.chord_tooltip(chord),
            })
            .collect();

        let labels = layout
            .labels
            .iter()
            .map(|label| LabelDump {
                text: label.text.clone(),
                x: label.x,
                y: label.y,
                anchor: label.anchor.as_str().to_string(),
            })
            .collect();

        LayoutDump {
            width: layout.viewport.width,
            height: layout.viewport.height,
            radius: layout.radius,
            inner_radius: layout.inner_radius,
            outer_radius: layout.outer_radius,
            different_from_to: layout.data.different_from_to,
            tick_unit: layout.data.tick_unit,
            arcs,
            chords,
            labels,
        }
    }
}

pub fn layout_dump_json(layout: &ChordLayout) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&LayoutDump::from_layout(layout))?)
}

pub fn write_layout_dump(path: &Path, layout: &ChordLayout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &LayoutDump::from_layout(layout))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::host::{DefaultPalette, IdentityLocalizer};
    use crate::layout::compute_layout;
    use crate::parser::parse_input;

    #[test]
    fn dump_names_chord_endpoints() {
        let table = parse_input("A,B,3\nB,A,1\n").unwrap();
        let config = Config::default();
        let mut palette = DefaultPalette::from_theme(&config.theme);
        let layout = compute_layout(&table, &config, &mut palette, &IdentityLocalizer).unwrap();
        let dump = LayoutDump::from_layout(&layout);
        assert_eq!(dump.arcs.len(), 2);
        assert_eq!(dump.chords.len(), 1);
        let chord = &dump.chords[0];
        assert_eq!((chord.source.as_str(), chord.source_value), ("A", 3.0));
        assert_eq!((chord.target.as_str(), chord.target_value), ("B", 1.0));

        let json = layout_dump_json(&layout).unwrap();
        assert!(json.contains("\"differentFromTo\""));
    }
}
