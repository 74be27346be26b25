pub mod chord;
pub mod collision;
pub(crate) mod label_placement;
pub mod matrix;
pub(crate) mod text;
pub mod ticks;
pub mod tooltip;
pub(crate) mod types;
pub mod viewport;
pub use types::*;

use crate::config::Config;
use crate::host::{ColorPalette, Localizer};
use crate::ir::ChordTable;

use chord::{arc_descriptors, chord_layout};
use label_placement::{LabelGeometry, place_labels};
use matrix::build_chord_data;
use ticks::assign_angle_labels;
use viewport::{VisualLayout, chord_radius};

/// Full layout for one update: matrix, arcs, ribbons, ticks and labels.
/// `None` when the table has nothing to draw.
pub fn compute_layout(
    table: &ChordTable,
    config: &Config,
    palette: &mut dyn ColorPalette,
    localizer: &dyn Localizer,
) -> Option<ChordLayout> {
    let settings = config.settings.for_palette(palette);
    let chord_config = &config.layout;
    let data = build_chord_data(table, chord_config, &settings, palette, localizer)?;

    let geometry = chord_layout(&data.matrix, chord_config.padding);
    let mut arcs = arc_descriptors(&geometry.groups, &data, chord_config.full_opacity);
    let mut chords = geometry.chords;
    for chord in &mut chords {
        chord.opacity = chord_config.full_opacity;
    }
    assign_angle_labels(&mut arcs, &chords, &chord_config.tick_format);

    let mut visual = VisualLayout::new(
        Viewport {
            width: config.render.width,
            height: config.render.height,
        },
        chord_config.margin,
        Viewport {
            width: chord_config.min_viewport_width,
            height: chord_config.min_viewport_height,
        },
    );
    visual.fit_label_font(settings.labels.font_size_px());
    let viewport_in = visual.viewport_in();
    let radius = chord_radius(viewport_in, settings.labels.show);

    let labels = if settings.labels.show {
        place_labels(
            &arcs,
            &LabelGeometry {
                viewport_in,
                radius,
                config: chord_config,
                font_family: &config.theme.font_family,
            },
        )
    } else {
        Vec::new()
    };

    tracing::debug!(
        arcs = arcs.len(),
        chords = chords.len(),
        radius,
        labels = labels.len(),
        "computed chord layout"
    );

    Some(ChordLayout {
        data,
        arcs,
        chords,
        viewport: visual.viewport(),
        viewport_in,
        radius,
        inner_radius: radius * chord_config.inner_radius_ratio,
        outer_radius: radius * chord_config.outer_radius_ratio,
        labels,
        settings,
    })
}

impl ChordLayout {
    pub fn arc_tooltip(&self, index: usize) -> Vec<TooltipItem> {
        tooltip::arc_tooltip(&self.data, index)
    }

    pub fn chord_tooltip(&self, chord: &ChordDescriptor) -> Vec<TooltipItem> {
        tooltip::chord_tooltip(&self.data, chord)
    }

    /// Host highlight sub-value for the ribbon's (source, target) cell.
    pub fn chord_highlight(&self, chord: &ChordDescriptor) -> f64 {
        self.data
            .highlights
            .get(chord.source.index)
            .and_then(|row| row.get(chord.target.index))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn arc(&self, index: usize) -> Option<&ArcDescriptor> {
        self.arcs.iter().find(|arc| arc.index == index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{DefaultPalette, IdentityLocalizer};
    use crate::ir::{SeriesColumn, ValueColumn};

    fn table() -> ChordTable {
        let mut table = ChordTable::default();
        table.category.values = vec![Some("Lucas".to_string()), Some("Henry".to_string())];
        table.series = Some(SeriesColumn::default());
        table.values = vec![
            ValueColumn {
                series: Some("Lucas".to_string()),
                values: vec![Some(0.0), Some(5.0)],
                ..Default::default()
            },
            ValueColumn {
                series: Some("Henry".to_string()),
                values: vec![Some(10.0), Some(0.0)],
                ..Default::default()
            },
        ];
        table
    }

    fn layout_for(table: &ChordTable, config: &Config) -> Option<ChordLayout> {
        let mut palette = DefaultPalette::from_theme(&config.theme);
        compute_layout(table, config, &mut palette, &IdentityLocalizer)
    }

    #[test]
    fn layout_has_arcs_ticks_and_labels() {
        let layout = layout_for(&table(), &Config::default()).unwrap();
        assert_eq!(layout.arcs.len(), 2);
        assert_eq!(layout.chords.len(), 1);
        assert!(layout.arcs.iter().all(|arc| !arc.angle_labels.is_empty()));
        assert_eq!(layout.labels.len(), 2);
        assert!(layout.inner_radius < layout.outer_radius);
        assert!(layout.outer_radius < layout.radius);
    }

    #[test]
    fn hidden_labels_use_the_larger_radius() {
        let mut config = Config::default();
        let shown = layout_for(&table(), &config).unwrap();
        config.settings.labels.show = false;
        let hidden = layout_for(&table(), &config).unwrap();
        assert!(hidden.labels.is_empty());
        assert!(hidden.radius > shown.radius);
    }

    #[test]
    fn empty_table_has_no_layout() {
        assert!(layout_for(&ChordTable::default(), &Config::default()).is_none());
    }

    #[test]
    fn all_zero_values_give_finite_arcs() {
        let mut table = table();
        for column in &mut table.values {
            column.values = vec![Some(0.0), Some(0.0)];
        }
        let layout = layout_for(&table, &Config::default()).unwrap();
        assert!(layout.chords.is_empty());
        for arc in &layout.arcs {
            assert!(arc.start_angle.is_finite() && arc.end_angle.is_finite());
            assert!(arc.value.is_finite());
            assert!(arc.angle_labels.iter().all(|tick| tick.angle.is_finite()));
        }
    }
}
