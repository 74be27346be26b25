//! Category labels around the chord ring.
//!
//! Each arc proposes one label beside the ring at its mid angle, on the
//! right half for arcs before 6 o'clock and the left half otherwise. Labels
//! are accepted greedily in arc order; a label that overlaps an accepted
//! one or falls out of the drawing area is dropped.

use crate::config::ChordConfig;

use super::collision::{ArrangeGrid, Rect, fits_drawing_area};
use super::text::{text_width, truncate_to_width};
use super::types::{ArcDescriptor, LabelPlacement, TextAnchor, Viewport};

/// Point at `radius` and `angle`, with angle 0 at 12 o'clock going
/// clockwise and y growing downward.
pub(crate) fn polar(radius: f64, angle: f64) -> (f64, f64) {
    (radius * angle.sin(), -radius * angle.cos())
}

pub struct LabelGeometry<'a> {
    pub viewport_in: Viewport,
    pub radius: f64,
    pub config: &'a ChordConfig,
    pub font_family: &'a str,
}

impl LabelGeometry<'_> {
    fn inner_radius(&self) -> f64 {
        self.radius * self.config.inner_radius_ratio
    }

    fn outer_radius(&self) -> f64 {
        self.radius * self.config.outer_radius_ratio
    }

    /// Width left for label text beside the ring.
    pub fn max_label_width(&self) -> f64 {
        (self.viewport_in.width - self.radius * 2.0 - self.config.label_margin * 2.0)
            / self.config.label_width_divisor
    }
}

pub fn place_labels(arcs: &[ArcDescriptor], geometry: &LabelGeometry<'_>) -> Vec<LabelPlacement> {
    let config = geometry.config;
    let max_width = geometry.max_label_width();
    let outer = geometry.outer_radius();
    let cell = arcs
        .first()
        .map(|arc| arc.data.font_size * 2.0)
        .unwrap_or(16.0);
    let mut grid = ArrangeGrid::new(cell);
    let mut placements = Vec::new();

    for arc in arcs {
        let font_size = arc.data.font_size;
        let text = truncate_to_width(
            &arc.data.label,
            max_width as f32,
            font_size as f32,
            geometry.font_family,
            config.fast_text_metrics,
        );
        if text.is_empty() {
            continue;
        }

        let mid = arc.mid_angle();
        let side = if mid < std::f64::consts::PI { 1.0 } else { -1.0 };
        let anchor = if side > 0.0 {
            TextAnchor::Start
        } else {
            TextAnchor::End
        };
        let x = (geometry.radius + config.label_margin) * side;
        let (_, y) = polar(outer, mid);

        let width = text_width(&text, font_size as f32, geometry.font_family, config.fast_text_metrics)
            as f64;
        let left = match anchor {
            TextAnchor::Start => x,
            TextAnchor::End => x - width,
        };
        let rect: Rect = (
            left + geometry.viewport_in.width / 2.0,
            y - font_size / 2.0 + geometry.viewport_in.height / 2.0,
            width,
            font_size,
        );
        if grid.has_conflict(&rect)
            || !fits_drawing_area(&rect, geometry.viewport_in, config.label_inflate)
        {
            continue;
        }
        grid.add(rect);

        placements.push(LabelPlacement {
            arc_index: arc.index,
            text,
            x,
            y,
            anchor,
            color: arc.data.label_color.clone(),
            font_size,
            leader_line: leader_line(geometry, mid, side),
        });
    }

    tracing::debug!(
        candidates = arcs.len(),
        kept = placements.len(),
        "placed category labels"
    );
    placements
}

/// Inner arc centroid pushed outward, the outer ring centroid, then a
/// horizontal run toward the label.
fn leader_line(geometry: &LabelGeometry<'_>, mid: f64, side: f64) -> [(f64, f64); 3] {
    let multiplier = geometry.config.leader_line_multiplier;
    let (cx, cy) = polar(geometry.inner_radius() / 2.0, mid);
    let chart_point = (cx * multiplier, cy * multiplier);
    let mid_point = polar(geometry.outer_radius(), mid);
    let text_point = (
        (geometry.radius + geometry.config.label_margin / 2.0) * side,
        mid_point.1,
    );
    [chart_point, mid_point, text_point]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::types::NodeLabel;
    use std::f64::consts::PI;

    fn arc(index: usize, label: &str, start: f64, end: f64) -> ArcDescriptor {
        ArcDescriptor {
            index,
            start_angle: start,
            end_angle: end,
            value: 1.0,
            data: NodeLabel {
                label: label.to_string(),
                is_category: true,
                is_grouped: false,
                fill_color: "#000".to_string(),
                stroke_color: "#000".to_string(),
                label_color: "#777777".to_string(),
                font_size: 12.0,
            },
            identity: None,
            selected: false,
            opacity: 1.0,
            angle_labels: Vec::new(),
        }
    }

    fn geometry(config: &ChordConfig) -> LabelGeometry<'_> {
        LabelGeometry {
            viewport_in: Viewport {
                width: 600.0,
                height: 400.0,
            },
            radius: 150.0,
            config,
            font_family: "sans-serif",
        }
    }

    #[test]
    fn labels_sit_on_the_side_of_their_arc() {
        let config = ChordConfig::default();
        let arcs = vec![arc(0, "East", 0.0, PI / 2.0), arc(1, "West", PI, 1.5 * PI)];
        let placed = place_labels(&arcs, &geometry(&config));
        assert_eq!(placed.len(), 2);
        assert_eq!(placed[0].anchor, TextAnchor::Start);
        assert_eq!(placed[0].x, 160.0);
        assert_eq!(placed[1].anchor, TextAnchor::End);
        assert_eq!(placed[1].x, -160.0);
        let expected_y = -150.0 * 0.9 * (PI / 4.0).cos();
        assert!((placed[0].y - expected_y).abs() < 1e-9);
    }

    #[test]
    fn overlapping_labels_keep_the_earlier_arc() {
        let config = ChordConfig::default();
        let arcs = vec![arc(0, "First", 1.0, 1.01), arc(1, "Second", 1.01, 1.02)];
        let placed = place_labels(&arcs, &geometry(&config));
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].arc_index, 0);
    }

    #[test]
    fn leader_line_ends_beside_the_ring() {
        let config = ChordConfig::default();
        let arcs = vec![arc(0, "East", 0.0, PI / 2.0)];
        let placed = place_labels(&arcs, &geometry(&config));
        let [chart, middle, text] = placed[0].leader_line;
        let mid = PI / 4.0;
        assert!((chart.0 - 60.0 * 2.05 * mid.sin()).abs() < 1e-9);
        assert!((middle.0 - 135.0 * mid.sin()).abs() < 1e-9);
        assert_eq!(text, (155.0, middle.1));
    }

    #[test]
    fn no_room_means_no_labels() {
        let config = ChordConfig::default();
        let tight = LabelGeometry {
            viewport_in: Viewport {
                width: 300.0,
                height: 300.0,
            },
            radius: 150.0,
            config: &config,
            font_family: "sans-serif",
        };
        let arcs = vec![arc(0, "East", 0.0, PI / 2.0)];
        assert!(place_labels(&arcs, &tight).is_empty());
    }

    #[test]
    fn polar_origin_is_twelve_o_clock() {
        let (x, y) = polar(10.0, 0.0);
        assert!(x.abs() < 1e-12);
        assert_eq!(y, -10.0);
    }
}
