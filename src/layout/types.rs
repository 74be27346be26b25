use serde::Serialize;

use crate::config::ChartSettings;
use crate::host::SelectionId;

/// Display data shared by an arc and its label.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeLabel {
    pub label: String,
    pub is_category: bool,
    pub is_grouped: bool,
    pub fill_color: String,
    pub stroke_color: String,
    pub label_color: String,
    /// px
    pub font_size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipItem {
    pub display_name: String,
    pub value: String,
}

impl TooltipItem {
    pub fn new(display_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            value: value.into(),
        }
    }
}

/// Tick position along an arc, at the cumulative value `label` names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AngleLabel {
    pub angle: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcDescriptor {
    pub index: usize,
    pub start_angle: f64,
    pub end_angle: f64,
    pub value: f64,
    pub data: NodeLabel,
    pub identity: Option<SelectionId>,
    pub selected: bool,
    pub opacity: f64,
    pub angle_labels: Vec<AngleLabel>,
}

impl ArcDescriptor {
    pub fn mid_angle(&self) -> f64 {
        self.start_angle + (self.end_angle - self.start_angle) / 2.0
    }
}

/// One end of a ribbon: the slice of arc `index` it attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordEnd {
    pub index: usize,
    pub start_angle: f64,
    pub end_angle: f64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordDescriptor {
    pub source: ChordEnd,
    pub target: ChordEnd,
    pub has_highlight: bool,
    pub opacity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    End,
}

impl TextAnchor {
    pub fn as_str(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::End => "end",
        }
    }
}

/// A category label that survived collision filtering, with its leader
/// line. Coordinates are relative to the diagram center.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelPlacement {
    pub arc_index: usize,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub anchor: TextAnchor,
    pub color: String,
    pub font_size: f64,
    pub leader_line: [(f64, f64); 3],
}

/// Output of the matrix builder: everything derived from the input table
/// before any geometry is computed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordData {
    /// Non-negative flows used for layout.
    pub matrix: Vec<Vec<f64>>,
    /// Signed flows, for tooltips and row totals.
    pub raw_matrix: Vec<Vec<f64>>,
    pub highlights: Vec<Vec<f64>>,
    pub labels: Vec<NodeLabel>,
    pub identities: Vec<Option<SelectionId>>,
    pub tooltips: Vec<Vec<Vec<TooltipItem>>>,
    pub slice_tooltips: Vec<Vec<TooltipItem>>,
    pub tick_unit: f64,
    pub different_from_to: bool,
    pub max_value: f64,
}

impl ChordData {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordLayout {
    pub data: ChordData,
    pub arcs: Vec<ArcDescriptor>,
    pub chords: Vec<ChordDescriptor>,
    pub viewport: Viewport,
    pub viewport_in: Viewport,
    pub radius: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub labels: Vec<LabelPlacement>,
    /// Formatting settings after high contrast adjustments.
    pub settings: ChartSettings,
}
