use crate::host::ColorPalette;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Points to CSS pixels.
pub fn pt_to_px(points: f64) -> f64 {
    points * 96.0 / 72.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

impl Default for Margin {
    fn default() -> Self {
        Self::uniform(10.0)
    }
}

/// Geometry and behavior constants of the chord layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChordConfig {
    /// Angular gap between neighbouring arcs, in radians.
    pub padding: f64,
    pub margin: Margin,
    pub min_viewport_width: f64,
    pub min_viewport_height: f64,
    pub inner_radius_ratio: f64,
    pub outer_radius_ratio: f64,
    pub label_margin: f64,
    /// Scales the inner arc centroid to get the first leader line point.
    pub leader_line_multiplier: f64,
    /// Divisor applied to the free horizontal space to get the label width.
    pub label_width_divisor: f64,
    /// Horizontal slack granted to labels near the drawing area edges.
    pub label_inflate: f64,
    pub max_value: f64,
    pub max_unit_size: f64,
    pub tick_shift_x: f64,
    pub tick_format: String,
    pub polyline_opacity: f64,
    pub full_opacity: f64,
    pub dimmed_opacity: f64,
    pub fast_text_metrics: bool,
}

impl Default for ChordConfig {
    fn default() -> Self {
        Self {
            padding: 0.1,
            margin: Margin::default(),
            min_viewport_width: 150.0,
            min_viewport_height: 150.0,
            inner_radius_ratio: 0.8,
            outer_radius_ratio: 0.9,
            label_margin: 10.0,
            leader_line_multiplier: 2.05,
            label_width_divisor: 1.6,
            label_inflate: 5.0,
            max_value: 1000.0,
            max_unit_size: 5.0,
            tick_shift_x: 8.0,
            tick_format: "0.##".to_string(),
            polyline_opacity: 0.5,
            full_opacity: 1.0,
            dimmed_opacity: 0.3,
            fast_text_metrics: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxisSettings {
    pub show: bool,
    pub color: String,
    /// Tick label size in px.
    pub font_size: f64,
}

impl Default for AxisSettings {
    fn default() -> Self {
        Self {
            show: true,
            color: "#212121".to_string(),
            font_size: 12.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelSettings {
    pub show: bool,
    pub color: String,
    /// Category label size in points.
    pub font_size: f64,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            show: true,
            color: "#777777".to_string(),
            font_size: 9.0,
        }
    }
}

impl LabelSettings {
    pub fn font_size_px(&self) -> f64 {
        pt_to_px(self.font_size)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataPointSettings {
    pub default_color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChordSettings {
    pub stroke_color: String,
    pub stroke_width: f64,
    /// Percent, 0..=100.
    pub stroke_opacity: f64,
}

pub const CHORD_STROKE_WIDTH_MAX: f64 = 5.0;

impl Default for ChordSettings {
    fn default() -> Self {
        Self {
            stroke_color: "#000000".to_string(),
            stroke_width: 1.0,
            stroke_opacity: 100.0,
        }
    }
}

/// User-facing formatting options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartSettings {
    pub axis: AxisSettings,
    pub labels: LabelSettings,
    pub data_point: DataPointSettings,
    pub chord: ChordSettings,
}

impl ChartSettings {
    /// Clamp user input into the ranges the formatting pane allows.
    pub fn normalized(mut self) -> Self {
        self.chord.stroke_width = sanitize(self.chord.stroke_width, 1.0)
            .clamp(0.0, CHORD_STROKE_WIDTH_MAX);
        self.chord.stroke_opacity = sanitize(self.chord.stroke_opacity, 100.0).clamp(0.0, 100.0);
        self.labels.font_size = sanitize(self.labels.font_size, 9.0).max(0.0);
        self.axis.font_size = sanitize(self.axis.font_size, 12.0).max(0.0);
        self
    }

    /// Settings as they apply under `palette`: in high contrast mode text
    /// and strokes take the foreground color, the default data color takes
    /// the background and chord strokes are drawn at full width.
    pub fn for_palette(&self, palette: &dyn ColorPalette) -> Self {
        let mut settings = self.clone().normalized();
        if !palette.is_high_contrast() {
            return settings;
        }
        settings.axis.color = palette.high_contrast_foreground(&settings.axis.color);
        settings.labels.color = palette.high_contrast_foreground(&settings.labels.color);
        settings.chord.stroke_color = palette.high_contrast_foreground(&settings.chord.stroke_color);
        settings.data_point.default_color = Some(palette.background());
        settings.chord.stroke_width = CHORD_STROKE_WIDTH_MAX;
        settings
    }
}

fn sanitize(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f64,
    pub height: f64,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: ChordConfig,
    pub settings: ChartSettings,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::powerbi_default();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: ChordConfig::default(),
            settings: ChartSettings::default(),
            render,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    padding: Option<f64>,
    margin: Option<f64>,
    inner_radius_ratio: Option<f64>,
    outer_radius_ratio: Option<f64>,
    label_margin: Option<f64>,
    leader_line_multiplier: Option<f64>,
    max_value: Option<f64>,
    max_unit_size: Option<f64>,
    tick_format: Option<String>,
    polyline_opacity: Option<f64>,
    full_opacity: Option<f64>,
    dimmed_opacity: Option<f64>,
    fast_text_metrics: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct AxisConfigFile {
    show: Option<bool>,
    color: Option<String>,
    font_size: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LabelsConfigFile {
    show: Option<bool>,
    color: Option<String>,
    font_size: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct DataPointConfigFile {
    default_color: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ChordConfigFile {
    stroke_color: Option<String>,
    stroke_width: Option<f64>,
    stroke_opacity: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    font_family: Option<String>,
    background: Option<String>,
    width: Option<f64>,
    height: Option<f64>,
    layout: Option<LayoutConfigFile>,
    axis: Option<AxisConfigFile>,
    labels: Option<LabelsConfigFile>,
    data_point: Option<DataPointConfigFile>,
    chord: Option<ChordConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parse a config document. Plain JSON first, then JSON5 so hand-written
/// files may carry comments and trailing commas.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = match serde_json::from_str(contents) {
        Ok(parsed) => parsed,
        Err(json_err) => json5::from_str(contents)
            .map_err(|_| anyhow::anyhow!("Invalid config file: {json_err}"))?,
    };
    Ok(apply_config_file(Config::default(), parsed))
}

fn apply_config_file(mut config: Config, parsed: ConfigFile) -> Config {
    if let Some(theme_name) = parsed.theme.as_deref() {
        if let Some(theme) = Theme::by_name(theme_name) {
            config.render.background = theme.background.clone();
            config.theme = theme;
        } else {
            tracing::warn!(theme = theme_name, "unknown theme, keeping default");
        }
    }
    if let Some(v) = parsed.font_family {
        config.theme.font_family = v;
    }
    if let Some(v) = parsed.background {
        config.theme.background = v.clone();
        config.render.background = v;
    }
    if let Some(v) = parsed.width {
        config.render.width = v;
    }
    if let Some(v) = parsed.height {
        config.render.height = v;
    }

    if let Some(layout) = parsed.layout {
        let target = &mut config.layout;
        if let Some(v) = layout.padding {
            target.padding = v;
        }
        if let Some(v) = layout.margin {
            target.margin = Margin::uniform(v);
        }
        if let Some(v) = layout.inner_radius_ratio {
            target.inner_radius_ratio = v;
        }
        if let Some(v) = layout.outer_radius_ratio {
            target.outer_radius_ratio = v;
        }
        if let Some(v) = layout.label_margin {
            target.label_margin = v;
        }
        if let Some(v) = layout.leader_line_multiplier {
            target.leader_line_multiplier = v;
        }
        if let Some(v) = layout.max_value {
            target.max_value = v;
        }
        if let Some(v) = layout.max_unit_size {
            target.max_unit_size = v;
        }
        if let Some(v) = layout.tick_format {
            target.tick_format = v;
        }
        if let Some(v) = layout.polyline_opacity {
            target.polyline_opacity = v;
        }
        if let Some(v) = layout.full_opacity {
            target.full_opacity = v;
        }
        if let Some(v) = layout.dimmed_opacity {
            target.dimmed_opacity = v;
        }
        if let Some(v) = layout.fast_text_metrics {
            target.fast_text_metrics = v;
        }
    }

    let settings = &mut config.settings;
    if let Some(axis) = parsed.axis {
        if let Some(v) = axis.show {
            settings.axis.show = v;
        }
        if let Some(v) = axis.color {
            settings.axis.color = v;
        }
        if let Some(v) = axis.font_size {
            settings.axis.font_size = v;
        }
    }
    if let Some(labels) = parsed.labels {
        if let Some(v) = labels.show {
            settings.labels.show = v;
        }
        if let Some(v) = labels.color {
            settings.labels.color = v;
        }
        if let Some(v) = labels.font_size {
            settings.labels.font_size = v;
        }
    }
    if let Some(default_color) = parsed.data_point.and_then(|data_point| data_point.default_color) {
        settings.data_point.default_color = Some(default_color);
    }
    if let Some(chord) = parsed.chord {
        if let Some(v) = chord.stroke_color {
            settings.chord.stroke_color = v;
        }
        if let Some(v) = chord.stroke_width {
            settings.chord.stroke_width = v;
        }
        if let Some(v) = chord.stroke_opacity {
            settings.chord.stroke_opacity = v;
        }
    }
    config.settings = config.settings.normalized();
    config
}
