use serde::{Deserialize, Deserializer, Serialize};

/// Tabular input for one chord diagram update.
///
/// Mirrors a categorical data view: one category column (the "From" side),
/// an optional series grouping (the "To" side) and one value column per
/// series group, each holding a value per category row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordTable {
    pub category: CategoryColumn,
    #[serde(default)]
    pub series: Option<SeriesColumn>,
    #[serde(default)]
    pub values: Vec<ValueColumn>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryColumn {
    #[serde(default = "default_category_name")]
    pub display_name: String,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default, deserialize_with = "deserialize_labels")]
    pub values: Vec<Option<String>>,
    /// Per-row fill overrides (formatting pane "data colors").
    #[serde(default)]
    pub fills: Vec<Option<String>>,
}

impl Default for CategoryColumn {
    fn default() -> Self {
        Self {
            display_name: default_category_name(),
            format: None,
            values: Vec::new(),
            fills: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesColumn {
    #[serde(default = "default_series_name")]
    pub display_name: String,
    #[serde(default)]
    pub format: Option<String>,
}

impl Default for SeriesColumn {
    fn default() -> Self {
        Self {
            display_name: default_series_name(),
            format: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueColumn {
    /// Series group value this column belongs to. `None` when the table has
    /// no series grouping; the measure name is used instead.
    #[serde(default, deserialize_with = "deserialize_label")]
    pub series: Option<String>,
    #[serde(default = "default_value_name")]
    pub display_name: String,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub values: Vec<Option<f64>>,
    #[serde(default)]
    pub highlights: Option<Vec<Option<f64>>>,
    #[serde(default)]
    pub fill: Option<String>,
}

impl Default for ValueColumn {
    fn default() -> Self {
        Self {
            series: None,
            display_name: default_value_name(),
            format: None,
            values: Vec::new(),
            highlights: None,
            fill: None,
        }
    }
}

impl ValueColumn {
    pub fn value(&self, row: usize) -> Option<f64> {
        self.values.get(row).copied().flatten()
    }

    pub fn highlight(&self, row: usize) -> Option<f64> {
        self.highlights
            .as_ref()
            .and_then(|highlights| highlights.get(row).copied().flatten())
    }

    /// Series name as shown on the diagram: group value, or the measure
    /// name for ungrouped tables.
    pub fn series_label(&self) -> String {
        self.series
            .clone()
            .unwrap_or_else(|| self.display_name.clone())
    }
}

impl ChordTable {
    pub fn has_values(&self) -> bool {
        !self.values.is_empty()
    }

    pub fn is_grouped(&self) -> bool {
        self.series.is_some()
    }

    /// Any highlight value strictly above zero.
    pub fn has_highlights(&self) -> bool {
        self.values.iter().any(|column| {
            column.highlights.as_ref().is_some_and(|highlights| {
                highlights
                    .iter()
                    .any(|value| value.is_some_and(|value| value > 0.0))
            })
        })
    }

    /// A highlight-capable field is bound, whatever its values.
    pub fn has_highlights_object(&self) -> bool {
        self.values.iter().any(|column| {
            column
                .highlights
                .as_ref()
                .is_some_and(|highlights| !highlights.is_empty())
        })
    }
}

fn default_category_name() -> String {
    "Category".to_string()
}

fn default_series_name() -> String {
    "Series".to_string()
}

fn default_value_name() -> String {
    "Value".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawLabel {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl RawLabel {
    fn into_label(self) -> String {
        match self {
            RawLabel::Text(text) => text,
            RawLabel::Number(value) => format!("{}", value),
            RawLabel::Bool(value) => value.to_string(),
        }
    }
}

fn deserialize_labels<'de, D>(deserializer: D) -> Result<Vec<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<Option<RawLabel>> = Vec::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|label| label.map(RawLabel::into_label))
        .collect())
}

fn deserialize_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawLabel> = Option::deserialize(deserializer)?;
    Ok(raw.map(RawLabel::into_label))
}
