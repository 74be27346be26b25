use std::collections::HashMap;

use indexmap::IndexSet;

use crate::config::{ChartSettings, ChordConfig};
use crate::format::{BLANK_LABEL, ValueFormatter};
use crate::host::{ColorPalette, Localizer, SelectionId};
use crate::ir::ChordTable;

use super::tooltip;
use super::types::{ChordData, NodeLabel, TooltipItem};

/// Value assumed for every category/series pair when no measure is bound.
const UNIT_VALUE: f64 = 1.0;

type Label = Option<String>;

/// Turn the input table into the square flow matrix and per-node display
/// data. `None` means there is nothing to draw.
///
/// `settings` are expected to already reflect the palette's contrast mode.
pub fn build_chord_data(
    table: &ChordTable,
    config: &ChordConfig,
    settings: &ChartSettings,
    palette: &mut dyn ColorPalette,
    localizer: &dyn Localizer,
) -> Option<ChordData> {
    let categories = &table.category.values;
    if categories.is_empty() {
        return None;
    }

    let synthesized = !table.has_values();
    let series_display_name = table
        .series
        .as_ref()
        .map(|series| series.display_name.clone())
        .unwrap_or_else(|| localizer.display_name("Visual_Series"));
    let value_display_name = table
        .values
        .first()
        .map(|column| column.display_name.clone())
        .unwrap_or_else(|| localizer.display_name("Visual_Value"));
    let series: Vec<Label> = if synthesized {
        (0..categories.len())
            .map(|idx| Some(format!("{series_display_name}{idx}")))
            .collect()
    } else {
        table
            .values
            .iter()
            .map(|column| Some(column.series_label()))
            .collect()
    };

    let mut union: IndexSet<&Label> = IndexSet::new();
    union.extend(categories.iter());
    union.extend(series.iter());
    let nodes: Vec<&Label> = union.into_iter().rev().collect();
    let different_from_to = nodes.len() == categories.len() + series.len();

    let category_index = last_index_of(categories);
    let series_index = last_index_of(&series);

    let category_formatter = ValueFormatter::new(table.category.format.as_deref());
    let series_formatter =
        ValueFormatter::new(table.series.as_ref().and_then(|series| series.format.as_deref()));
    let value_format = if synthesized {
        Some("0")
    } else {
        table.values.first().and_then(|column| column.format.as_deref())
    };
    let value_formatter = ValueFormatter::new(value_format);

    let is_grouped = table.is_grouped();
    let label_font_size = settings.labels.font_size_px();
    let n = nodes.len();
    let mut max = config.max_value;
    let mut matrix = Vec::with_capacity(n);
    let mut raw_matrix = Vec::with_capacity(n);
    let mut highlights = Vec::with_capacity(n);
    let mut tooltips = Vec::with_capacity(n);
    let mut slice_tooltips = Vec::with_capacity(n);
    let mut labels = Vec::with_capacity(n);
    let mut identities = Vec::with_capacity(n);

    for &node in &nodes {
        let as_category = category_index.get(node).copied();
        let as_series = series_index.get(node).copied();

        let label = match (as_category, as_series) {
            (None, Some(_)) if is_grouped => series_formatter.format_label(node.as_deref()),
            _ => category_formatter.format_label(node.as_deref()),
        };
        let key = node.as_deref().unwrap_or(BLANK_LABEL);

        let (identity, is_category, fill_color) = if let Some(row) = as_category {
            let fill = table
                .category
                .fills
                .get(row)
                .cloned()
                .flatten()
                .or_else(|| settings.data_point.default_color.clone())
                .unwrap_or_else(|| palette.color_for(key));
            (Some(SelectionId::Category { row }), true, fill)
        } else if let Some(col) = as_series {
            let column = table.values.get(col);
            let measure = column
                .map(|column| column.series_label())
                .unwrap_or_else(|| localizer.display_name("Visual_Value"));
            let fill = column
                .and_then(|column| column.fill.clone())
                .or_else(|| settings.data_point.default_color.clone())
                .unwrap_or_else(|| palette.color_for(&measure));
            let identity = SelectionId::Series {
                group: is_grouped.then_some(col),
                measure: Some(measure),
            };
            (Some(identity), false, fill)
        } else {
            (None, false, palette.foreground())
        };
        let stroke_color = palette.high_contrast_foreground(&fill_color);

        let mut matrix_row = Vec::with_capacity(n);
        let mut raw_row = Vec::with_capacity(n);
        let mut highlight_row = Vec::with_capacity(n);
        let mut tooltip_row = Vec::with_capacity(n);

        for &other in &nodes {
            let mut value = 0.0;
            let mut highlight = 0.0;
            let mut cell_tooltip: Vec<TooltipItem> = Vec::new();

            if let (Some(row), Some(col)) = (as_category, series_index.get(other).copied()) {
                if synthesized {
                    max = UNIT_VALUE;
                    value = UNIT_VALUE;
                } else if let Some(cell) = table.values[col].value(row) {
                    value = cell;
                    highlight = table.values[col].highlight(row).unwrap_or(0.0);
                    if value > max {
                        max = value;
                    }
                }
                if synthesized || table.values[col].value(row).is_some() {
                    cell_tooltip = tooltip::cell_tooltip(
                        &table.category.display_name,
                        &label,
                        is_grouped.then_some(series_display_name.as_str()),
                        &series_formatter.format_label(series[col].as_deref()),
                        &value_display_name,
                        &value_formatter.format(value),
                    );
                }
            } else if different_from_to {
                if let (Some(row), Some(col)) =
                    (category_index.get(other).copied(), as_series)
                {
                    if synthesized {
                        value = UNIT_VALUE;
                    } else if let Some(cell) = table.values[col].value(row) {
                        value = cell;
                        highlight = table.values[col].highlight(row).unwrap_or(0.0);
                    }
                }
            }

            let value = finite_or_zero(value);
            matrix_row.push(value.max(0.0));
            raw_row.push(value);
            highlight_row.push(finite_or_zero(highlight));
            tooltip_row.push(cell_tooltip);
        }

        let total: f64 = raw_row.iter().sum();
        slice_tooltips.push(vec![TooltipItem::new(
            label.clone(),
            value_formatter.format(total),
        )]);

        labels.push(NodeLabel {
            label,
            is_category,
            is_grouped,
            fill_color,
            stroke_color,
            label_color: settings.labels.color.clone(),
            font_size: label_font_size,
        });
        identities.push(identity);
        matrix.push(matrix_row);
        raw_matrix.push(raw_row);
        highlights.push(highlight_row);
        tooltips.push(tooltip_row);
    }

    let tick_unit = tick_unit(max, config.max_unit_size);
    tracing::debug!(
        nodes = n,
        different_from_to,
        max_value = max,
        tick_unit,
        "built chord matrix"
    );

    Some(ChordData {
        matrix,
        raw_matrix,
        highlights,
        labels,
        identities,
        tooltips,
        slice_tooltips,
        tick_unit,
        different_from_to,
        max_value: max,
    })
}

/// Label to the position of its last occurrence.
fn last_index_of(labels: &[Label]) -> HashMap<&Label, usize> {
    labels
        .iter()
        .enumerate()
        .map(|(idx, label)| (label, idx))
        .collect()
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Power of ten one digit shorter than `round(max / max_unit_size)`.
pub fn tick_unit(max: f64, max_unit_size: f64) -> f64 {
    let rounded = (max / max_unit_size).round();
    let digits = if rounded.is_finite() {
        format!("{:.0}", rounded.abs()).len()
    } else {
        1
    };
    10f64.powi(digits as i32 - 1)
}
