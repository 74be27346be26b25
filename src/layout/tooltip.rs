use super::types::{ChordData, ChordDescriptor, TooltipItem};

/// Rows shown for one matrix cell: category, series (grouped tables only)
/// and the formatted value.
pub(super) fn cell_tooltip(
    category_name: &str,
    category: &str,
    series_name: Option<&str>,
    series: &str,
    value_name: &str,
    value: &str,
) -> Vec<TooltipItem> {
    let mut items = vec![TooltipItem::new(category_name, category)];
    if let Some(series_name) = series_name {
        items.push(TooltipItem::new(series_name, series));
    }
    items.push(TooltipItem::new(value_name, value));
    items
}

pub fn arc_tooltip(data: &ChordData, index: usize) -> Vec<TooltipItem> {
    data.slice_tooltips.get(index).cloned().unwrap_or_default()
}

/// Ribbon tooltip. In asymmetric mode the cell tooltip recorded for the
/// category row; otherwise both directions with their raw values.
pub fn chord_tooltip(data: &ChordData, chord: &ChordDescriptor) -> Vec<TooltipItem> {
    let source = chord.source.index;
    let target = chord.target.index;
    if data.different_from_to {
        let recorded = cell(data, target, source);
        return if recorded.is_empty() {
            cell(data, source, target)
        } else {
            recorded
        };
    }
    vec![direction(data, source, target), direction(data, target, source)]
}

fn cell(data: &ChordData, row: usize, col: usize) -> Vec<TooltipItem> {
    data.tooltips
        .get(row)
        .and_then(|cells| cells.get(col))
        .cloned()
        .unwrap_or_default()
}

fn direction(data: &ChordData, from: usize, to: usize) -> TooltipItem {
    let label = |idx: usize| {
        data.labels
            .get(idx)
            .map(|label| label.label.as_str())
            .unwrap_or_default()
    };
    let value = data
        .raw_matrix
        .get(from)
        .and_then(|row| row.get(to))
        .copied()
        .unwrap_or(0.0);
    TooltipItem::new(format!("{}->{}", label(from), label(to)), value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::types::{ChordEnd, NodeLabel};

    fn node(label: &str) -> NodeLabel {
        NodeLabel {
            label: label.to_string(),
            is_category: true,
            is_grouped: false,
            fill_color: "#000".to_string(),
            stroke_color: "#000".to_string(),
            label_color: "#777".to_string(),
            font_size: 12.0,
        }
    }

    fn data(different_from_to: bool) -> ChordData {
        let mut tooltips = vec![vec![Vec::new(); 2]; 2];
        tooltips[1][0] = vec![TooltipItem::new("Value", "10")];
        ChordData {
            matrix: vec![vec![0.0, 10.0], vec![5.0, 0.0]],
            raw_matrix: vec![vec![0.0, 10.0], vec![5.0, 0.0]],
            highlights: vec![vec![0.0; 2]; 2],
            labels: vec![node("A"), node("B")],
            identities: vec![None, None],
            tooltips,
            slice_tooltips: vec![vec![TooltipItem::new("A", "10")], vec![]],
            tick_unit: 100.0,
            different_from_to,
            max_value: 1000.0,
        }
    }

    fn chord() -> ChordDescriptor {
        let end = |index, value| ChordEnd {
            index,
            start_angle: 0.0,
            end_angle: 0.0,
            value,
        };
        ChordDescriptor {
            source: end(0, 10.0),
            target: end(1, 5.0),
            has_highlight: false,
            opacity: 1.0,
        }
    }

    #[test]
    fn symmetric_tooltip_lists_both_directions() {
        let items = chord_tooltip(&data(false), &chord());
        assert_eq!(
            items,
            vec![TooltipItem::new("A->B", "10"), TooltipItem::new("B->A", "5")]
        );
    }

    #[test]
    fn asymmetric_tooltip_uses_recorded_cell() {
        let items = chord_tooltip(&data(true), &chord());
        assert_eq!(items, vec![TooltipItem::new("Value", "10")]);
    }

    #[test]
    fn arc_tooltip_out_of_range_is_empty() {
        assert_eq!(arc_tooltip(&data(false), 0).len(), 1);
        assert!(arc_tooltip(&data(false), 9).is_empty());
    }
}
