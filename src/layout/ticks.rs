use crate::format::ValueFormatter;

use super::types::{AngleLabel, ArcDescriptor, ChordDescriptor};

/// Fill `angle_labels` of every arc with tick marks at 0 and at the running
/// totals of the ribbons leaving, then entering, the arc.
pub fn assign_angle_labels(arcs: &mut [ArcDescriptor], chords: &[ChordDescriptor], format: &str) {
    let max_value = arcs.iter().map(|arc| arc.value).fold(0.0, f64::max);
    let formatter = ValueFormatter::with_display_units(Some(format), max_value);

    for arc in arcs.iter_mut() {
        let outgoing = chords
            .iter()
            .filter(|chord| chord.source.index == arc.index)
            .map(|chord| chord.source.value);
        let incoming = chords
            .iter()
            .filter(|chord| chord.target.index == arc.index)
            .map(|chord| chord.target.value);

        let mut values = vec![0.0];
        values.extend(running_sum(outgoing));
        values.extend(running_sum(incoming));

        let span = arc.end_angle - arc.start_angle;
        let scale = if arc.value > 0.0 && span.is_finite() {
            span / arc.value
        } else {
            0.0
        };
        arc.angle_labels = values
            .into_iter()
            .map(|value| AngleLabel {
                angle: arc.start_angle + value * scale,
                label: formatter.format(value),
            })
            .collect();
    }
}

fn running_sum(values: impl Iterator<Item = f64>) -> Vec<f64> {
    values
        .scan(0.0, |total, value| {
            *total += value;
            Some(*total)
        })
        .collect()
}
