use std::f64::consts::TAU;

use super::types::{ArcDescriptor, ChordData, ChordDescriptor, ChordEnd};

/// Arc groups and ribbons for a square flow matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct ChordGeometry {
    pub groups: Vec<ChordEnd>,
    pub chords: Vec<ChordDescriptor>,
}

/// Circular chord layout: each row becomes an arc sized by its row sum,
/// laid out clockwise from 12 o'clock in index order with `pad_angle`
/// between neighbours. Within arc `i` the sub-group for column `j` spans
/// `matrix[i][j]`. One ribbon per unordered pair with any flow; its source
/// is the direction carrying the larger value.
pub fn chord_layout(matrix: &[Vec<f64>], pad_angle: f64) -> ChordGeometry {
    let n = matrix.len();
    let cell = |i: usize, j: usize| {
        matrix
            .get(i)
            .and_then(|row| row.get(j))
            .copied()
            .filter(|value| value.is_finite())
            .unwrap_or(0.0)
    };
    let group_sums: Vec<f64> = (0..n).map(|i| (0..n).map(|j| cell(i, j)).sum()).collect();
    let total: f64 = group_sums.iter().sum();

    let k = (TAU - pad_angle * n as f64).max(0.0) / total;
    if !k.is_finite() || n == 0 {
        // No flow to distribute. Every angle collapses to zero.
        let groups = (0..n)
            .map(|index| ChordEnd {
                index,
                start_angle: 0.0,
                end_angle: 0.0,
                value: sanitize(group_sums[index]),
            })
            .collect();
        return ChordGeometry {
            groups,
            chords: Vec::new(),
        };
    }
    let dx = if k > 0.0 { pad_angle } else { TAU / n as f64 };

    let mut subgroups = vec![
        ChordEnd {
            index: 0,
            start_angle: 0.0,
            end_angle: 0.0,
            value: 0.0,
        };
        n * n
    ];
    let mut groups = Vec::with_capacity(n);
    let mut x = 0.0;
    for i in 0..n {
        let x0 = x;
        for j in 0..n {
            let value = cell(i, j);
            let start = x;
            x += value * k;
            subgroups[j * n + i] = ChordEnd {
                index: i,
                start_angle: start,
                end_angle: x,
                value,
            };
        }
        groups.push(ChordEnd {
            index: i,
            start_angle: sanitize(x0),
            end_angle: sanitize(x),
            value: sanitize(group_sums[i]),
        });
        x += dx;
    }

    let mut chords = Vec::new();
    for i in 0..n {
        for j in i..n {
            let outgoing = subgroups[j * n + i];
            let incoming = subgroups[i * n + j];
            if outgoing.value == 0.0 && incoming.value == 0.0 {
                continue;
            }
            let (source, target) = if outgoing.value < incoming.value {
                (incoming, outgoing)
            } else {
                (outgoing, incoming)
            };
            chords.push(ChordDescriptor {
                source,
                target,
                has_highlight: false,
                opacity: 1.0,
            });
        }
    }

    ChordGeometry { groups, chords }
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Attach display data and selection identity to each group.
pub fn arc_descriptors(groups: &[ChordEnd], data: &ChordData, full_opacity: f64) -> Vec<ArcDescriptor> {
    groups
        .iter()
        .filter_map(|group| {
            let label = data.labels.get(group.index)?;
            Some(ArcDescriptor {
                index: group.index,
                start_angle: group.start_angle,
                end_angle: group.end_angle,
                value: group.value,
                data: label.clone(),
                identity: data.identities.get(group.index).cloned().flatten(),
                selected: false,
                opacity: full_opacity,
                angle_labels: Vec::new(),
            })
        })
        .collect()
}
