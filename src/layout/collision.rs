use std::collections::{HashMap, HashSet};

use super::types::Viewport;

/// (x, y, width, height)
pub type Rect = (f64, f64, f64, f64);

const PRECISION: f64 = 1e-5;

pub fn overlap_area(a: &Rect, b: &Rect) -> f64 {
    let (w, h) = intersection(a, b);
    w * h
}

fn intersection(a: &Rect, b: &Rect) -> (f64, f64) {
    let x0 = a.0.max(b.0);
    let y0 = a.1.max(b.1);
    let x1 = (a.0 + a.2).min(b.0 + b.2);
    let y1 = (a.1 + a.3).min(b.1 + b.3);
    ((x1 - x0).max(0.0), (y1 - y0).max(0.0))
}

/// Accepted label boxes, bucketed by grid cell for overlap queries.
#[derive(Debug)]
pub struct ArrangeGrid {
    cell: f64,
    cells: HashMap<(i32, i32), Vec<usize>>,
    rects: Vec<Rect>,
}

impl ArrangeGrid {
    pub fn new(cell: f64) -> Self {
        Self {
            cell: cell.max(16.0),
            cells: HashMap::new(),
            rects: Vec::new(),
        }
    }

    fn cell_range(&self, rect: &Rect) -> (i32, i32, i32, i32) {
        (
            (rect.0 / self.cell).floor() as i32,
            (rect.1 / self.cell).floor() as i32,
            ((rect.0 + rect.2) / self.cell).floor() as i32,
            ((rect.1 + rect.3) / self.cell).floor() as i32,
        )
    }

    pub fn add(&mut self, rect: Rect) {
        let idx = self.rects.len();
        let (x0, y0, x1, y1) = self.cell_range(&rect);
        for ix in x0..=x1 {
            for iy in y0..=y1 {
                self.cells.entry((ix, iy)).or_default().push(idx);
            }
        }
        self.rects.push(rect);
    }

    pub fn has_conflict(&self, rect: &Rect) -> bool {
        let (x0, y0, x1, y1) = self.cell_range(rect);
        let mut seen = HashSet::new();
        for ix in x0..=x1 {
            for iy in y0..=y1 {
                let Some(bucket) = self.cells.get(&(ix, iy)) else {
                    continue;
                };
                for &idx in bucket {
                    if seen.insert(idx) && overlap_area(&self.rects[idx], rect) > 0.0 {
                        return true;
                    }
                }
            }
        }
        false
    }
}

/// Whether a label box sits far enough inside `area`: horizontally the
/// area is widened by `inflate`, vertically at least half the box must be
/// covered by the area shifted down by half the box height.
pub fn fits_drawing_area(rect: &Rect, area: Viewport, inflate: f64) -> bool {
    let region: Rect = (
        -inflate,
        rect.3 / 2.0,
        area.width + inflate * 2.0,
        area.height,
    );
    let (w, h) = intersection(&region, rect);
    if w <= 0.0 || h <= 0.0 {
        return false;
    }
    h >= rect.3 / 2.0 - PRECISION
}
