use crate::config::Margin;

use super::types::Viewport;

/// Drawing area bookkeeping: outer viewport, margins and the inner area
/// left once margins are removed. Both areas are kept at or above the
/// minimum viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualLayout {
    viewport: Viewport,
    margin: Margin,
    min_viewport: Viewport,
    viewport_in: Viewport,
}

impl VisualLayout {
    pub fn new(viewport: Viewport, margin: Margin, min_viewport: Viewport) -> Self {
        let mut layout = Self {
            viewport: at_least(viewport, min_viewport),
            margin: non_negative(margin),
            min_viewport,
            viewport_in: min_viewport,
        };
        layout.update();
        layout
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn viewport_in(&self) -> Viewport {
        self.viewport_in
    }

    pub fn margin(&self) -> Margin {
        self.margin
    }

    pub fn set_margin(&mut self, margin: Margin) {
        self.margin = non_negative(margin);
        self.update();
    }

    /// Top and bottom margins sized to half the label font.
    pub fn fit_label_font(&mut self, font_size_px: f64) {
        let half = font_size_px / 2.0;
        self.set_margin(Margin {
            top: half,
            bottom: half,
            ..self.margin
        });
    }

    fn update(&mut self) {
        self.viewport_in = at_least(
            Viewport {
                width: self.viewport.width - (self.margin.left + self.margin.right),
                height: self.viewport.height - (self.margin.top + self.margin.bottom),
            },
            self.min_viewport,
        );
    }
}

fn at_least(value: Viewport, min: Viewport) -> Viewport {
    Viewport {
        width: max_finite(value.width, min.width),
        height: max_finite(value.height, min.height),
    }
}

fn max_finite(value: f64, min: f64) -> f64 {
    if value.is_finite() { value.max(min) } else { min }
}

fn non_negative(margin: Margin) -> Margin {
    Margin {
        top: max_finite(margin.top, 0.0),
        right: max_finite(margin.right, 0.0),
        bottom: max_finite(margin.bottom, 0.0),
        left: max_finite(margin.left, 0.0),
    }
}

/// Chord radius for the inner area. With labels shown, a sigmoid on the
/// aspect ratio moves the denominator from 2 toward 3 so tall areas keep
/// horizontal room for labels.
pub fn chord_radius(viewport_in: Viewport, labels_shown: bool) -> f64 {
    let min_side = viewport_in.height.min(viewport_in.width);
    if !labels_shown {
        return min_side / 2.0;
    }
    let aspect = viewport_in.height / viewport_in.width;
    let denominator = 2.0 + 1.0 / (1.0 + (-5.0 * (aspect - 1.0)).exp());
    min_side / denominator
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: Viewport = Viewport {
        width: 150.0,
        height: 150.0,
    };

    #[test]
    fn inner_area_removes_margins() {
        let layout = VisualLayout::new(
            Viewport {
                width: 800.0,
                height: 600.0,
            },
            Margin::uniform(10.0),
            MIN,
        );
        assert_eq!(
            layout.viewport_in(),
            Viewport {
                width: 780.0,
                height: 580.0
            }
        );
    }

    #[test]
    fn small_viewports_clamp_to_minimum() {
        let layout = VisualLayout::new(
            Viewport {
                width: 100.0,
                height: 40.0,
            },
            Margin::uniform(10.0),
            MIN,
        );
        assert_eq!(layout.viewport(), MIN);
        assert_eq!(layout.viewport_in(), MIN);
    }

    #[test]
    fn label_font_sets_vertical_margins() {
        let mut layout = VisualLayout::new(
            Viewport {
                width: 400.0,
                height: 400.0,
            },
            Margin::uniform(10.0),
            MIN,
        );
        layout.fit_label_font(12.0);
        assert_eq!(layout.margin().top, 6.0);
        assert_eq!(layout.margin().left, 10.0);
        assert_eq!(layout.viewport_in().height, 388.0);
    }

    #[test]
    fn radius_denominator_blends_with_aspect() {
        let square = Viewport {
            width: 300.0,
            height: 300.0,
        };
        assert!((chord_radius(square, true) - 120.0).abs() < 1e-9);
        assert_eq!(chord_radius(square, false), 150.0);

        let tall = Viewport {
            width: 300.0,
            height: 900.0,
        };
        assert!(chord_radius(tall, true) < 150.0);
        assert!(chord_radius(tall, true) > 100.0);
    }
}
