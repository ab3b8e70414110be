//! Half-court lines in shot-location units (tenths of a foot, hoop at the origin).

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CourtShape {
    Circle { cx: f64, cy: f64, r: f64 },
    /// Anchored at `(x, y)`; a negative `height` extends downwards.
    Rect { x: f64, y: f64, width: f64, height: f64, filled: bool },
    Segment { x1: f64, y1: f64, x2: f64, y2: f64 },
    /// Counter-clockwise from `start_deg` to `end_deg`, wrapping past 360.
    Arc { cx: f64, cy: f64, r: f64, start_deg: f64, end_deg: f64, dashed: bool },
}

pub const HALF_COURT: &[CourtShape] = &[
    // hoop, 18" diameter
    CourtShape::Circle { cx: 0.0, cy: 0.0, r: 7.5 },
    // backboard
    CourtShape::Rect { x: -30.0, y: -7.5, width: 60.0, height: -1.0, filled: true },
    // paint, 16ft x 19ft
    CourtShape::Rect { x: -80.0, y: -47.5, width: 160.0, height: 190.0, filled: false },
    // free throw circle
    CourtShape::Arc { cx: 0.0, cy: 142.5, r: 60.0, start_deg: 0.0, end_deg: 180.0, dashed: false },
    CourtShape::Arc { cx: 0.0, cy: 142.5, r: 60.0, start_deg: 180.0, end_deg: 0.0, dashed: true },
    // restricted area, 4ft from the centre of the hoop
    CourtShape::Arc { cx: 0.0, cy: 0.0, r: 40.0, start_deg: 0.0, end_deg: 180.0, dashed: false },
    // corner threes run 14ft before the arc starts
    CourtShape::Segment { x1: -220.0, y1: -47.5, x2: -220.0, y2: 92.5 },
    CourtShape::Segment { x1: 220.0, y1: -47.5, x2: 220.0, y2: 92.5 },
    // three point arc, 23'9" from the hoop
    CourtShape::Arc { cx: 0.0, cy: 0.0, r: 237.5, start_deg: 22.0, end_deg: 158.0, dashed: false },
];

/// Baseline, sidelines and half-court line.
pub const BOUNDARY: CourtShape = CourtShape::Rect { x: -250.0, y: -47.5, width: 500.0, height: 470.0, filled: false };

/// The shapes to draw, boundary last.
pub fn court_shapes(outer_lines: bool) -> impl Iterator<Item = &'static CourtShape> {
    HALF_COURT.iter().chain(outer_lines.then_some(&BOUNDARY))
}

impl CourtShape {
    /// Points along an arc, `segments + 1` of them including both ends.
    /// Empty for other shapes.
    pub fn arc_points(&self, segments: usize) -> Vec<(f64, f64)> {
        let CourtShape::Arc { cx, cy, r, start_deg, end_deg, .. } = *self else {
            return Vec::new();
        };
        let sweep = if end_deg > start_deg { end_deg - start_deg } else { end_deg + 360.0 - start_deg };
        let segments = segments.max(1);
        (0..=segments)
            .map(|k| {
                let theta = (start_deg + sweep * k as f64 / segments as f64).to_radians();
                (cx + r * theta.cos(), cy + r * theta.sin())
            })
            .collect()
    }
}
