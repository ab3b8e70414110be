//! SVG shot chart rendering.

use std::{
    fmt::Write,
    fs,
    path::Path,
};

use log::info;

use crate::chart::aggregate::HexCell;
use crate::chart::color::{DivergingScale, Rgb};
use crate::chart::court::{court_shapes, CourtShape};
use crate::chart::hexbin::COURT_EXTENT;
use crate::error::Result;

pub const DEFAULT_WATERMARK: &str = "@safee.c";

/// Typographic points per court unit on a 10in wide figure.
const POINTS_PER_UNIT: f64 = 1.44;
const PIXELS_PER_UNIT: f64 = 2.0;
const COURT_LINE_COLOR: Rgb = Rgb { r: 255, g: 235, b: 205 };
const COURT_LINE_WIDTH_PT: f64 = 2.0;
const ARC_SEGMENTS: usize = 72;

#[derive(Debug, Clone)]
pub struct ShotChart {
    pub scale: DivergingScale,
    pub outer_lines: bool,
    pub watermark: String,
}

impl Default for ShotChart {
    fn default() -> Self {
        ShotChart { scale: DivergingScale::default(), outer_lines: true, watermark: DEFAULT_WATERMARK.to_string() }
    }
}

impl ShotChart {
    /// Draw the court, one hexagon per cell, then the labels, as an SVG document.
    pub fn render(&self, cells: &[HexCell], subject_label: &str, season_label: &str) -> Result<String> {
        let x0 = COURT_EXTENT.x_min;
        let y0 = COURT_EXTENT.y_max;
        let width = COURT_EXTENT.x_max - COURT_EXTENT.x_min;
        let height = COURT_EXTENT.y_min - COURT_EXTENT.y_max;

        let mut svg = String::new();
        writeln!(svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="{} {} {} {}">"#,
            width * PIXELS_PER_UNIT,
            height * PIXELS_PER_UNIT,
            x0,
            y0,
            width,
            height
        )?;
        writeln!(svg, r#"<rect x="{}" y="{}" width="{}" height="{}" fill="black"/>"#, x0, y0, width, height)?;

        writeln!(
            svg,
            r#"<g id="court" stroke="{}" stroke-width="{:.3}" fill="none">"#,
            COURT_LINE_COLOR,
            COURT_LINE_WIDTH_PT / POINTS_PER_UNIT
        )?;
        for shape in court_shapes(self.outer_lines) {
            write_shape(&mut svg, shape)?;
        }
        writeln!(svg, "</g>")?;

        writeln!(svg, r#"<g id="shots" stroke="none">"#)?;
        for cell in cells {
            let radius = cell.size.marker_area().sqrt() / 2.0 / POINTS_PER_UNIT;
            writeln!(
                svg,
                r#"<polygon class="cell" points="{}" fill="{}"/>"#,
                hexagon_points(cell.x, cell.y, radius),
                self.scale.color_for(cell.mean_differential)
            )?;
        }
        writeln!(svg, "</g>")?;

        writeln!(svg, r#"<g id="labels" font-family="sans-serif">"#)?;
        writeln!(
            svg,
            r#"<text x="240" y="390" text-anchor="end" font-size="{:.2}" font-weight="bold" fill="white">{}</text>"#,
            20.0 / POINTS_PER_UNIT,
            escape(subject_label)
        )?;
        writeln!(
            svg,
            r#"<text x="240" y="410" text-anchor="end" font-size="{:.2}" font-style="italic" fill="dimgrey">{} (reg. season)</text>"#,
            16.0 / POINTS_PER_UNIT,
            escape(season_label)
        )?;
        writeln!(
            svg,
            r#"<text x="-245" y="415" font-size="{:.2}" font-weight="bold" fill="purple">{}</text>"#,
            30.0 / POINTS_PER_UNIT,
            escape(&self.watermark)
        )?;
        writeln!(svg, "</g>")?;
        writeln!(svg, "</svg>")?;
        Ok(svg)
    }
}

/// Write a rendered chart, creating parent directories as needed.
pub fn write_svg(path: &Path, svg: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, svg)?;
    info!("Wrote shot chart to {}", path.display());
    Ok(())
}

fn write_shape(svg: &mut String, shape: &CourtShape) -> std::fmt::Result {
    match *shape {
        CourtShape::Circle { cx, cy, r } => writeln!(svg, r#"<circle cx="{}" cy="{}" r="{}"/>"#, cx, cy, r),
        CourtShape::Rect { x, y, width, height, filled } => {
            let fill = if filled { COURT_LINE_COLOR.to_string() } else { "none".to_string() };
            writeln!(
                svg,
                r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
                x.min(x + width),
                y.min(y + height),
                width.abs(),
                height.abs(),
                fill
            )
        }
        CourtShape::Segment { x1, y1, x2, y2 } => {
            writeln!(svg, r#"<line x1="{}" y1="{}" x2="{}" y2="{}"/>"#, x1, y1, x2, y2)
        }
        CourtShape::Arc { dashed, .. } => {
            let mut d = String::new();
            for (k, (x, y)) in shape.arc_points(ARC_SEGMENTS).into_iter().enumerate() {
                let cmd = if k == 0 { 'M' } else { 'L' };
                write!(d, "{}{:.2},{:.2} ", cmd, x, y)?;
            }
            let dash = if dashed { r#" stroke-dasharray="6,4""# } else { "" };
            writeln!(svg, r#"<path d="{}"{}/>"#, d.trim_end(), dash)
        }
    }
}

/// Pointy-top hexagon around `(cx, cy)`.
fn hexagon_points(cx: f64, cy: f64, radius: f64) -> String {
    (0..6)
        .map(|k| {
            let theta = (90.0 + 60.0 * k as f64).to_radians();
            format!("{:.2},{:.2}", cx + radius * theta.cos(), cy + radius * theta.sin())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::aggregate::SizeCategory;
    use crate::chart::court::HALF_COURT;

    fn cell(x: f64, y: f64, mean_differential: f64, size: SizeCategory) -> HexCell {
        HexCell { x, y, attempts: 1, mean_differential, percentile: 1.0, size }
    }

    fn fills(svg: &str) -> Vec<&str> {
        svg.lines()
            .filter(|l| l.contains(r#"class="cell""#))
            .filter_map(|l| l.split(r#"fill=""#).nth(1))
            .map(|rest| &rest[..7])
            .collect()
    }

    #[test]
    fn empty_chart_is_court_only() {
        let svg = ShotChart::default().render(&[], "Nobody", "2019-20").unwrap();
        assert!(svg.starts_with("<?xml"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(!svg.contains(r#"class="cell""#));
        let court_elements = svg.lines().filter(|l| {
            l.starts_with("<circle") || l.starts_with("<line") || l.starts_with("<path") || l.starts_with("<rect x=\"-")
        });
        // background + every court shape + boundary
        assert_eq!(court_elements.count(), HALF_COURT.len() + 2);
        assert!(svg.contains("2019-20 (reg. season)"));
        assert!(svg.contains(DEFAULT_WATERMARK));
    }

    #[test]
    fn one_marker_per_cell() {
        let cells = [
            cell(0.0, 10.0, 0.02, SizeCategory::Largest),
            cell(-100.0, 200.0, -0.04, SizeCategory::Smallest),
        ];
        let svg = ShotChart::default().render(&cells, "Pascal Siakam", "2019-20").unwrap();
        assert_eq!(fills(&svg).len(), 2);
        assert!(svg.contains(">Pascal Siakam</text>"));
    }

    #[test]
    fn clamped_differentials_render_identically() {
        let chart = ShotChart::default();
        let beyond = chart.render(&[cell(0.0, 0.0, 0.25, SizeCategory::MediumLarge)], "A", "2019-20").unwrap();
        let at_edge = chart.render(&[cell(0.0, 0.0, 0.10, SizeCategory::MediumLarge)], "A", "2019-20").unwrap();
        assert_eq!(beyond, at_edge);
        assert_eq!(fills(&beyond), vec!["#b40426"]);
    }

    #[test]
    fn marker_size_follows_tier() {
        let small = hexagon_points(0.0, 0.0, SizeCategory::Smallest.marker_area().sqrt() / 2.0 / POINTS_PER_UNIT);
        let large = hexagon_points(0.0, 0.0, SizeCategory::Largest.marker_area().sqrt() / 2.0 / POINTS_PER_UNIT);
        let top_y = |points: &str| -> f64 {
            points.split(' ').next().unwrap().split(',').nth(1).unwrap().parse().unwrap()
        };
        assert!(top_y(&large) > top_y(&small));
        assert_eq!(small.split(' ').count(), 6);
    }

    #[test]
    fn labels_are_escaped() {
        let svg = ShotChart::default().render(&[], "Tom & <Jerry>", "2019-20").unwrap();
        assert!(svg.contains("Tom &amp; &lt;Jerry&gt;"));
    }

    #[test]
    fn boundary_can_be_left_out() {
        let chart = ShotChart { outer_lines: false, ..Default::default() };
        let svg = chart.render(&[], "A", "2019-20").unwrap();
        assert!(!svg.contains(r#"<rect x="-250" y="-47.5" width="500" height="470" fill="none"/>"#));
        let with = ShotChart::default().render(&[], "A", "2019-20").unwrap();
        assert!(with.contains(r#"<rect x="-250" y="-47.5" width="500" height="470" fill="none"/>"#));
    }

    #[test]
    fn writes_into_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("charts").join("chart.svg");
        write_svg(&path, "<svg/>").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "<svg/>");
    }
}
