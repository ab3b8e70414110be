//! Diverging color scales for efficiency differentials.

use std::fmt;

use crate::error::{Result, ShotChartError};

/// Differentials at or beyond these bounds get the end colors of the scale.
pub const DIFFERENTIAL_MIN: f64 = -0.10;
pub const DIFFERENTIAL_MAX: f64 = 0.10;

pub const DEFAULT_COLOR_SCALE: &str = "coolwarm";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl fmt::Display for Rgb {
    /// Format as CSS hex: #rrggbb
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

const fn rgb(r: u8, g: u8, b: u8) -> Rgb {
    Rgb { r, g, b }
}

// Evenly spaced stops, low end first.
const PALETTES: &[(&str, &[Rgb])] = &[
    ("coolwarm", &[
        rgb(59, 76, 192), rgb(98, 130, 234), rgb(141, 176, 254), rgb(184, 208, 249), rgb(221, 221, 221),
        rgb(245, 196, 173), rgb(244, 154, 123), rgb(222, 96, 77), rgb(180, 4, 38),
    ]),
    ("bwr", &[rgb(0, 0, 255), rgb(255, 255, 255), rgb(255, 0, 0)]),
    ("seismic", &[rgb(0, 0, 76), rgb(0, 0, 255), rgb(255, 255, 255), rgb(255, 0, 0), rgb(128, 0, 0)]),
    ("RdBu", &[
        rgb(103, 0, 31), rgb(178, 24, 43), rgb(214, 96, 77), rgb(244, 165, 130), rgb(253, 219, 199),
        rgb(247, 247, 247), rgb(209, 229, 240), rgb(146, 197, 222), rgb(67, 147, 195), rgb(33, 102, 172),
        rgb(5, 48, 97),
    ]),
    ("PiYG", &[
        rgb(142, 1, 82), rgb(197, 27, 125), rgb(222, 119, 174), rgb(241, 182, 218), rgb(253, 224, 239),
        rgb(247, 247, 247), rgb(230, 245, 208), rgb(184, 225, 134), rgb(127, 188, 65), rgb(77, 146, 33),
        rgb(39, 100, 25),
    ]),
];

/// A named diverging palette mapped onto [`DIFFERENTIAL_MIN`, `DIFFERENTIAL_MAX`].
#[derive(Clone, Debug, PartialEq)]
pub struct DivergingScale {
    name: String,
    stops: Vec<Rgb>,
}

impl DivergingScale {
    /// Look up a palette by name. Append `_r` for the reversed palette.
    pub fn named(name: &str) -> Result<Self> {
        let (base, reversed) = match name.strip_suffix("_r") {
            Some(base) => (base, true),
            None => (name, false),
        };
        let (_, stops) = PALETTES
            .iter()
            .find(|(palette, _)| palette.eq_ignore_ascii_case(base))
            .ok_or_else(|| ShotChartError::UnknownColorScale {
                name: name.to_string(),
                known: known_scales().join(", "),
            })?;
        let mut stops = stops.to_vec();
        if reversed {
            stops.reverse();
        }
        Ok(DivergingScale { name: name.to_string(), stops })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Color for a differential. Non-finite values are drawn as zero and
    /// values are clamped to the scale's range.
    pub fn color_for(&self, differential: f64) -> Rgb {
        let d = if differential.is_finite() { differential } else { 0.0 };
        let t = (d.clamp(DIFFERENTIAL_MIN, DIFFERENTIAL_MAX) - DIFFERENTIAL_MIN) / (DIFFERENTIAL_MAX - DIFFERENTIAL_MIN);

        let segments = self.stops.len() - 1;
        let pos = t * segments as f64;
        let k = (pos.floor() as usize).min(segments - 1);
        let frac = pos - k as f64;
        let (lo, hi) = (self.stops[k], self.stops[k + 1]);
        let lerp = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * frac).round() as u8;
        Rgb { r: lerp(lo.r, hi.r), g: lerp(lo.g, hi.g), b: lerp(lo.b, hi.b) }
    }
}

impl Default for DivergingScale {
    fn default() -> Self {
        DivergingScale { name: DEFAULT_COLOR_SCALE.to_string(), stops: PALETTES[0].1.to_vec() }
    }
}

pub fn known_scales() -> Vec<&'static str> {
    PALETTES.iter().map(|(name, _)| *name).collect()
}
