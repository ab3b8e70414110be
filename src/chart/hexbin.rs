//! Hexagonal binning over a rectangular extent.
//!
//! The grid is two interleaved rectangular lattices of hexagon centres: the
//! corner lattice with `(nx + 1) x (ny + 1)` centres on the grid lines and the
//! offset lattice with `nx x ny` centres half a step in on both axes. A point
//! belongs to whichever of its two candidate centres is nearer under the
//! hexagonal metric `dx^2 + 3 dy^2` (in grid steps).

/// Binning extent. `y_min` may be larger than `y_max`, which anchors the
/// lattice at the top edge instead of the bottom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

/// The half court in shot-location units, anchored at the half-court line.
pub const COURT_EXTENT: Extent = Extent { x_min: -250.0, x_max: 250.0, y_min: 422.5, y_max: -47.5 };

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Lattice {
    Corner,
    Offset,
}

/// Ordering is lattice first, then column, then row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HexIndex {
    pub lattice: Lattice,
    pub i: usize,
    pub j: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HexGrid {
    nx: usize,
    ny: usize,
    x_min: f64,
    y_min: f64,
    sx: f64,
    sy: f64,
}

impl HexGrid {
    /// A grid `width` hexagons across. The row count keeps the hexagons
    /// close to regular: `floor(width / sqrt(3))`, at least one.
    pub fn new(extent: Extent, width: u32) -> Self {
        let nx = width.max(1) as usize;
        let ny = ((nx as f64 / 3f64.sqrt()) as usize).max(1);
        let padding = 1e-9 * (extent.x_max - extent.x_min);
        let x_min = extent.x_min - padding;
        let x_max = extent.x_max + padding;
        HexGrid {
            nx,
            ny,
            x_min,
            y_min: extent.y_min,
            sx: (x_max - x_min) / nx as f64,
            sy: (extent.y_max - extent.y_min) / ny as f64,
        }
    }

    /// The cell containing `(x, y)`, or `None` if it falls off the lattice.
    pub fn locate(&self, x: f64, y: f64) -> Option<HexIndex> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let ix = (x - self.x_min) / self.sx;
        let iy = (y - self.y_min) / self.sy;
        let (ix1, iy1) = (ix.round_ties_even(), iy.round_ties_even());
        let (ix2, iy2) = (ix.floor(), iy.floor());

        let d1 = (ix - ix1).powi(2) + 3.0 * (iy - iy1).powi(2);
        let d2 = (ix - ix2 - 0.5).powi(2) + 3.0 * (iy - iy2 - 0.5).powi(2);

        if d1 < d2 {
            index_in(Lattice::Corner, ix1, iy1, self.nx + 1, self.ny + 1)
        } else {
            index_in(Lattice::Offset, ix2, iy2, self.nx, self.ny)
        }
    }

    pub fn center(&self, index: HexIndex) -> (f64, f64) {
        let shift = match index.lattice {
            Lattice::Corner => 0.0,
            Lattice::Offset => 0.5,
        };
        (
            self.x_min + (index.i as f64 + shift) * self.sx,
            self.y_min + (index.j as f64 + shift) * self.sy,
        )
    }
}

fn index_in(lattice: Lattice, i: f64, j: f64, ni: usize, nj: usize) -> Option<HexIndex> {
    if i >= 0.0 && j >= 0.0 && i < ni as f64 && j < nj as f64 {
        Some(HexIndex { lattice, i: i as usize, j: j as usize })
    } else {
        None
    }
}
