use std::collections::BTreeMap;

use log::{info, warn};
use serde::Serialize;

use crate::chart::hexbin::{Extent, HexGrid, HexIndex, COURT_EXTENT};
use crate::chart::zones::{zone_differentials, ZoneComparison, ZoneGapPolicy, ZoneKey, ZoneTable};
use crate::nba::params::Subject;
use crate::shots::ShotRecord;

pub const DEFAULT_GRID_WIDTH: u32 = 35;

/// Relative attempt frequency of a cell, in four ordinal tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SizeCategory {
    Smallest,
    SmallMedium,
    MediumLarge,
    Largest,
}

/// One occupied hexagon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HexCell {
    pub x: f64,
    pub y: f64,
    pub attempts: u32,
    pub mean_differential: f64,
    /// Rank of `attempts` among all occupied cells, in (0, 1].
    pub percentile: f64,
    pub size: SizeCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchStatus {
    Matched,
    /// The subject has no shots in the data; there is nothing to bin.
    EmptySubjectMatch,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateOptions {
    pub grid_width: u32,
    pub gap_policy: ZoneGapPolicy,
    pub extent: Extent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    pub cells: Vec<HexCell>,
    pub zones: Vec<ZoneComparison>,
    pub status: MatchStatus,
    /// Attempts by the subject.
    pub target_attempts: u32,
    /// Attempts that landed in a cell.
    pub binned_attempts: u32,
    /// Attempts left out because their zone has no differential.
    pub excluded_attempts: u32,
    /// Attempts outside the binning extent.
    pub outside_attempts: u32,
}

#[derive(Default)]
struct Bin {
    attempts: u32,
    shots: u32,
    differential_sum: f64,
}

impl SizeCategory {
    pub fn from_percentile(pct: f64) -> Self {
        if pct <= 0.40 {
            SizeCategory::Smallest
        } else if pct <= 0.75 {
            SizeCategory::SmallMedium
        } else if pct <= 0.90 {
            SizeCategory::MediumLarge
        } else {
            SizeCategory::Largest
        }
    }

    /// Marker area in square points.
    pub fn marker_area(&self) -> f64 {
        match self {
            SizeCategory::Smallest => 2.0,
            SizeCategory::SmallMedium => 40.0,
            SizeCategory::MediumLarge => 100.0,
            SizeCategory::Largest => 200.0,
        }
    }
}

impl Default for AggregateOptions {
    fn default() -> Self {
        AggregateOptions { grid_width: DEFAULT_GRID_WIDTH, gap_policy: ZoneGapPolicy::default(), extent: COURT_EXTENT }
    }
}

impl Aggregation {
    fn empty(status: MatchStatus) -> Self {
        Aggregation {
            cells: Vec::new(),
            zones: Vec::new(),
            status,
            target_attempts: 0,
            binned_attempts: 0,
            excluded_attempts: 0,
            outside_attempts: 0,
        }
    }

    pub fn subject_matched(&self) -> bool {
        self.status == MatchStatus::Matched
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Bin the subject's shots, colouring each cell by how the subject shoots
/// in the cell's zones relative to the whole league in `shots`.
pub fn aggregate(shots: &[ShotRecord], subject: &Subject, grid_width: u32) -> Aggregation {
    let league = ZoneTable::from_shots(shots);
    let options = AggregateOptions { grid_width, ..Default::default() };
    aggregate_with(&league, shots, subject, &options)
}

/// [`aggregate`] against a caller-supplied league baseline.
pub fn aggregate_with(
    league: &ZoneTable,
    shots: &[ShotRecord],
    subject: &Subject,
    options: &AggregateOptions,
) -> Aggregation {
    let target: Vec<&ShotRecord> = shots
        .iter()
        .filter(|shot| shot.subject_value(subject.field) == subject.value)
        .collect();
    if target.is_empty() {
        warn!("No shots found for {} {:?}", subject.field, subject.value);
        return Aggregation::empty(MatchStatus::EmptySubjectMatch);
    }

    let zones = zone_differentials(&ZoneTable::from_shots(target.iter().copied()), league);
    let differential_by_zone: BTreeMap<&ZoneKey, Option<f64>> =
        zones.iter().map(|z| (&z.zone, z.differential)).collect();

    let grid = HexGrid::new(options.extent, options.grid_width);
    let mut bins: BTreeMap<HexIndex, Bin> = BTreeMap::new();
    let mut aggregation = Aggregation::empty(MatchStatus::Matched);
    for shot in &target {
        let attempts = u32::from(shot.shot_attempted_flag);
        aggregation.target_attempts += attempts;

        let zone_differential = differential_by_zone.get(&ZoneKey::of(shot)).copied().flatten();
        let Some(differential) = options.gap_policy.resolve(zone_differential) else {
            aggregation.excluded_attempts += attempts;
            continue;
        };
        let Some(index) = grid.locate(shot.loc_x, shot.loc_y) else {
            aggregation.outside_attempts += attempts;
            continue;
        };
        let bin = bins.entry(index).or_default();
        bin.attempts += attempts;
        bin.shots += 1;
        bin.differential_sum += differential;
        aggregation.binned_attempts += attempts;
    }

    let attempts: Vec<u32> = bins.values().map(|b| b.attempts).collect();
    let percentiles = percentile_ranks(&attempts);
    aggregation.cells = bins
        .iter()
        .zip(percentiles)
        .map(|((&index, bin), percentile)| {
            let (x, y) = grid.center(index);
            HexCell {
                x,
                y,
                attempts: bin.attempts,
                mean_differential: bin.differential_sum / f64::from(bin.shots),
                percentile,
                size: SizeCategory::from_percentile(percentile),
            }
        })
        .collect();
    aggregation.zones = zones;

    info!(
        "Binned {} of {} attempts for {} into {} cells ({} without a zone differential, {} off the court)",
        aggregation.binned_attempts,
        aggregation.target_attempts,
        subject.value,
        aggregation.cells.len(),
        aggregation.excluded_attempts,
        aggregation.outside_attempts,
    );
    aggregation
}

/// Percentile rank of each value: its 1-based rank among `values`, ties
/// sharing the average of their ranks, divided by the number of values.
pub fn percentile_ranks(values: &[u32]) -> Vec<f64> {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by_key(|&i| values[i]);

    let mut ranks = vec![0.0; n];
    let mut start = 0;
    while start < n {
        let mut end = start;
        while end + 1 < n && values[order[end + 1]] == values[order[start]] {
            end += 1;
        }
        // positions start..=end hold ranks start+1..=end+1
        let average_rank = (start + end + 2) as f64 / 2.0;
        for &i in &order[start..=end] {
            ranks[i] = average_rank / n as f64;
        }
        start = end + 1;
    }
    ranks
}
