use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tabled::{Table, Tabled};

use crate::shots::ShotRecord;

/// A (zone basic, zone area) pair, e.g. ("Above the Break 3", "Left Side Center(LC)").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ZoneKey {
    pub basic: String,
    pub area: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZoneAverage {
    pub attempts: u32,
    pub makes: u32,
}

/// Zone averages keyed by zone, iterated in zone order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneTable {
    zones: BTreeMap<ZoneKey, ZoneAverage>,
}

/// One target zone joined against the league.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneComparison {
    pub zone: ZoneKey,
    pub target: ZoneAverage,
    pub league: Option<ZoneAverage>,
    /// Target make rate minus league make rate; `None` when the league has no
    /// rate for this zone.
    pub differential: Option<f64>,
}

/// What happens to shots whose zone has no differential.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneGapPolicy {
    /// Leave the shots out of binning.
    #[default]
    Drop,
    /// Bin the shots with a differential of zero.
    TreatAsZero,
}

impl ZoneKey {
    pub fn new(basic: impl Into<String>, area: impl Into<String>) -> Self {
        ZoneKey { basic: basic.into(), area: area.into() }
    }

    pub fn of(shot: &ShotRecord) -> Self {
        ZoneKey::new(shot.shot_zone_basic.as_str(), shot.shot_zone_area.as_str())
    }
}

impl ZoneAverage {
    pub fn make_rate(&self) -> Option<f64> {
        if self.attempts == 0 {
            None
        } else {
            Some(f64::from(self.makes) / f64::from(self.attempts))
        }
    }
}

impl ZoneTable {
    pub fn from_shots<'a>(shots: impl IntoIterator<Item = &'a ShotRecord>) -> Self {
        let mut zones: BTreeMap<ZoneKey, ZoneAverage> = BTreeMap::new();
        for shot in shots {
            let avg = zones.entry(ZoneKey::of(shot)).or_default();
            avg.attempts += u32::from(shot.shot_attempted_flag);
            avg.makes += u32::from(shot.shot_made_flag);
        }
        ZoneTable { zones }
    }

    pub fn insert(&mut self, zone: ZoneKey, average: ZoneAverage) {
        self.zones.insert(zone, average);
    }

    pub fn get(&self, zone: &ZoneKey) -> Option<&ZoneAverage> {
        self.zones.get(zone)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ZoneKey, &ZoneAverage)> {
        self.zones.iter()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

impl ZoneGapPolicy {
    /// The differential a shot is binned with, or `None` to drop it.
    /// Non-finite differentials count as missing.
    pub fn resolve(&self, differential: Option<f64>) -> Option<f64> {
        match (self, differential) {
            (_, Some(d)) if d.is_finite() => Some(d),
            (ZoneGapPolicy::Drop, _) => None,
            (ZoneGapPolicy::TreatAsZero, _) => Some(0.0),
        }
    }
}

/// Left join of the target zones onto the league zones.
pub fn zone_differentials(target: &ZoneTable, league: &ZoneTable) -> Vec<ZoneComparison> {
    target
        .iter()
        .map(|(zone, target_avg)| {
            let league_avg = league.get(zone).copied();
            let differential = match (target_avg.make_rate(), league_avg.and_then(|l| l.make_rate())) {
                (Some(t), Some(l)) => Some(t - l),
                _ => None,
            };
            ZoneComparison { zone: zone.clone(), target: *target_avg, league: league_avg, differential }
        })
        .collect()
}

#[derive(Tabled)]
struct ZoneRow {
    #[tabled(rename = "Zone")]
    basic: String,
    #[tabled(rename = "Area")]
    area: String,
    #[tabled(rename = "FGM/FGA")]
    shots: String,
    #[tabled(rename = "FG%")]
    fg_pct: String,
    #[tabled(rename = "League FG%")]
    league_pct: String,
    #[tabled(rename = "Diff")]
    diff: String,
}

fn pct(rate: Option<f64>) -> String {
    rate.map(|r| format!("{:.1}", r * 100.0)).unwrap_or_else(|| "-".to_string())
}

/// Console table of per-zone efficiency against the league.
pub fn zone_report(zones: &[ZoneComparison]) -> String {
    let rows = zones.iter().map(|z| ZoneRow {
        basic: z.zone.basic.clone(),
        area: z.zone.area.clone(),
        shots: format!("{}/{}", z.target.makes, z.target.attempts),
        fg_pct: pct(z.target.make_rate()),
        league_pct: pct(z.league.and_then(|l| l.make_rate())),
        diff: z.differential.map(|d| format!("{:+.1}", d * 100.0)).unwrap_or_else(|| "-".to_string()),
    });
    Table::new(rows).to_string()
}
