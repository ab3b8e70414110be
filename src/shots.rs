//! Typed shot rows pulled out of the raw season table.

use std::collections::BTreeMap;

use log::warn;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::error::{Result, ShotChartError};
use crate::nba::params::SubjectField;

/// One field goal attempt. Coordinates are in tenths of a foot relative to
/// the hoop, x across the court and y towards half court.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotRecord {
    pub game_id: String,
    pub game_event_id: i64,
    pub player_id: i64,
    pub player_name: String,
    pub team_id: i64,
    pub team_name: String,
    pub shot_zone_basic: String,
    pub shot_zone_area: String,
    pub shot_zone_range: String,
    pub shot_distance: f64,
    pub loc_x: f64,
    pub loc_y: f64,
    pub shot_attempted_flag: u8,
    pub shot_made_flag: u8,
}

/// A subject name found by [`lookup_subjects`].
#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct SubjectMatch {
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "FGA")]
    pub attempts: u32,
}

impl ShotRecord {
    pub fn subject_value(&self, field: SubjectField) -> &str {
        match field {
            SubjectField::Player => &self.player_name,
            SubjectField::Team => &self.team_name,
        }
    }
}

/// Extract shot records from a shot chart detail table.
///
/// Rows without coordinates cannot be binned and are skipped.
pub fn shots_from_frame(shots_df: &DataFrame) -> Result<Vec<ShotRecord>> {
    let height = shots_df.height();
    let loc_x = f64_values(shots_df, "LOC_X")?;
    let loc_y = f64_values(shots_df, "LOC_Y")?;
    let made = i64_values(shots_df, "SHOT_MADE_FLAG")?;
    let attempted = i64_values(shots_df, "SHOT_ATTEMPTED_FLAG")?;
    let zone_basic = string_values(shots_df, "SHOT_ZONE_BASIC")?;
    let zone_area = string_values(shots_df, "SHOT_ZONE_AREA")?;
    let player_name = string_values(shots_df, "PLAYER_NAME")?;
    let team_name = string_values(shots_df, "TEAM_NAME")?;

    let game_id = optional(string_values(shots_df, "GAME_ID"), height)?;
    let game_event_id = optional(i64_values(shots_df, "GAME_EVENT_ID"), height)?;
    let player_id = optional(i64_values(shots_df, "PLAYER_ID"), height)?;
    let team_id = optional(i64_values(shots_df, "TEAM_ID"), height)?;
    let zone_range = optional(string_values(shots_df, "SHOT_ZONE_RANGE"), height)?;
    let distance = optional(f64_values(shots_df, "SHOT_DISTANCE"), height)?;

    let mut shots = Vec::with_capacity(height);
    let mut skipped = 0usize;
    for i in 0..height {
        let (Some(x), Some(y)) = (loc_x[i], loc_y[i]) else {
            skipped += 1;
            continue;
        };
        shots.push(ShotRecord {
            game_id: game_id[i].clone().unwrap_or_default(),
            game_event_id: game_event_id[i].unwrap_or_default(),
            player_id: player_id[i].unwrap_or_default(),
            player_name: player_name[i].clone().unwrap_or_default(),
            team_id: team_id[i].unwrap_or_default(),
            team_name: team_name[i].clone().unwrap_or_default(),
            shot_zone_basic: zone_basic[i].clone().unwrap_or_default(),
            shot_zone_area: zone_area[i].clone().unwrap_or_default(),
            shot_zone_range: zone_range[i].clone().unwrap_or_default(),
            shot_distance: distance[i].unwrap_or_default(),
            loc_x: x,
            loc_y: y,
            shot_attempted_flag: flag(attempted[i], 1),
            shot_made_flag: flag(made[i], 0),
        });
    }
    if skipped > 0 {
        warn!("Skipped {} shots without court coordinates", skipped);
    }
    Ok(shots)
}

/// Distinct names on `field` containing `needle` (case-insensitive), sorted,
/// with their attempt counts.
pub fn lookup_subjects(shots: &[ShotRecord], field: SubjectField, needle: &str) -> Vec<SubjectMatch> {
    let needle = needle.to_lowercase();
    let mut attempts_by_name: BTreeMap<&str, u32> = BTreeMap::new();
    for shot in shots {
        let name = shot.subject_value(field);
        if !name.is_empty() && name.to_lowercase().contains(&needle) {
            *attempts_by_name.entry(name).or_default() += u32::from(shot.shot_attempted_flag);
        }
    }
    attempts_by_name
        .into_iter()
        .map(|(name, attempts)| SubjectMatch { name: name.to_string(), attempts })
        .collect()
}

fn flag(value: Option<i64>, default: u8) -> u8 {
    match value {
        Some(v) if v > 0 => 1,
        Some(_) => 0,
        None => default,
    }
}

fn column<'a>(shots_df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    shots_df
        .column(name)
        .map_err(|_| ShotChartError::MissingColumn(name.to_string()))
}

fn optional<T: Clone>(values: Result<Vec<Option<T>>>, height: usize) -> Result<Vec<Option<T>>> {
    match values {
        Err(ShotChartError::MissingColumn(_)) => Ok(vec![None; height]),
        other => other,
    }
}

fn f64_values(shots_df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let cast = column(shots_df, name)?.cast(&DataType::Float64)?;
    Ok(cast.as_materialized_series().f64()?.into_iter().collect())
}

fn i64_values(shots_df: &DataFrame, name: &str) -> Result<Vec<Option<i64>>> {
    let cast = column(shots_df, name)?.cast(&DataType::Int64)?;
    Ok(cast.as_materialized_series().i64()?.into_iter().collect())
}

fn string_values(shots_df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let cast = column(shots_df, name)?.cast(&DataType::String)?;
    Ok(cast
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> DataFrame {
        DataFrame::new(vec![
            Column::new("PLAYER_NAME".into(), vec![Some("Pascal Siakam"), Some("Kyle Lowry"), None]),
            Column::new("TEAM_NAME".into(), vec!["Toronto Raptors", "Toronto Raptors", "Boston Celtics"]),
            Column::new("LOC_X".into(), vec![Some(-12i64), Some(230), None]),
            Column::new("LOC_Y".into(), vec![45i64, 10, 3]),
            Column::new("SHOT_MADE_FLAG".into(), vec![1i64, 0, 1]),
            Column::new("SHOT_ATTEMPTED_FLAG".into(), vec![1i64, 1, 1]),
            Column::new("SHOT_ZONE_BASIC".into(), vec!["Restricted Area", "Right Corner 3", "Restricted Area"]),
            Column::new("SHOT_ZONE_AREA".into(), vec!["Center(C)", "Right Side(R)", "Center(C)"]),
            Column::new("GAME_ID".into(), vec![21900001i64, 21900001, 21900002]),
        ])
        .unwrap()
    }

    #[test]
    fn extracts_typed_records() {
        let shots = shots_from_frame(&frame()).unwrap();
        assert_eq!(shots.len(), 2, "the row without LOC_X is skipped");
        let siakam = &shots[0];
        assert_eq!(siakam.player_name, "Pascal Siakam");
        assert_eq!(siakam.loc_x, -12.0);
        assert_eq!(siakam.loc_y, 45.0);
        assert_eq!(siakam.shot_made_flag, 1);
        assert_eq!(siakam.shot_attempted_flag, 1);
        assert_eq!(siakam.game_id, "21900001");
        assert_eq!(siakam.team_id, 0, "absent optional columns default");
        assert_eq!(shots[1].subject_value(SubjectField::Team), "Toronto Raptors");
    }

    #[test]
    fn required_columns_are_reported() {
        let df = frame().drop("SHOT_ZONE_AREA").unwrap();
        match shots_from_frame(&df) {
            Err(ShotChartError::MissingColumn(name)) => assert_eq!(name, "SHOT_ZONE_AREA"),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn lookup_is_case_insensitive_and_sorted() {
        let shots = shots_from_frame(&frame()).unwrap();
        let found = lookup_subjects(&shots, SubjectField::Player, "SIAK");
        assert_eq!(found, vec![SubjectMatch { name: "Pascal Siakam".to_string(), attempts: 1 }]);

        let teams = lookup_subjects(&shots, SubjectField::Team, "toronto");
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].attempts, 2);
        assert!(lookup_subjects(&shots, SubjectField::Player, "jordan").is_empty());
    }
}
