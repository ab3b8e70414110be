use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::chart::aggregate::{AggregateOptions, DEFAULT_GRID_WIDTH};
use crate::chart::color::{DivergingScale, DEFAULT_COLOR_SCALE};
use crate::chart::hexbin::COURT_EXTENT;
use crate::chart::render::{ShotChart, DEFAULT_WATERMARK};
use crate::chart::zones::ZoneGapPolicy;
use crate::error::{Result, ShotChartError};
use crate::nba::params::{Season, Subject, SubjectField};
use crate::nba::store::DEFAULT_DATA_DIR;

/// Everything one chart run needs.
///
/// ```json
/// { "subject_field": "player", "subject_value": "Pascal Siakam", "season": "2019-20" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub subject_field: SubjectField,
    pub subject_value: String,
    #[serde(default)]
    pub season: Season,
    #[serde(default = "default_grid_width")]
    pub grid_width: u32,
    #[serde(default = "default_color_scale")]
    pub color_scale: String,
    /// Download the season again instead of using the stored snapshot.
    #[serde(default)]
    pub fetch_fresh_data: bool,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default = "default_outer_lines")]
    pub outer_lines: bool,
    #[serde(default)]
    pub zone_gap_policy: ZoneGapPolicy,
    #[serde(default = "default_watermark")]
    pub watermark: String,
}

fn default_grid_width() -> u32 {
    DEFAULT_GRID_WIDTH
}

fn default_color_scale() -> String {
    DEFAULT_COLOR_SCALE.to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_outer_lines() -> bool {
    true
}

fn default_watermark() -> String {
    DEFAULT_WATERMARK.to_string()
}

impl ChartConfig {
    pub fn new(subject: Subject, season: Season) -> Self {
        ChartConfig {
            subject_field: subject.field,
            subject_value: subject.value,
            season,
            grid_width: default_grid_width(),
            color_scale: default_color_scale(),
            fetch_fresh_data: false,
            data_dir: default_data_dir(),
            output: None,
            outer_lines: default_outer_lines(),
            zone_gap_policy: ZoneGapPolicy::default(),
            watermark: default_watermark(),
        }
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn subject(&self) -> Subject {
        Subject { field: self.subject_field, value: self.subject_value.clone() }
    }

    /// Check the configuration and build the renderer it describes.
    pub fn validate(&self) -> Result<ShotChart> {
        if self.grid_width == 0 {
            return Err(ShotChartError::InvalidConfig("grid_width must be at least 1".to_string()));
        }
        if self.subject_value.trim().is_empty() {
            return Err(ShotChartError::InvalidConfig(format!("no {} name given", self.subject_field)));
        }
        let scale = DivergingScale::named(&self.color_scale)?;
        Ok(ShotChart { scale, outer_lines: self.outer_lines, watermark: self.watermark.clone() })
    }

    pub fn aggregate_options(&self) -> AggregateOptions {
        AggregateOptions { grid_width: self.grid_width, gap_policy: self.zone_gap_policy, extent: COURT_EXTENT }
    }

    /// The configured output, or `shot_chart_<subject>_<season>.svg`.
    pub fn output_path(&self) -> PathBuf {
        if let Some(output) = &self.output {
            return output.clone();
        }
        let slug: String = self
            .subject_value
            .trim()
            .chars()
            .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
            .collect();
        PathBuf::from(format!("shot_chart_{}_{}.svg", slug, self.season.file_stem()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn siakam() -> ChartConfig {
        ChartConfig::new(Subject::player("Pascal Siakam"), Season::new(2019))
    }

    #[test]
    fn defaults() {
        let config = siakam();
        assert_eq!(config.grid_width, 35);
        assert_eq!(config.color_scale, "coolwarm");
        assert!(!config.fetch_fresh_data);
        assert!(config.outer_lines);
        assert_eq!(config.zone_gap_policy, ZoneGapPolicy::Drop);
        assert_eq!(config.output_path(), PathBuf::from("shot_chart_pascal_siakam_2019_20.svg"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn json_fills_in_defaults() {
        let config: ChartConfig = serde_json::from_str(
            r#"{"subject_field": "team", "subject_value": "Toronto Raptors", "season": "2019-20",
                "color_scale": "RdBu_r", "zone_gap_policy": "treat_as_zero"}"#,
        )
        .unwrap();
        assert_eq!(config.subject(), Subject::team("Toronto Raptors"));
        assert_eq!(config.grid_width, 35);
        assert_eq!(config.data_dir, PathBuf::from("DATA"));
        assert_eq!(config.zone_gap_policy, ZoneGapPolicy::TreatAsZero);
        assert_eq!(config.validate().unwrap().scale.name(), "RdBu_r");
    }

    #[test]
    fn bad_json_season_is_rejected() {
        let parsed = serde_json::from_str::<ChartConfig>(
            r#"{"subject_field": "player", "subject_value": "A", "season": "2019-2020"}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn validation_happens_before_rendering() {
        let mut config = siakam();
        config.color_scale = "jet".to_string();
        assert!(matches!(config.validate(), Err(ShotChartError::UnknownColorScale { .. })));

        let mut config = siakam();
        config.grid_width = 0;
        assert!(matches!(config.validate(), Err(ShotChartError::InvalidConfig(_))));

        let mut config = siakam();
        config.subject_value = "  ".to_string();
        assert!(matches!(config.validate(), Err(ShotChartError::InvalidConfig(_))));
    }

    #[test]
    fn reads_config_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.json");
        fs::write(&path, serde_json::to_string(&siakam()).unwrap()).unwrap();
        assert_eq!(ChartConfig::from_json_file(&path).unwrap(), siakam());
    }
}
