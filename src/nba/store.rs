use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
    time::Instant,
};

use log::info;
use polars::prelude::*;

use crate::error::{Result, ShotChartError};
use crate::nba::params::Season;

pub const DEFAULT_DATA_DIR: &str = "DATA";

/// Flat per-season CSV snapshots of the shot chart detail table.
#[derive(Debug, Clone)]
pub struct SeasonStore {
    dir: PathBuf,
}

impl SeasonStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        SeasonStore { dir: dir.into() }
    }

    /// `DATA/nba_shots_detail_2019_20.csv` for the 2019-20 season.
    pub fn path_for(&self, season: &Season) -> PathBuf {
        self.dir.join(format!("nba_shots_detail_{}.csv", season.file_stem()))
    }

    fn staging_path_for(&self, season: &Season) -> PathBuf {
        self.path_for(season).with_extension("csv.partial")
    }

    pub fn exists(&self, season: &Season) -> bool {
        self.path_for(season).is_file()
    }

    /// Write the season snapshot, replacing any previous one.
    ///
    /// The frame is written next to the snapshot first and renamed over it,
    /// so a failed write leaves the previous snapshot in place.
    pub fn save(&self, season: &Season, shots_df: &mut DataFrame) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(season);
        let staging = self.staging_path_for(season);
        let save_start = Instant::now();
        if let Err(err) = write_csv(&staging, shots_df) {
            let _ = fs::remove_file(&staging);
            return Err(err);
        }
        fs::rename(&staging, &path)?;
        info!(
            "Saved {} season data ({} rows) to {} in {:?}",
            season,
            shots_df.height(),
            path.display(),
            save_start.elapsed()
        );
        Ok(path)
    }

    pub fn load(&self, season: &Season) -> Result<DataFrame> {
        let path = self.path_for(season);
        if !path.is_file() {
            return Err(ShotChartError::DataUnavailable { season: season.to_string(), path });
        }
        let load_start = Instant::now();
        // Game ids carry leading zeros.
        let mut id_columns = Schema::default();
        id_columns.with_column("GAME_ID".into(), DataType::String);
        let shots_df = CsvReadOptions::default()
            .with_has_header(true)
            .with_schema_overwrite(Some(Arc::new(id_columns)))
            .try_into_reader_with_file_path(Some(path.clone()))?
            .finish()?;
        info!("Loaded {} rows from {} in {:?}", shots_df.height(), path.display(), load_start.elapsed());
        Ok(shots_df)
    }
}

fn write_csv(path: &Path, shots_df: &mut DataFrame) -> Result<()> {
    let mut file = fs::File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(shots_df)?;
    Ok(())
}
