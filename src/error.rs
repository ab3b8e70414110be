use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShotChartError>;

#[derive(Debug, Error)]
pub enum ShotChartError {
    /// No stored snapshot for the season and a fresh fetch was not requested.
    #[error("no shot data for season {season} at {}; fetch it first", .path.display())]
    DataUnavailable { season: String, path: PathBuf },

    #[error("invalid season {0:?}, expected YYYY-YY (e.g. 2019-20)")]
    InvalidSeason(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown color scale {name:?}, expected one of: {known}")]
    UnknownColorScale { name: String, known: String },

    #[error("request to stats.nba.com failed: {0}")]
    Request(String),

    #[error("malformed stats.nba.com response: {0}")]
    MalformedResponse(String),

    #[error("shot data is missing column {0}")]
    MissingColumn(String),

    #[error(transparent)]
    Polars(#[from] PolarsError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("failed to format chart: {0}")]
    Fmt(#[from] std::fmt::Error),
}

impl From<ureq::Error> for ShotChartError {
    fn from(err: ureq::Error) -> Self {
        ShotChartError::Request(err.to_string())
    }
}
