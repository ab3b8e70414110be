//! Shot charts comparing a player's or team's shooting by court zone
//! against the league average, from stats.nba.com shot data.

pub mod chart;
pub mod config;
pub mod error;
pub mod nba;
pub mod pipeline;
pub mod shots;

pub use config::ChartConfig;
pub use error::{Result, ShotChartError};
pub use pipeline::{fetch_season, generate_chart, ChartOutput};
