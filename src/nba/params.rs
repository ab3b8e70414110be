use core::fmt;
use std::{fmt::Display, str::FromStr};

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShotChartError};

pub enum LeagueID {
    NBA,
}

pub enum SeasonType {
    Regular,
}

pub enum ContextMeasure {
    FGA,
}

pub enum PlayerID {
    All,
}

pub enum TeamID {
    All,
}

pub enum LastNGames {
    N(i32),
}

pub enum Period {
    P(i8),
}

/// Season identifier in the "YYYY-YY" form the stats API uses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Season {
    start_year: i32,
}

/// Which name column a chart is filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectField {
    Player,
    Team,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub field: SubjectField,
    pub value: String,
}

impl Season {
    pub fn new(start_year: i32) -> Self {
        Season { start_year }
    }

    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    /// `2019-20` becomes `2019_20`, used in snapshot file names.
    pub fn file_stem(&self) -> String {
        self.to_string().replace('-', "_")
    }

    /// The season in progress (or most recently started) on the given date.
    /// A new season starts in October.
    pub fn containing(date: chrono::NaiveDate) -> Self {
        if date.month() >= 10 {
            Season::new(date.year())
        } else {
            Season::new(date.year() - 1)
        }
    }
}

impl Default for Season {
    fn default() -> Self {
        Season::containing(chrono::Utc::now().date_naive())
    }
}

impl FromStr for Season {
    type Err = ShotChartError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ShotChartError::InvalidSeason(s.to_string());
        let (first, second) = s.trim().split_once('-').ok_or_else(invalid)?;
        if first.len() != 4 || second.len() != 2 {
            return Err(invalid());
        }
        let start_year: i32 = first.parse().map_err(|_| invalid())?;
        let end_suffix: i32 = second.parse().map_err(|_| invalid())?;
        if (start_year + 1) % 100 != end_suffix {
            return Err(invalid());
        }
        Ok(Season::new(start_year))
    }
}

impl TryFrom<String> for Season {
    type Error = ShotChartError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Season> for String {
    fn from(season: Season) -> Self {
        season.to_string()
    }
}

impl Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{:02}", self.start_year, (self.start_year + 1) % 100)
    }
}

impl SubjectField {
    /// Column holding this field in the shot chart detail result set.
    pub fn column_name(&self) -> &'static str {
        match self {
            SubjectField::Player => "PLAYER_NAME",
            SubjectField::Team => "TEAM_NAME",
        }
    }
}

impl Display for SubjectField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SubjectField::Player => write!(f, "player"),
            SubjectField::Team => write!(f, "team"),
        }
    }
}

impl Subject {
    pub fn player(name: impl Into<String>) -> Self {
        Subject { field: SubjectField::Player, value: name.into() }
    }

    pub fn team(name: impl Into<String>) -> Self {
        Subject { field: SubjectField::Team, value: name.into() }
    }
}

/// Query fragment for a season, e.g. `Season=2019-20`.
pub struct SeasonParam<'a>(pub &'a Season);

impl Display for SeasonParam<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Season={}", self.0)
    }
}

impl Display for LeagueID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LeagueID::NBA => write!(f, "LeagueID=00"),
        }
    }
}

impl Display for SeasonType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SeasonType::Regular => write!(f, "SeasonType=Regular+Season"),
        }
    }
}

impl Display for ContextMeasure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ContextMeasure::FGA => write!(f, "ContextMeasure=FGA"),
        }
    }
}

impl Display for PlayerID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PlayerID::All => write!(f, "PlayerID=0"),
        }
    }
}

impl Display for TeamID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TeamID::All => write!(f, "TeamID=0"),
        }
    }
}

impl Display for LastNGames {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LastNGames::N(n) => write!(f, "LastNGames={}", n),
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Period::P(period_num) => write!(f, "Period={}", period_num),
        }
    }
}

impl Default for LeagueID {
    fn default() -> Self { LeagueID::NBA }
}

impl Default for SeasonType {
    fn default() -> Self { SeasonType::Regular }
}

impl Default for PlayerID {
    fn default() -> Self { PlayerID::All }
}

impl Default for TeamID {
    fn default() -> Self { TeamID::All }
}

impl Default for LastNGames {
    fn default() -> Self { LastNGames::N(0) }
}

impl Default for Period {
    fn default() -> Self { Period::P(0) }
}
