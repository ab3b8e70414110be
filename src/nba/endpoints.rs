
use crate::error::{Result, ShotChartError};
use crate::nba::params::*;
use log::{debug, info};
use polars::prelude::*;
use serde_json::Value;
use std::time::{Duration, Instant};

const NBA_BASE_URL: &str = "https://stats.nba.com/stats";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Name of the result set holding one row per shot.
pub const SHOT_CHART_RESULT_SET: &str = "Shot_Chart_Detail";

/// Every field goal attempt of a season, across all players and teams.
pub struct ShotChartDetail {
    pub league_id: LeagueID,
    pub season: Season,
    pub season_type: SeasonType,
    pub player_id: PlayerID,
    pub team_id: TeamID,
    pub context_measure: ContextMeasure,
}

/// The live stats.nba.com shot source.
#[derive(Debug, Default, Clone, Copy)]
pub struct StatsApi;

pub trait NBAEndpoint {
    fn send_request(&self) -> Result<Value>;
}

/// Anything that can produce the raw shot table for a season.
pub trait ShotSource {
    fn fetch_season(&self, season: &Season) -> Result<DataFrame>;
}

impl ShotChartDetail {
    pub fn new(season: Season) -> Self {
        ShotChartDetail {
            league_id: Default::default(),
            season,
            season_type: Default::default(),
            player_id: Default::default(),
            team_id: Default::default(),
            context_measure: ContextMeasure::FGA,
        }
    }

    pub fn endpoint_url(&self) -> String {
        // The endpoint rejects requests that omit any of its filters, even empty ones.
        const EMPTY_FILTERS: &str = "AheadBehind=&ClutchTime=&ContextFilter=&DateFrom=&DateTo=\
            &EndPeriod=&EndRange=&GameEventID=&GameID=&GameSegment=&Location=&Month=0\
            &OpponentTeamID=0&Outcome=&PlayerPosition=&PointDiff=&Position=&RangeType=\
            &RookieYear=&SeasonSegment=&StartPeriod=&StartRange=&VsConference=&VsDivision=";
        format!(
            "{}/shotchartdetail?{}&{}&{}&{}&{}&{}&{}&{}&{}",
            NBA_BASE_URL,
            self.context_measure,
            self.league_id,
            self.player_id,
            SeasonParam(&self.season),
            self.season_type,
            self.team_id,
            LastNGames::default(),
            Period::default(),
            EMPTY_FILTERS,
        )
    }

    /// Fetch and convert the shot result set.
    pub fn load_dataframe(&self) -> Result<DataFrame> {
        let endpoint_json = self.send_request()?;
        let load_start = Instant::now();
        let shots_df = result_set_frame(&endpoint_json, SHOT_CHART_RESULT_SET)?;
        info!(
            "Obtained {} shots for {} season, dataframe loading took {:?}",
            shots_df.height(),
            self.season,
            load_start.elapsed()
        );
        Ok(shots_df)
    }
}

impl NBAEndpoint for ShotChartDetail {
    fn send_request(&self) -> Result<Value> {
        fetch_nba_json(&self.endpoint_url())
    }
}

impl ShotSource for StatsApi {
    fn fetch_season(&self, season: &Season) -> Result<DataFrame> {
        ShotChartDetail::new(season.clone()).load_dataframe()
    }
}

/// Convert one entry of a stats API `resultSets` array into a dataframe.
///
/// Column dtypes are taken from the first non-null value of each column:
/// integers become `i64`, other numbers `f64`, everything else strings.
pub fn result_set_frame(endpoint_json: &Value, name: &str) -> Result<DataFrame> {
    let result_sets = endpoint_json["resultSets"]
        .as_array()
        .ok_or_else(|| ShotChartError::MalformedResponse("no resultSets array".to_string()))?;
    let data_set = result_sets
        .iter()
        .find(|data_set| data_set["name"].as_str() == Some(name))
        .ok_or_else(|| ShotChartError::MalformedResponse(format!("no result set named {}", name)))?;
    let headers = data_set["headers"]
        .as_array()
        .ok_or_else(|| ShotChartError::MalformedResponse(format!("{} has no headers", name)))?;
    let rows = data_set["rowSet"]
        .as_array()
        .ok_or_else(|| ShotChartError::MalformedResponse(format!("{} has no rowSet", name)))?;

    let mut columns: Vec<Vec<&Value>> = vec![Vec::with_capacity(rows.len()); headers.len()];
    for (row_num, row) in rows.iter().enumerate() {
        let row_values = row.as_array().filter(|r| r.len() == headers.len()).ok_or_else(|| {
            ShotChartError::MalformedResponse(format!("row {} of {} does not match its headers", row_num, name))
        })?;
        for (pos, col_val) in row_values.iter().enumerate() {
            columns[pos].push(col_val);
        }
    }

    let mut df_columns: Vec<Column> = Vec::with_capacity(headers.len());
    for (header, json_values) in headers.iter().zip(columns) {
        let col_name = header
            .as_str()
            .ok_or_else(|| ShotChartError::MalformedResponse(format!("non-string header in {}", name)))?;
        df_columns.push(json_column(col_name, &json_values));
    }
    debug!("{} result set has {} columns and {} rows", name, df_columns.len(), rows.len());
    Ok(DataFrame::new(df_columns)?)
}

fn json_column(col_name: &str, json_values: &[&Value]) -> Column {
    match json_values.iter().find(|v| !v.is_null()) {
        Some(first) if first.is_i64() => {
            let typed_data: Vec<Option<i64>> = json_values.iter().map(|v| v.as_i64()).collect();
            Column::new(col_name.into(), typed_data)
        }
        Some(first) if first.is_number() => {
            let typed_data: Vec<Option<f64>> = json_values.iter().map(|v| v.as_f64()).collect();
            Column::new(col_name.into(), typed_data)
        }
        _ => {
            let typed_data: Vec<Option<String>> = json_values
                .iter()
                .map(|v| match v {
                    Value::Null => None,
                    Value::String(s) => Some(s.clone()),
                    other => Some(other.to_string()),
                })
                .collect();
            Column::new(col_name.into(), typed_data)
        }
    }
}

fn fetch_nba_json(endpoint_url: &str) -> Result<Value> {
    let agent = ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build();
    let request_start = Instant::now();
    let r = agent
        .get(endpoint_url)
        .set("Host", "stats.nba.com")
        .set("User-Agent", "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:72.0) Gecko/20100101 Firefox/72.0")
        .set("Accept", "application/json, text/plain, */*")
        .set("Accept-Language", "en-US,en;q=0.5")
        .set("Connection", "keep-alive")
        .set("Referer", "https://stats.nba.com/")
        .set("Origin", "https://www.nba.com")
        .set("Pragma", "no-cache")
        .set("Cache-Control", "no-cache")
        .call()?;
    let json: Value = r.into_json()?;
    debug!("{} took {:?}", endpoint_url, request_start.elapsed());
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_payload() -> Value {
        json!({
            "resource": "shotchartdetail",
            "resultSets": [
                {
                    "name": "Shot_Chart_Detail",
                    "headers": ["GAME_ID", "PLAYER_NAME", "LOC_X", "LOC_Y", "SHOT_MADE_FLAG", "SHOT_DISTANCE"],
                    "rowSet": [
                        ["0021900001", "Pascal Siakam", -12, 45, 1, 4.5],
                        ["0021900001", "Kyle Lowry", 230, 10, 0, null],
                        ["0021900002", null, 0, 0, 1, 0]
                    ]
                },
                {
                    "name": "LeagueAverages",
                    "headers": ["GRID_TYPE"],
                    "rowSet": []
                }
            ]
        })
    }

    #[test]
    fn builds_dataframe_from_result_set() {
        let df = result_set_frame(&sample_payload(), SHOT_CHART_RESULT_SET).unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(df.width(), 6);
        assert_eq!(df.column("LOC_X").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("SHOT_DISTANCE").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("GAME_ID").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("PLAYER_NAME").unwrap().null_count(), 1);
    }

    #[test]
    fn empty_result_set_still_has_columns() {
        let df = result_set_frame(&sample_payload(), "LeagueAverages").unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.get_column_names().len(), 1);
    }

    #[test]
    fn missing_result_set_is_malformed() {
        let err = result_set_frame(&sample_payload(), "Nope").unwrap_err();
        assert!(matches!(err, ShotChartError::MalformedResponse(_)));
        let err = result_set_frame(&json!({"message": "rate limited"}), SHOT_CHART_RESULT_SET).unwrap_err();
        assert!(matches!(err, ShotChartError::MalformedResponse(_)));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let payload = json!({"resultSets": [{
            "name": "Shot_Chart_Detail",
            "headers": ["A", "B"],
            "rowSet": [[1]]
        }]});
        assert!(matches!(
            result_set_frame(&payload, SHOT_CHART_RESULT_SET),
            Err(ShotChartError::MalformedResponse(_))
        ));
    }

    #[test]
    fn url_carries_season_filters() {
        let url = ShotChartDetail::new(Season::new(2019)).endpoint_url();
        assert!(url.starts_with("https://stats.nba.com/stats/shotchartdetail?"));
        for fragment in ["ContextMeasure=FGA", "Season=2019-20", "PlayerID=0", "TeamID=0", "LeagueID=00"] {
            assert!(url.contains(fragment), "{url} lacks {fragment}");
        }
        assert!(!url.contains(' '));
    }
}
