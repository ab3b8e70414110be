use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use tabled::Table;

use nbashotchart::chart::zones::ZoneGapPolicy;
use nbashotchart::nba::params::{Season, Subject, SubjectField};
use nbashotchart::nba::store::{SeasonStore, DEFAULT_DATA_DIR};
use nbashotchart::nba::StatsApi;
use nbashotchart::shots::{lookup_subjects, shots_from_frame};
use nbashotchart::{fetch_season, generate_chart, ChartConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "NBA shot charts against the league average", long_about = None)]
struct ShotChartCli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Download a season of shots and store it as CSV
    Fetch {
        #[arg(short, long)]
        season: Option<Season>,

        #[arg(long, default_value = DEFAULT_DATA_DIR)]
        data_dir: PathBuf,
    },
    /// Render a shot chart for a player or team
    Chart(ChartArgs),
    /// Search a stored season for player or team names
    Lookup {
        #[arg(short, long)]
        season: Option<Season>,

        #[arg(short, long, conflicts_with = "team")]
        player: Option<String>,

        #[arg(short, long)]
        team: Option<String>,

        #[arg(long, default_value = DEFAULT_DATA_DIR)]
        data_dir: PathBuf,
    },
}

#[derive(Debug, Args)]
struct ChartArgs {
    #[arg(short, long, conflicts_with = "team")]
    player: Option<String>,

    #[arg(short, long)]
    team: Option<String>,

    #[arg(short, long)]
    season: Option<Season>,

    /// Hexagons across the court
    #[arg(short, long)]
    grid_width: Option<u32>,

    #[arg(short, long)]
    color_scale: Option<String>,

    /// Download the season even if a snapshot exists
    #[arg(short, long)]
    fetch: bool,

    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long)]
    no_outer_lines: bool,

    /// Bin shots from zones without a league rate at zero differential
    #[arg(long)]
    zero_fill_gaps: bool,

    /// JSON chart configuration; other flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Open the chart in a browser when done
    #[arg(long)]
    open: bool,
}

impl ChartArgs {
    fn subject(&self) -> Option<Subject> {
        match (&self.player, &self.team) {
            (Some(p), _) => Some(Subject::player(p.as_str())),
            (_, Some(t)) => Some(Subject::team(t.as_str())),
            (None, None) => None,
        }
    }

    fn into_config(self) -> Result<ChartConfig> {
        let mut config = match (&self.config, self.subject()) {
            (Some(path), subject) => {
                let mut config = ChartConfig::from_json_file(path)
                    .with_context(|| format!("failed to read chart config {}", path.display()))?;
                if let Some(subject) = subject {
                    config.subject_field = subject.field;
                    config.subject_value = subject.value;
                }
                config
            }
            (None, Some(subject)) => ChartConfig::new(subject, Season::default()),
            (None, None) => bail!("pass --player or --team (or a --config file)"),
        };
        if let Some(season) = self.season {
            config.season = season;
        }
        if let Some(grid_width) = self.grid_width {
            config.grid_width = grid_width;
        }
        if let Some(color_scale) = self.color_scale {
            config.color_scale = color_scale;
        }
        if let Some(data_dir) = self.data_dir {
            config.data_dir = data_dir;
        }
        if self.output.is_some() {
            config.output = self.output;
        }
        config.fetch_fresh_data |= self.fetch;
        if self.no_outer_lines {
            config.outer_lines = false;
        }
        if self.zero_fill_gaps {
            config.zone_gap_policy = ZoneGapPolicy::TreatAsZero;
        }
        Ok(config)
    }
}

fn init_logging() {
    let mut builder = pretty_env_logger::formatted_timed_builder();
    builder.filter_level(log::LevelFilter::Info);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

fn main() -> Result<()> {
    init_logging();
    let args = ShotChartCli::parse();
    match args.cmd {
        Commands::Fetch { season, data_dir } => {
            let season = season.unwrap_or_default();
            let store = SeasonStore::new(data_dir);
            fetch_season(&StatsApi, &store, &season).with_context(|| format!("failed to fetch {} shots", season))?;
        }
        Commands::Chart(chart_args) => {
            let open = chart_args.open;
            let config = chart_args.into_config()?;
            let output = generate_chart(&config, &StatsApi)?;
            println!("{}", output.path.display());
            if open {
                let full_path = std::fs::canonicalize(&output.path)?;
                webbrowser::open(&format!("file://{}", full_path.display()))
                    .context("failed to open the chart in a browser")?;
            }
        }
        Commands::Lookup { season, player, team, data_dir } => {
            let (field, needle) = match (player, team) {
                (Some(p), _) => (SubjectField::Player, p),
                (_, Some(t)) => (SubjectField::Team, t),
                (None, None) => bail!("pass --player or --team"),
            };
            let season = season.unwrap_or_default();
            let shots_df = SeasonStore::new(data_dir).load(&season)?;
            let matches = lookup_subjects(&shots_from_frame(&shots_df)?, field, &needle);
            info!("{} {} names match {:?}", matches.len(), field, needle);
            println!("{}", Table::new(matches));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn chart_args(args: &[&str]) -> ChartArgs {
        let argv = ["nbashotchart", "chart"].iter().chain(args);
        match ShotChartCli::try_parse_from(argv).unwrap().cmd {
            Commands::Chart(chart_args) => chart_args,
            other => panic!("expected the chart command, got {:?}", other),
        }
    }

    fn config_file(dir: &tempfile::TempDir) -> String {
        let path = dir.path().join("chart.json");
        fs::write(
            &path,
            r#"{"subject_field": "team", "subject_value": "Toronto Raptors", "season": "2019-20",
                "grid_width": 40, "color_scale": "bwr", "fetch_fresh_data": true,
                "output": "from_file.svg"}"#,
        )
        .unwrap();
        path.display().to_string()
    }

    #[test]
    fn config_file_is_used_as_is_without_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file(&dir);
        let config = chart_args(&["--config", &path]).into_config().unwrap();

        assert_eq!(config.subject(), Subject::team("Toronto Raptors"));
        assert_eq!(config.season, Season::new(2019));
        assert_eq!(config.grid_width, 40);
        assert_eq!(config.color_scale, "bwr");
        assert!(config.fetch_fresh_data);
        assert!(config.outer_lines);
        assert_eq!(config.zone_gap_policy, ZoneGapPolicy::Drop);
        assert_eq!(config.output, Some(PathBuf::from("from_file.svg")));
    }

    #[test]
    fn flags_override_the_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file(&dir);
        let config = chart_args(&[
            "--config",
            &path,
            "--player",
            "Pascal Siakam",
            "--season",
            "2021-22",
            "--grid-width",
            "25",
            "--color-scale",
            "RdBu_r",
            "--output",
            "from_flags.svg",
            "--data-dir",
            "snapshots",
            "--no-outer-lines",
            "--zero-fill-gaps",
        ])
        .into_config()
        .unwrap();

        assert_eq!(config.subject(), Subject::player("Pascal Siakam"));
        assert_eq!(config.season, Season::new(2021));
        assert_eq!(config.grid_width, 25);
        assert_eq!(config.color_scale, "RdBu_r");
        assert_eq!(config.output, Some(PathBuf::from("from_flags.svg")));
        assert_eq!(config.data_dir, PathBuf::from("snapshots"));
        assert!(!config.outer_lines);
        assert_eq!(config.zone_gap_policy, ZoneGapPolicy::TreatAsZero);
        // --fetch was not passed, the file's setting stands
        assert!(config.fetch_fresh_data);
    }

    #[test]
    fn fetch_flag_turns_fetching_on() {
        let config = chart_args(&["--team", "Toronto Raptors", "--season", "2019-20"]).into_config().unwrap();
        assert!(!config.fetch_fresh_data);

        let config =
            chart_args(&["--team", "Toronto Raptors", "--season", "2019-20", "--fetch"]).into_config().unwrap();
        assert!(config.fetch_fresh_data);
        assert_eq!(config.subject(), Subject::team("Toronto Raptors"));
        assert_eq!(config.grid_width, 35);
    }

    #[test]
    fn a_subject_or_config_file_is_required() {
        let err = chart_args(&["--season", "2019-20"]).into_config().unwrap_err();
        assert!(err.to_string().contains("--player"), "{err}");
    }

    #[test]
    fn player_and_team_conflict() {
        let parsed = ShotChartCli::try_parse_from(["nbashotchart", "chart", "--player", "A", "--team", "B"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn lookup_takes_player_or_team() {
        let cli = ShotChartCli::try_parse_from(["nbashotchart", "lookup", "--season", "2019-20", "--player", "siakam"])
            .unwrap();
        match cli.cmd {
            Commands::Lookup { season, player, team, .. } => {
                assert_eq!(season, Some(Season::new(2019)));
                assert_eq!(player.as_deref(), Some("siakam"));
                assert_eq!(team, None);
            }
            other => panic!("expected the lookup command, got {:?}", other),
        }
    }
}
