//! Fetch-once, compute-once chart generation.

use std::{path::PathBuf, time::Instant};

use log::{info, warn};

use crate::chart::aggregate::{aggregate_with, Aggregation};
use crate::chart::render::write_svg;
use crate::chart::zones::{zone_report, ZoneTable};
use crate::config::ChartConfig;
use crate::error::Result;
use crate::nba::endpoints::ShotSource;
use crate::nba::params::Season;
use crate::nba::store::SeasonStore;
use crate::shots::{lookup_subjects, shots_from_frame};

#[derive(Debug)]
pub struct ChartOutput {
    pub path: PathBuf,
    pub aggregation: Aggregation,
}

/// Download a season and replace its stored snapshot.
pub fn fetch_season(source: &impl ShotSource, store: &SeasonStore, season: &Season) -> Result<PathBuf> {
    info!("Data extract required for {}", season);
    let mut shots_df = source.fetch_season(season)?;
    store.save(season, &mut shots_df)
}

/// Render the chart described by `config` and write it to its output path.
///
/// A subject with no shots is not an error: the chart is written with the
/// court alone and the returned aggregation reports
/// [`MatchStatus::EmptySubjectMatch`](crate::chart::aggregate::MatchStatus).
pub fn generate_chart(config: &ChartConfig, source: &impl ShotSource) -> Result<ChartOutput> {
    let chart = config.validate()?;
    let store = SeasonStore::new(&config.data_dir);
    if config.fetch_fresh_data {
        fetch_season(source, &store, &config.season)?;
    }

    let shots = shots_from_frame(&store.load(&config.season)?)?;
    let subject = config.subject();

    let aggregate_start = Instant::now();
    let league = ZoneTable::from_shots(&shots);
    let aggregation = aggregate_with(&league, &shots, &subject, &config.aggregate_options());
    info!("Aggregation took {:?}", aggregate_start.elapsed());

    if aggregation.subject_matched() {
        info!("{} vs league average, {}\n{}", subject.value, config.season, zone_report(&aggregation.zones));
    } else {
        let needle = subject.value.split_whitespace().last().unwrap_or(subject.value.as_str());
        let suggestions: Vec<String> = lookup_subjects(&shots, subject.field, needle)
            .into_iter()
            .take(5)
            .map(|m| m.name)
            .collect();
        if suggestions.is_empty() {
            warn!("Drawing an empty court: no {} named {:?} in {}", subject.field, subject.value, config.season);
        } else {
            warn!(
                "Drawing an empty court: no {} named {:?} in {}. Did you mean: {}?",
                subject.field,
                subject.value,
                config.season,
                suggestions.join(", ")
            );
        }
    }

    let svg = chart.render(&aggregation.cells, &subject.value, &config.season.to_string())?;
    let path = config.output_path();
    write_svg(&path, &svg)?;
    Ok(ChartOutput { path, aggregation })
}
