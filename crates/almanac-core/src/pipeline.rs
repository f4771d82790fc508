// Run orchestration: load every source, enrich, rank, assemble.
//
// Only the roster and the franchise lore are fatal. Every secondary source is
// loaded independently; a failure becomes a diagnostic and an empty index.

use std::path::PathBuf;

use tracing::info;

use crate::almanac::Almanac;
use crate::enrich::{Enricher, EnrichmentTally};
use crate::leaderboard::build_leaderboards;
use crate::lore::{Lore, LoreError};
use crate::reference::{
    load_all_stars, load_awards, load_hall_of_fame, load_team_records, ReferenceFacts, TeamRecords,
};
use crate::roster::{load_roster, RosterError};
use crate::source::{Diagnostic, Loaded, SourceKind};
use crate::stats::{load_stats, BattingLine, PitchingLine};

/// Location of every input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePaths {
    pub rosters: PathBuf,
    pub batting: PathBuf,
    pub pitching: PathBuf,
    pub hall_of_fame: PathBuf,
    pub awards: PathBuf,
    pub all_stars: PathBuf,
    pub teams: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("roster source: {0}")]
    Roster(#[from] RosterError),

    #[error("franchise lore: {0}")]
    Lore(#[from] LoreError),
}

/// What happened during a run, for the end-of-run summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// One entry per secondary source that could not be used.
    pub diagnostics: Vec<Diagnostic>,
    pub enriched: EnrichmentTally,
}

/// Build the almanac for `franchise` from the files in `paths`.
pub fn run(paths: &SourcePaths, franchise: &str) -> Result<(Almanac, RunReport), PipelineError> {
    let lore = Lore::load(franchise)?;
    let roster = load_roster(&paths.rosters, lore.code)?;
    let slots: usize = roster.seasons.iter().map(|s| s.entries().count()).sum();
    info!(
        "Roster for {} covers {} seasons, {} player slots",
        lore.name,
        roster.seasons.len(),
        slots
    );

    let mut report = RunReport::default();
    let diagnostics = &mut report.diagnostics;

    let batting = Loaded::from_result(
        SourceKind::Batting,
        load_stats::<BattingLine>(&paths.batting, lore.code),
    )
    .or_empty(diagnostics);
    let pitching = Loaded::from_result(
        SourceKind::Pitching,
        load_stats::<PitchingLine>(&paths.pitching, lore.code),
    )
    .or_empty(diagnostics);

    let facts = ReferenceFacts {
        hall_of_fame: Loaded::from_result(
            SourceKind::HallOfFame,
            load_hall_of_fame(&paths.hall_of_fame),
        )
        .or_empty(diagnostics),
        awards: Loaded::from_result(SourceKind::Awards, load_awards(&paths.awards))
            .or_empty(diagnostics),
        all_stars: Loaded::from_result(SourceKind::AllStars, load_all_stars(&paths.all_stars))
            .or_empty(diagnostics),
        team_records: Loaded::from_result(
            SourceKind::TeamRecords,
            load_team_records(&paths.teams, lore.code),
        )
        .or_empty(diagnostics),
    };

    let enricher = Enricher {
        batting: &batting,
        pitching: &pitching,
        facts: &facts,
        lore: &lore,
    };
    let (years, tally) = enricher.history(&roster);
    report.enriched = tally;

    let leaderboards = build_leaderboards(&years, &facts);

    let season_records: TeamRecords = years
        .iter()
        .filter_map(|s| facts.team_records.get(&s.season).map(|r| (s.season, *r)))
        .collect();

    let almanac = Almanac {
        team: lore.code,
        team_name: lore.name,
        years,
        eras: lore.eras(),
        era_quotes: lore.era_quotes(),
        ws_won: lore.championships_won(),
        ws_lost: lore.championships_lost(),
        season_records,
        on_this_date: lore.moments(),
        leaderboards,
    };
    Ok((almanac, report))
}
