// Season stat aggregation from Lahman-format Batting.csv / Pitching.csv.
//
// Lahman writes one row per stint (a player traded mid-season has one row per
// team). Rows for the target franchise are folded into a single season line
// per (playerID, yearID).

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{info, warn};

use crate::source::{
    lenient_count, lenient_count_opt, load_table, parse_season, require_columns, trimmed,
    SourceError, SourceKind, TableError,
};

/// Columns every stat table must carry for rows to be attributable.
const KEY_COLUMNS: [&str; 3] = ["playerID", "yearID", "teamID"];

// ---------------------------------------------------------------------------
// Stat domains
// ---------------------------------------------------------------------------

/// Key columns of a raw stat row, borrowed from the row.
#[derive(Debug, Clone, Copy)]
pub struct RowKey<'a> {
    pub player_id: &'a str,
    pub season: &'a str,
    pub team: &'a str,
}

/// One statistical domain: how its rows deserialize and how they fold into a
/// season total.
pub trait StatLine: Default + Clone + std::fmt::Debug {
    type Row: DeserializeOwned;

    const SOURCE: SourceKind;

    fn row_key(row: &Self::Row) -> RowKey<'_>;

    /// Add one stint's counters to the running total.
    fn absorb(&mut self, row: &Self::Row);
}

/// Accumulated batting totals for one player-season.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BattingLine {
    pub games: u32,
    pub at_bats: u32,
    pub hits: u32,
    pub home_runs: u32,
    pub rbi: u32,
    pub runs: u32,
    pub walks: u32,
    pub stolen_bases: u32,
    pub doubles: u32,
    pub triples: u32,
    pub strikeouts: u32,
}

/// Accumulated pitching totals for one player-season.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PitchingLine {
    pub wins: u32,
    pub losses: u32,
    pub games: u32,
    pub games_started: u32,
    pub saves: u32,
    /// Outs recorded (Lahman `IPouts`).
    pub outs: u32,
    pub strikeouts: u32,
    pub walks: u32,
    pub earned_runs: u32,
    pub hits_allowed: u32,
    pub home_runs_allowed: u32,
    pub complete_games: u32,
    pub shutouts: u32,
}

// ---------------------------------------------------------------------------
// Raw CSV serde structs (private)
// ---------------------------------------------------------------------------

/// Batting.csv row. Doubles and triples appear as `2B`/`3B` in some exports
/// and `X2B`/`X3B` in others; `2B` wins when both are filled.
#[derive(Debug, Deserialize)]
pub struct RawBattingRow {
    #[serde(rename = "playerID", default, deserialize_with = "trimmed")]
    player_id: String,
    #[serde(rename = "yearID", default, deserialize_with = "trimmed")]
    year_id: String,
    #[serde(rename = "teamID", default, deserialize_with = "trimmed")]
    team_id: String,
    #[serde(rename = "G", default, deserialize_with = "lenient_count")]
    g: u32,
    #[serde(rename = "AB", default, deserialize_with = "lenient_count")]
    ab: u32,
    #[serde(rename = "H", default, deserialize_with = "lenient_count")]
    h: u32,
    #[serde(rename = "HR", default, deserialize_with = "lenient_count")]
    hr: u32,
    #[serde(rename = "RBI", default, deserialize_with = "lenient_count")]
    rbi: u32,
    #[serde(rename = "R", default, deserialize_with = "lenient_count")]
    r: u32,
    #[serde(rename = "BB", default, deserialize_with = "lenient_count")]
    bb: u32,
    #[serde(rename = "SB", default, deserialize_with = "lenient_count")]
    sb: u32,
    #[serde(rename = "2B", default, deserialize_with = "lenient_count_opt")]
    doubles: Option<u32>,
    #[serde(rename = "X2B", default, deserialize_with = "lenient_count_opt")]
    x_doubles: Option<u32>,
    #[serde(rename = "3B", default, deserialize_with = "lenient_count_opt")]
    triples: Option<u32>,
    #[serde(rename = "X3B", default, deserialize_with = "lenient_count_opt")]
    x_triples: Option<u32>,
    #[serde(rename = "SO", default, deserialize_with = "lenient_count")]
    so: u32,
}

/// Pitching.csv row.
#[derive(Debug, Deserialize)]
pub struct RawPitchingRow {
    #[serde(rename = "playerID", default, deserialize_with = "trimmed")]
    player_id: String,
    #[serde(rename = "yearID", default, deserialize_with = "trimmed")]
    year_id: String,
    #[serde(rename = "teamID", default, deserialize_with = "trimmed")]
    team_id: String,
    #[serde(rename = "W", default, deserialize_with = "lenient_count")]
    w: u32,
    #[serde(rename = "L", default, deserialize_with = "lenient_count")]
    l: u32,
    #[serde(rename = "G", default, deserialize_with = "lenient_count")]
    g: u32,
    #[serde(rename = "GS", default, deserialize_with = "lenient_count")]
    gs: u32,
    #[serde(rename = "SV", default, deserialize_with = "lenient_count")]
    sv: u32,
    #[serde(rename = "IPouts", default, deserialize_with = "lenient_count")]
    ipouts: u32,
    #[serde(rename = "SO", default, deserialize_with = "lenient_count")]
    so: u32,
    #[serde(rename = "BB", default, deserialize_with = "lenient_count")]
    bb: u32,
    #[serde(rename = "ER", default, deserialize_with = "lenient_count")]
    er: u32,
    #[serde(rename = "H", default, deserialize_with = "lenient_count")]
    h: u32,
    #[serde(rename = "HR", default, deserialize_with = "lenient_count")]
    hr: u32,
    #[serde(rename = "CG", default, deserialize_with = "lenient_count")]
    cg: u32,
    #[serde(rename = "SHO", default, deserialize_with = "lenient_count")]
    sho: u32,
}

impl StatLine for BattingLine {
    type Row = RawBattingRow;

    const SOURCE: SourceKind = SourceKind::Batting;

    fn row_key(row: &RawBattingRow) -> RowKey<'_> {
        RowKey {
            player_id: &row.player_id,
            season: &row.year_id,
            team: &row.team_id,
        }
    }

    fn absorb(&mut self, row: &RawBattingRow) {
        let doubles = row.doubles.or(row.x_doubles).unwrap_or(0);
        let triples = row.triples.or(row.x_triples).unwrap_or(0);

        self.games = self.games.saturating_add(row.g);
        self.at_bats = self.at_bats.saturating_add(row.ab);
        self.hits = self.hits.saturating_add(row.h);
        self.home_runs = self.home_runs.saturating_add(row.hr);
        self.rbi = self.rbi.saturating_add(row.rbi);
        self.runs = self.runs.saturating_add(row.r);
        self.walks = self.walks.saturating_add(row.bb);
        self.stolen_bases = self.stolen_bases.saturating_add(row.sb);
        self.doubles = self.doubles.saturating_add(doubles);
        self.triples = self.triples.saturating_add(triples);
        self.strikeouts = self.strikeouts.saturating_add(row.so);
    }
}

impl StatLine for PitchingLine {
    type Row = RawPitchingRow;

    const SOURCE: SourceKind = SourceKind::Pitching;

    fn row_key(row: &RawPitchingRow) -> RowKey<'_> {
        RowKey {
            player_id: &row.player_id,
            season: &row.year_id,
            team: &row.team_id,
        }
    }

    fn absorb(&mut self, row: &RawPitchingRow) {
        self.wins = self.wins.saturating_add(row.w);
        self.losses = self.losses.saturating_add(row.l);
        self.games = self.games.saturating_add(row.g);
        self.games_started = self.games_started.saturating_add(row.gs);
        self.saves = self.saves.saturating_add(row.sv);
        self.outs = self.outs.saturating_add(row.ipouts);
        self.strikeouts = self.strikeouts.saturating_add(row.so);
        self.walks = self.walks.saturating_add(row.bb);
        self.earned_runs = self.earned_runs.saturating_add(row.er);
        self.hits_allowed = self.hits_allowed.saturating_add(row.h);
        self.home_runs_allowed = self.home_runs_allowed.saturating_add(row.hr);
        self.complete_games = self.complete_games.saturating_add(row.cg);
        self.shutouts = self.shutouts.saturating_add(row.sho);
    }
}

// ---------------------------------------------------------------------------
// Aggregated index
// ---------------------------------------------------------------------------

/// Season totals for one domain, keyed by season then player.
#[derive(Debug, Clone)]
pub struct StatBook<L> {
    seasons: HashMap<u16, HashMap<String, L>>,
}

impl<L> Default for StatBook<L> {
    fn default() -> Self {
        Self {
            seasons: HashMap::new(),
        }
    }
}

impl<L> StatBook<L> {
    pub fn get(&self, player_id: &str, season: u16) -> Option<&L> {
        self.seasons.get(&season)?.get(player_id)
    }

    /// Number of player-seasons.
    pub fn len(&self) -> usize {
        self.seasons.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

/// Fold every stint for `team` into per-player-season totals.
///
/// Rows without a player ID or a parseable season, and rows for other teams,
/// are skipped silently. Rows the CSV reader cannot decode are logged and
/// skipped.
pub fn aggregate_from_reader<L: StatLine, R: Read>(
    rdr: R,
    team: &str,
) -> Result<StatBook<L>, TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(rdr);
    require_columns(reader.headers()?, &KEY_COLUMNS)?;

    let team = team.trim();
    let mut book = StatBook::<L>::default();
    for result in reader.deserialize::<L::Row>() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                warn!("skipping malformed {} row: {}", L::SOURCE, e);
                continue;
            }
        };

        let key = L::row_key(&row);
        if key.player_id.is_empty() || key.team != team {
            continue;
        }
        let Some(season) = parse_season(key.season) else {
            continue;
        };

        book.seasons
            .entry(season)
            .or_default()
            .entry(key.player_id.to_string())
            .or_default()
            .absorb(&row);
    }
    Ok(book)
}

/// Load and aggregate one stat table from disk.
pub fn load_stats<L: StatLine>(path: &Path, team: &str) -> Result<StatBook<L>, SourceError> {
    let book = load_table(path, |file| aggregate_from_reader::<L, _>(file, team))?;
    info!(
        "Loaded {} {} player-seasons for {} from {}",
        book.len(),
        L::SOURCE,
        team,
        path.display()
    );
    Ok(book)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
