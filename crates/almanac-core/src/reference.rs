// Secondary biographical datasets: Hall of Fame, awards, All-Star games and
// team season records (Lahman HallOfFame / AwardsPlayers / AllstarFull /
// Teams tables).
//
// Each loader is independent; the pipeline wraps each result in `Loaded` so
// one broken table never takes the others down.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::source::{
    lenient_count, load_table, parse_season, require_columns, trimmed, SourceError, TableError,
};

/// Award code attached to a player-season with an All-Star appearance.
pub const ALL_STAR_CODE: &str = "AS";

/// Lahman `awardID` values we keep, and the short code each maps to.
const AWARD_CODES: [(&str, &str); 5] = [
    ("Most Valuable Player", "MVP"),
    ("Cy Young Award", "CY"),
    ("Gold Glove", "GG"),
    ("Silver Slugger", "SS"),
    ("Rookie of the Year", "ROY"),
];

/// Map a Lahman award name onto its short code.
pub fn award_code(award_id: &str) -> Option<&'static str> {
    let award_id = award_id.trim();
    AWARD_CODES
        .iter()
        .find(|(name, _)| *name == award_id)
        .map(|(_, code)| *code)
}

// ---------------------------------------------------------------------------
// Indices
// ---------------------------------------------------------------------------

/// Player IDs inducted into the Hall of Fame as players.
#[derive(Debug, Clone, Default)]
pub struct HallOfFame {
    inductees: HashSet<String>,
}

impl HallOfFame {
    pub fn contains(&self, player_id: &str) -> bool {
        self.inductees.contains(player_id)
    }

    pub fn len(&self) -> usize {
        self.inductees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inductees.is_empty()
    }
}

/// Award codes won by a player in one season.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwardEntry {
    pub player_id: String,
    pub season: u16,
    /// Codes in first-seen order, without repeats.
    pub codes: Vec<&'static str>,
}

/// (player, season) → award codes, iterable in first-insertion order.
#[derive(Debug, Clone, Default)]
pub struct AwardIndex {
    entries: Vec<AwardEntry>,
    positions: HashMap<(String, u16), usize>,
}

impl AwardIndex {
    /// Record `code` for a player-season, ignoring repeats.
    pub fn insert(&mut self, player_id: &str, season: u16, code: &'static str) {
        let key = (player_id.to_string(), season);
        let idx = match self.positions.get(&key) {
            Some(&idx) => idx,
            None => {
                self.entries.push(AwardEntry {
                    player_id: player_id.to_string(),
                    season,
                    codes: Vec::new(),
                });
                self.positions.insert(key, self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        let codes = &mut self.entries[idx].codes;
        if !codes.contains(&code) {
            codes.push(code);
        }
    }

    pub fn codes(&self, player_id: &str, season: u16) -> &[&'static str] {
        self.positions
            .get(&(player_id.to_string(), season))
            .map(|&idx| self.entries[idx].codes.as_slice())
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = &AwardEntry> {
        self.entries.iter()
    }

    /// Number of player-seasons with at least one award.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Player-seasons with at least one All-Star appearance, in file order.
#[derive(Debug, Clone, Default)]
pub struct AllStarSet {
    order: Vec<(String, u16)>,
    members: HashSet<(String, u16)>,
}

impl AllStarSet {
    /// Returns `false` if the pair was already present.
    pub fn insert(&mut self, player_id: &str, season: u16) -> bool {
        let key = (player_id.to_string(), season);
        if self.members.contains(&key) {
            return false;
        }
        self.members.insert(key.clone());
        self.order.push(key);
        true
    }

    pub fn contains(&self, player_id: &str, season: u16) -> bool {
        self.members.contains(&(player_id.to_string(), season))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u16)> {
        self.order.iter().map(|(id, season)| (id.as_str(), *season))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Final regular-season record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeasonRecord {
    #[serde(rename = "W")]
    pub wins: u32,
    #[serde(rename = "L")]
    pub losses: u32,
}

/// Season → record for the target franchise.
pub type TeamRecords = BTreeMap<u16, SeasonRecord>;

/// Everything the enricher and leaderboards consult besides stat lines.
#[derive(Debug, Clone, Default)]
pub struct ReferenceFacts {
    pub hall_of_fame: HallOfFame,
    pub awards: AwardIndex,
    pub all_stars: AllStarSet,
    pub team_records: TeamRecords,
}

// ---------------------------------------------------------------------------
// Raw CSV serde structs (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawHallOfFame {
    #[serde(rename = "playerID", default, deserialize_with = "trimmed")]
    player_id: String,
    #[serde(default, deserialize_with = "trimmed")]
    inducted: String,
    #[serde(default, deserialize_with = "trimmed")]
    category: String,
}

#[derive(Debug, Deserialize)]
struct RawAward {
    #[serde(rename = "playerID", default, deserialize_with = "trimmed")]
    player_id: String,
    #[serde(rename = "awardID", default, deserialize_with = "trimmed")]
    award_id: String,
    #[serde(rename = "yearID", default, deserialize_with = "trimmed")]
    year_id: String,
}

#[derive(Debug, Deserialize)]
struct RawAllStar {
    #[serde(rename = "playerID", default, deserialize_with = "trimmed")]
    player_id: String,
    #[serde(rename = "yearID", default, deserialize_with = "trimmed")]
    year_id: String,
}

#[derive(Debug, Deserialize)]
struct RawTeamSeason {
    #[serde(rename = "yearID", default, deserialize_with = "trimmed")]
    year_id: String,
    #[serde(rename = "teamID", default, deserialize_with = "trimmed")]
    team_id: String,
    #[serde(rename = "W", default, deserialize_with = "lenient_count")]
    w: u32,
    #[serde(rename = "L", default, deserialize_with = "lenient_count")]
    l: u32,
}

fn table_reader<R: Read>(rdr: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(rdr)
}

// ---------------------------------------------------------------------------
// Reader-based loaders
// ---------------------------------------------------------------------------

pub fn hall_of_fame_from_reader<R: Read>(rdr: R) -> Result<HallOfFame, TableError> {
    let mut reader = table_reader(rdr);
    require_columns(reader.headers()?, &["playerID", "inducted", "category"])?;

    let mut hof = HallOfFame::default();
    for result in reader.deserialize::<RawHallOfFame>() {
        match result {
            Ok(raw) => {
                if raw.player_id.is_empty() {
                    continue;
                }
                if raw.inducted.eq_ignore_ascii_case("Y")
                    && raw.category.eq_ignore_ascii_case("Player")
                {
                    hof.inductees.insert(raw.player_id);
                }
            }
            Err(e) => warn!("skipping malformed Hall of Fame row: {}", e),
        }
    }
    Ok(hof)
}

pub fn awards_from_reader<R: Read>(rdr: R) -> Result<AwardIndex, TableError> {
    let mut reader = table_reader(rdr);
    require_columns(reader.headers()?, &["playerID", "awardID", "yearID"])?;

    let mut index = AwardIndex::default();
    for result in reader.deserialize::<RawAward>() {
        match result {
            Ok(raw) => {
                let Some(code) = award_code(&raw.award_id) else {
                    continue;
                };
                let Some(season) = parse_season(&raw.year_id) else {
                    continue;
                };
                if raw.player_id.is_empty() {
                    continue;
                }
                index.insert(&raw.player_id, season, code);
            }
            Err(e) => warn!("skipping malformed award row: {}", e),
        }
    }
    Ok(index)
}

pub fn all_stars_from_reader<R: Read>(rdr: R) -> Result<AllStarSet, TableError> {
    let mut reader = table_reader(rdr);
    require_columns(reader.headers()?, &["playerID", "yearID"])?;

    let mut set = AllStarSet::default();
    for result in reader.deserialize::<RawAllStar>() {
        match result {
            Ok(raw) => {
                let Some(season) = parse_season(&raw.year_id) else {
                    continue;
                };
                if raw.player_id.is_empty() {
                    continue;
                }
                set.insert(&raw.player_id, season);
            }
            Err(e) => warn!("skipping malformed All-Star row: {}", e),
        }
    }
    Ok(set)
}

pub fn team_records_from_reader<R: Read>(rdr: R, team: &str) -> Result<TeamRecords, TableError> {
    let mut reader = table_reader(rdr);
    require_columns(reader.headers()?, &["yearID", "teamID", "W", "L"])?;

    let team = team.trim();
    let mut records = TeamRecords::new();
    for result in reader.deserialize::<RawTeamSeason>() {
        match result {
            Ok(raw) => {
                if raw.team_id != team {
                    continue;
                }
                let Some(season) = parse_season(&raw.year_id) else {
                    continue;
                };
                if records.contains_key(&season) {
                    warn!("duplicate {} record for {}, using latest row", team, season);
                }
                records.insert(
                    season,
                    SeasonRecord {
                        wins: raw.w,
                        losses: raw.l,
                    },
                );
            }
            Err(e) => warn!("skipping malformed team record row: {}", e),
        }
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

pub fn load_hall_of_fame(path: &Path) -> Result<HallOfFame, SourceError> {
    let hof = load_table(path, hall_of_fame_from_reader)?;
    info!("Loaded {} Hall of Fame inductees", hof.len());
    Ok(hof)
}

pub fn load_awards(path: &Path) -> Result<AwardIndex, SourceError> {
    let awards = load_table(path, awards_from_reader)?;
    info!("Loaded {} player-season award entries", awards.len());
    Ok(awards)
}

pub fn load_all_stars(path: &Path) -> Result<AllStarSet, SourceError> {
    let all_stars = load_table(path, all_stars_from_reader)?;
    info!("Loaded {} All-Star player-seasons", all_stars.len());
    Ok(all_stars)
}

pub fn load_team_records(path: &Path, team: &str) -> Result<TeamRecords, SourceError> {
    let records = load_table(path, |file| team_records_from_reader(file, team))?;
    info!("Loaded {} {} season records", records.len(), team);
    Ok(records)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
