// Primary roster source: season-by-season lineups, rotations and closers.
//
// JSON layout:
//
//   {"teams": {"NYA": {"years": {"1927": {
//       "position_players": {"C": {...}, "1B": {...}, ...},
//       "pitchers": {"starters": [{...}, ...], "closer": {...} | null}
//   }}}}}
//
// Position players keep the order they are written in, so the object is read
// into an ordered list rather than a map. A repeated key keeps its first
// position and takes the last value written.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::io::{BufReader, Read};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use tracing::{debug, info, warn};

use crate::source::parse_season;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One player in one roster slot for one season, as the source wrote it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub player_id: String,
    pub name: String,
    pub games: u32,
    pub games_started: u32,
    pub saves: u32,
    /// Outs recorded (`IPouts`), pitchers only.
    pub outs: u32,
}

/// Every filled slot for one season.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonRoster {
    pub season: u16,
    /// (position code, player) in source order.
    pub position_players: Vec<(String, RosterEntry)>,
    pub starters: Vec<RosterEntry>,
    pub closer: Option<RosterEntry>,
}

impl SeasonRoster {
    /// All slots: position players, then starters, then the closer.
    pub fn entries(&self) -> impl Iterator<Item = &RosterEntry> {
        self.position_players
            .iter()
            .map(|(_, entry)| entry)
            .chain(self.starters.iter())
            .chain(self.closer.iter())
    }
}

/// A franchise's full roster history, seasons ascending.
#[derive(Debug, Clone)]
pub struct FranchiseRoster {
    pub code: String,
    pub seasons: Vec<SeasonRoster>,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("roster source not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read roster source {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse roster source: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("franchise `{0}` not present in roster source")]
    FranchiseNotFound(String),
}

// ---------------------------------------------------------------------------
// Raw JSON serde structs (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawRosterFile {
    teams: HashMap<String, RawFranchise>,
}

#[derive(Debug, Deserialize)]
struct RawFranchise {
    #[serde(default, deserialize_with = "ordered_entries")]
    years: Vec<(String, RawSeason)>,
}

#[derive(Debug, Deserialize)]
struct RawSeason {
    #[serde(default, deserialize_with = "ordered_entries")]
    position_players: Vec<(String, Option<RawPlayer>)>,
    #[serde(default)]
    pitchers: Option<RawStaff>,
}

#[derive(Debug, Default, Deserialize)]
struct RawStaff {
    #[serde(default)]
    starters: Vec<Option<RawPlayer>>,
    #[serde(default)]
    closer: Option<RawPlayer>,
}

#[derive(Debug, Deserialize)]
struct RawPlayer {
    #[serde(rename = "playerID", default)]
    player_id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "G", default, deserialize_with = "json_count")]
    g: u32,
    #[serde(rename = "GS", default, deserialize_with = "json_count")]
    gs: u32,
    #[serde(rename = "SV", default, deserialize_with = "json_count")]
    sv: u32,
    #[serde(rename = "IPouts", default, deserialize_with = "json_count")]
    ipouts: u32,
}

/// Read a JSON object as ordered (key, value) pairs, one per distinct key.
fn ordered_entries<'de, D, V>(deserializer: D) -> Result<Vec<(String, V)>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    struct EntriesVisitor<V>(PhantomData<V>);

    impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
        type Value = Vec<(String, V)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a JSON object")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut entries: Vec<(String, V)> = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, value)) = map.next_entry::<String, V>()? {
                match entries.iter_mut().find(|(k, _)| *k == key) {
                    Some((_, slot)) => *slot = value,
                    None => entries.push((key, value)),
                }
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(EntriesVisitor(PhantomData))
}

/// Counters may be written as ints, floats or null.
fn json_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(match value {
        Some(v) if v.is_finite() && v > 0.0 => v.trunc() as u32,
        _ => 0,
    })
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

/// Slots without an ID or a name cannot be joined against anything.
fn convert_player(raw: RawPlayer, season: u16, slot: &str) -> Option<RosterEntry> {
    let player_id = raw.player_id.map(|s| s.trim().to_string()).unwrap_or_default();
    let name = raw.name.map(|s| s.trim().to_string()).unwrap_or_default();
    if player_id.is_empty() || name.is_empty() {
        warn!("dropping {} roster slot {}: missing playerID or name", season, slot);
        return None;
    }
    Some(RosterEntry {
        player_id,
        name,
        games: raw.g,
        games_started: raw.gs,
        saves: raw.sv,
        outs: raw.ipouts,
    })
}

fn convert_season(season: u16, raw: RawSeason) -> SeasonRoster {
    let position_players = raw
        .position_players
        .into_iter()
        .filter_map(|(pos, player)| {
            let entry = convert_player(player?, season, &pos)?;
            Some((pos, entry))
        })
        .collect();

    let staff = raw.pitchers.unwrap_or_default();
    let starters = staff
        .starters
        .into_iter()
        .enumerate()
        .filter_map(|(i, player)| convert_player(player?, season, &format!("SP{}", i + 1)))
        .collect();
    let closer = staff
        .closer
        .and_then(|player| convert_player(player, season, "CL"));

    SeasonRoster {
        season,
        position_players,
        starters,
        closer,
    }
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

/// Parse the roster document and extract one franchise's history.
pub fn roster_from_reader<R: Read>(rdr: R, code: &str) -> Result<FranchiseRoster, RosterError> {
    let mut file: RawRosterFile = serde_json::from_reader(BufReader::new(rdr))?;
    let code = code.trim();
    let franchise = file
        .teams
        .remove(code)
        .ok_or_else(|| RosterError::FranchiseNotFound(code.to_string()))?;

    // Keys such as "1927" and "1927.0" name the same season; the later one wins.
    let mut seasons = BTreeMap::new();
    for (key, raw) in franchise.years {
        let Some(season) = parse_season(&key) else {
            warn!("skipping roster season with non-year key '{}'", key);
            continue;
        };
        let roster = convert_season(season, raw);
        debug!(
            "{} {}: {} position players, {} starters, closer={}",
            code,
            season,
            roster.position_players.len(),
            roster.starters.len(),
            roster.closer.is_some()
        );
        seasons.insert(season, roster);
    }

    Ok(FranchiseRoster {
        code: code.to_string(),
        seasons: seasons.into_values().collect(),
    })
}

/// Load the primary roster source. Every failure here is fatal to the run.
pub fn load_roster(path: &Path, code: &str) -> Result<FranchiseRoster, RosterError> {
    let file = std::fs::File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            RosterError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            RosterError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    let roster = roster_from_reader(file, code)?;
    info!(
        "Loaded {} {} seasons from {}",
        roster.seasons.len(),
        roster.code,
        path.display()
    );
    Ok(roster)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
      "teams": {
        "BOS": {"years": {"1927": {"position_players": {}, "pitchers": {"starters": []}}}},
        "NYA": {"years": {
          "1928": {
            "position_players": {
              "RF": {"playerID": "ruthba01", "name": "Babe Ruth", "G": 154},
              "1B": {"playerID": "gehrilo01", "name": "Lou Gehrig", "G": 154},
              "C": {"playerID": "grabojo01", "name": "Johnny Grabowski", "G": 75}
            },
            "pitchers": {
              "starters": [
                {"playerID": "hoytwa01", "name": "Waite Hoyt", "G": 42, "GS": 31, "IPouts": 819},
                {
                  "playerID": "pipgrge01", "name": "George Pipgras",
                  "G": 46, "GS": 38, "IPouts": 902
                }
              ],
              "closer": null
            }
          },
          "1927": {
            "position_players": {
              "CF": {"playerID": "combsea01", "name": "Earle Combs", "G": 152.0}
            },
            "pitchers": {
              "starters": [],
              "closer": {
                "playerID": "morewi01", "name": "Wilcy Moore", "G": 50, "SV": 13, "IPouts": 642
              }
            }
          }
        }}
      }
    }"#;

    #[test]
    fn seasons_sorted_numerically() {
        let roster = roster_from_reader(SAMPLE.as_bytes(), "NYA").unwrap();
        assert_eq!(roster.code, "NYA");
        let seasons: Vec<u16> = roster.seasons.iter().map(|s| s.season).collect();
        assert_eq!(seasons, vec![1927, 1928]);
    }

    #[test]
    fn position_players_keep_source_order() {
        let roster = roster_from_reader(SAMPLE.as_bytes(), "NYA").unwrap();
        let positions: Vec<&str> = roster.seasons[1]
            .position_players
            .iter()
            .map(|(pos, _)| pos.as_str())
            .collect();
        assert_eq!(positions, vec!["RF", "1B", "C"]);
    }

    #[test]
    fn role_counters_read() {
        let roster = roster_from_reader(SAMPLE.as_bytes(), "NYA").unwrap();
        let s1928 = &roster.seasons[1];
        assert_eq!(s1928.starters.len(), 2);
        assert_eq!(s1928.starters[0].player_id, "hoytwa01");
        assert_eq!(s1928.starters[0].games_started, 31);
        assert_eq!(s1928.starters[0].outs, 819);
        assert!(s1928.closer.is_none());

        let s1927 = &roster.seasons[0];
        let closer = s1927.closer.as_ref().unwrap();
        assert_eq!(closer.name, "Wilcy Moore");
        assert_eq!(closer.saves, 13);
        assert_eq!(closer.outs, 642);
        // Float counter truncated.
        assert_eq!(s1927.position_players[0].1.games, 152);
    }

    #[test]
    fn entries_walk_every_slot_in_order() {
        let roster = roster_from_reader(SAMPLE.as_bytes(), "NYA").unwrap();
        let ids: Vec<&str> = roster.seasons[1]
            .entries()
            .map(|e| e.player_id.as_str())
            .collect();
        assert_eq!(ids, vec!["ruthba01", "gehrilo01", "grabojo01", "hoytwa01", "pipgrge01"]);
    }

    #[test]
    fn missing_franchise_is_fatal() {
        let err = roster_from_reader(SAMPLE.as_bytes(), "SEA").unwrap_err();
        assert!(matches!(err, RosterError::FranchiseNotFound(code) if code == "SEA"));
    }

    #[test]
    fn invalid_json_is_fatal() {
        let err = roster_from_reader("{ not json".as_bytes(), "NYA").unwrap_err();
        assert!(matches!(err, RosterError::Parse(_)));
    }

    #[test]
    fn slots_without_identity_dropped() {
        let json = r#"{"teams": {"NYA": {"years": {"1950": {
            "position_players": {
                "C": {"playerID": "berrayo01", "name": "Yogi Berra", "G": 151},
                "1B": {"name": "Mystery Man", "G": 10},
                "2B": null
            },
            "pitchers": {"starters": [{"playerID": "", "name": "Blank"}, null]}
        }}}}}"#;
        let roster = roster_from_reader(json.as_bytes(), "NYA").unwrap();
        let season = &roster.seasons[0];
        assert_eq!(season.position_players.len(), 1);
        assert_eq!(season.position_players[0].0, "C");
        assert!(season.starters.is_empty());
    }

    #[test]
    fn non_year_season_keys_skipped() {
        let json = r#"{"teams": {"NYA": {"years": {
            "notes": {"position_players": {}},
            "1961": {"position_players": {}}
        }}}}"#;
        let roster = roster_from_reader(json.as_bytes(), "NYA").unwrap();
        assert_eq!(roster.seasons.len(), 1);
        assert_eq!(roster.seasons[0].season, 1961);
    }

    #[test]
    fn repeated_position_key_takes_last_value() {
        let json = r#"{"teams": {"NYA": {"years": {"1950": {
            "position_players": {
                "C": {"playerID": "a01", "name": "First Catcher", "G": 20},
                "1B": {"playerID": "c01", "name": "First Base", "G": 140},
                "C": {"playerID": "b01", "name": "Second Catcher", "G": 130}
            }
        }}}}}"#;
        let roster = roster_from_reader(json.as_bytes(), "NYA").unwrap();
        let slots: Vec<(&str, &str)> = roster.seasons[0]
            .position_players
            .iter()
            .map(|(pos, e)| (pos.as_str(), e.player_id.as_str()))
            .collect();
        assert_eq!(slots, vec![("C", "b01"), ("1B", "c01")]);
    }

    #[test]
    fn repeated_season_key_takes_last_value() {
        let json = r#"{"teams": {"NYA": {"years": {
            "1961": {"position_players": {
                "RF": {"playerID": "marisro01", "name": "Roger Maris"}
            }},
            "1962": {"position_players": {}},
            "1961": {"position_players": {
                "CF": {"playerID": "mantlmi01", "name": "Mickey Mantle"}
            }},
            "1962.0": {"position_players": {
                "C": {"playerID": "howarel01", "name": "Elston Howard"}
            }}
        }}}}"#;
        let roster = roster_from_reader(json.as_bytes(), "NYA").unwrap();
        assert_eq!(roster.seasons.len(), 2);
        assert_eq!(roster.seasons[0].season, 1961);
        assert_eq!(roster.seasons[0].position_players.len(), 1);
        assert_eq!(roster.seasons[0].position_players[0].1.player_id, "mantlmi01");
        assert_eq!(roster.seasons[1].position_players[0].1.player_id, "howarel01");
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_roster(&dir.path().join("rosters.json"), "NYA").unwrap_err();
        assert!(matches!(err, RosterError::NotFound { .. }));
    }
}
