// Season enrichment: joins each roster slot with its aggregated stat line,
// derived metrics and reference facts.
//
// Stat fields are grouped in `Option`al blocks that are flattened on output,
// so a player-season without a stat line carries no stat keys at all rather
// than zeros.

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::lore::{Lore, SeasonOutcome};
use crate::metrics::{batting_average, earned_run_average, innings_display};
use crate::reference::{ReferenceFacts, ALL_STAR_CODE};
use crate::roster::{FranchiseRoster, RosterEntry, SeasonRoster};
use crate::stats::{BattingLine, PitchingLine, StatBook};

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Facts attached to every enriched slot, all optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Honors {
    #[serde(rename = "retiredNum", skip_serializing_if = "Option::is_none")]
    pub retired_number: Option<u8>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub hof: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<&'static str>,
    /// Season award codes plus "AS"; `None` rather than empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub awards: Option<Vec<&'static str>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattingDisplay {
    #[serde(rename = "AB")]
    pub at_bats: u32,
    #[serde(rename = "H")]
    pub hits: u32,
    #[serde(rename = "HR")]
    pub home_runs: u32,
    #[serde(rename = "RBI")]
    pub rbi: u32,
    #[serde(rename = "R")]
    pub runs: u32,
    #[serde(rename = "BB")]
    pub walks: u32,
    #[serde(rename = "SB")]
    pub stolen_bases: u32,
    #[serde(rename = "AVG", skip_serializing_if = "Option::is_none")]
    pub average: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StarterPitching {
    #[serde(rename = "W")]
    pub wins: u32,
    #[serde(rename = "L")]
    pub losses: u32,
    #[serde(rename = "SO")]
    pub strikeouts: u32,
    #[serde(rename = "BB")]
    pub walks: u32,
    #[serde(rename = "ERA", skip_serializing_if = "Option::is_none")]
    pub era: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloserPitching {
    #[serde(rename = "W")]
    pub wins: u32,
    #[serde(rename = "L")]
    pub losses: u32,
    #[serde(rename = "SO")]
    pub strikeouts: u32,
    #[serde(rename = "ERA", skip_serializing_if = "Option::is_none")]
    pub era: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionEntry {
    #[serde(rename = "playerID")]
    pub player_id: String,
    pub name: String,
    #[serde(rename = "G")]
    pub games: u32,
    #[serde(flatten)]
    pub batting: Option<BattingDisplay>,
    #[serde(flatten)]
    pub honors: Honors,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StarterEntry {
    #[serde(rename = "playerID")]
    pub player_id: String,
    pub name: String,
    #[serde(rename = "G")]
    pub games: u32,
    #[serde(rename = "GS")]
    pub games_started: u32,
    #[serde(rename = "IP")]
    pub innings: String,
    #[serde(rename = "IPouts")]
    pub outs: u32,
    #[serde(flatten)]
    pub pitching: Option<StarterPitching>,
    #[serde(flatten)]
    pub honors: Honors,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloserEntry {
    #[serde(rename = "playerID")]
    pub player_id: String,
    pub name: String,
    #[serde(rename = "G")]
    pub games: u32,
    #[serde(rename = "SV")]
    pub saves: u32,
    #[serde(rename = "IP")]
    pub innings: String,
    #[serde(rename = "IPouts")]
    pub outs: u32,
    #[serde(flatten)]
    pub pitching: Option<CloserPitching>,
    #[serde(flatten)]
    pub honors: Honors,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnrichedStaff {
    pub starters: Vec<StarterEntry>,
    pub closer: Option<CloserEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedSeason {
    #[serde(skip)]
    pub season: u16,
    #[serde(serialize_with = "serialize_entries")]
    pub position_players: Vec<(String, PositionEntry)>,
    pub pitchers: EnrichedStaff,
    #[serde(rename = "worldSeries")]
    pub outcome: Option<SeasonOutcome>,
}

impl EnrichedSeason {
    /// (playerID, name) for every slot in roster order.
    pub fn players(&self) -> impl Iterator<Item = (&str, &str)> {
        let position = self
            .position_players
            .iter()
            .map(|(_, p)| (p.player_id.as_str(), p.name.as_str()));
        let starters = self
            .pitchers
            .starters
            .iter()
            .map(|p| (p.player_id.as_str(), p.name.as_str()));
        let closer = self
            .pitchers
            .closer
            .iter()
            .map(|p| (p.player_id.as_str(), p.name.as_str()));
        position.chain(starters).chain(closer)
    }
}

/// Serialize ordered (key, value) pairs as a JSON object.
#[allow(clippy::ptr_arg)]
fn serialize_entries<S, V>(entries: &Vec<(String, V)>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    V: Serialize,
{
    serializer.collect_map(entries.iter().map(|(k, v)| (k, v)))
}

/// How many slots found a stat line, by domain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichmentTally {
    pub batter_seasons: usize,
    pub pitcher_seasons: usize,
}

// ---------------------------------------------------------------------------
// Enricher
// ---------------------------------------------------------------------------

/// Read-only view over every index the join consults.
#[derive(Debug, Clone, Copy)]
pub struct Enricher<'a> {
    pub batting: &'a StatBook<BattingLine>,
    pub pitching: &'a StatBook<PitchingLine>,
    pub facts: &'a ReferenceFacts,
    pub lore: &'a Lore,
}

impl<'a> Enricher<'a> {
    pub fn honors(&self, player_id: &str, season: u16) -> Honors {
        let mut awards: Vec<&'static str> = self.facts.awards.codes(player_id, season).to_vec();
        if self.facts.all_stars.contains(player_id, season) && !awards.contains(&ALL_STAR_CODE) {
            awards.push(ALL_STAR_CODE);
        }

        Honors {
            retired_number: self.lore.retired_number(player_id),
            hof: self.facts.hall_of_fame.contains(player_id),
            nickname: self.lore.nickname(player_id),
            awards: if awards.is_empty() { None } else { Some(awards) },
        }
    }

    fn position(
        &self,
        entry: &RosterEntry,
        season: u16,
        tally: &mut EnrichmentTally,
    ) -> PositionEntry {
        let batting = self.batting.get(&entry.player_id, season).map(|line| {
            tally.batter_seasons += 1;
            BattingDisplay {
                at_bats: line.at_bats,
                hits: line.hits,
                home_runs: line.home_runs,
                rbi: line.rbi,
                runs: line.runs,
                walks: line.walks,
                stolen_bases: line.stolen_bases,
                average: batting_average(line.hits, line.at_bats),
            }
        });

        PositionEntry {
            player_id: entry.player_id.clone(),
            name: entry.name.clone(),
            games: entry.games,
            batting,
            honors: self.honors(&entry.player_id, season),
        }
    }

    fn starter(
        &self,
        entry: &RosterEntry,
        season: u16,
        tally: &mut EnrichmentTally,
    ) -> StarterEntry {
        let pitching = self.pitching.get(&entry.player_id, season).map(|line| {
            tally.pitcher_seasons += 1;
            StarterPitching {
                wins: line.wins,
                losses: line.losses,
                strikeouts: line.strikeouts,
                walks: line.walks,
                era: earned_run_average(line.earned_runs, line.outs),
            }
        });

        StarterEntry {
            player_id: entry.player_id.clone(),
            name: entry.name.clone(),
            games: entry.games,
            games_started: entry.games_started,
            innings: innings_display(entry.outs),
            outs: entry.outs,
            pitching,
            honors: self.honors(&entry.player_id, season),
        }
    }

    fn closer(
        &self,
        entry: &RosterEntry,
        season: u16,
        tally: &mut EnrichmentTally,
    ) -> CloserEntry {
        let pitching = self.pitching.get(&entry.player_id, season).map(|line| {
            tally.pitcher_seasons += 1;
            CloserPitching {
                wins: line.wins,
                losses: line.losses,
                strikeouts: line.strikeouts,
                era: earned_run_average(line.earned_runs, line.outs),
            }
        });

        CloserEntry {
            player_id: entry.player_id.clone(),
            name: entry.name.clone(),
            games: entry.games,
            saves: entry.saves,
            innings: innings_display(entry.outs),
            outs: entry.outs,
            pitching,
            honors: self.honors(&entry.player_id, season),
        }
    }

    /// Enrich every slot of one season, keeping roster order.
    pub fn season(&self, roster: &SeasonRoster, tally: &mut EnrichmentTally) -> EnrichedSeason {
        let season = roster.season;
        let position_players = roster
            .position_players
            .iter()
            .map(|(pos, entry)| (pos.clone(), self.position(entry, season, tally)))
            .collect();
        let starters = roster
            .starters
            .iter()
            .map(|entry| self.starter(entry, season, tally))
            .collect();
        let closer = roster
            .closer
            .as_ref()
            .map(|entry| self.closer(entry, season, tally));

        EnrichedSeason {
            season,
            position_players,
            pitchers: EnrichedStaff { starters, closer },
            outcome: self.lore.outcome(season),
        }
    }

    /// Enrich the whole history, seasons ascending.
    pub fn history(&self, roster: &FranchiseRoster) -> (Vec<EnrichedSeason>, EnrichmentTally) {
        let mut tally = EnrichmentTally::default();
        let seasons: Vec<EnrichedSeason> = roster
            .seasons
            .iter()
            .map(|season| self.season(season, &mut tally))
            .collect();
        debug!(
            "enriched {} seasons ({} batter-seasons, {} pitcher-seasons with stats)",
            seasons.len(),
            tally.batter_seasons,
            tally.pitcher_seasons
        );
        (seasons, tally)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{all_stars_from_reader, awards_from_reader, hall_of_fame_from_reader};
    use crate::roster::roster_from_reader;
    use crate::stats::aggregate_from_reader;

    const ROSTER: &str = r#"{"teams": {"NYA": {"years": {
      "1927": {
        "position_players": {
          "RF": {"playerID": "ruthba01", "name": "Babe Ruth", "G": 151},
          "SS": {"playerID": "koenima01", "name": "Mark Koenig", "G": 126}
        },
        "pitchers": {
          "starters": [
            {"playerID": "hoytwa01", "name": "Waite Hoyt", "G": 36, "GS": 32, "IPouts": 768}
          ],
          "closer": {
            "playerID": "morewi01", "name": "Wilcy Moore", "G": 50, "SV": 13, "IPouts": 642
          }
        }
      },
      "1985": {
        "position_players": {
          "1B": {"playerID": "mattido01", "name": "Don Mattingly", "G": 159}
        },
        "pitchers": {"starters": [], "closer": null}
      }
    }}}}"#;

    const BATTING: &str = "\
playerID,yearID,teamID,G,AB,H,HR,RBI,R,BB,SB
ruthba01,1927,NYA,151,540,192,60,165,158,137,7
mattido01,1985,NYA,159,652,211,35,145,107,56,2
pinchhi01,1985,NYA,3,0,0,0,0,0,0,0";

    const PITCHING: &str = "\
playerID,yearID,teamID,W,L,SO,BB,ER,IPouts
hoytwa01,1927,NYA,22,7,86,54,78,768
morewi01,1927,NYA,19,7,75,59,56,642";

    struct Fixture {
        roster: FranchiseRoster,
        batting: StatBook<BattingLine>,
        pitching: StatBook<PitchingLine>,
        facts: ReferenceFacts,
        lore: Lore,
    }

    fn fixture() -> Fixture {
        let facts = ReferenceFacts {
            hall_of_fame: hall_of_fame_from_reader(
                "playerID,inducted,category\nruthba01,Y,Player\nhoytwa01,Y,Player".as_bytes(),
            )
            .unwrap(),
            awards: awards_from_reader(
                "playerID,awardID,yearID\n\
                 mattido01,Most Valuable Player,1985\n\
                 mattido01,Gold Glove,1985"
                    .as_bytes(),
            )
            .unwrap(),
            all_stars: all_stars_from_reader("playerID,yearID\nmattido01,1985".as_bytes()).unwrap(),
            team_records: Default::default(),
        };
        Fixture {
            roster: roster_from_reader(ROSTER.as_bytes(), "NYA").unwrap(),
            batting: aggregate_from_reader(BATTING.as_bytes(), "NYA").unwrap(),
            pitching: aggregate_from_reader(PITCHING.as_bytes(), "NYA").unwrap(),
            facts,
            lore: Lore::load("NYA").unwrap(),
        }
    }

    fn enrich(f: &Fixture) -> (Vec<EnrichedSeason>, EnrichmentTally) {
        let enricher = Enricher {
            batting: &f.batting,
            pitching: &f.pitching,
            facts: &f.facts,
            lore: &f.lore,
        };
        enricher.history(&f.roster)
    }

    #[test]
    fn batter_with_stats_gets_display_line() {
        let f = fixture();
        let (seasons, _) = enrich(&f);
        let (pos, ruth) = &seasons[0].position_players[0];
        assert_eq!(pos, "RF");
        let batting = ruth.batting.as_ref().unwrap();
        assert_eq!(batting.hits, 192);
        assert_eq!(batting.home_runs, 60);
        assert_eq!(batting.average.as_deref(), Some(".356"));
        assert_eq!(ruth.honors.retired_number, Some(3));
        assert!(ruth.honors.hof);
        assert_eq!(ruth.honors.nickname, Some("The Sultan of Swat"));
        assert_eq!(ruth.honors.awards, None);
    }

    #[test]
    fn batter_without_stats_has_no_stat_fields() {
        let f = fixture();
        let (seasons, _) = enrich(&f);
        let (_, koenig) = &seasons[0].position_players[1];
        assert!(koenig.batting.is_none());
        assert_eq!(koenig.games, 126);

        let json = serde_json::to_value(koenig).unwrap();
        let obj = json.as_object().unwrap();
        let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 3);
        assert!(obj.contains_key("playerID"));
        assert!(obj.contains_key("name"));
        assert!(obj.contains_key("G"));
    }

    #[test]
    fn pitchers_get_innings_and_era() {
        let f = fixture();
        let (seasons, _) = enrich(&f);
        let hoyt = &seasons[0].pitchers.starters[0];
        assert_eq!(hoyt.innings, "256.0");
        assert_eq!(hoyt.outs, 768);
        assert_eq!(hoyt.games_started, 32);
        let pitching = hoyt.pitching.as_ref().unwrap();
        assert_eq!(pitching.wins, 22);
        // 78 ER over 256 IP.
        assert_eq!(pitching.era, Some(2.74));

        let moore = seasons[0].pitchers.closer.as_ref().unwrap();
        assert_eq!(moore.saves, 13);
        assert_eq!(moore.innings, "214.0");
        assert_eq!(moore.pitching.as_ref().unwrap().era, Some(2.36));
    }

    #[test]
    fn awards_include_all_star_code() {
        let f = fixture();
        let (seasons, _) = enrich(&f);
        let (_, donnie) = &seasons[1].position_players[0];
        assert_eq!(donnie.honors.awards, Some(vec!["MVP", "GG", "AS"]));
        assert_eq!(donnie.honors.nickname, Some("Donnie Baseball"));
        assert!(!donnie.honors.hof);
    }

    #[test]
    fn season_outcome_tagged() {
        let f = fixture();
        let (seasons, _) = enrich(&f);
        assert_eq!(seasons[0].outcome, Some(SeasonOutcome::Won));
        assert_eq!(seasons[1].outcome, None);
    }

    #[test]
    fn tally_counts_matched_slots() {
        let f = fixture();
        let (_, tally) = enrich(&f);
        assert_eq!(tally.batter_seasons, 2);
        assert_eq!(tally.pitcher_seasons, 2);
    }

    #[test]
    fn zero_at_bats_keeps_counters_but_omits_average() {
        let mut f = fixture();
        f.roster.seasons[1].position_players.push((
            "DH".to_string(),
            RosterEntry {
                player_id: "pinchhi01".to_string(),
                name: "Pinch Hitter".to_string(),
                games: 3,
                games_started: 0,
                saves: 0,
                outs: 0,
            },
        ));
        let (seasons, _) = enrich(&f);
        let (_, pinch) = &seasons[1].position_players[1];
        let batting = pinch.batting.as_ref().unwrap();
        assert_eq!(batting.at_bats, 0);
        assert_eq!(batting.average, None);

        let json = serde_json::to_string(pinch).unwrap();
        assert!(json.contains("\"AB\":0"));
        assert!(!json.contains("AVG"));
    }

    #[test]
    fn season_serializes_in_source_shape() {
        let f = fixture();
        let (seasons, _) = enrich(&f);
        let json = serde_json::to_string(&seasons[1]).unwrap();
        assert_eq!(
            json,
            concat!(
                r#"{"position_players":{"1B":{"playerID":"mattido01","#,
                r#""name":"Don Mattingly","G":159,"#,
                r#""AB":652,"H":211,"HR":35,"RBI":145,"R":107,"BB":56,"SB":2,"AVG":".324","#,
                r#""retiredNum":23,"nickname":"Donnie Baseball","awards":["MVP","GG","AS"]}},"#,
                r#""pitchers":{"starters":[],"closer":null},"worldSeries":null}"#
            )
        );
    }
}
