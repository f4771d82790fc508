// The almanac artifact and its compact JSON encoding.

use serde::{Serialize, Serializer};

use crate::enrich::EnrichedSeason;
use crate::leaderboard::Leaderboards;
use crate::lore::{Era, Moment};
use crate::reference::TeamRecords;

#[derive(Debug, Clone, Serialize)]
pub struct Almanac {
    pub team: &'static str,
    #[serde(rename = "teamName")]
    pub team_name: &'static str,
    #[serde(serialize_with = "seasons_by_year")]
    pub years: Vec<EnrichedSeason>,
    pub eras: &'static [Era],
    #[serde(rename = "eraQuotes", serialize_with = "quotes_by_era")]
    pub era_quotes: &'static [(&'static str, &'static str)],
    #[serde(rename = "wsWon")]
    pub ws_won: Vec<u16>,
    #[serde(rename = "wsLost")]
    pub ws_lost: Vec<u16>,
    #[serde(rename = "seasonRecords")]
    pub season_records: TeamRecords,
    #[serde(rename = "onThisDate")]
    pub on_this_date: &'static [Moment],
    pub leaderboards: Leaderboards,
}

impl Almanac {
    /// First and last season covered, if any.
    pub fn season_range(&self) -> Option<(u16, u16)> {
        let first = self.years.first()?.season;
        let last = self.years.last()?.season;
        Some((first, last))
    }

    /// Compact JSON with no insignificant whitespace.
    pub fn to_compact_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

#[allow(clippy::ptr_arg)]
fn seasons_by_year<S: Serializer>(
    seasons: &Vec<EnrichedSeason>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(seasons.iter().map(|s| (s.season.to_string(), s)))
}

fn quotes_by_era<S: Serializer>(
    quotes: &&'static [(&'static str, &'static str)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(quotes.iter().map(|(era, quote)| (era, quote)))
}
