// Franchise leaderboards built from the enriched history.
//
// Award and all-star counts only include seasons the player actually spent
// on the roster. Ties keep the order in which each player was first counted.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::enrich::EnrichedSeason;
use crate::lore::SeasonOutcome;
use crate::reference::ReferenceFacts;

/// Entries kept per category.
pub const LEADERBOARD_SIZE: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    #[serde(rename = "playerID")]
    pub player_id: String,
    pub name: String,
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Leaderboards {
    pub mvp: Vec<LeaderboardEntry>,
    #[serde(rename = "cyYoung")]
    pub cy_young: Vec<LeaderboardEntry>,
    #[serde(rename = "allStar")]
    pub all_star: Vec<LeaderboardEntry>,
    #[serde(rename = "wsWins")]
    pub ws_wins: Vec<LeaderboardEntry>,
}

impl Leaderboards {
    /// (output key, entries) for each category in output order.
    pub fn categories(&self) -> [(&'static str, &[LeaderboardEntry]); 4] {
        [
            ("mvp", &self.mvp),
            ("cyYoung", &self.cy_young),
            ("allStar", &self.all_star),
            ("wsWins", &self.ws_wins),
        ]
    }
}

// ---------------------------------------------------------------------------
// Counting
// ---------------------------------------------------------------------------

/// Per-player counts in first-encounter order.
#[derive(Debug, Default)]
struct Tally<'a> {
    counts: Vec<(&'a str, u32)>,
    position: HashMap<&'a str, usize>,
}

impl<'a> Tally<'a> {
    fn bump(&mut self, player_id: &'a str) {
        match self.position.get(player_id) {
            Some(&i) => self.counts[i].1 += 1,
            None => {
                self.position.insert(player_id, self.counts.len());
                self.counts.push((player_id, 1));
            }
        }
    }

    /// Highest counts first, stable on encounter order, zeros dropped.
    fn top(self, names: &HashMap<&str, &str>) -> Vec<LeaderboardEntry> {
        let mut counts = self.counts;
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
            .into_iter()
            .filter(|&(_, count)| count > 0)
            .take(LEADERBOARD_SIZE)
            .map(|(player_id, count)| LeaderboardEntry {
                player_id: player_id.to_string(),
                name: names.get(player_id).copied().unwrap_or(player_id).to_string(),
                count,
            })
            .collect()
    }
}

/// Rank players across the whole history.
pub fn build_leaderboards(history: &[EnrichedSeason], facts: &ReferenceFacts) -> Leaderboards {
    let mut names: HashMap<&str, &str> = HashMap::new();
    let mut seasons_on_roster: HashMap<&str, HashSet<u16>> = HashMap::new();
    let mut ws_wins = Tally::default();

    for season in history {
        let won = season.outcome == Some(SeasonOutcome::Won);
        for (player_id, name) in season.players() {
            names.insert(player_id, name);
            let first_slot = seasons_on_roster
                .entry(player_id)
                .or_default()
                .insert(season.season);
            // A player filling two slots in a title season still gets one ring.
            if won && first_slot {
                ws_wins.bump(player_id);
            }
        }
    }

    let on_roster = |player_id: &str, season: u16| {
        seasons_on_roster
            .get(player_id)
            .is_some_and(|seasons| seasons.contains(&season))
    };

    let mut mvp = Tally::default();
    let mut cy_young = Tally::default();
    for entry in facts.awards.iter() {
        if !on_roster(&entry.player_id, entry.season) {
            continue;
        }
        if entry.codes.contains(&"MVP") {
            mvp.bump(&entry.player_id);
        }
        if entry.codes.contains(&"CY") {
            cy_young.bump(&entry.player_id);
        }
    }

    let mut all_star = Tally::default();
    for (player_id, season) in facts.all_stars.iter() {
        if on_roster(player_id, season) {
            all_star.bump(player_id);
        }
    }

    Leaderboards {
        mvp: mvp.top(&names),
        cy_young: cy_young.top(&names),
        all_star: all_star.top(&names),
        ws_wins: ws_wins.top(&names),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
