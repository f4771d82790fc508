// Static franchise reference tables: championship years, eras, retired
// numbers, nicknames and "on this date" moments.
//
// The tables are compiled in as constants and indexed into maps once at
// startup by `Lore::load`, which also checks their internal consistency.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Table types
// ---------------------------------------------------------------------------

/// A named stretch of franchise history, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Era {
    pub id: &'static str,
    pub label: &'static str,
    pub start: u16,
    pub end: u16,
    pub tagline: &'static str,
}

/// A notable single-date event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Moment {
    pub month: u32,
    pub day: u32,
    pub year: i32,
    pub text: &'static str,
}

/// How a season ended, for seasons that reached the World Series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonOutcome {
    Won,
    Lost,
}

/// Raw constant tables for one franchise.
#[derive(Debug)]
pub struct LoreTables {
    pub code: &'static str,
    pub name: &'static str,
    pub championships_won: &'static [u16],
    pub championships_lost: &'static [u16],
    pub eras: &'static [Era],
    pub era_quotes: &'static [(&'static str, &'static str)],
    pub retired_numbers: &'static [(&'static str, u8)],
    pub nicknames: &'static [(&'static str, &'static str)],
    pub moments: &'static [Moment],
}

#[derive(Debug, thiserror::Error)]
pub enum LoreError {
    #[error("no franchise lore for team code `{0}`")]
    UnknownFranchise(String),

    #[error("{year} is listed as both a championship win and a loss")]
    ChampionshipConflict { year: u16 },

    #[error("era `{id}` ends ({end}) before it starts ({start})")]
    InvertedEra { id: &'static str, start: u16, end: u16 },

    #[error("quote refers to unknown era `{0}`")]
    UnknownEra(&'static str),

    #[error("moment dated {year}-{month}-{day} is not a calendar date")]
    InvalidDate { year: i32, month: u32, day: u32 },
}

// ---------------------------------------------------------------------------
// Indexed lore
// ---------------------------------------------------------------------------

/// Validated, indexed lore for one franchise.
#[derive(Debug, Clone)]
pub struct Lore {
    pub code: &'static str,
    pub name: &'static str,
    won: BTreeSet<u16>,
    lost: BTreeSet<u16>,
    eras: &'static [Era],
    era_quotes: &'static [(&'static str, &'static str)],
    retired_numbers: HashMap<&'static str, u8>,
    nicknames: HashMap<&'static str, &'static str>,
    moments: &'static [Moment],
}

impl Lore {
    /// Look up the built-in tables for `code` and index them.
    pub fn load(code: &str) -> Result<Self, LoreError> {
        let code = code.trim();
        let tables = ALL_FRANCHISES
            .iter()
            .find(|t| t.code == code)
            .ok_or_else(|| LoreError::UnknownFranchise(code.to_string()))?;
        Self::from_tables(tables)
    }

    pub fn from_tables(tables: &LoreTables) -> Result<Self, LoreError> {
        let won: BTreeSet<u16> = tables.championships_won.iter().copied().collect();
        let lost: BTreeSet<u16> = tables.championships_lost.iter().copied().collect();
        if let Some(&year) = won.intersection(&lost).next() {
            return Err(LoreError::ChampionshipConflict { year });
        }

        for era in tables.eras {
            if era.start > era.end {
                return Err(LoreError::InvertedEra {
                    id: era.id,
                    start: era.start,
                    end: era.end,
                });
            }
        }

        for &(era_id, _) in tables.era_quotes {
            if !tables.eras.iter().any(|e| e.id == era_id) {
                return Err(LoreError::UnknownEra(era_id));
            }
        }

        for m in tables.moments {
            if NaiveDate::from_ymd_opt(m.year, m.month, m.day).is_none() {
                return Err(LoreError::InvalidDate {
                    year: m.year,
                    month: m.month,
                    day: m.day,
                });
            }
        }

        Ok(Self {
            code: tables.code,
            name: tables.name,
            won,
            lost,
            eras: tables.eras,
            era_quotes: tables.era_quotes,
            retired_numbers: tables.retired_numbers.iter().copied().collect(),
            nicknames: tables.nicknames.iter().copied().collect(),
            moments: tables.moments,
        })
    }

    pub fn outcome(&self, season: u16) -> Option<SeasonOutcome> {
        if self.won.contains(&season) {
            Some(SeasonOutcome::Won)
        } else if self.lost.contains(&season) {
            Some(SeasonOutcome::Lost)
        } else {
            None
        }
    }

    pub fn retired_number(&self, player_id: &str) -> Option<u8> {
        self.retired_numbers.get(player_id).copied()
    }

    pub fn nickname(&self, player_id: &str) -> Option<&'static str> {
        self.nicknames.get(player_id).copied()
    }

    /// Championship years, ascending.
    pub fn championships_won(&self) -> Vec<u16> {
        self.won.iter().copied().collect()
    }

    /// World Series losses, ascending.
    pub fn championships_lost(&self) -> Vec<u16> {
        self.lost.iter().copied().collect()
    }

    pub fn eras(&self) -> &'static [Era] {
        self.eras
    }

    /// Era quotes in table order.
    pub fn era_quotes(&self) -> &'static [(&'static str, &'static str)] {
        self.era_quotes
    }

    pub fn moments(&self) -> &'static [Moment] {
        self.moments
    }
}

// ---------------------------------------------------------------------------
// Built-in franchises
// ---------------------------------------------------------------------------

static ALL_FRANCHISES: [&LoreTables; 1] = [&YANKEES];

pub static YANKEES: LoreTables = LoreTables {
    code: "NYA",
    name: "New York Yankees",
    championships_won: &[
        1923, 1927, 1928, 1932, 1936, 1937, 1938, 1939, 1941, 1943, 1947, 1949, 1950, 1951, 1952,
        1953, 1956, 1958, 1961, 1962, 1977, 1978, 1996, 1998, 1999, 2000, 2009,
    ],
    championships_lost: &[
        1921, 1922, 1926, 1942, 1955, 1957, 1960, 1963, 1964, 1976, 1981, 2001, 2003,
    ],
    eras: &[
        Era {
            id: "dead-ball",
            label: "Dead Ball",
            start: 1903,
            end: 1919,
            tagline: "The Highlanders become the Yankees",
        },
        Era {
            id: "murderers-row",
            label: "Murderers' Row",
            start: 1920,
            end: 1935,
            tagline: "Ruth, Gehrig, and the birth of a dynasty",
        },
        Era {
            id: "dimaggio",
            label: "DiMaggio Era",
            start: 1936,
            end: 1951,
            tagline: "The Yankee Clipper's 56-game streak",
        },
        Era {
            id: "mantle-maris",
            label: "Mantle & Maris",
            start: 1952,
            end: 1964,
            tagline: "The Mick, Roger, and 61*",
        },
        Era {
            id: "lean-years",
            label: "The Lean Years",
            start: 1965,
            end: 1975,
            tagline: "Waiting for the next dynasty",
        },
        Era {
            id: "bronx-zoo",
            label: "Bronx Zoo",
            start: 1976,
            end: 1981,
            tagline: "Reggie, Billy, and The Boss",
        },
        Era {
            id: "mattingly",
            label: "Mattingly Era",
            start: 1982,
            end: 1995,
            tagline: "Donnie Baseball holds the fort",
        },
        Era {
            id: "dynasty",
            label: "The Dynasty",
            start: 1996,
            end: 2001,
            tagline: "Jeter, Mo, and four rings in five years",
        },
        Era {
            id: "modern",
            label: "Modern Era",
            start: 2002,
            end: 2025,
            tagline: "From the Bronx to the new Stadium",
        },
    ],
    era_quotes: &[
        ("dead-ball", "\"They don't call it the House That Ruth Built for nothing.\""),
        ("murderers-row", "\"I'd rather be lucky than good.\" — Lefty Gomez"),
        ("dimaggio", "\"I want to thank the Good Lord for making me a Yankee.\" — Joe DiMaggio"),
        (
            "mantle-maris",
            "\"If I had played my career hitting singles like Pete, I'd wear a dress.\" — \
                Mickey Mantle",
        ),
        ("lean-years", "\"It's déjà vu all over again.\" — Yogi Berra"),
        ("bronx-zoo", "\"The straw that stirs the drink.\" — Reggie Jackson"),
        (
            "mattingly",
            "\"I didn't come to New York to be a star. I brought my star with me.\" — Don \
                Mattingly",
        ),
        ("dynasty", "\"In my dreams, I never let the boys down.\" — Derek Jeter"),
        ("modern", "\"I tip my cap and call the Yankees my daddy.\" — Pedro Martinez, 2004"),
    ],
    // Players only; managers never appear in the roster source. #8 was
    // retired for both Dickey and Berra.
    retired_numbers: &[
        ("ruthba01", 3),
        ("gehrilo01", 4),
        ("dimagjo01", 5),
        ("mantlmi01", 7),
        ("berrayo01", 8),
        ("dickebi01", 8),
        ("marisro01", 9),
        ("rizzuph01", 10),
        ("howarel01", 14),
        ("munsoth01", 15),
        ("fordwh01", 16),
        ("mattido01", 23),
        ("guidrro01", 49),
        ("riverma01", 42),
        ("jeterde01", 2),
        ("willibe02", 51),
        ("jacksre01", 44),
        ("posadjo01", 20),
        ("pettian01", 46),
        ("randowi01", 30),
        ("gossari01", 54),
        ("combsea01", 1),
        ("lazzeto01", 6),
    ],
    nicknames: &[
        ("ruthba01", "The Sultan of Swat"),
        ("gehrilo01", "The Iron Horse"),
        ("dimagjo01", "The Yankee Clipper"),
        ("mantlmi01", "The Mick"),
        ("jacksre01", "Mr. October"),
        ("riverma01", "Mo"),
        ("jeterde01", "The Captain"),
        ("judgeaa01", "All Rise"),
        ("mattido01", "Donnie Baseball"),
        ("willibe02", "Bernie Boom Boom"),
        ("berrayo01", "Yogi"),
        ("fordwh01", "The Chairman of the Board"),
        ("rizzuph01", "The Scooter"),
        ("guidrro01", "Louisiana Lightning"),
        ("gossari01", "Goose"),
        ("munsoth01", "Tugboat"),
        ("marisro01", "Rog"),
        ("dickebi01", "The Man Nobody Knows"),
        ("combsea01", "The Kentucky Colonel"),
        ("lazzeto01", "Poosh 'Em Up"),
        ("henderi01", "Man of Steal"),
        ("winfida01", "Winnie"),
        ("posadjo01", "Georgie"),
        ("coneda01", "Coney"),
        ("pettian01", "Andy Petty"),
        ("larsedo01", "The Perfect Man"),
    ],
    moments: &[
        Moment {
            month: 4,
            day: 18,
            year: 1923,
            text: "Yankees christen Yankee Stadium with a win — Babe Ruth hits the first homer",
        },
        Moment {
            month: 6,
            day: 2,
            year: 1925,
            text: "Wally Pipp sits out with a headache — Lou Gehrig begins his 2,130-game streak",
        },
        Moment {
            month: 9,
            day: 30,
            year: 1927,
            text: "Babe Ruth hits home run #60, a record that stands for 34 years",
        },
        Moment {
            month: 7,
            day: 4,
            year: 1939,
            text: "Lou Gehrig delivers his 'Luckiest Man' farewell speech at Yankee Stadium",
        },
        Moment {
            month: 5,
            day: 15,
            year: 1941,
            text: "Joe DiMaggio begins his 56-game hitting streak",
        },
        Moment {
            month: 7,
            day: 17,
            year: 1941,
            text: "DiMaggio's 56-game hitting streak is stopped in Cleveland",
        },
        Moment {
            month: 10,
            day: 8,
            year: 1956,
            text: "Don Larsen throws a perfect game in World Series Game 5",
        },
        Moment {
            month: 10,
            day: 1,
            year: 1961,
            text: "Roger Maris hits home run #61, breaking Ruth's single-season record",
        },
        Moment {
            month: 6,
            day: 8,
            year: 1969,
            text: "Mickey Mantle's #7 is retired at Yankee Stadium",
        },
        Moment {
            month: 10,
            day: 18,
            year: 1977,
            text: "Reggie Jackson hits three home runs in World Series Game 6 — 'Mr. October'",
        },
        Moment {
            month: 7,
            day: 4,
            year: 1983,
            text: "The Pine Tar Game — George Brett's home run is initially called out",
        },
        Moment {
            month: 9,
            day: 4,
            year: 1993,
            text: "Jim Abbott throws a no-hitter despite being born without a right hand",
        },
        Moment {
            month: 10,
            day: 26,
            year: 1996,
            text: "Yankees win the World Series for the first time since 1978 — the Dynasty begins",
        },
        Moment {
            month: 5,
            day: 17,
            year: 1998,
            text: "David Wells throws a perfect game against the Twins",
        },
        Moment {
            month: 7,
            day: 18,
            year: 1999,
            text: "David Cone throws a perfect game on Yogi Berra Day",
        },
        Moment {
            month: 10,
            day: 26,
            year: 2000,
            text: "Yankees beat the Mets in the Subway Series for their 3rd straight title",
        },
        Moment {
            month: 11,
            day: 1,
            year: 2001,
            text: "Derek Jeter's walk-off homer in Game 4 of the World Series — 'Mr. November'",
        },
        Moment {
            month: 11,
            day: 4,
            year: 2001,
            text: "The heartbreaking Game 7 loss to Arizona — the Dynasty ends",
        },
        Moment {
            month: 9,
            day: 19,
            year: 2008,
            text: "The final game at the original Yankee Stadium",
        },
        Moment {
            month: 11,
            day: 4,
            year: 2009,
            text: "Yankees win World Series #27, the first in the new Yankee Stadium",
        },
        Moment {
            month: 9,
            day: 19,
            year: 2011,
            text: "Mariano Rivera breaks the all-time saves record (602)",
        },
        Moment {
            month: 9,
            day: 22,
            year: 2013,
            text: "Mariano Rivera's final game — a tearful exit from the mound",
        },
        Moment {
            month: 9,
            day: 25,
            year: 2014,
            text: "Derek Jeter's walk-off single in his final Yankee Stadium game",
        },
        Moment {
            month: 9,
            day: 28,
            year: 2022,
            text: "Aaron Judge hits home run #62, breaking the AL record",
        },
        Moment {
            month: 5,
            day: 1,
            year: 1991,
            text: "Nolan Ryan throws his 7th no-hitter — but Don Mattingly's Yankees were the \
                opponent",
        },
        Moment {
            month: 10,
            day: 9,
            year: 1958,
            text: "Yankees rally from 3-1 deficit to beat the Braves and win the World Series",
        },
        Moment {
            month: 10,
            day: 10,
            year: 1956,
            text: "Mickey Mantle wins the Triple Crown, leading the Yankees to a World Series \
                title",
        },
        Moment {
            month: 4,
            day: 15,
            year: 1997,
            text: "MLB retires Jackie Robinson's #42 league-wide — Rivera grandfathered in",
        },
        Moment {
            month: 8,
            day: 2,
            year: 1979,
            text: "Thurman Munson tragically dies in a plane crash — the Bronx mourns",
        },
        Moment {
            month: 7,
            day: 1,
            year: 1941,
            text: "Joe DiMaggio extends his hitting streak to 45 games vs. the Red Sox",
        },
        Moment {
            month: 6,
            day: 13,
            year: 1948,
            text: "Babe Ruth's final appearance at Yankee Stadium — his number 3 is retired",
        },
        Moment {
            month: 10,
            day: 2,
            year: 1978,
            text: "Bucky Dent's three-run homer lifts the Yankees over the Red Sox in a \
                one-game playoff",
        },
        Moment {
            month: 6,
            day: 17,
            year: 1962,
            text: "Mickey Mantle, Roger Maris, and Bill Skowron hit consecutive homers",
        },
        Moment {
            month: 10,
            day: 15,
            year: 2003,
            text: "Aaron Boone's walk-off homer in Game 7 of the ALCS vs. the Red Sox",
        },
        Moment {
            month: 10,
            day: 20,
            year: 2004,
            text: "The Red Sox complete an unprecedented 3-0 comeback to beat the Yankees in \
                the ALCS",
        },
        Moment {
            month: 5,
            day: 14,
            year: 1996,
            text: "Dwight Gooden throws a no-hitter for the Yankees",
        },
        Moment {
            month: 7,
            day: 24,
            year: 1983,
            text: "Dave Righetti throws a no-hitter on George Steinbrenner's birthday",
        },
    ],
};

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
