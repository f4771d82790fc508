// End-to-end tests for the almanac pipeline.
//
// Every test runs `almanac_core::run` over the CSV/JSON fixtures in
// tests/fixtures, or over a temp directory derived from them, and checks the
// serialized artifact the binary would write.

use std::fs;
use std::path::{Path, PathBuf};

use almanac_core::lore::LoreError;
use almanac_core::roster::RosterError;
use almanac_core::source::SourceKind;
use almanac_core::{run, PipelineError, SourcePaths};
use serde_json::Value;

// ===========================================================================
// Test helpers
// ===========================================================================

/// Fixture directory path (relative to the crate root, which is the cwd for
/// `cargo test`).
const FIXTURES: &str = "tests/fixtures";

fn paths_in(dir: &Path) -> SourcePaths {
    SourcePaths {
        rosters: dir.join("rosters.json"),
        batting: dir.join("Batting.csv"),
        pitching: dir.join("Pitching.csv"),
        hall_of_fame: dir.join("HallOfFame.csv"),
        awards: dir.join("AwardsPlayers.csv"),
        all_stars: dir.join("AllstarFull.csv"),
        teams: dir.join("Teams.csv"),
    }
}

fn fixture_paths() -> SourcePaths {
    paths_in(&PathBuf::from(FIXTURES))
}

/// Run over the fixtures and parse the compact output back into a value.
fn fixture_artifact() -> Value {
    let (almanac, _) = run(&fixture_paths(), "NYA").unwrap();
    serde_json::from_slice(&almanac.to_compact_json().unwrap()).unwrap()
}

/// Copy the named fixture files into a fresh temp directory.
fn fixture_subset(files: &[&str]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for name in files {
        fs::copy(Path::new(FIXTURES).join(name), dir.path().join(name)).unwrap();
    }
    dir
}

fn board(value: &Value, category: &str) -> Vec<(String, u64)> {
    value["leaderboards"][category]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| {
            (
                e["playerID"].as_str().unwrap().to_string(),
                e["count"].as_u64().unwrap(),
            )
        })
        .collect()
}

fn owned(pairs: &[(&str, u64)]) -> Vec<(String, u64)> {
    pairs.iter().map(|(id, n)| (id.to_string(), *n)).collect()
}

// ===========================================================================
// Full run
// ===========================================================================

#[test]
fn full_run_covers_every_roster_season() {
    let (almanac, report) = run(&fixture_paths(), "NYA").unwrap();
    assert!(report.diagnostics.is_empty());
    assert_eq!(almanac.season_range(), Some((1927, 1998)));
    let seasons: Vec<u16> = almanac.years.iter().map(|s| s.season).collect();
    assert_eq!(seasons, vec![1927, 1961, 1998]);
    assert_eq!(report.enriched.batter_seasons, 6);
    assert_eq!(report.enriched.pitcher_seasons, 6);

    let json = String::from_utf8(almanac.to_compact_json().unwrap()).unwrap();
    assert!(json.starts_with(r#"{"team":"NYA","teamName":"New York Yankees","years":{"1927":"#));
}

#[test]
fn stints_are_summed_and_metrics_derived() {
    let value = fixture_artifact();
    let maris = &value["years"]["1961"]["position_players"]["RF"];
    assert_eq!(maris["playerID"], "marisro01");
    assert_eq!(maris["G"], 161);
    assert_eq!(maris["AB"], 590);
    assert_eq!(maris["H"], 159);
    assert_eq!(maris["HR"], 61);
    assert_eq!(maris["RBI"], 141);
    assert_eq!(maris["AVG"], ".269");
    assert_eq!(maris["retiredNum"], 9);
    assert_eq!(maris["nickname"], "Rog");
    assert!(maris.get("hof").is_none());
    assert_eq!(maris["awards"], serde_json::json!(["MVP", "AS"]));

    let ford = &value["years"]["1961"]["pitchers"]["starters"][0];
    assert_eq!(ford["IP"], "283.0");
    assert_eq!(ford["IPouts"], 849);
    assert_eq!(ford["W"], 25);
    assert_eq!(ford["ERA"], 3.21);
    assert_eq!(ford["hof"], true);
    assert_eq!(ford["awards"], serde_json::json!(["CY", "AS"]));

    let arroyo = &value["years"]["1961"]["pitchers"]["closer"];
    assert_eq!(arroyo["SV"], 29);
    assert_eq!(arroyo["IP"], "119.1");
    assert!(arroyo.get("BB").is_none());
}

#[test]
fn players_without_stats_keep_roster_fields_only() {
    let value = fixture_artifact();
    let cone = &value["years"]["1998"]["pitchers"]["starters"][1];
    let mut keys: Vec<&str> = cone.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort();
    let mut expected = vec!["G", "GS", "IP", "IPouts", "name", "nickname", "playerID"];
    expected.sort();
    assert_eq!(keys, expected);
    assert_eq!(cone["IP"], "207.2");
    assert_eq!(cone["nickname"], "Coney");
}

#[test]
fn slots_without_identity_are_dropped() {
    let value = fixture_artifact();
    let slots = value["years"]["1998"]["position_players"].as_object().unwrap();
    assert_eq!(slots.len(), 2);
    assert!(slots.get("DH").is_none());
}

#[test]
fn world_series_and_season_records() {
    let value = fixture_artifact();
    assert_eq!(value["years"]["1927"]["worldSeries"], "won");
    assert_eq!(value["years"]["1998"]["worldSeries"], "won");
    assert_eq!(value["wsWon"].as_array().unwrap().len(), 27);
    assert_eq!(value["wsLost"].as_array().unwrap().len(), 13);

    let records = value["seasonRecords"].as_object().unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(value["seasonRecords"]["1927"], serde_json::json!({"W": 110, "L": 44}));
    assert!(records.get("1999").is_none());
}

#[test]
fn leaderboards_respect_roster_membership() {
    let value = fixture_artifact();
    // Ruth's 1923 MVP and Maris's 1960 MVP fall outside the roster seasons.
    assert_eq!(board(&value, "mvp"), owned(&[("gehrilo01", 1), ("marisro01", 1)]));
    assert_eq!(board(&value, "cyYoung"), owned(&[("fordwh01", 1)]));
    assert_eq!(
        board(&value, "allStar"),
        owned(&[
            ("marisro01", 1),
            ("mantlmi01", 1),
            ("fordwh01", 1),
            ("jeterde01", 1),
            ("willibe02", 1),
        ])
    );
    assert_eq!(
        board(&value, "wsWins"),
        owned(&[
            ("ruthba01", 1),
            ("gehrilo01", 1),
            ("hoytwa01", 1),
            ("morewi01", 1),
            ("marisro01", 1),
        ])
    );
    assert_eq!(value["leaderboards"]["mvp"][0]["name"], "Lou Gehrig");
}

#[test]
fn identical_inputs_produce_identical_bytes() {
    let (first, _) = run(&fixture_paths(), "NYA").unwrap();
    let (second, _) = run(&fixture_paths(), "NYA").unwrap();
    assert_eq!(
        first.to_compact_json().unwrap(),
        second.to_compact_json().unwrap()
    );
}

// ===========================================================================
// Fault isolation
// ===========================================================================

#[test]
fn missing_and_malformed_secondary_sources_degrade_to_empty() {
    let dir = fixture_subset(&["rosters.json", "Batting.csv", "Pitching.csv", "HallOfFame.csv"]);
    fs::write(dir.path().join("Teams.csv"), "yearID,teamID,W\n1927,NYA,110\n").unwrap();

    let (almanac, report) = run(&paths_in(dir.path()), "NYA").unwrap();
    let failed: Vec<SourceKind> = report.diagnostics.iter().map(|d| d.source).collect();
    assert_eq!(
        failed,
        vec![SourceKind::Awards, SourceKind::AllStars, SourceKind::TeamRecords]
    );

    assert!(almanac.season_records.is_empty());
    assert!(almanac.leaderboards.mvp.is_empty());
    assert!(almanac.leaderboards.all_star.is_empty());
    assert_eq!(almanac.leaderboards.ws_wins.len(), 5);
    assert_eq!(report.enriched.batter_seasons, 6);

    let value: Value = serde_json::from_slice(&almanac.to_compact_json().unwrap()).unwrap();
    let ruth = &value["years"]["1927"]["position_players"]["RF"];
    assert_eq!(ruth["HR"], 60);
    assert_eq!(ruth["hof"], true);
    assert!(ruth.get("awards").is_none());
}

#[test]
fn missing_stat_files_leave_roster_counters() {
    let dir = fixture_subset(&["rosters.json"]);
    let (almanac, report) = run(&paths_in(dir.path()), "NYA").unwrap();
    assert_eq!(report.diagnostics.len(), 6);
    assert_eq!(report.enriched.batter_seasons, 0);
    assert_eq!(report.enriched.pitcher_seasons, 0);
    assert_eq!(almanac.years.len(), 3);

    let value: Value = serde_json::from_slice(&almanac.to_compact_json().unwrap()).unwrap();
    let gehrig = &value["years"]["1927"]["position_players"]["1B"];
    assert_eq!(gehrig["G"], 155);
    assert!(gehrig.get("AB").is_none());
    assert!(gehrig.get("AVG").is_none());
    assert_eq!(gehrig["retiredNum"], 4);
}

#[test]
fn missing_roster_is_fatal() {
    let dir = fixture_subset(&["Batting.csv"]);
    match run(&paths_in(dir.path()), "NYA") {
        Err(PipelineError::Roster(RosterError::NotFound { .. })) => {}
        other => panic!("expected missing roster error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn unparseable_roster_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("rosters.json"), "{\"teams\": [").unwrap();
    match run(&paths_in(dir.path()), "NYA") {
        Err(PipelineError::Roster(RosterError::Parse(_))) => {}
        other => panic!("expected parse error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn unknown_franchise_is_fatal() {
    match run(&fixture_paths(), "XXX") {
        Err(PipelineError::Lore(LoreError::UnknownFranchise(code))) => assert_eq!(code, "XXX"),
        other => panic!("expected unknown franchise error, got {:?}", other.map(|_| ())),
    }
}
