// Display-ready rate stats derived from counting stats.

/// Batting average as a three-digit string without the leading zero
/// (".312"). `None` when there are no at-bats.
///
/// Thousandths are rounded half-to-even. A perfect average renders as
/// "1.000".
pub fn batting_average(hits: u32, at_bats: u32) -> Option<String> {
    if at_bats == 0 {
        return None;
    }
    let thousandths = (f64::from(hits) / f64::from(at_bats) * 1000.0).round_ties_even() as u64;
    let whole = thousandths / 1000;
    let frac = thousandths % 1000;
    if whole == 0 {
        Some(format!(".{frac:03}"))
    } else {
        Some(format!("{whole}.{frac:03}"))
    }
}

/// Earned run average over `outs / 3` innings, rounded to two decimals
/// half-to-even. `None` when no outs were recorded.
pub fn earned_run_average(earned_runs: u32, outs: u32) -> Option<f64> {
    if outs == 0 {
        return None;
    }
    let innings = f64::from(outs) / 3.0;
    let era = f64::from(earned_runs) / innings * 9.0;
    Some((era * 100.0).round_ties_even() / 100.0)
}

/// Innings pitched in box-score notation: "66.1" means 66⅓ innings.
pub fn innings_display(outs: u32) -> String {
    format!("{}.{}", outs / 3, outs % 3)
}
