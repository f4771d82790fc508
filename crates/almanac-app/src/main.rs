// Almanac builder entry point.
//
// Run sequence:
// 1. Initialize tracing (stderr)
// 2. Load config (seeding config/ from defaults/ when needed)
// 3. Run the pipeline
// 4. Write the artifact atomically
// 5. Log the run summary

mod config;

use std::fs;
use std::path::{Path, PathBuf};

use almanac_core::{Almanac, RunReport};
use anyhow::Context;
use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let (config, base_dir) = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: franchise={}, output={}",
        config.franchise.code, config.output.path
    );

    let paths = config.data_paths.resolve(&base_dir);
    let (almanac, report) = almanac_core::run(&paths, &config.franchise.code)
        .with_context(|| format!("failed to build almanac for {}", config.franchise.code))?;

    let bytes = almanac
        .to_compact_json()
        .context("failed to serialize almanac")?;
    let output = base_dir.join(&config.output.path);
    write_atomically(&output, &bytes)
        .with_context(|| format!("failed to write {}", output.display()))?;

    log_summary(&almanac, &report, &output, bytes.len());
    Ok(())
}

/// Write to a sibling temp file, then rename over `path`, so a failed run
/// never leaves a partial artifact behind.
fn write_atomically(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let tmp = temp_sibling(path);
    if let Err(e) = fs::write(&tmp, bytes) {
        let _ = fs::remove_file(&tmp);
        return Err(e).with_context(|| format!("failed to write {}", tmp.display()));
    }
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e).context("failed to move artifact into place");
    }
    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn log_summary(almanac: &Almanac, report: &RunReport, output: &Path, size: usize) {
    for diagnostic in &report.diagnostics {
        warn!("Source skipped: {}", diagnostic);
    }

    info!(
        "Wrote {} ({:.1} KB)",
        output.display(),
        size as f64 / 1024.0
    );
    match almanac.season_range() {
        Some((first, last)) => info!("{} seasons ({}-{})", almanac.years.len(), first, last),
        None => info!("0 seasons"),
    }
    info!(
        "{} championships won, {} lost",
        almanac.ws_won.len(),
        almanac.ws_lost.len()
    );
    info!(
        "Enriched {} batter-seasons, {} pitcher-seasons",
        report.enriched.batter_seasons, report.enriched.pitcher_seasons
    );
    info!(
        "{} season records, {} on-this-date moments",
        almanac.season_records.len(),
        almanac.on_this_date.len()
    );
    let boards: Vec<String> = almanac
        .leaderboards
        .categories()
        .iter()
        .map(|(name, entries)| format!("{}({})", name, entries.len()))
        .collect();
    info!("Leaderboards: {}", boards.join(", "));
}

/// Initialize tracing to stderr so stdout stays free.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("almanac=info,almanac_core=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
