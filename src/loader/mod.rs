mod aerodrome_conditions;
mod aerodrome_connectivity;
mod areas;
mod enroute_dct;
mod enroute_structural;
mod fua;
mod level_capping;
pub mod source;

use anyhow::{Context, Result};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, info_span, warn};

use crate::catalog::Catalog;
use crate::conditions::parse_flight_level;
use crate::db;
use crate::load_report::{CompileReport, LoaderMetrics};
use crate::rules::{NewRule, RuleUpsert};
use crate::rules_repo::{link_conditions, upsert_rule};

/// The loader stages, in the order they must run. Areas come first so that
/// later stages find the area groups already defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderStage {
    Areas,
    LevelCapping,
    EnrouteStructural,
    Fua,
    AerodromeConnectivity,
    AerodromeConditions,
    EnrouteDct,
}

impl LoaderStage {
    pub const ALL: [LoaderStage; 7] = [
        LoaderStage::Areas,
        LoaderStage::LevelCapping,
        LoaderStage::EnrouteStructural,
        LoaderStage::Fua,
        LoaderStage::AerodromeConnectivity,
        LoaderStage::AerodromeConditions,
        LoaderStage::EnrouteDct,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LoaderStage::Areas => "Areas",
            LoaderStage::LevelCapping => "LevelCapping",
            LoaderStage::EnrouteStructural => "EnrouteStructural",
            LoaderStage::Fua => "Fua",
            LoaderStage::AerodromeConnectivity => "AerodromeConnectivity",
            LoaderStage::AerodromeConditions => "AerodromeConditions",
            LoaderStage::EnrouteDct => "EnrouteDct",
        }
    }

    pub fn source_files(&self) -> &'static [&'static str] {
        match self {
            LoaderStage::Areas => &[areas::SOURCE_FILE],
            LoaderStage::LevelCapping => &[level_capping::SOURCE_FILE],
            LoaderStage::EnrouteStructural => &[enroute_structural::SOURCE_FILE],
            LoaderStage::Fua => &[fua::SOURCE_FILE],
            LoaderStage::AerodromeConnectivity => &[
                aerodrome_connectivity::DEP_SOURCE_FILE,
                aerodrome_connectivity::ARR_SOURCE_FILE,
            ],
            LoaderStage::AerodromeConditions => &[aerodrome_conditions::SOURCE_FILE],
            LoaderStage::EnrouteDct => &[enroute_dct::DCT_SOURCE_FILE, enroute_dct::FRA_LIM_SOURCE_FILE],
        }
    }

    fn load(
        &self,
        conn: &mut SqliteConnection,
        catalog: &mut Catalog,
        source_dir: &Path,
        metrics: &mut LoaderMetrics,
    ) -> Result<()> {
        match self {
            LoaderStage::Areas => areas::load_areas(conn, catalog, source_dir, metrics),
            LoaderStage::LevelCapping => {
                level_capping::load_level_capping(conn, catalog, source_dir, metrics)
            }
            LoaderStage::EnrouteStructural => {
                enroute_structural::load_enroute_structural(conn, catalog, source_dir, metrics)
            }
            LoaderStage::Fua => fua::load_fua(conn, catalog, source_dir, metrics),
            LoaderStage::AerodromeConnectivity => {
                aerodrome_connectivity::load_aerodrome_connectivity(
                    conn, catalog, source_dir, metrics,
                )
            }
            LoaderStage::AerodromeConditions => {
                aerodrome_conditions::load_aerodrome_conditions(conn, catalog, source_dir, metrics)
            }
            LoaderStage::EnrouteDct => enroute_dct::load_enroute_dct(conn, catalog, source_dir, metrics),
        }
    }
}

/// Compiles every annex found in `source_dir` into the SQLite store at
/// `database_path`, creating the schema first when needed.
pub fn compile(database_path: &str, source_dir: &Path) -> Result<CompileReport> {
    let overall_start = Instant::now();
    info!(
        "Compiling RAD annexes from {} into {}",
        source_dir.display(),
        database_path
    );

    let mut conn = db::establish_connection(database_path)?;
    db::run_migrations(&mut conn).context("Failed to create the rule store schema")?;

    let mut catalog = Catalog::new();
    let mut report = run_stages(&mut conn, &mut catalog, source_dir)?;

    report.total_duration_secs = overall_start.elapsed().as_secs_f64();
    report.log_summary();
    Ok(report)
}

/// Runs all stages in order against an already migrated connection. Stops at
/// the first stage that fails.
pub fn run_stages(
    conn: &mut SqliteConnection,
    catalog: &mut Catalog,
    source_dir: &Path,
) -> Result<CompileReport> {
    let mut report = CompileReport::new();
    for stage in LoaderStage::ALL {
        let metrics = run_stage(conn, catalog, stage, source_dir)?;
        report.add_stage(metrics);
    }
    Ok(report)
}

/// Runs one stage inside its own transaction. On failure the transaction
/// rolls back and the catalog caches are dropped, since they may reference
/// rows that were never committed.
pub fn run_stage(
    conn: &mut SqliteConnection,
    catalog: &mut Catalog,
    stage: LoaderStage,
    source_dir: &Path,
) -> Result<LoaderMetrics> {
    let span = info_span!("stage", name = stage.name());
    let _guard = span.enter();

    let start = Instant::now();
    let mut metrics = LoaderMetrics::new(stage.name());
    info!("Loading {} from {:?}", stage.name(), stage.source_files());

    let result = conn.transaction::<_, anyhow::Error, _>(|conn| {
        stage.load(conn, catalog, source_dir, &mut metrics)
    });

    if let Err(e) = result {
        error!("Stage {} failed, rolled back: {:#}", stage.name(), e);
        catalog.clear_caches();
        return Err(e.context(format!("Stage {} failed", stage.name())));
    }

    metrics.duration_secs = start.elapsed().as_secs_f64();
    if metrics.source_missing {
        warn!("Skipping {} - no source data", stage.name());
    } else {
        info!(
            "Loaded {} rows into {} rules ({} new, {} existing), {} skipped, {} links",
            metrics.rows_read,
            metrics.rules_total(),
            metrics.rules_inserted,
            metrics.rules_existing,
            metrics.rows_skipped,
            metrics.links_created
        );
    }

    Ok(metrics)
}

/// Stores a rule, compiles its condition text and links the resulting
/// conditions the family accepts.
pub(crate) fn store_rule(
    conn: &mut SqliteConnection,
    catalog: &mut Catalog,
    rule: &NewRule,
    condition_text: &str,
    metrics: &mut LoaderMetrics,
) -> Result<RuleUpsert> {
    let upsert = upsert_rule(conn, rule)?;
    metrics.record_upsert(upsert);

    let parsed = catalog.compile_conditions(conn, condition_text)?;
    let stats = link_conditions(conn, rule.family(), upsert.rule_id(), &parsed)?;
    metrics.record_links(stats);

    debug!(
        "{} rule {}: {:?}, {} condition(s) linked from {:?}",
        rule.family(),
        rule.rule_identifier(),
        upsert,
        stats.linked,
        condition_text
    );
    Ok(upsert)
}

/// Joins the non-blank segments with single spaces.
pub(crate) fn compose_conditions(segments: &[Option<&str>]) -> String {
    segments
        .iter()
        .flatten()
        .map(|segment| segment.trim())
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

static BARE_WINDOW: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{4}$").unwrap());

/// Time applicability column as a condition segment. `H24` means no
/// restriction; a bare window needs its `DLY` prefix once it is embedded in a
/// longer string.
pub(crate) fn time_segment(value: Option<&str>) -> Option<String> {
    let value = value?.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("H24") {
        return None;
    }
    if BARE_WINDOW.is_match(value) {
        return Some(format!("DLY {value}"));
    }
    Some(value.to_string())
}

/// Builds a level segment from separate lower and upper limit columns.
/// Values that are not flight levels (`GND`, `UNL`) are ignored.
pub(crate) fn vertical_limits_segment(lower: Option<&str>, upper: Option<&str>) -> Option<String> {
    let lower = lower.and_then(flight_level_token);
    let upper = upper.and_then(flight_level_token);

    match (lower, upper) {
        (Some(lower), Some(upper)) => Some(format!("BTN {lower} AND {upper}")),
        (Some(lower), None) => Some(format!("AT OR ABV {lower}")),
        (None, Some(upper)) => Some(format!("AT OR BLW {upper}")),
        (None, None) => None,
    }
}

fn flight_level_token(value: &str) -> Option<String> {
    parse_flight_level(value)
        .filter(|level| (0..=999).contains(level))
        .map(|level| format!("FL{level:03}"))
}
