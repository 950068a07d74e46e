use anyhow::Result;
use diesel::sqlite::SqliteConnection;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use tracing::warn;

use super::source::{cell, read_annex};
use super::{compose_conditions, store_rule, time_segment};
use crate::catalog::Catalog;
use crate::load_report::LoaderMetrics;
use crate::rules::{NewLevelCappingRule, NewRule};

pub const SOURCE_FILE: &str = "Annex_2A.csv";

static CAPPING_LEVEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"FL(\d{3})").unwrap());

#[derive(Debug, Deserialize)]
struct LevelCappingRow {
    #[serde(rename = "ID", default)]
    id: Option<String>,
    #[serde(rename = "From (ADEP)", default)]
    adep: Option<String>,
    #[serde(rename = "To (ADES)", default)]
    ades: Option<String>,
    #[serde(rename = "Flight Level Capping", default)]
    capping: Option<String>,
    #[serde(rename = "Condition", default)]
    condition: Option<String>,
    #[serde(rename = "Time Applicability", default)]
    time: Option<String>,
    #[serde(rename = "Remarks", default)]
    remarks: Option<String>,
}

/// Aerodrome id and area id for a departure or destination column. Four
/// character values are location indicators, anything longer names an area.
fn resolve_endpoint(
    conn: &mut SqliteConnection,
    catalog: &mut Catalog,
    value: Option<&str>,
) -> Result<(Option<i32>, Option<i32>)> {
    match value {
        Some(value) if value.chars().count() == 4 => {
            Ok((catalog.entities.resolve_aerodrome(conn, value)?, None))
        }
        Some(value) => Ok((None, catalog.entities.resolve_area(conn, value)?)),
        None => Ok((None, None)),
    }
}

fn max_flight_level(capping: Option<&str>) -> i32 {
    capping
        .and_then(|text| CAPPING_LEVEL.captures(&text.to_uppercase()).map(|caps| caps[1].to_string()))
        .and_then(|level| level.parse().ok())
        .unwrap_or(0)
}

/// Annex 2A: flight level capping between departure and destination groups.
pub fn load_level_capping(
    conn: &mut SqliteConnection,
    catalog: &mut Catalog,
    source_dir: &Path,
    metrics: &mut LoaderMetrics,
) -> Result<()> {
    let Some(rows) = read_annex::<LevelCappingRow>(&source_dir.join(SOURCE_FILE))? else {
        metrics.source_missing = true;
        return Ok(());
    };
    metrics.rows_read += rows.len();

    for row in rows {
        let Some(rule_identifier) = cell(&row.id) else {
            warn!("Skipping Annex 2A row without a rule ID");
            metrics.record_skip();
            continue;
        };

        let (adep_aerodrome_id, adep_area_id) = resolve_endpoint(conn, catalog, cell(&row.adep))?;
        let (ades_aerodrome_id, ades_area_id) = resolve_endpoint(conn, catalog, cell(&row.ades))?;

        let rule = NewRule::LevelCapping(NewLevelCappingRule {
            rule_identifier: rule_identifier.to_string(),
            adep_aerodrome_id,
            adep_area_id,
            ades_aerodrome_id,
            ades_area_id,
            max_flight_level: max_flight_level(cell(&row.capping)),
            description: cell(&row.remarks).map(str::to_string),
        });

        let time = time_segment(cell(&row.time));
        let conditions = compose_conditions(&[cell(&row.condition), time.as_deref()]);
        store_rule(conn, catalog, &rule, &conditions, metrics)?;
    }

    Ok(())
}
