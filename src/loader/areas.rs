use anyhow::Result;
use diesel::sqlite::SqliteConnection;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use tracing::warn;

use super::source::{cell, read_annex};
use crate::catalog::Catalog;
use crate::load_report::LoaderMetrics;

pub const SOURCE_FILE: &str = "Annex_1.csv";

// Every run of four capitals is taken as a location indicator.
static ICAO_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]{4}").unwrap());

#[derive(Debug, Deserialize)]
struct AreaRow {
    #[serde(rename = "ID", default)]
    id: Option<String>,
    #[serde(rename = "Definition", default)]
    definition: Option<String>,
}

/// Annex 1: area groups and the aerodromes they contain.
pub fn load_areas(
    conn: &mut SqliteConnection,
    catalog: &mut Catalog,
    source_dir: &Path,
    metrics: &mut LoaderMetrics,
) -> Result<()> {
    let Some(rows) = read_annex::<AreaRow>(&source_dir.join(SOURCE_FILE))? else {
        metrics.source_missing = true;
        return Ok(());
    };
    metrics.rows_read += rows.len();

    for row in rows {
        let Some(area_name) = cell(&row.id) else {
            warn!("Skipping Annex 1 row without an area ID");
            metrics.record_skip();
            continue;
        };
        let Some(area_id) = catalog.entities.resolve_area(conn, area_name)? else {
            continue;
        };

        let definition = cell(&row.definition).unwrap_or_default();
        for code in ICAO_RUN.find_iter(definition) {
            if let Some(aerodrome_id) = catalog.entities.resolve_aerodrome(conn, code.as_str())?
                && catalog
                    .entities
                    .link_area_aerodrome(conn, area_id, aerodrome_id)?
            {
                metrics.links_created += 1;
            }
        }
    }

    Ok(())
}
