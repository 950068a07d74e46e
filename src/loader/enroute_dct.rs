use anyhow::Result;
use diesel::sqlite::SqliteConnection;
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

use super::source::{cell, read_annex};
use super::{compose_conditions, store_rule, time_segment, vertical_limits_segment};
use crate::catalog::Catalog;
use crate::load_report::LoaderMetrics;
use crate::rules::{Availability, NewAerodromeConditionRule, NewEnrouteDctRule, NewRule};

pub const DCT_SOURCE_FILE: &str = "Annex_3B_DCT.csv";
pub const FRA_LIM_SOURCE_FILE: &str = "Annex_3B_FRA_LIM.csv";

const DCT_RULE_TYPE: &str = "DCT";
const FRA_LIM_CONDITION: &str = "FRA LIM";
const FRA_LIM_APPLICABILITY: &str = "GENERAL";

#[derive(Debug, Deserialize)]
struct DctRow {
    #[serde(rename = "ID", default)]
    id: Option<String>,
    #[serde(rename = "From", default)]
    from: Option<String>,
    #[serde(rename = "To", default)]
    to: Option<String>,
    #[serde(rename = "Lower Vert. Limit (FL)", default)]
    lower: Option<String>,
    #[serde(rename = "Upper Vert. Limit (FL)", default)]
    upper: Option<String>,
    #[serde(rename = "Available or Not (Y/N)", default)]
    available: Option<String>,
    #[serde(rename = "Utilization", default)]
    utilization: Option<String>,
    #[serde(rename = "Time Availability", default)]
    time: Option<String>,
    #[serde(rename = "Remarks", default)]
    remarks: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FraLimitRow {
    #[serde(rename = "RAD Application ID", default)]
    id: Option<String>,
    #[serde(rename = "Airspace", default)]
    airspace: Option<String>,
    #[serde(rename = "DCT Horiz. Limit", default)]
    horizontal_limit: Option<String>,
    #[serde(rename = "Remarks", default)]
    remarks: Option<String>,
}

/// Annex 3B: en-route DCT segments, plus the free route airspace DCT limits
/// which are stored as aerodrome condition rules.
pub fn load_enroute_dct(
    conn: &mut SqliteConnection,
    catalog: &mut Catalog,
    source_dir: &Path,
    metrics: &mut LoaderMetrics,
) -> Result<()> {
    let dct_rows = read_annex::<DctRow>(&source_dir.join(DCT_SOURCE_FILE))?;
    let fra_rows = read_annex::<FraLimitRow>(&source_dir.join(FRA_LIM_SOURCE_FILE))?;

    if dct_rows.is_none() && fra_rows.is_none() {
        metrics.source_missing = true;
        return Ok(());
    }

    if let Some(rows) = dct_rows {
        info!("Processing {} DCT rows", rows.len());
        load_dct_rows(conn, catalog, rows, metrics)?;
    }
    if let Some(rows) = fra_rows {
        info!("Processing {} FRA limit rows", rows.len());
        load_fra_limit_rows(conn, catalog, rows, metrics)?;
    }

    Ok(())
}

fn load_dct_rows(
    conn: &mut SqliteConnection,
    catalog: &mut Catalog,
    rows: Vec<DctRow>,
    metrics: &mut LoaderMetrics,
) -> Result<()> {
    metrics.rows_read += rows.len();

    for row in rows {
        let Some(rule_identifier) = cell(&row.id) else {
            warn!("Skipping Annex 3B DCT row without a rule ID");
            metrics.record_skip();
            continue;
        };

        let from = catalog
            .entities
            .resolve_point(conn, row.from.as_deref().unwrap_or_default())?;
        let to = catalog
            .entities
            .resolve_point(conn, row.to.as_deref().unwrap_or_default())?;
        let (Some(from_point_id), Some(to_point_id)) = (from, to) else {
            warn!("Skipping rule {rule_identifier} due to missing point");
            metrics.record_skip();
            continue;
        };

        let rule = NewRule::EnrouteDct(NewEnrouteDctRule {
            rule_identifier: rule_identifier.to_string(),
            from_point_id,
            to_point_id,
            availability: Availability::from_yes_no(row.available.as_deref().unwrap_or_default())
                .as_str(),
            rule_type: DCT_RULE_TYPE.to_string(),
            description: cell(&row.remarks).map(str::to_string),
        });

        let time = time_segment(cell(&row.time));
        let levels = vertical_limits_segment(cell(&row.lower), cell(&row.upper));
        let conditions =
            compose_conditions(&[cell(&row.utilization), time.as_deref(), levels.as_deref()]);
        store_rule(conn, catalog, &rule, &conditions, metrics)?;
    }

    Ok(())
}

fn load_fra_limit_rows(
    conn: &mut SqliteConnection,
    catalog: &mut Catalog,
    rows: Vec<FraLimitRow>,
    metrics: &mut LoaderMetrics,
) -> Result<()> {
    metrics.rows_read += rows.len();

    for row in rows {
        let Some(rule_identifier) = cell(&row.id) else {
            warn!("Skipping Annex 3B FRA LIM row without a RAD Application ID");
            metrics.record_skip();
            continue;
        };

        let area_id = catalog
            .entities
            .resolve_area(conn, row.airspace.as_deref().unwrap_or_default())?;

        let rule = NewRule::AerodromeCondition(NewAerodromeConditionRule {
            rule_identifier: rule_identifier.to_string(),
            aerodrome_id: None,
            area_id,
            applicability: Some(FRA_LIM_APPLICABILITY.to_string()),
            condition_type: FRA_LIM_CONDITION.to_string(),
            value: cell(&row.horizontal_limit).map(str::to_string),
            description: cell(&row.remarks).map(str::to_string),
        });

        // The horizontal limit is a distance, not condition text.
        store_rule(conn, catalog, &rule, "", metrics)?;
    }

    Ok(())
}
