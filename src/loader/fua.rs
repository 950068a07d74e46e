use anyhow::Result;
use diesel::sqlite::SqliteConnection;
use serde::Deserialize;
use std::path::Path;
use tracing::warn;

use super::source::{cell, read_annex};
use super::store_rule;
use crate::catalog::Catalog;
use crate::conditions::parse_flight_level;
use crate::load_report::LoaderMetrics;
use crate::rules::{NewFuaRule, NewRule};

pub const SOURCE_FILE: &str = "Annex_2C.csv";

#[derive(Debug, Deserialize)]
struct FuaRow {
    #[serde(rename = "ID", default)]
    id: Option<String>,
    #[serde(rename = "AIP RSA ID", default)]
    airspace: Option<String>,
    #[serde(rename = "Remarks", default)]
    remarks: Option<String>,
    #[serde(rename = "Lower Vert. Limit (FL)", default)]
    lower: Option<String>,
    #[serde(rename = "Upper Vert. Limit (FL)", default)]
    upper: Option<String>,
    #[serde(
        rename = "Traffic Flow Rule applied during times and within vertical limits allocated at EAUP/EUUP",
        default
    )]
    traffic_flow_rule: Option<String>,
}

/// Annex 2C: traffic flow rules tied to reserved airspace activation.
pub fn load_fua(
    conn: &mut SqliteConnection,
    catalog: &mut Catalog,
    source_dir: &Path,
    metrics: &mut LoaderMetrics,
) -> Result<()> {
    let Some(rows) = read_annex::<FuaRow>(&source_dir.join(SOURCE_FILE))? else {
        metrics.source_missing = true;
        return Ok(());
    };
    metrics.rows_read += rows.len();

    for row in rows {
        let Some(rule_identifier) = cell(&row.id) else {
            warn!("Skipping Annex 2C row without a rule ID");
            metrics.record_skip();
            continue;
        };
        let Some(airspace_name) = cell(&row.airspace) else {
            warn!("Skipping Annex 2C rule {rule_identifier}: no AIP RSA ID");
            metrics.record_skip();
            continue;
        };

        let rule = NewRule::Fua(NewFuaRule {
            rule_identifier: rule_identifier.to_string(),
            airspace_name: airspace_name.to_string(),
            default_lower_fl: cell(&row.lower).and_then(parse_flight_level),
            default_upper_fl: cell(&row.upper).and_then(parse_flight_level),
            description: cell(&row.remarks).map(str::to_string),
        });

        let conditions = cell(&row.traffic_flow_rule).unwrap_or_default();
        store_rule(conn, catalog, &rule, conditions, metrics)?;
    }

    Ok(())
}
