use anyhow::Result;
use diesel::sqlite::SqliteConnection;
use serde::Deserialize;
use std::path::Path;
use tracing::warn;

use super::source::{cell, read_annex};
use super::{compose_conditions, store_rule, time_segment};
use crate::catalog::Catalog;
use crate::load_report::LoaderMetrics;
use crate::rules::{Availability, NewEnrouteStructuralRule, NewRule};

pub const SOURCE_FILE: &str = "Annex_2B.csv";

#[derive(Debug, Deserialize)]
struct EnrouteStructuralRow {
    #[serde(rename = "ID", default)]
    id: Option<String>,
    #[serde(rename = "Airway", default)]
    airway: Option<String>,
    #[serde(rename = "From", default)]
    from: Option<String>,
    #[serde(rename = "To", default)]
    to: Option<String>,
    #[serde(rename = "Point or Airspace", default)]
    point: Option<String>,
    #[serde(rename = "Utilization", default)]
    utilization: Option<String>,
    #[serde(rename = "Time Applicability", default)]
    time: Option<String>,
    #[serde(rename = "Remarks", default)]
    remarks: Option<String>,
}

/// Annex 2B: restrictions on airway segments and points.
pub fn load_enroute_structural(
    conn: &mut SqliteConnection,
    catalog: &mut Catalog,
    source_dir: &Path,
    metrics: &mut LoaderMetrics,
) -> Result<()> {
    let Some(rows) = read_annex::<EnrouteStructuralRow>(&source_dir.join(SOURCE_FILE))? else {
        metrics.source_missing = true;
        return Ok(());
    };
    metrics.rows_read += rows.len();

    for row in rows {
        let Some(rule_identifier) = cell(&row.id) else {
            warn!("Skipping Annex 2B row without a rule ID");
            metrics.record_skip();
            continue;
        };

        let utilization = cell(&row.utilization);
        let rule = NewRule::EnrouteStructural(NewEnrouteStructuralRule {
            rule_identifier: rule_identifier.to_string(),
            ats_route_id: catalog
                .entities
                .resolve_ats_route(conn, row.airway.as_deref().unwrap_or_default())?,
            from_point_id: catalog
                .entities
                .resolve_point(conn, row.from.as_deref().unwrap_or_default())?,
            to_point_id: catalog
                .entities
                .resolve_point(conn, row.to.as_deref().unwrap_or_default())?,
            point_id: catalog
                .entities
                .resolve_point(conn, row.point.as_deref().unwrap_or_default())?,
            availability: Availability::from_utilization(utilization.unwrap_or_default()).as_str(),
            description: cell(&row.remarks).map(str::to_string),
        });

        let time = time_segment(cell(&row.time));
        let conditions = compose_conditions(&[utilization, time.as_deref()]);
        store_rule(conn, catalog, &rule, &conditions, metrics)?;
    }

    Ok(())
}
