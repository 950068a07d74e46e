use anyhow::Result;
use diesel::sqlite::SqliteConnection;
use serde::Deserialize;
use std::path::Path;
use tracing::warn;

use super::source::{cell, read_annex};
use super::store_rule;
use crate::catalog::Catalog;
use crate::conditions::FlowTarget;
use crate::load_report::LoaderMetrics;
use crate::rules::{NewAerodromeConditionRule, NewRule};

pub const SOURCE_FILE: &str = "Annex_3A_Conditions.csv";

#[derive(Debug, Deserialize)]
struct AerodromeConditionRow {
    #[serde(rename = "RAD Application ID", default)]
    id: Option<String>,
    #[serde(rename = "NAS / FAB", default)]
    nas_fab: Option<String>,
    #[serde(rename = "Condition", default)]
    condition: Option<String>,
    #[serde(rename = "Explanation", default)]
    explanation: Option<String>,
    #[serde(rename = "Remarks", default)]
    remarks: Option<String>,
}

/// Annex 3A conditions: DCT distance limits and similar constraints that apply
/// to a national airspace or aerodrome group.
pub fn load_aerodrome_conditions(
    conn: &mut SqliteConnection,
    catalog: &mut Catalog,
    source_dir: &Path,
    metrics: &mut LoaderMetrics,
) -> Result<()> {
    let Some(rows) = read_annex::<AerodromeConditionRow>(&source_dir.join(SOURCE_FILE))? else {
        metrics.source_missing = true;
        return Ok(());
    };
    metrics.rows_read += rows.len();

    for row in rows {
        let Some(rule_identifier) = cell(&row.id) else {
            warn!("Skipping Annex 3A condition row without a RAD Application ID");
            metrics.record_skip();
            continue;
        };
        let Some(condition_type) = cell(&row.condition) else {
            warn!("Skipping Annex 3A condition {rule_identifier}: no condition");
            metrics.record_skip();
            continue;
        };

        // Only area-shaped NAS / FAB values are stored as references.
        let area_id = match cell(&row.nas_fab) {
            Some(nas_fab) if FlowTarget::classify(nas_fab) == FlowTarget::Area => {
                catalog.entities.resolve_area(conn, nas_fab)?
            }
            _ => None,
        };

        let explanation = cell(&row.explanation);
        let rule = NewRule::AerodromeCondition(NewAerodromeConditionRule {
            rule_identifier: rule_identifier.to_string(),
            aerodrome_id: None,
            area_id,
            applicability: None,
            condition_type: condition_type.to_string(),
            value: explanation.map(str::to_string),
            description: cell(&row.remarks).map(str::to_string),
        });

        store_rule(conn, catalog, &rule, explanation.unwrap_or_default(), metrics)?;
    }

    Ok(())
}
