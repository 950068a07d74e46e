use anyhow::Result;
use diesel::sqlite::SqliteConnection;
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

use super::source::{cell, read_annex};
use super::{compose_conditions, store_rule, time_segment};
use crate::catalog::Catalog;
use crate::entities::ProcedureKind;
use crate::load_report::LoaderMetrics;
use crate::rules::{Direction, NewAerodromeConnectivityRule, NewRule};

pub const DEP_SOURCE_FILE: &str = "Annex_3A_DEP.csv";
pub const ARR_SOURCE_FILE: &str = "Annex_3A_ARR.csv";

#[derive(Debug, Deserialize)]
struct DepartureRow {
    #[serde(rename = "DEP ID", default)]
    id: Option<String>,
    #[serde(rename = "DEP AD", default)]
    aerodrome: Option<String>,
    #[serde(rename = "Last PT SID / SID ID", default)]
    procedure: Option<String>,
    #[serde(rename = "DCT DEP PT", default)]
    dct_point: Option<String>,
    #[serde(rename = "DEP Time Applicability", default)]
    time: Option<String>,
    #[serde(rename = "DEP FPL Options", default)]
    fpl_options: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ArrivalRow {
    #[serde(rename = "ARR ID", default)]
    id: Option<String>,
    #[serde(rename = "ARR AD", default)]
    aerodrome: Option<String>,
    #[serde(rename = "First PT STAR / STAR ID", default)]
    procedure: Option<String>,
    #[serde(rename = "DCT ARR PT", default)]
    dct_point: Option<String>,
    #[serde(rename = "ARR Time Applicability", default)]
    time: Option<String>,
    #[serde(rename = "ARR FPL Option", default)]
    fpl_options: Option<String>,
}

/// The DEP and ARR exports carry the same information under different
/// column names.
struct ConnectivityRow {
    id: Option<String>,
    aerodrome: Option<String>,
    procedure: Option<String>,
    dct_point: Option<String>,
    time: Option<String>,
    fpl_options: Option<String>,
}

impl From<DepartureRow> for ConnectivityRow {
    fn from(row: DepartureRow) -> Self {
        Self {
            id: row.id,
            aerodrome: row.aerodrome,
            procedure: row.procedure,
            dct_point: row.dct_point,
            time: row.time,
            fpl_options: row.fpl_options,
        }
    }
}

impl From<ArrivalRow> for ConnectivityRow {
    fn from(row: ArrivalRow) -> Self {
        Self {
            id: row.id,
            aerodrome: row.aerodrome,
            procedure: row.procedure,
            dct_point: row.dct_point,
            time: row.time,
            fpl_options: row.fpl_options,
        }
    }
}

/// Annex 3A DEP/ARR: how traffic joins or leaves the route network at each
/// aerodrome.
pub fn load_aerodrome_connectivity(
    conn: &mut SqliteConnection,
    catalog: &mut Catalog,
    source_dir: &Path,
    metrics: &mut LoaderMetrics,
) -> Result<()> {
    let departures = read_annex::<DepartureRow>(&source_dir.join(DEP_SOURCE_FILE))?;
    let arrivals = read_annex::<ArrivalRow>(&source_dir.join(ARR_SOURCE_FILE))?;

    if departures.is_none() && arrivals.is_none() {
        metrics.source_missing = true;
        return Ok(());
    }

    if let Some(rows) = departures {
        info!("Processing {} departure rows", rows.len());
        let rows = rows.into_iter().map(ConnectivityRow::from);
        load_rows(conn, catalog, Direction::Departure, rows, metrics)?;
    }
    if let Some(rows) = arrivals {
        info!("Processing {} arrival rows", rows.len());
        let rows = rows.into_iter().map(ConnectivityRow::from);
        load_rows(conn, catalog, Direction::Arrival, rows, metrics)?;
    }

    Ok(())
}

fn load_rows(
    conn: &mut SqliteConnection,
    catalog: &mut Catalog,
    direction: Direction,
    rows: impl Iterator<Item = ConnectivityRow>,
    metrics: &mut LoaderMetrics,
) -> Result<()> {
    let kind = match direction {
        Direction::Departure => ProcedureKind::Sid,
        Direction::Arrival => ProcedureKind::Star,
    };

    for row in rows {
        metrics.rows_read += 1;

        let Some(rule_identifier) = cell(&row.id) else {
            warn!("Skipping Annex 3A {} row without a rule ID", direction.as_str());
            metrics.record_skip();
            continue;
        };

        let aerodrome = cell(&row.aerodrome).unwrap_or_default();
        let Some(aerodrome_id) = catalog.entities.resolve_aerodrome(conn, aerodrome)? else {
            warn!(
                "Skipping Annex 3A {} rule {rule_identifier}: invalid aerodrome {aerodrome:?}",
                direction.as_str()
            );
            metrics.record_skip();
            continue;
        };

        let procedure = cell(&row.procedure);
        let dct_point = cell(&row.dct_point);

        let transition_point_id = match dct_point.or(procedure) {
            Some(point) => catalog.entities.resolve_point(conn, point)?,
            None => None,
        };

        let procedure_id = match procedure {
            Some(name) => {
                let point_id = match dct_point {
                    Some(point) => catalog.entities.resolve_point(conn, point)?,
                    None => None,
                };
                let point_id = match point_id {
                    Some(id) => id,
                    None => catalog.entities.unknown_point(conn)?,
                };
                catalog
                    .entities
                    .resolve_procedure(conn, name, kind, aerodrome_id, point_id)?
            }
            None => None,
        };

        let rule = NewRule::AerodromeConnectivity(NewAerodromeConnectivityRule {
            rule_identifier: rule_identifier.to_string(),
            aerodrome_id,
            direction: direction.as_str(),
            transition_point_id,
            procedure_id,
            procedure_name: procedure.map(str::to_string),
        });

        let time = time_segment(cell(&row.time));
        let conditions = compose_conditions(&[cell(&row.fpl_options), time.as_deref()]);
        store_rule(conn, catalog, &rule, &conditions, metrics)?;
    }

    Ok(())
}
