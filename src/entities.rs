use diesel::prelude::*;
use std::fmt;

use crate::schema::{aerodromes, area_aerodromes, areas, ats_routes, points, procedures};

/// Point identifier stored for procedures whose fix is not known.
pub const UNKNOWN_POINT: &str = "UNKNOWN";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcedureKind {
    Sid,
    Star,
}

impl ProcedureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcedureKind::Sid => "SID",
            ProcedureKind::Star => "STAR",
        }
    }
}

impl fmt::Display for ProcedureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = points)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Point {
    pub point_id: i32,
    pub identifier: String,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = points)]
pub struct NewPoint<'a> {
    pub identifier: &'a str,
}

#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = aerodromes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Aerodrome {
    pub aerodrome_id: i32,
    pub icao_code: String,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = aerodromes)]
pub struct NewAerodrome<'a> {
    pub icao_code: &'a str,
}

#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = areas)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Area {
    pub area_id: i32,
    pub area_name: String,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = areas)]
pub struct NewArea<'a> {
    pub area_name: &'a str,
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone, Copy, PartialEq, Eq)]
#[diesel(table_name = area_aerodromes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AreaAerodrome {
    pub area_id: i32,
    pub aerodrome_id: i32,
}

#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = ats_routes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AtsRoute {
    pub route_id: i32,
    pub identifier: String,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = ats_routes)]
pub struct NewAtsRoute<'a> {
    pub identifier: &'a str,
}

#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = procedures)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Procedure {
    pub procedure_id: i32,
    pub name: String,
    pub kind: String,
    pub aerodrome_id: i32,
    pub point_id: i32,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = procedures)]
pub struct NewProcedure<'a> {
    pub name: &'a str,
    pub kind: &'a str,
    pub aerodrome_id: i32,
    pub point_id: i32,
}

/// Trimmed natural key, or `None` when nothing is left.
pub fn natural_key(raw: &str) -> Option<&str> {
    let key = raw.trim();
    if key.is_empty() { None } else { Some(key) }
}

/// ICAO location indicators are exactly four ASCII letters.
pub fn is_icao_code(code: &str) -> bool {
    code.len() == 4 && code.chars().all(|c| c.is_ascii_alphabetic())
}
