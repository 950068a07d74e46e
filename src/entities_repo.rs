use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::collections::HashMap;
use tracing::debug;

use crate::entities::{
    AreaAerodrome, NewAerodrome, NewArea, NewAtsRoute, NewPoint, NewProcedure, ProcedureKind,
    UNKNOWN_POINT, is_icao_code, natural_key,
};
use crate::schema::{aerodromes, area_aerodromes, areas, ats_routes, points, procedures};

/// Get-or-create access to the shared entities.
///
/// Every resolve first consults an in-memory cache, then inserts the natural
/// key if it is absent and selects the surrogate id back. Rows that already
/// exist in the store are therefore reused rather than duplicated.
#[derive(Debug, Default)]
pub struct EntityResolver {
    points: HashMap<String, i32>,
    aerodromes: HashMap<String, i32>,
    areas: HashMap<String, i32>,
    ats_routes: HashMap<String, i32>,
    procedures: HashMap<(String, ProcedureKind, i32), i32>,
}

impl EntityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve_point(
        &mut self,
        conn: &mut SqliteConnection,
        identifier: &str,
    ) -> QueryResult<Option<i32>> {
        match natural_key(identifier) {
            Some(key) => self.point_id(conn, key).map(Some),
            None => Ok(None),
        }
    }

    /// Id of the sentinel point used when a procedure has no resolvable fix.
    pub fn unknown_point(&mut self, conn: &mut SqliteConnection) -> QueryResult<i32> {
        self.point_id(conn, UNKNOWN_POINT)
    }

    /// Resolves an ICAO code. Anything that is not four letters after
    /// trimming is absent and never creates a row.
    pub fn resolve_aerodrome(
        &mut self,
        conn: &mut SqliteConnection,
        icao_code: &str,
    ) -> QueryResult<Option<i32>> {
        let Some(key) = natural_key(icao_code).filter(|key| is_icao_code(key)) else {
            return Ok(None);
        };
        let key = key.to_ascii_uppercase();

        if let Some(id) = self.aerodromes.get(&key) {
            return Ok(Some(*id));
        }

        diesel::insert_into(aerodromes::table)
            .values(&NewAerodrome { icao_code: &key })
            .on_conflict_do_nothing()
            .execute(conn)?;

        let id = aerodromes::table
            .filter(aerodromes::icao_code.eq(&key))
            .select(aerodromes::aerodrome_id)
            .first::<i32>(conn)?;

        self.aerodromes.insert(key, id);
        Ok(Some(id))
    }

    pub fn resolve_area(
        &mut self,
        conn: &mut SqliteConnection,
        area_name: &str,
    ) -> QueryResult<Option<i32>> {
        let Some(key) = natural_key(area_name) else {
            return Ok(None);
        };

        if let Some(id) = self.areas.get(key) {
            return Ok(Some(*id));
        }

        diesel::insert_into(areas::table)
            .values(&NewArea { area_name: key })
            .on_conflict_do_nothing()
            .execute(conn)?;

        let id = areas::table
            .filter(areas::area_name.eq(key))
            .select(areas::area_id)
            .first::<i32>(conn)?;

        self.areas.insert(key.to_string(), id);
        Ok(Some(id))
    }

    pub fn resolve_ats_route(
        &mut self,
        conn: &mut SqliteConnection,
        identifier: &str,
    ) -> QueryResult<Option<i32>> {
        let Some(key) = natural_key(identifier) else {
            return Ok(None);
        };

        if let Some(id) = self.ats_routes.get(key) {
            return Ok(Some(*id));
        }

        diesel::insert_into(ats_routes::table)
            .values(&NewAtsRoute { identifier: key })
            .on_conflict_do_nothing()
            .execute(conn)?;

        let id = ats_routes::table
            .filter(ats_routes::identifier.eq(key))
            .select(ats_routes::route_id)
            .first::<i32>(conn)?;

        self.ats_routes.insert(key.to_string(), id);
        Ok(Some(id))
    }

    /// Procedures are unique per (name, kind, aerodrome). The point is only
    /// recorded when the procedure is first created.
    pub fn resolve_procedure(
        &mut self,
        conn: &mut SqliteConnection,
        name: &str,
        kind: ProcedureKind,
        aerodrome_id: i32,
        point_id: i32,
    ) -> QueryResult<Option<i32>> {
        let Some(key) = natural_key(name) else {
            return Ok(None);
        };

        let cache_key = (key.to_string(), kind, aerodrome_id);
        if let Some(id) = self.procedures.get(&cache_key) {
            return Ok(Some(*id));
        }

        diesel::insert_into(procedures::table)
            .values(&NewProcedure {
                name: key,
                kind: kind.as_str(),
                aerodrome_id,
                point_id,
            })
            .on_conflict_do_nothing()
            .execute(conn)?;

        let id = procedures::table
            .filter(procedures::name.eq(key))
            .filter(procedures::kind.eq(kind.as_str()))
            .filter(procedures::aerodrome_id.eq(aerodrome_id))
            .select(procedures::procedure_id)
            .first::<i32>(conn)?;

        self.procedures.insert(cache_key, id);
        Ok(Some(id))
    }

    /// Records that an aerodrome belongs to an area. Returns true when the
    /// link is new.
    pub fn link_area_aerodrome(
        &mut self,
        conn: &mut SqliteConnection,
        area_id: i32,
        aerodrome_id: i32,
    ) -> QueryResult<bool> {
        let inserted = diesel::insert_into(area_aerodromes::table)
            .values(&AreaAerodrome {
                area_id,
                aerodrome_id,
            })
            .on_conflict_do_nothing()
            .execute(conn)?;
        Ok(inserted > 0)
    }

    /// Drops every cached id. Needed after a rolled-back transaction, since
    /// the cache may point at rows that no longer exist.
    pub fn clear_caches(&mut self) {
        debug!(
            "Clearing entity caches ({} points, {} aerodromes, {} areas, {} routes, {} procedures)",
            self.points.len(),
            self.aerodromes.len(),
            self.areas.len(),
            self.ats_routes.len(),
            self.procedures.len()
        );
        self.points.clear();
        self.aerodromes.clear();
        self.areas.clear();
        self.ats_routes.clear();
        self.procedures.clear();
    }

    fn point_id(&mut self, conn: &mut SqliteConnection, key: &str) -> QueryResult<i32> {
        if let Some(id) = self.points.get(key) {
            return Ok(*id);
        }

        diesel::insert_into(points::table)
            .values(&NewPoint { identifier: key })
            .on_conflict_do_nothing()
            .execute(conn)?;

        let id = points::table
            .filter(points::identifier.eq(key))
            .select(points::point_id)
            .first::<i32>(conn)?;

        self.points.insert(key.to_string(), id);
        Ok(id)
    }
}
