use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::collections::HashMap;
use tracing::debug;

use crate::conditions::{
    FlowTarget, FlowType, LevelLogic, Logic, NewAircraftCondition, NewFlowCondition,
    NewLevelCondition, NewOperationalCondition, NewTimeCondition, normalize_clock,
    parse_flight_level,
};
use crate::entities_repo::EntityResolver;
use crate::schema::{
    aircraft_conditions, flow_conditions, level_conditions, operational_conditions,
    time_conditions,
};

type FlowKey = (FlowType, Logic, Option<i32>, Option<i32>, Option<i32>);

/// Get-or-create access to the condition palette.
///
/// Each palette row is identified by its full natural key, nullable members
/// included, so the same condition text always resolves to the same id.
#[derive(Debug, Default)]
pub struct ConditionPalette {
    levels: HashMap<(LevelLogic, i32, Option<i32>), i32>,
    times: HashMap<(String, String, String), i32>,
    flows: HashMap<FlowKey, i32>,
    aircraft: HashMap<(String, Logic), i32>,
    operational: HashMap<(String, Logic), i32>,
}

impl ConditionPalette {
    pub fn new() -> Self {
        Self::default()
    }

    /// `BETWEEN` needs both levels; the other logics only read `level_1`.
    /// Returns `None` when a required level does not parse.
    pub fn resolve_level(
        &mut self,
        conn: &mut SqliteConnection,
        logic: LevelLogic,
        level_1: &str,
        level_2: Option<&str>,
    ) -> QueryResult<Option<i32>> {
        let Some(lower) = parse_flight_level(level_1) else {
            debug!("Dropping level condition with unparseable level {level_1:?}");
            return Ok(None);
        };
        let upper = match logic {
            LevelLogic::Between => match level_2.and_then(parse_flight_level) {
                Some(upper) => Some(upper),
                None => {
                    debug!("Dropping BETWEEN condition without a valid upper level");
                    return Ok(None);
                }
            },
            LevelLogic::AtOrAbove | LevelLogic::AtOrBelow => None,
        };

        let key = (logic, lower, upper);
        if let Some(id) = self.levels.get(&key) {
            return Ok(Some(*id));
        }

        diesel::insert_into(level_conditions::table)
            .values(&NewLevelCondition {
                logic: logic.as_str(),
                level_1: lower,
                level_2: upper,
            })
            .on_conflict_do_nothing()
            .execute(conn)?;

        let id = level_conditions::table
            .filter(level_conditions::logic.eq(logic.as_str()))
            .filter(level_conditions::level_1.eq(lower))
            .filter(level_conditions::level_2.is(upper))
            .select(level_conditions::condition_id)
            .first::<i32>(conn)?;

        self.levels.insert(key, id);
        Ok(Some(id))
    }

    pub fn resolve_time(
        &mut self,
        conn: &mut SqliteConnection,
        days: &str,
        start: &str,
        end: &str,
    ) -> QueryResult<Option<i32>> {
        let days = days.trim().to_ascii_uppercase();
        let (Some(start), Some(end)) = (normalize_clock(start), normalize_clock(end)) else {
            return Ok(None);
        };
        if days.is_empty() {
            return Ok(None);
        }

        let key = (days, start, end);
        if let Some(id) = self.times.get(&key) {
            return Ok(Some(*id));
        }

        let (days, start, end) = &key;
        diesel::insert_into(time_conditions::table)
            .values(&NewTimeCondition {
                days,
                time_start: start,
                time_end: end,
            })
            .on_conflict_do_nothing()
            .execute(conn)?;

        let id = time_conditions::table
            .filter(time_conditions::days.eq(days))
            .filter(time_conditions::time_start.eq(start))
            .filter(time_conditions::time_end.eq(end))
            .select(time_conditions::condition_id)
            .first::<i32>(conn)?;

        self.times.insert(key, id);
        Ok(Some(id))
    }

    /// Resolves the identifier to an aerodrome, area or point depending on its
    /// shape, then gets or creates the flow row referencing it.
    pub fn resolve_flow(
        &mut self,
        conn: &mut SqliteConnection,
        entities: &mut EntityResolver,
        flow_type: FlowType,
        logic: Logic,
        identifier: &str,
    ) -> QueryResult<Option<i32>> {
        let identifier = identifier.trim().to_ascii_uppercase();
        if identifier.is_empty() {
            return Ok(None);
        }

        let (aerodrome_id, area_id, point_id) = match FlowTarget::classify(&identifier) {
            FlowTarget::Aerodrome => (entities.resolve_aerodrome(conn, &identifier)?, None, None),
            FlowTarget::Area => (None, entities.resolve_area(conn, &identifier)?, None),
            FlowTarget::Point => (None, None, entities.resolve_point(conn, &identifier)?),
        };
        if aerodrome_id.is_none() && area_id.is_none() && point_id.is_none() {
            return Ok(None);
        }

        let key = (flow_type, logic, aerodrome_id, area_id, point_id);
        if let Some(id) = self.flows.get(&key) {
            return Ok(Some(*id));
        }

        diesel::insert_into(flow_conditions::table)
            .values(&NewFlowCondition {
                flow_type: flow_type.as_str(),
                logic: logic.as_str(),
                aerodrome_id,
                area_id,
                point_id,
            })
            .on_conflict_do_nothing()
            .execute(conn)?;

        let id = flow_conditions::table
            .filter(flow_conditions::flow_type.eq(flow_type.as_str()))
            .filter(flow_conditions::logic.eq(logic.as_str()))
            .filter(flow_conditions::aerodrome_id.is(aerodrome_id))
            .filter(flow_conditions::area_id.is(area_id))
            .filter(flow_conditions::point_id.is(point_id))
            .select(flow_conditions::condition_id)
            .first::<i32>(conn)?;

        self.flows.insert(key, id);
        Ok(Some(id))
    }

    pub fn resolve_aircraft(
        &mut self,
        conn: &mut SqliteConnection,
        logic: Logic,
        aircraft_type: &str,
    ) -> QueryResult<Option<i32>> {
        let aircraft_type = aircraft_type.trim().to_ascii_uppercase();
        if aircraft_type.is_empty() {
            return Ok(None);
        }

        let key = (aircraft_type, logic);
        if let Some(id) = self.aircraft.get(&key) {
            return Ok(Some(*id));
        }

        diesel::insert_into(aircraft_conditions::table)
            .values(&NewAircraftCondition {
                aircraft_type: &key.0,
                logic: logic.as_str(),
            })
            .on_conflict_do_nothing()
            .execute(conn)?;

        let id = aircraft_conditions::table
            .filter(aircraft_conditions::aircraft_type.eq(&key.0))
            .filter(aircraft_conditions::logic.eq(logic.as_str()))
            .select(aircraft_conditions::condition_id)
            .first::<i32>(conn)?;

        self.aircraft.insert(key, id);
        Ok(Some(id))
    }

    pub fn resolve_operational(
        &mut self,
        conn: &mut SqliteConnection,
        logic: Logic,
        condition_code: &str,
    ) -> QueryResult<Option<i32>> {
        let condition_code = condition_code.trim().to_ascii_uppercase();
        if condition_code.is_empty() {
            return Ok(None);
        }

        let key = (condition_code, logic);
        if let Some(id) = self.operational.get(&key) {
            return Ok(Some(*id));
        }

        diesel::insert_into(operational_conditions::table)
            .values(&NewOperationalCondition {
                condition_code: &key.0,
                logic: logic.as_str(),
            })
            .on_conflict_do_nothing()
            .execute(conn)?;

        let id = operational_conditions::table
            .filter(operational_conditions::condition_code.eq(&key.0))
            .filter(operational_conditions::logic.eq(logic.as_str()))
            .select(operational_conditions::condition_id)
            .first::<i32>(conn)?;

        self.operational.insert(key, id);
        Ok(Some(id))
    }

    pub fn clear_caches(&mut self) {
        self.levels.clear();
        self.times.clear();
        self.flows.clear();
        self.aircraft.clear();
        self.operational.clear();
    }
}
