use diesel::prelude::*;
use std::fmt;

use crate::schema::{
    aircraft_conditions, flow_conditions, level_conditions, operational_conditions,
    time_conditions,
};

/// The five kinds of applicability condition a rule can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionCategory {
    Level,
    Time,
    Flow,
    Aircraft,
    Operational,
}

impl ConditionCategory {
    pub const ALL: [ConditionCategory; 5] = [
        ConditionCategory::Level,
        ConditionCategory::Time,
        ConditionCategory::Flow,
        ConditionCategory::Aircraft,
        ConditionCategory::Operational,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionCategory::Level => "Level",
            ConditionCategory::Time => "Time",
            ConditionCategory::Flow => "Flow",
            ConditionCategory::Aircraft => "Aircraft",
            ConditionCategory::Operational => "Operational",
        }
    }
}

impl fmt::Display for ConditionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LevelLogic {
    Between,
    AtOrAbove,
    AtOrBelow,
}

impl LevelLogic {
    pub fn as_str(&self) -> &'static str {
        match self {
            LevelLogic::Between => "BETWEEN",
            LevelLogic::AtOrAbove => "AT_OR_ABV",
            LevelLogic::AtOrBelow => "AT_OR_BLW",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowType {
    Adep,
    Ades,
    Via,
}

impl FlowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowType::Adep => "ADEP",
            FlowType::Ades => "ADES",
            FlowType::Via => "VIA",
        }
    }
}

/// Inclusion or exclusion, as written in front of a flow, aircraft or
/// operational filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Logic {
    Only,
    Exc,
}

impl Logic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Logic::Only => "ONLY",
            Logic::Exc => "EXC",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_uppercase().as_str() {
            "ONLY" => Some(Logic::Only),
            "EXC" => Some(Logic::Exc),
            _ => None,
        }
    }
}

/// Where a flow condition points to, decided from the shape of its identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowTarget {
    Aerodrome,
    Area,
    Point,
}

impl FlowTarget {
    pub fn classify(identifier: &str) -> Self {
        if identifier.len() == 4 && identifier.chars().all(|c| c.is_ascii_alphabetic()) {
            FlowTarget::Aerodrome
        } else if identifier.contains("_AD") || identifier.contains("_GROUP") {
            FlowTarget::Area
        } else {
            FlowTarget::Point
        }
    }
}

/// Condition ids produced by compiling one condition string, bucketed by
/// category in the order they were recognised. Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedConditions {
    pub level: Vec<i32>,
    pub time: Vec<i32>,
    pub flow: Vec<i32>,
    pub aircraft: Vec<i32>,
    pub operational: Vec<i32>,
}

impl ParsedConditions {
    pub fn push(&mut self, category: ConditionCategory, condition_id: i32) {
        match category {
            ConditionCategory::Level => self.level.push(condition_id),
            ConditionCategory::Time => self.time.push(condition_id),
            ConditionCategory::Flow => self.flow.push(condition_id),
            ConditionCategory::Aircraft => self.aircraft.push(condition_id),
            ConditionCategory::Operational => self.operational.push(condition_id),
        }
    }

    pub fn ids(&self, category: ConditionCategory) -> &[i32] {
        match category {
            ConditionCategory::Level => &self.level,
            ConditionCategory::Time => &self.time,
            ConditionCategory::Flow => &self.flow,
            ConditionCategory::Aircraft => &self.aircraft,
            ConditionCategory::Operational => &self.operational,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn total(&self) -> usize {
        ConditionCategory::ALL
            .iter()
            .map(|category| self.ids(*category).len())
            .sum()
    }
}

#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = level_conditions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LevelCondition {
    pub condition_id: i32,
    pub logic: String,
    pub level_1: i32,
    pub level_2: Option<i32>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = level_conditions)]
pub struct NewLevelCondition<'a> {
    pub logic: &'a str,
    pub level_1: i32,
    pub level_2: Option<i32>,
}

#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = time_conditions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TimeCondition {
    pub condition_id: i32,
    pub days: String,
    pub time_start: String,
    pub time_end: String,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = time_conditions)]
pub struct NewTimeCondition<'a> {
    pub days: &'a str,
    pub time_start: &'a str,
    pub time_end: &'a str,
}

#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = flow_conditions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FlowCondition {
    pub condition_id: i32,
    pub flow_type: String,
    pub logic: String,
    pub aerodrome_id: Option<i32>,
    pub area_id: Option<i32>,
    pub point_id: Option<i32>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = flow_conditions)]
pub struct NewFlowCondition<'a> {
    pub flow_type: &'a str,
    pub logic: &'a str,
    pub aerodrome_id: Option<i32>,
    pub area_id: Option<i32>,
    pub point_id: Option<i32>,
}

#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = aircraft_conditions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AircraftCondition {
    pub condition_id: i32,
    pub aircraft_type: String,
    pub logic: String,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = aircraft_conditions)]
pub struct NewAircraftCondition<'a> {
    pub aircraft_type: &'a str,
    pub logic: &'a str,
}

#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = operational_conditions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OperationalCondition {
    pub condition_id: i32,
    pub condition_code: String,
    pub logic: String,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = operational_conditions)]
pub struct NewOperationalCondition<'a> {
    pub condition_code: &'a str,
    pub logic: &'a str,
}

/// Parses `FL245`, `fl 245` or `245` into 245.
pub fn parse_flight_level(text: &str) -> Option<i32> {
    let trimmed = text.trim();
    let digits = match trimmed.get(..2) {
        Some(prefix) if prefix.eq_ignore_ascii_case("FL") => &trimmed[2..],
        _ => trimmed,
    };
    digits.trim().parse::<i32>().ok()
}

/// Formats a clock value as `HH:MM`. Three or four digit values are zero
/// padded and split; anything else is kept as written.
pub fn normalize_clock(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if (3..=4).contains(&trimmed.len()) && trimmed.chars().all(|c| c.is_ascii_digit()) {
        let padded = format!("{trimmed:0>4}");
        return Some(format!("{}:{}", &padded[..2], &padded[2..]));
    }

    Some(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flight_level() {
        assert_eq!(parse_flight_level("FL245"), Some(245));
        assert_eq!(parse_flight_level(" fl095 "), Some(95));
        assert_eq!(parse_flight_level("330"), Some(330));
        assert_eq!(parse_flight_level("FLXYZ"), None);
        assert_eq!(parse_flight_level("UNL"), None);
        assert_eq!(parse_flight_level(""), None);
    }

    #[test]
    fn test_normalize_clock() {
        assert_eq!(normalize_clock("0600").as_deref(), Some("06:00"));
        assert_eq!(normalize_clock("2359").as_deref(), Some("23:59"));
        assert_eq!(normalize_clock("630").as_deref(), Some("06:30"));
        assert_eq!(normalize_clock("06:00").as_deref(), Some("06:00"));
        assert_eq!(normalize_clock("  "), None);
    }

    #[test]
    fn test_flow_target_classification() {
        assert_eq!(FlowTarget::classify("EHAM"), FlowTarget::Aerodrome);
        assert_eq!(FlowTarget::classify("EH_AD"), FlowTarget::Area);
        assert_eq!(FlowTarget::classify("LF_PAR_GROUP"), FlowTarget::Area);
        assert_eq!(FlowTarget::classify("KOKSY"), FlowTarget::Point);
        assert_eq!(FlowTarget::classify("EH12"), FlowTarget::Point);
    }

    #[test]
    fn test_logic_parse() {
        assert_eq!(Logic::parse("only"), Some(Logic::Only));
        assert_eq!(Logic::parse(" EXC "), Some(Logic::Exc));
        assert_eq!(Logic::parse("NOT"), None);
    }

    #[test]
    fn test_parsed_conditions_buckets() {
        let mut parsed = ParsedConditions::default();
        assert!(parsed.is_empty());

        parsed.push(ConditionCategory::Time, 3);
        parsed.push(ConditionCategory::Time, 3);
        parsed.push(ConditionCategory::Flow, 1);

        assert_eq!(parsed.ids(ConditionCategory::Time), &[3, 3]);
        assert_eq!(parsed.ids(ConditionCategory::Flow), &[1]);
        assert_eq!(parsed.total(), 3);
        assert!(!parsed.is_empty());
    }
}
