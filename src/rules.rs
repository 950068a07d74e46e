use diesel::prelude::*;
use std::fmt;

use crate::conditions::ConditionCategory;
use crate::schema::{
    aerodrome_condition_rules, aerodrome_connectivity_rules, enroute_dct_rules,
    enroute_structural_rules, fua_rules, level_capping_rules,
};

/// The six rule tables. Each one accepts conditions from a fixed subset of
/// categories; anything else recognised in its condition text is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleFamily {
    LevelCapping,
    EnrouteStructural,
    Fua,
    AerodromeConnectivity,
    AerodromeCondition,
    EnrouteDct,
}

impl RuleFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleFamily::LevelCapping => "LevelCapping",
            RuleFamily::EnrouteStructural => "EnrouteStructural",
            RuleFamily::Fua => "Fua",
            RuleFamily::AerodromeConnectivity => "AerodromeConnectivity",
            RuleFamily::AerodromeCondition => "AerodromeCondition",
            RuleFamily::EnrouteDct => "EnrouteDct",
        }
    }

    pub fn allowed_categories(&self) -> &'static [ConditionCategory] {
        use ConditionCategory::*;
        match self {
            RuleFamily::LevelCapping => &[Time, Aircraft],
            RuleFamily::EnrouteStructural => &[Time, Level, Flow, Aircraft, Operational],
            RuleFamily::Fua => &[Flow, Operational],
            RuleFamily::AerodromeConnectivity => &[Time, Level, Flow, Operational],
            RuleFamily::AerodromeCondition => &[Level],
            RuleFamily::EnrouteDct => &[Time, Level, Flow, Aircraft, Operational],
        }
    }

    pub fn allows(&self, category: ConditionCategory) -> bool {
        self.allowed_categories().contains(&category)
    }

    /// Junction table name for an allowed pair, e.g. `Fua_Flow`.
    pub fn junction_table_name(&self, category: ConditionCategory) -> Option<String> {
        self.allows(category)
            .then(|| format!("{}_{}", self.as_str(), category.as_str()))
    }
}

impl fmt::Display for RuleFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    NotAvailable,
    Compulsory,
}

impl Availability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::Available => "AVBL",
            Availability::NotAvailable => "NOT AVBL",
            Availability::Compulsory => "COMPULSORY",
        }
    }

    /// Reads the availability out of an Annex 2B utilization text.
    pub fn from_utilization(text: &str) -> Self {
        let upper = text.to_uppercase();
        if upper.contains("COMPULSORY") {
            Availability::Compulsory
        } else if upper.contains("NOT AVBL") {
            Availability::NotAvailable
        } else {
            Availability::Available
        }
    }

    /// Reads an Annex 3B `Y/N` column.
    pub fn from_yes_no(text: &str) -> Self {
        match text.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" => Availability::Available,
            _ => Availability::NotAvailable,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Departure,
    Arrival,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Departure => "DEP",
            Direction::Arrival => "ARR",
        }
    }
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = level_capping_rules)]
pub struct NewLevelCappingRule {
    pub rule_identifier: String,
    pub adep_aerodrome_id: Option<i32>,
    pub adep_area_id: Option<i32>,
    pub ades_aerodrome_id: Option<i32>,
    pub ades_area_id: Option<i32>,
    pub max_flight_level: i32,
    pub description: Option<String>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = enroute_structural_rules)]
pub struct NewEnrouteStructuralRule {
    pub rule_identifier: String,
    pub ats_route_id: Option<i32>,
    pub from_point_id: Option<i32>,
    pub to_point_id: Option<i32>,
    pub point_id: Option<i32>,
    pub availability: &'static str,
    pub description: Option<String>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = fua_rules)]
pub struct NewFuaRule {
    pub rule_identifier: String,
    pub airspace_name: String,
    pub default_lower_fl: Option<i32>,
    pub default_upper_fl: Option<i32>,
    pub description: Option<String>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = aerodrome_connectivity_rules)]
pub struct NewAerodromeConnectivityRule {
    pub rule_identifier: String,
    pub aerodrome_id: i32,
    pub direction: &'static str,
    pub transition_point_id: Option<i32>,
    pub procedure_id: Option<i32>,
    pub procedure_name: Option<String>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = aerodrome_condition_rules)]
pub struct NewAerodromeConditionRule {
    pub rule_identifier: String,
    pub aerodrome_id: Option<i32>,
    pub area_id: Option<i32>,
    pub applicability: Option<String>,
    pub condition_type: String,
    pub value: Option<String>,
    pub description: Option<String>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = enroute_dct_rules)]
pub struct NewEnrouteDctRule {
    pub rule_identifier: String,
    pub from_point_id: i32,
    pub to_point_id: i32,
    pub availability: &'static str,
    pub rule_type: String,
    pub description: Option<String>,
}

/// A rule row ready to be stored, tagged with its family.
#[derive(Debug, Clone)]
pub enum NewRule {
    LevelCapping(NewLevelCappingRule),
    EnrouteStructural(NewEnrouteStructuralRule),
    Fua(NewFuaRule),
    AerodromeConnectivity(NewAerodromeConnectivityRule),
    AerodromeCondition(NewAerodromeConditionRule),
    EnrouteDct(NewEnrouteDctRule),
}

impl NewRule {
    pub fn family(&self) -> RuleFamily {
        match self {
            NewRule::LevelCapping(_) => RuleFamily::LevelCapping,
            NewRule::EnrouteStructural(_) => RuleFamily::EnrouteStructural,
            NewRule::Fua(_) => RuleFamily::Fua,
            NewRule::AerodromeConnectivity(_) => RuleFamily::AerodromeConnectivity,
            NewRule::AerodromeCondition(_) => RuleFamily::AerodromeCondition,
            NewRule::EnrouteDct(_) => RuleFamily::EnrouteDct,
        }
    }

    pub fn rule_identifier(&self) -> &str {
        match self {
            NewRule::LevelCapping(rule) => &rule.rule_identifier,
            NewRule::EnrouteStructural(rule) => &rule.rule_identifier,
            NewRule::Fua(rule) => &rule.rule_identifier,
            NewRule::AerodromeConnectivity(rule) => &rule.rule_identifier,
            NewRule::AerodromeCondition(rule) => &rule.rule_identifier,
            NewRule::EnrouteDct(rule) => &rule.rule_identifier,
        }
    }
}

/// Outcome of storing a rule. Both variants carry the id to link conditions to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleUpsert {
    Inserted(i32),
    Existing(i32),
}

impl RuleUpsert {
    pub fn rule_id(&self) -> i32 {
        match self {
            RuleUpsert::Inserted(id) | RuleUpsert::Existing(id) => *id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_categories() {
        assert!(RuleFamily::LevelCapping.allows(ConditionCategory::Time));
        assert!(!RuleFamily::LevelCapping.allows(ConditionCategory::Level));
        assert!(!RuleFamily::Fua.allows(ConditionCategory::Time));
        assert!(RuleFamily::AerodromeCondition.allows(ConditionCategory::Level));
        assert!(!RuleFamily::AerodromeConnectivity.allows(ConditionCategory::Aircraft));
        assert_eq!(RuleFamily::EnrouteDct.allowed_categories().len(), 5);
    }

    #[test]
    fn test_junction_table_names() {
        assert_eq!(
            RuleFamily::Fua
                .junction_table_name(ConditionCategory::Flow)
                .as_deref(),
            Some("Fua_Flow")
        );
        assert_eq!(
            RuleFamily::Fua.junction_table_name(ConditionCategory::Level),
            None
        );
    }

    #[test]
    fn test_availability_from_utilization() {
        assert_eq!(
            Availability::from_utilization("Compulsory for traffic to EDDF"),
            Availability::Compulsory
        );
        assert_eq!(
            Availability::from_utilization("not avbl for traffic ONLY ADES EDDM"),
            Availability::NotAvailable
        );
        assert_eq!(
            Availability::from_utilization("ONLY ADEP EHAM"),
            Availability::Available
        );
    }

    #[test]
    fn test_availability_from_yes_no() {
        assert_eq!(Availability::from_yes_no("Yes"), Availability::Available);
        assert_eq!(Availability::from_yes_no(" y "), Availability::Available);
        assert_eq!(Availability::from_yes_no("No"), Availability::NotAvailable);
        assert_eq!(Availability::from_yes_no(""), Availability::NotAvailable);
    }

    #[test]
    fn test_rule_upsert_id() {
        assert_eq!(RuleUpsert::Inserted(4).rule_id(), 4);
        assert_eq!(RuleUpsert::Existing(7).rule_id(), 7);
    }
}
