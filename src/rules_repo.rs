use anyhow::{Context, Result, bail};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use tracing::debug;

use crate::conditions::{ConditionCategory, ParsedConditions};
use crate::rules::{NewRule, RuleFamily, RuleUpsert};
use crate::schema::*;

/// Insert-or-ignore on `rule_identifier`, then select the id back.
macro_rules! upsert_rule_into {
    ($conn:expr, $table:ident, $row:expr) => {{
        let inserted = diesel::insert_into($table::table)
            .values($row)
            .on_conflict($table::rule_identifier)
            .do_nothing()
            .execute($conn)?;
        let rule_id = $table::table
            .filter($table::rule_identifier.eq(&$row.rule_identifier))
            .select($table::rule_id)
            .first::<i32>($conn)?;
        if inserted > 0 {
            RuleUpsert::Inserted(rule_id)
        } else {
            RuleUpsert::Existing(rule_id)
        }
    }};
}

macro_rules! link_into {
    ($conn:expr, $table:ident, $rule_id:expr, $condition_id:expr) => {
        diesel::insert_into($table::table)
            .values((
                $table::rule_id.eq($rule_id),
                $table::condition_id.eq($condition_id),
            ))
            .on_conflict_do_nothing()
            .execute($conn)?
    };
}

/// Stores the rule unless its identifier is already present. Either way the
/// stored id is returned so conditions can be linked to it.
pub fn upsert_rule(conn: &mut SqliteConnection, rule: &NewRule) -> Result<RuleUpsert> {
    insert_rule(conn, rule).with_context(|| {
        format!(
            "Failed to store {} rule {}",
            rule.family(),
            rule.rule_identifier()
        )
    })
}

fn insert_rule(conn: &mut SqliteConnection, rule: &NewRule) -> QueryResult<RuleUpsert> {
    Ok(match rule {
        NewRule::LevelCapping(row) => upsert_rule_into!(conn, level_capping_rules, row),
        NewRule::EnrouteStructural(row) => upsert_rule_into!(conn, enroute_structural_rules, row),
        NewRule::Fua(row) => upsert_rule_into!(conn, fua_rules, row),
        NewRule::AerodromeConnectivity(row) => {
            upsert_rule_into!(conn, aerodrome_connectivity_rules, row)
        }
        NewRule::AerodromeCondition(row) => {
            upsert_rule_into!(conn, aerodrome_condition_rules, row)
        }
        NewRule::EnrouteDct(row) => upsert_rule_into!(conn, enroute_dct_rules, row),
    })
}

/// Links one condition to a rule through the family's junction table.
/// Returns true when the link is new. Fails for pairs without a junction.
pub fn link_condition(
    conn: &mut SqliteConnection,
    family: RuleFamily,
    category: ConditionCategory,
    rule_id: i32,
    condition_id: i32,
) -> Result<bool> {
    use ConditionCategory as C;
    use RuleFamily as F;

    let inserted = match (family, category) {
        (F::LevelCapping, C::Time) => link_into!(conn, level_capping_time, rule_id, condition_id),
        (F::LevelCapping, C::Aircraft) => {
            link_into!(conn, level_capping_aircraft, rule_id, condition_id)
        }
        (F::EnrouteStructural, C::Time) => {
            link_into!(conn, enroute_structural_time, rule_id, condition_id)
        }
        (F::EnrouteStructural, C::Level) => {
            link_into!(conn, enroute_structural_level, rule_id, condition_id)
        }
        (F::EnrouteStructural, C::Flow) => {
            link_into!(conn, enroute_structural_flow, rule_id, condition_id)
        }
        (F::EnrouteStructural, C::Aircraft) => {
            link_into!(conn, enroute_structural_aircraft, rule_id, condition_id)
        }
        (F::EnrouteStructural, C::Operational) => {
            link_into!(conn, enroute_structural_operational, rule_id, condition_id)
        }
        (F::Fua, C::Flow) => link_into!(conn, fua_flow, rule_id, condition_id),
        (F::Fua, C::Operational) => link_into!(conn, fua_operational, rule_id, condition_id),
        (F::AerodromeConnectivity, C::Time) => {
            link_into!(conn, aerodrome_connectivity_time, rule_id, condition_id)
        }
        (F::AerodromeConnectivity, C::Level) => {
            link_into!(conn, aerodrome_connectivity_level, rule_id, condition_id)
        }
        (F::AerodromeConnectivity, C::Flow) => {
            link_into!(conn, aerodrome_connectivity_flow, rule_id, condition_id)
        }
        (F::AerodromeConnectivity, C::Operational) => {
            link_into!(conn, aerodrome_connectivity_operational, rule_id, condition_id)
        }
        (F::AerodromeCondition, C::Level) => {
            link_into!(conn, aerodrome_condition_level, rule_id, condition_id)
        }
        (F::EnrouteDct, C::Time) => link_into!(conn, enroute_dct_time, rule_id, condition_id),
        (F::EnrouteDct, C::Level) => link_into!(conn, enroute_dct_level, rule_id, condition_id),
        (F::EnrouteDct, C::Flow) => link_into!(conn, enroute_dct_flow, rule_id, condition_id),
        (F::EnrouteDct, C::Aircraft) => {
            link_into!(conn, enroute_dct_aircraft, rule_id, condition_id)
        }
        (F::EnrouteDct, C::Operational) => {
            link_into!(conn, enroute_dct_operational, rule_id, condition_id)
        }
        (family, category) => bail!("{family} rules have no {category} junction table"),
    };

    Ok(inserted > 0)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStats {
    pub linked: usize,
    pub dropped: usize,
}

/// Links every parsed condition the family accepts. Conditions from other
/// categories are counted as dropped and never stored against the rule.
pub fn link_conditions(
    conn: &mut SqliteConnection,
    family: RuleFamily,
    rule_id: i32,
    parsed: &ParsedConditions,
) -> Result<LinkStats> {
    let mut stats = LinkStats::default();

    for category in ConditionCategory::ALL {
        let ids = parsed.ids(category);
        if ids.is_empty() {
            continue;
        }

        let Some(table) = family.junction_table_name(category) else {
            debug!(
                "Dropping {} {} condition(s) not accepted by {} rule {}",
                ids.len(),
                category,
                family,
                rule_id
            );
            stats.dropped += ids.len();
            continue;
        };

        for condition_id in ids {
            let created = link_condition(conn, family, category, rule_id, *condition_id)
                .with_context(|| format!("Failed to link condition {condition_id} into {table}"))?;
            if created {
                stats.linked += 1;
            }
        }
    }

    Ok(stats)
}
