mod common;

use common::TestDatabase;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use std::fs;

use rad_compiler::compile;
use rad_compiler::conditions::{FlowCondition, LevelCondition, TimeCondition};
use rad_compiler::entities::{Procedure, UNKNOWN_POINT};
use rad_compiler::schema::{
    aerodrome_condition_level, aerodrome_condition_rules, aerodrome_connectivity_rules,
    aerodromes, enroute_dct_flow, enroute_dct_level, enroute_dct_rules, enroute_dct_time,
    flow_conditions, level_capping_rules, level_conditions, points, procedures, time_conditions,
};

const TABLES: &[&str] = &[
    "Points",
    "Aerodromes",
    "Areas",
    "Area_Aerodromes",
    "AtsRoutes",
    "Procedures",
    "LevelConditions",
    "TimeConditions",
    "FlowConditions",
    "AircraftConditions",
    "OperationalConditions",
    "LevelCappingRules",
    "LevelCapping_Time",
    "LevelCapping_Aircraft",
    "EnrouteStructuralRules",
    "EnrouteStructural_Time",
    "EnrouteStructural_Flow",
    "FuaRules",
    "Fua_Flow",
    "Fua_Operational",
    "AerodromeConnectivityRules",
    "AerodromeConnectivity_Time",
    "AerodromeConnectivity_Level",
    "AerodromeConnectivity_Flow",
    "AerodromeConditionRules",
    "AerodromeCondition_Level",
    "EnrouteDctRules",
    "EnrouteDct_Time",
    "EnrouteDct_Level",
    "EnrouteDct_Flow",
];

fn write_all_annexes(test_db: &TestDatabase) {
    test_db.write_annex(
        "Annex_1.csv",
        &[
            "ID,Definition",
            "EH_AD,\"EHAM, EHRD, EHEH\"",
            "LF_PAR_GROUP,LFPG LFPO",
        ],
    );
    test_db.write_annex(
        "Annex_2A.csv",
        &[
            "ID,From (ADEP),To (ADES),Flight Level Capping,Condition,Time Applicability,Remarks",
            "EH2A001,EHAM,LF_PAR_GROUP,FL245,EXC ACFT TYPE C525 AT OR ABV FL300,MON-FRI 0600-2200,Capped",
        ],
    );
    test_db.write_annex(
        "Annex_2B.csv",
        &[
            "ID,Airway,From,To,Point or Airspace,Utilization,Time Applicability,Remarks",
            "EH2B001,UL620,KOKSY,REMBA,,NOT AVBL for traffic ONLY ADES EDDF,H24,",
            "EH2B002,,,,SUGOL,COMPULSORY for traffic ONLY ADEP EH_AD,0600-2200,",
        ],
    );
    test_db.write_annex(
        "Annex_2C.csv",
        &[
            "ID,AIP RSA ID,Lower Vert. Limit (FL),Upper Vert. Limit (FL),Traffic Flow Rule applied during times and within vertical limits allocated at EAUP/EUUP,Remarks",
            "EH2C001,EHR1,GND,245,EXC VIA KOKSY DLY 0600-2200,",
        ],
    );
    test_db.write_annex(
        "Annex_3A_DEP.csv",
        &[
            "DEP ID,DEP AD,Last PT SID / SID ID,DCT DEP PT,DEP Time Applicability,DEP FPL Options",
            "EH3A001,EHAM,ANDIK2S,,H24,AT OR BLW FL195",
            "EH3A002,INVALID,SUGOL,,H24,",
        ],
    );
    test_db.write_annex(
        "Annex_3A_ARR.csv",
        &[
            "ARR ID,ARR AD,First PT STAR / STAR ID,DCT ARR PT,ARR Time Applicability,ARR FPL Option",
            "EH3A101,EHRD,,REDFA,0600-2200,ONLY ADEP EHAM",
        ],
    );
    test_db.write_annex(
        "Annex_3A_Conditions.csv",
        &[
            "RAD Application ID,NAS / FAB,Condition,Explanation,Remarks",
            "EH3A501,EH_AD,DCT limit,MAX DCT 50NM BTN FL095 AND FL245 EXC OAT,",
        ],
    );
    test_db.write_annex(
        "Annex_3B_DCT.csv",
        &[
            "ID,From,To,Lower Vert. Limit (FL),Upper Vert. Limit (FL),Available or Not (Y/N),Utilization,Time Availability,Remarks",
            "EH3B001,KOKSY,RENEQ,245,,Yes,ONLY ADES EDDV,0600-2200,",
            "EH3B002,,REMBA,,,No,,,",
        ],
    );
    test_db.write_annex(
        "Annex_3B_FRA_LIM.csv",
        &[
            "RAD Application ID,Airspace,DCT Horiz. Limit,Remarks",
            "EH3B501,EH_FRA,200NM,",
        ],
    );
}

fn table_counts(test_db: &TestDatabase) -> Vec<i64> {
    TABLES.iter().map(|table| test_db.count(table)).collect()
}

#[test]
fn test_full_compile_populates_every_family() {
    let test_db = TestDatabase::new().expect("Failed to create test database");
    write_all_annexes(&test_db);

    let report = compile(&test_db.database_path(), test_db.source_dir()).unwrap();
    assert_eq!(report.stages.len(), 7);
    assert!(report.stages.iter().all(|stage| !stage.source_missing));

    assert_eq!(test_db.count("Areas"), 3);
    assert_eq!(test_db.count("Area_Aerodromes"), 5);
    assert_eq!(test_db.count("LevelCappingRules"), 1);
    assert_eq!(test_db.count("EnrouteStructuralRules"), 2);
    assert_eq!(test_db.count("FuaRules"), 1);
    assert_eq!(test_db.count("AerodromeConnectivityRules"), 2);
    assert_eq!(test_db.count("AerodromeConditionRules"), 2);
    assert_eq!(test_db.count("EnrouteDctRules"), 1);
    assert_eq!(test_db.count("AtsRoutes"), 1);

    let dct = report.stage("EnrouteDct").unwrap();
    assert_eq!(dct.rules_inserted, 2);
    assert_eq!(dct.rows_skipped, 1);
}

#[test]
fn test_categories_outside_family_are_not_linked() {
    let test_db = TestDatabase::new().expect("Failed to create test database");
    write_all_annexes(&test_db);

    let report = compile(&test_db.database_path(), test_db.source_dir()).unwrap();

    // Level capping keeps time and aircraft, drops the level token.
    assert_eq!(test_db.count("LevelCapping_Time"), 1);
    assert_eq!(test_db.count("LevelCapping_Aircraft"), 1);
    assert_eq!(report.stage("LevelCapping").unwrap().conditions_dropped, 1);

    // FUA keeps the flow, drops the time window.
    assert_eq!(test_db.count("Fua_Flow"), 1);
    assert_eq!(report.stage("Fua").unwrap().conditions_dropped, 1);

    // Aerodrome conditions keep only the level band.
    assert_eq!(test_db.count("AerodromeCondition_Level"), 1);
    assert_eq!(report.stage("AerodromeConditions").unwrap().conditions_dropped, 1);

    let mut conn = test_db.connection();
    let level_id: i32 = aerodrome_condition_level::table
        .inner_join(aerodrome_condition_rules::table)
        .filter(aerodrome_condition_rules::rule_identifier.eq("EH3A501"))
        .select(aerodrome_condition_level::condition_id)
        .first(&mut conn)
        .unwrap();
    let level = level_conditions::table
        .find(level_id)
        .select(LevelCondition::as_select())
        .first(&mut conn)
        .unwrap();
    assert_eq!(level.logic, "BETWEEN");
    assert_eq!((level.level_1, level.level_2), (95, Some(245)));
}

#[test]
fn test_dct_composite_conditions() {
    let test_db = TestDatabase::new().expect("Failed to create test database");
    write_all_annexes(&test_db);
    compile(&test_db.database_path(), test_db.source_dir()).unwrap();

    let mut conn = test_db.connection();
    let rule_id: i32 = enroute_dct_rules::table
        .filter(enroute_dct_rules::rule_identifier.eq("EH3B001"))
        .select(enroute_dct_rules::rule_id)
        .first(&mut conn)
        .unwrap();

    let availability: String = enroute_dct_rules::table
        .find(rule_id)
        .select(enroute_dct_rules::availability)
        .first(&mut conn)
        .unwrap();
    assert_eq!(availability, "AVBL");

    let level = enroute_dct_level::table
        .filter(enroute_dct_level::rule_id.eq(rule_id))
        .inner_join(level_conditions::table)
        .select(LevelCondition::as_select())
        .first(&mut conn)
        .unwrap();
    assert_eq!(level.logic, "AT_OR_ABV");
    assert_eq!(level.level_1, 245);
    assert_eq!(level.level_2, None);

    let time = enroute_dct_time::table
        .filter(enroute_dct_time::rule_id.eq(rule_id))
        .inner_join(time_conditions::table)
        .select(TimeCondition::as_select())
        .first(&mut conn)
        .unwrap();
    assert_eq!(time.days, "DLY");
    assert_eq!(time.time_start, "06:00");
    assert_eq!(time.time_end, "22:00");

    let flow = enroute_dct_flow::table
        .filter(enroute_dct_flow::rule_id.eq(rule_id))
        .inner_join(flow_conditions::table)
        .select(FlowCondition::as_select())
        .first(&mut conn)
        .unwrap();
    let eddv: i32 = aerodromes::table
        .filter(aerodromes::icao_code.eq("EDDV"))
        .select(aerodromes::aerodrome_id)
        .first(&mut conn)
        .unwrap();
    assert_eq!(flow.flow_type, "ADES");
    assert_eq!(flow.logic, "ONLY");
    assert_eq!(flow.aerodrome_id, Some(eddv));
}

#[test]
fn test_invalid_aerodrome_row_is_skipped() {
    let test_db = TestDatabase::new().expect("Failed to create test database");
    write_all_annexes(&test_db);
    let report = compile(&test_db.database_path(), test_db.source_dir()).unwrap();

    let mut conn = test_db.connection();
    let identifiers: Vec<String> = aerodrome_connectivity_rules::table
        .order(aerodrome_connectivity_rules::rule_identifier)
        .select(aerodrome_connectivity_rules::rule_identifier)
        .load(&mut conn)
        .unwrap();
    assert_eq!(identifiers, vec!["EH3A001", "EH3A101"]);
    assert_eq!(report.stage("AerodromeConnectivity").unwrap().rows_skipped, 1);

    let invalid: i64 = aerodromes::table
        .filter(aerodromes::icao_code.eq("INVALID"))
        .count()
        .get_result(&mut conn)
        .unwrap();
    assert_eq!(invalid, 0);
}

#[test]
fn test_procedure_without_point_uses_sentinel() {
    let test_db = TestDatabase::new().expect("Failed to create test database");
    write_all_annexes(&test_db);
    compile(&test_db.database_path(), test_db.source_dir()).unwrap();

    let mut conn = test_db.connection();
    let procedure = procedures::table
        .select(Procedure::as_select())
        .first(&mut conn)
        .unwrap();
    let point: String = points::table
        .find(procedure.point_id)
        .select(points::identifier)
        .first(&mut conn)
        .unwrap();

    assert_eq!(procedure.name, "ANDIK2S");
    assert_eq!(procedure.kind, "SID");
    assert_eq!(point, UNKNOWN_POINT);
}

#[test]
fn test_second_run_is_idempotent() {
    let test_db = TestDatabase::new().expect("Failed to create test database");
    write_all_annexes(&test_db);

    let first = compile(&test_db.database_path(), test_db.source_dir()).unwrap();
    let counts_after_first = table_counts(&test_db);

    let second = compile(&test_db.database_path(), test_db.source_dir()).unwrap();
    let counts_after_second = table_counts(&test_db);

    assert_eq!(counts_after_first, counts_after_second);
    assert!(first.rules_inserted() > 0);
    assert_eq!(second.rules_inserted(), 0);
    for (before, after) in first.stages.iter().zip(&second.stages) {
        assert_eq!(after.rules_existing, before.rules_inserted, "{}", after.name);
        assert_eq!(after.links_created, 0, "{}", after.name);
    }
}

#[test]
fn test_missing_sources_are_skipped() {
    let test_db = TestDatabase::new().expect("Failed to create test database");
    test_db.write_annex("Annex_1.csv", &["ID,Definition", "EH_AD,EHAM"]);
    test_db.write_annex("Annex_3A_ARR.csv", &[""]);

    let report = compile(&test_db.database_path(), test_db.source_dir()).unwrap();

    assert!(!report.stage("Areas").unwrap().source_missing);
    assert!(report.stage("LevelCapping").unwrap().source_missing);
    assert!(report.stage("AerodromeConnectivity").unwrap().source_missing);
    assert!(report.stage("EnrouteDct").unwrap().source_missing);
    assert_eq!(test_db.count("Area_Aerodromes"), 1);
}

#[test]
fn test_short_rows_read_missing_columns_as_blank() {
    let test_db = TestDatabase::new().expect("Failed to create test database");
    test_db.write_annex(
        "Annex_3B_DCT.csv",
        &[
            "ID,From,To,Lower Vert. Limit (FL),Upper Vert. Limit (FL),Available or Not (Y/N),Utilization,Time Availability,Remarks,Responsible Unit",
            "EH3B001,KOKSY,RENEQ",
        ],
    );

    let report = compile(&test_db.database_path(), test_db.source_dir()).unwrap();

    let dct = report.stage("EnrouteDct").unwrap();
    assert_eq!(dct.rules_inserted, 1);
    assert_eq!(dct.links_created, 0);

    let mut conn = test_db.connection();
    let availability: String = enroute_dct_rules::table
        .filter(enroute_dct_rules::rule_identifier.eq("EH3B001"))
        .select(enroute_dct_rules::availability)
        .first(&mut conn)
        .unwrap();
    assert_eq!(availability, "NOT AVBL");
}

#[test]
fn test_non_utf8_bytes_do_not_abort_the_run() {
    let test_db = TestDatabase::new().expect("Failed to create test database");
    write_all_annexes(&test_db);

    let mut annex_2a = b"ID,From (ADEP),To (ADES),Flight Level Capping,Condition,Time Applicability,Remarks\n"
        .to_vec();
    annex_2a.extend_from_slice(b"EH2A001,EHAM,EHRD,FL245,,H24,Caf\xe9 traffic\n");
    fs::write(test_db.source_dir().join("Annex_2A.csv"), annex_2a).unwrap();

    compile(&test_db.database_path(), test_db.source_dir()).unwrap();

    let mut conn = test_db.connection();
    let description: Option<String> = level_capping_rules::table
        .filter(level_capping_rules::rule_identifier.eq("EH2A001"))
        .select(level_capping_rules::description)
        .first(&mut conn)
        .unwrap();
    assert_eq!(description.as_deref(), Some("Caf\u{fffd} traffic"));
    assert_eq!(test_db.count("EnrouteDctRules"), 1);
}

#[test]
fn test_failed_stage_rolls_back_and_propagates() {
    let test_db = TestDatabase::new().expect("Failed to create test database");
    test_db.write_annex("Annex_1.csv", &["ID,Definition", "EH_AD,EHAM"]);
    test_db.write_annex(
        "Annex_2A.csv",
        &[
            "ID,From (ADEP),To (ADES),Flight Level Capping,Condition,Time Applicability,Remarks",
            "EH2A001,EDDF,EHRD,FL245,,H24,",
        ],
    );
    test_db.write_annex(
        "Annex_3B_DCT.csv",
        &[
            "ID,From,To,Lower Vert. Limit (FL),Upper Vert. Limit (FL),Available or Not (Y/N),Utilization,Time Availability,Remarks",
            "EH3B001,KOKSY,RENEQ,,,Yes,,,",
        ],
    );

    let mut conn = test_db.connection();
    conn.batch_execute(
        "CREATE TRIGGER reject_level_capping BEFORE INSERT ON LevelCappingRules \
         BEGIN SELECT RAISE(ABORT, 'level capping rejected'); END;",
    )
    .unwrap();

    let err = compile(&test_db.database_path(), test_db.source_dir()).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("Stage LevelCapping failed"), "{message}");
    assert!(message.contains("level capping rejected"), "{message}");

    // The earlier stage stays committed; the failed one leaves nothing behind.
    assert_eq!(test_db.count("Area_Aerodromes"), 1);
    assert_eq!(test_db.count("LevelCappingRules"), 0);
    let eddf: i64 = aerodromes::table
        .filter(aerodromes::icao_code.eq("EDDF"))
        .count()
        .get_result(&mut conn)
        .unwrap();
    assert_eq!(eddf, 0);

    // Later stages never run.
    assert_eq!(test_db.count("EnrouteDctRules"), 0);
}
