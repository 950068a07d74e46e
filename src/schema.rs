// Table definitions for the compiled RAD rule store.
// Kept in sync with migrations/2025-11-01-000000_create_rad_schema/up.sql.

diesel::table! {
    #[sql_name = "Points"]
    points (point_id) {
        point_id -> Integer,
        identifier -> Text,
    }
}

diesel::table! {
    #[sql_name = "Aerodromes"]
    aerodromes (aerodrome_id) {
        aerodrome_id -> Integer,
        icao_code -> Text,
    }
}

diesel::table! {
    #[sql_name = "Areas"]
    areas (area_id) {
        area_id -> Integer,
        area_name -> Text,
    }
}

diesel::table! {
    #[sql_name = "Area_Aerodromes"]
    area_aerodromes (area_id, aerodrome_id) {
        area_id -> Integer,
        aerodrome_id -> Integer,
    }
}

diesel::table! {
    #[sql_name = "AtsRoutes"]
    ats_routes (route_id) {
        route_id -> Integer,
        identifier -> Text,
    }
}

diesel::table! {
    #[sql_name = "Procedures"]
    procedures (procedure_id) {
        procedure_id -> Integer,
        name -> Text,
        kind -> Text,
        aerodrome_id -> Integer,
        point_id -> Integer,
    }
}

diesel::table! {
    #[sql_name = "LevelConditions"]
    level_conditions (condition_id) {
        condition_id -> Integer,
        logic -> Text,
        level_1 -> Integer,
        level_2 -> Nullable<Integer>,
    }
}

diesel::table! {
    #[sql_name = "TimeConditions"]
    time_conditions (condition_id) {
        condition_id -> Integer,
        days -> Text,
        time_start -> Text,
        time_end -> Text,
    }
}

diesel::table! {
    #[sql_name = "FlowConditions"]
    flow_conditions (condition_id) {
        condition_id -> Integer,
        flow_type -> Text,
        logic -> Text,
        aerodrome_id -> Nullable<Integer>,
        area_id -> Nullable<Integer>,
        point_id -> Nullable<Integer>,
    }
}

diesel::table! {
    #[sql_name = "AircraftConditions"]
    aircraft_conditions (condition_id) {
        condition_id -> Integer,
        aircraft_type -> Text,
        logic -> Text,
    }
}

diesel::table! {
    #[sql_name = "OperationalConditions"]
    operational_conditions (condition_id) {
        condition_id -> Integer,
        condition_code -> Text,
        logic -> Text,
    }
}

diesel::table! {
    #[sql_name = "LevelCappingRules"]
    level_capping_rules (rule_id) {
        rule_id -> Integer,
        rule_identifier -> Text,
        adep_aerodrome_id -> Nullable<Integer>,
        adep_area_id -> Nullable<Integer>,
        ades_aerodrome_id -> Nullable<Integer>,
        ades_area_id -> Nullable<Integer>,
        max_flight_level -> Integer,
        description -> Nullable<Text>,
    }
}

diesel::table! {
    #[sql_name = "EnrouteStructuralRules"]
    enroute_structural_rules (rule_id) {
        rule_id -> Integer,
        rule_identifier -> Text,
        ats_route_id -> Nullable<Integer>,
        from_point_id -> Nullable<Integer>,
        to_point_id -> Nullable<Integer>,
        point_id -> Nullable<Integer>,
        availability -> Text,
        description -> Nullable<Text>,
    }
}

diesel::table! {
    #[sql_name = "FuaRules"]
    fua_rules (rule_id) {
        rule_id -> Integer,
        rule_identifier -> Text,
        airspace_name -> Text,
        default_lower_fl -> Nullable<Integer>,
        default_upper_fl -> Nullable<Integer>,
        description -> Nullable<Text>,
    }
}

diesel::table! {
    #[sql_name = "AerodromeConnectivityRules"]
    aerodrome_connectivity_rules (rule_id) {
        rule_id -> Integer,
        rule_identifier -> Text,
        aerodrome_id -> Integer,
        direction -> Text,
        transition_point_id -> Nullable<Integer>,
        procedure_id -> Nullable<Integer>,
        procedure_name -> Nullable<Text>,
    }
}

diesel::table! {
    #[sql_name = "AerodromeConditionRules"]
    aerodrome_condition_rules (rule_id) {
        rule_id -> Integer,
        rule_identifier -> Text,
        aerodrome_id -> Nullable<Integer>,
        area_id -> Nullable<Integer>,
        applicability -> Nullable<Text>,
        condition_type -> Text,
        value -> Nullable<Text>,
        description -> Nullable<Text>,
    }
}

diesel::table! {
    #[sql_name = "EnrouteDctRules"]
    enroute_dct_rules (rule_id) {
        rule_id -> Integer,
        rule_identifier -> Text,
        from_point_id -> Integer,
        to_point_id -> Integer,
        availability -> Text,
        rule_type -> Text,
        description -> Nullable<Text>,
    }
}

diesel::table! {
    #[sql_name = "LevelCapping_Time"]
    level_capping_time (rule_id, condition_id) {
        rule_id -> Integer,
        condition_id -> Integer,
    }
}

diesel::table! {
    #[sql_name = "LevelCapping_Aircraft"]
    level_capping_aircraft (rule_id, condition_id) {
        rule_id -> Integer,
        condition_id -> Integer,
    }
}

diesel::table! {
    #[sql_name = "EnrouteStructural_Time"]
    enroute_structural_time (rule_id, condition_id) {
        rule_id -> Integer,
        condition_id -> Integer,
    }
}

diesel::table! {
    #[sql_name = "EnrouteStructural_Level"]
    enroute_structural_level (rule_id, condition_id) {
        rule_id -> Integer,
        condition_id -> Integer,
    }
}

diesel::table! {
    #[sql_name = "EnrouteStructural_Flow"]
    enroute_structural_flow (rule_id, condition_id) {
        rule_id -> Integer,
        condition_id -> Integer,
    }
}

diesel::table! {
    #[sql_name = "EnrouteStructural_Aircraft"]
    enroute_structural_aircraft (rule_id, condition_id) {
        rule_id -> Integer,
        condition_id -> Integer,
    }
}

diesel::table! {
    #[sql_name = "EnrouteStructural_Operational"]
    enroute_structural_operational (rule_id, condition_id) {
        rule_id -> Integer,
        condition_id -> Integer,
    }
}

diesel::table! {
    #[sql_name = "Fua_Flow"]
    fua_flow (rule_id, condition_id) {
        rule_id -> Integer,
        condition_id -> Integer,
    }
}

diesel::table! {
    #[sql_name = "Fua_Operational"]
    fua_operational (rule_id, condition_id) {
        rule_id -> Integer,
        condition_id -> Integer,
    }
}

diesel::table! {
    #[sql_name = "AerodromeConnectivity_Time"]
    aerodrome_connectivity_time (rule_id, condition_id) {
        rule_id -> Integer,
        condition_id -> Integer,
    }
}

diesel::table! {
    #[sql_name = "AerodromeConnectivity_Level"]
    aerodrome_connectivity_level (rule_id, condition_id) {
        rule_id -> Integer,
        condition_id -> Integer,
    }
}

diesel::table! {
    #[sql_name = "AerodromeConnectivity_Flow"]
    aerodrome_connectivity_flow (rule_id, condition_id) {
        rule_id -> Integer,
        condition_id -> Integer,
    }
}

diesel::table! {
    #[sql_name = "AerodromeConnectivity_Operational"]
    aerodrome_connectivity_operational (rule_id, condition_id) {
        rule_id -> Integer,
        condition_id -> Integer,
    }
}

diesel::table! {
    #[sql_name = "AerodromeCondition_Level"]
    aerodrome_condition_level (rule_id, condition_id) {
        rule_id -> Integer,
        condition_id -> Integer,
    }
}

diesel::table! {
    #[sql_name = "EnrouteDct_Time"]
    enroute_dct_time (rule_id, condition_id) {
        rule_id -> Integer,
        condition_id -> Integer,
    }
}

diesel::table! {
    #[sql_name = "EnrouteDct_Level"]
    enroute_dct_level (rule_id, condition_id) {
        rule_id -> Integer,
        condition_id -> Integer,
    }
}

diesel::table! {
    #[sql_name = "EnrouteDct_Flow"]
    enroute_dct_flow (rule_id, condition_id) {
        rule_id -> Integer,
        condition_id -> Integer,
    }
}

diesel::table! {
    #[sql_name = "EnrouteDct_Aircraft"]
    enroute_dct_aircraft (rule_id, condition_id) {
        rule_id -> Integer,
        condition_id -> Integer,
    }
}

diesel::table! {
    #[sql_name = "EnrouteDct_Operational"]
    enroute_dct_operational (rule_id, condition_id) {
        rule_id -> Integer,
        condition_id -> Integer,
    }
}

diesel::joinable!(area_aerodromes -> aerodromes (aerodrome_id));
diesel::joinable!(area_aerodromes -> areas (area_id));
diesel::joinable!(procedures -> aerodromes (aerodrome_id));
diesel::joinable!(procedures -> points (point_id));
diesel::joinable!(aerodrome_connectivity_rules -> aerodromes (aerodrome_id));
diesel::joinable!(aerodrome_connectivity_rules -> procedures (procedure_id));
diesel::joinable!(aerodrome_condition_rules -> aerodromes (aerodrome_id));
diesel::joinable!(aerodrome_condition_rules -> areas (area_id));
diesel::joinable!(enroute_structural_rules -> ats_routes (ats_route_id));
diesel::joinable!(level_capping_time -> level_capping_rules (rule_id));
diesel::joinable!(level_capping_time -> time_conditions (condition_id));
diesel::joinable!(level_capping_aircraft -> level_capping_rules (rule_id));
diesel::joinable!(level_capping_aircraft -> aircraft_conditions (condition_id));
diesel::joinable!(enroute_structural_time -> enroute_structural_rules (rule_id));
diesel::joinable!(enroute_structural_time -> time_conditions (condition_id));
diesel::joinable!(enroute_structural_level -> enroute_structural_rules (rule_id));
diesel::joinable!(enroute_structural_level -> level_conditions (condition_id));
diesel::joinable!(enroute_structural_flow -> enroute_structural_rules (rule_id));
diesel::joinable!(enroute_structural_flow -> flow_conditions (condition_id));
diesel::joinable!(enroute_structural_aircraft -> enroute_structural_rules (rule_id));
diesel::joinable!(enroute_structural_aircraft -> aircraft_conditions (condition_id));
diesel::joinable!(enroute_structural_operational -> enroute_structural_rules (rule_id));
diesel::joinable!(enroute_structural_operational -> operational_conditions (condition_id));
diesel::joinable!(fua_flow -> fua_rules (rule_id));
diesel::joinable!(fua_flow -> flow_conditions (condition_id));
diesel::joinable!(fua_operational -> fua_rules (rule_id));
diesel::joinable!(fua_operational -> operational_conditions (condition_id));
diesel::joinable!(aerodrome_connectivity_time -> aerodrome_connectivity_rules (rule_id));
diesel::joinable!(aerodrome_connectivity_time -> time_conditions (condition_id));
diesel::joinable!(aerodrome_connectivity_level -> aerodrome_connectivity_rules (rule_id));
diesel::joinable!(aerodrome_connectivity_level -> level_conditions (condition_id));
diesel::joinable!(aerodrome_connectivity_flow -> aerodrome_connectivity_rules (rule_id));
diesel::joinable!(aerodrome_connectivity_flow -> flow_conditions (condition_id));
diesel::joinable!(aerodrome_connectivity_operational -> aerodrome_connectivity_rules (rule_id));
diesel::joinable!(aerodrome_connectivity_operational -> operational_conditions (condition_id));
diesel::joinable!(aerodrome_condition_level -> aerodrome_condition_rules (rule_id));
diesel::joinable!(aerodrome_condition_level -> level_conditions (condition_id));
diesel::joinable!(enroute_dct_time -> enroute_dct_rules (rule_id));
diesel::joinable!(enroute_dct_time -> time_conditions (condition_id));
diesel::joinable!(enroute_dct_level -> enroute_dct_rules (rule_id));
diesel::joinable!(enroute_dct_level -> level_conditions (condition_id));
diesel::joinable!(enroute_dct_flow -> enroute_dct_rules (rule_id));
diesel::joinable!(enroute_dct_flow -> flow_conditions (condition_id));
diesel::joinable!(enroute_dct_aircraft -> enroute_dct_rules (rule_id));
diesel::joinable!(enroute_dct_aircraft -> aircraft_conditions (condition_id));
diesel::joinable!(enroute_dct_operational -> enroute_dct_rules (rule_id));
diesel::joinable!(enroute_dct_operational -> operational_conditions (condition_id));

diesel::allow_tables_to_appear_in_same_query!(
    points,
    aerodromes,
    areas,
    area_aerodromes,
    ats_routes,
    procedures,
    level_conditions,
    time_conditions,
    flow_conditions,
    aircraft_conditions,
    operational_conditions,
    level_capping_rules,
    enroute_structural_rules,
    fua_rules,
    aerodrome_connectivity_rules,
    aerodrome_condition_rules,
    enroute_dct_rules,
    level_capping_time,
    level_capping_aircraft,
    enroute_structural_time,
    enroute_structural_level,
    enroute_structural_flow,
    enroute_structural_aircraft,
    enroute_structural_operational,
    fua_flow,
    fua_operational,
    aerodrome_connectivity_time,
    aerodrome_connectivity_level,
    aerodrome_connectivity_flow,
    aerodrome_connectivity_operational,
    aerodrome_condition_level,
    enroute_dct_time,
    enroute_dct_level,
    enroute_dct_flow,
    enroute_dct_aircraft,
    enroute_dct_operational,
);
