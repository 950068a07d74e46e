//! Lexer for RAD condition text.
//!
//! Condition columns mix a small vocabulary of restrictions (`BTN FL245 AND
//! FL335`, `ONLY ADEP EHAM`, `MON-FRI 0600-2200`, `EXC OAT`) with free-form
//! remarks. The scanner tries an ordered list of anchored patterns at the
//! cursor; the first one that matches produces a token and the cursor moves
//! past it. Text that matches nothing is consumed one character at a time and
//! never yields a token, which is how remarks fall out of the result.
//!
//! Tokenizing has no side effects; resolving tokens to stored conditions is
//! done by [`crate::catalog::Catalog::compile_conditions`].

use once_cell::sync::Lazy;
use regex::Regex;

use crate::conditions::{ConditionCategory, FlowType, LevelLogic, Logic};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    LevelBetween,
    LevelAbove,
    LevelBelow,
    TimeDaily,
    TimeDays,
    FlowAdep,
    FlowAdes,
    FlowAdepArea,
    FlowAdesArea,
    FlowVia,
    AircraftType,
    Operational,
    FlightType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Level {
        logic: LevelLogic,
        level_1: String,
        level_2: Option<String>,
    },
    Time {
        days: String,
        start: String,
        end: String,
    },
    Flow {
        flow_type: FlowType,
        logic: Logic,
        identifier: String,
    },
    Aircraft {
        logic: Logic,
        aircraft_type: String,
    },
    Operational {
        logic: Logic,
        code: String,
    },
}

impl Token {
    pub fn category(&self) -> ConditionCategory {
        match self {
            Token::Level { .. } => ConditionCategory::Level,
            Token::Time { .. } => ConditionCategory::Time,
            Token::Flow { .. } => ConditionCategory::Flow,
            Token::Aircraft { .. } => ConditionCategory::Aircraft,
            Token::Operational { .. } => ConditionCategory::Operational,
        }
    }
}

const DAY: &str = "(MON|TUE|WED|THU|FRI|SAT|SUN)";

// Order matters: the first pattern that matches at the cursor wins.
static GRAMMAR: Lazy<Vec<(TokenKind, Regex)>> = Lazy::new(|| {
    vec![
        (
            TokenKind::LevelBetween,
            Regex::new(r"^BTN (FL\d{3}) AND (FL\d{3})").unwrap(),
        ),
        (
            TokenKind::LevelAbove,
            Regex::new(r"^(AT OR ABV|ABV) (FL\d{3})").unwrap(),
        ),
        (
            TokenKind::LevelBelow,
            Regex::new(r"^(AT OR BLW|BLW) (FL\d{3})").unwrap(),
        ),
        (
            TokenKind::TimeDaily,
            Regex::new(r"^DLY (\d{4})-(\d{4})").unwrap(),
        ),
        (
            TokenKind::TimeDays,
            Regex::new(&format!(r"^{DAY}-{DAY} (\d{{4}})-(\d{{4}})")).unwrap(),
        ),
        (
            TokenKind::FlowAdep,
            Regex::new(r"^(ONLY|EXC) ADEP ([A-Z]{4})").unwrap(),
        ),
        (
            TokenKind::FlowAdes,
            Regex::new(r"^(ONLY|EXC) ADES ([A-Z]{4})").unwrap(),
        ),
        (
            TokenKind::FlowAdepArea,
            Regex::new(r"^(ONLY|EXC) ADEP (\w+_AD|\w+_GROUP)").unwrap(),
        ),
        (
            TokenKind::FlowAdesArea,
            Regex::new(r"^(ONLY|EXC) ADES (\w+_AD|\w+_GROUP)").unwrap(),
        ),
        (
            TokenKind::FlowVia,
            Regex::new(r"^(ONLY|EXC) (TFC VIA|VIA) ([A-Z0-9]+)").unwrap(),
        ),
        (
            TokenKind::AircraftType,
            Regex::new(r"^(ONLY|EXC) ACFT TYPE ([A-Z0-9]{3,4})").unwrap(),
        ),
        (
            TokenKind::Operational,
            Regex::new(
                r"^(ONLY|EXC) (OAT|STATE ACFT|MIL TFC|RNAV\s?\d|PBN/[A-Z0-9]+|FLT-TYPE \([M]\))",
            )
            .unwrap(),
        ),
        (
            TokenKind::FlightType,
            Regex::new(r"^FLT-TYPE \((M)\)").unwrap(),
        ),
    ]
});

static DAILY_WINDOW: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})-(\d{4})$").unwrap());

/// Splits condition text into tokens, in the order they appear.
pub fn tokenize(text: &str) -> Vec<Token> {
    let normalized = text.to_uppercase().replace('\n', " ");
    let normalized = normalized.trim();

    if normalized.is_empty() || normalized == "H24" {
        return Vec::new();
    }

    if let Some(caps) = DAILY_WINDOW.captures(normalized) {
        return vec![Token::Time {
            days: "DLY".to_string(),
            start: caps[1].to_string(),
            end: caps[2].to_string(),
        }];
    }

    let mut tokens = Vec::new();
    let mut rest = normalized;

    while !rest.is_empty() {
        let matched = GRAMMAR
            .iter()
            .find_map(|(kind, pattern)| pattern.captures(rest).map(|caps| (*kind, caps)));

        match matched {
            Some((kind, caps)) => {
                tokens.push(build_token(kind, &caps));
                let end = caps.get(0).map_or(0, |m| m.end());
                rest = rest[end..].trim();
            }
            None => {
                // Skip one character of text the grammar does not understand.
                let mut chars = rest.chars();
                chars.next();
                rest = chars.as_str().trim();
            }
        }
    }

    tokens
}

fn build_token(kind: TokenKind, caps: &regex::Captures<'_>) -> Token {
    let group = |i: usize| caps.get(i).map_or("", |m| m.as_str()).to_string();
    let logic = || {
        caps.get(1)
            .and_then(|m| Logic::parse(m.as_str()))
            .unwrap_or(Logic::Only)
    };

    match kind {
        TokenKind::LevelBetween => Token::Level {
            logic: LevelLogic::Between,
            level_1: group(1),
            level_2: Some(group(2)),
        },
        TokenKind::LevelAbove => Token::Level {
            logic: LevelLogic::AtOrAbove,
            level_1: group(2),
            level_2: None,
        },
        TokenKind::LevelBelow => Token::Level {
            logic: LevelLogic::AtOrBelow,
            level_1: group(2),
            level_2: None,
        },
        TokenKind::TimeDaily => Token::Time {
            days: "DLY".to_string(),
            start: group(1),
            end: group(2),
        },
        TokenKind::TimeDays => Token::Time {
            days: format!("{}-{}", group(1), group(2)),
            start: group(3),
            end: group(4),
        },
        TokenKind::FlowAdep | TokenKind::FlowAdepArea => Token::Flow {
            flow_type: FlowType::Adep,
            logic: logic(),
            identifier: group(2),
        },
        TokenKind::FlowAdes | TokenKind::FlowAdesArea => Token::Flow {
            flow_type: FlowType::Ades,
            logic: logic(),
            identifier: group(2),
        },
        TokenKind::FlowVia => Token::Flow {
            flow_type: FlowType::Via,
            logic: logic(),
            identifier: group(3),
        },
        TokenKind::AircraftType => Token::Aircraft {
            logic: logic(),
            aircraft_type: group(2),
        },
        TokenKind::Operational => Token::Operational {
            logic: logic(),
            code: group(2),
        },
        TokenKind::FlightType => Token::Operational {
            logic: Logic::Only,
            code: "FLT-TYPE (M)".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(logic: LevelLogic, l1: &str, l2: Option<&str>) -> Token {
        Token::Level {
            logic,
            level_1: l1.to_string(),
            level_2: l2.map(str::to_string),
        }
    }

    fn flow(flow_type: FlowType, logic: Logic, identifier: &str) -> Token {
        Token::Flow {
            flow_type,
            logic,
            identifier: identifier.to_string(),
        }
    }

    #[test]
    fn test_empty_and_h24_yield_nothing() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
        assert!(tokenize("H24").is_empty());
        assert!(tokenize(" h24\n").is_empty());
    }

    #[test]
    fn test_bare_window_is_daily() {
        assert_eq!(
            tokenize("0600-2200"),
            vec![Token::Time {
                days: "DLY".to_string(),
                start: "0600".to_string(),
                end: "2200".to_string(),
            }]
        );
    }

    #[test]
    fn test_composite_string() {
        let tokens =
            tokenize("ONLY ADEP EHAM AT OR ABV FL300 DLY 0800-1600 EXC ACFT TYPE A320 EXC OAT");

        assert_eq!(
            tokens,
            vec![
                flow(FlowType::Adep, Logic::Only, "EHAM"),
                level(LevelLogic::AtOrAbove, "FL300", None),
                Token::Time {
                    days: "DLY".to_string(),
                    start: "0800".to_string(),
                    end: "1600".to_string(),
                },
                Token::Aircraft {
                    logic: Logic::Exc,
                    aircraft_type: "A320".to_string(),
                },
                Token::Operational {
                    logic: Logic::Exc,
                    code: "OAT".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_lowercase_and_newlines() {
        let tokens = tokenize("btn fl245 and fl335\nmon-fri 0600-2200");
        assert_eq!(
            tokens,
            vec![
                level(LevelLogic::Between, "FL245", Some("FL335")),
                Token::Time {
                    days: "MON-FRI".to_string(),
                    start: "0600".to_string(),
                    end: "2200".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_remarks_contribute_nothing() {
        assert!(tokenize("Not available for traffic during exercise periods.").is_empty());

        let tokens = tokenize("Traffic shall file via the published SID. BLW FL195 applies.");
        assert_eq!(tokens, vec![level(LevelLogic::AtOrBelow, "FL195", None)]);
    }

    #[test]
    fn test_short_level_forms() {
        assert_eq!(
            tokenize("ABV FL100 BLW FL200"),
            vec![
                level(LevelLogic::AtOrAbove, "FL100", None),
                level(LevelLogic::AtOrBelow, "FL200", None),
            ]
        );
    }

    #[test]
    fn test_aerodrome_pattern_wins_over_area_pattern() {
        // The four letter pattern is tried first and matches the prefix.
        assert_eq!(
            tokenize("ONLY ADEP LFPG_GROUP"),
            vec![flow(FlowType::Adep, Logic::Only, "LFPG")]
        );
        assert_eq!(
            tokenize("EXC ADES EH_AD"),
            vec![flow(FlowType::Ades, Logic::Exc, "EH_AD")]
        );
    }

    #[test]
    fn test_via_forms() {
        assert_eq!(
            tokenize("ONLY TFC VIA KOKSY"),
            vec![flow(FlowType::Via, Logic::Only, "KOKSY")]
        );
        assert_eq!(
            tokenize("EXC VIA UL620"),
            vec![flow(FlowType::Via, Logic::Exc, "UL620")]
        );
    }

    #[test]
    fn test_operational_codes() {
        let tokens = tokenize("ONLY RNAV 5 EXC STATE ACFT ONLY PBN/A1 FLT-TYPE (M)");
        let codes: Vec<_> = tokens
            .iter()
            .map(|token| match token {
                Token::Operational { logic, code } => (logic.as_str(), code.as_str()),
                other => panic!("unexpected token {other:?}"),
            })
            .collect();
        assert_eq!(
            codes,
            vec![
                ("ONLY", "RNAV 5"),
                ("EXC", "STATE ACFT"),
                ("ONLY", "PBN/A1"),
                ("ONLY", "FLT-TYPE (M)"),
            ]
        );
    }

    #[test]
    fn test_duplicates_are_preserved() {
        let tokens = tokenize("DLY 0600-2200 DLY 0600-2200");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0], tokens[1]);
    }

    #[test]
    fn test_token_categories() {
        let categories: Vec<_> = tokenize("EXC ACFT TYPE B738 ONLY ADES EDDF")
            .iter()
            .map(Token::category)
            .collect();
        assert_eq!(
            categories,
            vec![ConditionCategory::Aircraft, ConditionCategory::Flow]
        );
    }
}
