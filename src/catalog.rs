use anyhow::{Context, Result};
use diesel::sqlite::SqliteConnection;

use crate::conditions::ParsedConditions;
use crate::conditions_repo::ConditionPalette;
use crate::entities_repo::EntityResolver;
use crate::grammar::{Token, tokenize};

/// Resolver state for one compiler run: the entity resolver and the condition
/// palette together with their id caches.
#[derive(Debug, Default)]
pub struct Catalog {
    pub entities: EntityResolver,
    pub palette: ConditionPalette,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokenizes `text` and resolves every token to a palette id. Tokens whose
    /// payload cannot be normalized (an unparseable level, say) are dropped.
    pub fn compile_conditions(
        &mut self,
        conn: &mut SqliteConnection,
        text: &str,
    ) -> Result<ParsedConditions> {
        let mut parsed = ParsedConditions::default();

        for token in tokenize(text) {
            let category = token.category();
            if let Some(id) = self
                .resolve_token(conn, &token)
                .with_context(|| format!("Failed to resolve condition {token:?}"))?
            {
                parsed.push(category, id);
            }
        }

        Ok(parsed)
    }

    fn resolve_token(
        &mut self,
        conn: &mut SqliteConnection,
        token: &Token,
    ) -> diesel::QueryResult<Option<i32>> {
        match token {
            Token::Level {
                logic,
                level_1,
                level_2,
            } => self
                .palette
                .resolve_level(conn, *logic, level_1, level_2.as_deref()),
            Token::Time { days, start, end } => self.palette.resolve_time(conn, days, start, end),
            Token::Flow {
                flow_type,
                logic,
                identifier,
            } => self
                .palette
                .resolve_flow(conn, &mut self.entities, *flow_type, *logic, identifier),
            Token::Aircraft {
                logic,
                aircraft_type,
            } => self.palette.resolve_aircraft(conn, *logic, aircraft_type),
            Token::Operational { logic, code } => {
                self.palette.resolve_operational(conn, *logic, code)
            }
        }
    }

    /// Forgets every cached id; called when a stage transaction rolls back.
    pub fn clear_caches(&mut self) {
        self.entities.clear_caches();
        self.palette.clear_caches();
    }
}
