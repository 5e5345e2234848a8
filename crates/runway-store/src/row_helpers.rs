use serde::de::DeserializeOwned;

use crate::error::StoreError;

/// Get a required column value from a row, returning CorruptRow on failure.
pub fn get<T: rusqlite::types::FromSql>(
    row: &rusqlite::Row<'_>,
    idx: usize,
    table: &'static str,
    column: &'static str,
) -> Result<T, StoreError> {
    row.get(idx).map_err(|e| StoreError::CorruptRow {
        table,
        column,
        detail: e.to_string(),
    })
}

/// Get an optional column value.
pub fn get_opt<T: rusqlite::types::FromSql>(
    row: &rusqlite::Row<'_>,
    idx: usize,
    table: &'static str,
    column: &'static str,
) -> Result<Option<T>, StoreError> {
    row.get(idx).map_err(|e| StoreError::CorruptRow {
        table,
        column,
        detail: e.to_string(),
    })
}

/// Parse a string into an enum, returning CorruptRow on failure.
pub fn parse_enum<T: std::str::FromStr>(
    raw: &str,
    table: &'static str,
    column: &'static str,
) -> Result<T, StoreError> {
    raw.parse().map_err(|_| StoreError::CorruptRow {
        table,
        column,
        detail: format!("unknown variant: {raw}"),
    })
}

/// Deserialize a nullable JSON TEXT column into a typed payload.
pub fn parse_json_opt<T: DeserializeOwned>(
    raw: Option<String>,
    table: &'static str,
    column: &'static str,
) -> Result<Option<T>, StoreError> {
    match raw {
        None => Ok(None),
        Some(s) => serde_json::from_str(&s)
            .map(Some)
            .map_err(|e| StoreError::CorruptRow {
                table,
                column,
                detail: format!("invalid JSON: {e}"),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use runway_core::stage::Stage;

    #[test]
    fn parse_enum_success() {
        let result: Result<Stage, _> = parse_enum("ticketSetup", "wizard_sessions", "stage");
        assert_eq!(result.unwrap(), Stage::TicketSetup);
    }

    #[test]
    fn parse_enum_failure() {
        let result: Result<Stage, _> = parse_enum("INVALID", "wizard_sessions", "stage");
        assert!(matches!(
            result,
            Err(StoreError::CorruptRow { table: "wizard_sessions", column: "stage", .. })
        ));
    }

    #[test]
    fn parse_json_opt_none() {
        let result: Option<serde_json::Value> =
            parse_json_opt(None, "wizard_sessions", "organizer_info").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn parse_json_opt_success() {
        let result: Option<serde_json::Value> = parse_json_opt(
            Some(r#"{"name": "Ana"}"#.to_string()),
            "wizard_sessions",
            "organizer_info",
        )
        .unwrap();
        assert_eq!(result.unwrap()["name"], "Ana");
    }

    #[test]
    fn parse_json_opt_failure() {
        let result: Result<Option<serde_json::Value>, _> = parse_json_opt(
            Some("not valid json".to_string()),
            "wizard_sessions",
            "organizer_info",
        );
        assert!(matches!(
            result,
            Err(StoreError::CorruptRow { table: "wizard_sessions", column: "organizer_info", .. })
        ));
    }
}
