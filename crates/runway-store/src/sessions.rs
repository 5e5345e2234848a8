use serde::Serialize;
use tracing::instrument;

use runway_core::ids::SessionId;
use runway_core::session::WizardSession;
use runway_core::stage::Stage;

use crate::database::Database;
use crate::error::StoreError;
use crate::row_helpers;

/// Persists `WizardSession` snapshots. The whole session is the unit of
/// persistence: `save` writes every slot, and `get` reconstructs a session
/// structurally identical to the one that was saved.
pub struct SessionRepo {
    db: Database,
}

impl SessionRepo {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a freshly created session.
    #[instrument(skip(self, session), fields(session_id = %session.session_id))]
    pub fn create(&self, session: &WizardSession) -> Result<(), StoreError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO wizard_sessions (id, stage, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![
                    session.session_id.as_str(),
                    session.stage().to_string(),
                    session.created_at,
                    session.updated_at,
                ],
            )?;
            Ok(())
        })
    }

    /// Write the full current state of a session (upsert).
    /// Called after every successful action so a reload resumes mid-wizard.
    #[instrument(skip(self, session), fields(session_id = %session.session_id, stage = %session.stage()))]
    pub fn save(&self, session: &WizardSession) -> Result<(), StoreError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO wizard_sessions
                    (id, stage, organizer_info, event_info, ticket_info, venue_info,
                     sponsor_info, payment_method, event_published, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                 ON CONFLICT(id) DO UPDATE SET
                    stage = excluded.stage,
                    organizer_info = excluded.organizer_info,
                    event_info = excluded.event_info,
                    ticket_info = excluded.ticket_info,
                    venue_info = excluded.venue_info,
                    sponsor_info = excluded.sponsor_info,
                    payment_method = excluded.payment_method,
                    event_published = excluded.event_published,
                    updated_at = excluded.updated_at",
                rusqlite::params![
                    session.session_id.as_str(),
                    session.stage().to_string(),
                    slot_json(&session.organizer_info)?,
                    slot_json(&session.event_info)?,
                    slot_json(&session.ticket_info)?,
                    slot_json(&session.venue_info)?,
                    slot_json(&session.sponsor_info)?,
                    slot_json(&session.payment_method)?,
                    slot_json(&session.event_published)?,
                    session.created_at,
                    session.updated_at,
                ],
            )?;
            Ok(())
        })
    }

    /// Load a session by ID.
    #[instrument(skip(self), fields(session_id = %id))]
    pub fn get(&self, id: &SessionId) -> Result<WizardSession, StoreError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, stage, organizer_info, event_info, ticket_info, venue_info,
                        sponsor_info, payment_method, event_published, created_at, updated_at
                 FROM wizard_sessions WHERE id = ?1",
            )?;
            let mut rows = stmt.query([id.as_str()])?;
            match rows.next()? {
                Some(row) => row_to_session(row),
                None => Err(StoreError::NotFound(format!("wizard session {id}"))),
            }
        })
    }

    /// List sessions, most recently touched first, optionally filtered by stage.
    #[instrument(skip(self))]
    pub fn list(
        &self,
        stage: Option<Stage>,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<WizardSession>, StoreError> {
        self.db.with_conn(|conn| {
            let (sql, params) = match stage {
                Some(s) => (
                    "SELECT id, stage, organizer_info, event_info, ticket_info, venue_info,
                            sponsor_info, payment_method, event_published, created_at, updated_at
                     FROM wizard_sessions WHERE stage = ?1
                     ORDER BY updated_at DESC LIMIT ?2 OFFSET ?3",
                    vec![s.to_string(), limit.to_string(), offset.to_string()],
                ),
                None => (
                    "SELECT id, stage, organizer_info, event_info, ticket_info, venue_info,
                            sponsor_info, payment_method, event_published, created_at, updated_at
                     FROM wizard_sessions
                     ORDER BY updated_at DESC LIMIT ?1 OFFSET ?2",
                    vec![limit.to_string(), offset.to_string()],
                ),
            };

            let mut stmt = conn.prepare(sql)?;
            let params_refs: Vec<&dyn rusqlite::types::ToSql> =
                params.iter().map(|p| p as &dyn rusqlite::types::ToSql).collect();
            let mut rows = stmt.query(params_refs.as_slice())?;
            let mut results = Vec::new();
            while let Some(row) = rows.next()? {
                results.push(row_to_session(row)?);
            }
            Ok(results)
        })
    }

    /// Delete a session.
    #[instrument(skip(self), fields(session_id = %id))]
    pub fn delete(&self, id: &SessionId) -> Result<(), StoreError> {
        self.db.with_conn(|conn| {
            conn.execute("DELETE FROM wizard_sessions WHERE id = ?1", [id.as_str()])?;
            Ok(())
        })
    }
}

fn slot_json<T: Serialize>(slot: &Option<T>) -> Result<Option<String>, StoreError> {
    slot.as_ref()
        .map(|v| serde_json::to_string(v))
        .transpose()
        .map_err(StoreError::from)
}

fn row_to_session(row: &rusqlite::Row<'_>) -> Result<WizardSession, StoreError> {
    const T: &str = "wizard_sessions";
    let stage_str: String = row_helpers::get(row, 1, T, "stage")?;
    let stage: Stage = row_helpers::parse_enum(&stage_str, T, "stage")?;

    // Rebuild through serde so the same validation applies as on the wire.
    let session = serde_json::json!({
        "sessionId": row_helpers::get::<String>(row, 0, T, "id")?,
        "stage": stage,
        "organizerInfo": row_helpers::parse_json_opt::<serde_json::Value>(
            row_helpers::get_opt(row, 2, T, "organizer_info")?, T, "organizer_info")?,
        "eventInfo": row_helpers::parse_json_opt::<serde_json::Value>(
            row_helpers::get_opt(row, 3, T, "event_info")?, T, "event_info")?,
        "ticketInfo": row_helpers::parse_json_opt::<serde_json::Value>(
            row_helpers::get_opt(row, 4, T, "ticket_info")?, T, "ticket_info")?,
        "venueInfo": row_helpers::parse_json_opt::<serde_json::Value>(
            row_helpers::get_opt(row, 5, T, "venue_info")?, T, "venue_info")?,
        "sponsorInfo": row_helpers::parse_json_opt::<serde_json::Value>(
            row_helpers::get_opt(row, 6, T, "sponsor_info")?, T, "sponsor_info")?,
        "paymentMethod": row_helpers::parse_json_opt::<serde_json::Value>(
            row_helpers::get_opt(row, 7, T, "payment_method")?, T, "payment_method")?,
        "eventPublished": row_helpers::parse_json_opt::<serde_json::Value>(
            row_helpers::get_opt(row, 8, T, "event_published")?, T, "event_published")?,
        "createdAt": row_helpers::get::<String>(row, 9, T, "created_at")?,
        "updatedAt": row_helpers::get::<String>(row, 10, T, "updated_at")?,
    });

    serde_json::from_value(session).map_err(|e| StoreError::CorruptRow {
        table: T,
        column: "id",
        detail: format!("session failed to deserialize: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use runway_core::payloads::{OrganizerInfo, PaymentMethod, TicketInfo};

    fn setup() -> SessionRepo {
        SessionRepo::new(Database::in_memory().unwrap())
    }

    #[test]
    fn create_and_get() {
        let repo = setup();
        let session = WizardSession::new();
        repo.create(&session).unwrap();

        let fetched = repo.get(&session.session_id).unwrap();
        assert_eq!(fetched, session);
        assert_eq!(fetched.stage(), Stage::OrganizerSetup);
    }

    #[test]
    fn get_nonexistent_fails() {
        let repo = setup();
        let result = repo.get(&SessionId::from_raw("wiz_nonexistent"));
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn save_roundtrips_mid_wizard_state() {
        let repo = setup();
        let mut session = WizardSession::new();
        repo.create(&session).unwrap();

        session.set_organizer_info(OrganizerInfo {
            name: "Ana".into(),
            role: None,
            experience: None,
        });
        session.set_stage(Stage::EventSetup).unwrap();
        repo.save(&session).unwrap();

        let fetched = repo.get(&session.session_id).unwrap();
        assert_eq!(fetched, session);
        assert_eq!(fetched.stage(), Stage::EventSetup);
        assert_eq!(fetched.organizer_info.as_ref().unwrap().name, "Ana");
        assert!(fetched.ticket_info.is_none());
    }

    #[test]
    fn save_is_upsert() {
        let repo = setup();
        let mut session = WizardSession::new();
        repo.save(&session).unwrap();

        session.set_ticket_info(TicketInfo::Free { capacity: Some(80) });
        repo.save(&session).unwrap();

        let fetched = repo.get(&session.session_id).unwrap();
        assert!(matches!(fetched.ticket_info, Some(TicketInfo::Free { capacity: Some(80) })));
        assert_eq!(repo.list(None, 100, 0).unwrap().len(), 1);
    }

    #[test]
    fn payment_method_survives_roundtrip() {
        let repo = setup();
        let mut session = WizardSession::new();
        session.set_payment_method(PaymentMethod::Manual);
        repo.save(&session).unwrap();

        let fetched = repo.get(&session.session_id).unwrap();
        assert_eq!(fetched.payment_method, Some(PaymentMethod::Manual));
    }

    #[test]
    fn list_with_stage_filter() {
        let repo = setup();
        let s1 = WizardSession::new();
        let mut s2 = WizardSession::new();
        s2.set_stage(Stage::EventSetup).unwrap();
        repo.save(&s1).unwrap();
        repo.save(&s2).unwrap();

        let all = repo.list(None, 100, 0).unwrap();
        assert_eq!(all.len(), 2);

        let at_event = repo.list(Some(Stage::EventSetup), 100, 0).unwrap();
        assert_eq!(at_event.len(), 1);
        assert_eq!(at_event[0].session_id, s2.session_id);
    }

    #[test]
    fn list_pagination() {
        let repo = setup();
        for _ in 0..5 {
            repo.save(&WizardSession::new()).unwrap();
        }
        assert_eq!(repo.list(None, 2, 0).unwrap().len(), 2);
        assert_eq!(repo.list(None, 2, 2).unwrap().len(), 2);
        assert_eq!(repo.list(None, 2, 4).unwrap().len(), 1);
    }

    #[test]
    fn delete_session() {
        let repo = setup();
        let session = WizardSession::new();
        repo.save(&session).unwrap();
        repo.delete(&session.session_id).unwrap();
        assert!(repo.get(&session.session_id).is_err());
    }

    #[test]
    fn corrupt_stage_returns_corrupt_row() {
        let db = Database::in_memory().unwrap();
        let id = SessionId::new();
        db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO wizard_sessions (id, stage, created_at, updated_at)
                 VALUES (?1, 'NOT_A_STAGE', ?2, ?2)",
                rusqlite::params![id.as_str(), chrono::Utc::now().to_rfc3339()],
            )?;
            Ok(())
        })
        .unwrap();

        let repo = SessionRepo::new(db);
        let result = repo.get(&id);
        assert!(matches!(result, Err(StoreError::CorruptRow { column: "stage", .. })));
    }

    #[test]
    fn corrupt_slot_json_returns_corrupt_row() {
        let db = Database::in_memory().unwrap();
        let id = SessionId::new();
        db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO wizard_sessions (id, stage, organizer_info, created_at, updated_at)
                 VALUES (?1, 'organizerSetup', '{broken', ?2, ?2)",
                rusqlite::params![id.as_str(), chrono::Utc::now().to_rfc3339()],
            )?;
            Ok(())
        })
        .unwrap();

        let repo = SessionRepo::new(db);
        let result = repo.get(&id);
        assert!(matches!(
            result,
            Err(StoreError::CorruptRow { column: "organizer_info", .. })
        ));
    }
}
