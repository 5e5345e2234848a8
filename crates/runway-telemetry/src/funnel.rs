use std::collections::HashMap;
use std::path::Path;

use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::warn;

use runway_core::events::WizardEvent;
use runway_core::stage::Stage;

use crate::monitor::MonitoringSink;

/// A funnel event row persisted to SQLite.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FunnelRow {
    pub id: i64,
    pub timestamp: String,
    pub session_id: String,
    pub event: String,
    pub stage: Option<String>,
    pub duration_ms: Option<u64>,
}

/// Query parameters for searching persisted funnel events.
#[derive(Clone, Debug, Default)]
pub struct FunnelQuery {
    pub session_id: Option<String>,
    pub event: Option<String>,
    pub since: Option<String>,
    pub limit: Option<u32>,
}

/// Dwell-time summary for a single stage.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DwellSummary {
    pub count: u64,
    pub sum_ms: f64,
    pub p50_ms: f64,
    pub p95_ms: f64,
}

/// Aggregate view of the wizard funnel since process start.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FunnelSummary {
    pub started: u64,
    pub completed: u64,
    pub abandoned: u64,
    pub stage_completions: HashMap<String, u64>,
}

/// Records wizard lifecycle events: in-memory aggregates for live inspection
/// plus an append-only SQLite table for historical queries. Persistence
/// failures are swallowed and logged — recording never blocks a transition.
pub struct FunnelRecorder {
    counters: RwLock<HashMap<String, u64>>,
    dwell: RwLock<HashMap<Stage, Vec<f64>>>,
    db: Mutex<Connection>,
}

impl FunnelRecorder {
    pub fn new(db_path: &Path) -> Result<Self, rusqlite::Error> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let conn = Connection::open(db_path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             CREATE TABLE IF NOT EXISTS funnel_events (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 timestamp TEXT NOT NULL,
                 session_id TEXT NOT NULL,
                 event TEXT NOT NULL,
                 stage TEXT,
                 duration_ms INTEGER
             );
             CREATE INDEX IF NOT EXISTS idx_funnel_session ON funnel_events(session_id);
             CREATE INDEX IF NOT EXISTS idx_funnel_event ON funnel_events(event, timestamp);",
        )?;
        Ok(Self {
            counters: RwLock::new(HashMap::new()),
            dwell: RwLock::new(HashMap::new()),
            db: Mutex::new(conn),
        })
    }

    /// In-memory only recorder backed by a temp-file-free `:memory:` database.
    pub fn in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(
            "CREATE TABLE funnel_events (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 timestamp TEXT NOT NULL,
                 session_id TEXT NOT NULL,
                 event TEXT NOT NULL,
                 stage TEXT,
                 duration_ms INTEGER
             );",
        )?;
        Ok(Self {
            counters: RwLock::new(HashMap::new()),
            dwell: RwLock::new(HashMap::new()),
            db: Mutex::new(conn),
        })
    }

    fn bump(&self, key: &str) {
        *self.counters.write().entry(key.to_string()).or_insert(0) += 1;
    }

    fn counter(&self, key: &str) -> u64 {
        self.counters.read().get(key).copied().unwrap_or(0)
    }

    fn observe_dwell(&self, stage: Stage, duration_ms: u64) {
        self.dwell.write().entry(stage).or_default().push(duration_ms as f64);
    }

    /// Dwell-time summary for a stage, over all completions observed in-process.
    pub fn stage_dwell(&self, stage: Stage) -> DwellSummary {
        let dwell = self.dwell.read();
        let Some(obs) = dwell.get(&stage) else {
            return DwellSummary::default();
        };
        if obs.is_empty() {
            return DwellSummary::default();
        }
        let mut sorted = obs.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let count = sorted.len();
        DwellSummary {
            count: count as u64,
            sum_ms: sorted.iter().sum(),
            p50_ms: sorted[count / 2],
            p95_ms: sorted[((count as f64 * 0.95) as usize).min(count - 1)],
        }
    }

    /// Aggregate funnel counts observed in-process.
    pub fn summary(&self) -> FunnelSummary {
        let counters = self.counters.read();
        let mut stage_completions = HashMap::new();
        for (key, value) in counters.iter() {
            if let Some(stage) = key.strip_prefix("stage_completed:") {
                stage_completions.insert(stage.to_string(), *value);
            }
        }
        FunnelSummary {
            started: counters.get("wizard_started").copied().unwrap_or(0),
            completed: counters.get("wizard_completed").copied().unwrap_or(0),
            abandoned: counters.get("wizard_abandoned").copied().unwrap_or(0),
            stage_completions,
        }
    }

    fn persist(&self, event: &WizardEvent) -> Result<(), rusqlite::Error> {
        let now = Utc::now().to_rfc3339();
        let duration_ms = match event {
            WizardEvent::StageCompleted { duration_ms, .. } => Some(*duration_ms as i64),
            WizardEvent::WizardCompleted { total_duration_ms, .. } => {
                Some(*total_duration_ms as i64)
            }
            _ => None,
        };
        let db = self.db.lock();
        db.execute(
            "INSERT INTO funnel_events (timestamp, session_id, event, stage, duration_ms)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                now,
                event.session_id().as_str(),
                event.event_type(),
                event.stage().map(|s| s.to_string()),
                duration_ms,
            ],
        )?;
        Ok(())
    }

    /// Query historical funnel events.
    pub fn query(&self, q: &FunnelQuery) -> Result<Vec<FunnelRow>, rusqlite::Error> {
        let db = self.db.lock();
        let mut sql = String::from(
            "SELECT id, timestamp, session_id, event, stage, duration_ms FROM funnel_events WHERE 1=1",
        );
        let mut params: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(session_id) = &q.session_id {
            sql.push_str(&format!(" AND session_id = ?{}", params.len() + 1));
            params.push(Box::new(session_id.clone()));
        }
        if let Some(event) = &q.event {
            sql.push_str(&format!(" AND event = ?{}", params.len() + 1));
            params.push(Box::new(event.clone()));
        }
        if let Some(since) = &q.since {
            sql.push_str(&format!(" AND timestamp >= ?{}", params.len() + 1));
            params.push(Box::new(since.clone()));
        }

        sql.push_str(" ORDER BY id ASC");
        let limit = q.limit.unwrap_or(100);
        sql.push_str(&format!(" LIMIT {limit}"));

        let param_refs: Vec<&dyn rusqlite::types::ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let mut stmt = db.prepare(&sql)?;
        let rows = stmt.query_map(param_refs.as_slice(), |row| {
            Ok(FunnelRow {
                id: row.get(0)?,
                timestamp: row.get(1)?,
                session_id: row.get(2)?,
                event: row.get(3)?,
                stage: row.get(4)?,
                duration_ms: row.get::<_, Option<i64>>(5)?.map(|d| d as u64),
            })
        })?;

        rows.collect()
    }

    /// Prune events older than retention_days.
    pub fn prune(&self, retention_days: u32) -> Result<usize, rusqlite::Error> {
        let db = self.db.lock();
        let cutoff = Utc::now()
            .checked_sub_signed(chrono::Duration::days(retention_days as i64))
            .unwrap_or_else(Utc::now)
            .to_rfc3339();
        db.execute(
            "DELETE FROM funnel_events WHERE timestamp < ?1",
            rusqlite::params![cutoff],
        )
    }
}

impl MonitoringSink for FunnelRecorder {
    fn record(&self, event: &WizardEvent) {
        match event {
            WizardEvent::WizardStarted { .. } => self.bump("wizard_started"),
            WizardEvent::StageCompleted { stage, duration_ms, .. } => {
                self.bump(&format!("stage_completed:{stage}"));
                self.observe_dwell(*stage, *duration_ms);
            }
            WizardEvent::WizardCompleted { .. } => self.bump("wizard_completed"),
            WizardEvent::WizardAbandoned { .. } => self.bump("wizard_abandoned"),
        }
        if let Err(e) = self.persist(event) {
            warn!(event = event.event_type(), "funnel persist failed: {e}");
        }
    }
}
