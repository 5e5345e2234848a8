use std::sync::Arc;
use std::time::Instant;

use runway_core::events::WizardEvent;
use runway_core::ids::SessionId;
use runway_core::stage::Stage;

/// Receives wizard lifecycle events. Implementations swallow their own
/// failures; nothing a sink does can block or fail a stage transition.
pub trait MonitoringSink: Send + Sync {
    fn record(&self, event: &WizardEvent);
}

/// Sink that discards everything.
pub struct NullSink;

impl MonitoringSink for NullSink {
    fn record(&self, _event: &WizardEvent) {}
}

/// Observes a single wizard session: stamps stage entry times, converts
/// transitions into `stage_completed` events with dwell durations, and emits
/// `wizard_abandoned` from `Drop` if the session is torn down before publish.
pub struct WizardMonitor {
    sink: Arc<dyn MonitoringSink>,
    session_id: SessionId,
    current_stage: Stage,
    started_at: Instant,
    stage_entered_at: Instant,
    finished: bool,
}

impl WizardMonitor {
    /// Observe a brand-new session. Emits `wizard_started`.
    pub fn start(sink: Arc<dyn MonitoringSink>, session_id: SessionId, stage: Stage) -> Self {
        sink.record(&WizardEvent::WizardStarted { session_id: session_id.clone() });
        let now = Instant::now();
        Self {
            sink,
            session_id,
            current_stage: stage,
            started_at: now,
            stage_entered_at: now,
            finished: false,
        }
    }

    /// Observe a resumed session. `wizard_started` fires once per session id,
    /// at creation — not again here. Dwell timing restarts from now.
    pub fn resume(sink: Arc<dyn MonitoringSink>, session_id: SessionId, stage: Stage) -> Self {
        let now = Instant::now();
        Self {
            sink,
            session_id,
            current_stage: stage,
            started_at: now,
            stage_entered_at: now,
            finished: stage.is_terminal(),
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Record a stage transition: dwell for the stage just left, and the
    /// completion event when the wizard reaches `published`.
    pub fn stage_changed(&mut self, to: Stage) {
        let now = Instant::now();
        self.sink.record(&WizardEvent::StageCompleted {
            session_id: self.session_id.clone(),
            stage: self.current_stage,
            duration_ms: now.duration_since(self.stage_entered_at).as_millis() as u64,
        });
        self.current_stage = to;
        self.stage_entered_at = now;

        if to == Stage::Published {
            self.sink.record(&WizardEvent::WizardCompleted {
                session_id: self.session_id.clone(),
                total_duration_ms: now.duration_since(self.started_at).as_millis() as u64,
            });
            self.finished = true;
        }
    }

    /// The old session is abandoned mid-funnel; a fresh one begins.
    pub fn session_reset(&mut self, new_session_id: SessionId) {
        if !self.finished {
            self.sink.record(&WizardEvent::WizardAbandoned {
                session_id: self.session_id.clone(),
                stage: self.current_stage,
            });
        }
        self.sink.record(&WizardEvent::WizardStarted { session_id: new_session_id.clone() });
        let now = Instant::now();
        self.session_id = new_session_id;
        self.current_stage = Stage::INITIAL;
        self.started_at = now;
        self.stage_entered_at = now;
        self.finished = false;
    }
}

impl Drop for WizardMonitor {
    fn drop(&mut self) {
        if !self.finished {
            self.sink.record(&WizardEvent::WizardAbandoned {
                session_id: self.session_id.clone(),
                stage: self.current_stage,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct MemorySink {
        events: Mutex<Vec<WizardEvent>>,
    }

    impl MemorySink {
        fn events(&self) -> Vec<WizardEvent> {
            self.events.lock().clone()
        }
    }

    impl MonitoringSink for MemorySink {
        fn record(&self, event: &WizardEvent) {
            self.events.lock().push(event.clone());
        }
    }

    #[test]
    fn start_emits_wizard_started() {
        let sink = Arc::new(MemorySink::default());
        let sid = SessionId::new();
        let monitor = WizardMonitor::start(sink.clone(), sid.clone(), Stage::OrganizerSetup);
        drop(monitor);

        let events = sink.events();
        assert_eq!(events[0], WizardEvent::WizardStarted { session_id: sid });
    }

    #[test]
    fn stage_change_emits_dwell_for_prior_stage() {
        let sink = Arc::new(MemorySink::default());
        let mut monitor =
            WizardMonitor::start(sink.clone(), SessionId::new(), Stage::OrganizerSetup);
        std::thread::sleep(Duration::from_millis(20));
        monitor.stage_changed(Stage::EventSetup);

        let events = sink.events();
        match &events[1] {
            WizardEvent::StageCompleted { stage, duration_ms, .. } => {
                assert_eq!(*stage, Stage::OrganizerSetup);
                assert!(*duration_ms >= 15, "dwell too short: {duration_ms}ms");
            }
            other => panic!("expected stage_completed, got {other:?}"),
        }
    }

    #[test]
    fn publish_emits_completed_and_suppresses_abandoned() {
        let sink = Arc::new(MemorySink::default());
        let mut monitor = WizardMonitor::start(sink.clone(), SessionId::new(), Stage::ReviewPublish);
        monitor.stage_changed(Stage::Published);
        drop(monitor);

        let types: Vec<&str> = sink.events().iter().map(|e| e.event_type()).collect();
        assert_eq!(types, vec!["wizard_started", "stage_completed", "wizard_completed"]);
    }

    #[test]
    fn teardown_before_publish_emits_abandoned() {
        let sink = Arc::new(MemorySink::default());
        let sid = SessionId::new();
        let mut monitor = WizardMonitor::start(sink.clone(), sid.clone(), Stage::OrganizerSetup);
        monitor.stage_changed(Stage::EventSetup);
        drop(monitor);

        let last = sink.events().last().unwrap().clone();
        assert_eq!(
            last,
            WizardEvent::WizardAbandoned { session_id: sid, stage: Stage::EventSetup }
        );
    }

    #[test]
    fn save_draft_teardown_carries_dashboard_stage() {
        let sink = Arc::new(MemorySink::default());
        let mut monitor = WizardMonitor::start(sink.clone(), SessionId::new(), Stage::ReviewPublish);
        monitor.stage_changed(Stage::Dashboard);
        drop(monitor);

        let last = sink.events().last().unwrap().clone();
        assert_eq!(last.event_type(), "wizard_abandoned");
        assert_eq!(last.stage(), Some(Stage::Dashboard));
    }

    #[test]
    fn reset_abandons_old_and_starts_new() {
        let sink = Arc::new(MemorySink::default());
        let old_sid = SessionId::new();
        let new_sid = SessionId::new();
        let mut monitor = WizardMonitor::start(sink.clone(), old_sid.clone(), Stage::EventSetup);
        monitor.session_reset(new_sid.clone());

        let events = sink.events();
        assert_eq!(
            events[1],
            WizardEvent::WizardAbandoned { session_id: old_sid, stage: Stage::EventSetup }
        );
        assert_eq!(events[2], WizardEvent::WizardStarted { session_id: new_sid.clone() });
        assert_eq!(monitor.session_id(), &new_sid);
    }

    #[test]
    fn resume_does_not_replay_started() {
        let sink = Arc::new(MemorySink::default());
        let mut monitor = WizardMonitor::resume(sink.clone(), SessionId::new(), Stage::VenueSetup);
        monitor.stage_changed(Stage::PaymentSetup);

        let types: Vec<&str> = sink.events().iter().map(|e| e.event_type()).collect();
        assert_eq!(types, vec!["stage_completed"]);
    }

    #[test]
    fn resume_at_terminal_stage_never_abandons() {
        let sink = Arc::new(MemorySink::default());
        let monitor = WizardMonitor::resume(sink.clone(), SessionId::new(), Stage::Published);
        drop(monitor);
        assert!(sink.events().is_empty());
    }
}
