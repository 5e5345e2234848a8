use serde::{Deserialize, Serialize};

use crate::ids::SessionId;
use crate::stage::Stage;

/// Lifecycle events emitted by the monitoring tap. Purely observational:
/// nothing in the wizard's control flow depends on them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WizardEvent {
    #[serde(rename = "wizard_started")]
    WizardStarted { session_id: SessionId },

    #[serde(rename = "stage_completed")]
    StageCompleted {
        session_id: SessionId,
        stage: Stage,
        duration_ms: u64,
    },

    #[serde(rename = "wizard_completed")]
    WizardCompleted {
        session_id: SessionId,
        total_duration_ms: u64,
    },

    #[serde(rename = "wizard_abandoned")]
    WizardAbandoned {
        session_id: SessionId,
        stage: Stage,
    },
}

impl WizardEvent {
    pub fn session_id(&self) -> &SessionId {
        match self {
            Self::WizardStarted { session_id }
            | Self::StageCompleted { session_id, .. }
            | Self::WizardCompleted { session_id, .. }
            | Self::WizardAbandoned { session_id, .. } => session_id,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            Self::WizardStarted { .. } => "wizard_started",
            Self::StageCompleted { .. } => "stage_completed",
            Self::WizardCompleted { .. } => "wizard_completed",
            Self::WizardAbandoned { .. } => "wizard_abandoned",
        }
    }

    /// Stage the event concerns, where one applies.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::StageCompleted { stage, .. } | Self::WizardAbandoned { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_session_id() {
        let sid = SessionId::new();
        let evt = WizardEvent::StageCompleted {
            session_id: sid.clone(),
            stage: Stage::EventSetup,
            duration_ms: 1200,
        };
        assert_eq!(evt.session_id(), &sid);
        assert_eq!(evt.stage(), Some(Stage::EventSetup));
    }

    #[test]
    fn event_type_str() {
        let evt = WizardEvent::WizardAbandoned {
            session_id: SessionId::new(),
            stage: Stage::TicketSetup,
        };
        assert_eq!(evt.event_type(), "wizard_abandoned");
    }

    #[test]
    fn serde_roundtrip() {
        let events = vec![
            WizardEvent::WizardStarted { session_id: SessionId::new() },
            WizardEvent::StageCompleted {
                session_id: SessionId::new(),
                stage: Stage::VenueSetup,
                duration_ms: 30_000,
            },
            WizardEvent::WizardCompleted {
                session_id: SessionId::new(),
                total_duration_ms: 240_000,
            },
        ];

        for evt in &events {
            let json = serde_json::to_string(evt).unwrap();
            let parsed: WizardEvent = serde_json::from_str(&json).unwrap();
            assert_eq!(*evt, parsed);
        }
    }
}
