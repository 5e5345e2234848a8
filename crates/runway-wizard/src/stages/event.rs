use runway_core::actions::{Acknowledgement, StageAction};
use runway_core::errors::{ActionError, ValidationError};
use runway_core::payloads::EventInfo;
use runway_core::session::WizardSession;
use runway_core::stage::Stage;

/// Second stage: title, kind of show, and when it happens.
pub struct ConfigureEventAction;

impl StageAction for ConfigureEventAction {
    fn name(&self) -> &str {
        "configureEvent"
    }

    fn stage(&self) -> Stage {
        Stage::EventSetup
    }

    fn description(&self) -> &str {
        "Set the event's title, type, date, and start time"
    }

    fn instructions(&self) -> &str {
        "Ask what the event is: a working title (required), the format \
         (runway show, trunk show, pop-up shop, exhibition, or gala), and the \
         date and start time if the user already knows them. Dates and times \
         can be firmed up later from the dashboard."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "required": ["title"],
            "properties": {
                "title": { "type": "string", "description": "Event title" },
                "eventType": {
                    "type": "string",
                    "enum": ["runwayShow", "trunkShow", "popUpShop", "exhibition", "gala"]
                },
                "date": { "type": "string", "format": "date" },
                "startTime": { "type": "string", "format": "time" }
            }
        })
    }

    fn handle(
        &self,
        args: serde_json::Value,
        session: &mut WizardSession,
    ) -> Result<Acknowledgement, ActionError> {
        let info: EventInfo = serde_json::from_value(args).map_err(ValidationError::from)?;
        info.validate()?;

        let title = info.title.clone();
        session.set_event_info(info);
        session.set_stage(Stage::TicketSetup)?;

        Ok(Acknowledgement {
            message: format!("\"{title}\" is set up. Now let's talk tickets."),
            stage: session.stage(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use runway_core::payloads::EventType;

    fn session_at_event_setup() -> WizardSession {
        let mut session = WizardSession::new();
        session.set_stage(Stage::EventSetup).unwrap();
        session
    }

    #[test]
    fn title_only_payload_advances() {
        let mut session = session_at_event_setup();
        let ack = ConfigureEventAction
            .handle(serde_json::json!({"title": "Spring Show"}), &mut session)
            .unwrap();

        assert_eq!(session.stage(), Stage::TicketSetup);
        assert!(ack.message.contains("Spring Show"));
    }

    #[test]
    fn full_payload_parses_schedule() {
        let mut session = session_at_event_setup();
        ConfigureEventAction
            .handle(
                serde_json::json!({
                    "title": "Atelier Nocturne",
                    "eventType": "gala",
                    "date": "2026-10-03",
                    "startTime": "20:00:00"
                }),
                &mut session,
            )
            .unwrap();

        let info = session.event_info.as_ref().unwrap();
        assert_eq!(info.event_type, Some(EventType::Gala));
        assert!(info.date.is_some());
    }

    #[test]
    fn blank_title_rejected() {
        let mut session = session_at_event_setup();
        let err = ConfigureEventAction
            .handle(serde_json::json!({"title": "   "}), &mut session)
            .unwrap_err();
        assert!(matches!(err, ActionError::Validation(_)));
        assert_eq!(session.stage(), Stage::EventSetup);
        assert!(session.event_info.is_none());
    }

    #[test]
    fn unknown_event_type_rejected() {
        let mut session = session_at_event_setup();
        let err = ConfigureEventAction
            .handle(
                serde_json::json!({"title": "Show", "eventType": "flashMob"}),
                &mut session,
            )
            .unwrap_err();
        assert_eq!(err.error_kind(), "malformed");
    }
}
