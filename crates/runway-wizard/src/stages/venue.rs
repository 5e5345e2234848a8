use runway_core::actions::{Acknowledgement, StageAction};
use runway_core::errors::{ActionError, ValidationError};
use runway_core::payloads::VenueInfo;
use runway_core::session::WizardSession;
use runway_core::stage::Stage;

/// Fourth stage: physical, virtual, or hybrid venue.
pub struct SelectVenueAction;

impl StageAction for SelectVenueAction {
    fn name(&self) -> &str {
        "selectVenue"
    }

    fn stage(&self) -> Stage {
        Stage::VenueSetup
    }

    fn description(&self) -> &str {
        "Choose a physical, virtual, or hybrid venue"
    }

    fn instructions(&self) -> &str {
        "Ask whether the event is in-person, online, or both. For a physical \
         or hybrid venue collect the venue name and address if known; for a \
         virtual or hybrid one, the streaming platform or URL."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "required": ["type"],
            "properties": {
                "type": { "type": "string", "enum": ["physical", "virtual", "hybrid"] },
                "name": { "type": "string" },
                "address": { "type": "string" },
                "platform": { "type": "string" },
                "streamUrl": { "type": "string", "format": "uri" }
            }
        })
    }

    fn handle(
        &self,
        args: serde_json::Value,
        session: &mut WizardSession,
    ) -> Result<Acknowledgement, ActionError> {
        let info: VenueInfo = serde_json::from_value(args).map_err(ValidationError::from)?;

        let mode = match &info {
            VenueInfo::Physical { .. } => "a physical venue",
            VenueInfo::Virtual { .. } => "a virtual venue",
            VenueInfo::Hybrid { .. } => "a hybrid venue",
        };
        session.set_venue_info(info);
        session.set_stage(Stage::PaymentSetup)?;

        Ok(Acknowledgement {
            message: format!("Noted {mode}. Last setup step: how you'll get paid."),
            stage: session.stage(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_at_venue_setup() -> WizardSession {
        let mut session = WizardSession::new();
        for stage in [Stage::EventSetup, Stage::TicketSetup, Stage::VenueSetup] {
            session.set_stage(stage).unwrap();
        }
        session
    }

    #[test]
    fn bare_physical_payload_advances() {
        let mut session = session_at_venue_setup();
        SelectVenueAction
            .handle(serde_json::json!({"type": "physical"}), &mut session)
            .unwrap();
        assert_eq!(session.stage(), Stage::PaymentSetup);
        assert!(matches!(session.venue_info, Some(VenueInfo::Physical { .. })));
    }

    #[test]
    fn hybrid_with_details_parses() {
        let mut session = session_at_venue_setup();
        SelectVenueAction
            .handle(
                serde_json::json!({
                    "type": "hybrid",
                    "name": "The Glasshouse",
                    "address": "12 Mercer St",
                    "streamUrl": "https://live.example.com/spring"
                }),
                &mut session,
            )
            .unwrap();
        match session.venue_info.as_ref().unwrap() {
            VenueInfo::Hybrid { name, stream_url, .. } => {
                assert_eq!(name.as_deref(), Some("The Glasshouse"));
                assert!(stream_url.is_some());
            }
            other => panic!("expected hybrid venue, got {other:?}"),
        }
    }

    #[test]
    fn unknown_mode_rejected() {
        let mut session = session_at_venue_setup();
        let err = SelectVenueAction
            .handle(serde_json::json!({"type": "rooftop"}), &mut session)
            .unwrap_err();
        assert!(matches!(err, ActionError::Validation(_)));
        assert_eq!(session.stage(), Stage::VenueSetup);
        assert!(session.venue_info.is_none());
    }
}
