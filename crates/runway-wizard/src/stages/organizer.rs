use runway_core::actions::{Acknowledgement, StageAction};
use runway_core::errors::{ActionError, ValidationError};
use runway_core::payloads::OrganizerInfo;
use runway_core::session::WizardSession;
use runway_core::stage::Stage;

/// First stage: who is running this event.
pub struct SetupOrganizerAction;

impl StageAction for SetupOrganizerAction {
    fn name(&self) -> &str {
        "setupOrganizer"
    }

    fn stage(&self) -> Stage {
        Stage::OrganizerSetup
    }

    fn description(&self) -> &str {
        "Record the organizer's name, role, and experience level"
    }

    fn instructions(&self) -> &str {
        "Welcome the user to event creation. Ask who is organizing this event: \
         their name, whether they are an organizer, designer, venue, or sponsor, \
         and how much event experience they have. Only the name is required."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "required": ["name"],
            "properties": {
                "name": { "type": "string", "description": "Organizer's display name" },
                "role": {
                    "type": "string",
                    "enum": ["organizer", "designer", "venue", "sponsor"]
                },
                "experience": {
                    "type": "string",
                    "enum": ["firstEvent", "emerging", "established"]
                }
            }
        })
    }

    fn handle(
        &self,
        args: serde_json::Value,
        session: &mut WizardSession,
    ) -> Result<Acknowledgement, ActionError> {
        let info: OrganizerInfo = serde_json::from_value(args).map_err(ValidationError::from)?;
        info.validate()?;

        let name = info.name.clone();
        session.set_organizer_info(info);
        session.set_stage(Stage::EventSetup)?;

        Ok(Acknowledgement {
            message: format!("Organizer profile saved for {name}. Next: the event itself."),
            stage: session.stage(),
        })
    }
}
