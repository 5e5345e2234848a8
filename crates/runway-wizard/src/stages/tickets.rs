use runway_core::actions::{Acknowledgement, StageAction};
use runway_core::errors::{ActionError, ValidationError};
use runway_core::payloads::TicketInfo;
use runway_core::session::WizardSession;
use runway_core::stage::Stage;

/// Third stage: pricing model. All three models land on the same next stage.
pub struct ConfigureTicketsAction;

impl StageAction for ConfigureTicketsAction {
    fn name(&self) -> &str {
        "configureTickets"
    }

    fn stage(&self) -> Stage {
        Stage::TicketSetup
    }

    fn description(&self) -> &str {
        "Choose the ticket pricing model: simple, tiered, or free"
    }

    fn instructions(&self) -> &str {
        "Ask how tickets should work: a single price for everyone (simple), \
         multiple tiers such as front row and general admission (tiered), or \
         free entry. Prices are in cents. For tiered pricing, collect a name, \
         price, and quantity per tier."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "required": ["type"],
            "properties": {
                "type": { "type": "string", "enum": ["simple", "tiered", "free"] },
                "priceCents": { "type": "integer", "minimum": 0 },
                "capacity": { "type": "integer", "minimum": 1 },
                "tiers": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "required": ["name", "priceCents", "quantity"],
                        "properties": {
                            "name": { "type": "string" },
                            "priceCents": { "type": "integer", "minimum": 0 },
                            "quantity": { "type": "integer", "minimum": 1 }
                        }
                    }
                }
            }
        })
    }

    fn handle(
        &self,
        args: serde_json::Value,
        session: &mut WizardSession,
    ) -> Result<Acknowledgement, ActionError> {
        let info: TicketInfo = serde_json::from_value(args).map_err(ValidationError::from)?;
        info.validate()?;

        let model = match &info {
            TicketInfo::Simple { .. } => "simple pricing",
            TicketInfo::Tiered { .. } => "tiered pricing",
            TicketInfo::Free { .. } => "free entry",
        };
        session.set_ticket_info(info);
        session.set_stage(Stage::VenueSetup)?;

        Ok(Acknowledgement {
            message: format!("Tickets configured with {model}. Where will the event happen?"),
            stage: session.stage(),
        })
    }
}
