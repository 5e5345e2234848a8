use chrono::Utc;
use serde::Deserialize;

use runway_core::actions::{Acknowledgement, StageAction};
use runway_core::errors::{ActionError, ValidationError};
use runway_core::ids::DraftId;
use runway_core::payloads::{
    PaymentMethod, PublishRecord, Sponsor, SponsorInfo, TicketInfo, VenueInfo,
};
use runway_core::session::WizardSession;
use runway_core::stage::Stage;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
enum ReviewDecision {
    Publish,
    SaveDraft,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewEventRequest {
    decision: ReviewDecision,
    /// Sponsors are recorded here if the organizer has any lined up;
    /// there is no dedicated sponsor stage.
    #[serde(default)]
    sponsors: Option<Vec<Sponsor>>,
}

/// Final stage: show the accumulated summary, then publish or save as draft.
/// Publishing is terminal; a saved draft exits to the dashboard.
pub struct ReviewEventAction;

impl StageAction for ReviewEventAction {
    fn name(&self) -> &str {
        "reviewEvent"
    }

    fn stage(&self) -> Stage {
        Stage::ReviewPublish
    }

    fn description(&self) -> &str {
        "Review the accumulated event summary, then publish or save as draft"
    }

    fn instructions(&self) -> &str {
        "Read the event summary back to the user: title, ticket pricing, \
         venue, and payment setup. Ask whether to publish now or save as a \
         draft to finish later from the dashboard. If sponsors are already \
         lined up, they can be recorded here too. Publishing is final — the \
         wizard does not reopen afterwards."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "required": ["decision"],
            "properties": {
                "decision": { "type": "string", "enum": ["publish", "saveDraft"] },
                "sponsors": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "required": ["name"],
                        "properties": {
                            "name": { "type": "string" },
                            "tier": {
                                "type": "string",
                                "enum": ["title", "gold", "silver", "community"]
                            }
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
        let request: ReviewEventRequest =
            serde_json::from_value(args).map_err(ValidationError::from)?;

        if let Some(sponsors) = request.sponsors {
            let info = SponsorInfo { sponsors };
            info.validate()?;
            session.set_sponsor_info(info);
        }

        let summary = summarize(session);
        match request.decision {
            ReviewDecision::Publish => {
                session.set_event_published(PublishRecord {
                    draft_id: DraftId::new(),
                    published_at: Utc::now().to_rfc3339(),
                });
                session.set_stage(Stage::Published)?;
                Ok(Acknowledgement {
                    message: format!("{summary}\nYour event is live. Congratulations!"),
                    stage: session.stage(),
                })
            }
            ReviewDecision::SaveDraft => {
                session.set_stage(Stage::Dashboard)?;
                Ok(Acknowledgement {
                    message: format!(
                        "{summary}\nSaved as a draft — pick it up any time from the dashboard."
                    ),
                    stage: session.stage(),
                })
            }
        }
    }
}

/// One-paragraph recap of everything the wizard collected.
fn summarize(session: &WizardSession) -> String {
    let title = session
        .event_info
        .as_ref()
        .map(|e| e.title.as_str())
        .unwrap_or("Untitled event");
    let tickets = match &session.ticket_info {
        Some(TicketInfo::Simple { .. }) => "simple pricing".to_string(),
        Some(TicketInfo::Tiered { tiers }) => format!("{} ticket tiers", tiers.len()),
        Some(TicketInfo::Free { .. }) => "free entry".to_string(),
        None => "tickets not configured".to_string(),
    };
    let venue = match &session.venue_info {
        Some(VenueInfo::Physical { .. }) => "physical venue",
        Some(VenueInfo::Virtual { .. }) => "virtual venue",
        Some(VenueInfo::Hybrid { .. }) => "hybrid venue",
        None => "venue not selected",
    };
    let payments = match &session.payment_method {
        Some(PaymentMethod::Connected { .. }) => "payments account connected",
        Some(PaymentMethod::Manual) => "manual payment handling",
        None => "payments not set up",
    };
    format!("{title}: {tickets}, {venue}, {payments}.")
}
