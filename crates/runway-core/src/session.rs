use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::StateError;
use crate::ids::SessionId;
use crate::payloads::{
    EventInfo, OrganizerInfo, PaymentMethod, PublishRecord, SponsorInfo, TicketInfo, VenueInfo,
};
use crate::stage::Stage;

/// The wizard's single source of truth: current stage, session identity, and
/// the per-stage payload slots accumulated so far. This struct is the unit of
/// persistence — its serde form is exactly what a resumed session deserializes to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardSession {
    pub session_id: SessionId,
    stage: Stage,
    pub organizer_info: Option<OrganizerInfo>,
    pub event_info: Option<EventInfo>,
    pub ticket_info: Option<TicketInfo>,
    pub venue_info: Option<VenueInfo>,
    pub sponsor_info: Option<SponsorInfo>,
    pub payment_method: Option<PaymentMethod>,
    pub event_published: Option<PublishRecord>,
    pub created_at: String,
    pub updated_at: String,
}

impl WizardSession {
    pub fn new() -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            session_id: SessionId::new(),
            stage: Stage::INITIAL,
            organizer_info: None,
            event_info: None,
            ticket_info: None,
            venue_info: None,
            sponsor_info: None,
            payment_method: None,
            event_published: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Transition to `to`. Any edge not in the wizard graph is rejected here,
    /// at the container boundary — stage controllers cannot skip ahead, loop
    /// back, or leave a terminal stage.
    pub fn set_stage(&mut self, to: Stage) -> Result<(), StateError> {
        if !Stage::allows_transition(self.stage, to) {
            return Err(StateError::InvalidTransition { from: self.stage, to });
        }
        self.stage = to;
        self.touch();
        Ok(())
    }

    /// Clear every slot, return to the initial stage, and issue a fresh
    /// session id. The only way a session id ever changes.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn set_organizer_info(&mut self, info: OrganizerInfo) {
        self.organizer_info = Some(info);
        self.touch();
    }

    pub fn set_event_info(&mut self, info: EventInfo) {
        self.event_info = Some(info);
        self.touch();
    }

    pub fn set_ticket_info(&mut self, info: TicketInfo) {
        self.ticket_info = Some(info);
        self.touch();
    }

    pub fn set_venue_info(&mut self, info: VenueInfo) {
        self.venue_info = Some(info);
        self.touch();
    }

    pub fn set_sponsor_info(&mut self, info: SponsorInfo) {
        self.sponsor_info = Some(info);
        self.touch();
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment_method = Some(method);
        self.touch();
    }

    pub fn set_event_published(&mut self, record: PublishRecord) {
        self.event_published = Some(record);
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now().to_rfc3339();
    }
}

impl Default for WizardSession {
    fn default() -> Self {
        Self::new()
    }
}
