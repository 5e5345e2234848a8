use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::ids::DraftId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrganizerRole {
    Organizer,
    Designer,
    Venue,
    Sponsor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExperienceLevel {
    FirstEvent,
    Emerging,
    Established,
}

/// Organizer identity collected at the first stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizerInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<OrganizerRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<ExperienceLevel>,
}

impl OrganizerInfo {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "name",
                detail: "must not be empty".into(),
            });
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventType {
    RunwayShow,
    TrunkShow,
    PopUpShop,
    Exhibition,
    Gala,
}

/// Core event details. Only the title is mandatory at this stage;
/// scheduling can be firmed up from the dashboard later.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInfo {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<EventType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NaiveTime>,
}

impl EventInfo {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "title",
                detail: "must not be empty".into(),
            });
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketTier {
    pub name: String,
    pub price_cents: u32,
    pub quantity: u32,
}

/// Ticket pricing model. Tagged on `type` to match the action payload wire format.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TicketInfo {
    #[serde(rename_all = "camelCase")]
    Simple {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        price_cents: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        capacity: Option<u32>,
    },
    Tiered { tiers: Vec<TicketTier> },
    #[serde(rename_all = "camelCase")]
    Free {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        capacity: Option<u32>,
    },
}

impl TicketInfo {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::Simple { .. } | Self::Free { .. } => Ok(()),
            Self::Tiered { tiers } => {
                if tiers.is_empty() {
                    return Err(ValidationError::InvalidValue {
                        field: "tiers",
                        detail: "at least one tier is required".into(),
                    });
                }
                for tier in tiers {
                    if tier.name.trim().is_empty() {
                        return Err(ValidationError::InvalidValue {
                            field: "tiers",
                            detail: "tier name must not be empty".into(),
                        });
                    }
                    if tier.quantity == 0 {
                        return Err(ValidationError::InvalidValue {
                            field: "tiers",
                            detail: format!("tier {} has zero quantity", tier.name),
                        });
                    }
                }
                Ok(())
            }
        }
    }
}

/// Venue choice: physical, virtual, or hybrid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum VenueInfo {
    Physical {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        address: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Virtual {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        platform: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stream_url: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Hybrid {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        address: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stream_url: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SponsorTier {
    Title,
    Gold,
    Silver,
    Community,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sponsor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<SponsorTier>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorInfo {
    pub sponsors: Vec<Sponsor>,
}

impl SponsorInfo {
    pub fn validate(&self) -> Result<(), ValidationError> {
        for sponsor in &self.sponsors {
            if sponsor.name.trim().is_empty() {
                return Err(ValidationError::InvalidValue {
                    field: "sponsors",
                    detail: "sponsor name must not be empty".into(),
                });
            }
        }
        Ok(())
    }
}

/// How the organizer will take payment. `manual` means no connected account:
/// the organizer settles ticket sales outside the platform.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PaymentMethod {
    #[serde(rename_all = "camelCase")]
    Connected { account_id: String },
    Manual,
}

/// Written when the review stage publishes the event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishRecord {
    pub draft_id: DraftId,
    pub published_at: String,
}
