use serde::{Deserialize, Serialize};

/// One discrete step of the event-creation wizard.
/// Wire values are camelCase to match the persisted session format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    OrganizerSetup,
    EventSetup,
    TicketSetup,
    VenueSetup,
    PaymentSetup,
    ReviewPublish,
    Published,
    Dashboard,
}

impl Stage {
    /// Stage every fresh session starts at.
    pub const INITIAL: Stage = Stage::OrganizerSetup;

    /// The next stage along the linear spine of the wizard.
    /// `ReviewPublish` branches (publish vs save-draft) and has no single successor.
    pub fn next(&self) -> Option<Stage> {
        match self {
            Self::OrganizerSetup => Some(Self::EventSetup),
            Self::EventSetup => Some(Self::TicketSetup),
            Self::TicketSetup => Some(Self::VenueSetup),
            Self::VenueSetup => Some(Self::PaymentSetup),
            Self::PaymentSetup => Some(Self::ReviewPublish),
            Self::ReviewPublish | Self::Published | Self::Dashboard => None,
        }
    }

    /// Whether the edge `from -> to` exists in the wizard graph.
    /// The only edges are the forward spine, `reviewPublish -> published`,
    /// and the save-draft escape `reviewPublish -> dashboard`.
    pub fn allows_transition(from: Stage, to: Stage) -> bool {
        match from {
            Self::ReviewPublish => matches!(to, Self::Published | Self::Dashboard),
            _ => from.next() == Some(to),
        }
    }

    /// Terminal stages expose no action and cannot be left.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Published | Self::Dashboard)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OrganizerSetup => "organizerSetup",
            Self::EventSetup => "eventSetup",
            Self::TicketSetup => "ticketSetup",
            Self::VenueSetup => "venueSetup",
            Self::PaymentSetup => "paymentSetup",
            Self::ReviewPublish => "reviewPublish",
            Self::Published => "published",
            Self::Dashboard => "dashboard",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Stage {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "organizerSetup" => Ok(Self::OrganizerSetup),
            "eventSetup" => Ok(Self::EventSetup),
            "ticketSetup" => Ok(Self::TicketSetup),
            "venueSetup" => Ok(Self::VenueSetup),
            "paymentSetup" => Ok(Self::PaymentSetup),
            "reviewPublish" => Ok(Self::ReviewPublish),
            "published" => Ok(Self::Published),
            "dashboard" => Ok(Self::Dashboard),
            other => Err(format!("unknown stage: {other}")),
        }
    }
}
