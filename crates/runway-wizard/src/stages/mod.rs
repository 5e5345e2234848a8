pub mod event;
pub mod organizer;
pub mod payments;
pub mod review;
pub mod tickets;
pub mod venue;

use std::sync::Arc;

use crate::registry::StageRegistry;

/// Registry wired with every stage of the event-creation wizard.
pub fn default_registry() -> StageRegistry {
    let mut registry = StageRegistry::new();
    registry.register(Arc::new(organizer::SetupOrganizerAction));
    registry.register(Arc::new(event::ConfigureEventAction));
    registry.register(Arc::new(tickets::ConfigureTicketsAction));
    registry.register(Arc::new(venue::SelectVenueAction));
    registry.register(Arc::new(payments::ConnectPaymentsAction));
    registry.register(Arc::new(review::ReviewEventAction));
    registry
}
