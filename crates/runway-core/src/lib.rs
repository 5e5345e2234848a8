pub mod actions;
pub mod errors;
pub mod events;
pub mod ids;
pub mod payloads;
pub mod session;
pub mod stage;
