pub mod error;
pub mod registry;
pub mod stages;
pub mod wizard;

pub use error::WizardError;
pub use registry::StageRegistry;
pub use wizard::Wizard;
