use runway_core::errors::{ActionError, StateError, ValidationError};
use runway_store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("state error: {0}")]
    State(#[from] StateError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl From<ActionError> for WizardError {
    fn from(e: ActionError) -> Self {
        match e {
            ActionError::Validation(v) => Self::Validation(v),
            ActionError::State(s) => Self::State(s),
        }
    }
}

impl WizardError {
    /// Validation and state errors resolve locally: the caller re-prompts
    /// the same stage. Only store errors indicate trouble beyond the turn.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::State(_))
    }

    /// Short classification string for logging.
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::Validation(e) => e.error_kind(),
            Self::State(e) => e.error_kind(),
            Self::Store(_) => "store",
        }
    }
}
