use crate::stage::Stage;

/// Payload problems detected before any session mutation.
/// A validation failure always leaves the session on its current stage.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("malformed payload: {0}")]
    Malformed(String),
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("invalid value for {field}: {detail}")]
    InvalidValue { field: &'static str, detail: String },
    #[error("payload must not contain {0}")]
    ForbiddenField(&'static str),
}

impl ValidationError {
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "malformed",
            Self::MissingField(_) => "missing_field",
            Self::InvalidValue { .. } => "invalid_value",
            Self::ForbiddenField(_) => "forbidden_field",
        }
    }
}

impl From<serde_json::Error> for ValidationError {
    fn from(e: serde_json::Error) -> Self {
        ValidationError::Malformed(e.to_string())
    }
}

/// Stage-invariant violations, rejected at the state-container boundary.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum StateError {
    #[error("no transition from {from} to {to}")]
    InvalidTransition { from: Stage, to: Stage },
    #[error("action {action} is not enabled at stage {stage}")]
    ActionNotEnabled { action: String, stage: Stage },
    #[error("unknown action: {0}")]
    UnknownAction(String),
    #[error("stage {0} is terminal; no action is enabled")]
    TerminalStage(Stage),
}

impl StateError {
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::ActionNotEnabled { .. } => "action_not_enabled",
            Self::UnknownAction(_) => "unknown_action",
            Self::TerminalStage(_) => "terminal_stage",
        }
    }
}

/// Errors an action handler can surface. Both variants resolve locally:
/// the caller re-prompts the same stage and the wizard never advances.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum ActionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    State(#[from] StateError),
}

impl ActionError {
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::Validation(e) => e.error_kind(),
            Self::State(e) => e.error_kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_display() {
        let err = ValidationError::MissingField("name");
        assert_eq!(err.to_string(), "missing field: name");

        let err = ValidationError::InvalidValue {
            field: "title",
            detail: "must not be empty".into(),
        };
        assert_eq!(err.to_string(), "invalid value for title: must not be empty");
    }

    #[test]
    fn state_display() {
        let err = StateError::InvalidTransition {
            from: Stage::OrganizerSetup,
            to: Stage::Published,
        };
        assert_eq!(err.to_string(), "no transition from organizerSetup to published");

        let err = StateError::ActionNotEnabled {
            action: "reviewEvent".into(),
            stage: Stage::TicketSetup,
        };
        assert!(err.to_string().contains("ticketSetup"));
    }

    #[test]
    fn serde_error_maps_to_malformed() {
        let parse_err = serde_json::from_str::<u32>("not a number").unwrap_err();
        let err: ValidationError = parse_err.into();
        assert_eq!(err.error_kind(), "malformed");
    }

    #[test]
    fn error_kind_strings() {
        assert_eq!(
            StateError::UnknownAction("x".into()).error_kind(),
            "unknown_action"
        );
        assert_eq!(
            StateError::TerminalStage(Stage::Published).error_kind(),
            "terminal_stage"
        );
        let err: ActionError = ValidationError::ForbiddenField("cardNumber").into();
        assert_eq!(err.error_kind(), "forbidden_field");
    }
}
