use serde::{Deserialize, Serialize};

use crate::errors::ActionError;
use crate::session::WizardSession;
use crate::stage::Stage;

/// Action definition surfaced to the conversational agent as part of the
/// active stage's context.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActionDefinition {
    pub name: String,
    pub description: String,
    pub parameters_schema: serde_json::Value,
}

/// What the agent sees for the currently active stage: the stage's
/// natural-language instructions and the single action it may invoke.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StagePrompt {
    pub stage: Stage,
    pub instructions: String,
    pub action: ActionDefinition,
}

/// Sent back to the agent after an action succeeds. Emitted strictly after
/// the payload write and the stage transition.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub message: String,
    pub stage: Stage,
}

/// Trait implemented by each stage controller's action.
///
/// Handlers follow a fixed order: parse and validate the payload (no mutation
/// on failure), write the payload slot, transition the stage, then return the
/// acknowledgement — so any observer reacting to the stage change already
/// sees the updated payload.
pub trait StageAction: Send + Sync {
    fn name(&self) -> &str;
    fn stage(&self) -> Stage;
    fn description(&self) -> &str;
    fn instructions(&self) -> &str;
    fn parameters_schema(&self) -> serde_json::Value;

    fn handle(
        &self,
        args: serde_json::Value,
        session: &mut WizardSession,
    ) -> Result<Acknowledgement, ActionError>;

    fn to_definition(&self) -> ActionDefinition {
        ActionDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters_schema: self.parameters_schema(),
        }
    }

    fn to_prompt(&self) -> StagePrompt {
        StagePrompt {
            stage: self.stage(),
            instructions: self.instructions().to_string(),
            action: self.to_definition(),
        }
    }
}
