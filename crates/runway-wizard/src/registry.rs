use std::collections::HashMap;
use std::sync::Arc;

use runway_core::actions::{ActionDefinition, StageAction, StagePrompt};
use runway_core::stage::Stage;

/// Dispatch table from stage to its single exposed action. The enum key is
/// the whole gating mechanism: a stage with no entry (the terminal stages)
/// simply has nothing to invoke, and no two actions can be live at once.
pub struct StageRegistry {
    actions: HashMap<Stage, Arc<dyn StageAction>>,
}

impl StageRegistry {
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }

    /// Register an action under its own stage. One action per stage;
    /// a second registration for the same stage replaces the first.
    pub fn register(&mut self, action: Arc<dyn StageAction>) {
        self.actions.insert(action.stage(), action);
    }

    /// The action enabled at `stage`, if any. Terminal stages return None.
    pub fn action_for(&self, stage: Stage) -> Option<Arc<dyn StageAction>> {
        self.actions.get(&stage).map(Arc::clone)
    }

    /// The prompt (instructions + action definition) the agent sees at `stage`.
    pub fn prompt_for(&self, stage: Stage) -> Option<StagePrompt> {
        self.actions.get(&stage).map(|a| a.to_prompt())
    }

    /// Whether any registered action carries this name, at any stage.
    /// Used to distinguish "wrong stage" from "no such action".
    pub fn knows_action(&self, name: &str) -> bool {
        self.actions.values().any(|a| a.name() == name)
    }

    /// All registered action definitions, sorted by name.
    pub fn definitions(&self) -> Vec<ActionDefinition> {
        let mut defs: Vec<ActionDefinition> =
            self.actions.values().map(|a| a.to_definition()).collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    pub fn count(&self) -> usize {
        self.actions.len()
    }
}

impl Default for StageRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages;

    #[test]
    fn default_registry_covers_every_active_stage() {
        let registry = stages::default_registry();
        assert_eq!(registry.count(), 6);
        for stage in [
            Stage::OrganizerSetup,
            Stage::EventSetup,
            Stage::TicketSetup,
            Stage::VenueSetup,
            Stage::PaymentSetup,
            Stage::ReviewPublish,
        ] {
            let action = registry.action_for(stage).expect("stage has an action");
            assert_eq!(action.stage(), stage);
        }
    }

    #[test]
    fn terminal_stages_have_no_action() {
        let registry = stages::default_registry();
        assert!(registry.action_for(Stage::Published).is_none());
        assert!(registry.action_for(Stage::Dashboard).is_none());
        assert!(registry.prompt_for(Stage::Published).is_none());
    }

    #[test]
    fn action_names_match_protocol() {
        let registry = stages::default_registry();
        let names: Vec<String> = registry.definitions().iter().map(|d| d.name.clone()).collect();
        assert_eq!(
            names,
            vec![
                "configureEvent",
                "configureTickets",
                "connectPayments",
                "reviewEvent",
                "selectVenue",
                "setupOrganizer",
            ]
        );
    }

    #[test]
    fn knows_action_spans_all_stages() {
        let registry = stages::default_registry();
        assert!(registry.knows_action("reviewEvent"));
        assert!(!registry.knows_action("deleteEverything"));
    }

    #[test]
    fn prompt_carries_instructions() {
        let registry = stages::default_registry();
        let prompt = registry.prompt_for(Stage::PaymentSetup).unwrap();
        assert_eq!(prompt.action.name, "connectPayments");
        assert!(!prompt.instructions.is_empty());
    }
}
