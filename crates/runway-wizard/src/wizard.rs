use std::sync::Arc;

use tracing::instrument;

use runway_core::actions::{Acknowledgement, StagePrompt};
use runway_core::errors::StateError;
use runway_core::ids::SessionId;
use runway_core::session::WizardSession;
use runway_core::stage::Stage;
use runway_store::SessionRepo;
use runway_telemetry::{MonitoringSink, WizardMonitor};

use crate::error::WizardError;
use crate::registry::StageRegistry;

/// Drives one wizard session: holds the state container, resolves the single
/// enabled action from the current stage, and keeps persistence and the
/// monitoring tap in step with every transition.
///
/// The dispatch contract is a pure function of `(session, action name,
/// payload)`; how the caller decides which action to invoke — a
/// conversational agent, a test, a stdin harness — is outside this type.
pub struct Wizard {
    session: WizardSession,
    registry: Arc<StageRegistry>,
    repo: Option<SessionRepo>,
    monitor: WizardMonitor,
}

impl Wizard {
    /// Begin a fresh session.
    pub fn start(
        registry: Arc<StageRegistry>,
        sink: Arc<dyn MonitoringSink>,
        repo: Option<SessionRepo>,
    ) -> Result<Self, WizardError> {
        let session = WizardSession::new();
        if let Some(repo) = &repo {
            repo.create(&session)?;
        }
        let monitor = WizardMonitor::start(sink, session.session_id.clone(), session.stage());
        Ok(Self {
            session,
            registry,
            repo,
            monitor,
        })
    }

    /// Resume a persisted session mid-wizard.
    pub fn resume(
        registry: Arc<StageRegistry>,
        sink: Arc<dyn MonitoringSink>,
        repo: SessionRepo,
        id: &SessionId,
    ) -> Result<Self, WizardError> {
        let session = repo.get(id)?;
        let monitor = WizardMonitor::resume(sink, session.session_id.clone(), session.stage());
        Ok(Self {
            session,
            registry,
            repo: Some(repo),
            monitor,
        })
    }

    pub fn session(&self) -> &WizardSession {
        &self.session
    }

    pub fn stage(&self) -> Stage {
        self.session.stage()
    }

    /// What the agent should see right now: the active stage's instructions
    /// and its one invokable action. None once the wizard is terminal.
    pub fn current_prompt(&self) -> Option<StagePrompt> {
        self.registry.prompt_for(self.session.stage())
    }

    /// Dispatch a named action with its payload.
    ///
    /// The current stage is the sole gate: only its action is invokable.
    /// On success the handler has already written the payload slot and
    /// transitioned the stage; this method then records the transition with
    /// the monitor, persists the session, and hands back the acknowledgement.
    /// On any error the session is exactly as it was.
    #[instrument(skip(self, args), fields(session_id = %self.session.session_id, action = name, stage = %self.session.stage()))]
    pub fn handle_action(
        &mut self,
        name: &str,
        args: serde_json::Value,
    ) -> Result<Acknowledgement, WizardError> {
        let stage = self.session.stage();
        let action = self
            .registry
            .action_for(stage)
            .ok_or(StateError::TerminalStage(stage))?;

        if action.name() != name {
            let err = if self.registry.knows_action(name) {
                StateError::ActionNotEnabled { action: name.to_string(), stage }
            } else {
                StateError::UnknownAction(name.to_string())
            };
            return Err(err.into());
        }

        let ack = action.handle(args, &mut self.session)?;

        // Monitor before persistence: the tap can never fail, the store can.
        self.monitor.stage_changed(self.session.stage());
        if let Some(repo) = &self.repo {
            repo.save(&self.session)?;
        }
        Ok(ack)
    }

    /// Re-persist the current state (e.g. after a transient store failure).
    pub fn save(&self) -> Result<(), WizardError> {
        if let Some(repo) = &self.repo {
            repo.save(&self.session)?;
        }
        Ok(())
    }

    /// Discard everything: new session id, initial stage, empty slots.
    /// The persisted row for the old session is removed.
    pub fn reset(&mut self) -> Result<(), WizardError> {
        let old_id = self.session.session_id.clone();
        self.session.reset();
        self.monitor.session_reset(self.session.session_id.clone());
        if let Some(repo) = &self.repo {
            repo.delete(&old_id)?;
            repo.create(&self.session)?;
        }
        Ok(())
    }
}
