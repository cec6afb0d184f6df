use super::manifest::{WorkflowConfig, WorkflowStateConfig};

/// Raised when an engine would start (or resume) in an undeclared state.
///
/// This is the one construction-time failure that is deliberately fatal:
/// a state machine with an undefined current state cannot answer any
/// question correctly, so it must never come into existence.
#[derive(Debug, thiserror::Error)]
#[error("workflow '{workflow}' has no declared state '{state}'")]
pub struct InvalidWorkflowConfig {
    pub workflow: String,
    pub state: String,
}

/// Evaluates one workflow state machine for one business object.
///
/// The engine tracks a mutable current state and answers transition and
/// edit/delete questions from the declared configuration. It performs no
/// I/O and is not persisted; callers store the resulting state string
/// themselves and `resume` later.
#[derive(Debug, Clone)]
pub struct WorkflowEngine {
    config: WorkflowConfig,
    current_state: String,
}

impl WorkflowEngine {
    /// Start a fresh engine at the workflow's declared initial state.
    pub fn new(config: WorkflowConfig) -> Result<Self, InvalidWorkflowConfig> {
        let initial = config.initial_state.clone();
        Self::resume(config, &initial)
    }

    /// Resume an engine at a previously persisted state.
    pub fn resume(config: WorkflowConfig, state: &str) -> Result<Self, InvalidWorkflowConfig> {
        if !config.states.contains_key(state) {
            return Err(InvalidWorkflowConfig {
                workflow: config.title.clone(),
                state: state.to_string(),
            });
        }
        Ok(Self {
            config,
            current_state: state.to_string(),
        })
    }

    pub fn current_state(&self) -> &str {
        &self.current_state
    }

    pub fn current_state_config(&self) -> Option<&WorkflowStateConfig> {
        self.config.states.get(&self.current_state)
    }

    /// True iff the candidate appears in the current state's transition
    /// list and is itself a declared state. A target listed but never
    /// declared degrades to "not allowed" rather than an error.
    pub fn can_transition_to(&self, candidate: &str) -> bool {
        if !self.config.states.contains_key(candidate) {
            return false;
        }
        match self.current_state_config() {
            Some(state) => state
                .can_transition_to
                .iter()
                .any(|target| target == candidate),
            None => false,
        }
    }

    /// Attempt the transition; on success mutate the current state.
    ///
    /// Invalid moves are signalled by `false`, never by an error, so
    /// calling code can render a user-facing message instead of failing.
    pub fn transition(&mut self, candidate: &str) -> bool {
        if self.can_transition_to(candidate) {
            self.current_state = candidate.to_string();
            true
        } else {
            false
        }
    }

    pub fn can_edit(&self) -> bool {
        self.current_state_config()
            .map(|state| state.allow_edit)
            .unwrap_or(false)
    }

    pub fn can_delete(&self) -> bool {
        self.current_state_config()
            .map(|state| state.allow_delete)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approval_workflow() -> WorkflowConfig {
        serde_yaml::from_str(
            r#"
title: Approval
initial_state: draft
states:
  draft:
    label: Draft
    can_transition_to: [pending]
    allow_edit: true
    allow_delete: true
  pending:
    label: Pending Approval
    can_transition_to: [approved, draft]
    allow_edit: false
  approved:
    label: Approved
    can_transition_to: []
    allow_edit: false
"#,
        )
        .expect("workflow yaml parses")
    }

    #[test]
    fn construction_fails_fast_on_undeclared_initial_state() {
        let mut config = approval_workflow();
        config.initial_state = "archived".to_string();
        let err = WorkflowEngine::new(config).expect_err("undeclared initial state");
        assert_eq!(err.state, "archived");
    }

    #[test]
    fn guarded_transitions_walk_the_declared_graph() {
        let mut engine = WorkflowEngine::new(approval_workflow()).expect("engine builds");
        assert_eq!(engine.current_state(), "draft");

        assert!(!engine.can_transition_to("approved"));
        assert!(!engine.transition("approved"));
        assert_eq!(engine.current_state(), "draft");

        assert!(engine.transition("pending"));
        assert_eq!(engine.current_state(), "pending");

        // Symmetric reject path back to draft.
        assert!(engine.transition("draft"));
        assert_eq!(engine.current_state(), "draft");

        assert!(engine.transition("pending"));
        assert!(engine.transition("approved"));

        // Empty transition list means implicitly terminal.
        for candidate in ["draft", "pending", "approved"] {
            assert!(!engine.can_transition_to(candidate));
        }
    }

    #[test]
    fn edit_and_delete_flags_follow_the_current_state() {
        let mut engine = WorkflowEngine::new(approval_workflow()).expect("engine builds");
        assert!(engine.can_edit());
        assert!(engine.can_delete());

        engine.transition("pending");
        assert!(!engine.can_edit());
        assert!(!engine.can_delete());
    }

    #[test]
    fn transition_to_undeclared_target_is_rejected_not_erred() {
        let mut config = approval_workflow();
        config
            .states
            .get_mut("draft")
            .expect("draft state")
            .can_transition_to
            .push("limbo".to_string());

        let mut engine = WorkflowEngine::new(config).expect("engine builds");
        // "limbo" is listed as a target but never declared as a state;
        // the move is rejected without mutating or erring.
        assert!(!engine.can_transition_to("limbo"));
        assert!(!engine.transition("limbo"));
        assert_eq!(engine.current_state(), "draft");
    }

    #[test]
    fn resume_validates_the_persisted_state() {
        let engine =
            WorkflowEngine::resume(approval_workflow(), "pending").expect("resume succeeds");
        assert_eq!(engine.current_state(), "pending");

        WorkflowEngine::resume(approval_workflow(), "bogus").expect_err("unknown state rejected");
    }
}
