use std::collections::BTreeMap;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::{error, warn};

/// Context handed to every action handler for one invocation.
///
/// Immutable once constructed; `data` carries the untyped request
/// payload and `metadata` ambient context such as the caller's
/// permission set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionContext {
    pub user_id: i64,
    pub company_id: i64,
    #[serde(default)]
    pub data: BTreeMap<String, JsonValue>,
    #[serde(default)]
    pub metadata: BTreeMap<String, JsonValue>,
}

/// Uniform return contract for every registered action handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
}

impl ActionResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            redirect_to: None,
        }
    }

    pub fn ok_with_data(message: impl Into<String>, data: JsonValue) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            redirect_to: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            redirect_to: None,
        }
    }
}

/// Failure raised inside an action handler. The registry converts these
/// into failed `ActionResult`s at the execution boundary; handlers never
/// surface errors to callers directly.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ActionError(pub String);

impl ActionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub type ActionFuture = Pin<Box<dyn Future<Output = Result<ActionResult, ActionError>> + Send>>;
pub type ActionHandler = Arc<dyn Fn(ActionContext) -> ActionFuture + Send + Sync>;

/// Process-wide mapping from `"<module>.<action>"` to async handlers.
///
/// Registration happens once at startup, before request traffic begins;
/// after that the registry is only read, so no interior locking is
/// needed for concurrent `execute` calls.
#[derive(Default)]
pub struct ActionRegistry {
    handlers: HashMap<String, ActionHandler>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under its fully qualified name. Collisions
    /// resolve last-write-wins, with a warning so shadowing is visible.
    pub fn register<F>(&mut self, full_name: impl Into<String>, handler: F)
    where
        F: Fn(ActionContext) -> ActionFuture + Send + Sync + 'static,
    {
        let full_name = full_name.into();
        if self
            .handlers
            .insert(full_name.clone(), Arc::new(handler))
            .is_some()
        {
            warn!(action = %full_name, "action handler re-registered; previous handler shadowed");
        }
    }

    /// Bulk-register a module's action table, namespacing each name
    /// under `<module_id>.`.
    pub fn register_module_actions(
        &mut self,
        module_id: &str,
        actions: Vec<(String, ActionHandler)>,
    ) {
        for (action_name, handler) in actions {
            let full_name = format!("{module_id}.{action_name}");
            if self.handlers.insert(full_name.clone(), handler).is_some() {
                warn!(action = %full_name, "action handler re-registered; previous handler shadowed");
            }
        }
    }

    pub fn get(&self, full_name: &str) -> Option<&ActionHandler> {
        self.handlers.get(full_name)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Look up and invoke a handler, reporting every failure as data.
    ///
    /// An unknown name and a handler error both come back as
    /// `success = false` so callers always branch on the flag instead of
    /// handling errors. Handler failures are logged with the full error
    /// before being flattened into the client-visible message.
    pub async fn execute(&self, action_name: &str, context: ActionContext) -> ActionResult {
        let handler = match self.get(action_name) {
            Some(handler) => Arc::clone(handler),
            None => {
                return ActionResult::failure(format!("Action '{action_name}' not found"));
            }
        };

        match handler(context).await {
            Ok(result) => result,
            Err(err) => {
                error!(action = %action_name, error = %err, "action handler failed");
                ActionResult::failure(format!("Action failed: {err}"))
            }
        }
    }
}
