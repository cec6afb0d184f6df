//! YAML-driven module system: manifest model, config loading and
//! merging, workflow state machines, action dispatch, and the registry
//! orchestrating discovery at startup.

pub mod actions;
pub mod loader;
pub mod manifest;
pub mod merge;
pub mod registry;
pub mod router;
pub mod settings;
pub mod status;
pub mod workflow;

pub use actions::{ActionContext, ActionError, ActionFuture, ActionHandler, ActionRegistry, ActionResult};
pub use loader::{ConfigError, ModuleConfigLoader};
pub use manifest::{ModuleConfig, ModuleIdentity, WorkflowConfig, WorkflowStateConfig};
pub use merge::deep_merge;
pub use registry::{ModuleHooks, ModuleRegistry};
pub use settings::{merged_configurables, ModuleSettingsStore, SettingsError};
pub use status::{
    is_system_module, ModuleStatusRecord, ModuleStatusStore, StatusStoreError, SYSTEM_MODULES,
};
pub use workflow::{InvalidWorkflowConfig, WorkflowEngine};
