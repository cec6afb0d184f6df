//! Deserialized shape of a module's declarative YAML configuration.
//!
//! A module package declares its identity plus optional screens, forms,
//! workflows, actions, permissions, menu entries, and configurable
//! settings. The structs here mirror what the frontend consumes; the
//! backend only interprets workflows, actions, and configurables.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

/// Full module configuration assembled from `config.yaml` plus fragments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleConfig {
    pub module: ModuleIdentity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screens: Option<BTreeMap<String, ScreenConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forms: Option<BTreeMap<String, FormConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflows: Option<BTreeMap<String, WorkflowConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<BTreeMap<String, ActionConfig>>,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu: Option<Vec<MenuEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configurables: Option<BTreeMap<String, Value>>,
}

impl ModuleConfig {
    /// Declared module id; loader keys its result map by this, not by
    /// the directory name.
    pub fn id(&self) -> &str {
        &self.module.id
    }
}

/// Identity block every module must declare.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleIdentity {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenType {
    List,
    Detail,
    Form,
    Dashboard,
    Custom,
}

impl Default for ScreenType {
    fn default() -> Self {
        Self::Custom
    }
}

/// A navigable screen exposed by the module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenConfig {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub path: String,
    #[serde(rename = "type", default)]
    pub screen_type: ScreenType,
    #[serde(default = "default_true")]
    pub show_in_nav: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail_endpoint: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_config: Option<ListConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail_config: Option<DetailConfig>,
}

/// Column and paging hints for list screens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    pub columns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub searchable_fields: Option<Vec<String>>,
    #[serde(default)]
    pub sortable: bool,
    #[serde(default)]
    pub filterable: bool,
    #[serde(default)]
    pub paginated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_metadata: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<String>>,
}

/// A data-entry form with typed fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub fields: BTreeMap<String, FormFieldConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submit_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Email,
    Number,
    Decimal,
    Date,
    Datetime,
    Select,
    Checkbox,
    Textarea,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormFieldConfig {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub readonly: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SelectOption>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: Value,
    pub label: String,
}

/// A declared finite state machine for a business-object lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    pub title: String,
    pub initial_state: String,
    pub states: BTreeMap<String, WorkflowStateConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transitions: Option<BTreeMap<String, WorkflowTransition>>,
}

/// One state of a workflow; transition targets are validated only at
/// runtime by membership, an absent target simply rejects the move.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowStateConfig {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub can_transition_to: Vec<String>,
    #[serde(default = "default_true")]
    pub allow_edit: bool,
    #[serde(default)]
    pub allow_delete: bool,
}

/// Presentation metadata for a named transition button.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowTransition {
    #[serde(rename = "from")]
    pub from_state: String,
    #[serde(rename = "to")]
    pub to_state: String,
    pub label: String,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirm_message: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// A declared action: either plain API plumbing or a named custom
/// handler resolved through the action registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionConfig {
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuEntry {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_manifest_parses_with_defaults() {
        let config: ModuleConfig = serde_yaml::from_str(
            "module:\n  id: finance\n  name: Finance\n",
        )
        .expect("manifest parses");

        assert_eq!(config.id(), "finance");
        assert!(config.screens.is_none());
        assert!(config.permissions.is_empty());
    }

    #[test]
    fn workflow_state_defaults_allow_edit_but_not_delete() {
        let workflow: WorkflowConfig = serde_yaml::from_str(
            "title: Invoice Lifecycle\ninitial_state: draft\nstates:\n  draft:\n    label: Draft\n",
        )
        .expect("workflow parses");

        let draft = workflow.states.get("draft").expect("draft state");
        assert!(draft.allow_edit);
        assert!(!draft.allow_delete);
        assert!(draft.can_transition_to.is_empty());
    }

    #[test]
    fn missing_identity_block_is_a_parse_failure() {
        let result: Result<ModuleConfig, _> =
            serde_yaml::from_str("screens: {}\npermissions: []\n");
        assert!(result.is_err());
    }
}
