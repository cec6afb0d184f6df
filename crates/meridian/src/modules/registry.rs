use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use super::actions::ActionRegistry;
use super::loader::{is_module_dir_name, ConfigError, ModuleConfigLoader};
use super::manifest::ModuleConfig;
use super::status::{is_system_module, ModuleStatusRecord, ModuleStatusStore, StatusStoreError};

/// Compiled-in pieces a module can contribute beyond its YAML config:
/// an HTTP router and an action-registration entrypoint. Both optional;
/// a pure-YAML module contributes neither.
#[derive(Default)]
pub struct ModuleHooks {
    pub router: Option<axum::Router>,
    pub register_actions: Option<Box<dyn Fn(&mut ActionRegistry) + Send + Sync>>,
}

/// Central registry orchestrating module discovery and registration.
///
/// `initialize` walks the modules directory once at startup; afterwards
/// the registry is read-only apart from status writes, which go through
/// the injected status store.
pub struct ModuleRegistry {
    configs: BTreeMap<String, ModuleConfig>,
    routers: HashMap<String, axum::Router>,
    hooks: HashMap<String, ModuleHooks>,
    status_store: Arc<dyn ModuleStatusStore>,
    initialized: bool,
}

impl ModuleRegistry {
    pub fn new(status_store: Arc<dyn ModuleStatusStore>) -> Self {
        Self {
            configs: BTreeMap::new(),
            routers: HashMap::new(),
            hooks: HashMap::new(),
            status_store,
            initialized: false,
        }
    }

    /// Attach compiled-in hooks for a module before `initialize` runs.
    pub fn with_hooks(mut self, module_name: impl Into<String>, hooks: ModuleHooks) -> Self {
        self.hooks.insert(module_name.into(), hooks);
        self
    }

    /// List module directory names under `root`, excluding reserved and
    /// dot/underscore-prefixed names, sorted for determinism.
    pub fn discover_modules(root: &Path) -> Vec<String> {
        let entries = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.path().is_dir())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| is_module_dir_name(name))
            .collect();
        names.sort();
        names
    }

    /// Load one module: register its router hook, load its YAML config,
    /// and invoke its action entrypoint. Each step is independent and
    /// best-effort; a missing optional piece is silently skipped and an
    /// unexpected error is logged without blocking the remaining steps.
    pub fn load_module(&mut self, module_name: &str, root: &Path, actions: &mut ActionRegistry) {
        info!(module = %module_name, "loading module");

        if let Some(hooks) = self.hooks.get(module_name) {
            if let Some(router) = &hooks.router {
                self.routers.insert(module_name.to_string(), router.clone());
                info!(module = %module_name, "registered router");
            }
        }

        match ModuleConfigLoader::load(&root.join(module_name)) {
            Ok(config) => {
                let id = config.id().to_string();
                if self.configs.insert(id.clone(), config).is_some() {
                    warn!(module_id = %id, "duplicate module id; last-loaded config wins");
                }
                info!(module = %module_name, "loaded config");
            }
            Err(ConfigError::NotFound(_)) => {}
            Err(err) => {
                warn!(module = %module_name, error = %err, "failed to load module config");
            }
        }

        if let Some(hooks) = self.hooks.get(module_name) {
            if let Some(register) = &hooks.register_actions {
                register(actions);
                info!(module = %module_name, "registered actions");
            }
        }
    }

    /// Discover and load every module under `root`. Idempotent: a
    /// second call logs and returns without re-scanning.
    pub fn initialize(&mut self, root: &Path, actions: &mut ActionRegistry) {
        if self.initialized {
            info!("module registry already initialized");
            return;
        }

        let modules = Self::discover_modules(root);
        info!(count = modules.len(), "discovered modules");

        for module_name in &modules {
            self.load_module(module_name, root, actions);
        }

        self.initialized = true;
        info!(
            configs = self.configs.len(),
            routers = self.routers.len(),
            actions = actions.len(),
            "module registry initialized"
        );
    }

    pub fn configs(&self) -> &BTreeMap<String, ModuleConfig> {
        &self.configs
    }

    pub fn config(&self, module_id: &str) -> Option<&ModuleConfig> {
        self.configs.get(module_id)
    }

    pub fn routers(&self) -> &HashMap<String, axum::Router> {
        &self.routers
    }

    /// Whether a module is currently enabled for a company (or globally
    /// when `company_id` is `None`).
    ///
    /// Unknown module ids are not available and report `false`. A
    /// persisted record wins; no record means enabled by default. A
    /// store failure fails open to enabled so an infra blip cannot take
    /// down legitimate module access; the error is logged rather than
    /// swallowed. System modules always report enabled.
    pub async fn is_module_enabled(&self, module_id: &str, company_id: Option<i64>) -> bool {
        if !self.configs.contains_key(module_id) {
            return false;
        }

        if is_system_module(module_id) {
            return true;
        }

        match self.status_store.fetch(module_id, company_id).await {
            Ok(Some(record)) => record.enabled,
            Ok(None) => true,
            Err(err) => {
                warn!(module_id, error = %err, "status check failed; defaulting to enabled");
                true
            }
        }
    }

    /// Persist an enable/disable decision. The write path is where the
    /// system-module guarantee is enforced: disabling one is refused
    /// regardless of what the caller or store says.
    pub async fn set_module_enabled(
        &self,
        module_id: &str,
        company_id: Option<i64>,
        enabled: bool,
        actor: i64,
    ) -> Result<(), StatusStoreError> {
        if !enabled && is_system_module(module_id) {
            return Err(StatusStoreError::SystemModule(module_id.to_string()));
        }

        let record = if enabled {
            ModuleStatusRecord::enabled_now(module_id, company_id, actor)
        } else {
            ModuleStatusRecord::disabled_now(module_id, company_id, actor)
        };

        self.status_store.upsert(record).await
    }
}
