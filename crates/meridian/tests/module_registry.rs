use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use meridian::modules::{
    ActionFuture, ActionRegistry, ActionResult, ModuleHooks, ModuleRegistry, ModuleStatusRecord,
    ModuleStatusStore, StatusStoreError,
};
use tempfile::TempDir;

#[derive(Default)]
struct InMemoryStatusStore {
    records: Mutex<Vec<ModuleStatusRecord>>,
    fail: AtomicBool,
}

impl InMemoryStatusStore {
    fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl ModuleStatusStore for InMemoryStatusStore {
    async fn fetch(
        &self,
        module_id: &str,
        company_id: Option<i64>,
    ) -> Result<Option<ModuleStatusRecord>, StatusStoreError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(StatusStoreError::Unavailable("connection refused".into()));
        }
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|r| r.module_id == module_id && r.company_id == company_id)
            .cloned())
    }

    async fn upsert(&self, record: ModuleStatusRecord) -> Result<(), StatusStoreError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(StatusStoreError::Unavailable("connection refused".into()));
        }
        self.records.lock().unwrap().push(record);
        Ok(())
    }
}

fn write_module(root: &Path, dir: &str, id: &str, name: &str) {
    let module_dir = root.join(dir);
    fs::create_dir_all(&module_dir).unwrap();
    fs::write(
        module_dir.join("config.yaml"),
        format!("module:\n  id: {id}\n  name: {name}\n"),
    )
    .unwrap();
}

fn initialized_registry(
    root: &Path,
    store: Arc<InMemoryStatusStore>,
) -> (ModuleRegistry, ActionRegistry) {
    let mut actions = ActionRegistry::new();
    let mut registry = ModuleRegistry::new(store);
    registry.initialize(root, &mut actions);
    (registry, actions)
}

#[tokio::test]
async fn initialization_loads_discovered_modules_once() {
    let dir = TempDir::new().unwrap();
    write_module(dir.path(), "finance", "finance", "Finance");
    write_module(dir.path(), "hr", "hr", "HR");

    let mut actions = ActionRegistry::new();
    let mut registry = ModuleRegistry::new(Arc::new(InMemoryStatusStore::default())).with_hooks(
        "finance",
        ModuleHooks {
            router: None,
            register_actions: Some(Box::new(|actions| {
                actions.register("finance.export", |_ctx| {
                    Box::pin(async { Ok(ActionResult::ok("exported")) }) as ActionFuture
                });
            })),
        },
    );

    registry.initialize(dir.path(), &mut actions);
    assert_eq!(registry.configs().len(), 2);
    assert_eq!(actions.len(), 1);

    // A second initialize is a no-op, not a re-scan.
    registry.initialize(dir.path(), &mut actions);
    assert_eq!(registry.configs().len(), 2);
    assert_eq!(actions.len(), 1);
}

#[tokio::test]
async fn unknown_modules_report_disabled() {
    let dir = TempDir::new().unwrap();
    write_module(dir.path(), "finance", "finance", "Finance");

    let (registry, _) = initialized_registry(dir.path(), Arc::new(InMemoryStatusStore::default()));
    assert!(registry.is_module_enabled("finance", None).await);
    assert!(!registry.is_module_enabled("ghost", None).await);
}

#[tokio::test]
async fn persisted_disable_wins_and_absence_means_enabled() {
    let dir = TempDir::new().unwrap();
    write_module(dir.path(), "finance", "finance", "Finance");

    let store = Arc::new(InMemoryStatusStore::default());
    let (registry, _) = initialized_registry(dir.path(), store);

    assert!(registry.is_module_enabled("finance", Some(3)).await);

    registry
        .set_module_enabled("finance", Some(3), false, 1)
        .await
        .unwrap();
    assert!(!registry.is_module_enabled("finance", Some(3)).await);

    // The disable was scoped to company 3; other scopes stay enabled.
    assert!(registry.is_module_enabled("finance", Some(4)).await);
    assert!(registry.is_module_enabled("finance", None).await);

    registry
        .set_module_enabled("finance", Some(3), true, 1)
        .await
        .unwrap();
    assert!(registry.is_module_enabled("finance", Some(3)).await);
}

#[tokio::test]
async fn status_store_outage_fails_open_to_enabled() {
    let dir = TempDir::new().unwrap();
    write_module(dir.path(), "finance", "finance", "Finance");

    let store = Arc::new(InMemoryStatusStore::default());
    let (registry, _) = initialized_registry(dir.path(), Arc::clone(&store));

    registry
        .set_module_enabled("finance", None, false, 1)
        .await
        .unwrap();
    assert!(!registry.is_module_enabled("finance", None).await);

    store.set_failing(true);
    assert!(registry.is_module_enabled("finance", None).await);
}

#[tokio::test]
async fn system_modules_cannot_be_disabled() {
    let dir = TempDir::new().unwrap();
    write_module(dir.path(), "users", "users", "Users");

    let store = Arc::new(InMemoryStatusStore::default());
    let (registry, _) = initialized_registry(dir.path(), Arc::clone(&store));

    let err = registry
        .set_module_enabled("users", None, false, 1)
        .await
        .err()
        .expect("disable refused");
    assert!(matches!(err, StatusStoreError::SystemModule(id) if id == "users"));

    // Even a record written behind the registry's back cannot disable one.
    store
        .upsert(ModuleStatusRecord::disabled_now("users", None, 1))
        .await
        .unwrap();
    assert!(registry.is_module_enabled("users", None).await);
}

#[tokio::test]
async fn module_routers_are_collected_from_hooks() {
    let dir = TempDir::new().unwrap();
    write_module(dir.path(), "finance", "finance", "Finance");

    let mut actions = ActionRegistry::new();
    let mut registry = ModuleRegistry::new(Arc::new(InMemoryStatusStore::default())).with_hooks(
        "finance",
        ModuleHooks {
            router: Some(axum::Router::new()),
            register_actions: None,
        },
    );
    registry.initialize(dir.path(), &mut actions);

    assert!(registry.routers().contains_key("finance"));
    assert!(!registry.routers().contains_key("hr"));
}
