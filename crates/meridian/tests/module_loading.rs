use std::fs;
use std::path::Path;

use meridian::modules::{ConfigError, ModuleConfigLoader};
use tempfile::TempDir;

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

#[test]
fn fragments_merge_onto_the_base_in_filename_order() {
    let dir = TempDir::new().unwrap();
    let module = dir.path().join("invoicing");

    write(
        &module.join("config.yaml"),
        r#"
module:
  id: invoicing
  name: Invoicing
configurables:
  currency: USD
  grace_days: 14
"#,
    );
    write(
        &module.join("configs/10-overrides.yaml"),
        r#"
configurables:
  currency: SGD
"#,
    );
    write(
        &module.join("configs/20-overrides.yaml"),
        r#"
configurables:
  currency: IDR
  late_fee_pct: 2
"#,
    );

    let config = ModuleConfigLoader::load(&module).expect("module loads");
    assert_eq!(config.id(), "invoicing");

    let configurables = config.configurables.expect("configurables present");
    // Later fragments win; untouched keys survive from the base.
    assert_eq!(
        configurables.get("currency").and_then(|v| v.as_str()),
        Some("IDR")
    );
    assert_eq!(
        configurables.get("grace_days").and_then(|v| v.as_u64()),
        Some(14)
    );
    assert_eq!(
        configurables.get("late_fee_pct").and_then(|v| v.as_u64()),
        Some(2)
    );
}

#[test]
fn fragments_alone_are_enough_without_a_base_file() {
    let dir = TempDir::new().unwrap();
    let module = dir.path().join("reports");

    write(
        &module.join("configs/module.yaml"),
        r#"
module:
  id: reports
  name: Reports
"#,
    );

    let config = ModuleConfigLoader::load(&module).expect("fragment-only module loads");
    assert_eq!(config.id(), "reports");
    assert_eq!(config.module.name, "Reports");
}

#[test]
fn a_directory_without_any_config_is_not_found() {
    let dir = TempDir::new().unwrap();
    let module = dir.path().join("empty");
    fs::create_dir_all(&module).unwrap();

    let err = ModuleConfigLoader::load(&module).err().expect("nothing to load");
    assert!(matches!(err, ConfigError::NotFound(_)));
}

#[test]
fn one_broken_module_does_not_abort_the_scan() {
    let dir = TempDir::new().unwrap();

    write(
        &dir.path().join("finance/config.yaml"),
        "module:\n  id: finance\n  name: Finance\n",
    );
    write(
        &dir.path().join("hr/config.yaml"),
        "module:\n  id: hr\n  name: HR\n",
    );
    write(
        &dir.path().join("broken/config.yaml"),
        "module: [unclosed\n  - nonsense",
    );

    let modules = ModuleConfigLoader::load_all(dir.path());
    let ids: Vec<&str> = modules.keys().map(String::as_str).collect();
    assert_eq!(ids, vec!["finance", "hr"]);
}

#[test]
fn reserved_and_hidden_directories_are_skipped() {
    let dir = TempDir::new().unwrap();

    write(
        &dir.path().join("core/config.yaml"),
        "module:\n  id: core\n  name: Core\n",
    );
    write(
        &dir.path().join("_drafts/config.yaml"),
        "module:\n  id: drafts\n  name: Drafts\n",
    );
    write(
        &dir.path().join(".cache/config.yaml"),
        "module:\n  id: cache\n  name: Cache\n",
    );
    write(
        &dir.path().join("payroll/config.yaml"),
        "module:\n  id: payroll\n  name: Payroll\n",
    );

    let modules = ModuleConfigLoader::load_all(dir.path());
    assert_eq!(modules.len(), 1);
    assert!(modules.contains_key("payroll"));
}

#[test]
fn modules_are_keyed_by_declared_id_not_directory_name() {
    let dir = TempDir::new().unwrap();

    write(
        &dir.path().join("acme_billing/config.yaml"),
        "module:\n  id: billing\n  name: Billing\n",
    );

    let modules = ModuleConfigLoader::load_all(dir.path());
    assert!(modules.contains_key("billing"));
    assert!(!modules.contains_key("acme_billing"));
}

#[test]
fn declared_workflow_defaults_apply() {
    let dir = TempDir::new().unwrap();
    let module = dir.path().join("approvals");

    write(
        &module.join("config.yaml"),
        r#"
module:
  id: approvals
  name: Approvals
workflows:
  expense:
    title: Expense Approval
    initial_state: draft
    states:
      draft:
        label: Draft
        color: gray
        can_transition_to: [submitted]
      submitted:
        label: Submitted
        color: blue
"#,
    );

    let config = ModuleConfigLoader::load(&module).expect("module loads");
    let workflow = &config.workflows.expect("workflows present")["expense"];

    let draft = &workflow.states["draft"];
    assert!(draft.allow_edit);
    assert!(!draft.allow_delete);

    let submitted = &workflow.states["submitted"];
    assert!(submitted.can_transition_to.is_empty());
}
