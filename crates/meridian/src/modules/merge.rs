use serde_yaml::Value;

/// Deep-merge `overlay` onto `base`, returning a new document.
///
/// When both sides hold a mapping at the same key the merge recurses;
/// any other pairing is resolved by taking the overlay value wholesale,
/// so sequences and scalars are replaced, never concatenated. Neither
/// input is mutated. Callers that apply several overlay fragments must
/// order them deterministically (the loader sorts by filename).
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            let mut merged = base_map.clone();
            for (key, overlay_value) in overlay_map {
                let next = match merged.get(key) {
                    Some(existing) => deep_merge(existing, overlay_value),
                    None => overlay_value.clone(),
                };
                merged.insert(key.clone(), next);
            }
            Value::Mapping(merged)
        }
        _ => overlay.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(source: &str) -> Value {
        serde_yaml::from_str(source).expect("test yaml parses")
    }

    #[test]
    fn empty_overlay_leaves_base_unchanged() {
        let base = yaml("module: {id: finance, name: Finance}\npermissions: [finance.read]");
        let merged = deep_merge(&base, &Value::Mapping(Default::default()));
        assert_eq!(merged, base);
    }

    #[test]
    fn disjoint_fragments_commute_with_a_combined_overlay() {
        let empty = Value::Mapping(Default::default());
        let first = yaml("a: 1");
        let second = yaml("b: 2");

        let sequential = deep_merge(&deep_merge(&empty, &first), &second);
        let combined = deep_merge(&empty, &yaml("a: 1\nb: 2"));
        assert_eq!(sequential, combined);
    }

    #[test]
    fn nested_mappings_merge_recursively() {
        let base = yaml("screens:\n  list:\n    title: Invoices\n    path: /invoices");
        let overlay = yaml("screens:\n  list:\n    title: All Invoices");
        let merged = deep_merge(&base, &overlay);

        let expected =
            yaml("screens:\n  list:\n    title: All Invoices\n    path: /invoices");
        assert_eq!(merged, expected);
    }

    #[test]
    fn sequences_are_replaced_not_concatenated() {
        let base = yaml("permissions: [a.read, a.write]");
        let overlay = yaml("permissions: [a.admin]");
        let merged = deep_merge(&base, &overlay);
        assert_eq!(merged, yaml("permissions: [a.admin]"));
    }

    #[test]
    fn inputs_are_not_mutated() {
        let base = yaml("module: {id: hr}");
        let overlay = yaml("module: {name: Human Resources}");
        let base_before = base.clone();
        let overlay_before = overlay.clone();

        let _ = deep_merge(&base, &overlay);
        assert_eq!(base, base_before);
        assert_eq!(overlay, overlay_before);
    }
}
