// Copyright 2025 Cowboy AI, LLC.

use std::collections::BTreeSet;

use discipline_sets::{
    AttributeRef, Element, ElementId, FolderNode, InMemoryHost, ModelHost, PatternClassifier,
    PropertyValueDiscoverer,
};
use proptest::prelude::*;

/// Root names that sometimes embed `_arch_` in mixed case
fn root_name() -> impl Strategy<Value = String> {
    (
        "[A-Za-z0-9 .]{0,8}",
        prop::option::of(prop::sample::select(vec!["_ARCH_", "_arch_", "_ArCh_", "_ARCH", "ARCH_"])),
        "[A-Za-z0-9 .]{0,8}",
    )
        .prop_map(|(head, token, tail)| format!("{head}{}{tail}", token.unwrap_or("")))
}

proptest! {
    #[test]
    fn arch_is_found_iff_some_root_contains_the_token(
        names in prop::collection::vec(root_name(), 0..12)
    ) {
        let roots: Vec<Element> = names.iter().map(|n| Element::new(ElementId::new(), n.as_str())).collect();
        let expected = names.iter().any(|n| n.to_lowercase().contains("_arch_"));

        let found = PatternClassifier::default()
            .classify(&roots)
            .map(|definitions| definitions.iter().any(|d| d.name == "ARCH"))
            .unwrap_or(false);

        prop_assert_eq!(found, expected);
    }

    #[test]
    fn discovered_values_are_sorted_distinct_and_non_blank(
        values in prop::collection::vec("[ a-zA-Z]{0,6}", 0..40)
    ) {
        let mut host = InMemoryHost::new();
        let root = host.add_root("Tower_ARCH_01");
        for (i, value) in values.iter().enumerate() {
            let child = host.add_child(root, format!("element {i}")).unwrap();
            host.set_property(child, "Element", "Category", value.as_str()).unwrap();
        }
        let bases = host.root_elements();
        let target = AttributeRef::new("Element", "Category").unwrap();

        let found = PropertyValueDiscoverer::new(&host).values(&bases, &target).result;

        prop_assert!(found.windows(2).all(|pair| pair[0] < pair[1]));
        prop_assert!(found.iter().all(|v| !v.trim().is_empty()));
        let expected: BTreeSet<&str> = values.iter().map(String::as_str).filter(|v| !v.trim().is_empty()).collect();
        prop_assert_eq!(found.iter().map(String::as_str).collect::<BTreeSet<_>>(), expected);
    }

    #[test]
    fn find_or_create_folder_twice_yields_one_node(
        names in prop::collection::vec("[A-Z]{1,4}", 1..10)
    ) {
        let mut root = FolderNode::new("2. CLASH SETS").unwrap();
        for name in &names {
            let first = root.find_or_create_folder(name).unwrap().id;
            let second = root.find_or_create_folder(name).unwrap().id;
            prop_assert_eq!(first, second);
        }

        let distinct: BTreeSet<&String> = names.iter().collect();
        prop_assert_eq!(root.folders().count(), distinct.len());
    }
}
