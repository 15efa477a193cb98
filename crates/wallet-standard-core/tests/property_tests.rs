//! Property-based tests for the capability model using proptest
//!
//! These tests verify the least-privilege rules of `CapabilityMap::restrict`
//! and the parsers for chain ids and capability names.

use proptest::prelude::*;
use wallet_standard_core::{Capability, ChainId, FeatureMap, FeatureName, Version};

// ============================================
// Strategies
// ============================================

fn arb_name() -> impl Strategy<Value = FeatureName> {
    "[a-z]{1,6}:[a-zA-Z]{1,8}".prop_map(|s| FeatureName::parse(&s).unwrap())
}

fn arb_feature_map() -> impl Strategy<Value = FeatureMap> {
    prop::collection::vec((arb_name(), 0u64..4), 0..8).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(name, major)| (name, Capability::new(Version::new(major, 0, 0))))
            .collect()
    })
}

// ============================================
// restrict
// ============================================

proptest! {
    #[test]
    fn prop_restrict_none_is_identity(map in arb_feature_map()) {
        prop_assert_eq!(map.restrict(None), map);
    }

    #[test]
    fn prop_restrict_empty_grants_nothing(map in arb_feature_map()) {
        prop_assert!(map.restrict(Some(&[] as &[FeatureName])).is_empty());
    }

    #[test]
    fn prop_restrict_is_intersection(
        map in arb_feature_map(),
        requested in prop::collection::vec(arb_name(), 0..8),
    ) {
        let restricted = map.restrict(Some(&requested[..]));

        prop_assert!(restricted.is_subset_of(&map));
        for name in restricted.names() {
            prop_assert!(requested.contains(name));
            prop_assert_eq!(restricted.get(name), map.get(name));
        }
        for name in &requested {
            prop_assert_eq!(restricted.contains(name), map.contains(name));
        }
    }

    #[test]
    fn prop_restrict_is_idempotent(
        map in arb_feature_map(),
        requested in prop::collection::vec(arb_name(), 0..8),
    ) {
        let once = map.restrict(Some(&requested[..]));
        let twice = once.restrict(Some(&requested[..]));
        prop_assert_eq!(once, twice);
    }
}

// ============================================
// Parsers
// ============================================

proptest! {
    #[test]
    fn prop_chain_id_parse_never_panics(s in "\\PC{0,40}") {
        let _ = ChainId::parse(&s);
    }

    #[test]
    fn prop_valid_chain_ids_roundtrip(ns in "[a-z0-9-]{1,8}", reference in "[a-zA-Z0-9_-]{1,32}") {
        let raw = format!("{ns}:{reference}");
        let chain = ChainId::parse(&raw).unwrap();
        prop_assert_eq!(chain.namespace(), ns.as_str());
        prop_assert_eq!(chain.reference(), reference.as_str());
        prop_assert_eq!(chain.to_string(), raw);
    }

    #[test]
    fn prop_names_with_whitespace_rejected(a in "[a-z]{1,5}", b in "[a-z]{1,5}") {
        let with_space = format!("{a} {b}");
        prop_assert!(FeatureName::parse(&with_space).is_err());
    }
}
