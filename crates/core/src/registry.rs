//! Named rule registry.
//!
//! A [`Registry`] is an explicit object populated during initialization by
//! calls to [`Registry::register`] or [`Registry::register_spec`], then handed
//! to whoever needs to resolve rules by name. Names are unique; listing
//! preserves registration order.
//!
//! Registration takes `&mut self`, so concurrent registration from several
//! threads requires wrapping the registry in a `Mutex`. Once populated, a
//! registry can be shared freely behind `&Registry` or `Arc<Registry>`.

use indexmap::IndexMap;

use crate::error::AutomataError;
use crate::rule::{RuleSpec, StateKind, Transition};

/// Mapping from unique rule name to [`RuleSpec`].
#[derive(Debug, Clone, Default)]
pub struct Registry {
    rules: IndexMap<String, RuleSpec>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a [`RuleSpec`] and registers it.
    ///
    /// Returns `AutomataError::DuplicateRule` if `name` is taken, or
    /// `AutomataError::Configuration` for an invalid dimensionality or state kind.
    /// The registry is unchanged on error.
    pub fn register(
        &mut self,
        name: &str,
        dimensionality: usize,
        description: &str,
        states: StateKind,
        transition: Transition,
    ) -> Result<(), AutomataError> {
        if self.rules.contains_key(name) {
            return Err(AutomataError::DuplicateRule(name.to_string()));
        }
        let spec = RuleSpec::new(name, dimensionality, description, states, transition)?;
        self.register_spec(spec)
    }

    /// Registers a prebuilt [`RuleSpec`] under its own name.
    pub fn register_spec(&mut self, spec: RuleSpec) -> Result<(), AutomataError> {
        if self.rules.contains_key(spec.name()) {
            return Err(AutomataError::DuplicateRule(spec.name().to_string()));
        }
        tracing::debug!(
            rule = spec.name(),
            dim = spec.dimensionality(),
            needs_neighbors = spec.needs_neighbors(),
            "registered rule"
        );
        self.rules.insert(spec.name().to_string(), spec);
        Ok(())
    }

    /// Looks up a rule by name.
    ///
    /// Returns `AutomataError::UnknownRule`, listing the registered names in
    /// sorted order, if `name` is absent.
    pub fn get(&self, name: &str) -> Result<&RuleSpec, AutomataError> {
        self.rules.get(name).ok_or_else(|| {
            let mut known: Vec<String> = self.rules.keys().cloned().collect();
            known.sort();
            AutomataError::UnknownRule {
                name: name.to_string(),
                known,
            }
        })
    }

    /// Snapshot of all registered names, in registration order.
    pub fn list(&self) -> Vec<String> {
        self.rules.keys().cloned().collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterates over registered specs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RuleSpec> {
        self.rules.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    fn identity() -> Transition {
        Transition::state_only(|g: &Grid| Ok(g.clone()))
    }

    fn binary() -> StateKind {
        StateKind::Discrete { num_states: 2 }
    }

    #[test]
    fn register_then_get_returns_spec() {
        let mut registry = Registry::new();
        registry
            .register("identity", 1, "copies the grid", binary(), identity())
            .unwrap();
        let spec = registry.get("identity").unwrap();
        assert_eq!(spec.name(), "identity");
        assert_eq!(spec.dimensionality(), 1);
        assert_eq!(spec.description(), "copies the grid");
    }

    #[test]
    fn duplicate_registration_fails_and_keeps_original() {
        let mut registry = Registry::new();
        registry
            .register("identity", 1, "first", binary(), identity())
            .unwrap();
        let err = registry
            .register("identity", 2, "second", binary(), identity())
            .unwrap_err();
        assert!(matches!(err, AutomataError::DuplicateRule(ref n) if n == "identity"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("identity").unwrap().description(), "first");
    }

    #[test]
    fn duplicate_spec_registration_fails() {
        let mut registry = Registry::new();
        let spec = RuleSpec::new("identity", 1, "", binary(), identity()).unwrap();
        registry.register_spec(spec.clone()).unwrap();
        assert!(matches!(
            registry.register_spec(spec),
            Err(AutomataError::DuplicateRule(_))
        ));
    }

    #[test]
    fn unknown_lookup_fails_with_sorted_known_names() {
        let mut registry = Registry::new();
        registry.register("zeta", 1, "", binary(), identity()).unwrap();
        registry.register("alpha", 1, "", binary(), identity()).unwrap();
        match registry.get("missing") {
            Err(AutomataError::UnknownRule { name, known }) => {
                assert_eq!(name, "missing");
                assert_eq!(known, vec!["alpha".to_string(), "zeta".to_string()]);
            }
            other => panic!("expected UnknownRule, got {other:?}"),
        }
    }

    #[test]
    fn invalid_dimensionality_leaves_registry_unchanged() {
        let mut registry = Registry::new();
        assert!(registry.register("cube", 3, "", binary(), identity()).is_err());
        assert!(registry.is_empty());
        assert!(!registry.contains("cube"));
    }

    #[test]
    fn list_preserves_registration_order() {
        let mut registry = Registry::new();
        for name in ["rule_30", "game_of_life", "rule_110"] {
            registry.register(name, 1, "", binary(), identity()).unwrap();
        }
        assert_eq!(registry.list(), vec!["rule_30", "game_of_life", "rule_110"]);
        let names: Vec<&str> = registry.iter().map(RuleSpec::name).collect();
        assert_eq!(names, vec!["rule_30", "game_of_life", "rule_110"]);
    }

    #[test]
    fn list_is_a_snapshot() {
        let mut registry = Registry::new();
        registry.register("a", 1, "", binary(), identity()).unwrap();
        let snapshot = registry.list();
        registry.register("b", 1, "", binary(), identity()).unwrap();
        assert_eq!(snapshot, vec!["a"]);
        assert_eq!(registry.list(), vec!["a", "b"]);
    }

    #[test]
    fn independent_registries_do_not_share_state() {
        let mut a = Registry::new();
        let b = Registry::new();
        a.register("only_in_a", 1, "", binary(), identity()).unwrap();
        assert!(a.contains("only_in_a"));
        assert!(!b.contains("only_in_a"));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn list_contains_each_registered_name_once(
                names in proptest::collection::vec("[a-z]{1,6}", 0..24),
            ) {
                let mut registry = Registry::new();
                let mut accepted = Vec::new();
                for name in &names {
                    if registry.register(name, 1, "", binary(), identity()).is_ok() {
                        accepted.push(name.clone());
                    }
                }
                let listed = registry.list();
                prop_assert_eq!(&listed, &accepted);
                for name in &names {
                    prop_assert_eq!(listed.iter().filter(|n| *n == name).count(), 1);
                }
            }
        }
    }
}
