//! Validator registry: rule type name to default validator
//!
//! A registry is an ordinary value owned by the schemas that use it. Share
//! one `Arc<Registry>` between schemas to register a type once and use it
//! everywhere; registrations are visible to every holder of the `Arc`,
//! including schemas built before the registration.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use rulebook_core::{from_fn, Context, Issue, Validator};

use crate::validators::Builtin;

/// Lookup from rule type name to default validator
pub struct Registry {
    validators: RwLock<HashMap<String, Arc<dyn Validator>>>,
}

impl Default for Registry {
    fn default() -> Self {
        let registry = Self::empty();
        for builtin in Builtin::ALL {
            registry.register(builtin.type_name(), builtin);
        }
        registry
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry").field("types", &self.types()).finish()
    }
}

impl Registry {
    /// Registry with every built-in type
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with no types at all
    pub fn empty() -> Self {
        Self {
            validators: RwLock::new(HashMap::new()),
        }
    }

    /// Built-in registry extended with `extra`, which wins on name clashes
    pub fn with_extensions<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = (S, Arc<dyn Validator>)>,
        S: Into<String>,
    {
        let registry = Self::new();
        registry.extend(extra);
        registry
    }

    /// Register `validator` for `type_name`, replacing any existing entry
    pub fn register(&self, type_name: impl Into<String>, validator: impl Validator + 'static) {
        self.register_arc(type_name, Arc::new(validator));
    }

    /// Register a shared validator for `type_name`
    pub fn register_arc(&self, type_name: impl Into<String>, validator: Arc<dyn Validator>) {
        let type_name = type_name.into();
        tracing::debug!(rule_type = %type_name, "registering validator");
        self.write().insert(type_name, validator);
    }

    /// Register a synchronous closure for `type_name`
    pub fn register_fn<F>(&self, type_name: impl Into<String>, f: F)
    where
        F: Fn(&Context<'_>) -> Vec<Issue> + Send + Sync + 'static,
    {
        self.register(type_name, from_fn(f));
    }

    /// Register several validators at once
    pub fn extend<I, S>(&self, validators: I)
    where
        I: IntoIterator<Item = (S, Arc<dyn Validator>)>,
        S: Into<String>,
    {
        let mut map = self.write();
        for (type_name, validator) in validators {
            map.insert(type_name.into(), validator);
        }
    }

    /// Validator registered for `type_name`
    pub fn lookup(&self, type_name: &str) -> Option<Arc<dyn Validator>> {
        self.read().get(type_name).cloned()
    }

    /// Whether `type_name` is registered
    pub fn contains(&self, type_name: &str) -> bool {
        self.read().contains_key(type_name)
    }

    /// Registered type names, sorted
    pub fn types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.read().keys().cloned().collect();
        types.sort();
        types
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Arc<dyn Validator>>> {
        self.validators.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Arc<dyn Validator>>> {
        self.validators.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_builtins() {
        let registry = Registry::default();
        for name in ["string", "number", "object", "array", "email", "pattern", "required"] {
            assert!(registry.contains(name), "missing {name}");
        }
        assert_eq!(registry.types().len(), Builtin::ALL.len());
        assert!(!registry.contains("even"));
    }

    #[test]
    fn test_empty() {
        let registry = Registry::empty();
        assert!(registry.types().is_empty());
        assert!(registry.lookup("string").is_none());
    }

    #[test]
    fn test_register_overrides() {
        let registry = Registry::new();
        registry.register_fn("string", |_ctx: &Context<'_>| vec![Issue::from("always")]);
        registry.register_fn("even", |_ctx: &Context<'_>| Vec::new());
        assert!(registry.contains("even"));
        assert_eq!(registry.types().len(), Builtin::ALL.len() + 1);
    }

    #[test]
    fn test_with_extensions() {
        let odd: Arc<dyn Validator> = Arc::new(from_fn(|_ctx: &Context<'_>| Vec::new()));
        let registry = Registry::with_extensions([("odd", odd)]);
        assert!(registry.contains("odd"));
        assert!(registry.contains("string"));
    }
}
