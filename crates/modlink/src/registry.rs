//! Module registry
//!
//! The set of declared module rules, plus the names of prebuilt
//! (engine-provided) modules that resolve without a descriptor of
//! their own.

use crate::descriptor::is_valid_module_name;
use crate::rules::ModuleRules;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Errors that can occur while populating a registry
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Invalid module name
    #[error("Invalid module name: '{0}'")]
    InvalidName(String),

    /// Two rules registered under the same name
    #[error("Module '{0}' is already registered")]
    DuplicateModule(String),

    /// A name registered both as declared rules and as prebuilt
    #[error("Module '{0}' cannot be both declared and prebuilt")]
    DeclaredAndPrebuilt(String),
}

/// Registry of declared modules and prebuilt module names
#[derive(Default)]
pub struct ModuleRegistry {
    rules: BTreeMap<String, Box<dyn ModuleRules>>,
    prebuilt: BTreeSet<String>,
}

impl ModuleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register rules for a declared module
    pub fn register(&mut self, rules: impl ModuleRules + 'static) -> Result<(), RegistryError> {
        let name = rules.name().to_string();
        if !is_valid_module_name(&name) {
            return Err(RegistryError::InvalidName(name));
        }
        if self.rules.contains_key(&name) {
            return Err(RegistryError::DuplicateModule(name));
        }
        if self.prebuilt.contains(&name) {
            return Err(RegistryError::DeclaredAndPrebuilt(name));
        }
        self.rules.insert(name, Box::new(rules));
        Ok(())
    }

    /// Register a prebuilt module name
    ///
    /// Prebuilt modules satisfy dependency resolution but contribute
    /// no include paths and have no descriptor. Registering the same
    /// name twice is a no-op.
    pub fn register_prebuilt(&mut self, name: impl Into<String>) -> Result<(), RegistryError> {
        let name = name.into();
        if !is_valid_module_name(&name) {
            return Err(RegistryError::InvalidName(name));
        }
        if self.rules.contains_key(&name) {
            return Err(RegistryError::DeclaredAndPrebuilt(name));
        }
        self.prebuilt.insert(name);
        Ok(())
    }

    /// Rules for a declared module, if registered
    pub fn get(&self, name: &str) -> Option<&dyn ModuleRules> {
        self.rules.get(name).map(|r| r.as_ref())
    }

    /// Whether a name resolves to a declared module or a prebuilt one
    pub fn resolves(&self, name: &str) -> bool {
        self.rules.contains_key(name) || self.prebuilt.contains(name)
    }

    /// Whether a name is a prebuilt module
    pub fn is_prebuilt(&self, name: &str) -> bool {
        self.prebuilt.contains(name)
    }

    /// Declared module names, sorted
    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Prebuilt module names, sorted
    pub fn prebuilt_names(&self) -> impl Iterator<Item = &str> {
        self.prebuilt.iter().map(String::as_str)
    }

    /// Declared rules in name order
    pub fn iter(&self) -> impl Iterator<Item = &dyn ModuleRules> {
        self.rules.values().map(|r| r.as_ref())
    }

    /// Number of declared modules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no modules are declared
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
