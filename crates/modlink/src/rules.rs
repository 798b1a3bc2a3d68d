//! Module rules
//!
//! The one construction operation of the system: given a target
//! context, produce the module's descriptor. One implementation exists
//! per declared module. Construction must be deterministic — the same
//! context always yields the same descriptor.

use crate::descriptor::ModuleDescriptor;
use crate::target::TargetContext;

/// Per-module descriptor construction
pub trait ModuleRules: Send + Sync {
    /// Module name; must match the name of every descriptor produced
    fn name(&self) -> &str;

    /// Construct the descriptor for the given target context
    ///
    /// Infallible and side-effect-free. Rules may branch on the
    /// context (platform-only dependencies, configuration-only
    /// include roots).
    fn describe(&self, target: &TargetContext) -> ModuleDescriptor;
}

/// Rules defined in code as a function of the target context
pub struct RulesFn {
    name: String,
    build: Box<dyn Fn(&TargetContext) -> ModuleDescriptor + Send + Sync>,
}

impl RulesFn {
    /// Wrap a construction function
    ///
    /// The function receives an empty descriptor carrying the module
    /// name and populates it for the given target.
    pub fn new(
        name: impl Into<String>,
        build: impl Fn(ModuleDescriptor, &TargetContext) -> ModuleDescriptor + Send + Sync + 'static,
    ) -> Self {
        let name = name.into();
        let seed = name.clone();
        Self {
            name,
            build: Box::new(move |target| build(ModuleDescriptor::new(seed.clone()), target)),
        }
    }
}

impl ModuleRules for RulesFn {
    fn name(&self) -> &str {
        &self.name
    }

    fn describe(&self, target: &TargetContext) -> ModuleDescriptor {
        (self.build)(target)
    }
}

/// A fixed descriptor usable directly as target-independent rules
impl ModuleRules for ModuleDescriptor {
    fn name(&self) -> &str {
        &self.name
    }

    fn describe(&self, _target: &TargetContext) -> ModuleDescriptor {
        self.clone()
    }
}
