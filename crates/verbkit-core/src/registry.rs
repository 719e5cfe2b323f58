//! Verb registration.
//!
//! A program declares its verbs into a [`VerbRegistry`]. Registration wraps
//! the verb body in a verb object, checks name uniqueness, and hands the
//! body back so the caller can keep using it directly.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{DeclarationError, VerbError};
use crate::verb::{CommandVerb, MultiVerb, RegisteredVerb, VerbConfig, VerbContext, VerbFn, verb_fn};

/// Identity of the program whose verbs are registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerbSpace {
    pub name: String,
    pub version: String,
    pub description: String,
}

impl VerbSpace {
    pub fn new(name: &str, version: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            description: description.to_string(),
        }
    }
}

/// Name-keyed collection of declared verbs.
#[derive(Default)]
pub struct VerbRegistry {
    verbs: HashMap<String, Box<dyn RegisteredVerb>>,
    order: Vec<String>,
}

impl VerbRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `function` as a command verb and return it unchanged.
    pub fn command<F>(
        &mut self,
        name: &str,
        function: F,
        config: VerbConfig,
    ) -> Result<VerbFn, DeclarationError>
    where
        F: Fn(&mut VerbContext<'_>) -> Result<(), VerbError> + Send + Sync + 'static,
    {
        let function = verb_fn(function);
        self.add(Box::new(CommandVerb::new(name, function.clone(), config)))?;
        Ok(function)
    }

    /// Register `function` as a multi-command verb and return it unchanged.
    ///
    /// The configuration must carry at least one modifier.
    pub fn multi_command<F>(
        &mut self,
        name: &str,
        function: F,
        config: VerbConfig,
    ) -> Result<VerbFn, DeclarationError>
    where
        F: Fn(&mut VerbContext<'_>) -> Result<(), VerbError> + Send + Sync + 'static,
    {
        let function = verb_fn(function);
        self.add(Box::new(MultiVerb::new(name, function.clone(), config)?))?;
        Ok(function)
    }

    /// Insert an already built verb. The first registration of a name wins.
    pub fn add(&mut self, verb: Box<dyn RegisteredVerb>) -> Result<(), DeclarationError> {
        let name = verb.verb().name().to_string();
        if self.verbs.contains_key(&name) {
            return Err(DeclarationError::DuplicateVerb(name));
        }
        debug!(verb = %name, kind = verb.kind(), "Registered verb");
        self.order.push(name.clone());
        self.verbs.insert(name, verb);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&dyn RegisteredVerb> {
        self.verbs.get(name).map(|v| &**v)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut (dyn RegisteredVerb + 'static)> {
        self.verbs.get_mut(name).map(|v| &mut **v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.verbs.contains_key(name)
    }

    /// Verb names in registration order.
    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn sorted_names(&self) -> Vec<String> {
        let mut names = self.order.clone();
        names.sort();
        names
    }

    /// Verbs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn RegisteredVerb> {
        self.order.iter().filter_map(|name| self.get(name))
    }

    pub fn len(&self) -> usize {
        self.verbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verbs.is_empty()
    }

    /// Sort and validate every verb's specification.
    pub fn validate_all(&mut self) -> Result<(), DeclarationError> {
        for name in &self.order {
            if let Some(verb) = self.verbs.get_mut(name) {
                verb.verb_mut().validate()?;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for VerbRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerbRegistry")
            .field("verbs", &self.order)
            .finish()
    }
}
