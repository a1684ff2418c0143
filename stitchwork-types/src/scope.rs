//! Variable environments and the two-level evaluation scope.

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A flat set of named bindings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Environment {
    vars: BTreeMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Bind `name`, returning the previous value if there was one
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.vars.insert(name.into(), value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.vars.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Builder-style bind, handy when assembling an environment inline
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut env = Environment::new();
        env.extend(iter);
        env
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Environment {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.set(name, value);
        }
    }
}

/// Two-level scope that tag expressions run against.
///
/// Lookups check the explicit bindings first and fall back to the ambient
/// environment. Assignments always land in the explicit level; the ambient
/// environment is only ever borrowed for reading.
#[derive(Debug, Clone, Default)]
pub struct Scope<'a> {
    explicit: Environment,
    ambient: Option<&'a Environment>,
}

impl<'a> Scope<'a> {
    pub fn new(explicit: Environment) -> Self {
        Self {
            explicit,
            ambient: None,
        }
    }

    pub fn with_ambient(explicit: Environment, ambient: &'a Environment) -> Self {
        Self {
            explicit,
            ambient: Some(ambient),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.explicit
            .get(name)
            .or_else(|| self.ambient.and_then(|env| env.get(name)))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.explicit.set(name, value)
    }

    pub fn explicit(&self) -> &Environment {
        &self.explicit
    }

    pub fn ambient(&self) -> Option<&'a Environment> {
        self.ambient
    }

    /// Consume the scope, keeping whatever the expressions assigned
    pub fn into_explicit(self) -> Environment {
        self.explicit
    }
}
