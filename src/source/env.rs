//! Environment variables

use crate::error::{ConfigError, Result};
use crate::field::{visit_scalars, Configurable};
use crate::naming::Naming;
use crate::source::Loader;
use std::collections::HashMap;

/// Reads one environment variable per scalar field.
///
/// Names come from [`Naming::env_name`]; a missing variable leaves its field
/// unchanged, a malformed one fails the whole load.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentLoader {
    naming: Naming,
    vars: Option<HashMap<String, String>>,
}

impl EnvironmentLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.naming = self.naming.prefix(prefix);
        self
    }

    pub fn camel_case(mut self, camel_case: bool) -> Self {
        self.naming = self.naming.camel_case(camel_case);
        self
    }

    pub fn flatten(mut self, flatten: bool) -> Self {
        self.naming = self.naming.flatten(flatten);
        self
    }

    /// Look variables up in `vars` instead of the process environment.
    pub fn with_vars<K, V>(mut self, vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.vars = Some(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    /// Every variable name this loader consults for `target`, in field order.
    pub fn env_names(&self, target: &mut dyn Configurable) -> Vec<String> {
        let mut names = Vec::new();
        // The visitor never fails, so neither does the walk.
        let _ = visit_scalars(target, &mut |path, _| {
            names.push(self.naming.env_name(path));
            Ok(())
        });
        names
    }

    fn lookup(&self, name: &str) -> Result<Option<String>> {
        if let Some(vars) = &self.vars {
            return Ok(vars.get(name).cloned());
        }
        match std::env::var_os(name) {
            None => Ok(None),
            Some(value) => value.into_string().map(Some).map_err(|raw| ConfigError::Parse {
                origin: "environment variable",
                name: name.to_string(),
                value: raw.to_string_lossy().into_owned(),
                reason: "value is not valid UTF-8".to_string(),
            }),
        }
    }
}

impl Loader for EnvironmentLoader {
    fn load(&self, target: &mut dyn Configurable) -> Result<()> {
        visit_scalars(target, &mut |path, scalar| {
            let name = self.naming.env_name(path);
            let Some(value) = self.lookup(&name)? else {
                return Ok(());
            };
            scalar.parse_str(&value).map_err(|reason| ConfigError::Parse {
                origin: "environment variable",
                name,
                value,
                reason,
            })
        })
    }

    fn name(&self) -> String {
        "environment".to_string()
    }
}
