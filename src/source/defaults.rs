//! Declared field defaults

use crate::error::{ConfigError, Result};
use crate::field::{visit_scalars, Configurable};
use crate::source::Loader;

/// Writes every declared `default_value` into its field.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLoader;

impl Loader for DefaultLoader {
    fn load(&self, target: &mut dyn Configurable) -> Result<()> {
        visit_scalars(target, &mut |path, scalar| {
            let Some(default) = path.leaf().default else {
                return Ok(());
            };
            scalar.parse_str(default).map_err(|reason| ConfigError::Parse {
                origin: "default of",
                name: path.dotted(),
                value: default.to_string(),
                reason,
            })
        })
    }

    fn name(&self) -> String {
        "defaults".to_string()
    }
}
