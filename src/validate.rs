//! Post-load validation

use crate::error::{ConfigError, Result};
use crate::field::{visit_scalars, Configurable};

/// Checks a fully loaded target.
pub trait Validator {
    fn validate(&self, target: &mut dyn Configurable) -> Result<()>;
}

/// Fails when any field marked `required` is still at its zero value.
///
/// Every missing field is reported, not just the first, using dotted paths of
/// declared names (`database.url`).
#[derive(Debug, Clone, Copy, Default)]
pub struct RequiredValidator;

impl Validator for RequiredValidator {
    fn validate(&self, target: &mut dyn Configurable) -> Result<()> {
        let mut missing = Vec::new();
        visit_scalars(target, &mut |path, scalar| {
            if path.leaf().required && scalar.is_zero() {
                missing.push(path.dotted());
            }
            Ok(())
        })?;

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation { missing })
        }
    }
}

/// Runs validators in order and returns the first failure.
#[derive(Default)]
pub struct MultiValidator {
    validators: Vec<Box<dyn Validator>>,
}

impl MultiValidator {
    pub fn new(validators: Vec<Box<dyn Validator>>) -> Self {
        Self { validators }
    }
}

impl Validator for MultiValidator {
    fn validate(&self, target: &mut dyn Configurable) -> Result<()> {
        for validator in &self.validators {
            validator.validate(target)?;
        }
        Ok(())
    }
}
