//! Configuration sources
//!
//! Each source implements [`Loader`]: read one medium and write the values it
//! finds into the target. [`MultiLoader`] chains sources so that later ones
//! overwrite earlier ones.

use crate::error::Result;
use crate::field::Configurable;
use crate::observer::{Observer, TracingObserver};
use std::rc::Rc;

pub mod defaults;
pub mod env;
pub mod file;
pub mod flag;

pub use defaults::DefaultLoader;
pub use env::EnvironmentLoader;
pub use file::{FileLoader, Format};
pub use flag::{ErrorHandling, FlagLoader};

/// A configuration source.
///
/// Loaders hold only what they need to find their medium, so one instance
/// can be applied to any number of targets.
pub trait Loader {
    fn load(&self, target: &mut dyn Configurable) -> Result<()>;

    /// Human-readable name used when reporting failures.
    fn name(&self) -> String;
}

/// Applies loaders in order; later values win.
///
/// By default a failing loader is reported to the observer and the remaining
/// loaders still run. With [`MultiLoader::stop_on_error`] the first failure is
/// returned instead.
pub struct MultiLoader {
    loaders: Vec<Box<dyn Loader>>,
    stop_on_error: bool,
    observer: Rc<dyn Observer>,
}

impl MultiLoader {
    pub fn new(loaders: Vec<Box<dyn Loader>>) -> Self {
        Self { loaders, stop_on_error: false, observer: Rc::new(TracingObserver) }
    }

    pub fn stop_on_error(mut self, stop: bool) -> Self {
        self.stop_on_error = stop;
        self
    }

    pub fn observer(mut self, observer: Rc<dyn Observer>) -> Self {
        self.observer = observer;
        self
    }

    pub fn push(&mut self, loader: Box<dyn Loader>) {
        self.loaders.push(loader);
    }

    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }
}

impl Loader for MultiLoader {
    fn load(&self, target: &mut dyn Configurable) -> Result<()> {
        for loader in &self.loaders {
            if let Err(err) = loader.load(target) {
                if self.stop_on_error {
                    return Err(err);
                }
                self.observer.loader_failed(&loader.name(), &err);
            }
        }
        Ok(())
    }

    fn name(&self) -> String {
        let names: Vec<String> = self.loaders.iter().map(|loader| loader.name()).collect();
        format!("[{}]", names.join(", "))
    }
}
