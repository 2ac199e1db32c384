//! The layered loading pipeline
//!
//! Sources are applied from lowest to highest precedence:
//! defaults < `conf/conf.{json,yml,yaml,toml}` < environment < flags.
//! When the loaded target names an explicit config file, that file is loaded
//! next and flags are applied once more, so the explicit file beats the
//! conventional ones while flags still beat everything.

use crate::error::Result;
use crate::field::{ConfPath, Configurable, Field};
use crate::observer::{Observer, TracingObserver};
use crate::source::{
    DefaultLoader, EnvironmentLoader, ErrorHandling, FileLoader, FlagLoader, Loader, MultiLoader,
};
use crate::validate::{RequiredValidator, Validator};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::PathBuf;
use std::rc::Rc;

/// Conventional config files, attempted in this order. All of them are
/// loaded when present; later files win.
pub const CONVENTIONAL_PATHS: [&str; 4] =
    ["conf/conf.json", "conf/conf.yml", "conf/conf.yaml", "conf/conf.toml"];

/// Common settings to embed in an application config.
///
/// `conf` is the explicit config file override.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseConf {
    pub conf: String,
    pub name: String,
    pub log_level: String,
}

impl Configurable for BaseConf {
    fn fields(&mut self) -> Vec<Field<'_>> {
        vec![
            Field::scalar("conf", &mut self.conf)
                .usage("conf file, it will override other conf files but not flags"),
            Field::scalar("name", &mut self.name).default_value("multiconf").usage("server name"),
            Field::scalar("log_level", &mut self.log_level)
                .default_value("info")
                .usage("log level, trace/debug/info/warn/error"),
        ]
    }
}

impl ConfPath for BaseConf {
    fn conf_path(&self) -> Option<&str> {
        Some(self.conf.as_str()).filter(|path| !path.is_empty())
    }
}

/// Builder for one run of the pipeline.
///
/// Every collaborator defaults to the process: real arguments, real
/// environment, the working directory, and `tracing` for reporting.
pub struct LoadInTurn {
    args: Option<Vec<OsString>>,
    vars: Option<HashMap<String, String>>,
    base_dir: Option<PathBuf>,
    env_prefix: Option<String>,
    error_handling: ErrorHandling,
    program: Option<String>,
    observer: Rc<dyn Observer>,
}

impl Default for LoadInTurn {
    fn default() -> Self {
        Self {
            args: None,
            vars: None,
            base_dir: None,
            env_prefix: None,
            error_handling: ErrorHandling::Exit,
            program: None,
            observer: Rc::new(TracingObserver),
        }
    }
}

impl LoadInTurn {
    pub fn new() -> Self {
        Self::default()
    }

    /// Command-line arguments, without the program name.
    pub fn args<I, T>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        self.args = Some(args.into_iter().map(Into::into).collect());
        self
    }

    /// Environment variables to read instead of the process environment.
    pub fn vars<K, V>(mut self, vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.vars = Some(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    /// Where the upward search for config files starts.
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    pub fn error_handling(mut self, mode: ErrorHandling) -> Self {
        self.error_handling = mode;
        self
    }

    pub fn program(mut self, name: impl Into<String>) -> Self {
        self.program = Some(name.into());
        self
    }

    pub fn observer(mut self, observer: Rc<dyn Observer>) -> Self {
        self.observer = observer;
        self
    }

    /// Load `conf` from every source and validate it.
    ///
    /// Failures of the conventional sources are only reported to the
    /// observer. Failures of the explicit config file pass and of validation
    /// are returned.
    pub fn load<C: ConfPath>(&self, conf: &mut C) -> Result<()> {
        let mut loaders: Vec<Box<dyn Loader>> = vec![Box::new(DefaultLoader)];
        for path in CONVENTIONAL_PATHS {
            if let Some(loader) = self.file_loader(path) {
                loaders.push(Box::new(loader));
            }
        }
        loaders.push(Box::new(self.env_loader()));
        loaders.push(Box::new(self.flag_loader()));
        MultiLoader::new(loaders).observer(self.observer.clone()).load(conf)?;

        if let Some(path) = conf.conf_path().map(str::to_owned) {
            let mut explicit: Vec<Box<dyn Loader>> = Vec::new();
            if let Some(loader) = self.file_loader(&path) {
                explicit.push(Box::new(loader));
            }
            explicit.push(Box::new(self.flag_loader()));
            MultiLoader::new(explicit)
                .stop_on_error(true)
                .observer(self.observer.clone())
                .load(conf)?;
        }

        RequiredValidator.validate(conf)
    }

    fn file_loader(&self, path: &str) -> Option<FileLoader> {
        let loader = FileLoader::for_path(path)?.observer(self.observer.clone());
        Some(match &self.base_dir {
            Some(dir) => loader.base_dir(dir),
            None => loader,
        })
    }

    fn env_loader(&self) -> EnvironmentLoader {
        let mut loader = EnvironmentLoader::new().camel_case(true);
        if let Some(prefix) = &self.env_prefix {
            loader = loader.prefix(prefix.as_str());
        }
        if let Some(vars) = &self.vars {
            loader = loader.with_vars(vars.clone());
        }
        loader
    }

    fn flag_loader(&self) -> FlagLoader {
        let mut loader = FlagLoader::new().camel_case(true).error_handling(self.error_handling);
        if let Some(args) = &self.args {
            loader = loader.with_args(args.clone());
        }
        if let Some(program) = &self.program {
            loader = loader.program(program.as_str());
        }
        loader
    }
}

/// Run the pipeline against the process arguments, environment and working
/// directory.
pub fn load_in_turn<C: ConfPath>(conf: &mut C) -> Result<()> {
    LoadInTurn::new().load(conf)
}
