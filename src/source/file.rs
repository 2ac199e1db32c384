//! JSON, YAML and TOML config files

use crate::error::{ConfigError, Result};
use crate::field::{visit_scalars, Configurable, FieldPath};
use crate::naming::file_keys;
use crate::observer::{Observer, TracingObserver};
use crate::source::Loader;
use serde_json::Value;
use std::cell::RefCell;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::rc::Rc;

const READER_ORIGIN: &str = "<reader>";

/// Supported config file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
    Toml,
}

impl Format {
    /// Detects the format from a path suffix: `.toml`, `.json`, `.yml` or
    /// `.yaml`. Anything else is `None`.
    pub fn from_path(path: &str) -> Option<Self> {
        if path.ends_with(".toml") {
            Some(Self::Toml)
        } else if path.ends_with(".json") {
            Some(Self::Json)
        } else if path.ends_with(".yml") || path.ends_with(".yaml") {
            Some(Self::Yaml)
        } else {
            None
        }
    }

    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Toml => "toml",
        }
    }

    /// Decode raw bytes into a value tree.
    fn decode(&self, bytes: &[u8]) -> std::result::Result<Value, String> {
        match self {
            Self::Json => serde_json::from_slice(bytes).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::from_slice(bytes).map_err(|e| e.to_string()),
            Self::Toml => {
                let text = std::str::from_utf8(bytes).map_err(|e| format!("invalid UTF-8: {e}"))?;
                toml::from_str(text).map_err(|e| e.to_string())
            }
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("JSON"),
            Self::Yaml => f.write_str("YAML"),
            Self::Toml => f.write_str("TOML"),
        }
    }
}

enum Input {
    Stream(Box<dyn Read>),
    Buffered(Vec<u8>),
}

/// Loads one config file, or a pre-opened reader, into the target.
///
/// Only keys present in the file are written, so several files can be layered
/// onto the same target.
pub struct FileLoader {
    format: Format,
    path: Option<PathBuf>,
    input: RefCell<Option<Input>>,
    base_dir: Option<PathBuf>,
    observer: Rc<dyn Observer>,
}

impl FileLoader {
    /// A loader with neither path nor reader; loading fails until one is set.
    pub fn new(format: Format) -> Self {
        Self {
            format,
            path: None,
            input: RefCell::new(None),
            base_dir: None,
            observer: Rc::new(TracingObserver),
        }
    }

    pub fn json(path: impl Into<PathBuf>) -> Self {
        Self::new(Format::Json).with_path(path)
    }

    pub fn yaml(path: impl Into<PathBuf>) -> Self {
        Self::new(Format::Yaml).with_path(path)
    }

    pub fn toml(path: impl Into<PathBuf>) -> Self {
        Self::new(Format::Toml).with_path(path)
    }

    /// Picks the loader matching the path suffix, if any.
    pub fn for_path(path: &str) -> Option<Self> {
        Format::from_path(path).map(|format| Self::new(format).with_path(path))
    }

    /// Reads from `reader` instead of any configured path.
    pub fn from_reader(format: Format, reader: impl Read + 'static) -> Self {
        let loader = Self::new(format);
        *loader.input.borrow_mut() = Some(Input::Stream(Box::new(reader)));
        loader
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Directory where the upward search for relative paths starts.
    /// Defaults to the current working directory.
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    pub fn observer(mut self, observer: Rc<dyn Observer>) -> Self {
        self.observer = observer;
        self
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// Returns the bytes to decode and a description of where they came from.
    fn read_source(&self) -> Result<(String, Vec<u8>)> {
        let mut input = self.input.borrow_mut();
        if let Some(Input::Stream(stream)) = input.as_mut() {
            let mut buf = Vec::new();
            if let Err(source) = stream.read_to_end(&mut buf) {
                // A half-read stream cannot be replayed.
                *input = None;
                return Err(ConfigError::Io { origin: READER_ORIGIN.to_string(), source });
            }
            *input = Some(Input::Buffered(buf));
        }
        if let Some(Input::Buffered(bytes)) = input.as_ref() {
            return Ok((READER_ORIGIN.to_string(), bytes.clone()));
        }
        drop(input);

        let Some(path) = &self.path else {
            return Err(ConfigError::SourceNotConfigured);
        };
        let base_dir = match &self.base_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()
                .map_err(|source| ConfigError::Io { origin: "working directory".into(), source })?,
        };

        let (resolved, mut file) = open_config(path, &base_dir)?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(|source| ConfigError::Io {
            origin: resolved.display().to_string(),
            source,
        })?;
        self.observer.file_read(&resolved);
        Ok((resolved.display().to_string(), bytes))
    }
}

impl Loader for FileLoader {
    fn load(&self, target: &mut dyn Configurable) -> Result<()> {
        let (origin, bytes) = self.read_source()?;
        let decode_error =
            |message: String| ConfigError::Decode { format: self.format, origin: origin.clone(), message };

        let tree = self.format.decode(&bytes).map_err(decode_error)?;
        apply_tree(target, &tree, &decode_error)
    }

    fn name(&self) -> String {
        match &self.path {
            Some(path) if self.input.borrow().is_none() => {
                format!("{} file {}", self.format.extension(), path.display())
            }
            _ => format!("{} reader", self.format.extension()),
        }
    }
}

/// Open `path`, searching upward from `base_dir` when it is relative.
///
/// Absolute paths are opened as given. Relative paths are tried as
/// `<ancestor>/<path>` for `base_dir` and each of its ancestors, stopping at
/// the first file that exists; the filesystem root is not tried.
pub fn open_config(path: &Path, base_dir: &Path) -> Result<(PathBuf, File)> {
    if path.is_absolute() {
        return match File::open(path) {
            Ok(file) => Ok((path.to_path_buf(), file)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(ConfigError::FileNotFound { path: path.to_path_buf() })
            }
            Err(source) => Err(ConfigError::Io { origin: path.display().to_string(), source }),
        };
    }

    for dir in base_dir.ancestors() {
        if dir.parent().is_none() {
            break;
        }
        let candidate = dir.join(path);
        match File::open(&candidate) {
            Ok(file) => return Ok((candidate, file)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
            Err(source) => {
                return Err(ConfigError::Io { origin: candidate.display().to_string(), source })
            }
        }
    }
    Err(ConfigError::FileNotFound { path: path.to_path_buf() })
}

/// Write every field whose key appears in `tree`.
fn apply_tree(
    target: &mut dyn Configurable,
    tree: &Value,
    decode_error: &dyn Fn(String) -> ConfigError,
) -> Result<()> {
    match tree {
        Value::Null => return Ok(()),
        Value::Object(_) => {}
        _ => return Err(decode_error("top-level value must be a table".to_string())),
    }

    visit_scalars(target, &mut |path, scalar| {
        let Some(value) = lookup(tree, path) else {
            return Ok(());
        };
        scalar
            .assign_json(value)
            .map_err(|reason| decode_error(format!("field `{}`: {}", path.dotted(), reason)))
    })
}

/// Find the value for `path`, matching keys exactly first and then ignoring
/// ASCII case.
fn lookup<'v>(tree: &'v Value, path: &FieldPath) -> Option<&'v Value> {
    let mut node = tree;
    for key in file_keys(path) {
        let table = node.as_object()?;
        node = match table.get(key) {
            Some(value) => value,
            None => table.iter().find(|(name, _)| name.eq_ignore_ascii_case(key)).map(|(_, v)| v)?,
        };
    }
    Some(node)
}
