//! multiconf: layered configuration loading
//!
//! Populates a typed configuration record from, in increasing precedence,
//! declared defaults, `conf/conf.{json,yml,yaml,toml}`, environment variables
//! and command-line flags, then checks that required fields are set.
//!
//! ```rust,ignore
//! use multiconf::{BaseConf, ConfPath, Configurable, Field};
//!
//! #[derive(Default)]
//! struct Server {
//!     base: BaseConf,
//!     port: u16,
//! }
//!
//! impl Configurable for Server {
//!     fn fields(&mut self) -> Vec<Field<'_>> {
//!         vec![
//!             Field::embedded("base", &mut self.base),
//!             Field::scalar("port", &mut self.port).default_value("8080").required(),
//!         ]
//!     }
//! }
//!
//! impl ConfPath for Server {
//!     fn conf_path(&self) -> Option<&str> {
//!         self.base.conf_path()
//!     }
//! }
//!
//! let mut server = Server::default();
//! multiconf::load_in_turn(&mut server)?;
//! ```

pub mod error;
pub mod field;
pub mod naming;
pub mod observer;
pub mod pipeline;
pub mod source;
pub mod validate;

pub use error::{ConfigError, Result};
pub use field::{visit_scalars, ConfPath, Configurable, Field, FieldMeta, FieldPath, Scalar};
pub use naming::Naming;
pub use observer::{Observer, TracingObserver};
pub use pipeline::{load_in_turn, BaseConf, LoadInTurn, CONVENTIONAL_PATHS};
pub use source::{
    DefaultLoader, EnvironmentLoader, ErrorHandling, FileLoader, FlagLoader, Format, Loader,
    MultiLoader,
};
pub use validate::{MultiValidator, RequiredValidator, Validator};
