//! Command-line flags

use crate::error::{ConfigError, Result};
use crate::field::{visit_scalars, Configurable};
use crate::naming::Naming;
use crate::source::Loader;
use clap::error::ErrorKind;
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::collections::HashSet;
use std::ffi::OsString;

/// What to do with unknown or malformed arguments, and with `--help`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorHandling {
    /// Return the error to the caller.
    Continue,
    /// Print the diagnostic (or help) and exit the process.
    #[default]
    Exit,
    /// Panic with the diagnostic.
    Panic,
}

/// Registers one long flag per scalar field and parses the argument list.
///
/// The default shown for each flag is the field's value at the time of the
/// call, so it reflects whatever earlier loaders already applied. Only flags
/// actually given on the command line are written back.
#[derive(Debug, Clone)]
pub struct FlagLoader {
    naming: Naming,
    error_handling: ErrorHandling,
    args: Option<Vec<OsString>>,
    program: String,
}

impl Default for FlagLoader {
    fn default() -> Self {
        Self {
            naming: Naming::default(),
            error_handling: ErrorHandling::default(),
            args: None,
            program: default_program_name(),
        }
    }
}

fn default_program_name() -> String {
    std::env::args_os()
        .next()
        .map(std::path::PathBuf::from)
        .and_then(|path| path.file_name().map(|name| name.to_string_lossy().into_owned()))
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
}

impl FlagLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.naming = self.naming.prefix(prefix);
        self
    }

    pub fn flatten(mut self, flatten: bool) -> Self {
        self.naming = self.naming.flatten(flatten);
        self
    }

    pub fn camel_case(mut self, camel_case: bool) -> Self {
        self.naming = self.naming.camel_case(camel_case);
        self
    }

    pub fn error_handling(mut self, mode: ErrorHandling) -> Self {
        self.error_handling = mode;
        self
    }

    /// Parse `args` (without the program name) instead of the process
    /// arguments.
    pub fn with_args<I, T>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        self.args = Some(args.into_iter().map(Into::into).collect());
        self
    }

    /// Program name shown in help and usage output.
    pub fn program(mut self, name: impl Into<String>) -> Self {
        self.program = name.into();
        self
    }

    /// Builds the flag set for the current state of `target`.
    pub fn command(&self, target: &mut dyn Configurable) -> Result<Command> {
        let mut seen: HashSet<String> = HashSet::from(["help".to_string()]);
        let mut args: Vec<Arg> = Vec::new();

        visit_scalars(target, &mut |path, scalar| {
            let name = self.naming.flag_name(path);
            if name.is_empty() || !seen.insert(name.clone()) {
                return Err(ConfigError::Flag(format!(
                    "flag --{} for field `{}` is defined more than once",
                    name,
                    path.dotted()
                )));
            }

            let mut arg = Arg::new(name.clone())
                .long(name)
                .value_name(scalar.kind().to_uppercase())
                .help(path.leaf().usage)
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(String));
            if scalar.is_switch() {
                arg = arg.num_args(0..=1).require_equals(true).default_missing_value("true");
            } else {
                // The next argument is the value even when it starts with `-`.
                arg = arg.allow_hyphen_values(true);
            }
            let current = scalar.render();
            if !current.is_empty() {
                arg = arg.default_value(current);
            }
            args.push(arg);
            Ok(())
        })?;

        Ok(Command::new(self.program.clone())
            .no_binary_name(true)
            .disable_version_flag(true)
            .args(args))
    }

    fn parse(&self, command: Command) -> Result<ArgMatches> {
        let args = match &self.args {
            Some(args) => args.clone(),
            None => std::env::args_os().skip(1).collect(),
        };
        match command.try_get_matches_from(args) {
            Ok(matches) => Ok(matches),
            Err(err) => match self.error_handling {
                ErrorHandling::Continue => {
                    let rendered = err.render().to_string();
                    if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                        Err(ConfigError::Help(rendered))
                    } else {
                        Err(ConfigError::Flag(rendered.trim_end().to_string()))
                    }
                }
                ErrorHandling::Exit => err.exit(),
                ErrorHandling::Panic => panic!("{}", err.render()),
            },
        }
    }
}

impl Loader for FlagLoader {
    fn load(&self, target: &mut dyn Configurable) -> Result<()> {
        let command = self.command(target)?;
        let matches = self.parse(command)?;

        visit_scalars(target, &mut |path, scalar| {
            let name = self.naming.flag_name(path);
            if matches.value_source(&name) != Some(ValueSource::CommandLine) {
                return Ok(());
            }
            let Some(raw) = matches.get_one::<String>(&name) else {
                return Ok(());
            };
            scalar.parse_str(raw).map_err(|reason| ConfigError::Parse {
                origin: "flag",
                name: format!("--{name}"),
                value: raw.clone(),
                reason,
            })
        })
    }

    fn name(&self) -> String {
        "flags".to_string()
    }
}
