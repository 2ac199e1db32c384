//! Command-line interface for multiconf
//!
//! Every flag is derived from the fields of [`ServerConf`]; `--help` lists
//! them together with their current defaults.

use anyhow::{Context, Result};
use multiconf::{ErrorHandling, LoadInTurn};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod server;

use server::ServerConf;

/// Prefix of every environment variable the binary reads.
pub const ENV_PREFIX: &str = "MULTICONF";

pub fn run() -> Result<()> {
    // RUST_LOG in the environment always takes precedence; otherwise only warnings are shown.
    let filter = EnvFilter::from_default_env().add_directive(Level::WARN.into());
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    let mut conf = ServerConf::default();
    LoadInTurn::new()
        .env_prefix(ENV_PREFIX)
        .program(env!("CARGO_PKG_NAME"))
        .error_handling(ErrorHandling::Exit)
        .load(&mut conf)
        .context("Failed to load configuration")?;

    tracing::debug!("Loaded configuration for {}", conf.base.name);
    print!("{}", conf.render()?);
    Ok(())
}
