//! multiconf: print the effective configuration of a sample server
//!
//! Loads the server configuration from defaults, `conf/conf.*` files,
//! `MULTICONF_*` environment variables and flags, then prints the result.

use anyhow::Result;

mod cli;

fn main() -> Result<()> {
    cli::run()
}
