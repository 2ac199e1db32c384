//! Sample server configuration

use anyhow::{Context, Result};
use multiconf::{BaseConf, ConfPath, Configurable, Field};
use serde::Serialize;

#[derive(Debug, Default, Serialize)]
pub struct DatabaseConf {
    pub url: String,
    pub pool_size: u32,
    pub timeout_secs: Option<u64>,
}

impl Configurable for DatabaseConf {
    fn fields(&mut self) -> Vec<Field<'_>> {
        vec![
            Field::scalar("url", &mut self.url).required().usage("database connection string"),
            Field::scalar("pool_size", &mut self.pool_size)
                .default_value("4")
                .usage("maximum open connections"),
            Field::scalar("timeout_secs", &mut self.timeout_secs).usage("query timeout in seconds"),
        ]
    }
}

#[derive(Debug, Default, Serialize)]
pub struct ServerConf {
    #[serde(flatten)]
    pub base: BaseConf,
    pub host: String,
    pub port: u16,
    pub debug: bool,
    pub tags: Vec<String>,
    #[serde(skip)]
    pub output: String,
    pub database: DatabaseConf,
}

impl Configurable for ServerConf {
    fn fields(&mut self) -> Vec<Field<'_>> {
        vec![
            Field::embedded("base", &mut self.base),
            Field::scalar("host", &mut self.host).default_value("127.0.0.1").usage("address to bind"),
            Field::scalar("port", &mut self.port)
                .default_value("8080")
                .required()
                .usage("port to listen on"),
            Field::scalar("debug", &mut self.debug).usage("enable debug endpoints"),
            Field::scalar("tags", &mut self.tags).usage("comma-separated instance tags"),
            Field::scalar("output", &mut self.output)
                .default_value("toml")
                .usage("format of the printed config: toml/json/yaml"),
            Field::nested("database", &mut self.database),
        ]
    }
}

impl ConfPath for ServerConf {
    fn conf_path(&self) -> Option<&str> {
        self.base.conf_path()
    }
}

impl ServerConf {
    /// Serialize the effective configuration in the `output` format.
    pub fn render(&self) -> Result<String> {
        match self.output.to_ascii_lowercase().as_str() {
            "toml" => toml::to_string(self).context("Failed to render TOML"),
            "json" => serde_json::to_string_pretty(self)
                .map(|mut json| {
                    json.push('\n');
                    json
                })
                .context("Failed to render JSON"),
            "yaml" | "yml" => serde_yaml::to_string(self).context("Failed to render YAML"),
            other => anyhow::bail!("Unsupported output format '{}'", other),
        }
    }
}
