use crate::config::toml_config::TomlConfig;
use crate::config::{ClientConfig, DEFAULT_BASE_URL};
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use clap::{Parser, ValueEnum};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FetchMode {
    /// One random joke
    Random,
    /// Ten random jokes
    Ten,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "joke-client")]
#[command(about = "Fetch jokes from a remote joke API")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long, default_value = "5")]
    pub timeout_secs: u64,

    #[arg(long, help = "Load base URL and timeout from a TOML file")]
    pub config: Option<String>,

    #[arg(long, value_enum, default_value_t = FetchMode::Ten)]
    pub mode: FetchMode,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

impl CliConfig {
    /// TOML 檔案優先，否則使用命令列參數
    pub fn resolve(&self) -> Result<ClientConfig> {
        match &self.config {
            Some(path) => {
                tracing::debug!("Loading config from {}", path);
                Ok(TomlConfig::from_file(path)?.to_client_config())
            }
            None => Ok(ClientConfig::new(self.base_url.clone(), self.timeout_secs)),
        }
    }
}

impl ConfigProvider for CliConfig {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
