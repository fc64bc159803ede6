pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{CliConfig, FetchMode};

pub use adapters::http::ReqwestTransport;
pub use config::{toml_config::TomlConfig, ClientConfig};
pub use crate::core::client::JokeClient;
pub use domain::{context::RequestContext, model::Joke, ports::JokeProvider};
pub use utils::error::{ErrorCategory, JokeError, Result, TransportError};
