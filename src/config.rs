// ABOUTME: Command-line and environment configuration for the server and the compare client
// ABOUTME: Every server setting can come from a flag or its environment variable

use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::provider::DEFAULT_BASE_URL;
use crate::types::SupportedModel;

#[derive(Debug, Parser)]
#[command(name = "comparedb", version, about = "Compare database schema scripts with a language model")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the web page and the compare API
    Serve(ServeArgs),
    /// Compare two schema files through a running server
    Compare(CompareArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    #[arg(long, env = "COMPAREDB_BIND", default_value = "0.0.0.0:3000")]
    pub bind: SocketAddr,

    /// Model used when a request does not name one
    #[arg(long, env = "OPENAI_MODEL")]
    pub default_model: Option<String>,

    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub provider_url: String,

    /// Unset means the HTTP client's default (no timeout)
    #[arg(long, env = "OPENAI_TIMEOUT_SECS")]
    pub provider_timeout_secs: Option<u64>,
}

impl ServeArgs {
    pub fn provider_timeout(&self) -> Option<Duration> {
        self.provider_timeout_secs.map(Duration::from_secs)
    }

    pub fn default_model(&self) -> Option<String> {
        self.default_model
            .as_ref()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
    }
}

#[derive(Debug, Clone, Args)]
pub struct CompareArgs {
    #[arg(long, default_value = "http://localhost:3000")]
    pub server: String,

    #[arg(long)]
    pub source: PathBuf,

    #[arg(long)]
    pub target: PathBuf,

    #[arg(long, default_value_t = SupportedModel::default())]
    pub model: SupportedModel,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: String,
}
