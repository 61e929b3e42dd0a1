use std::path::PathBuf;

use clap::{Args, Parser, ValueHint, builder::BoolishValueParser};

/// Command-line arguments for the pkblog binary.
#[derive(Debug, Parser)]
#[command(name = "pkblog", version, about = "Blog post API and PluralKit profile proxy")]
pub struct CliArgs {
    /// Path to the JSON configuration file.
    #[arg(
        long = "config-file",
        env = "PKBLOG_CONFIG_FILE",
        value_name = "PATH",
        value_hint = ValueHint::FilePath,
        default_value = "config.json"
    )]
    pub config_file: PathBuf,

    /// Path to the dotenv file holding the identity API token.
    #[arg(
        long = "env-file",
        env = "PKBLOG_ENV_FILE",
        value_name = "PATH",
        value_hint = ValueHint::FilePath,
        default_value = ".env"
    )]
    pub env_file: PathBuf,

    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    /// Override the listener host.
    #[arg(long = "host", value_name = "HOST")]
    pub host: Option<String>,

    /// Override the listener port.
    #[arg(long = "port", value_name = "PORT")]
    pub port: Option<u16>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Override the document store connection URL.
    #[arg(long = "database-url", value_name = "URL")]
    pub database_url: Option<String>,
}
