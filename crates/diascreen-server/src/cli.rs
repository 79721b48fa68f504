use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "diascreen-server")]
#[command(version, about = "DiaScreen diabetes risk screening service", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml", env = "DIASCREEN_CONFIG")]
    pub config: String,

    /// Local classifier artifact, overriding the configured source
    #[arg(short, long, env = "DIASCREEN_MODEL")]
    pub model: Option<PathBuf>,

    /// Local threshold artifact, overriding the configured source
    #[arg(short, long, env = "DIASCREEN_THRESHOLD")]
    pub threshold: Option<PathBuf>,

    /// Listen address
    #[arg(short = 'l', long, env = "DIASCREEN_LISTEN")]
    pub listen: Option<String>,

    /// Listen port
    #[arg(short = 'P', long, env = "DIASCREEN_PORT")]
    pub port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}
