use clap::Parser;
use std::path::PathBuf;

use crate::domain::GenerationPolicy;

/// Mock server route generator - turns an interface document into canned responses
#[derive(Parser, Debug, Clone)]
#[command(name = "mockbank", version, about, long_about = None)]
pub struct Cli {
    /// Path to the interface document (JSON or YAML)
    pub spec: PathBuf,

    /// Path to the configuration file
    #[arg(short, long, env = "MOCKBANK_CONFIG", default_value = "mockbank.toml")]
    pub config: PathBuf,

    /// Generation policy: static, random or example
    #[arg(short, long, env = "PROP_GEN")]
    pub policy: Option<GenerationPolicy>,

    /// Port the imposter should listen on
    #[arg(long, env = "MOCKBANK_PORT")]
    pub port: Option<u16>,

    /// Where to write the imposter definition ("-" for stdout)
    #[arg(short, long, default_value = "-")]
    pub output: PathBuf,
}
