use std::path::PathBuf;

use clap::Parser;

use seedapi_gen::{ModelId, ANTHROPIC_MODELS, OPENAI_MODELS};
use seedapi_server::ServerConfig;

#[derive(Debug, Parser)]
#[command(
    name = "seedapi",
    about = "Serve a mock REST API seeded with model-generated sample data",
    version,
    after_help = supported_models(),
)]
pub struct Cli {
    /// Descriptor file (.json or .toml) mapping resource names to item shapes
    pub descriptor_file: PathBuf,

    /// Model used to generate the data
    #[arg(short = 'm', long = "model-id", alias = "modelId", default_value = ModelId::DEFAULT)]
    pub model_id: ModelId,

    /// Port to listen on
    #[arg(short, long, default_value_t = ServerConfig::DEFAULT_PORT)]
    pub port: u16,

    /// Serve this generated-data file instead of generating
    #[arg(short, long, value_name = "PATH")]
    pub serve: Option<PathBuf>,

    /// Path every resource is mounted under
    #[arg(long, alias = "basePath", default_value = ServerConfig::DEFAULT_BASE_PATH)]
    pub base_path: String,

    /// Generate even if the descriptors are unchanged
    #[arg(long)]
    pub regenerate: bool,

    /// Directory holding the generated data and its fingerprint
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    #[arg(short, long)]
    pub verbose: bool,
}

fn supported_models() -> String {
    format!(
        "Supported models:\n  OpenAI:    {}\n  Anthropic: {}",
        OPENAI_MODELS.join(", "),
        ANTHROPIC_MODELS.join(", ")
    )
}
