use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "stratus")]
#[command(about = "Plan and provision model-serving endpoints", long_about = None)]
pub struct Args {
    /// JSON model table; the built-in table is used when absent
    #[arg(long, env = "STRATUS_MODELS")]
    pub models: Option<PathBuf>,

    #[command(flatten)]
    pub deploy: DeployArgs,

    /// OTLP/HTTP collector base URL for span export
    #[arg(long, env = "OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,

    /// Bearer token for the OTLP collector
    #[arg(long, env = "OTLP_TOKEN")]
    pub otlp_token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, ClapArgs)]
pub struct DeployArgs {
    /// Stage tag prefixed to endpoint and config names (e.g. "dev")
    #[arg(long, env = "STRATUS_STAGE")]
    pub stage: Option<String>,

    #[arg(long, env = "STRATUS_REGION", default_value = "ap-northeast-1")]
    pub region: String,

    /// ARN partition used for storage grants
    #[arg(long, env = "STRATUS_PARTITION", default_value = "aws")]
    pub partition: String,

    /// Registry account of the serving image; empty for an unqualified reference
    #[arg(long, env = "STRATUS_IMAGE_ACCOUNT", default_value = "763104351884")]
    pub image_registry_account: String,

    #[arg(
        long,
        env = "STRATUS_IMAGE_REPOSITORY",
        default_value = "huggingface-pytorch-tgi-inference"
    )]
    pub image_repository: String,

    #[arg(
        long,
        env = "STRATUS_IMAGE_TAG",
        default_value = "2.1.1-tgi1.4.5-gpu-py310-cu121-ubuntu22.04"
    )]
    pub image_tag: String,

    #[arg(long, default_value = "llm-jp-endpoint")]
    pub endpoint_base_name: String,

    #[arg(long, default_value = "llm-jp-endpoint-config")]
    pub endpoint_config_base_name: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the model table
    Models,
    /// Build the deployment plan and print it
    Plan {
        /// Deploy time (RFC 3339); defaults to now
        #[arg(long)]
        timestamp: Option<DateTime<Utc>>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
    /// Build the plan and create its resources in dependency order
    Deploy {
        /// Deploy time (RFC 3339); defaults to now
        #[arg(long)]
        timestamp: Option<DateTime<Utc>>,

        /// Control plane base URL; without it the plan runs against an
        /// in-memory platform
        #[arg(long, env = "STRATUS_CONTROL_PLANE_URL")]
        control_plane_url: Option<String>,

        /// Control plane API token (Authorization: Bearer)
        #[arg(long, env = "STRATUS_TOKEN")]
        token: Option<String>,
    },
    /// Render a prompt with the template of a model
    Prompt {
        /// Model name from the table
        #[arg(long)]
        model: String,

        #[arg(long)]
        system: Option<String>,

        /// User message
        message: String,
    },
}
