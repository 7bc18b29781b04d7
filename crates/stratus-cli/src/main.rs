mod args;
mod config;
mod output;

use anyhow::{anyhow, Result};
use chrono::Utc;
use clap::Parser;
use tracing::warn;

use stratus_common::telemetry::{self, OtlpExport};
use stratus_common::{builtin_models, builtin_template, load_models, Message, Role};
use stratus_plan::DeploymentBuilder;
use stratus_provision::{provision, HttpBackend, MemoryBackend, ProvisioningBackend};

use crate::args::{Args, Command, OutputFormat};
use crate::config::build_config;
use crate::output::{print_models, print_plan, print_report};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let provider = telemetry::init_tracing(
        "stratus",
        &OtlpExport {
            endpoint: args.otlp_endpoint.clone(),
            token: args.otlp_token.clone(),
        },
    );

    let result = run(args).await;
    telemetry::shutdown(provider);
    result
}

async fn run(args: Args) -> Result<()> {
    let records = match &args.models {
        Some(path) => load_models(path)?,
        None => builtin_models(),
    };
    let config = build_config(&args.deploy);
    let region = config.region.clone();
    let builder = DeploymentBuilder::new(config);

    match args.command {
        Command::Models => print_models(&records),
        Command::Plan { timestamp, output } => {
            let plan = builder.build(&records, timestamp.unwrap_or_else(Utc::now))?;
            match output {
                OutputFormat::Table => print_plan(&plan),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
            }
        }
        Command::Deploy {
            timestamp,
            control_plane_url,
            token,
        } => {
            let plan = builder.build(&records, timestamp.unwrap_or_else(Utc::now))?;
            let backend: Box<dyn ProvisioningBackend> = match control_plane_url {
                Some(url) => Box::new(HttpBackend::new(url, token)),
                None => {
                    warn!("no control plane configured, running against the in-memory platform");
                    Box::new(MemoryBackend::new(region))
                }
            };
            let report = provision(&plan, backend.as_ref()).await?;
            print_report(&report);
        }
        Command::Prompt {
            model,
            system,
            message,
        } => {
            let record = records
                .iter()
                .find(|r| r.name == model)
                .ok_or_else(|| anyhow!("unknown model '{model}'"))?;
            let template = builtin_template(&record.prompt_template_name).ok_or_else(|| {
                anyhow!("no prompt template named '{}'", record.prompt_template_name)
            })?;

            let mut messages = Vec::new();
            if let Some(s) = system {
                messages.push(Message::new(Role::System, s));
            }
            messages.push(Message::new(Role::User, message));
            println!("{}", template.render(&messages));
        }
    }

    Ok(())
}
