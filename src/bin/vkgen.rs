//! Command-line entry point for the SDK generator.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use vkgen::{generate, GenConfig};

#[derive(Parser, Debug)]
#[command(name = "vkgen", version, about = "Generate a typed Rust SDK from the VK API JSON schema")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory root (overrides configuration)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Objects schema URL or path (overrides configuration)
    #[arg(long)]
    objects: Option<String>,

    /// Responses schema URL or path (overrides configuration)
    #[arg(long)]
    responses: Option<String>,

    /// Methods schema URL or path (overrides configuration)
    #[arg(long)]
    methods: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match GenConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("vkgen: {e}");
            process::exit(1);
        }
    };

    if let Some(output) = cli.output {
        config.output.root = output;
    }
    if let Some(objects) = cli.objects {
        config.schemas.objects = objects;
    }
    if let Some(responses) = cli.responses {
        config.schemas.responses = responses;
    }
    if let Some(methods) = cli.methods {
        config.schemas.methods = methods;
    }

    match generate(&config) {
        Ok(summary) => {
            println!(
                "generated {} object, {} response and {} method modules under {}",
                summary.objects.files.len(),
                summary.responses.files.len(),
                summary.methods.files.len(),
                config.output.root.display()
            );
        }
        Err(e) => {
            eprintln!("vkgen: {e}");
            process::exit(1);
        }
    }
}
