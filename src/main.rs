use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use captionscribe::cli::{Cli, Commands};
use captionscribe::config::Config;
use captionscribe::transcribe::TranscriptPipeline;
use captionscribe::{output, server, utils};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "captionscribe=debug"
    } else {
        "captionscribe=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load(cli.config.as_deref()).await?;

    match cli.command {
        Commands::Fetch {
            url,
            language,
            format,
            output,
        } => {
            warn_missing_dependencies(&config).await;

            let pipeline = TranscriptPipeline::new(config);

            let progress = ProgressBar::new_spinner();
            progress.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
            );
            progress.set_message("Downloading captions...");
            progress.enable_steady_tick(Duration::from_millis(120));

            let result = pipeline.fetch_transcript(&url, language.as_deref()).await;
            progress.finish_and_clear();
            let response = result?;

            match output {
                Some(path) => {
                    output::save_to_file(&response, &path, &format).await?;
                    eprintln!("Transcript saved to: {}", path.display());
                }
                None => {
                    output::print_to_console(&response, &format)?;
                }
            }
        }
        Commands::Serve { host, port } => {
            warn_missing_dependencies(&config).await;

            let addr = format!(
                "{}:{}",
                host.unwrap_or_else(|| config.server.host.clone()),
                port.unwrap_or(config.server.port)
            );
            let pipeline = Arc::new(TranscriptPipeline::new(config));
            tracing::info!(
                extractor = pipeline.extractor().platform_name(),
                workspace_root = %pipeline.workspace_root().display(),
                "starting caption API"
            );

            server::serve(pipeline, &addr).await?;
        }
        Commands::Config { show } => {
            if show {
                config.display();
            } else {
                let path = match cli.config {
                    Some(path) => path,
                    None => Config::config_path()?,
                };
                println!("Configuration file: {}", path.display());
                println!("Edit it to change extractor, language and server settings.");
            }
        }
    }

    Ok(())
}

/// Warn (non-fatal) when the extractor binary is not on PATH
async fn warn_missing_dependencies(config: &Config) {
    let missing = utils::check_dependencies(&config.extractor.binary).await;
    if !missing.is_empty() {
        eprintln!("⚠️  Dependency check warnings:");
        for dep in missing {
            eprintln!("   • {}", dep);
        }
        eprintln!("   (Continuing anyway - tools may be available)");
    }
}
