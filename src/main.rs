#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::style)]

use anyhow::Context;
use clap::Parser;
use subforge::cli::Args;
use subforge::config::AppConfig;
use subforge::convert::{self, Conversion, ConversionStatus};
use subforge::fetch;
use subforge::telemetry;
use tracing::Level;

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let is_verbose = args.verbose;
    tracing_subscriber::fmt()
        .with_max_level(if is_verbose {
            Level::TRACE
        } else {
            Level::INFO
        })
        .init();

    if let Err(e) = run(args).await {
        tracing::error!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => {
            tracing::info!("Loading application config from: {}", path);
            AppConfig::load(path).await?
        }
        None => AppConfig::default(),
    };

    if args.input.is_some() && args.url.is_some() {
        anyhow::bail!("Cannot combine an input file with --url, choose one input source");
    }

    let raw = if let Some(path) = &args.input {
        fetch::read_file(path).await?
    } else if let Some(url) = &args.url {
        fetch::fetch_url(url).await?
    } else {
        fetch::read_stdin().await?
    };

    let body = fetch::unwrap_body(raw);
    let conversion = convert::process_input(&body)?;

    report_lines(&conversion);

    match conversion.status() {
        ConversionStatus::EmptyInput => anyhow::bail!("Input cannot be empty"),
        ConversionStatus::TotalFailure => {
            anyhow::bail!(
                "No valid configurations found ({} links failed)",
                conversion.failure_count()
            )
        }
        ConversionStatus::PartialSuccess => tracing::info!(
            "Converted {} of {} links",
            conversion.success_count(),
            conversion.results.len()
        ),
        ConversionStatus::FullSuccess => {
            tracing::info!("Converted all {} links", conversion.success_count());
        }
    }

    let telemetry_handle = config.telemetry.is_configured().then(|| {
        tokio::spawn(telemetry::report_document(
            config.telemetry.clone(),
            conversion.document.clone(),
        ))
    });

    match args.output.or(config.output) {
        Some(path) => {
            let expanded = fetch::expand_tilde(&path);
            tokio::fs::write(&expanded, &conversion.document)
                .await
                .with_context(|| format!("Failed to write proxy list to {}", expanded))?;
            tracing::info!("Wrote proxy list to {}", expanded);
        }
        // The rendered document already ends with a newline.
        None => print!("{}", conversion.document),
    }

    if let Some(handle) = telemetry_handle {
        let _ = handle.await;
    }

    Ok(())
}

fn report_lines(conversion: &Conversion) {
    for (index, result) in conversion.results.iter().enumerate() {
        let line = index + 1;
        match &result.outcome {
            Ok(record) => tracing::info!(
                "Line {}: {} -> {} ({}:{})",
                line,
                record.kind,
                record.name,
                record.server,
                record.port
            ),
            Err(error) => tracing::warn!("Line {}: {} [{}]", line, error, error.kind()),
        }
    }
}
