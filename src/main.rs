use anyhow::{anyhow, Result};
use clap::{Parser, ValueEnum};
use classifier::core::RequestState;
use classifier::main::Classifier;
use classifier::render::Render;
use config::{BodyFraming, Config};
use device_display::impl_console::DeviceDisplayConsole;
use image_codec::impl_jpeg::ImageCodecJpeg;
use image_codec::interface::ImageReference;
use library::logger::impl_console::LoggerConsole;
use library::logger::impl_tracing::LoggerTracing;
use library::logger::interface::Logger;
use scoring_client::impl_fake::ScoringClientFake;
use scoring_client::impl_http::ScoringClientHttp;
use scoring_client::interface::ScoringClient;
use selection::SelectionState;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod acceptance_policy;
mod classifier;
mod config;
mod device_display;
mod image_codec;
mod library;
mod scoring_client;
mod selection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Tracing,
    Console,
}

/// Identify a herb from a photo using a remote scoring service
#[derive(Debug, Parser)]
#[command(name = "herb-scan", version)]
struct Args {
    /// Photo to identify
    image: PathBuf,

    /// Base URL of the scoring service
    #[arg(long, env = "HERB_SCAN_ENDPOINT")]
    endpoint: Option<String>,

    /// Bearer token for the scoring service
    #[arg(long, env = "HERB_SCAN_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Deployment the request is routed to
    #[arg(long, env = "HERB_SCAN_DEPLOYMENT")]
    deployment: Option<String>,

    /// Request timeout in seconds, 0 disables it
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Scale the photo to WIDTHxHEIGHT before encoding
    #[arg(long, value_parser = parse_size)]
    resize: Option<(u32, u32)>,

    /// Send the payload as a JSON string literal instead of a bare body
    #[arg(long)]
    json_body: bool,

    /// How many times to retry after a retryable failure
    #[arg(long, default_value_t = 0)]
    retries: u32,

    /// Answer with random herbs instead of calling the service
    #[arg(long)]
    fake: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Tracing)]
    log: LogFormat,
}

fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {:?}", value))?;
    let width = width
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid width: {}", e))?;
    let height = height
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid height: {}", e))?;
    if width == 0 || height == 0 {
        return Err("width and height must be positive".to_string());
    }
    Ok((width, height))
}

fn config_from_args(args: &Args) -> Config {
    let mut config = Config::default();

    if let Some(endpoint) = &args.endpoint {
        config.scoring.base_url = endpoint.clone();
    }
    if let Some(token) = &args.token {
        config.scoring.bearer_token = token.clone();
    }
    if let Some(deployment) = &args.deployment {
        config.scoring.deployment = deployment.clone();
    }
    if let Some(timeout_secs) = args.timeout_secs {
        config.scoring.timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));
    }
    if args.json_body {
        config.scoring.body_framing = BodyFraming::JsonString;
    }
    config.codec.resize = args.resize;

    config
}

/// Renders every state change until Success or Error.
async fn render_until_settled(
    receiver: &mut watch::Receiver<RequestState>,
    render: &Render,
) -> Result<RequestState> {
    loop {
        let state = receiver.borrow_and_update().clone();
        render
            .render(&state)
            .map_err(|e| anyhow!("render failed: {}", e))?;

        if state.is_settled() {
            return Ok(state);
        }

        receiver.changed().await?;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting herb-scan {}", env!("CARGO_PKG_VERSION"));

    let config = config_from_args(&args);

    let logger: Arc<dyn Logger + Send + Sync> = match args.log {
        LogFormat::Tracing => Arc::new(LoggerTracing::new()),
        LogFormat::Console => Arc::new(LoggerConsole::new(config.logger_timezone)),
    };

    let image_codec = Arc::new(ImageCodecJpeg::new(config.codec.clone(), logger.clone()));

    let scoring_client: Arc<dyn ScoringClient + Send + Sync> = if args.fake {
        Arc::new(ScoringClientFake::new(logger.clone()))
    } else {
        Arc::new(ScoringClientHttp::new(config.scoring.clone(), logger.clone())?)
    };

    let classifier = Classifier::new(logger.clone(), image_codec, scoring_client);
    let render = Render::new(
        Arc::new(Mutex::new(DeviceDisplayConsole::new())),
        config.policy.clone(),
    );
    let mut receiver = classifier.subscribe();

    let mut selection = SelectionState::new();
    selection.select(ImageReference::new(args.image.to_string_lossy()));

    classifier.submit(selection.current().clone())?;

    let mut retries_left = args.retries;
    let final_state = loop {
        let state = render_until_settled(&mut receiver, &render).await?;

        match &state {
            RequestState::Error(reason) if reason.is_retryable() && retries_left > 0 => {
                retries_left -= 1;
                info!(reason = %reason, retries_left, "Retrying classification");
                classifier.retry()?;
            }
            _ => break state,
        }
    };

    classifier.shutdown();
    selection.reset();

    match final_state {
        RequestState::Error(reason) => Err(anyhow!("identification failed: {}", reason)),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("224x224"), Ok((224, 224)));
        assert_eq!(parse_size("640X480"), Ok((640, 480)));
        assert!(parse_size("224").is_err());
        assert!(parse_size("0x10").is_err());
        assert!(parse_size("axb").is_err());
    }

    #[test]
    fn test_args_override_config() {
        let args = Args::parse_from([
            "herb-scan",
            "photo.jpg",
            "--endpoint",
            "http://localhost:9000",
            "--token",
            "secret",
            "--timeout-secs",
            "0",
            "--resize",
            "224x224",
            "--json-body",
        ]);

        let config = config_from_args(&args);

        assert_eq!(config.scoring.base_url, "http://localhost:9000");
        assert_eq!(config.scoring.bearer_token, "secret");
        assert_eq!(config.scoring.timeout, None);
        assert_eq!(config.scoring.body_framing, BodyFraming::JsonString);
        assert_eq!(config.codec.resize, Some((224, 224)));
        assert_eq!(config.scoring.deployment, "herbs-detect-server");
    }
}
