use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use plant_voice::config::Config;
use plant_voice::routes;
use plant_voice::state::AppState;

/// HTTP service: image upload → remote classifier → spoken narration
#[derive(Debug, Parser)]
#[command(name = "plant-voice", version)]
struct Args {
    /// YAML or JSON config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Remote classifier endpoint
    #[arg(long)]
    endpoint_url: Option<String>,
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    plant_voice::init_tracing();
    let args = Args::parse();

    let mut config = Config::resolve(args.config.as_deref())?;
    if let Some(url) = args.endpoint_url {
        config.endpoint_url = url;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    info!("Classifier endpoint: {}", config.endpoint_url);

    let host: std::net::IpAddr = config
        .server
        .host
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid host {:?}: {}", config.server.host, e))?;
    let addr = SocketAddr::new(host, config.server.port);

    let app_state = AppState::new(config)?;
    let app = routes::app(app_state);

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
