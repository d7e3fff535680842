//! Palingua HTTP server
//!
//! Starts an Axum web server that serves the translation page and the JSON
//! API backed by the remote generation service.

use axum::{
    Router, middleware,
    routing::{get, post},
};
use clap::Parser;
use palingua::{
    cli::{Cli, Command, generate_config_template},
    config::Config,
    handlers::{self, AppState},
    middleware::request_id_middleware,
    telemetry,
};
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(Command::Config { output }) = cli.command {
        let template = generate_config_template();
        match output {
            Some(path) => {
                std::fs::write(&path, template)?;
                println!("Wrote configuration template to {}", path);
            }
            None => print!("{}", template),
        }
        return Ok(());
    }

    let config = Config::from_file(&cli.config)?;
    telemetry::init(&config.observability.log_level);

    tracing::info!(
        "Starting Palingua server on {}:{}",
        config.server.host,
        config.server.port
    );

    let host = config.server.host.clone();
    let port = config.server.port;
    let state = AppState::new(config)?;

    let app = Router::new()
        .route("/", get(handlers::page::handler))
        .route("/translate", post(handlers::translate::handler))
        .route("/models", get(handlers::models::handler))
        .route("/health", get(handlers::health::handler))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::from((
        host.parse::<std::net::IpAddr>()
            .unwrap_or_else(|_| std::net::IpAddr::from([127, 0, 0, 1])),
        port,
    ));

    tracing::info!("Listening on {}", addr);
    tracing::info!("Translation page available at http://{}/", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
