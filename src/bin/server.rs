use std::sync::Arc;

use clap::Parser;
use pack_calculator::api;
use pack_calculator::config::ServerConfig;
use pack_calculator::service::OrderService;
use pack_calculator::store::MemoryStore;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = ServerConfig::parse();

    let _sentry = config.sentry_dsn.as_deref().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(config.log_level)
        .init();

    let store = MemoryStore::with_packs(config.pack_sizes.iter().copied());
    let service = OrderService::new(Arc::new(store)).with_max_quantity(config.max_quantity);
    tracing::info!(
        pack_sizes = ?config.pack_sizes,
        max_quantity = config.max_quantity,
        "starting server"
    );

    let app = api::router(service).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    let addr = config.address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    eprintln!("Listening on {addr}");
    axum::serve(listener, app).await
}
