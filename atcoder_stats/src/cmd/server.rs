use crate::{
    cmd::create_service,
    modules::{
        config::AppConfig,
        handlers::{liveness, readiness, user_page, user_page_json},
        user_page::UserPageService,
    },
};
use anyhow::Result;
use axum::{extract::Extension, routing, Router, Server};
use clap::Args;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::trace::TraceLayer;

#[derive(Debug, Args)]
pub struct ServerArgs {
    #[arg(long)]
    port: Option<u16>,
}

pub async fn run(args: ServerArgs) -> Result<()> {
    let config = AppConfig::from_env()?;
    let service = create_service(&config)?;

    let purge_interval = config.cache_ttl.max(Duration::from_secs(1));
    let client = service.client().clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(purge_interval);
        loop {
            interval.tick().await;
            let purged = client.purge_expired().await;
            if purged > 0 {
                tracing::debug!("purged {} expired cache entries", purged);
            }
        }
    });

    let app = create_router(service);
    let port = match args.port {
        Some(port) => port,
        None => {
            tracing::warn!("Server will be launched at default port number 8000");
            8000u16
        }
    };
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Server start at port {}", port);
    Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Failed to bind server.");

    Ok(())
}

pub fn create_router(service: Arc<UserPageService>) -> Router {
    Router::new()
        .route("/user/:user_id", routing::get(user_page))
        .route("/api/user/:user_id", routing::get(user_page_json))
        .route("/api/liveness", routing::get(liveness))
        .route("/api/readiness", routing::get(readiness))
        .layer(Extension(service))
        .layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler.");
    };

    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("SIGINT signal received, starting graceful shutdown.");
}
