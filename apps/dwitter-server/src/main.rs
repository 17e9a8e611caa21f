// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::error::Error;

use dwitter_server::{
    api::router,
    config::AppConfig,
    state::AppState,
    storage::{DocumentStorage, StoragePaths},
    telemetry::init_tracing,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // A missing .env is normal outside development.
    let dotenv = dotenvy::dotenv();
    init_tracing();
    if let Err(err) = dotenv {
        tracing::debug!("No .env loaded: {err}");
    }

    let config = AppConfig::from_env()?;
    tracing::info!(?config, "Configuration loaded");

    let mut storage = DocumentStorage::new(StoragePaths::new(&config.data_dir));
    storage.initialize()?;
    tracing::info!(data_dir = %config.data_dir.display(), "Document store ready");

    let bind_addr = config.bind_addr();
    let state = AppState::with_document_storage(config, storage);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "Dwitter server listening (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
