//! HTTP server initialization and runtime setup.
//!
//! Handles store connection, code generator selection, and Axum server lifecycle.

use crate::application::services::ShortenerService;
use crate::config::{CodeStrategy, Config, StoreBackend};
use crate::domain::repositories::MappingRepository;
use crate::infrastructure::store::{InMemoryMappingStore, RedisMappingStore};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::code_generator::{AlphabetGenerator, CodeGenerator, IdEncoding, RandomIdGenerator};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

/// Opens the configured mapping store.
///
/// Redis connections are retried with jittered exponential backoff
/// (10ms, 100ms, 1s, capped at 5s) `store_connect_retries` times.
///
/// # Errors
///
/// Returns an error if the store is still unreachable after the last retry.
pub async fn build_repository(config: &Config) -> Result<Arc<dyn MappingRepository>> {
    match config.store_backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; mappings are lost on restart");
            Ok(Arc::new(InMemoryMappingStore::new()))
        }
        StoreBackend::Redis => {
            let strategy = ExponentialBackoff::from_millis(10)
                .factor(10)
                .max_delay(Duration::from_secs(5))
                .map(jitter)
                .take(config.store_connect_retries);

            let store = Retry::start(strategy, || async {
                RedisMappingStore::connect(
                    &config.redis_url,
                    config.redis_key_prefix.clone(),
                    config.reserve_mode,
                )
                .await
                .inspect_err(|e| tracing::warn!("Redis connection attempt failed: {}", e))
            })
            .await
            .context("Failed to connect to Redis")?;

            Ok(Arc::new(store))
        }
    }
}

/// Builds the code generator selected by `CODE_STRATEGY`.
///
/// # Errors
///
/// Returns an error if the alphabet strategy is configured with an invalid length.
pub fn build_generator(config: &Config) -> Result<Arc<dyn CodeGenerator>> {
    let generator: Arc<dyn CodeGenerator> = match config.code_strategy {
        CodeStrategy::Base58 => Arc::new(RandomIdGenerator::new(IdEncoding::Base58)),
        CodeStrategy::Base62 => Arc::new(RandomIdGenerator::new(IdEncoding::Base62)),
        CodeStrategy::Alphabet => Arc::new(AlphabetGenerator::alphanumeric(
            config.code_length,
            config.code_exclude_ambiguous,
        )?),
    };

    Ok(generator)
}

/// Wires the store and generator into a [`ShortenerService`].
pub async fn build_shortener(config: &Config) -> Result<ShortenerService<dyn MappingRepository>> {
    let repository = build_repository(config).await?;
    let generator = build_generator(config)?;

    Ok(
        ShortenerService::new(repository, generator, config.base_url.clone())
            .with_max_attempts(config.max_attempts),
    )
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Mapping store (Redis with retries, or in-memory)
/// - Code generator
/// - Axum HTTP server with graceful shutdown on Ctrl+C / SIGTERM
///
/// # Errors
///
/// Returns an error if:
/// - The store cannot be reached
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let shortener = build_shortener(&config).await?;
    let state = AppState::new(Arc::new(shortener));

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
