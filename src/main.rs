// src/main.rs
use anyhow::Result;
use axum::{ServiceExt, body::Body};
use quire_core::application::{
    ports::{search::Tokenizer, time::Clock},
    services::ApplicationServices,
};
use quire_core::config::AppConfig;
use quire_core::domain::{
    article::{ArticleReadRepository, ArticleStore},
    category::CategoryDirectory,
    signature::SignatureLevelRepository,
};
use quire_core::infrastructure::{
    database,
    repositories::{
        PostgresArticleReadRepository, PostgresArticleStore, PostgresCategoryDirectory,
        PostgresSignatureLevelRepository,
    },
    search::SimpleTokenizer,
    time::SystemClock,
};
use quire_core::presentation::http::{routes::build_router, state::HttpState};
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    if let Err(err) = bootstrap().await {
        tracing::error!(error = %err, "fatal error");
        eprintln!("fatal error: {err}");
        std::process::exit(1);
    }
}

async fn bootstrap() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let workflow = config.workflow();
    tracing::info!(
        draft_mode = workflow.draft_mode,
        auto_release_after_approved = workflow.auto_release_after_approved,
        "workflow settings"
    );

    let pool =
        database::init_pool(config.database_url(), config.database_max_connections()).await?;
    database::run_migrations(&pool).await?;

    let article_store: Arc<dyn ArticleStore> = Arc::new(PostgresArticleStore::new(pool.clone()));
    let article_read_repo: Arc<dyn ArticleReadRepository> =
        Arc::new(PostgresArticleReadRepository::new(pool.clone()));
    let category_directory: Arc<dyn CategoryDirectory> =
        Arc::new(PostgresCategoryDirectory::new(pool.clone()));
    let signature_level_repo: Arc<dyn SignatureLevelRepository> =
        Arc::new(PostgresSignatureLevelRepository::new(pool.clone()));
    let tokenizer: Arc<dyn Tokenizer> = Arc::new(SimpleTokenizer);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let services = Arc::new(ApplicationServices::new(
        article_store,
        article_read_repo,
        category_directory,
        signature_level_repo,
        tokenizer,
        clock,
        workflow,
    ));
    services.signature_levels().refresh().await?;

    let state = HttpState {
        services: Arc::clone(&services),
    };

    let app = build_router(state);
    let service = app.into_service::<Body>().into_make_service();

    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    let address: SocketAddr = listener.local_addr()?;
    tracing::info!("listening on {address}");

    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .unwrap_or_else(|| "info,tower_http=info,sqlx=warn".to_string());

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer());

    if subscriber.try_init().is_err() {
        tracing::warn!("tracing subscriber already initialised");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for CTRL+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("shutdown signal received");
}
