use std::{process, sync::Arc};

use pkblog::{
    application::{error::AppError, identity::IdentityService, posts::PostService},
    config,
    infra::{
        cache::{MemberCache, spawn_purge_task},
        db::MongoRepositories,
        error::InfraError,
        http::{self, HttpState},
        identity::PluralKitClient,
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (_cli, settings) = config::load_with_cli()?;
    telemetry::init(&settings.logging)?;

    let repositories = MongoRepositories::connect(&settings.database)
        .await
        .map_err(|err| InfraError::database(err.to_string()))?;
    repositories
        .health_check()
        .await
        .map_err(|err| InfraError::database(format!("failed to ping document store: {err}")))?;
    info!(target = "pkblog::db", "document store reachable");

    let identity_client = PluralKitClient::new(&settings.identity)?;
    let cache = MemberCache::from_settings(&settings.cache);
    let purge_handle = spawn_purge_task(cache.clone(), settings.cache.purge_interval);

    let identity = IdentityService::new(
        Arc::new(identity_client),
        cache,
        settings.identity.system_id.clone(),
    )
    .with_read_through(settings.cache.read_through);

    let state = HttpState {
        posts: Arc::new(PostService::new(Arc::new(repositories))),
        identity: Arc::new(identity),
        modded_message: Arc::from(settings.modded_message.as_str()),
    };

    let result = serve_http(&settings.server, state).await;

    purge_handle.abort();
    let _ = purge_handle.await;

    result
}

async fn serve_http(server: &config::ServerSettings, state: HttpState) -> Result<(), AppError> {
    let router = http::build_router(state);

    let listener = tokio::net::TcpListener::bind(server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    info!(target = "pkblog::http", addr = %server.addr, "listening");

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    info!(target = "pkblog::http", "server stopped");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(error = %err, "failed to install Ctrl+C handler");
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
                error!(error = %err, "failed to install SIGTERM handler");
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

    info!(target = "pkblog::http", "shutdown signal received");
}
