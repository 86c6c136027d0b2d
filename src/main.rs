use std::{process, sync::Arc};

use folio::{
    application::{
        admin::AdminService,
        error::AppError,
        notify::Notifier,
        repos::AdminRepo,
    },
    cache::{CacheConfig, SharedCache},
    config,
    infra::{
        bootstrap::{Backends, StateOptions, assemble_state},
        db::PostgresRepositories,
        error::InfraError,
        http::{self, RouterOptions},
        mail::{LogNotifier, RelayConfig, RelayNotifier},
        memory::MemoryRepositories,
        telemetry,
    },
};
use tokio::sync::Notify;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
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
    let (cli_args, settings) = config::load_with_cli()?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::SeedAdmin(args) => run_seed_admin(settings, args).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let backends = init_backends(&settings).await?;
    let notifier = build_notifier(&settings)?;

    let cache_config = CacheConfig::from(&settings.cache);
    let cache = Arc::new(SharedCache::new(&cache_config));
    let sweeper = cache_config
        .sweep_interval
        .map(|interval| cache.spawn_sweeper(interval));

    let state = assemble_state(
        backends,
        cache,
        notifier,
        StateOptions::from_settings(&settings),
    );
    let router = http::build_router(
        state,
        &RouterOptions {
            allowed_origin: settings.server.allowed_origin.clone(),
            static_dir: settings.server.static_dir.clone(),
        },
    );

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| InfraError::bind(settings.server.addr, err))?;
    info!(
        target = "folio::serve",
        addr = %settings.server.addr,
        "listening"
    );

    let grace = settings.server.graceful_shutdown;
    let draining = Arc::new(Notify::new());
    let signal = {
        let draining = draining.clone();
        async move {
            shutdown_signal().await;
            draining.notify_one();
        }
    };
    let server = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(signal)
        .into_future();
    let drain_deadline = async {
        draining.notified().await;
        tokio::time::sleep(grace).await;
    };

    let result = tokio::select! {
        result = server => {
            result.map_err(|err| AppError::unexpected(format!("server error: {err}")))
        }
        _ = drain_deadline => {
            warn!(
                target = "folio::serve",
                grace_seconds = grace.as_secs(),
                "graceful shutdown timed out; dropping open connections"
            );
            Ok(())
        }
    };

    if let Some(handle) = sweeper {
        handle.abort();
        let _ = handle.await;
    }

    info!(target = "folio::serve", "server stopped");
    result
}

async fn run_seed_admin(
    settings: config::Settings,
    args: config::SeedAdminArgs,
) -> Result<(), AppError> {
    let database_url = settings.database.require_url()?;
    let backends = connect_postgres(&settings, database_url).await?;
    let admins: Arc<dyn AdminRepo> = backends.admins;
    let record = AdminService::new(admins).seed_admin(&args.email).await?;
    info!(
        target = "folio::seed_admin",
        admin_id = %record.id,
        email = %record.email,
        "admin record ready"
    );
    Ok(())
}

async fn init_backends(settings: &config::Settings) -> Result<Backends, AppError> {
    let Some(database_url) = settings.database.url.as_ref() else {
        warn!(
            target = "folio::serve",
            "database.url is not configured; records are kept in memory only"
        );
        return Ok(Backends::uniform(Arc::new(MemoryRepositories::new())));
    };

    connect_postgres(settings, database_url).await
}

async fn connect_postgres(
    settings: &config::Settings,
    database_url: &str,
) -> Result<Backends, AppError> {
    let pool = PostgresRepositories::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(InfraError::Connect)?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(InfraError::from)?;
    info!(target = "folio::serve", "database migrations applied");

    Ok(Backends::uniform(Arc::new(PostgresRepositories::new(pool))))
}

fn build_notifier(settings: &config::Settings) -> Result<Arc<dyn Notifier>, AppError> {
    let Some(mail) = settings.mail.as_ref() else {
        warn!(
            target = "folio::serve",
            "mail.relay_url is not configured; notifications are logged only"
        );
        return Ok(Arc::new(LogNotifier));
    };

    let notifier = RelayNotifier::new(RelayConfig {
        url: mail.relay_url.clone(),
        api_token: mail.api_token.clone(),
        from: mail.from.clone(),
        to: mail.to.clone(),
        timeout: mail.timeout,
    })
    .map_err(InfraError::from)?;

    Ok(Arc::new(notifier))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(target = "folio::serve", error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(target = "folio::serve", error = %err, "failed to listen for SIGTERM");
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

    info!(target = "folio::serve", "shutdown signal received");
}
