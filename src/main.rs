use canned_replies::config::Config;
use canned_replies::replies::{self, SeedReply};
use canned_replies::server::{AppState, app_router};
use canned_replies::session::StaticUserProvider;
use canned_replies::store::{MemoryPluginStore, PluginStore};
use mimalloc::MiMalloc;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        listen_addr = %cfg.basic.listen_addr,
        listen_port = cfg.basic.listen_port,
        database_url = %cfg.basic.database_url,
        loglevel = %cfg.basic.loglevel,
        mount_path = %cfg.basic.mount_path,
        "Basic config loaded"
    );
    info!(
        enabled = cfg.canned_replies.enabled,
        everyone_enabled = cfg.canned_replies.everyone_enabled,
        everyone_can_edit = cfg.canned_replies.everyone_can_edit,
        groups = %cfg.canned_replies.groups,
        "Canned replies settings loaded"
    );

    let store: Arc<dyn PluginStore> = if cfg.basic.uses_memory_store() {
        warn!("Using in-memory plugin store; replies will not survive a restart");
        Arc::new(MemoryPluginStore::new())
    } else {
        Arc::new(canned_replies::db::spawn(&cfg.basic.database_url).await?)
    };

    let seed = SeedReply {
        title: cfg.canned_replies.default_title.clone(),
        content: cfg.canned_replies.default_body.clone(),
    };
    let repository = replies::spawn(store, seed).await?;

    let users = StaticUserProvider::new(&cfg.users);
    if users.is_empty() {
        warn!("No users configured; every canned reply route will answer 404");
    } else {
        info!(count = users.len(), "Static users loaded");
    }

    let state = AppState::new(repository, Arc::new(users), &cfg.canned_replies);
    let app = app_router(state, &cfg.basic.mount_path);

    let addr = SocketAddr::from((cfg.basic.listen_addr, cfg.basic.listen_port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server has shut down gracefully.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
