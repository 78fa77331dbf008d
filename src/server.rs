//! Reusable server runtime
//!
//! [`ServerHandle`] owns the full lifecycle: metrics recorder, database,
//! migrations, bootstrap admin, REST API and graceful shutdown. The CLI
//! binary is a thin wrapper around it.

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::domain::RepositoryProvider;
use crate::infrastructure::{init_database, run_migrations, SeaOrmRepositoryProvider};
use crate::interfaces::http::{create_api_router, AppState, RouterOptions};
use crate::shared::shutdown::{listen_for_shutdown_signals, ShutdownSignal};

pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup (default: true)
    pub auto_migrate: bool,
    /// Create the bootstrap admin if no approved admin exists (default: true)
    pub create_default_admin: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
            create_default_admin: true,
        }
    }
}

/// Handle to a running server.
///
/// ```rust,no_run
/// use school29::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.install_signal_handler();
///     handle.shutdown_signal().wait().await;
///     handle.wait().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    pub repos: Arc<dyn RepositoryProvider>,
    pub config: AppConfig,
    /// Address actually bound (useful with port 0)
    pub local_addr: SocketAddr,

    db: DatabaseConnection,
    shutdown: ShutdownSignal,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let app_cfg = opts.config;
        app_cfg.validate()?;

        info!("Starting School29 service...");

        let prometheus = prometheus_handle();

        let jwt_config = app_cfg.security.jwt_config()?;
        if app_cfg.security.uses_default_secret() {
            warn!("Using the built-in token signing secret; set SECRET_KEY in production");
        }
        info!(
            algorithm = ?jwt_config.algorithm,
            expire_minutes = jwt_config.expiration_minutes,
            "Session tokens configured"
        );

        // ── Database ───────────────────────────────────────────
        let db = init_database(&app_cfg.database.to_database_config()).await?;
        if opts.auto_migrate {
            run_migrations(&db).await?;
        } else {
            info!("Skipping database migrations");
        }

        // ── Services ───────────────────────────────────────────
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let state = AppState::new(repos.clone(), jwt_config, app_cfg.security.bcrypt_cost);

        if opts.create_default_admin && app_cfg.admin.enabled {
            let admin = &app_cfg.admin;
            match state
                .users
                .ensure_admin(&admin.username, &admin.email, &admin.full_name, &admin.password)
                .await
            {
                Ok(Some(_)) => warn!(
                    username = %admin.username,
                    "Bootstrap admin created; change its password via POST /api/change-password"
                ),
                Ok(None) => {}
                Err(e) => error!("Failed to create bootstrap admin: {}", e),
            }
        }

        // ── REST API ───────────────────────────────────────────
        let router = create_api_router(
            state,
            RouterOptions {
                db: db.clone(),
                metrics: prometheus,
                allowed_origins: app_cfg.cors.allowed_origins.clone(),
            },
        );

        let listener = tokio::net::TcpListener::bind(app_cfg.server.address()).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let shutdown = ShutdownSignal::new();
        let api_shutdown = shutdown.clone();
        let api_task = tokio::spawn(async move {
            let served = axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    api_shutdown.wait().await;
                    info!("REST API received shutdown signal");
                })
                .await;
            if let Err(e) = served {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            repos,
            config: app_cfg,
            local_addr,
            db,
            shutdown,
            api_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// Trigger shutdown on SIGTERM / SIGINT.
    pub fn install_signal_handler(&self) {
        tokio::spawn(listen_for_shutdown_signals(self.shutdown.clone()));
    }

    pub fn trigger_shutdown(&self) {
        self.shutdown.trigger();
    }

    /// Wait for the API task to drain (bounded by `server.shutdown_timeout`),
    /// then close the database.
    pub async fn wait(self) {
        let timeout = Duration::from_secs(self.config.server.shutdown_timeout);
        match tokio::time::timeout(timeout, self.api_task).await {
            Ok(Ok(())) => info!("REST API server stopped"),
            Ok(Err(e)) => error!("REST API task panicked: {}", e),
            Err(_) => warn!(
                timeout_secs = timeout.as_secs(),
                "REST API did not stop in time"
            ),
        }

        match self.db.close().await {
            Ok(()) => info!("Database connection closed"),
            Err(e) => warn!("Error closing database connection: {}", e),
        }
        info!("School29 service shutdown complete");
    }

    pub async fn shutdown(self) {
        info!("Shutting down School29 service...");
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

/// The global recorder can only be installed once per process; later
/// starts reuse the first handle.
fn prometheus_handle() -> Option<PrometheusHandle> {
    static HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();
    HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                info!("Prometheus metrics recorder installed");
                Some(handle)
            }
            Err(e) => {
                warn!("Prometheus recorder unavailable, /metrics disabled: {}", e);
                None
            }
        })
        .clone()
}

/// Initialize tracing from the logging config. `RUST_LOG` wins over
/// `logging.level`. Call once, before [`ServerHandle::start`].
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match config.logging.format.to_lowercase().as_str() {
        "json" => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .try_init(),
        _ => registry.with(tracing_subscriber::fmt::layer()).try_init(),
    };
    if let Err(e) = result {
        eprintln!("tracing already initialized: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn test_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.server.host = "127.0.0.1".into();
        config.server.port = 0;
        config.server.shutdown_timeout = 5;
        config.database.url = Some("sqlite::memory:".into());
        config.database.max_connections = 1;
        config.security.bcrypt_cost = 4;
        config
    }

    async fn get(addr: SocketAddr, path: &str) -> String {
        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        let request = format!(
            "GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
            path
        );
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn starts_serves_and_shuts_down() {
        let handle = ServerHandle::start(ServerOptions {
            config: test_config(),
            ..Default::default()
        })
        .await
        .unwrap();
        assert!(handle.is_running());

        let response = get(handle.local_addr, "/api/").await;
        assert!(response.starts_with("HTTP/1.1 200"), "{}", response);
        assert!(response.contains("School29 Management System API"));

        let admin = handle
            .repos
            .users()
            .get_user_by_username("admin")
            .await
            .unwrap()
            .expect("bootstrap admin");
        assert!(admin.is_admin() && admin.is_approved());

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn invalid_config_is_refused() {
        let mut config = test_config();
        config.security.secret_key = String::new();
        let result = ServerHandle::start(ServerOptions {
            config,
            ..Default::default()
        })
        .await;
        assert!(result.is_err());
    }
}
