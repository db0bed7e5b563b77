use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use crate::adapters::http::create_router;
use crate::adapters::storage::{MemoryRecipeRepository, MongoRecipeRepository, MongoStore};
use crate::app::seed::{read_seed_file, seed_recipes};
use crate::app::RecipeService;
use crate::config::{AppConfig, StorageBackend};
use crate::domain::RecipeRepository;
use crate::utils::error::{RecipeError, Result};

/// Bound listener plus the router that serves it.
pub struct RecipeServer {
    listener: TcpListener,
    router: Router,
    store: Option<MongoStore>,
}

/// Builds the configured repository and the service around it.
///
/// Returns the store handle too (if any) so the caller can close it on shutdown.
pub async fn build_service(config: &AppConfig) -> Result<(RecipeService, Option<MongoStore>)> {
    let (repo, store): (Arc<dyn RecipeRepository>, Option<MongoStore>) = match config.storage {
        StorageBackend::Mongo => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| RecipeError::MissingConfigError {
                    field: "database.url".to_string(),
                })?;
            let store = MongoStore::connect(url, &config.database_name).await?;
            let repo = MongoRecipeRepository::new(&store, config.tag_match);
            (Arc::new(repo), Some(store))
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage; data is lost on exit");
            (Arc::new(MemoryRecipeRepository::new(config.tag_match)), None)
        }
    };

    let service = RecipeService::with_timeout(repo, config.request_timeout);

    if let Some(path) = &config.seed_file {
        info!("Seeding recipes from {}", path.display());
        seed_recipes(&service, read_seed_file(path)?).await?;
    }

    Ok((service, store))
}

impl RecipeServer {
    pub async fn build(config: &AppConfig) -> Result<Self> {
        let (service, store) = build_service(config).await?;
        let mut server = Self::bind(config.listen_addr, service).await?;
        server.store = store;
        Ok(server)
    }

    pub async fn bind(addr: SocketAddr, service: RecipeService) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            router: create_router(service),
            store: None,
        })
    }

    /// The actual address, useful after binding port 0.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serves until Ctrl+C or SIGTERM.
    pub async fn run(self) -> Result<()> {
        self.run_until(shutdown_signal()).await
    }

    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let address = self.local_addr()?;
        info!("Server running on {address}");

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        if let Some(store) = self.store {
            store.shutdown().await;
        }
        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
