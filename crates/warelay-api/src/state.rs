//! Application state wiring the directory, outbound clients, and worker pool.
//!
//! The state is constructed once at startup and passed by handle to the
//! router layer -- no ambient globals -- so each test can build a fresh
//! state with its own directory and a fake outbound client factory.

use std::sync::Arc;

use warelay_core::directory::TenantDirectory;
use warelay_core::dispatch::WorkerPool;
use warelay_core::outbound::OutboundClients;
use warelay_infra::outbound::ClientCache;
use warelay_types::config::Settings;

/// Background workers processing webhook events.
const POOL_WORKERS: usize = 32;
/// Events that may wait in the queue before enqueue starts dropping.
const POOL_CAPACITY: usize = 1024;

#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<TenantDirectory>,
    pub outbound: Arc<dyn OutboundClients>,
    pub pool: WorkerPool,
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Initialize production state: seed the directory in dev, wire the
    /// Cloud API client cache and the worker pool.
    pub async fn init(settings: Settings) -> anyhow::Result<Self> {
        let directory = Arc::new(TenantDirectory::new());

        if settings.is_dev() {
            match &settings.tenant_seed_file {
                Some(path) => match warelay_infra::seed::load_seed_file(path).await {
                    Ok(tenants) => {
                        let count = directory.seed(tenants)?;
                        tracing::info!(count, phone_ids = ?directory.phone_number_ids(), "seeded dev tenants");
                    }
                    Err(err) => tracing::error!(error = %err, "failed to load tenant seed file"),
                },
                None => tracing::warn!("no dev tenants seeded"),
            }
        }

        let outbound = Arc::new(ClientCache::new(
            &settings.graph_base_url,
            &settings.graph_api_version,
        ));

        Ok(Self {
            directory,
            outbound,
            pool: WorkerPool::new(POOL_WORKERS, POOL_CAPACITY),
            settings: Arc::new(settings),
        })
    }
}
