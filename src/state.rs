use std::sync::Arc;

use crate::clients::board::BoardClient;
use crate::config::Config;
use crate::domain::CategoryRegistry;
use crate::services::{
    AdmissionController, AdmissionPolicy, BoardNoticeSource, ListingService, NoticeSource,
};

/// Build the HTTP client used for board scraping.
fn build_shared_http_client(config: &Config) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.source.request_timeout())
        .user_agent(config.source.user_agent.clone())
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

/// Process-lifetime components, constructed once at startup and handed to the router.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub admission: Arc<AdmissionController>,

    pub registry: Arc<CategoryRegistry>,

    pub listings: ListingService,
}

impl SharedState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http_client = build_shared_http_client(&config)?;
        let board = BoardClient::with_shared_client(http_client, &config.source.base_url)?;
        let source = Arc::new(BoardNoticeSource::new(
            Arc::new(board),
            config.source.request_timeout(),
        ));

        Ok(Self::with_source(config, source))
    }

    /// Wires everything around an arbitrary notice source.
    #[must_use]
    pub fn with_source(config: Config, source: Arc<dyn NoticeSource>) -> Self {
        let registry = Arc::new(CategoryRegistry::builtin());
        let admission = Arc::new(AdmissionController::new(AdmissionPolicy::from(
            &config.rate_limit,
        )));
        let listings = ListingService::new(
            registry.clone(),
            source,
            config.source.article_limit,
            config.source.scan_limit,
            config.source.utc_offset(),
        );

        Self {
            config: Arc::new(config),
            admission,
            registry,
            listings,
        }
    }
}
