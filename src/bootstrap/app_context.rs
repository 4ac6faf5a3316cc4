use std::sync::Arc;

use crate::application::ports::book_client::BookClient;
use crate::application::ports::order_repository::OrderRepository;
use crate::application::services::resilience::{CallPolicy, RetryPolicy};
use crate::bootstrap::config::{CatalogConfig, Config};

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

#[derive(Clone)]
pub struct AppServices {
    order_repo: Arc<dyn OrderRepository>,
    book_client: Arc<dyn BookClient>,
    catalog_policy: CallPolicy,
}

impl AppServices {
    pub fn new(
        order_repo: Arc<dyn OrderRepository>,
        book_client: Arc<dyn BookClient>,
        catalog_policy: CallPolicy,
    ) -> Self {
        Self {
            order_repo,
            book_client,
            catalog_policy,
        }
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn order_repo(&self) -> Arc<dyn OrderRepository> {
        self.services.order_repo.clone()
    }

    pub fn book_client(&self) -> Arc<dyn BookClient> {
        self.services.book_client.clone()
    }

    pub fn catalog_policy(&self) -> &CallPolicy {
        &self.services.catalog_policy
    }
}

impl From<&CatalogConfig> for CallPolicy {
    fn from(c: &CatalogConfig) -> Self {
        CallPolicy {
            timeout: c.timeout,
            retry: RetryPolicy::backoff(c.retry_max, c.retry_backoff),
        }
    }
}
