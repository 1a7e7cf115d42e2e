use std::sync::Arc;

use common::identity::IdentityProvider;
use common::repository::PartitionedRepository;
use common::storage::AssetStore;

use crate::config::AppConfig;
use crate::submission::SubmissionService;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub repository: PartitionedRepository,
    pub assets: Arc<dyn AssetStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub submissions: SubmissionService,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        repository: PartitionedRepository,
        assets: Arc<dyn AssetStore>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        let submissions =
            SubmissionService::new(assets.clone(), repository.clone(), config.submission.clone());
        Self {
            config,
            repository,
            assets,
            identity,
            submissions,
        }
    }
}
