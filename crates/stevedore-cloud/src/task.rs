use stevedore_core::TaskConfig;

use crate::client::{EcsClient, EcsError};
use crate::executor::AwsExecutor;

/// Triggers a one-off ECS task run from a fixed parameter blob.
pub struct TaskRunner {
    config: TaskConfig,
}

impl TaskRunner {
    pub fn new(config: TaskConfig) -> Self {
        Self { config }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub async fn handle<E: AwsExecutor>(&self, client: &EcsClient<E>) -> Result<(), EcsError> {
        client.run_task(&self.config.config).await
    }
}
