use std::collections::HashMap;

use serde_json::Value;
use stevedore_core::TaskDefinitionConfig;

use crate::client::{EcsClient, EcsError};
use crate::executor::AwsExecutor;

/// Registers a new task definition revision, optionally clearing out the
/// family's previous revisions first.
pub struct TaskDefinitionManager {
    config: TaskDefinitionConfig,
}

impl TaskDefinitionManager {
    pub fn new(config: TaskDefinitionConfig) -> Self {
        Self { config }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn family(&self) -> &str {
        &self.config.family
    }

    /// Substitute container `image` fields through the map produced by the
    /// pipeline's image steps. Must run before [`register`](Self::register).
    pub fn set_images(&mut self, images: &HashMap<String, String>) -> stevedore_core::Result<()> {
        self.config.set_images(images)
    }

    /// Deregister every revision currently listed under the family.
    ///
    /// This runs before the replacement is registered; if registration then
    /// fails, the family is left with no active revisions.
    pub async fn deregister_existing<E: AwsExecutor>(
        &self,
        client: &EcsClient<E>,
    ) -> Result<(), EcsError> {
        let arns = client.list_task_definitions(&self.config.family).await?;
        for arn in &arns {
            tracing::debug!(family = %self.config.family, arn = %arn, "deregistering task definition");
            client.deregister_task_definition(arn).await?;
        }
        Ok(())
    }

    /// Register a revision from the current attributes and return
    /// `family:revision`.
    pub async fn register<E: AwsExecutor>(
        &self,
        client: &EcsClient<E>,
    ) -> Result<String, EcsError> {
        let revision = client
            .register_task_definition(&self.registration_body())
            .await?;
        Ok(format!("{}:{}", self.config.family, revision))
    }

    pub async fn handle<E: AwsExecutor>(&self, client: &EcsClient<E>) -> Result<String, EcsError> {
        if self.config.deregister_previous_definitions {
            self.deregister_existing(client).await?;
        }
        self.register(client).await
    }

    fn registration_body(&self) -> Value {
        let mut body = serde_json::json!({
            "family": self.config.family,
            "networkMode": self.config.network_mode,
            "containerDefinitions": self.config.container_definitions,
            "volumes": self.config.volumes,
            "placementConstraints": self.config.placement_constraints,
        });
        if let Some(role) = &self.config.task_role_arn {
            body["taskRoleArn"] = Value::String(role.clone());
        }
        body
    }
}
