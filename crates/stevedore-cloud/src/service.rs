use regex::Regex;
use stevedore_core::{MatchMode, ServiceConfig};

use crate::client::{EcsClient, EcsError};
use crate::executor::AwsExecutor;

/// Applies an update to every live service in a cluster whose ARN matches
/// the entity's name.
pub struct ServiceUpdater {
    config: ServiceConfig,
}

impl ServiceUpdater {
    pub fn new(config: ServiceConfig) -> Self {
        Self { config }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// List the cluster's services, filter by the ARN pattern, and update
    /// each match in listed order. Returns the number of services updated.
    ///
    /// There is no rollback: services updated before a failing call stay
    /// updated, and later matches are never attempted.
    pub async fn update<E: AwsExecutor>(&self, client: &EcsClient<E>) -> Result<usize, EcsError> {
        let pattern = self.arn_pattern()?;
        let arns = client.list_services(&self.config.cluster).await?;

        let mut updated = 0;
        for arn in arns.iter().filter(|arn| pattern.is_match(arn)) {
            tracing::debug!(service = %arn, cluster = %self.config.cluster, "updating service");
            client
                .update_service(&self.config.cluster, arn, &self.config.config)
                .await?;
            updated += 1;
        }
        Ok(updated)
    }

    pub async fn handle<E: AwsExecutor>(&self, client: &EcsClient<E>) -> Result<usize, EcsError> {
        self.update(client).await
    }

    /// In prefix mode `name` is spliced into the pattern as written, so
    /// `billing` matches both `service/billing` and `service/billing-worker`.
    /// Exact mode escapes the name and anchors the match.
    fn arn_pattern(&self) -> Result<Regex, EcsError> {
        let pattern = match self.config.match_mode {
            MatchMode::Prefix => format!(
                "^arn:aws:ecs:[^:]+:[^:]+:service/{}",
                self.config.name
            ),
            MatchMode::Exact => format!(
                "^arn:aws:ecs:[^:]+:[^:]+:service/{}$",
                regex::escape(&self.config.name)
            ),
        };
        Regex::new(&pattern).map_err(|e| EcsError::InvalidServicePattern {
            name: self.config.name.clone(),
            source: e,
        })
    }
}
