use serde_json::{Map, Value};

use crate::aws::AwsError;
use crate::executor::{AwsExecutor, RealExecutor};

/// ECS operations client, parameterized over the executor for testability.
///
/// Every operation is a single `aws ecs <op>` invocation with `--output
/// json`; structured payloads travel via `--cli-input-json`.
pub struct EcsClient<E: AwsExecutor = RealExecutor> {
    executor: E,
}

impl EcsClient<RealExecutor> {
    pub fn new() -> Self {
        Self {
            executor: RealExecutor,
        }
    }
}

impl Default for EcsClient<RealExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: AwsExecutor> EcsClient<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    // ── Task definitions ──

    /// List every task definition ARN registered under `family_prefix`.
    pub async fn list_task_definitions(
        &self,
        family_prefix: &str,
    ) -> Result<Vec<String>, EcsError> {
        let output = self
            .executor
            .exec(&args([
                "ecs",
                "list-task-definitions",
                "--family-prefix",
                family_prefix,
                "--output",
                "json",
            ]))
            .await
            .map_err(|e| EcsError::Call { source: e })?;

        parse_arn_list(&output, "taskDefinitionArns", "list-task-definitions")
    }

    pub async fn deregister_task_definition(&self, arn: &str) -> Result<(), EcsError> {
        self.executor
            .exec(&args([
                "ecs",
                "deregister-task-definition",
                "--task-definition",
                arn,
                "--output",
                "json",
            ]))
            .await
            .map_err(|e| EcsError::Call { source: e })?;

        Ok(())
    }

    /// Register a task definition from `body` and return the revision number
    /// ECS assigned.
    pub async fn register_task_definition(&self, body: &Value) -> Result<u64, EcsError> {
        let payload = body.to_string();
        let output = self
            .executor
            .exec(&args([
                "ecs",
                "register-task-definition",
                "--cli-input-json",
                &payload,
                "--output",
                "json",
            ]))
            .await
            .map_err(|e| EcsError::Call { source: e })?;

        let response: Value =
            serde_json::from_str(&output).map_err(|e| EcsError::MalformedResponse {
                op: "register-task-definition",
                source: e,
            })?;
        response
            .pointer("/taskDefinition/revision")
            .and_then(Value::as_u64)
            .ok_or(EcsError::MissingField {
                op: "register-task-definition",
                field: "taskDefinition.revision",
            })
    }

    // ── Tasks ──

    /// Start a one-off task run; `params` is passed to ECS verbatim.
    pub async fn run_task(&self, params: &Map<String, Value>) -> Result<(), EcsError> {
        let payload = Value::Object(params.clone()).to_string();
        self.executor
            .exec(&args([
                "ecs",
                "run-task",
                "--cli-input-json",
                &payload,
                "--output",
                "json",
            ]))
            .await
            .map_err(|e| EcsError::Call { source: e })?;

        Ok(())
    }

    // ── Services ──

    /// List every service ARN in `cluster`.
    pub async fn list_services(&self, cluster: &str) -> Result<Vec<String>, EcsError> {
        let output = self
            .executor
            .exec(&args([
                "ecs",
                "list-services",
                "--cluster",
                cluster,
                "--output",
                "json",
            ]))
            .await
            .map_err(|e| EcsError::Call { source: e })?;

        parse_arn_list(&output, "serviceArns", "list-services")
    }

    /// Update one service; `params` is passed to ECS verbatim alongside the
    /// cluster and service identifiers.
    pub async fn update_service(
        &self,
        cluster: &str,
        service_arn: &str,
        params: &Map<String, Value>,
    ) -> Result<(), EcsError> {
        let mut body = params.clone();
        body.insert("cluster".to_owned(), Value::String(cluster.to_owned()));
        body.insert("service".to_owned(), Value::String(service_arn.to_owned()));
        let payload = Value::Object(body).to_string();

        self.executor
            .exec(&args([
                "ecs",
                "update-service",
                "--cli-input-json",
                &payload,
                "--output",
                "json",
            ]))
            .await
            .map_err(|e| EcsError::Call { source: e })?;

        Ok(())
    }

    // ── Registry authentication ──

    /// Obtain the docker login command line for the account's ECR registry.
    ///
    /// `aws ecr get-login` prints a single `docker login ...` line; it is
    /// split on spaces into argv tokens for direct execution.
    pub async fn login_command(&self) -> Result<Vec<String>, EcsError> {
        let output = self
            .executor
            .exec(&args(["ecr", "get-login", "--no-include-email"]))
            .await
            .map_err(|e| EcsError::Call { source: e })?;

        let argv: Vec<String> = output
            .trim_end_matches('\n')
            .split(' ')
            .map(str::to_owned)
            .collect();
        if argv.iter().all(|token| token.is_empty()) {
            return Err(EcsError::MissingField {
                op: "ecr get-login",
                field: "login command",
            });
        }
        Ok(argv)
    }
}

// ── Helpers ──

fn args<const N: usize>(a: [&str; N]) -> Vec<String> {
    a.iter().map(|s| (*s).to_owned()).collect()
}

fn parse_arn_list(output: &str, field: &'static str, op: &'static str) -> Result<Vec<String>, EcsError> {
    let response: Value =
        serde_json::from_str(output).map_err(|e| EcsError::MalformedResponse { op, source: e })?;
    let arns = response
        .get(field)
        .and_then(Value::as_array)
        .ok_or(EcsError::MissingField { op, field })?;
    Ok(arns
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_owned)
        .collect())
}

// ── Error types ──

#[derive(Debug, thiserror::Error)]
pub enum EcsError {
    #[error("ECS call failed")]
    Call { source: AwsError },

    #[error("malformed {op} response")]
    MalformedResponse {
        op: &'static str,
        source: serde_json::Error,
    },

    #[error("{op} response is missing {field}")]
    MissingField {
        op: &'static str,
        field: &'static str,
    },

    #[error("service name '{name}' is not a valid ARN pattern")]
    InvalidServicePattern {
        name: String,
        source: regex::Error,
    },
}
