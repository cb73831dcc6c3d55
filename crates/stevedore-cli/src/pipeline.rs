use std::collections::HashMap;

use anyhow::Context as _;
use stevedore_cloud::executor::AwsExecutor;
use stevedore_cloud::{EcsClient, ServiceUpdater, TaskDefinitionManager, TaskRunner};
use stevedore_core::StepConfig;
use stevedore_docker::runner::CommandRunner;
use stevedore_docker::{DockerCli, Image};

/// Clients shared by every pipeline step, built once at startup and passed
/// explicitly — no step reaches for a global.
pub struct PipelineContext<R: CommandRunner, E: AwsExecutor> {
    pub docker: DockerCli<R>,
    pub ecs: EcsClient<E>,
}

/// One pipeline step behind a uniform `handle` contract.
///
/// The set of step kinds is closed, so dispatch is a match rather than a
/// trait object.
pub enum Step {
    Image(Image),
    TaskDefinition(TaskDefinitionManager),
    Task(TaskRunner),
    Service(ServiceUpdater),
}

impl Step {
    pub fn from_config(config: StepConfig) -> Self {
        match config {
            StepConfig::Image(c) => Step::Image(Image::new(c)),
            StepConfig::TaskDefinition(c) => Step::TaskDefinition(TaskDefinitionManager::new(c)),
            StepConfig::Task(c) => Step::Task(TaskRunner::new(c)),
            StepConfig::Service(c) => Step::Service(ServiceUpdater::new(c)),
        }
    }

    /// Run the step to completion, recording any newly pushed image in
    /// `images` for later task-definition steps.
    pub async fn handle<R: CommandRunner, E: AwsExecutor>(
        &mut self,
        ctx: &PipelineContext<R, E>,
        images: &mut HashMap<String, String>,
    ) -> anyhow::Result<String> {
        match self {
            Step::Image(image) => {
                let pushed = ctx.docker.publish(image).await?;
                images.insert(image.name().to_owned(), pushed.clone());
                Ok(format!("pushed {pushed}"))
            }
            Step::TaskDefinition(manager) => {
                manager.set_images(images)?;
                let registered = manager.handle(&ctx.ecs).await?;
                Ok(format!("registered {registered}"))
            }
            Step::Task(task) => {
                task.handle(&ctx.ecs).await?;
                Ok(format!("started task {}", task.name()))
            }
            Step::Service(service) => {
                let updated = service.handle(&ctx.ecs).await?;
                Ok(format!("updated {updated} service(s)"))
            }
        }
    }
}

/// Run every step strictly in config order; each step completes all of its
/// side effects before the next begins, and the first failure aborts the
/// remainder. Returns one outcome line per completed step.
pub async fn run<R: CommandRunner, E: AwsExecutor>(
    steps: Vec<StepConfig>,
    ctx: &PipelineContext<R, E>,
) -> anyhow::Result<Vec<String>> {
    let mut images = HashMap::new();
    let mut outcomes = Vec::new();

    for config in steps {
        let label = format!("{} '{}'", config.kind(), config.name());
        tracing::debug!(step = %label, "starting step");

        let mut step = Step::from_config(config);
        let outcome = step
            .handle(ctx, &mut images)
            .await
            .with_context(|| format!("step {label} failed"))?;

        println!("{label}: {outcome}");
        outcomes.push(format!("{label}: {outcome}"));
    }

    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;

    use mockall::mock;
    use serde_json::json;
    use stevedore_cloud::AwsError;
    use stevedore_docker::CommandError;

    mock! {
        Runner {}

        impl CommandRunner for Runner {
            async fn exec(&self, argv: &[String]) -> Result<String, CommandError>;
            async fn exec_shell(&self, command: &str) -> Result<String, CommandError>;
        }
    }

    mock! {
        Executor {}

        impl AwsExecutor for Executor {
            async fn exec(&self, args: &[String]) -> Result<String, AwsError>;
        }
    }

    fn parse_steps(toml: &str) -> Vec<StepConfig> {
        let config: stevedore_core::DeployConfig = toml::from_str(toml).unwrap();
        config.steps
    }

    #[tokio::test]
    async fn failure_short_circuits_later_steps() {
        let steps = parse_steps(
            r#"
[[step]]
kind = "task"
name = "first"
[step.config]
cluster = "production"

[[step]]
kind = "task-definition"
name = "broken"
family = "broken"
[[step.container_definitions]]
name = "app"
image = "never-built"

[[step]]
kind = "task"
name = "third"
[step.config]
cluster = "production"
"#,
        );

        let mut aws = MockExecutor::new();
        // Only the first step's run-task may reach the executor; the second
        // step fails on image substitution, so the third is never invoked.
        aws.expect_exec()
            .withf(|args| args.contains(&"run-task".to_owned()))
            .times(1)
            .returning(|_| Ok("{}".to_owned()));

        let ctx = PipelineContext {
            docker: DockerCli::with_runner(MockRunner::new()),
            ecs: EcsClient::with_executor(aws),
        };

        let result = run(steps, &ctx).await;
        let err = result.unwrap_err();
        assert!(err.to_string().contains("task-definition 'broken'"));
    }

    #[tokio::test]
    async fn image_map_threads_into_task_definitions() {
        let steps = parse_steps(
            r#"
[[step]]
kind = "image"
name = "web"
dockerfile = "Dockerfile"
tag_command = "git rev-parse --short HEAD"
repository = "registry/web"

[[step]]
kind = "task-definition"
name = "web-task"
family = "web"
deregister_previous_definitions = false
[[step.container_definitions]]
name = "web"
image = "web"
"#,
        );

        let mut runner = MockRunner::new();
        runner
            .expect_exec_shell()
            .times(1)
            .returning(|_| Ok("abc123\n".to_owned()));
        runner.expect_exec().returning(|_| Ok(String::new()));

        let mut aws = MockExecutor::new();
        aws.expect_exec()
            .withf(|args| {
                let flag = args.iter().position(|a| a == "--cli-input-json");
                let body: serde_json::Value = match flag.and_then(|i| args.get(i + 1)) {
                    Some(payload) => serde_json::from_str(payload).unwrap_or(json!(null)),
                    None => return false,
                };
                args.contains(&"register-task-definition".to_owned())
                    && body["containerDefinitions"][0]["image"] == "registry/web:abc123"
            })
            .times(1)
            .returning(|_| Ok(r#"{"taskDefinition": {"revision": 9}}"#.to_owned()));

        let ctx = PipelineContext {
            docker: DockerCli::with_runner(runner),
            ecs: EcsClient::with_executor(aws),
        };

        let outcomes = run(steps, &ctx).await.unwrap();
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].contains("pushed registry/web:abc123"));
        assert!(outcomes[1].contains("registered web:9"));
    }
}
