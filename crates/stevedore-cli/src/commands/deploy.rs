use std::path::Path;

use stevedore_cloud::EcsClient;
use stevedore_core::DeployConfig;
use stevedore_docker::DockerCli;

use crate::pipeline::{self, PipelineContext};

/// Execute the full deploy pipeline described by the config file.
pub async fn deploy(config_path: &Path, skip_login: bool) -> anyhow::Result<()> {
    let config = DeployConfig::load(config_path)?;
    if config.steps.is_empty() {
        anyhow::bail!("no steps defined in {}", config_path.display());
    }

    let ctx = PipelineContext {
        docker: DockerCli::new(),
        ecs: EcsClient::new(),
    };

    if !skip_login {
        println!("Authenticating Docker against ECR...");
        let login = ctx.ecs.login_command().await?;
        ctx.docker.login(&login).await?;
    }

    println!(
        "Running {} step(s) from {}...",
        config.steps.len(),
        config_path.display()
    );
    pipeline::run(config.steps, &ctx).await?;

    println!();
    println!("Deploy complete.");
    Ok(())
}
