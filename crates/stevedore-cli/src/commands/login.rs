use stevedore_cloud::EcsClient;
use stevedore_docker::DockerCli;

/// Authenticate the local Docker daemon against the account's ECR registry.
pub async fn login() -> anyhow::Result<()> {
    let ecs = EcsClient::new();
    let docker = DockerCli::new();

    let command = ecs.login_command().await?;
    tracing::debug!("login command: {}", command.join(" "));
    docker.login(&command).await?;

    println!("Docker authenticated against ECR.");
    Ok(())
}
