use crate::image::Image;
use crate::runner::{CommandError, CommandRunner, ProcessRunner};

/// Docker CLI operations, parameterized over the runner for testability.
pub struct DockerCli<R: CommandRunner = ProcessRunner> {
    runner: R,
}

impl DockerCli<ProcessRunner> {
    pub fn new() -> Self {
        Self {
            runner: ProcessRunner,
        }
    }
}

impl Default for DockerCli<ProcessRunner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CommandRunner> DockerCli<R> {
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// `docker build` from the image's Dockerfile, then tag the result with
    /// its remote name.
    pub async fn build(&self, image: &mut Image) -> Result<(), CommandError> {
        let tagged_name = image.tagged_name(&self.runner).await?;
        let tagged_repo = image.tagged_repo_name(&self.runner).await?;
        let dockerfile = image.config().dockerfile.clone();

        self.runner
            .exec(&args([
                "docker",
                "build",
                "-t",
                &tagged_name,
                "-f",
                &dockerfile,
                ".",
            ]))
            .await?;
        self.runner
            .exec(&args(["docker", "tag", &tagged_name, &tagged_repo]))
            .await?;
        Ok(())
    }

    /// Re-tag an already-built local image with its remote name.
    pub async fn retag(&self, image: &mut Image) -> Result<(), CommandError> {
        let tagged_repo = image.tagged_repo_name(&self.runner).await?;
        let name = image.name().to_owned();
        self.runner
            .exec(&args(["docker", "tag", &name, &tagged_repo]))
            .await?;
        Ok(())
    }

    pub async fn push(&self, image: &mut Image) -> Result<(), CommandError> {
        let tagged_repo = image.tagged_repo_name(&self.runner).await?;
        self.runner
            .exec(&args(["docker", "push", &tagged_repo]))
            .await?;
        Ok(())
    }

    /// Build or re-tag per the image's config, push, and return the pushed
    /// `repository:tag` for downstream steps.
    ///
    /// Any command failure propagates and aborts the deploy; an image that
    /// was pushed before a later step failed stays pushed.
    pub async fn publish(&self, image: &mut Image) -> Result<String, CommandError> {
        if image.config().build {
            self.build(image).await?;
        } else {
            self.retag(image).await?;
        }
        self.push(image).await?;
        image.tagged_repo_name(&self.runner).await
    }

    /// Execute a registry login command line (as produced by
    /// `aws ecr get-login`).
    pub async fn login(&self, argv: &[String]) -> Result<(), CommandError> {
        self.runner.exec(argv).await?;
        Ok(())
    }
}

fn args<const N: usize>(a: [&str; N]) -> Vec<String> {
    a.iter().map(|s| (*s).to_owned()).collect()
}
