use stevedore_core::ImageConfig;

use crate::runner::{CommandError, CommandRunner};

/// A deployable image whose tag is resolved lazily, at most once.
#[derive(Debug)]
pub struct Image {
    config: ImageConfig,
    tag: Option<String>,
}

impl Image {
    pub fn new(config: ImageConfig) -> Self {
        Self { config, tag: None }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &ImageConfig {
        &self.config
    }

    /// Resolve the image tag by running `tag_command` through the shell.
    ///
    /// The first call executes the command and stores its trimmed stdout;
    /// every later call returns the stored value without re-running the
    /// command, even if its output would have changed in the meantime. One
    /// deploy therefore sees a single consistent tag.
    pub async fn tag<R: CommandRunner>(&mut self, runner: &R) -> Result<String, CommandError> {
        if let Some(tag) = &self.tag {
            return Ok(tag.clone());
        }
        let tag = runner
            .exec_shell(&self.config.tag_command)
            .await?
            .trim()
            .to_owned();
        self.tag = Some(tag.clone());
        Ok(tag)
    }

    /// `name:tag` — the local build tag.
    pub async fn tagged_name<R: CommandRunner>(
        &mut self,
        runner: &R,
    ) -> Result<String, CommandError> {
        let tag = self.tag(runner).await?;
        Ok(format!("{}:{}", self.config.name, tag))
    }

    /// `repository:tag` — the remote name the image is pushed under.
    pub async fn tagged_repo_name<R: CommandRunner>(
        &mut self,
        runner: &R,
    ) -> Result<String, CommandError> {
        let tag = self.tag(runner).await?;
        Ok(format!("{}:{}", self.config.repository, tag))
    }
}
