/// Abstraction over external command execution for testability.
///
/// Production code uses [`ProcessRunner`], tests use mockall-generated mocks.
#[allow(async_fn_in_trait)]
pub trait CommandRunner: Send + Sync {
    /// Execute an argument vector directly (no shell) and capture stdout.
    async fn exec(&self, argv: &[String]) -> Result<String, CommandError>;

    /// Execute a command line through `sh -c` and capture stdout.
    async fn exec_shell(&self, command: &str) -> Result<String, CommandError>;
}

/// Real subprocess runner.
///
/// Every invocation is logged before it is spawned, runs once, and blocks
/// the pipeline until it completes. No retries, no timeout.
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    async fn exec(&self, argv: &[String]) -> Result<String, CommandError> {
        use std::process::Stdio;

        let Some((program, args)) = argv.split_first() else {
            return Err(CommandError::Empty);
        };
        let rendered = argv.join(" ");
        tracing::info!("running command: {rendered}");

        let output = tokio::process::Command::new(program)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| CommandError::Spawn {
                command: rendered.clone(),
                source: e,
            })?;

        capture(rendered, output)
    }

    async fn exec_shell(&self, command: &str) -> Result<String, CommandError> {
        use std::process::Stdio;

        tracing::info!("running command: {command}");

        let output = tokio::process::Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| CommandError::Spawn {
                command: command.to_owned(),
                source: e,
            })?;

        capture(command.to_owned(), output)
    }
}

fn capture(command: String, output: std::process::Output) -> Result<String, CommandError> {
    if output.status.success() {
        String::from_utf8(output.stdout).map_err(|e| CommandError::InvalidUtf8 { source: e })
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        tracing::error!("command failed: {command}");
        Err(CommandError::Failed {
            command,
            code: output.status.code(),
            stderr,
        })
    }
}

/// Run `argv`, swallowing any failure.
///
/// For non-critical commands whose failure must not abort a deploy; the
/// error is logged at warn level and `None` returned.
pub async fn exec_lenient<R: CommandRunner + ?Sized>(runner: &R, argv: &[String]) -> Option<String> {
    match runner.exec(argv).await {
        Ok(stdout) => Some(stdout),
        Err(err) => {
            tracing::warn!("ignoring command failure: {err}");
            None
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("cannot run an empty command")]
    Empty,

    #[error("failed to spawn command: {command}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("command exited with status {}: {command}\n{stderr}", format_status(code))]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("command output was not valid UTF-8")]
    InvalidUtf8 { source: std::string::FromUtf8Error },
}

fn format_status(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "signal".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_display_includes_command_and_status() {
        let err = CommandError::Failed {
            command: "docker push registry/web:abc".to_owned(),
            code: Some(1),
            stderr: "denied".to_owned(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("status 1"));
        assert!(rendered.contains("docker push registry/web:abc"));
        assert!(rendered.contains("denied"));
    }

    #[test]
    fn failed_display_without_exit_code() {
        let err = CommandError::Failed {
            command: "docker build .".to_owned(),
            code: None,
            stderr: String::new(),
        };
        assert!(err.to_string().contains("status signal"));
    }
}
