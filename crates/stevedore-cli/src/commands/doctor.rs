use stevedore_cloud::executor::{AwsExecutor, RealExecutor};
use stevedore_docker::runner::{ProcessRunner, exec_lenient};

/// Run all readiness checks without early return and report pass/fail for
/// each.
pub async fn doctor() -> anyhow::Result<()> {
    let aws = RealExecutor;
    let mut failed = false;

    // 1. aws CLI
    match aws.exec(&owned(["--version"])).await {
        Ok(version) => println!("OK aws CLI: {}", version.lines().next().unwrap_or("").trim()),
        Err(err) => {
            println!("NG aws CLI: {err}");
            failed = true;
        }
    }

    // 2. Credentials
    match aws
        .exec(&owned([
            "sts",
            "get-caller-identity",
            "--query",
            "Account",
            "--output",
            "text",
        ]))
        .await
    {
        Ok(account) => println!("OK credentials: account {}", account.trim()),
        Err(_) => {
            println!("NG credentials: run `aws configure`");
            failed = true;
        }
    }

    // 3. Docker daemon. A probe, not a hard dependency of doctor itself, so
    // its failure is swallowed rather than propagated.
    let runner = ProcessRunner;
    match exec_lenient(
        &runner,
        &owned(["docker", "info", "--format", "{{.ServerVersion}}"]),
    )
    .await
    {
        Some(version) => println!("OK docker daemon: {}", version.trim()),
        None => {
            println!("NG docker daemon: not reachable");
            failed = true;
        }
    }

    if failed {
        anyhow::bail!("some checks failed — see above for details");
    }
    Ok(())
}

fn owned<const N: usize>(a: [&str; N]) -> Vec<String> {
    a.iter().map(|s| (*s).to_owned()).collect()
}
