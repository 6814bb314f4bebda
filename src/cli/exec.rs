//! Run a child process that trusts the interception CA.

use std::ffi::OsString;
use std::process::ExitStatus;

use anyhow::Context;
use tracing::warn;

use crate::ca::CaRecord;

/// Variables pointing common TLS stacks at the CA certificate file.
pub const CA_ENV_VARS: [&str; 4] =
    ["INTERCEPT_CA_CERT", "SSL_CERT_FILE", "NODE_EXTRA_CA_CERTS", "REQUESTS_CA_BUNDLE"];

/// Exit code reported when the child is interrupted with Ctrl-C.
const INTERRUPTED: u8 = 130;

pub fn ca_environment(record: &CaRecord) -> Vec<(&'static str, OsString)> {
    CA_ENV_VARS
        .iter()
        .map(|name| (*name, record.cert_file_path().as_os_str().to_os_string()))
        .collect()
}

/// Spawn `command` with the CA environment and wait for it, or for Ctrl-C.
/// Returns the exit code to propagate.
pub async fn run_with_ca(command: &[String], record: &CaRecord) -> anyhow::Result<u8> {
    let (program, args) = command.split_first().context("No command given")?;

    let mut child = tokio::process::Command::new(program)
        .args(args)
        .envs(ca_environment(record))
        .spawn()
        .with_context(|| format!("Failed to start {}", program))?;

    let finished = tokio::select! {
        status = child.wait() => Some(status),
        _ = tokio::signal::ctrl_c() => None,
    };

    match finished {
        Some(status) => {
            let status = status.with_context(|| format!("Failed to wait for {}", program))?;
            Ok(exit_code(status))
        }
        None => {
            warn!(program = %program, "Interrupted, stopping child process");
            if let Err(e) = child.kill().await {
                warn!(error = %e, "Failed to stop child process");
            }
            Ok(INTERRUPTED)
        }
    }
}

// Killed by a signal or out of range: report a generic failure.
fn exit_code(status: ExitStatus) -> u8 {
    status.code().and_then(|code| u8::try_from(code).ok()).unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ca_environment_points_at_certificate() {
        let record = CaRecord::new("/tmp/intercept-ca-test.crt", b"pem".to_vec());
        let env = ca_environment(&record);

        assert_eq!(env.len(), CA_ENV_VARS.len());
        for (name, value) in env {
            assert!(CA_ENV_VARS.contains(&name));
            assert_eq!(value, OsString::from("/tmp/intercept-ca-test.crt"));
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_child_sees_certificate_and_exit_code() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let cert_path = temp_dir.path().join("ca.crt");
        std::fs::write(&cert_path, b"pem").unwrap();
        let record = CaRecord::new(&cert_path, b"pem".to_vec());

        let command = vec![
            "sh".to_string(),
            "-c".to_string(),
            "test -f \"$SSL_CERT_FILE\" && exit 7".to_string(),
        ];
        let code = run_with_ca(&command, &record).await.unwrap();
        assert_eq!(code, 7);
    }

    #[tokio::test]
    async fn test_empty_command_is_an_error() {
        let record = CaRecord::new("/tmp/ca.crt", b"pem".to_vec());
        assert!(run_with_ca(&[], &record).await.is_err());
    }
}
