//! Interactive shell around an external cloud CLI.
//!
//! Each completed line becomes one invocation of the configured CLI binary:
//! the first word and the remaining words are passed through as arguments.
//! The editor puts the terminal back in cooked mode before the child runs,
//! so the CLI's own prompts and output behave normally.

use std::env;
use std::process::Command;
use std::time::Duration;

use reel_line::{run_session, DispatchError, DispatchResult, Dispatcher};
use wait_timeout::ChildExt;

const DEFAULT_CLI: &str = "cloud";
const DEFAULT_PROMPT: &str = "cloud> ";
const DEFAULT_TIMEOUT_SECS: u64 = 300;

struct CloudCli {
    program: String,
    timeout: Duration,
}

impl Dispatcher for CloudCli {
    fn dispatch(&mut self, name: &str, args: &[String]) -> DispatchResult {
        let mut child = Command::new(&self.program).arg(name).args(args).spawn()?;
        match child.wait_timeout(self.timeout)? {
            Some(status) if status.success() => Ok(String::new()),
            Some(status) => Err(DispatchError::Failed(format!(
                "{} {name}: {status}",
                self.program
            ))),
            None => {
                child.kill()?;
                child.wait()?;
                Err(DispatchError::Failed(format!(
                    "{} {name}: timed out after {}s",
                    self.program,
                    self.timeout.as_secs()
                )))
            }
        }
    }
}

fn main() -> std::io::Result<()> {
    let program = env::var("CLOUD_SHELL_CLI").unwrap_or_else(|_| DEFAULT_CLI.to_string());
    let prompt = env::var("CLOUD_SHELL_PROMPT").unwrap_or_else(|_| DEFAULT_PROMPT.to_string());
    let timeout = env::var("CLOUD_SHELL_TIMEOUT_SECS")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    let dispatcher = CloudCli {
        program,
        timeout: Duration::from_secs(timeout),
    };
    run_session(&prompt, dispatcher)
}

#[cfg(all(test, unix))]
mod tests {
    use super::CloudCli;
    use reel_line::{DispatchError, Dispatcher};
    use std::time::Duration;

    #[test]
    fn exit_status_maps_to_outcome() {
        let mut ok = CloudCli {
            program: "true".to_string(),
            timeout: Duration::from_secs(5),
        };
        assert!(ok.dispatch("instances", &["list".to_string()]).is_ok());

        let mut failing = CloudCli {
            program: "false".to_string(),
            timeout: Duration::from_secs(5),
        };
        match failing.dispatch("instances", &[]) {
            Err(DispatchError::Failed(message)) => {
                assert!(message.contains("instances"), "got: {message}");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn missing_binary_surfaces_as_io_error() {
        let mut missing = CloudCli {
            program: "definitely-not-a-cloud-cli".to_string(),
            timeout: Duration::from_secs(5),
        };
        assert!(matches!(
            missing.dispatch("login", &[]),
            Err(DispatchError::Io(_))
        ));
    }
}
