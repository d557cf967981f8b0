use tokio::process::Command;
use tracing::{debug, warn};

pub mod merge;

/// Fixed invocation prefix for the external compose tool
pub const COMPOSE_COMMAND: &[&str] = &["docker", "compose"];

/// Invoke the compose tool with the given arguments and return its captured
/// stdout. Arguments are passed to the child verbatim, never through a
/// shell.
///
/// Best effort by contract: a non-zero exit code or a failed spawn does not
/// error, the caller gets whatever stdout was captured (possibly the empty
/// string). Route handlers rely on this to always render or redirect
/// instead of failing the page. stderr is only logged at debug level.
pub async fn run(args: &[&str]) -> String {
    let mut cmd = Command::new(COMPOSE_COMMAND[0]);
    cmd.args(&COMPOSE_COMMAND[1..]).args(args);
    debug!("exec command: {} {}", COMPOSE_COMMAND.join(" "), args.join(" "));

    match cmd.output().await {
        Ok(output) => {
            if !output.status.success() {
                debug!("command exited with {}", output.status);
            }
            if !output.stderr.is_empty() {
                debug!("stderr: {}", String::from_utf8_lossy(&output.stderr).trim_end());
            }
            String::from_utf8_lossy(&output.stdout).into_owned()
        }
        Err(e) => {
            warn!("could not run {}: {}", COMPOSE_COMMAND.join(" "), e);
            String::new()
        }
    }
}
