use crate::state::CameraState;
use std::path::Path;
use tokio::process::Command;

/// Run the hook configured for `state` through `sh -c`, in the background.
///
/// The command sees `CAMERA_STATE` (name), `CAMERA_STATE_VALUE` and, when a
/// picture or video is pending, `CAMERA_OUTPUT`. Failures are only logged.
pub fn run_state_hook(state: CameraState, command: &str, output: Option<&Path>) {
    let label = state.name();
    let command = command.to_owned();

    let mut env = vec![
        ("CAMERA_STATE", state.name().to_string()),
        ("CAMERA_STATE_VALUE", state.value().to_string()),
    ];
    if let Some(path) = output {
        env.push(("CAMERA_OUTPUT", path.display().to_string()));
    }

    tokio::task::spawn(async move {
        tracing::info!("[{}] Running hook: {}", label, command);

        match Command::new("sh")
            .arg("-c")
            .arg(&command)
            .envs(env)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::piped())
            .spawn()
        {
            Ok(child) => match child.wait_with_output().await {
                Ok(output) => {
                    if !output.status.success() {
                        let stderr = String::from_utf8_lossy(&output.stderr);
                        tracing::warn!(
                            "[{}] Hook exited with {}: {}",
                            label,
                            output.status,
                            stderr.trim()
                        );
                    }
                }
                Err(e) => tracing::warn!("[{}] Failed to wait on hook: {}", label, e),
            },
            Err(e) => tracing::warn!("[{}] Failed to spawn hook: {}", label, e),
        }
    });
}
