use crate::messages::{ControlEvent, SessionEvent};
use crate::state::CameraState;
use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

/// Parse one command line. `Ok(None)` for blank lines.
pub fn parse_command(line: &str) -> Result<Option<SessionEvent>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let mut words = line.split_whitespace();
    let command = words.next().unwrap_or_default().to_ascii_lowercase();
    let arg = words.next();

    if words.next().is_some() {
        return Err(anyhow::anyhow!("Too many arguments: {:?}", line));
    }

    let event: SessionEvent = match (command.as_str(), arg) {
        ("press", None) => ControlEvent::Press.into(),
        ("release", None) => ControlEvent::Release.into(),
        ("cancel", None) => ControlEvent::Cancel.into(),
        ("ok" | "confirm", None) => ControlEvent::Confirm.into(),
        ("back", None) => ControlEvent::Back.into(),
        ("switch", None) => ControlEvent::SwitchCamera.into(),
        ("quit", None) => SessionEvent::Shutdown,
        ("state", Some(arg)) => SessionEvent::SetState(parse_state(arg)?),
        ("state", None) => return Err(anyhow::anyhow!("state needs a value or name")),
        _ => return Err(anyhow::anyhow!("Unknown command: {:?}", line)),
    };

    Ok(Some(event))
}

/// Accepts a raw value (`3`) or a name in any case (`record_process`)
fn parse_state(arg: &str) -> Result<CameraState> {
    if let Ok(value) = arg.parse::<i32>() {
        return Ok(CameraState::try_from(value)?);
    }

    CameraState::from_name(&arg.to_ascii_uppercase().replace('-', "_"))
        .with_context(|| format!("Invalid state argument {:?}", arg))
}

/// Read commands line by line until EOF, then ask the session to shut down
pub async fn read_commands<R>(reader: R, tx: mpsc::Sender<SessionEvent>) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        match parse_command(&line) {
            Ok(Some(event)) => {
                tracing::debug!("Input: {:?}", event);
                if tx.send(event).await.is_err() {
                    return Ok(());
                }
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("{:#}", e),
        }
    }

    tracing::debug!("Input closed");
    let _ = tx.send(SessionEvent::Shutdown).await;
    Ok(())
}
