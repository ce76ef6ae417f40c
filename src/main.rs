use camera_session::app::{App, Outcome};
use camera_session::config::Config;
use camera_session::input;
use camera_session::services::PlaceholderBackend;

use anyhow::Result;
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries status lines, logs go to stderr
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    tracing::info!("Starting camera session");

    let config = Config::load()?;
    config.validate()?;

    let app = App::new(config, Box::new(PlaceholderBackend::new())).await?;

    let mut status_rx = app.subscribe();
    tokio::spawn(async move {
        loop {
            let status = status_rx.borrow_and_update().clone();
            match serde_json::to_string(&status) {
                Ok(line) => println!("{}", line),
                Err(e) => tracing::error!("Failed to serialize status: {}", e),
            }

            if status_rx.changed().await.is_err() {
                break;
            }
        }
    });

    let events = app.events();
    tokio::spawn(async move {
        let stdin = BufReader::new(tokio::io::stdin());
        if let Err(e) = input::read_commands(stdin, events).await {
            tracing::error!("Input error: {:#}", e);
        }
    });

    let outcome = tokio::select! {
        outcome = app.run() => outcome?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received Ctrl+C, shutting down");
            Outcome::Exited
        }
    };

    if let Outcome::Delivered(path) = &outcome {
        println!("{}", serde_json::json!({ "delivered": path }));
    }

    tracing::info!("Camera session shutdown complete");
    Ok(())
}
