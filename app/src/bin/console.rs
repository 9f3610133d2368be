//! Headless toast console.
//!
//! Reads feed commands (JSON lines) from stdin, renders the visible toast
//! stack as JSON lines on stdout, and logs to stderr.

use tokio::io::BufReader;

use toast_console_lib::app::SharedState;
use toast_console_lib::{feed, render, shutdown};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    toast_console_lib::init_tracing();
    tracing::info!("Starting toast console");

    let config = toast_console_lib::init_foundation()?;
    let state = SharedState::new(config)?;

    let render_handle = tokio::spawn(render::render_loop(state.clone(), tokio::io::stdout()));

    let s = state.clone();
    let mut feed_handle =
        tokio::spawn(async move { feed::feed_loop(s, BufReader::new(tokio::io::stdin())).await });

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result?;
            tracing::info!("Interrupted, shutting down...");
            feed_handle.abort();
        }
        _ = &mut feed_handle => {
            tracing::info!("Input finished, waiting for toasts to expire");
            tokio::select! {
                _ = shutdown::wait_until_drained(&state) => {}
                result = tokio::signal::ctrl_c() => result?,
            }
        }
    }

    shutdown::graceful_shutdown(&state).await;
    if let Err(e) = render_handle.await {
        tracing::warn!("Render task ended abnormally: {e}");
    }
    Ok(())
}
