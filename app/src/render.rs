//! Console renderer: prints the visible toast stack as JSON lines.

use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::watch;

use toast_queue::Notification;

use crate::app::SharedState;

/// Distance from the top edge to the first toast.
const STACK_TOP_PX: u32 = 80;
/// Vertical spacing between stacked toasts.
const STACK_STEP_PX: u32 = 90;

#[derive(Debug, Serialize)]
struct RenderedToast<'a> {
    #[serde(flatten)]
    notification: &'a Notification,
    position: usize,
    offset_px: u32,
}

#[derive(Debug, Serialize)]
struct RenderFrame<'a> {
    #[serde(rename = "type")]
    frame_type: &'static str,
    items: Vec<RenderedToast<'a>>,
}

/// Vertical offset of the toast at `position` in the stack.
pub fn stack_offset(position: usize) -> u32 {
    let position = u32::try_from(position).unwrap_or(u32::MAX);
    STACK_TOP_PX.saturating_add(STACK_STEP_PX.saturating_mul(position))
}

/// Serialise one frame for the given visible list.
pub fn frame_json(items: &[Notification], pretty: bool) -> serde_json::Result<String> {
    let frame = RenderFrame {
        frame_type: "toasts",
        items: items
            .iter()
            .enumerate()
            .map(|(position, notification)| RenderedToast {
                notification,
                position,
                offset_px: stack_offset(position),
            })
            .collect(),
    };

    if pretty {
        serde_json::to_string_pretty(&frame)
    } else {
        serde_json::to_string(&frame)
    }
}

/// Write a frame for every change of the visible list until shutdown.
pub async fn render_loop<W>(state: SharedState, mut out: W)
where
    W: AsyncWrite + Unpin,
{
    let token = state.shutdown_token().clone();
    let pretty = state.config().render_pretty;
    let mut rx = state.manager().subscribe();

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                // Teardown may have published a final empty list
                if rx.has_changed().unwrap_or(false) {
                    if let Err(e) = write_frame(&mut rx, &mut out, pretty).await {
                        tracing::warn!("Final render frame failed: {e}");
                    }
                }
                tracing::info!("Render loop stopped (shutdown)");
                return;
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    tracing::info!("Render loop stopped (manager dropped)");
                    return;
                }
                if let Err(e) = write_frame(&mut rx, &mut out, pretty).await {
                    tracing::error!("Render output failed: {e}");
                    return;
                }
            }
        }
    }
}

async fn write_frame<W>(
    rx: &mut watch::Receiver<Vec<Notification>>,
    out: &mut W,
    pretty: bool,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let items = rx.borrow_and_update().clone();
    let mut line = frame_json(&items, pretty)?;
    line.push('\n');
    out.write_all(line.as_bytes()).await?;
    out.flush().await
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use serde_json::Value;
    use tokio::io::AsyncReadExt;
    use toast_queue::ToastInput;

    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn offsets_step_down_the_stack() {
        let cases = vec![(0, 80), (1, 170), (3, 350)];
        for (position, want) in cases {
            assert_eq!(stack_offset(position), want);
        }
    }

    #[tokio::test]
    async fn frame_lists_items_in_order_with_positions() {
        let state = SharedState::new(AppConfig::default()).unwrap();
        state.manager().add(ToastInput::channel("a", "1")).unwrap();
        state.manager().add(ToastInput::mention("b", "2")).unwrap();

        let json = frame_json(&state.manager().visible(), false).unwrap();
        let frame: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(frame["type"], "toasts");
        let items = frame["items"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["title"], "a");
        assert_eq!(items[0]["position"], 0);
        assert_eq!(items[1]["kind"], "mention");
        assert_eq!(items[1]["offset_px"], 170);
        assert_eq!(items[1]["duration_ms"], 5000);
    }

    #[tokio::test(start_paused = true)]
    async fn renders_each_change_then_stops() {
        let state = SharedState::new(AppConfig::default()).unwrap();
        let (writer, mut reader) = tokio::io::duplex(64 * 1024);
        let task = tokio::spawn(render_loop(state.clone(), writer));
        tokio::task::yield_now().await;

        state
            .manager()
            .add(ToastInput::channel("a", "1").with_duration_ms(100))
            .unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;

        state.shutdown_token().cancel();
        task.await.unwrap();

        let mut output = String::new();
        reader.read_to_string(&mut output).await.unwrap();
        let frames: Vec<usize> = output
            .lines()
            .map(|l| {
                let v: Value = serde_json::from_str(l).unwrap();
                v["items"].as_array().unwrap().len()
            })
            .collect();
        assert_eq!(frames, vec![1, 0]);
    }

    #[derive(Clone, Default)]
    struct LogBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for LogBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn failed_final_frame_is_logged() {
        let logs = LogBuf::default();
        let sink = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || sink.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let state = SharedState::new(AppConfig::default()).unwrap();
        let (writer, reader) = tokio::io::duplex(64);
        drop(reader);
        let task = tokio::spawn(render_loop(state.clone(), writer));
        tokio::task::yield_now().await;

        // Change and shutdown land together; the flush hits a closed pipe
        state.manager().add(ToastInput::channel("a", "1")).unwrap();
        state.shutdown_token().cancel();
        task.await.unwrap();

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Final render frame failed"), "logs: {output}");
        assert!(output.contains("Render loop stopped (shutdown)"));
    }
}
