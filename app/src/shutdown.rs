use crate::app::SharedState;

/// Tear down the toast queue and stop background loops.
pub async fn graceful_shutdown(state: &SharedState) {
    tracing::info!("Shutdown sequence started");

    let dropped = state.manager().clear();
    tracing::info!(dropped, "Shutdown: toast queue cleared");

    state.shutdown_token().cancel();
    tracing::info!("Shutdown: background loops cancelled");

    tracing::info!("Shutdown sequence completed");
}

/// Wait until every visible toast has been dismissed or has expired.
pub async fn wait_until_drained(state: &SharedState) {
    let mut rx = state.manager().subscribe();
    if rx.wait_for(Vec::is_empty).await.is_err() {
        tracing::warn!("Toast manager dropped while draining");
    }
}
