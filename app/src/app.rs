use std::sync::Arc;

use chat_notify::{History, Notifier};
use toast_queue::{ToastError, ToastManager};
use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;

/// Process-wide state shared by the feed, render and shutdown tasks.
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<SharedStateInner>,
}

struct SharedStateInner {
    config: AppConfig,
    /// Producer front-end; also owns the single toast manager
    notifier: Notifier,
    shutdown_token: CancellationToken,
}

impl SharedState {
    /// Build the state and its toast manager. Must run inside a tokio runtime.
    pub fn new(config: AppConfig) -> Result<Self, ToastError> {
        let manager = ToastManager::new(config.toast.clone())?;
        let notifier = Notifier::new(manager);
        if let Some(name) = &config.self_name {
            notifier.set_self_name(name.clone());
        }

        Ok(Self {
            inner: Arc::new(SharedStateInner {
                config,
                notifier,
                shutdown_token: CancellationToken::new(),
            }),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }

    pub fn history(&self) -> &History {
        self.inner.notifier.history()
    }

    pub fn manager(&self) -> &ToastManager {
        self.inner.notifier.manager()
    }

    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.inner.shutdown_token
    }
}
