//! Host configuration: queue settings plus console rendering options.

use toast_queue::ToastConfig;

const RENDER_PRETTY_KEY: &str = "TOAST_RENDER_PRETTY";
const SELF_NAME_KEY: &str = "TOAST_SELF_NAME";

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub toast: ToastConfig,
    /// Pretty-print render frames instead of one JSON object per line.
    pub render_pretty: bool,
    /// The local user's display name; their own messages never raise toasts.
    pub self_name: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, anyhow::Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let toast = ToastConfig::from_lookup(&lookup)?;
        let render_pretty = lookup(RENDER_PRETTY_KEY)
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        let self_name = lookup(SELF_NAME_KEY)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        Ok(Self {
            toast,
            render_pretty,
            self_name,
        })
    }
}
