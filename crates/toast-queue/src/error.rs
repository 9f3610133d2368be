use crate::record::NotificationId;

/// Errors surfaced by the notification queue.
#[derive(Debug, thiserror::Error)]
pub enum ToastError {
    /// An id was appended twice. Ids are manager-generated, so this is an
    /// id-generation bug rather than a user-facing condition.
    #[error("Duplicate notification id: {0}")]
    DuplicateId(NotificationId),

    #[error("Invalid setting {key}: {reason}")]
    InvalidSetting { key: String, reason: String },

    #[error("Dismissal timers need a tokio runtime, none is running")]
    NoRuntime,
}

pub type Result<T> = std::result::Result<T, ToastError>;
