use thiserror::Error;

/// Errors that can occur when publishing or subscribing to table changes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotifyError {
    #[error("Publish failed: {0}")]
    PublishFailed(String),
    #[error("Subscribe failed: {0}")]
    SubscribeFailed(String),
}

/// Result type for notifier operations.
pub type Result<T> = std::result::Result<T, NotifyError>;
