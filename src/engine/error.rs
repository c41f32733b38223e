use thiserror::Error;

use crate::toppings::SourceError;

/// Errors surfaced by actions and by the engines that run them.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Unknown action '{name}'")]
    UnknownAction { name: String },

    #[error("Invalid argument {index} for '{action}': {reason}")]
    InvalidArgument {
        action: &'static str,
        index: usize,
        reason: String,
    },

    /// The action body gave up. The model may be partially mutated.
    #[error("Action '{action}' failed: {message}")]
    Failed {
        action: &'static str,
        message: String,
    },

    #[error("Data source error: {0}")]
    Source(#[from] SourceError),

    /// An asynchronous action was started with no tokio runtime to drive it.
    #[error("Action '{action}' returned a pending outcome outside a tokio runtime")]
    NoRuntime { action: String },

    /// The task driving a pending action ended without producing a result.
    #[error("Action '{action}' was aborted before it settled")]
    Aborted { action: String },
}

impl ActionError {
    pub fn failed(action: &'static str, message: impl Into<String>) -> Self {
        ActionError::Failed {
            action,
            message: message.into(),
        }
    }
}
