use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Submission service unavailable: {0}")]
    Unavailable(String),

    #[error("Application rejected by recipient: {0}")]
    Rejected(String),

    #[error("Failed to encode application: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Maximum length for recipient messages kept in errors
const MAX_MESSAGE_LENGTH: usize = 500;

impl SubmitError {
    /// Truncate a recipient message to avoid logging excessive data
    fn truncate_message(message: &str) -> String {
        match message.char_indices().nth(MAX_MESSAGE_LENGTH) {
            None => message.to_string(),
            Some((cut, _)) => format!(
                "{}... (truncated, {} total bytes)",
                &message[..cut],
                message.len()
            ),
        }
    }

    pub fn rejected(message: &str) -> Self {
        SubmitError::Rejected(Self::truncate_message(message))
    }

    pub fn unavailable(message: &str) -> Self {
        SubmitError::Unavailable(Self::truncate_message(message))
    }
}
