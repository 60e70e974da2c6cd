use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailerError {
    /// The provider answered but explicitly rejected the request.
    #[error("Provider rejected the request: {message}")]
    Provider { message: String },

    /// The request never produced a usable provider response.
    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for MailerError {
    fn from(e: reqwest::Error) -> Self {
        MailerError::Transport(e.to_string())
    }
}
