use serde::{Deserialize, Serialize};

/// A single outbound email, in the shape the provider's `/emails` endpoint
/// accepts directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailMessage {
    /// Sender, either a bare address or `Display Name <address>`.
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

/// Acknowledgment returned when the provider accepts a message.
///
/// Acceptance is not delivery; the provider handles queueing and retries on
/// its side and this crate does not track them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendReceipt {
    /// Provider-assigned message identifier.
    pub id: String,
}
