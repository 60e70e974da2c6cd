use serde::Deserialize;

/// Connection settings for the transactional-email provider.
///
/// Deserialized as the `[email]` section of the application config. The
/// defaults match the addresses the provider hands out before a sending
/// domain is verified.
#[derive(Debug, Deserialize, Clone)]
pub struct MailerConfig {
    /// Provider API key. Requests are sent unauthenticated when empty and
    /// rejected by the provider.
    pub api_key: String,
    /// Base URL of the provider's REST API.
    pub base_url: String,
    /// Address outbound mail is sent from.
    pub from_address: String,
    /// Operator address that receives contact-form notifications.
    pub admin_address: String,
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.resend.com".to_string(),
            from_address: "onboarding@resend.dev".to_string(),
            admin_address: "admin@trendbase.com".to_string(),
        }
    }
}
