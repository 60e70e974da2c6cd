pub mod client;
pub mod config;
pub mod error;
pub mod models;

pub use client::{HttpMailer, Mailer};
pub use config::MailerConfig;
pub use error::MailerError;
pub use models::{EmailMessage, SendReceipt};
