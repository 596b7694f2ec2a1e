use std::sync::Arc;

use async_trait::async_trait;

use crate::settings::AppConfig;

pub mod http;

pub use http::HttpMailer;

#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> anyhow::Result<()>;
}

/// Writes outgoing mail to the log. Used when no mail API is configured.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &EmailMessage) -> anyhow::Result<()> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            "Mail delivery not configured; message body follows:\n{}",
            message.html
        );
        Ok(())
    }
}

pub fn build_mailer(config: &AppConfig) -> Arc<dyn Mailer> {
    match (&config.mail_api_url, &config.mail_api_key) {
        (Some(url), Some(key)) if !url.trim().is_empty() => Arc::new(HttpMailer::new(
            url.clone(),
            key.clone(),
            config.mail_from.clone(),
        )),
        _ => {
            if config.is_production() {
                tracing::warn!("No mail API configured; password reset emails will only be logged");
            }
            Arc::new(LogMailer)
        }
    }
}

pub fn password_reset_email(to: &str, reset_link: &str) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: "Password Reset Request".to_string(),
        html: format!(
            "<h2>Password Reset Request</h2>\
             <p>You requested a password reset for your portfolio admin account.</p>\
             <p><a href=\"{reset_link}\">Reset your password</a></p>\
             <p>This link expires in 1 hour. If you did not request this, you can ignore this email.</p>"
        ),
    }
}
