use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use super::{EmailMessage, Mailer};

/// Sends mail through a JSON HTTP API (`POST {from, to, subject, html}` with a bearer key).
#[derive(Clone)]
pub struct HttpMailer {
    client: Client,
    api_url: String,
    api_key: String,
    from: String,
}

#[derive(Serialize)]
struct OutgoingMail<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

impl HttpMailer {
    pub fn new(api_url: String, api_key: String, from: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        HttpMailer { client, api_url, api_key, from }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, message: &EmailMessage) -> anyhow::Result<()> {
        let body = OutgoingMail {
            from: &self.from,
            to: &message.to,
            subject: &message.subject,
            html: &message.html,
        };

        self.client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("mail api request")?
            .error_for_status()
            .context("mail api response")?;

        Ok(())
    }
}
