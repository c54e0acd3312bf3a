use std::time::Duration;

use async_trait::async_trait;
use business_card_sdk::EmailReceipt;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::config::EmailConfig;
use crate::domain::ports::{EmailError, EmailSender, OutgoingEmail};

/// Client of the Resend `POST /emails` API.
pub struct ResendEmailSender {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<SecretString>,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    html: &'a str,
}

#[derive(Deserialize)]
struct SendResponse {
    id: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl ResendEmailSender {
    /// Build the sender. Without `api_key` every send fails with
    /// `EmailError::NotConfigured`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &EmailConfig, api_key: Option<SecretString>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/emails", config.base_url.trim_end_matches('/')),
            api_key,
        })
    }
}

#[async_trait]
impl EmailSender for ResendEmailSender {
    async fn send(&self, email: &OutgoingEmail) -> Result<EmailReceipt, EmailError> {
        let api_key = self.api_key.as_ref().ok_or(EmailError::NotConfigured)?;

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key.expose_secret())
            .json(&SendRequest {
                from: &email.from,
                to: &email.to,
                subject: &email.subject,
                html: &email.html,
            })
            .send()
            .await
            .map_err(|e| EmailError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or(body);
            return Err(EmailError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let sent: SendResponse = response
            .json()
            .await
            .map_err(|e| EmailError::Transport(e.to_string()))?;
        Ok(EmailReceipt { id: sent.id })
    }
}
