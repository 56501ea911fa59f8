// --- File: crates/atelier_gmail/src/service.rs ---
//! Gmail notification service implementation.

use atelier_common::credentials::TokenSource;
use atelier_common::http::client::HTTP_CLIENT;
use atelier_common::services::{BoxFuture, NotificationResult, NotificationService, ProviderError};
use atelier_config::GmailConfig;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

use crate::mime::{build_message, encode_raw, mailbox};

const SERVICE_NAME: &str = "gmail";

/// Gmail-specific error types.
#[derive(Error, Debug)]
pub enum GmailError {
    /// Error occurred during a Gmail API request
    #[error("Gmail API request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Error returned by the Gmail API
    #[error("Gmail API returned an error: {message} (Status: {status_code})")]
    ApiError { status_code: u16, message: String },

    /// The configured API base is not a usable URL
    #[error("Gmail URL error: {0}")]
    UrlError(String),
}

impl From<GmailError> for ProviderError {
    fn from(err: GmailError) -> Self {
        match err {
            GmailError::ApiError { status_code: 401, .. } => ProviderError::CredentialExpired {
                service: SERVICE_NAME.to_string(),
            },
            other => ProviderError::provider(SERVICE_NAME, other),
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct SentMessage {
    id: String,
    #[serde(default)]
    label_ids: Vec<String>,
}

/// Gmail notification service implementation
pub struct GmailNotificationService {
    tokens: Arc<TokenSource>,
    send_url: Url,
    from: String,
    client: Client,
}

impl GmailNotificationService {
    pub fn new(
        tokens: Arc<TokenSource>,
        api_base: &str,
        sender_name: &str,
        sender_address: &str,
    ) -> Result<Self, GmailError> {
        let mut send_url =
            Url::parse(api_base).map_err(|e| GmailError::UrlError(format!("{}: {}", api_base, e)))?;
        send_url
            .path_segments_mut()
            .map_err(|_| GmailError::UrlError(format!("{} cannot be a base", api_base)))?
            .pop_if_empty()
            .extend(["users", "me", "messages", "send"]);

        Ok(Self {
            tokens,
            send_url,
            from: mailbox(sender_name, sender_address),
            client: HTTP_CLIENT.clone(),
        })
    }

    pub fn from_config(config: &GmailConfig, tokens: Arc<TokenSource>) -> Result<Self, GmailError> {
        Self::new(
            tokens,
            &config.api_base,
            &config.sender_name,
            &config.sender_address,
        )
    }

    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<NotificationResult, ProviderError> {
        let raw = encode_raw(&build_message(&self.from, to, subject, body));
        let token = self.tokens.access_token().await?;

        let response = self
            .client
            .post(self.send_url.clone())
            .bearer_auth(token)
            .json(&serde_json::json!({ "raw": raw }))
            .send()
            .await
            .map_err(GmailError::from)?;

        let status = response.status();
        if !status.is_success() {
            if status == StatusCode::UNAUTHORIZED {
                self.tokens.invalidate().await;
                error!(
                    "Gmail rejected the {} access token: the operator must re-authorize (remove the token cache and restart)",
                    self.tokens.name()
                );
            }
            let message = response.text().await.unwrap_or_default();
            return Err(GmailError::ApiError {
                status_code: status.as_u16(),
                message,
            }
            .into());
        }

        let sent: SentMessage = response.json().await.map_err(GmailError::from)?;
        info!("Email '{}' sent to {} (message {})", subject, to, sent.id);

        let status = if sent.label_ids.iter().any(|l| l == "SENT") {
            "sent"
        } else {
            "accepted"
        };
        Ok(NotificationResult {
            id: sent.id,
            status: status.to_string(),
        })
    }
}

impl NotificationService for GmailNotificationService {
    fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> BoxFuture<'_, NotificationResult, ProviderError> {
        // Clone the values to avoid lifetime issues
        let to = to.to_string();
        let subject = subject.to_string();
        let body = body.to_string();

        Box::pin(async move { self.send(&to, &subject, &body).await })
    }
}
