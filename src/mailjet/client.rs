use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::config::MailjetConfig;

use super::payload::{build_request, SendResponse};

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("mailjet is not fully configured (need MJ_APIKEY_PUBLIC, MJ_APIKEY_PRIVATE, MJ_SENDER_EMAIL, MJ_RECEIVER_EMAIL)")]
    NotConfigured,
    #[error("mailjet request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("mailjet rejected the message (HTTP {status}): {detail}")]
    Rejected { status: StatusCode, detail: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub status: StatusCode,
}

/// Outbound alert channel. Delivery is attempted once; callers decide what a failure means.
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn send(&self, subject: &str, text: &str) -> Result<DeliveryReceipt, NotifyError>;
}

#[derive(Clone)]
pub struct MailjetClient {
    http: Client,
    config: MailjetConfig,
}

impl MailjetClient {
    pub fn new(http: Client, config: MailjetConfig) -> Self {
        Self { http, config }
    }
}

#[async_trait]
impl AlertSink for MailjetClient {
    async fn send(&self, subject: &str, text: &str) -> Result<DeliveryReceipt, NotifyError> {
        let (public, private, sender, receiver) =
            self.config.credentials().ok_or(NotifyError::NotConfigured)?;

        let request = build_request(sender, &self.config.sender_name, receiver, subject, text);
        let response = self
            .http
            .post(&self.config.api_url)
            .basic_auth(public, Some(private))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        tracing::info!(target: "mailjet", status = status.as_u16(), "mailjet send status");

        if !status.is_success() {
            return Err(NotifyError::Rejected {
                status,
                detail: body,
            });
        }

        let parsed: SendResponse = serde_json::from_str(&body).unwrap_or_default();
        if let Some(failure) = parsed.first_failure() {
            return Err(NotifyError::Rejected {
                status,
                detail: failure.to_string(),
            });
        }

        Ok(DeliveryReceipt { status })
    }
}
