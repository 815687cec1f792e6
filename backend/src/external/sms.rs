//! SMS delivery through the Twilio REST API

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::config::SmsConfig;
use crate::error::{AppError, AppResult};

const SERVICE: &str = "SMS delivery";

#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(&self, to: &str, body: &str) -> AppResult<()>;
}

/// Twilio Messages API client
#[derive(Clone)]
pub struct TwilioClient {
    http_client: Client,
    api_endpoint: String,
    account_sid: String,
    auth_token: String,
    from_number: String,
}

impl TwilioClient {
    pub fn new(config: &SmsConfig) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_endpoint: config.api_endpoint.trim_end_matches('/').to_string(),
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
            from_number: config.from_number.clone(),
        })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/Accounts/{}/Messages.json",
            self.api_endpoint, self.account_sid
        )
    }
}

#[async_trait]
impl SmsSender for TwilioClient {
    async fn send(&self, to: &str, body: &str) -> AppResult<()> {
        let params = [("To", to), ("From", self.from_number.as_str()), ("Body", body)];

        let response = self
            .http_client
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::upstream(SERVICE, format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::upstream(
                SERVICE,
                format!("API returned {}: {}", status, body),
            ));
        }

        tracing::info!(to, "SMS sent");
        Ok(())
    }
}

/// Stand-in used when SMS is disabled; messages only reach the log
#[derive(Debug, Clone, Default)]
pub struct LogSmsSender;

#[async_trait]
impl SmsSender for LogSmsSender {
    async fn send(&self, to: &str, body: &str) -> AppResult<()> {
        tracing::info!(to, body, "SMS disabled, message not sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_url_includes_account() {
        let config = SmsConfig {
            enabled: true,
            api_endpoint: "https://api.twilio.com/2010-04-01/".to_string(),
            account_sid: "AC123".to_string(),
            auth_token: "token".to_string(),
            from_number: "+15550000000".to_string(),
        };
        let client = TwilioClient::new(&config).unwrap();
        assert_eq!(
            client.messages_url(),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
        );
    }
}
