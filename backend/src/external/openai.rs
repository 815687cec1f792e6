//! OpenAI chat-completions client used for free-text crop advice

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::{FarmlandClimate, FarmlandSnapshot};
use std::time::Duration;

use crate::config::OpenAiConfig;
use crate::error::{AppError, AppResult};

const SERVICE: &str = "crop recommendation";
const SYSTEM_PROMPT: &str = "You are an expert in agriculture and crop recommendations.";
pub const NO_RECOMMENDATION: &str = "No recommendation available.";

/// Produces a free-text crop recommendation for a soil and climate snapshot
#[async_trait]
pub trait CropAdvisor: Send + Sync {
    async fn recommend(&self, snapshot: &FarmlandSnapshot) -> AppResult<String>;
}

#[derive(Clone)]
pub struct OpenAiClient {
    http_client: Client,
    api_endpoint: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatReply>,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl ChatResponse {
    fn into_text(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty())
            .unwrap_or_else(|| NO_RECOMMENDATION.to_string())
    }
}

impl OpenAiClient {
    pub fn new(config: &OpenAiConfig) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_endpoint: config.api_endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl CropAdvisor for OpenAiClient {
    async fn recommend(&self, snapshot: &FarmlandSnapshot) -> AppResult<String> {
        let prompt = build_prompt(snapshot);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
        };

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.api_endpoint))
            .bearer_auth(&self.api_key)
            .json(&request)
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

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::upstream(SERVICE, format!("Failed to parse response: {}", e)))?;

        Ok(completion.into_text())
    }
}

/// Canned advisor for local development without an API key
#[derive(Debug, Clone, Default)]
pub struct MockCropAdvisor;

#[async_trait]
impl CropAdvisor for MockCropAdvisor {
    async fn recommend(&self, _snapshot: &FarmlandSnapshot) -> AppResult<String> {
        tracing::info!("mock advisor: returning canned recommendation");
        Ok("Wheat, Rice, Maize".to_string())
    }
}

/// User prompt describing the farmland conditions
pub fn build_prompt(snapshot: &FarmlandSnapshot) -> String {
    let soil = &snapshot.soil_properties;
    let FarmlandClimate {
        avg_temperature,
        rainfall,
        humidity,
    } = &snapshot.climate;

    let or_unknown = |value: &Option<rust_decimal::Decimal>| {
        value.map_or_else(|| "Unknown".to_string(), |v| v.to_string())
    };

    format!(
        "**Farmland Conditions:**\n\
         - Soil Type: {}\n\
         - pH Level: {}\n\
         - Organic Matter: {}\n\
         - NPK: N={}, P={}, K={}\n\
         - Climate: Temp={}, Rainfall={}, Humidity={}\n\
         \n\
         Recommend the 3 best crops for these conditions with reasoning.",
        soil.soil_type,
        soil.ph,
        soil.organic_matter,
        soil.nutrients.nitrogen,
        soil.nutrients.phosphorus,
        soil.nutrients.potassium,
        or_unknown(avg_temperature),
        or_unknown(rainfall),
        or_unknown(humidity),
    )
}
