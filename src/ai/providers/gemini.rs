use crate::ai::client::{
    RemoteCapability, RemoteError, RemoteReply, RemoteRequest, RemoteResult, RemoteRole,
};
use crate::config::AssistantConfig;
use async_trait::async_trait;
use serde::Serialize;

pub const TEMPERATURE: f64 = 0.7;
pub const MAX_OUTPUT_TOKENS: u32 = 1024;

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

// Gemini API request types
#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<RemoteRole>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    max_output_tokens: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    generation_config: GenerationConfig,
}

impl<'a> From<&'a RemoteRequest> for GenerateContentRequest<'a> {
    fn from(request: &'a RemoteRequest) -> Self {
        Self {
            contents: request
                .turns
                .iter()
                .map(|turn| Content {
                    role: Some(turn.role),
                    parts: vec![Part { text: &turn.text }],
                })
                .collect(),
            system_instruction: request.system_instruction.as_deref().map(|text| Content {
                role: None,
                parts: vec![Part { text }],
            }),
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        }
    }
}

impl GeminiProvider {
    pub fn new(config: &AssistantConfig) -> RemoteResult<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl RemoteCapability for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: &RemoteRequest) -> RemoteResult<RemoteReply> {
        let api_key = self.api_key.as_deref().ok_or(RemoteError::MissingCredential)?;

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&GenerateContentRequest::from(request))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(RemoteError::Status { status, body });
        }

        Ok(RemoteReply::new(serde_json::from_str(&body)?))
    }
}
