//! Gemini API連携（服のタグ付け）

use super::types::ImagePayload;
use super::VisionModel;
use crate::config::Config;
use crate::error::{StyleError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// タグ付けプロンプト
pub const TAGGING_PROMPT: &str = r#"Analyze this clothing item and provide a JSON response with the following structure:
{
  "type": "the garment type (e.g., shirt, blouse, dress, pants, jacket, sweater, skirt, etc.)",
  "color": "the primary color (use common color names like white, black, blue, red, etc.)",
  "styleTags": ["array", "of", "style", "descriptors"]
}

Style tags should describe the garment's characteristics like: casual, formal, elegant, sporty, vintage, modern, cotton, silk, denim, leather, button-down, sleeveless, long-sleeve, etc.

Return ONLY the JSON object, no additional text."#;

/// Gemini APIリクエスト
#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

/// Gemini APIレスポンス
#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

fn build_request(image: &ImagePayload) -> GeminiRequest {
    GeminiRequest {
        contents: vec![Content {
            parts: vec![
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: image.mime_type.clone(),
                        data: image.data.clone(),
                    },
                },
                Part::Text { text: TAGGING_PROMPT.to_string() },
            ],
        }],
        generation_config: GenerationConfig {
            temperature: 0.1,
            response_mime_type: "application/json".to_string(),
        },
    }
}

/// Gemini Visionクライアント
pub struct GeminiVision {
    api_key: Option<String>,
    model: String,
    client: reqwest::Client,
}

impl GeminiVision {
    pub fn new(api_key: Option<String>, model: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StyleError::Config(format!("HTTPクライアント生成エラー: {}", e)))?;

        Ok(Self {
            api_key,
            model: model.into(),
            client,
        })
    }

    /// 設定から作成（APIキー未設定でも作成でき、呼び出し時に失敗する）
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.get_api_key().ok(),
            config.model.clone(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().map(|k| !k.trim().is_empty()).unwrap_or(false)
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", GEMINI_API_BASE, self.model)
    }
}

#[async_trait]
impl VisionModel for GeminiVision {
    fn name(&self) -> &str {
        &self.model
    }

    async fn describe(&self, image: &ImagePayload) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(StyleError::MissingApiKey)?;

        tracing::debug!(model = %self.model, mime = %image.mime_type, "Gemini APIへ送信");

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&build_request(image))
            .send()
            .await
            .map_err(|e| StyleError::ApiCall(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StyleError::ApiCall(format!("API error {}: {}", status, body)));
        }

        let payload: GeminiResponse = response
            .json()
            .await
            .map_err(|e| StyleError::ApiParse(e.to_string()))?;

        payload
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| StyleError::ApiParse("Empty response".into()))
    }
}
