/// LLM Client — the single point of entry for all Gemini API calls in SkillPath.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// All generative work MUST go through the `CareerAdvisor` trait, whose
/// production implementation lives here.
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use shared::domain::{LinkedinSuggestions, ProfileAnalysis, Roadmap};
use shared::protocol::{OnboardRequest, StudentProfilePayload};

pub mod fallback;
pub mod prompts;

const GEMINI_API_ROOT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// The model used for all LLM calls in SkillPath.
/// Intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "gemini-2.0-flash";
const MAX_OUTPUT_TOKENS: u32 = 8192;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Per-call generation knobs. JSON mode forces an `application/json`
/// response MIME type so the model emits parseable output.
#[derive(Debug, Clone, Copy)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub json: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.85,
            max_output_tokens: MAX_OUTPUT_TOKENS,
            json: true,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    system_instruction: ContentPayload<'a>,
    contents: Vec<ContentPayload<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct ContentPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<TextPart<'a>>,
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

/// Context snapshot of one user's journey, assembled from the database and
/// fed into encouragement and LinkedIn generation.
#[derive(Debug, Clone, Default)]
pub struct UserContext {
    pub name: String,
    pub completed_count: usize,
    pub current_phase: u32,
    pub career_goal: String,
    pub recent_achievements: Vec<String>,
    pub current_skills: Vec<String>,
    pub major: String,
    pub university: String,
    pub experience_level: String,
    pub target_industries: Vec<String>,
}

/// Facts about one completed item, used to write resume bullets for it.
#[derive(Debug, Clone)]
pub struct BulletContext {
    pub item_type: String,
    pub title: String,
    pub description: String,
    pub skills: Vec<String>,
    pub target_role: String,
}

/// The generative backend behind every AI-powered operation. Handlers depend
/// on this trait so tests can substitute a deterministic implementation.
#[async_trait]
pub trait CareerAdvisor: Send + Sync {
    async fn analyze_profile(&self, draft: &OnboardRequest) -> Result<ProfileAnalysis, LlmError>;

    async fn generate_roadmap(
        &self,
        profile: &StudentProfilePayload,
        timeline_months: u32,
        trends: &str,
    ) -> Result<Roadmap, LlmError>;

    async fn generate_encouragement(
        &self,
        item_name: &str,
        item_type: &str,
        context: &UserContext,
    ) -> Result<String, LlmError>;

    async fn generate_resume_bullets(&self, item: &BulletContext) -> Result<Vec<String>, LlmError>;

    async fn generate_linkedin_content(
        &self,
        context: &UserContext,
    ) -> Result<LinkedinSuggestions, LlmError>;
}

/// The production Gemini client. One attempt per call — callers fall back to
/// deterministic content on failure rather than retrying.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    /// Makes one call to the Gemini `generateContent` endpoint and returns
    /// the first candidate's text.
    pub async fn call(&self, prompt: &str, options: GenerationOptions) -> Result<String, LlmError> {
        let request_body = GeminiRequest {
            system_instruction: ContentPayload {
                role: None,
                parts: vec![TextPart {
                    text: prompts::SYSTEM_INSTRUCTION,
                }],
            },
            contents: vec![ContentPayload {
                role: Some("user"),
                parts: vec![TextPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: options.temperature,
                top_p: 0.95,
                max_output_tokens: options.max_output_tokens,
                response_mime_type: options.json.then_some("application/json"),
            },
        };

        let url = format!("{GEMINI_API_ROOT}/{MODEL}:generateContent");
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiErrorBody>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GeminiResponse = response.json().await?;
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().find_map(|p| p.text))
            .filter(|t| !t.trim().is_empty())
            .ok_or(LlmError::EmptyContent)?;

        debug!("LLM call succeeded ({} chars)", text.len());
        Ok(text)
    }

    /// Convenience method that calls the model and deserializes the text
    /// response as JSON. The prompt must instruct the model to return JSON.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        options: GenerationOptions,
    ) -> Result<T, LlmError> {
        let text = self.call(prompt, options).await?;

        // Strip markdown code fences if the model wraps JSON in them
        let text = strip_json_fences(&text);

        serde_json::from_str(text).map_err(LlmError::Parse)
    }
}

#[async_trait]
impl CareerAdvisor for GeminiClient {
    async fn analyze_profile(&self, draft: &OnboardRequest) -> Result<ProfileAnalysis, LlmError> {
        let prompt = prompts::build_analysis_prompt(draft);
        self.call_json(&prompt, GenerationOptions::default()).await
    }

    async fn generate_roadmap(
        &self,
        profile: &StudentProfilePayload,
        timeline_months: u32,
        trends: &str,
    ) -> Result<Roadmap, LlmError> {
        let prompt = prompts::build_roadmap_prompt(profile, timeline_months, trends);
        self.call_json(&prompt, GenerationOptions::default()).await
    }

    async fn generate_encouragement(
        &self,
        item_name: &str,
        item_type: &str,
        context: &UserContext,
    ) -> Result<String, LlmError> {
        let prompt = prompts::build_encouragement_prompt(item_name, item_type, context);
        let options = GenerationOptions {
            temperature: 0.8,
            max_output_tokens: 200,
            json: false,
        };
        let text = self.call(&prompt, options).await?;
        Ok(text.trim().to_string())
    }

    async fn generate_resume_bullets(&self, item: &BulletContext) -> Result<Vec<String>, LlmError> {
        #[derive(Deserialize)]
        struct BulletsPayload {
            #[serde(default)]
            bullets: Vec<String>,
        }

        let prompt = prompts::build_resume_bullets_prompt(item);
        let options = GenerationOptions {
            temperature: 0.7,
            max_output_tokens: 500,
            json: true,
        };
        let payload: BulletsPayload = self.call_json(&prompt, options).await?;
        Ok(payload.bullets)
    }

    async fn generate_linkedin_content(
        &self,
        context: &UserContext,
    ) -> Result<LinkedinSuggestions, LlmError> {
        let prompt = prompts::build_linkedin_prompt(context);
        let options = GenerationOptions {
            temperature: 0.8,
            max_output_tokens: 1200,
            json: true,
        };
        self.call_json(&prompt, options).await
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_gemini_request_serializes_camel_case_config() {
        let body = GeminiRequest {
            system_instruction: ContentPayload {
                role: None,
                parts: vec![TextPart { text: "system" }],
            },
            contents: vec![ContentPayload {
                role: Some("user"),
                parts: vec![TextPart { text: "hello" }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.85,
                top_p: 0.95,
                max_output_tokens: 8192,
                response_mime_type: Some("application/json"),
            },
        };
        let value = serde_json::to_value(&body).unwrap();
        assert!(value.get("systemInstruction").is_some());
        let config = value.get("generationConfig").unwrap();
        assert_eq!(config.get("maxOutputTokens").unwrap(), 8192);
        assert_eq!(config.get("responseMimeType").unwrap(), "application/json");
    }

    #[test]
    fn test_gemini_response_extracts_first_text_part() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "hello"}]}}
            ]
        }"#;
        let parsed: GeminiResponse = serde_json::from_str(json).unwrap();
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().find_map(|p| p.text));
        assert_eq!(text.as_deref(), Some("hello"));
    }
}
