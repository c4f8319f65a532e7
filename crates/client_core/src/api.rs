//! Typed client for the record-keeping API. Each method maps to exactly one
//! endpoint; nothing here retries or caches.

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use uuid::Uuid;

use shared::domain::{LinkedinSuggestions, ProgressSummary, TaskStatus};
use shared::protocol::{
    AckResponse, ContactDetailsRequest, ErrorBody, GenerateRoadmapRequest,
    GenerateRoadmapResponse, OnboardRequest, OnboardResponse, ProfileResponse,
    RefreshProfileRequest, RegisterRequest, RegisterResponse, ResumeResponse, RoadmapResponse,
    TaskListResponse, UpdateProgressRequest, UpdateProgressResponse, UserSummary,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },
}

impl ApiError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, ApiError::Api { status, .. } if *status == StatusCode::CONFLICT.as_u16())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Api { status, .. } if *status == StatusCode::NOT_FOUND.as_u16())
    }
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Converts a non-2xx response into a typed error, preserving the
    /// server's `{"error":{"code","message"}}` body when present.
    async fn check<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let (code, message) = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| (b.error.code, b.error.message))
            .unwrap_or_else(|_| {
                let fallback = if body.trim().is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                } else {
                    body
                };
                ("HTTP_ERROR".to_string(), fallback)
            });

        Err(ApiError::Api {
            status: status.as_u16(),
            code,
            message,
        })
    }

    pub async fn register(&self, email: &str, name: &str) -> Result<RegisterResponse, ApiError> {
        let response = self
            .http
            .post(self.url("/api/v1/users/register"))
            .json(&RegisterRequest {
                email: email.to_string(),
                name: name.to_string(),
            })
            .send()
            .await?;
        Self::check(response).await
    }

    pub async fn lookup_user(&self, email: &str) -> Result<UserSummary, ApiError> {
        let response = self
            .http
            .get(self.url("/api/v1/users/lookup"))
            .query(&[("email", email)])
            .send()
            .await?;
        Self::check(response).await
    }

    pub async fn complete_onboarding(
        &self,
        draft: &OnboardRequest,
    ) -> Result<OnboardResponse, ApiError> {
        let response = self
            .http
            .post(self.url("/api/v1/users/onboard"))
            .json(draft)
            .send()
            .await?;
        Self::check(response).await
    }

    pub async fn fetch_profile(&self, user_id: Uuid) -> Result<ProfileResponse, ApiError> {
        let response = self
            .http
            .get(self.url(&format!("/api/v1/users/{user_id}/profile")))
            .send()
            .await?;
        Self::check(response).await
    }

    pub async fn generate_roadmap(
        &self,
        user_id: Uuid,
        timeline_months: u32,
    ) -> Result<GenerateRoadmapResponse, ApiError> {
        let response = self
            .http
            .post(self.url("/api/v1/growth-path/generate"))
            .json(&GenerateRoadmapRequest {
                user_id,
                timeline_months,
            })
            .send()
            .await?;
        Self::check(response).await
    }

    pub async fn fetch_roadmap(&self, user_id: Uuid) -> Result<RoadmapResponse, ApiError> {
        let response = self
            .http
            .get(self.url(&format!("/api/v1/growth-path/{user_id}")))
            .send()
            .await?;
        Self::check(response).await
    }

    pub async fn update_task_status(
        &self,
        user_id: Uuid,
        item_id: &str,
        status: TaskStatus,
        notes: Option<String>,
    ) -> Result<UpdateProgressResponse, ApiError> {
        let response = self
            .http
            .post(self.url("/api/v1/progress/update"))
            .json(&UpdateProgressRequest {
                user_id,
                item_id: item_id.to_string(),
                status,
                notes,
            })
            .send()
            .await?;
        Self::check(response).await
    }

    pub async fn fetch_summary(&self, user_id: Uuid) -> Result<ProgressSummary, ApiError> {
        let response = self
            .http
            .get(self.url(&format!("/api/v1/progress/{user_id}/summary")))
            .send()
            .await?;
        Self::check(response).await
    }

    pub async fn fetch_tasks(&self, user_id: Uuid) -> Result<TaskListResponse, ApiError> {
        let response = self
            .http
            .get(self.url(&format!("/api/v1/progress/{user_id}/tasks")))
            .send()
            .await?;
        Self::check(response).await
    }

    pub async fn fetch_resume(&self, user_id: Uuid) -> Result<ResumeResponse, ApiError> {
        let response = self
            .http
            .get(self.url(&format!("/api/v1/profile/{user_id}/resume")))
            .send()
            .await?;
        Self::check(response).await
    }

    pub async fn fetch_linkedin(&self, user_id: Uuid) -> Result<LinkedinSuggestions, ApiError> {
        let response = self
            .http
            .get(self.url(&format!("/api/v1/profile/{user_id}/linkedin")))
            .send()
            .await?;
        Self::check(response).await
    }

    pub async fn refresh_profile(&self, user_id: Uuid) -> Result<AckResponse, ApiError> {
        let response = self
            .http
            .post(self.url("/api/v1/profile/refresh"))
            .json(&RefreshProfileRequest { user_id })
            .send()
            .await?;
        Self::check(response).await
    }

    pub async fn submit_contact(
        &self,
        details: &ContactDetailsRequest,
    ) -> Result<AckResponse, ApiError> {
        let response = self
            .http
            .post(self.url("/api/v1/profile/contact"))
            .json(details)
            .send()
            .await?;
        Self::check(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:5000/");
        assert_eq!(
            client.url("/api/v1/users/register"),
            "http://localhost:5000/api/v1/users/register"
        );
    }

    #[test]
    fn test_conflict_predicate() {
        let err = ApiError::Api {
            status: 409,
            code: "CONFLICT".to_string(),
            message: "User already exists".to_string(),
        };
        assert!(err.is_conflict());
        assert!(!err.is_not_found());
    }
}
