//! Request and response bodies for the record-keeping API, shared between
//! the axum handlers and the client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    LinkedinSuggestions, ProfileAnalysis, Resume, Roadmap, TaskRecord, TaskStatus,
};
pub use crate::domain::ProgressSummary;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub onboarding_complete: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserSummary,
}

/// Full onboarding draft as collected by the multi-step form. Lists arrive
/// already normalized to arrays; the photo is an optional data URL produced
/// client-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub major: String,
    #[serde(default)]
    pub university: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpa: Option<f64>,
    #[serde(default)]
    pub experience_level: String,
    #[serde(default)]
    pub career_aspirations: String,
    #[serde(default)]
    pub target_industries: Vec<String>,
    #[serde(default)]
    pub current_skills: Vec<String>,
    #[serde(default)]
    pub preferred_learning: String,
    #[serde(default)]
    pub preferred_content_types: Vec<String>,
    #[serde(default)]
    pub time_commitment: String,
    #[serde(default)]
    pub open_to_relocation: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relocation_goal: Option<String>,
    #[serde(default)]
    pub extracurricular_interests: Vec<String>,
    #[serde(default = "default_planning_horizon")]
    pub planning_horizon_years: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_data_url: Option<String>,
}

fn default_planning_horizon() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentProfilePayload {
    pub user_id: Uuid,
    pub major: String,
    pub university: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpa: Option<f64>,
    pub experience_level: String,
    pub career_aspirations: String,
    #[serde(default)]
    pub target_industries: Vec<String>,
    #[serde(default)]
    pub current_skills: Vec<String>,
    pub preferred_learning: String,
    #[serde(default)]
    pub preferred_content_types: Vec<String>,
    pub time_commitment: String,
    pub open_to_relocation: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relocation_goal: Option<String>,
    #[serde(default)]
    pub extracurricular_interests: Vec<String>,
    pub planning_horizon_years: u32,
    #[serde(default)]
    pub analysis: ProfileAnalysis,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardResponse {
    pub message: String,
    pub profile: StudentProfilePayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user: UserSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<StudentProfilePayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRoadmapRequest {
    pub user_id: Uuid,
    #[serde(default = "default_timeline_months")]
    pub timeline_months: u32,
}

fn default_timeline_months() -> u32 {
    12
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRoadmapResponse {
    pub message: String,
    pub growth_path_id: Uuid,
    pub phase_count: u32,
    pub item_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadmapResponse {
    pub roadmap: Roadmap,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProgressRequest {
    pub user_id: Uuid,
    pub item_id: String,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProgressResponse {
    pub message: String,
    pub progress: TaskRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskListResponse {
    pub tasks: Vec<TaskRecord>,
}

pub type SummaryResponse = ProgressSummary;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeResponse {
    pub resume: Resume,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_generated: Option<DateTime<Utc>>,
}

pub type LinkedinResponse = LinkedinSuggestions;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactDetailsRequest {
    pub user_id: Uuid,
    pub full_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub links: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshProfileRequest {
    pub user_id: Uuid,
}

/// Generic acknowledgment for write operations that return no payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulateTrendsRequest {
    #[serde(default = "default_industry")]
    pub industry: String,
}

fn default_industry() -> String {
    "Technology".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendBundle {
    #[serde(default)]
    pub hot_skills: Vec<String>,
    #[serde(default)]
    pub emerging_roles: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub industry_growth: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulateTrendsResponse {
    pub message: String,
    pub industry: String,
    pub trends: TrendBundle,
}

/// Error body shape produced by the API: `{"error":{"code","message"}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_onboard_request_defaults_optional_fields() {
        let json = serde_json::json!({
            "user_id": Uuid::new_v4(),
            "major": "Computer Science",
            "career_aspirations": "Backend engineer"
        });
        let req: OnboardRequest = serde_json::from_value(json).unwrap();
        assert!(req.current_skills.is_empty());
        assert_eq!(req.planning_horizon_years, 1);
        assert!(req.photo_data_url.is_none());
        assert!(!req.open_to_relocation);
    }

    #[test]
    fn test_generate_roadmap_request_defaults_timeline() {
        let json = serde_json::json!({ "user_id": Uuid::new_v4() });
        let req: GenerateRoadmapRequest = serde_json::from_value(json).unwrap();
        assert_eq!(req.timeline_months, 12);
    }

    #[test]
    fn test_error_body_matches_wire_shape() {
        let json = r#"{"error":{"code":"NOT_FOUND","message":"User missing"}}"#;
        let body: ErrorBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.error.code, "NOT_FOUND");
    }
}
