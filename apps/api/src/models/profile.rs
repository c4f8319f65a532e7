use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use shared::domain::{LinkedinSuggestions, ProfileAnalysis, Resume};
use shared::protocol::StudentProfilePayload;

/// Student profile as stored. List-valued fields and the analysis live in
/// JSONB columns.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StudentProfileRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub major: String,
    pub university: String,
    pub gpa: Option<f64>,
    pub experience_level: String,
    pub career_aspirations: String,
    pub target_industries: Value,
    pub current_skills: Value,
    pub preferred_learning: String,
    pub preferred_content_types: Value,
    pub time_commitment: String,
    pub open_to_relocation: bool,
    pub relocation_goal: Option<String>,
    pub extracurricular_interests: Value,
    pub planning_horizon_years: i32,
    pub photo_data_url: Option<String>,
    pub analysis: Value,
    pub updated_at: DateTime<Utc>,
}

fn string_list(value: &Value) -> Vec<String> {
    serde_json::from_value(value.clone()).unwrap_or_default()
}

impl StudentProfileRow {
    pub fn analysis(&self) -> ProfileAnalysis {
        serde_json::from_value(self.analysis.clone()).unwrap_or_default()
    }

    pub fn current_skills(&self) -> Vec<String> {
        string_list(&self.current_skills)
    }

    pub fn target_industries(&self) -> Vec<String> {
        string_list(&self.target_industries)
    }

    pub fn into_payload(self) -> StudentProfilePayload {
        let analysis = self.analysis();
        StudentProfilePayload {
            user_id: self.user_id,
            major: self.major,
            university: self.university,
            gpa: self.gpa,
            experience_level: self.experience_level,
            career_aspirations: self.career_aspirations,
            target_industries: string_list(&self.target_industries),
            current_skills: string_list(&self.current_skills),
            preferred_learning: self.preferred_learning,
            preferred_content_types: string_list(&self.preferred_content_types),
            time_commitment: self.time_commitment,
            open_to_relocation: self.open_to_relocation,
            relocation_goal: self.relocation_goal,
            extracurricular_interests: string_list(&self.extracurricular_interests),
            planning_horizon_years: self.planning_horizon_years.max(1) as u32,
            analysis,
            updated_at: self.updated_at,
        }
    }
}

/// Auto-generated professional profile: resume document plus LinkedIn
/// suggestion bundle, both JSONB.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfessionalProfileRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub resume: Value,
    pub linkedin: Value,
    pub last_generated: DateTime<Utc>,
}

impl ProfessionalProfileRow {
    pub fn resume(&self) -> Resume {
        serde_json::from_value(self.resume.clone()).unwrap_or_default()
    }

    pub fn linkedin(&self) -> LinkedinSuggestions {
        serde_json::from_value(self.linkedin.clone()).unwrap_or_default()
    }
}
