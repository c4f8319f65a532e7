use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use shared::protocol::{
    OnboardRequest, OnboardResponse, ProfileResponse, RegisterRequest, RegisterResponse,
    UserSummary,
};

use crate::errors::AppError;
use crate::llm::fallback::fallback_analysis;
use crate::models::profile::StudentProfileRow;
use crate::models::user::UserRow;
use crate::state::AppState;

/// POST /api/v1/users/register
///
/// Creates a user account. A duplicate email yields 409 so clients can fall
/// back to the lookup endpoint.
pub async fn handle_register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    let email = request.email.trim().to_lowercase();
    let name = request.name.trim().to_string();

    if email.is_empty() || name.is_empty() {
        return Err(AppError::Validation(
            "Email and name are required".to_string(),
        ));
    }
    if !email.contains('@') {
        return Err(AppError::Validation("Email is not valid".to_string()));
    }

    let existing: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    let user: UserRow =
        sqlx::query_as("INSERT INTO users (email, name) VALUES ($1, $2) RETURNING *")
            .bind(&email)
            .bind(&name)
            .fetch_one(&state.db)
            .await?;

    info!("Registered user {} ({email})", user.id);

    Ok(Json(RegisterResponse {
        message: "User registered successfully".to_string(),
        user: user.into(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub email: String,
}

/// GET /api/v1/users/lookup?email=
///
/// Resolves an email to its user record. Serves the client's 409 fallback
/// during onboarding re-submission.
pub async fn handle_lookup(
    State(state): State<AppState>,
    Query(params): Query<LookupQuery>,
) -> Result<Json<UserSummary>, AppError> {
    let email = params.email.trim().to_lowercase();
    let user: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(&state.db)
        .await?;

    let user = user.ok_or_else(|| AppError::NotFound(format!("No user with email {email}")))?;
    Ok(Json(user.into()))
}

/// POST /api/v1/users/onboard
///
/// Stores the full profile draft, runs the AI profile analysis (degrading to
/// canned content on failure), and marks onboarding complete.
pub async fn handle_onboard(
    State(state): State<AppState>,
    Json(request): Json<OnboardRequest>,
) -> Result<Json<OnboardResponse>, AppError> {
    let user: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(request.user_id)
        .fetch_optional(&state.db)
        .await?;
    let user = user.ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let analysis = match state.advisor.analyze_profile(&request).await {
        Ok(analysis) => analysis,
        Err(e) => {
            warn!("Profile analysis failed for user {}: {e}", user.id);
            fallback_analysis()
        }
    };

    let analysis_value = serde_json::to_value(&analysis)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize analysis: {e}")))?;

    let row: StudentProfileRow = sqlx::query_as(
        r#"
        INSERT INTO student_profiles
            (user_id, major, university, gpa, experience_level, career_aspirations,
             target_industries, current_skills, preferred_learning, preferred_content_types,
             time_commitment, open_to_relocation, relocation_goal, extracurricular_interests,
             planning_horizon_years, photo_data_url, analysis, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, NOW())
        ON CONFLICT (user_id) DO UPDATE SET
            major = EXCLUDED.major,
            university = EXCLUDED.university,
            gpa = EXCLUDED.gpa,
            experience_level = EXCLUDED.experience_level,
            career_aspirations = EXCLUDED.career_aspirations,
            target_industries = EXCLUDED.target_industries,
            current_skills = EXCLUDED.current_skills,
            preferred_learning = EXCLUDED.preferred_learning,
            preferred_content_types = EXCLUDED.preferred_content_types,
            time_commitment = EXCLUDED.time_commitment,
            open_to_relocation = EXCLUDED.open_to_relocation,
            relocation_goal = EXCLUDED.relocation_goal,
            extracurricular_interests = EXCLUDED.extracurricular_interests,
            planning_horizon_years = EXCLUDED.planning_horizon_years,
            photo_data_url = EXCLUDED.photo_data_url,
            analysis = EXCLUDED.analysis,
            updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(request.user_id)
    .bind(&request.major)
    .bind(&request.university)
    .bind(request.gpa)
    .bind(&request.experience_level)
    .bind(&request.career_aspirations)
    .bind(serde_json::json!(request.target_industries))
    .bind(serde_json::json!(request.current_skills))
    .bind(&request.preferred_learning)
    .bind(serde_json::json!(request.preferred_content_types))
    .bind(&request.time_commitment)
    .bind(request.open_to_relocation)
    .bind(&request.relocation_goal)
    .bind(serde_json::json!(request.extracurricular_interests))
    .bind(request.planning_horizon_years.max(1) as i32)
    .bind(&request.photo_data_url)
    .bind(&analysis_value)
    .fetch_one(&state.db)
    .await?;

    sqlx::query("UPDATE users SET onboarding_complete = TRUE WHERE id = $1")
        .bind(request.user_id)
        .execute(&state.db)
        .await?;

    info!("Onboarding completed for user {}", request.user_id);

    Ok(Json(OnboardResponse {
        message: "Onboarding completed successfully".to_string(),
        profile: row.into_payload(),
    }))
}

/// GET /api/v1/users/:user_id/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ProfileResponse>, AppError> {
    let user: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&state.db)
        .await?;
    let user = user.ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let profile: Option<StudentProfileRow> =
        sqlx::query_as("SELECT * FROM student_profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&state.db)
            .await?;

    Ok(Json(ProfileResponse {
        user: user.into(),
        profile: profile.map(StudentProfileRow::into_payload),
    }))
}
