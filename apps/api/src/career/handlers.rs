use axum::{
    extract::{Path, State},
    Json,
};
use tracing::warn;
use uuid::Uuid;

use shared::domain::{LinkedinSuggestions, Resume, ResumeHeader};
use shared::protocol::{
    AckResponse, ContactDetailsRequest, RefreshProfileRequest, ResumeResponse,
};

use crate::career::context::load_user_context;
use crate::errors::AppError;
use crate::models::profile::ProfessionalProfileRow;
use crate::state::AppState;

async fn fetch_professional_profile(
    state: &AppState,
    user_id: Uuid,
) -> Result<Option<ProfessionalProfileRow>, AppError> {
    let row = sqlx::query_as("SELECT * FROM professional_profiles WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(&state.db)
        .await?;
    Ok(row)
}

async fn store_linkedin(
    state: &AppState,
    user_id: Uuid,
    bundle: &LinkedinSuggestions,
) -> Result<(), AppError> {
    let value = serde_json::to_value(bundle).map_err(|e| {
        AppError::Internal(anyhow::anyhow!("Failed to serialize LinkedIn bundle: {e}"))
    })?;
    sqlx::query(
        r#"
        INSERT INTO professional_profiles (user_id, linkedin, last_generated)
        VALUES ($1, $2, NOW())
        ON CONFLICT (user_id) DO UPDATE
            SET linkedin = EXCLUDED.linkedin, last_generated = NOW()
        "#,
    )
    .bind(user_id)
    .bind(&value)
    .execute(&state.db)
    .await?;
    Ok(())
}

/// GET /api/v1/profile/:user_id/resume
///
/// Returns the stored resume; an empty document when nothing has been
/// generated yet (expected absence, not an error).
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ResumeResponse>, AppError> {
    let row = fetch_professional_profile(&state, user_id).await?;

    let response = match row {
        Some(row) => ResumeResponse {
            resume: row.resume(),
            last_generated: Some(row.last_generated),
        },
        None => ResumeResponse {
            resume: Resume::default(),
            last_generated: None,
        },
    };

    Ok(Json(response))
}

/// GET /api/v1/profile/:user_id/linkedin
///
/// Returns the stored suggestion bundle, generating one on first access.
/// A failed generation degrades to an empty bundle rather than an error.
pub async fn handle_get_linkedin(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<LinkedinSuggestions>, AppError> {
    if let Some(row) = fetch_professional_profile(&state, user_id).await? {
        let stored = row.linkedin();
        if !stored.post_ideas.is_empty() || !stored.profile_summary.is_empty() {
            return Ok(Json(stored));
        }
    }

    let context = load_user_context(&state.db, user_id).await?;
    let bundle = match state.advisor.generate_linkedin_content(&context).await {
        Ok(bundle) => bundle,
        Err(e) => {
            warn!("LinkedIn generation failed for user {user_id}: {e}");
            return Ok(Json(LinkedinSuggestions::default()));
        }
    };

    store_linkedin(&state, user_id, &bundle).await?;
    Ok(Json(bundle))
}

/// POST /api/v1/profile/refresh
///
/// Regenerates the LinkedIn suggestions from the user's current context.
/// Unlike first-access generation, an explicit refresh surfaces a failed
/// call as a hard error instead of storing substitute content.
pub async fn handle_refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshProfileRequest>,
) -> Result<Json<AckResponse>, AppError> {
    let context = load_user_context(&state.db, request.user_id).await?;
    let bundle = state
        .advisor
        .generate_linkedin_content(&context)
        .await
        .map_err(|e| AppError::Llm(format!("Profile refresh failed: {e}")))?;

    store_linkedin(&state, request.user_id, &bundle).await?;

    Ok(Json(AckResponse {
        message: "Profile refreshed successfully".to_string(),
    }))
}

/// POST /api/v1/profile/contact
///
/// Stores the resume header (contact block) supplied by the profile editor.
pub async fn handle_contact(
    State(state): State<AppState>,
    Json(request): Json<ContactDetailsRequest>,
) -> Result<Json<AckResponse>, AppError> {
    if request.full_name.trim().is_empty() || request.email.trim().is_empty() {
        return Err(AppError::Validation(
            "full_name and email are required".to_string(),
        ));
    }

    let row = fetch_professional_profile(&state, request.user_id).await?;
    let mut resume = row
        .as_ref()
        .map(ProfessionalProfileRow::resume)
        .unwrap_or_default();

    resume.header = Some(ResumeHeader {
        full_name: request.full_name.trim().to_string(),
        email: request.email.trim().to_string(),
        phone: request.phone.clone(),
        location: request.location.clone(),
        links: request.links.clone(),
    });

    let value = serde_json::to_value(&resume)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize resume: {e}")))?;

    sqlx::query(
        r#"
        INSERT INTO professional_profiles (user_id, resume, last_generated)
        VALUES ($1, $2, NOW())
        ON CONFLICT (user_id) DO UPDATE
            SET resume = EXCLUDED.resume, last_generated = NOW()
        "#,
    )
    .bind(request.user_id)
    .bind(&value)
    .execute(&state.db)
    .await?;

    Ok(Json(AckResponse {
        message: "Contact details saved".to_string(),
    }))
}
