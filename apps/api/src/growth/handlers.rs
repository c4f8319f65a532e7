use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use shared::domain::ItemProgress;
use shared::protocol::{GenerateRoadmapRequest, GenerateRoadmapResponse, RoadmapResponse};

use crate::errors::AppError;
use crate::growth::generator::{enrich_roadmap, generate_growth_path};
use crate::models::growth::{GrowthPathRow, ProgressRow};
use crate::models::profile::StudentProfileRow;
use crate::models::user::UserRow;
use crate::state::AppState;

/// POST /api/v1/growth-path/generate
///
/// Generates and persists a fresh roadmap for the user, seeding a progress
/// tracker for every item. The roadmap itself is fetched separately.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRoadmapRequest>,
) -> Result<Json<GenerateRoadmapResponse>, AppError> {
    let user: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(request.user_id)
        .fetch_optional(&state.db)
        .await?;
    if user.is_none() {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    let profile: Option<StudentProfileRow> =
        sqlx::query_as("SELECT * FROM student_profiles WHERE user_id = $1")
            .bind(request.user_id)
            .fetch_optional(&state.db)
            .await?;
    let profile = profile
        .ok_or_else(|| AppError::NotFound("Profile not found; complete onboarding first".to_string()))?
        .into_payload();

    let outcome = generate_growth_path(
        &state.db,
        state.advisor.as_ref(),
        &profile,
        request.timeline_months,
    )
    .await?;

    Ok(Json(GenerateRoadmapResponse {
        message: "Growth path generated successfully".to_string(),
        growth_path_id: outcome.growth_path_id,
        phase_count: outcome.phase_count,
        item_count: outcome.item_count,
    }))
}

/// GET /api/v1/growth-path/:user_id
///
/// Returns the active roadmap enriched with each item's progress sub-object.
pub async fn handle_get_roadmap(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<RoadmapResponse>, AppError> {
    let path: Option<GrowthPathRow> = sqlx::query_as(
        "SELECT * FROM growth_paths WHERE user_id = $1 AND is_active ORDER BY generated_at DESC LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(&state.db)
    .await?;

    let path =
        path.ok_or_else(|| AppError::NotFound("No active growth path found".to_string()))?;

    let trackers: Vec<ProgressRow> =
        sqlx::query_as("SELECT * FROM progress_tracker WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(&state.db)
            .await?;

    let progress: HashMap<String, ItemProgress> = trackers
        .into_iter()
        .map(|row| {
            let status = row.status();
            (
                row.item_id,
                ItemProgress {
                    status,
                    completion_date: row.completion_date,
                    encouragement_message: row.encouragement_message,
                },
            )
        })
        .collect();

    let mut roadmap = path.roadmap();
    enrich_roadmap(&mut roadmap, &progress);

    Ok(Json(RoadmapResponse {
        roadmap,
        generated_at: path.generated_at,
    }))
}
