use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use shared::domain::{ProgressSummary, TaskRecord, TaskStatus};
use shared::protocol::{TaskListResponse, UpdateProgressRequest, UpdateProgressResponse};

use crate::career::builder::apply_completed_item;
use crate::career::context::load_user_context;
use crate::errors::AppError;
use crate::llm::fallback::fallback_encouragement;
use crate::models::growth::ProgressRow;
use crate::progress::summarize;
use crate::state::AppState;

/// POST /api/v1/progress/update
///
/// Sets a tracker's status. Completion additionally stamps the date, attaches
/// an encouragement message, and folds the item into the professional profile.
pub async fn handle_update(
    State(state): State<AppState>,
    Json(request): Json<UpdateProgressRequest>,
) -> Result<Json<UpdateProgressResponse>, AppError> {
    let tracker: Option<ProgressRow> =
        sqlx::query_as("SELECT * FROM progress_tracker WHERE user_id = $1 AND item_id = $2")
            .bind(request.user_id)
            .bind(&request.item_id)
            .fetch_optional(&state.db)
            .await?;
    let tracker =
        tracker.ok_or_else(|| AppError::NotFound("Progress tracker not found".to_string()))?;

    let completing = request.status == TaskStatus::Completed;
    let completion_date = completing.then(Utc::now).or(tracker.completion_date);

    let encouragement = if completing {
        let context = load_user_context(&state.db, request.user_id).await?;
        match state
            .advisor
            .generate_encouragement(&tracker.item_name, &tracker.item_type, &context)
            .await
        {
            Ok(message) => Some(message),
            Err(e) => {
                warn!("Encouragement generation failed for {}: {e}", tracker.item_id);
                Some(fallback_encouragement(&tracker.item_name))
            }
        }
    } else {
        tracker.encouragement_message.clone()
    };

    let updated: ProgressRow = sqlx::query_as(
        r#"
        UPDATE progress_tracker
        SET status = $1, notes = COALESCE($2, notes), completion_date = $3,
            encouragement_message = $4
        WHERE user_id = $5 AND item_id = $6
        RETURNING *
        "#,
    )
    .bind(request.status.as_str())
    .bind(&request.notes)
    .bind(completion_date)
    .bind(&encouragement)
    .bind(request.user_id)
    .bind(&request.item_id)
    .fetch_one(&state.db)
    .await?;

    info!(
        "Progress updated: user {} item {} -> {}",
        request.user_id,
        request.item_id,
        request.status.as_str()
    );

    // Completed items feed the resume; a failure here must not fail the update.
    if completing {
        if let Err(e) =
            apply_completed_item(&state.db, state.advisor.as_ref(), request.user_id, &updated).await
        {
            warn!(
                "Professional profile update failed for user {} item {}: {e}",
                request.user_id, request.item_id
            );
        }
    }

    Ok(Json(UpdateProgressResponse {
        message: "Progress updated successfully".to_string(),
        progress: updated.into_record(),
    }))
}

/// GET /api/v1/progress/:user_id/summary
pub async fn handle_summary(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ProgressSummary>, AppError> {
    let records = fetch_task_records(&state, user_id).await?;
    Ok(Json(summarize(&records)))
}

/// GET /api/v1/progress/:user_id/tasks
pub async fn handle_tasks(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<TaskListResponse>, AppError> {
    let tasks = fetch_task_records(&state, user_id).await?;
    Ok(Json(TaskListResponse { tasks }))
}

async fn fetch_task_records(state: &AppState, user_id: Uuid) -> Result<Vec<TaskRecord>, AppError> {
    let rows: Vec<ProgressRow> =
        sqlx::query_as("SELECT * FROM progress_tracker WHERE user_id = $1 ORDER BY created_at, id")
            .bind(user_id)
            .fetch_all(&state.db)
            .await?;
    Ok(rows.into_iter().map(ProgressRow::into_record).collect())
}
