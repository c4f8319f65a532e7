//! Assembles the user-journey context fed into encouragement and LinkedIn
//! generation.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm::UserContext;
use crate::models::growth::ProgressRow;
use crate::models::profile::StudentProfileRow;
use crate::models::user::UserRow;

/// Most recent completed items to surface as achievements.
const RECENT_ACHIEVEMENTS: usize = 5;

pub async fn load_user_context(pool: &PgPool, user_id: Uuid) -> Result<UserContext, AppError> {
    let user: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    let profile: Option<StudentProfileRow> =
        sqlx::query_as("SELECT * FROM student_profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    let completed: Vec<ProgressRow> = sqlx::query_as(
        "SELECT * FROM progress_tracker WHERE user_id = $1 AND status = 'completed' \
         ORDER BY completion_date DESC NULLS LAST",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let recent_achievements = completed
        .iter()
        .take(RECENT_ACHIEVEMENTS)
        .map(|row| row.item_name.clone())
        .collect();

    let mut context = UserContext {
        completed_count: completed.len(),
        current_phase: 1,
        career_goal: "Professional".to_string(),
        recent_achievements,
        ..UserContext::default()
    };

    if let Some(user) = user {
        context.name = user.name;
    }

    if let Some(profile) = profile {
        let analysis = profile.analysis();
        context.career_goal = analysis.primary_career_path().to_string();
        context.current_skills = profile.current_skills();
        context.target_industries = profile.target_industries();
        context.major = profile.major;
        context.university = profile.university;
        context.experience_level = profile.experience_level;
    }

    Ok(context)
}
