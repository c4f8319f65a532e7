//! Roadmap generation — orchestrates the generation pipeline.
//!
//! Flow: load profile → build prompt from profile + analysis + trend context →
//! LLM generate (canned fallback on failure) → deactivate prior paths →
//! persist roadmap → seed one progress tracker per item.

use std::collections::HashMap;

use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use shared::domain::{ItemKind, ItemProgress, Roadmap};
use shared::protocol::StudentProfilePayload;

use crate::errors::AppError;
use crate::llm::fallback::fallback_roadmap;
use crate::llm::{prompts::SIMULATED_TRENDS, CareerAdvisor};

/// One progress tracker to create for a roadmap item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerSeed {
    pub item_id: String,
    pub item_kind: ItemKind,
    pub item_name: String,
}

/// Flattens a roadmap into tracker seeds across all five item collections,
/// in phase order. Internships are named by their role type.
pub fn collect_tracker_seeds(roadmap: &Roadmap) -> Vec<TrackerSeed> {
    let mut seeds = Vec::new();
    for phase in &roadmap.phases {
        for course in &phase.courses {
            seeds.push(TrackerSeed {
                item_id: course.id.clone(),
                item_kind: ItemKind::Course,
                item_name: course.name.clone(),
            });
        }
        for test in &phase.tests {
            seeds.push(TrackerSeed {
                item_id: test.id.clone(),
                item_kind: ItemKind::Test,
                item_name: test.name.clone(),
            });
        }
        for internship in &phase.internships {
            seeds.push(TrackerSeed {
                item_id: internship.id.clone(),
                item_kind: ItemKind::Internship,
                item_name: internship.role_type.clone(),
            });
        }
        for certificate in &phase.certificates {
            seeds.push(TrackerSeed {
                item_id: certificate.id.clone(),
                item_kind: ItemKind::Certificate,
                item_name: certificate.name.clone(),
            });
        }
        for project in &phase.projects {
            seeds.push(TrackerSeed {
                item_id: project.id.clone(),
                item_kind: ItemKind::Project,
                item_name: project.name.clone(),
            });
        }
    }
    seeds
}

/// Attaches each item's progress sub-object, defaulting to `not_started`
/// for items with no tracker yet.
pub fn enrich_roadmap(roadmap: &mut Roadmap, progress: &HashMap<String, ItemProgress>) {
    let lookup = |id: &str| progress.get(id).cloned().unwrap_or_default();
    for phase in &mut roadmap.phases {
        for item in &mut phase.courses {
            item.progress = Some(lookup(&item.id));
        }
        for item in &mut phase.tests {
            item.progress = Some(lookup(&item.id));
        }
        for item in &mut phase.internships {
            item.progress = Some(lookup(&item.id));
        }
        for item in &mut phase.certificates {
            item.progress = Some(lookup(&item.id));
        }
        for item in &mut phase.projects {
            item.progress = Some(lookup(&item.id));
        }
    }
}

pub struct GenerationOutcome {
    pub growth_path_id: Uuid,
    pub phase_count: u32,
    pub item_count: u32,
}

/// Runs the full roadmap generation pipeline and persists the results.
pub async fn generate_growth_path(
    pool: &PgPool,
    advisor: &dyn CareerAdvisor,
    profile: &StudentProfilePayload,
    timeline_months: u32,
) -> Result<GenerationOutcome, AppError> {
    let user_id = profile.user_id;
    info!("Generating roadmap for user {user_id} ({timeline_months} months)");

    let roadmap = match advisor
        .generate_roadmap(profile, timeline_months, SIMULATED_TRENDS)
        .await
    {
        Ok(roadmap) if !roadmap.phases.is_empty() => roadmap,
        Ok(_) => {
            warn!("Roadmap generation returned no phases for user {user_id}; using fallback");
            fallback_roadmap()
        }
        Err(e) => {
            warn!("Roadmap generation failed for user {user_id}: {e}; using fallback");
            fallback_roadmap()
        }
    };

    let roadmap_value = serde_json::to_value(&roadmap)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize roadmap: {e}")))?;

    // Only one path may be active per user.
    sqlx::query("UPDATE growth_paths SET is_active = FALSE WHERE user_id = $1 AND is_active")
        .bind(user_id)
        .execute(pool)
        .await?;

    let growth_path_id: Uuid = sqlx::query_scalar(
        "INSERT INTO growth_paths (user_id, phase, roadmap) VALUES ($1, 1, $2) RETURNING id",
    )
    .bind(user_id)
    .bind(&roadmap_value)
    .fetch_one(pool)
    .await?;

    let seeds = collect_tracker_seeds(&roadmap);
    for seed in &seeds {
        sqlx::query(
            r#"
            INSERT INTO progress_tracker (user_id, item_id, item_type, item_name, status)
            VALUES ($1, $2, $3, $4, 'not_started')
            ON CONFLICT (user_id, item_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(&seed.item_id)
        .bind(seed.item_kind.as_str())
        .bind(&seed.item_name)
        .execute(pool)
        .await?;
    }

    info!(
        "Persisted growth path {growth_path_id} with {} phases and {} items",
        roadmap.phases.len(),
        seeds.len()
    );

    Ok(GenerationOutcome {
        growth_path_id,
        phase_count: roadmap.phases.len() as u32,
        item_count: seeds.len() as u32,
    })
}
