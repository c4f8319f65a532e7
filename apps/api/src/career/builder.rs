//! Folds completed roadmap items into the auto-generated resume.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use shared::domain::{
    ItemKind, Resume, ResumeCertification, ResumeExperience, ResumeProject,
};

use crate::errors::AppError;
use crate::llm::fallback::fallback_resume_bullets;
use crate::llm::{BulletContext, CareerAdvisor};
use crate::models::growth::ProgressRow;
use crate::models::profile::{ProfessionalProfileRow, StudentProfileRow};

fn resume_date(completion_date: Option<DateTime<Utc>>) -> String {
    completion_date
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_else(|| "Recent".to_string())
}

/// Appends one completed item to the right resume section. Courses and tests
/// strengthen the skills list instead of adding a dedicated section.
pub fn append_to_resume(
    resume: &mut Resume,
    kind: ItemKind,
    name: &str,
    bullets: Vec<String>,
    date: String,
    skills: &[String],
) {
    match kind {
        ItemKind::Project => resume.projects.push(ResumeProject {
            name: name.to_string(),
            bullets,
            date,
        }),
        ItemKind::Internship => resume.experience.push(ResumeExperience {
            title: name.to_string(),
            bullets,
            date,
        }),
        ItemKind::Certificate => resume.certifications.push(ResumeCertification {
            name: name.to_string(),
            date,
        }),
        ItemKind::Course | ItemKind::Test => {
            for skill in skills {
                if !resume.skills.iter().any(|s| s.eq_ignore_ascii_case(skill)) {
                    resume.skills.push(skill.clone());
                }
            }
        }
    }
}

/// Generates resume bullets for a freshly completed item and persists the
/// grown resume. Called from the progress-update path; errors propagate so
/// the caller can log without failing the update.
pub async fn apply_completed_item(
    pool: &PgPool,
    advisor: &dyn CareerAdvisor,
    user_id: Uuid,
    item: &ProgressRow,
) -> Result<(), AppError> {
    let profile: Option<StudentProfileRow> =
        sqlx::query_as("SELECT * FROM student_profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    let (skills, target_role) = profile
        .as_ref()
        .map(|p| {
            (
                p.current_skills(),
                p.analysis().primary_career_path().to_string(),
            )
        })
        .unwrap_or_else(|| (Vec::new(), "Professional".to_string()));

    let kind = item.item_kind();
    let bullets = if matches!(kind, ItemKind::Project | ItemKind::Internship) {
        let bullet_context = BulletContext {
            item_type: item.item_type.clone(),
            title: item.item_name.clone(),
            description: item.notes.clone().unwrap_or_default(),
            skills: skills.clone(),
            target_role,
        };
        match advisor.generate_resume_bullets(&bullet_context).await {
            Ok(bullets) if !bullets.is_empty() => bullets,
            Ok(_) | Err(_) => {
                warn!("Resume bullet generation degraded for item {}", item.item_id);
                fallback_resume_bullets(&item.item_name, &item.item_type, &skills)
            }
        }
    } else {
        Vec::new()
    };

    let existing: Option<ProfessionalProfileRow> =
        sqlx::query_as("SELECT * FROM professional_profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    let mut resume = existing
        .as_ref()
        .map(ProfessionalProfileRow::resume)
        .unwrap_or_default();

    append_to_resume(
        &mut resume,
        kind,
        &item.item_name,
        bullets,
        resume_date(item.completion_date),
        &skills,
    );

    let resume_value = serde_json::to_value(&resume)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize resume: {e}")))?;

    sqlx::query(
        r#"
        INSERT INTO professional_profiles (user_id, resume, last_generated)
        VALUES ($1, $2, NOW())
        ON CONFLICT (user_id) DO UPDATE
            SET resume = EXCLUDED.resume, last_generated = NOW()
        "#,
    )
    .bind(user_id)
    .bind(&resume_value)
    .execute(pool)
    .await?;

    info!(
        "Resume updated for user {user_id} after completing {} ({})",
        item.item_name, item.item_type
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_project_adds_project_section() {
        let mut resume = Resume::default();
        append_to_resume(
            &mut resume,
            ItemKind::Project,
            "CLI Tool",
            vec!["Built a CLI".to_string()],
            "June 2026".to_string(),
            &[],
        );
        assert_eq!(resume.projects.len(), 1);
        assert_eq!(resume.projects[0].name, "CLI Tool");
        assert!(resume.experience.is_empty());
    }

    #[test]
    fn test_append_internship_adds_experience() {
        let mut resume = Resume::default();
        append_to_resume(
            &mut resume,
            ItemKind::Internship,
            "Backend Intern",
            vec!["Shipped APIs".to_string()],
            "Recent".to_string(),
            &[],
        );
        assert_eq!(resume.experience.len(), 1);
        assert_eq!(resume.experience[0].title, "Backend Intern");
    }

    #[test]
    fn test_append_course_merges_skills_without_duplicates() {
        let mut resume = Resume {
            skills: vec!["Rust".to_string()],
            ..Resume::default()
        };
        append_to_resume(
            &mut resume,
            ItemKind::Course,
            "Intro to Rust",
            Vec::new(),
            "Recent".to_string(),
            &["rust".to_string(), "SQL".to_string()],
        );
        assert_eq!(resume.skills, vec!["Rust".to_string(), "SQL".to_string()]);
    }

    #[test]
    fn test_resume_date_formats_month_year() {
        let date = "2026-06-15T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(resume_date(Some(date)), "June 2026");
        assert_eq!(resume_date(None), "Recent");
    }
}
