//! Simulated industry trends. A canned bundle stands in for a live market
//! feed and seasons the roadmap prompt.

use axum::{extract::State, Json};
use tracing::info;

use shared::protocol::{SimulateTrendsRequest, SimulateTrendsResponse, TrendBundle};

use crate::errors::AppError;
use crate::state::AppState;

pub fn canned_trend_bundle() -> TrendBundle {
    TrendBundle {
        hot_skills: vec![
            "AI/ML".to_string(),
            "Cloud Computing".to_string(),
            "Data Analysis".to_string(),
            "Cybersecurity".to_string(),
        ],
        emerging_roles: vec![
            "ML Engineer".to_string(),
            "Data Scientist".to_string(),
            "Cloud Architect".to_string(),
        ],
        certifications: vec![
            "AWS Certified".to_string(),
            "Google Cloud".to_string(),
            "Azure Fundamentals".to_string(),
        ],
        industry_growth: "15% YoY".to_string(),
    }
}

/// POST /api/v1/trends/simulate
pub async fn handle_simulate(
    State(state): State<AppState>,
    Json(request): Json<SimulateTrendsRequest>,
) -> Result<Json<SimulateTrendsResponse>, AppError> {
    let trends = canned_trend_bundle();
    let value = serde_json::to_value(&trends)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize trends: {e}")))?;

    sqlx::query("INSERT INTO simulated_trends (industry, trends) VALUES ($1, $2)")
        .bind(&request.industry)
        .bind(&value)
        .execute(&state.db)
        .await?;

    info!("Simulated trends recorded for industry {}", request.industry);

    Ok(Json(SimulateTrendsResponse {
        message: "Trends simulated".to_string(),
        industry: request.industry,
        trends,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canned_bundle_is_nonempty() {
        let bundle = canned_trend_bundle();
        assert!(!bundle.hot_skills.is_empty());
        assert!(!bundle.emerging_roles.is_empty());
        assert_eq!(bundle.industry_growth, "15% YoY");
    }
}
