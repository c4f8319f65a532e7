//! Deterministic stand-in content used when an advisor call fails.
//!
//! The client never retries, so a failed generative call degrades to a
//! sensible default instead of surfacing a hard error for soft features.

use shared::domain::{CourseItem, Phase, ProfileAnalysis, ProjectItem, Roadmap};

pub fn fallback_analysis() -> ProfileAnalysis {
    ProfileAnalysis {
        strengths: vec![
            "Motivated to learn".to_string(),
            "Clear career direction".to_string(),
        ],
        gaps: vec!["Need more hands-on experience".to_string()],
        career_paths: vec![
            "Technology Professional".to_string(),
            "Industry Specialist".to_string(),
            "General Professional".to_string(),
        ],
        learning_tips: vec![
            "Start with foundational courses".to_string(),
            "Build portfolio projects".to_string(),
        ],
    }
}

/// Single-phase starter roadmap used when generation fails outright.
pub fn fallback_roadmap() -> Roadmap {
    Roadmap {
        phases: vec![Phase {
            phase: 1,
            title: "Foundation Building (Months 1-3)".to_string(),
            focus: "Build core fundamentals".to_string(),
            weekly_routine: None,
            courses: vec![CourseItem {
                id: "c1".to_string(),
                name: "Introduction to Programming".to_string(),
                platform: "Coursera".to_string(),
                duration: "4 weeks".to_string(),
                rationale: "Essential programming foundation".to_string(),
                progress: None,
            }],
            tests: Vec::new(),
            internships: Vec::new(),
            certificates: Vec::new(),
            projects: vec![ProjectItem {
                id: "p1".to_string(),
                name: "Personal Portfolio Website".to_string(),
                description: "Build a professional portfolio".to_string(),
                skills_demonstrated: vec![
                    "HTML".to_string(),
                    "CSS".to_string(),
                    "JavaScript".to_string(),
                ],
                rationale: "Demonstrate web development skills".to_string(),
                progress: None,
            }],
        }],
    }
}

pub fn fallback_encouragement(item_name: &str) -> String {
    format!(
        "Great work completing {item_name}! You're making excellent progress toward your goals. \
         Keep up the momentum!"
    )
}

pub fn fallback_resume_bullets(title: &str, item_type: &str, skills: &[String]) -> Vec<String> {
    let skills_text = if skills.is_empty() {
        "various skills".to_string()
    } else {
        skills.join(", ")
    };
    vec![
        format!("Completed {title} demonstrating proficiency in {skills_text}"),
        format!("Applied technical knowledge to solve real-world problems in {item_type} context"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_roadmap_has_trackable_items() {
        let roadmap = fallback_roadmap();
        assert_eq!(roadmap.phases.len(), 1);
        assert_eq!(roadmap.phases[0].item_count(), 2);
    }

    #[test]
    fn test_fallback_bullets_mention_title_and_skills() {
        let bullets =
            fallback_resume_bullets("Cloud Cert", "certificate", &["AWS".to_string()]);
        assert_eq!(bullets.len(), 2);
        assert!(bullets[0].contains("Cloud Cert"));
        assert!(bullets[0].contains("AWS"));
    }
}
