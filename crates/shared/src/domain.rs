use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Completion status of a roadmap item. The backend does not constrain
/// transitions: any status is reachable from any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "not_started",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_started" => Ok(TaskStatus::NotStarted),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(format!("unknown task status '{other}'")),
        }
    }
}

/// The five item collections a roadmap phase bundles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Course,
    Test,
    Internship,
    Certificate,
    Project,
}

impl ItemKind {
    pub const ALL: [ItemKind; 5] = [
        ItemKind::Course,
        ItemKind::Test,
        ItemKind::Internship,
        ItemKind::Certificate,
        ItemKind::Project,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Course => "course",
            ItemKind::Test => "test",
            ItemKind::Internship => "internship",
            ItemKind::Certificate => "certificate",
            ItemKind::Project => "project",
        }
    }
}

impl std::str::FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "course" => Ok(ItemKind::Course),
            "test" => Ok(ItemKind::Test),
            "internship" => Ok(ItemKind::Internship),
            "certificate" => Ok(ItemKind::Certificate),
            "project" => Ok(ItemKind::Project),
            other => Err(format!("unknown item kind '{other}'")),
        }
    }
}

/// Per-item progress sub-object attached to roadmap items when the roadmap
/// is fetched enriched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemProgress {
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encouragement_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub rationale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<ItemProgress>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub target_score: String,
    #[serde(default)]
    pub timing: String,
    #[serde(default)]
    pub rationale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<ItemProgress>,
}

/// Internship items carry a role type rather than a name on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InternshipItem {
    pub id: String,
    #[serde(rename = "type")]
    pub role_type: String,
    #[serde(default)]
    pub when: String,
    #[serde(default)]
    pub companies: Vec<String>,
    #[serde(default)]
    pub rationale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<ItemProgress>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub timing: String,
    #[serde(default)]
    pub rationale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<ItemProgress>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub skills_demonstrated: Vec<String>,
    #[serde(default)]
    pub rationale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<ItemProgress>,
}

/// One stage of the growth roadmap. The generating model may omit empty
/// collections, so every collection defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Phase {
    pub phase: u32,
    pub title: String,
    #[serde(default)]
    pub focus: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_routine: Option<String>,
    #[serde(default)]
    pub courses: Vec<CourseItem>,
    #[serde(default)]
    pub tests: Vec<TestItem>,
    #[serde(default)]
    pub internships: Vec<InternshipItem>,
    #[serde(default)]
    pub certificates: Vec<CertificateItem>,
    #[serde(default)]
    pub projects: Vec<ProjectItem>,
}

impl Phase {
    /// Total item count across all five collections.
    pub fn item_count(&self) -> usize {
        self.courses.len()
            + self.tests.len()
            + self.internships.len()
            + self.certificates.len()
            + self.projects.len()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roadmap {
    #[serde(default)]
    pub phases: Vec<Phase>,
}

/// Profile analysis produced during onboarding.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileAnalysis {
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub gaps: Vec<String>,
    #[serde(default)]
    pub career_paths: Vec<String>,
    #[serde(default)]
    pub learning_tips: Vec<String>,
}

impl ProfileAnalysis {
    /// Primary career goal: the first (most specific) recommended path.
    pub fn primary_career_path(&self) -> &str {
        self.career_paths
            .first()
            .map(String::as_str)
            .unwrap_or("Professional")
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Professional profile: resume + LinkedIn bundle
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResumeHeader {
    pub full_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub links: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeEducation {
    pub institution: String,
    pub degree: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeExperience {
    pub title: String,
    #[serde(default)]
    pub bullets: Vec<String>,
    #[serde(default)]
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeProject {
    pub name: String,
    #[serde(default)]
    pub bullets: Vec<String>,
    #[serde(default)]
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeCertification {
    pub name: String,
    #[serde(default)]
    pub date: String,
}

/// Auto-generated resume document. Grows as tasks complete.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Resume {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<ResumeHeader>,
    #[serde(default)]
    pub education: Vec<ResumeEducation>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Vec<ResumeExperience>,
    #[serde(default)]
    pub projects: Vec<ResumeProject>,
    #[serde(default)]
    pub certifications: Vec<ResumeCertification>,
}

impl Resume {
    pub fn is_empty(&self) -> bool {
        self.header.is_none()
            && self.education.is_empty()
            && self.skills.is_empty()
            && self.experience.is_empty()
            && self.projects.is_empty()
            && self.certifications.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostIdea {
    pub topic: String,
    pub draft: String,
    #[serde(default)]
    pub hashtags: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkedinSuggestions {
    #[serde(default)]
    pub post_ideas: Vec<PostIdea>,
    #[serde(default)]
    pub profile_summary: String,
    #[serde(default)]
    pub skills_to_add: Vec<String>,
}

/// A roadmap item paired with its tracked status — one row of the task list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecord {
    pub item_id: String,
    pub item_type: ItemKind,
    pub item_name: String,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encouragement_message: Option<String>,
}

/// Per-kind slice of the progress summary.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct KindSummary {
    pub total: u32,
    pub completed: u32,
}

/// Aggregate progress counts for one user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub total: u32,
    pub not_started: u32,
    pub in_progress: u32,
    pub completed: u32,
    #[serde(default)]
    pub by_type: std::collections::BTreeMap<String, KindSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_status_round_trips_snake_case() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, r#""in_progress""#);
        let back: TaskStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TaskStatus::InProgress);
    }

    #[test]
    fn test_phase_with_omitted_collections_deserializes() {
        let json = r#"{
            "phase": 1,
            "title": "Year 1: Foundations",
            "focus": "Core skills",
            "courses": [
                {"id": "c1", "name": "Intro to Programming", "platform": "Coursera",
                 "duration": "4 weeks", "rationale": "Foundation"}
            ]
        }"#;
        let phase: Phase = serde_json::from_str(json).unwrap();
        assert_eq!(phase.item_count(), 1);
        assert!(phase.tests.is_empty());
        assert!(phase.internships.is_empty());
        assert!(phase.weekly_routine.is_none());
    }

    #[test]
    fn test_internship_item_uses_type_key_on_the_wire() {
        let json = r#"{"id": "i1", "type": "Software Engineering Intern",
                       "when": "Summer", "companies": ["Acme"], "rationale": "Experience"}"#;
        let item: InternshipItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.role_type, "Software Engineering Intern");
        let out = serde_json::to_value(&item).unwrap();
        assert!(out.get("type").is_some());
        assert!(out.get("role_type").is_none());
    }

    #[test]
    fn test_primary_career_path_falls_back_when_empty() {
        let analysis = ProfileAnalysis::default();
        assert_eq!(analysis.primary_career_path(), "Professional");
    }

    #[test]
    fn test_empty_resume_reports_empty() {
        assert!(Resume::default().is_empty());
        let resume = Resume {
            skills: vec!["Rust".to_string()],
            ..Resume::default()
        };
        assert!(!resume.is_empty());
    }
}
