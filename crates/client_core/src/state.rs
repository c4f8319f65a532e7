use shared::domain::{
    ItemKind, LinkedinSuggestions, ProgressSummary, Resume, Roadmap, TaskRecord,
};
use shared::protocol::{ProfileResponse, UserSummary};

/// The four navigable sections of the single-page surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Onboarding,
    Roadmap,
    Progress,
    Profile,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Onboarding, Page::Roadmap, Page::Progress, Page::Profile];

    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Onboarding => "onboarding",
            Page::Roadmap => "roadmap",
            Page::Progress => "progress",
            Page::Profile => "profile",
        }
    }
}

/// Tabs of the profile editor. Switching tabs only re-renders cached data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfileTab {
    #[default]
    Analysis,
    Resume,
    Linkedin,
}

impl ProfileTab {
    pub const ALL: [ProfileTab; 3] = [ProfileTab::Analysis, ProfileTab::Resume, ProfileTab::Linkedin];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileTab::Analysis => "analysis",
            ProfileTab::Resume => "resume",
            ProfileTab::Linkedin => "linkedin",
        }
    }
}

/// Client-side predicate over the cached task list. Switching filters never
/// touches the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskFilter {
    #[default]
    All,
    Kind(ItemKind),
}

impl TaskFilter {
    pub fn matches(&self, task: &TaskRecord) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Kind(kind) => task.item_type == *kind,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskFilter::All => "all",
            TaskFilter::Kind(kind) => kind.as_str(),
        }
    }
}

/// Session state for the page. Created empty at startup, mutated only inside
/// response handlers, lost on reload — nothing here is persisted.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub user: Option<UserSummary>,
    pub current_page: Page,
    pub roadmap: Option<Roadmap>,
    pub tasks: Vec<TaskRecord>,
    pub summary: Option<ProgressSummary>,
    pub resume: Option<Resume>,
    pub linkedin: Option<LinkedinSuggestions>,
    pub profile: Option<ProfileResponse>,
    pub task_filter: TaskFilter,
    pub profile_tab: ProfileTab,
    /// Field that should receive focus after a blocked form advance.
    pub focused_field: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn user_id(&self) -> Option<uuid::Uuid> {
        self.user.as_ref().map(|u| u.id)
    }

    /// Applies the active filter to the cached task list, preserving the
    /// backend-supplied order.
    pub fn filtered_tasks(&self) -> Vec<&TaskRecord> {
        self.tasks
            .iter()
            .filter(|t| self.task_filter.matches(t))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::TaskStatus;

    fn task(id: &str, kind: ItemKind) -> TaskRecord {
        TaskRecord {
            item_id: id.to_string(),
            item_type: kind,
            item_name: id.to_string(),
            status: TaskStatus::NotStarted,
            completion_date: None,
            notes: None,
            encouragement_message: None,
        }
    }

    #[test]
    fn test_filter_all_is_identity() {
        let mut session = Session::new();
        session.tasks = vec![
            task("c1", ItemKind::Course),
            task("p1", ItemKind::Project),
            task("t1", ItemKind::Test),
        ];
        let filtered = session.filtered_tasks();
        assert_eq!(filtered.len(), 3);
        let ids: Vec<_> = filtered.iter().map(|t| t.item_id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "p1", "t1"]);
    }

    #[test]
    fn test_filter_by_kind_returns_exact_subset_in_order() {
        let mut session = Session::new();
        session.tasks = vec![
            task("c1", ItemKind::Course),
            task("p1", ItemKind::Project),
            task("c2", ItemKind::Course),
            task("cert1", ItemKind::Certificate),
        ];
        session.task_filter = TaskFilter::Kind(ItemKind::Course);
        let ids: Vec<_> = session
            .filtered_tasks()
            .iter()
            .map(|t| t.item_id.as_str())
            .collect();
        assert_eq!(ids, vec!["c1", "c2"]);
    }

    #[test]
    fn test_default_session_is_unauthenticated_onboarding() {
        let session = Session::new();
        assert!(!session.is_authenticated());
        assert_eq!(session.current_page, Page::Onboarding);
        assert_eq!(session.task_filter, TaskFilter::All);
    }
}
