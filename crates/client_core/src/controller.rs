//! The view controller: maps UI commands to backend calls, caches responses
//! in the session, and reports through the notification queue.
//!
//! All mutation happens inside response handlers; the host surface reads
//! snapshots and re-renders. Locks are never held across an await.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, warn};
use uuid::Uuid;

use shared::domain::TaskStatus;
use shared::protocol::{ContactDetailsRequest, UserSummary};

use crate::api::{ApiClient, ApiError};
use crate::form::{AdvanceOutcome, OnboardingForm};
use crate::notify::{NotificationKind, Notifier};
use crate::state::{Page, ProfileTab, Session, TaskFilter};

const DEFAULT_REDIRECT_DELAY: Duration = Duration::from_millis(1500);
const DEFAULT_ENCOURAGEMENT_DELAY: Duration = Duration::from_millis(2000);

/// Contact block submitted from the profile editor.
#[derive(Debug, Clone)]
pub struct ContactDetails {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub links: Vec<String>,
}

/// Every UI event the surface can emit, decoupled from element lookups.
#[derive(Debug, Clone)]
pub enum Command {
    Navigate(Page),
    FormInput { name: String, value: String },
    FormNext,
    FormBack,
    AttachPhoto {
        filename: String,
        mime: String,
        bytes: Vec<u8>,
    },
    SubmitOnboarding,
    SetTaskFilter(TaskFilter),
    SelectProfileTab(ProfileTab),
    UpdateTaskStatus { item_id: String, status: TaskStatus },
    RefreshProfile,
    SubmitContact(ContactDetails),
}

/// Steps of the onboarding submission saga, in execution order. A failure
/// report names the step so partial completion is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SagaStep {
    Register,
    CompleteOnboarding,
    GenerateRoadmap,
}

impl fmt::Display for SagaStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SagaStep::Register => "registration",
            SagaStep::CompleteOnboarding => "onboarding completion",
            SagaStep::GenerateRoadmap => "roadmap generation",
        };
        f.write_str(name)
    }
}

/// Scoped loading-overlay counter. Each logical operation holds a guard for
/// its duration; the overlay is visible while any guard is alive.
#[derive(Clone, Default)]
pub struct LoadingGauge {
    pending: Arc<AtomicUsize>,
}

impl LoadingGauge {
    fn begin(&self) -> LoadingGuard {
        self.pending.fetch_add(1, Ordering::SeqCst);
        LoadingGuard {
            pending: Arc::clone(&self.pending),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending.load(Ordering::SeqCst) > 0
    }
}

pub struct LoadingGuard {
    pending: Arc<AtomicUsize>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.pending.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Releases the submission latch on every exit path.
struct SubmitLatch<'a>(&'a AtomicBool);

impl Drop for SubmitLatch<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct ViewController {
    api: ApiClient,
    session: Mutex<Session>,
    form: Mutex<OnboardingForm>,
    notifier: Notifier,
    loading: LoadingGauge,
    submitting: AtomicBool,
    redirect_delay: Duration,
    encouragement_delay: Duration,
}

impl ViewController {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            session: Mutex::new(Session::new()),
            form: Mutex::new(OnboardingForm::standard()),
            notifier: Notifier::new(),
            loading: LoadingGauge::default(),
            submitting: AtomicBool::new(false),
            redirect_delay: DEFAULT_REDIRECT_DELAY,
            encouragement_delay: DEFAULT_ENCOURAGEMENT_DELAY,
        }
    }

    /// Overrides the fixed post-submit and encouragement delays.
    pub fn with_timings(mut self, redirect: Duration, encouragement: Duration) -> Self {
        self.redirect_delay = redirect;
        self.encouragement_delay = encouragement;
        self
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn loading(&self) -> &LoadingGauge {
        &self.loading
    }

    /// Snapshot of the session for rendering and assertions.
    pub fn session(&self) -> Session {
        self.session.lock().expect("session poisoned").clone()
    }

    /// Snapshot of the onboarding form for rendering.
    pub fn form(&self) -> OnboardingForm {
        self.form.lock().expect("form poisoned").clone()
    }

    fn with_session<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        f(&mut self.session.lock().expect("session poisoned"))
    }

    fn user_id(&self) -> Option<Uuid> {
        self.with_session(|s| s.user_id())
    }

    fn report_failure(&self, operation: &str, error: &ApiError) {
        warn!("{operation} failed: {error}");
        self.notifier.error(format!("{operation} failed: {error}"));
    }

    /// Single entry point for every UI event.
    pub async fn dispatch(&self, command: Command) {
        match command {
            Command::Navigate(page) => self.navigate(page).await,
            Command::FormInput { name, value } => {
                self.form
                    .lock()
                    .expect("form poisoned")
                    .set_value(&name, value);
            }
            Command::FormNext => self.form_next(),
            Command::FormBack => {
                self.form.lock().expect("form poisoned").retreat();
            }
            Command::AttachPhoto {
                filename,
                mime,
                bytes,
            } => self.attach_photo(&filename, &mime, &bytes),
            Command::SubmitOnboarding => self.submit_onboarding().await,
            Command::SetTaskFilter(filter) => {
                self.with_session(|s| s.task_filter = filter);
            }
            Command::SelectProfileTab(tab) => {
                self.with_session(|s| s.profile_tab = tab);
            }
            Command::UpdateTaskStatus { item_id, status } => {
                self.update_task_status(&item_id, status).await
            }
            Command::RefreshProfile => self.refresh_profile().await,
            Command::SubmitContact(details) => self.submit_contact(details).await,
        }
    }

    // ────────────────────────────────────────────────────────────────────
    // Navigation
    // ────────────────────────────────────────────────────────────────────

    /// Sets the visible page and triggers its fetch when a session exists.
    pub async fn navigate(&self, page: Page) {
        let leaving_onboarding = self.with_session(|s| {
            let was = s.current_page;
            s.current_page = page;
            was == Page::Onboarding && page != Page::Onboarding
        });

        // The onboarding draft is transient: navigating away destroys it.
        if leaving_onboarding {
            *self.form.lock().expect("form poisoned") = OnboardingForm::standard();
        }

        if self.user_id().is_none() {
            debug!("navigate to {} without a session; skipping fetch", page.as_str());
            return;
        }

        match page {
            Page::Onboarding => {}
            Page::Roadmap => self.load_roadmap().await,
            Page::Progress => self.load_progress().await,
            Page::Profile => self.load_profile().await,
        }
    }

    async fn load_roadmap(&self) {
        let Some(user_id) = self.user_id() else { return };
        let _guard = self.loading.begin();
        match self.api.fetch_roadmap(user_id).await {
            Ok(response) => self.with_session(|s| s.roadmap = Some(response.roadmap)),
            // No roadmap yet is an expected absence, rendered as an empty state.
            Err(e) if e.is_not_found() => self.with_session(|s| s.roadmap = None),
            Err(e) => self.report_failure("Loading roadmap", &e),
        }
    }

    async fn load_progress(&self) {
        let Some(user_id) = self.user_id() else { return };
        let _guard = self.loading.begin();
        match self.api.fetch_summary(user_id).await {
            Ok(summary) => self.with_session(|s| s.summary = Some(summary)),
            Err(e) => self.report_failure("Loading progress summary", &e),
        }
        match self.api.fetch_tasks(user_id).await {
            Ok(response) => self.with_session(|s| s.tasks = response.tasks),
            Err(e) => self.report_failure("Loading tasks", &e),
        }
    }

    async fn load_profile(&self) {
        let Some(user_id) = self.user_id() else { return };
        let _guard = self.loading.begin();
        match self.api.fetch_profile(user_id).await {
            Ok(profile) => self.with_session(|s| s.profile = Some(profile)),
            Err(e) => self.report_failure("Loading profile", &e),
        }
        match self.api.fetch_resume(user_id).await {
            Ok(response) => self.with_session(|s| s.resume = Some(response.resume)),
            Err(e) => self.report_failure("Loading resume", &e),
        }
        match self.api.fetch_linkedin(user_id).await {
            Ok(bundle) => self.with_session(|s| s.linkedin = Some(bundle)),
            Err(e) => self.report_failure("Loading LinkedIn suggestions", &e),
        }
    }

    // ────────────────────────────────────────────────────────────────────
    // Multi-step form
    // ────────────────────────────────────────────────────────────────────

    fn form_next(&self) {
        let outcome = self.form.lock().expect("form poisoned").advance();
        match outcome {
            AdvanceOutcome::Moved(_) => {
                self.with_session(|s| s.focused_field = None);
            }
            AdvanceOutcome::Blocked(failure) => {
                self.with_session(|s| s.focused_field = Some(failure.field.clone()));
                self.notifier.error(failure.message);
            }
        }
    }

    fn attach_photo(&self, filename: &str, mime: &str, bytes: &[u8]) {
        let result = self
            .form
            .lock()
            .expect("form poisoned")
            .attach_image(filename, mime, bytes);
        if let Err(e) = result {
            self.notifier.error(e.to_string());
        }
    }

    // ────────────────────────────────────────────────────────────────────
    // Onboarding submission saga
    // ────────────────────────────────────────────────────────────────────

    /// Runs register → complete-onboarding → generate-roadmap, strictly in
    /// order. The submit trigger stays disabled for the whole operation.
    pub async fn submit_onboarding(&self) {
        if self.submitting.swap(true, Ordering::SeqCst) {
            self.notifier.info("Submission already in progress");
            return;
        }
        let _latch = SubmitLatch(&self.submitting);

        {
            let form = self.form.lock().expect("form poisoned");
            if !form.can_submit() {
                self.notifier
                    .error("Complete all steps before submitting");
                return;
            }
            if let Some(failure) = form.validate_step().into_iter().next() {
                drop(form);
                self.with_session(|s| s.focused_field = Some(failure.field.clone()));
                self.notifier.error(failure.message);
                return;
            }
        }

        let saga = {
            let _guard = self.loading.begin();
            self.run_onboarding_saga().await
        };

        match saga {
            Ok(()) => {
                *self.form.lock().expect("form poisoned") = OnboardingForm::standard();
                self.notifier
                    .success("Onboarding complete! Preparing your roadmap...");
                tokio::time::sleep(self.redirect_delay).await;
                self.navigate(Page::Roadmap).await;
            }
            Err((step, message)) => {
                warn!("onboarding saga aborted at {step}: {message}");
                self.notifier.error(format!("{step} failed: {message}"));
            }
        }
    }

    async fn run_onboarding_saga(&self) -> Result<(), (SagaStep, String)> {
        let (email, name) = {
            let form = self.form.lock().expect("form poisoned");
            (form.email(), form.name())
        };

        // Step 1: register. An already-registered email is a success path —
        // resolve the identity through the lookup endpoint instead.
        let user: UserSummary = match self.api.register(&email, &name).await {
            Ok(response) => response.user,
            Err(e) if e.is_conflict() => {
                debug!("register returned conflict for {email}; falling back to lookup");
                self.api
                    .lookup_user(&email)
                    .await
                    .map_err(|e| (SagaStep::Register, e.to_string()))?
            }
            Err(e) => return Err((SagaStep::Register, e.to_string())),
        };

        // Step 2: complete onboarding with the normalized draft.
        let draft = self.form.lock().expect("form poisoned").draft(user.id);
        self.api
            .complete_onboarding(&draft)
            .await
            .map_err(|e| (SagaStep::CompleteOnboarding, e.to_string()))?;

        // Identity is cached here, before roadmap generation: a generation
        // failure leaves the user signed in with an empty roadmap.
        self.with_session(|s| s.user = Some(user.clone()));

        // Step 3: generate the roadmap.
        let timeline_months = draft.planning_horizon_years * 12;
        self.api
            .generate_roadmap(user.id, timeline_months)
            .await
            .map_err(|e| (SagaStep::GenerateRoadmap, e.to_string()))?;

        Ok(())
    }

    // ────────────────────────────────────────────────────────────────────
    // Task progress
    // ────────────────────────────────────────────────────────────────────

    /// Issues one status update, then re-fetches the summary and task list.
    /// No optimistic local mutation.
    pub async fn update_task_status(&self, item_id: &str, status: TaskStatus) {
        let Some(user_id) = self.user_id() else {
            self.notifier.error("Sign in before updating tasks");
            return;
        };

        let update = {
            let _guard = self.loading.begin();
            self.api
                .update_task_status(user_id, item_id, status, None)
                .await
        };

        let response = match update {
            Ok(response) => response,
            Err(e) => {
                self.report_failure("Updating task", &e);
                return;
            }
        };

        let name = response.progress.item_name.clone();
        match status {
            TaskStatus::NotStarted => self.notifier.info(format!("{name} reset to not started")),
            TaskStatus::InProgress => self.notifier.info(format!("Marked {name} as in progress")),
            TaskStatus::Completed => {
                self.notifier.success(format!("{name} completed!"));
                if let Some(message) = response.progress.encouragement_message.clone() {
                    self.notifier.push_delayed(
                        NotificationKind::Success,
                        message,
                        self.encouragement_delay,
                    );
                }
            }
        }

        self.load_progress().await;
    }

    // ────────────────────────────────────────────────────────────────────
    // Profile
    // ────────────────────────────────────────────────────────────────────

    pub async fn refresh_profile(&self) {
        let Some(user_id) = self.user_id() else {
            self.notifier.error("Sign in before refreshing the profile");
            return;
        };

        let refreshed = {
            let _guard = self.loading.begin();
            self.api.refresh_profile(user_id).await
        };

        match refreshed {
            Ok(ack) => {
                self.notifier.success(ack.message);
                self.load_profile().await;
            }
            Err(e) => self.report_failure("Refreshing profile", &e),
        }
    }

    pub async fn submit_contact(&self, details: ContactDetails) {
        let Some(user_id) = self.user_id() else {
            self.notifier.error("Sign in before saving contact details");
            return;
        };

        let request = ContactDetailsRequest {
            user_id,
            full_name: details.full_name,
            email: details.email,
            phone: details.phone,
            location: details.location,
            links: details.links,
        };

        let saved = {
            let _guard = self.loading.begin();
            self.api.submit_contact(&request).await
        };

        match saved {
            Ok(ack) => {
                self.notifier.success(ack.message);
                self.load_profile().await;
            }
            Err(e) => self.report_failure("Saving contact details", &e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saga_step_names_are_user_facing() {
        assert_eq!(SagaStep::Register.to_string(), "registration");
        assert_eq!(
            SagaStep::CompleteOnboarding.to_string(),
            "onboarding completion"
        );
        assert_eq!(SagaStep::GenerateRoadmap.to_string(), "roadmap generation");
    }

    #[test]
    fn test_loading_gauge_releases_on_drop() {
        let gauge = LoadingGauge::default();
        assert!(!gauge.is_loading());
        {
            let _outer = gauge.begin();
            let _inner = gauge.begin();
            assert!(gauge.is_loading());
        }
        assert!(!gauge.is_loading());
    }
}
