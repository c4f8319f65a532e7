//! End-to-end controller flows against an in-process stub backend.
//!
//! The stub mirrors the real API surface closely enough to drive the full
//! onboarding saga, task updates, and the failure paths the controller must
//! tolerate.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use client_core::{
    ApiClient, Command, NotificationKind, Page, TaskFilter, ViewController,
};
use shared::domain::{ItemKind, Roadmap, TaskRecord, TaskStatus};
use shared::protocol::{
    GenerateRoadmapResponse, OnboardResponse, ProgressSummary, RegisterResponse, RoadmapResponse,
    StudentProfilePayload, TaskListResponse, UpdateProgressRequest, UpdateProgressResponse,
    UserSummary,
};

const REDIRECT_DELAY: Duration = Duration::from_millis(10);
const ENCOURAGEMENT_DELAY: Duration = Duration::from_millis(150);

#[derive(Default)]
struct StubCounters {
    register: AtomicUsize,
    lookup: AtomicUsize,
    onboard: AtomicUsize,
    generate: AtomicUsize,
    roadmap: AtomicUsize,
    summary: AtomicUsize,
    tasks: AtomicUsize,
}

struct Stub {
    user_id: Uuid,
    conflict_on_register: bool,
    fail_generate: bool,
    register_delay: Duration,
    encouragement: Option<String>,
    counters: StubCounters,
}

impl Stub {
    fn new() -> Self {
        Self {
            user_id: Uuid::new_v4(),
            conflict_on_register: false,
            fail_generate: false,
            register_delay: Duration::ZERO,
            encouragement: None,
            counters: StubCounters::default(),
        }
    }

    fn user(&self) -> UserSummary {
        UserSummary {
            id: self.user_id,
            email: "ada@example.com".to_string(),
            name: "Ada Lovelace".to_string(),
            onboarding_complete: true,
            created_at: Utc::now(),
        }
    }

    fn profile(&self) -> StudentProfilePayload {
        serde_json::from_value(json!({
            "user_id": self.user_id,
            "major": "Mathematics",
            "university": "Analytical University",
            "experience_level": "Beginner",
            "career_aspirations": "Backend engineer",
            "preferred_learning": "projects",
            "time_commitment": "10 hours/week",
            "open_to_relocation": false,
            "planning_horizon_years": 1,
            "updated_at": Utc::now()
        }))
        .unwrap()
    }
}

fn sample_roadmap() -> Roadmap {
    serde_json::from_value(json!({
        "phases": [{
            "phase": 1,
            "title": "Year 1: Foundations",
            "focus": "Core skills",
            "courses": [{"id": "c1", "name": "Intro to Rust", "platform": "Coursera",
                         "duration": "6 weeks", "rationale": "Core language"}],
            "projects": [{"id": "p1", "name": "CLI Tool", "description": "Build one",
                          "skills_demonstrated": ["Rust"], "rationale": "Practice"}]
        }]
    }))
    .unwrap()
}

fn sample_tasks() -> Vec<TaskRecord> {
    vec![
        TaskRecord {
            item_id: "c1".to_string(),
            item_type: ItemKind::Course,
            item_name: "Intro to Rust".to_string(),
            status: TaskStatus::Completed,
            completion_date: Some(Utc::now()),
            notes: None,
            encouragement_message: None,
        },
        TaskRecord {
            item_id: "p1".to_string(),
            item_type: ItemKind::Project,
            item_name: "CLI Tool".to_string(),
            status: TaskStatus::NotStarted,
            completion_date: None,
            notes: None,
            encouragement_message: None,
        },
    ]
}

fn error_body(status: StatusCode, code: &str, message: &str) -> Response {
    (
        status,
        Json(json!({"error": {"code": code, "message": message}})),
    )
        .into_response()
}

async fn handle_register(State(stub): State<Arc<Stub>>) -> Response {
    stub.counters.register.fetch_add(1, Ordering::SeqCst);
    if !stub.register_delay.is_zero() {
        tokio::time::sleep(stub.register_delay).await;
    }
    if stub.conflict_on_register {
        return error_body(StatusCode::CONFLICT, "CONFLICT", "User already exists");
    }
    Json(RegisterResponse {
        message: "User registered successfully".to_string(),
        user: stub.user(),
    })
    .into_response()
}

async fn handle_lookup(State(stub): State<Arc<Stub>>) -> Json<UserSummary> {
    stub.counters.lookup.fetch_add(1, Ordering::SeqCst);
    Json(stub.user())
}

async fn handle_onboard(State(stub): State<Arc<Stub>>) -> Json<OnboardResponse> {
    stub.counters.onboard.fetch_add(1, Ordering::SeqCst);
    Json(OnboardResponse {
        message: "Onboarding completed successfully".to_string(),
        profile: stub.profile(),
    })
}

async fn handle_generate(State(stub): State<Arc<Stub>>) -> Response {
    stub.counters.generate.fetch_add(1, Ordering::SeqCst);
    if stub.fail_generate {
        return error_body(
            StatusCode::INTERNAL_SERVER_ERROR,
            "LLM_ERROR",
            "An AI processing error occurred",
        );
    }
    Json(GenerateRoadmapResponse {
        message: "Growth path generated successfully".to_string(),
        growth_path_id: Uuid::new_v4(),
        phase_count: 1,
        item_count: 2,
    })
    .into_response()
}

async fn handle_roadmap(State(stub): State<Arc<Stub>>) -> Json<RoadmapResponse> {
    stub.counters.roadmap.fetch_add(1, Ordering::SeqCst);
    Json(RoadmapResponse {
        roadmap: sample_roadmap(),
        generated_at: Utc::now(),
    })
}

async fn handle_update(
    State(stub): State<Arc<Stub>>,
    Json(request): Json<UpdateProgressRequest>,
) -> Json<UpdateProgressResponse> {
    let encouragement = (request.status == TaskStatus::Completed)
        .then(|| stub.encouragement.clone())
        .flatten();
    Json(UpdateProgressResponse {
        message: "Progress updated successfully".to_string(),
        progress: TaskRecord {
            item_id: request.item_id,
            item_type: ItemKind::Course,
            item_name: "Intro to Rust".to_string(),
            status: request.status,
            completion_date: Some(Utc::now()),
            notes: request.notes,
            encouragement_message: encouragement,
        },
    })
}

async fn handle_summary(State(stub): State<Arc<Stub>>) -> Json<ProgressSummary> {
    stub.counters.summary.fetch_add(1, Ordering::SeqCst);
    Json(ProgressSummary {
        total: 4,
        not_started: 2,
        in_progress: 1,
        completed: 1,
        by_type: Default::default(),
    })
}

async fn handle_tasks(State(stub): State<Arc<Stub>>) -> Json<TaskListResponse> {
    stub.counters.tasks.fetch_add(1, Ordering::SeqCst);
    Json(TaskListResponse {
        tasks: sample_tasks(),
    })
}

async fn spawn_stub(stub: Arc<Stub>) -> SocketAddr {
    let router = Router::new()
        .route("/api/v1/users/register", post(handle_register))
        .route("/api/v1/users/lookup", get(handle_lookup))
        .route("/api/v1/users/onboard", post(handle_onboard))
        .route("/api/v1/growth-path/generate", post(handle_generate))
        .route("/api/v1/growth-path/:user_id", get(handle_roadmap))
        .route("/api/v1/progress/update", post(handle_update))
        .route("/api/v1/progress/:user_id/summary", get(handle_summary))
        .route("/api/v1/progress/:user_id/tasks", get(handle_tasks))
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn controller_for(addr: SocketAddr) -> ViewController {
    ViewController::new(ApiClient::new(format!("http://{addr}")))
        .with_timings(REDIRECT_DELAY, ENCOURAGEMENT_DELAY)
}

async fn fill_form_to_final_step(controller: &ViewController) {
    let inputs = [
        ("name", "Ada Lovelace"),
        ("email", "ada@example.com"),
        ("major", "Mathematics"),
    ];
    for (name, value) in inputs {
        controller
            .dispatch(Command::FormInput {
                name: name.to_string(),
                value: value.to_string(),
            })
            .await;
    }
    controller.dispatch(Command::FormNext).await;

    controller
        .dispatch(Command::FormInput {
            name: "career_aspirations".to_string(),
            value: "Backend engineer".to_string(),
        })
        .await;
    controller.dispatch(Command::FormNext).await;

    controller
        .dispatch(Command::FormInput {
            name: "time_commitment".to_string(),
            value: "10 hours/week".to_string(),
        })
        .await;
    controller.dispatch(Command::FormNext).await;

    controller
        .dispatch(Command::FormInput {
            name: "planning_horizon_years".to_string(),
            value: "1".to_string(),
        })
        .await;
    assert!(controller.form().can_submit());
}

#[tokio::test]
async fn register_conflict_falls_back_to_lookup_and_completes() {
    let stub = Arc::new({
        let mut stub = Stub::new();
        stub.conflict_on_register = true;
        stub
    });
    let addr = spawn_stub(Arc::clone(&stub)).await;
    let controller = controller_for(addr);

    fill_form_to_final_step(&controller).await;
    controller.dispatch(Command::SubmitOnboarding).await;

    // 409 was tolerated: identity resolved via lookup, saga ran to the end
    assert_eq!(stub.counters.lookup.load(Ordering::SeqCst), 1);
    assert_eq!(stub.counters.onboard.load(Ordering::SeqCst), 1);
    assert_eq!(stub.counters.generate.load(Ordering::SeqCst), 1);

    let session = controller.session();
    assert_eq!(session.user_id(), Some(stub.user_id));
    // The fixed-delay redirect landed on the roadmap page and fetched it
    assert_eq!(session.current_page, Page::Roadmap);
    assert!(session.roadmap.is_some());
    assert_eq!(stub.counters.roadmap.load(Ordering::SeqCst), 1);

    let kinds: Vec<NotificationKind> = controller
        .notifier()
        .snapshot()
        .iter()
        .map(|n| n.kind)
        .collect();
    assert!(kinds.contains(&NotificationKind::Success));
}

#[tokio::test]
async fn roadmap_generation_failure_still_leaves_identity_set() {
    let stub = Arc::new({
        let mut stub = Stub::new();
        stub.fail_generate = true;
        stub
    });
    let addr = spawn_stub(Arc::clone(&stub)).await;
    let controller = controller_for(addr);

    fill_form_to_final_step(&controller).await;
    controller.dispatch(Command::SubmitOnboarding).await;

    let session = controller.session();
    // Identity was cached by the successful onboarding step
    assert_eq!(session.user_id(), Some(stub.user_id));
    // The saga stopped: no redirect happened
    assert_eq!(session.current_page, Page::Onboarding);

    let notifications = controller.notifier().snapshot();
    let error = notifications
        .iter()
        .find(|n| n.kind == NotificationKind::Error)
        .expect("a failure notification is shown");
    assert!(error.text.contains("roadmap generation"));
}

#[tokio::test]
async fn completed_task_shows_delayed_encouragement_and_refetches() {
    let stub = Arc::new({
        let mut stub = Stub::new();
        stub.encouragement = Some("Three down, momentum is real.".to_string());
        stub
    });
    let addr = spawn_stub(Arc::clone(&stub)).await;
    let controller = controller_for(addr);

    fill_form_to_final_step(&controller).await;
    controller.dispatch(Command::SubmitOnboarding).await;
    controller.notifier().drain();
    assert_eq!(stub.counters.summary.load(Ordering::SeqCst), 0);

    controller
        .dispatch(Command::UpdateTaskStatus {
            item_id: "c1".to_string(),
            status: TaskStatus::Completed,
        })
        .await;

    // The contextual notification is immediate; the encouragement is not
    let first = controller.notifier().snapshot();
    assert_eq!(first.len(), 1);
    assert!(first[0].text.contains("completed"));

    tokio::time::sleep(ENCOURAGEMENT_DELAY * 2).await;
    let second = controller.notifier().snapshot();
    assert_eq!(second.len(), 2);
    assert_eq!(second[1].text, "Three down, momentum is real.");

    // Full re-fetch of both summary and task list, no optimistic mutation
    assert_eq!(stub.counters.summary.load(Ordering::SeqCst), 1);
    assert_eq!(stub.counters.tasks.load(Ordering::SeqCst), 1);
    assert_eq!(controller.session().tasks.len(), 2);
}

#[tokio::test]
async fn duplicate_submission_is_dropped_while_in_flight() {
    let stub = Arc::new({
        let mut stub = Stub::new();
        stub.register_delay = Duration::from_millis(100);
        stub
    });
    let addr = spawn_stub(Arc::clone(&stub)).await;
    let controller = controller_for(addr);

    fill_form_to_final_step(&controller).await;
    tokio::join!(
        controller.submit_onboarding(),
        controller.submit_onboarding()
    );

    // Only one submission reached the network
    assert_eq!(stub.counters.register.load(Ordering::SeqCst), 1);
    let notifications = controller.notifier().snapshot();
    let dropped = notifications
        .iter()
        .filter(|n| n.text.contains("already in progress"))
        .count();
    assert_eq!(dropped, 1);
    let successes = notifications
        .iter()
        .filter(|n| n.kind == NotificationKind::Success)
        .count();
    assert_eq!(successes, 1);
}

#[tokio::test]
async fn navigation_without_a_session_changes_page_but_fetches_nothing() {
    let stub = Arc::new(Stub::new());
    let addr = spawn_stub(Arc::clone(&stub)).await;
    let controller = controller_for(addr);

    controller.dispatch(Command::Navigate(Page::Roadmap)).await;

    let session = controller.session();
    assert_eq!(session.current_page, Page::Roadmap);
    assert!(session.roadmap.is_none());
    assert_eq!(stub.counters.roadmap.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn switching_filters_never_touches_the_network() {
    let stub = Arc::new(Stub::new());
    let addr = spawn_stub(Arc::clone(&stub)).await;
    let controller = controller_for(addr);

    fill_form_to_final_step(&controller).await;
    controller.dispatch(Command::SubmitOnboarding).await;
    controller.dispatch(Command::Navigate(Page::Progress)).await;

    let tasks_before = stub.counters.tasks.load(Ordering::SeqCst);
    let summary_before = stub.counters.summary.load(Ordering::SeqCst);

    controller
        .dispatch(Command::SetTaskFilter(TaskFilter::Kind(ItemKind::Course)))
        .await;
    let session = controller.session();
    let filtered = session.filtered_tasks();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].item_id, "c1");

    controller
        .dispatch(Command::SetTaskFilter(TaskFilter::All))
        .await;
    assert_eq!(controller.session().filtered_tasks().len(), 2);

    assert_eq!(stub.counters.tasks.load(Ordering::SeqCst), tasks_before);
    assert_eq!(stub.counters.summary.load(Ordering::SeqCst), summary_before);
}
