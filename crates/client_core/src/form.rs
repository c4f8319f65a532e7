//! Multi-step onboarding form engine.
//!
//! A bounded step counter walks a fixed field layout. Advancing validates
//! only the current step's visible fields; retreating is unconditional. The
//! submit affordance exists only at the final step.

use std::collections::HashMap;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;
use uuid::Uuid;

use shared::protocol::OnboardRequest;

/// Local size ceiling for uploaded images, checked before any network call.
pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    /// Parsed as f64; empty is allowed unless the field is required.
    Number,
    /// Comma-separated input, normalized to an array on submit.
    List,
    Toggle,
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Hidden inputs are skipped by step validation.
    pub hidden: bool,
}

impl FieldSpec {
    fn required(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: true,
            hidden: false,
        }
    }

    fn optional(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
            hidden: false,
        }
    }

    fn hidden(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
            hidden: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StepSpec {
    pub title: &'static str,
    pub fields: Vec<FieldSpec>,
}

/// Field-level validation failure. The first failure of a blocked advance
/// names the field that should receive focus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Step counter moved to the contained step.
    Moved(usize),
    /// Advancement blocked; carries the first invalid field.
    Blocked(ValidationFailure),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageError {
    #[error("'{0}' is not an image")]
    NotAnImage(String),
    #[error("image is {0} bytes; the limit is 2 MiB")]
    TooLarge(usize),
}

#[derive(Debug, Clone)]
pub struct ImageAttachment {
    pub filename: String,
    pub mime: String,
    pub data_url: String,
}

/// The onboarding draft: transient raw field values keyed by field name,
/// destroyed on submit or navigation away.
#[derive(Debug, Clone)]
pub struct OnboardingForm {
    steps: Vec<StepSpec>,
    step: usize,
    values: HashMap<String, String>,
    photo: Option<ImageAttachment>,
}

impl OnboardingForm {
    /// The standard four-step onboarding flow.
    pub fn standard() -> Self {
        Self::new(vec![
            StepSpec {
                title: "About you",
                fields: vec![
                    FieldSpec::required("name", "Full name", FieldKind::Text),
                    FieldSpec::required("email", "Email", FieldKind::Email),
                    FieldSpec::optional("university", "University", FieldKind::Text),
                    FieldSpec::required("major", "Major", FieldKind::Text),
                    FieldSpec::optional("gpa", "GPA", FieldKind::Number),
                ],
            },
            StepSpec {
                title: "Goals",
                fields: vec![
                    FieldSpec::required(
                        "career_aspirations",
                        "Career aspirations",
                        FieldKind::Text,
                    ),
                    FieldSpec::optional("target_industries", "Target industries", FieldKind::List),
                    FieldSpec::optional("experience_level", "Experience level", FieldKind::Text),
                ],
            },
            StepSpec {
                title: "Learning",
                fields: vec![
                    FieldSpec::optional("current_skills", "Current skills", FieldKind::List),
                    FieldSpec::optional(
                        "preferred_learning",
                        "Preferred learning style",
                        FieldKind::Text,
                    ),
                    FieldSpec::optional(
                        "preferred_content_types",
                        "Preferred content types",
                        FieldKind::List,
                    ),
                    FieldSpec::required("time_commitment", "Time commitment", FieldKind::Text),
                ],
            },
            StepSpec {
                title: "Finishing touches",
                fields: vec![
                    FieldSpec::required(
                        "planning_horizon_years",
                        "Planning horizon (years)",
                        FieldKind::Number,
                    ),
                    FieldSpec::optional("open_to_relocation", "Open to relocation", FieldKind::Toggle),
                    // Revealed by the relocation toggle in the rendered surface.
                    FieldSpec::hidden("relocation_goal", "Relocation goal", FieldKind::Text),
                    FieldSpec::optional(
                        "extracurricular_interests",
                        "Extracurricular interests",
                        FieldKind::List,
                    ),
                ],
            },
        ])
    }

    pub fn new(steps: Vec<StepSpec>) -> Self {
        assert!(!steps.is_empty(), "a form needs at least one step");
        Self {
            steps,
            step: 1,
            values: HashMap::new(),
            photo: None,
        }
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn is_final_step(&self) -> bool {
        self.step == self.steps.len()
    }

    /// The submit affordance is shown only at the final step.
    pub fn can_submit(&self) -> bool {
        self.is_final_step()
    }

    pub fn current_step_spec(&self) -> &StepSpec {
        &self.steps[self.step - 1]
    }

    pub fn set_value(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(name.to_string(), value.into());
    }

    pub fn value(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn photo(&self) -> Option<&ImageAttachment> {
        self.photo.as_ref()
    }

    fn validate_field(spec: &FieldSpec, raw: &str) -> Result<(), String> {
        let raw = raw.trim();
        if raw.is_empty() {
            if spec.required {
                return Err(format!("{} is required", spec.label));
            }
            return Ok(());
        }

        match spec.kind {
            FieldKind::Email => {
                if !raw.contains('@') {
                    return Err(format!("{} must be a valid email address", spec.label));
                }
            }
            FieldKind::Number => {
                if raw.parse::<f64>().is_err() {
                    return Err(format!("{} must be a number", spec.label));
                }
            }
            FieldKind::Text | FieldKind::List | FieldKind::Toggle => {}
        }
        Ok(())
    }

    /// Validates the current step's visible fields, in layout order.
    pub fn validate_step(&self) -> Vec<ValidationFailure> {
        self.current_step_spec()
            .fields
            .iter()
            .filter(|spec| !spec.hidden)
            .filter_map(|spec| {
                Self::validate_field(spec, self.value(spec.name))
                    .err()
                    .map(|message| ValidationFailure {
                        field: spec.name.to_string(),
                        message,
                    })
            })
            .collect()
    }

    /// Advances to the next step if every visible field of the current step
    /// passes its constraint check. Blocked advances report the first
    /// invalid field so it can receive focus.
    pub fn advance(&mut self) -> AdvanceOutcome {
        if let Some(first) = self.validate_step().into_iter().next() {
            return AdvanceOutcome::Blocked(first);
        }
        if self.step < self.steps.len() {
            self.step += 1;
        }
        AdvanceOutcome::Moved(self.step)
    }

    /// Retreating is unconditional; the counter never drops below 1.
    pub fn retreat(&mut self) {
        if self.step > 1 {
            self.step -= 1;
        }
    }

    /// Converts an uploaded file to a data URL, rejecting non-image MIME
    /// types and oversized payloads locally before any network call.
    pub fn attach_image(
        &mut self,
        filename: &str,
        mime: &str,
        bytes: &[u8],
    ) -> Result<(), ImageError> {
        if !mime.starts_with("image/") {
            return Err(ImageError::NotAnImage(filename.to_string()));
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(ImageError::TooLarge(bytes.len()));
        }
        let data_url = format!("data:{mime};base64,{}", STANDARD.encode(bytes));
        self.photo = Some(ImageAttachment {
            filename: filename.to_string(),
            mime: mime.to_string(),
            data_url,
        });
        Ok(())
    }

    /// Splits comma-separated input into trimmed, non-empty entries.
    pub fn split_list(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn toggle(&self, name: &str) -> bool {
        matches!(
            self.value(name).trim().to_ascii_lowercase().as_str(),
            "true" | "on" | "yes" | "1"
        )
    }

    fn number(&self, name: &str) -> Option<f64> {
        self.value(name).trim().parse().ok()
    }

    pub fn email(&self) -> String {
        self.value("email").trim().to_string()
    }

    pub fn name(&self) -> String {
        self.value("name").trim().to_string()
    }

    /// Gathers the draft into the onboarding request body, normalizing
    /// comma-separated lists to arrays.
    pub fn draft(&self, user_id: Uuid) -> OnboardRequest {
        let relocation_goal = {
            let raw = self.value("relocation_goal").trim().to_string();
            (!raw.is_empty()).then_some(raw)
        };
        OnboardRequest {
            user_id,
            major: self.value("major").trim().to_string(),
            university: self.value("university").trim().to_string(),
            gpa: self.number("gpa"),
            experience_level: self.value("experience_level").trim().to_string(),
            career_aspirations: self.value("career_aspirations").trim().to_string(),
            target_industries: Self::split_list(self.value("target_industries")),
            current_skills: Self::split_list(self.value("current_skills")),
            preferred_learning: self.value("preferred_learning").trim().to_string(),
            preferred_content_types: Self::split_list(self.value("preferred_content_types")),
            time_commitment: self.value("time_commitment").trim().to_string(),
            open_to_relocation: self.toggle("open_to_relocation"),
            relocation_goal,
            extracurricular_interests: Self::split_list(self.value("extracurricular_interests")),
            planning_horizon_years: self
                .number("planning_horizon_years")
                .map(|y| (y.max(1.0)) as u32)
                .unwrap_or(1),
            photo_data_url: self.photo.as_ref().map(|p| p.data_url.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_first_step(form: &mut OnboardingForm) {
        form.set_value("name", "Ada Lovelace");
        form.set_value("email", "ada@example.com");
        form.set_value("major", "Mathematics");
    }

    #[test]
    fn test_blocked_advance_keeps_step_and_names_first_invalid_field() {
        let mut form = OnboardingForm::standard();
        form.set_value("email", "ada@example.com");
        // "name" missing — it is the first invalid field in layout order
        let outcome = form.advance();
        match outcome {
            AdvanceOutcome::Blocked(failure) => {
                assert_eq!(failure.field, "name");
                assert!(failure.message.contains("required"));
            }
            other => panic!("expected blocked advance, got {other:?}"),
        }
        assert_eq!(form.step(), 1);
    }

    #[test]
    fn test_invalid_email_blocks_advance() {
        let mut form = OnboardingForm::standard();
        filled_first_step(&mut form);
        form.set_value("email", "not-an-email");
        let outcome = form.advance();
        assert!(matches!(
            outcome,
            AdvanceOutcome::Blocked(ValidationFailure { ref field, .. }) if field == "email"
        ));
    }

    #[test]
    fn test_optional_number_accepts_empty_but_rejects_garbage() {
        let mut form = OnboardingForm::standard();
        filled_first_step(&mut form);
        assert!(matches!(form.advance(), AdvanceOutcome::Moved(2)));

        form.retreat();
        form.set_value("gpa", "three point five");
        assert!(matches!(form.advance(), AdvanceOutcome::Blocked(_)));
        form.set_value("gpa", "3.5");
        assert!(matches!(form.advance(), AdvanceOutcome::Moved(2)));
    }

    #[test]
    fn test_hidden_fields_are_excluded_from_validation() {
        let mut form = OnboardingForm::new(vec![StepSpec {
            title: "only",
            fields: vec![
                FieldSpec::required("visible", "Visible", FieldKind::Text),
                FieldSpec {
                    name: "secret",
                    label: "Secret",
                    kind: FieldKind::Text,
                    required: true,
                    hidden: true,
                },
            ],
        }]);
        form.set_value("visible", "present");
        // The hidden required field is empty, yet the step validates
        assert!(form.validate_step().is_empty());
    }

    #[test]
    fn test_retreat_is_unconditional_and_clamped() {
        let mut form = OnboardingForm::standard();
        form.retreat();
        assert_eq!(form.step(), 1);
        filled_first_step(&mut form);
        form.advance();
        assert_eq!(form.step(), 2);
        form.retreat();
        assert_eq!(form.step(), 1);
    }

    #[test]
    fn test_submit_affordance_only_on_final_step() {
        let mut form = OnboardingForm::standard();
        assert!(!form.can_submit());
        filled_first_step(&mut form);
        form.advance();
        form.set_value("career_aspirations", "Backend engineer");
        form.advance();
        form.set_value("time_commitment", "10 hours/week");
        form.advance();
        assert!(form.is_final_step());
        assert!(form.can_submit());
    }

    #[test]
    fn test_draft_normalizes_comma_separated_lists() {
        let mut form = OnboardingForm::standard();
        form.set_value("current_skills", " Python , SQL ,,Rust ");
        form.set_value("planning_horizon_years", "2");
        form.set_value("open_to_relocation", "on");
        let draft = form.draft(Uuid::new_v4());
        assert_eq!(draft.current_skills, vec!["Python", "SQL", "Rust"]);
        assert_eq!(draft.planning_horizon_years, 2);
        assert!(draft.open_to_relocation);
        assert!(draft.relocation_goal.is_none());
    }

    #[test]
    fn test_attach_image_rejects_wrong_mime() {
        let mut form = OnboardingForm::standard();
        let err = form
            .attach_image("notes.pdf", "application/pdf", &[1, 2, 3])
            .unwrap_err();
        assert_eq!(err, ImageError::NotAnImage("notes.pdf".to_string()));
        assert!(form.photo().is_none());
    }

    #[test]
    fn test_attach_image_rejects_oversized_payload() {
        let mut form = OnboardingForm::standard();
        let oversized = vec![0u8; MAX_IMAGE_BYTES + 1];
        let err = form
            .attach_image("photo.png", "image/png", &oversized)
            .unwrap_err();
        assert!(matches!(err, ImageError::TooLarge(_)));
    }

    #[test]
    fn test_attach_image_produces_data_url() {
        let mut form = OnboardingForm::standard();
        form.attach_image("photo.png", "image/png", b"png-bytes")
            .unwrap();
        let photo = form.photo().unwrap();
        assert!(photo.data_url.starts_with("data:image/png;base64,"));
        let draft = form.draft(Uuid::new_v4());
        assert_eq!(draft.photo_data_url.as_deref(), Some(photo.data_url.as_str()));
    }
}
