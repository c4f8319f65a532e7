//! View controller for the SkillPath single-page surface.
//!
//! The crate is rendering-surface-agnostic: a host shell feeds [`Command`]s
//! into a [`ViewController`], reads back the [`Session`] snapshot and the
//! notification queue, and renders markup strings from [`render`]. All
//! network traffic goes through [`ApiClient`]; all state lives in the
//! controller.

pub mod api;
pub mod controller;
pub mod form;
pub mod notify;
pub mod render;
pub mod state;

pub use api::{ApiClient, ApiError};
pub use controller::{Command, ContactDetails, SagaStep, ViewController};
pub use form::OnboardingForm;
pub use notify::{Notification, NotificationKind, Notifier};
pub use state::{Page, ProfileTab, Session, TaskFilter};
