//! User registration and the onboarding flow: account creation, student
//! profile capture, and the initial AI profile analysis.

pub mod handlers;
