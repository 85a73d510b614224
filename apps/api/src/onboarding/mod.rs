// Onboarding flow and the session-level screens built on top of it.

pub mod flow;
pub mod handlers;
