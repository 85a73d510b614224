use std::sync::Arc;

use crate::avatar::provider::AvatarGenerator;
use crate::feed::catalog::Catalog;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Model backend for avatar generation. Default: `ReplicateClient`.
    pub avatar_generator: Arc<dyn AvatarGenerator>,
    /// Seeded opportunities, shared read-only by every session.
    pub catalog: Catalog,
    pub sessions: SessionStore,
}

#[cfg(test)]
impl AppState {
    pub fn for_tests(avatar_generator: Arc<dyn AvatarGenerator>) -> Self {
        AppState {
            avatar_generator,
            catalog: Catalog::seeded().expect("seed catalog"),
            sessions: SessionStore::default(),
        }
    }
}
