use std::sync::Arc;

use crate::roadmap::advisor::RoadmapAdvisor;
use crate::roadmap::store::RoadmapStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Postgres in production, in-memory when `ROADMAP_STORE=memory`.
    pub store: Arc<dyn RoadmapStore>,
    pub advisor: Arc<dyn RoadmapAdvisor>,
}
