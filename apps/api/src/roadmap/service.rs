//! Goal Mutation API: orchestration between handlers, the store, the parser
//! and the progress calculator. Every profile returned from here carries
//! freshly computed progress.

use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::{AppError, RoadmapError};
use crate::roadmap::advisor::{CareerBrief, RoadmapAdvisor};
use crate::roadmap::models::{
    NewRoadmapProfile, ProfileUpdate, Roadmap, RoadmapProfile, RoadmapSection,
};
use crate::roadmap::parser::parse_roadmap_text;
use crate::roadmap::progress::{calculate_progress, Progress};
use crate::roadmap::store::RoadmapStore;

/// Creates the user's profile. Without a supplied roadmap, one is generated
/// by the advisor and parsed from its text.
pub async fn create_roadmap(
    store: &dyn RoadmapStore,
    advisor: &dyn RoadmapAdvisor,
    user_id: Uuid,
    mut fields: NewRoadmapProfile,
) -> Result<RoadmapProfile, AppError> {
    if fields.target_role.trim().is_empty() {
        return Err(AppError::Validation("targetRole cannot be empty".to_string()));
    }

    if fields.roadmap.is_none() {
        // Skip the LLM round-trip when creation is going to fail anyway.
        match store.get_by_user(user_id).await {
            Ok(_) => return Err(RoadmapError::AlreadyExists(user_id).into()),
            Err(RoadmapError::NotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }
        let text = advisor.advise(&CareerBrief::from(&fields)).await?;
        fields.roadmap = Some(parse_generated(user_id, &text));
    }

    let profile = store.create(user_id, fields).await?;
    info!("Created roadmap for user {user_id}");
    Ok(with_progress(profile))
}

pub async fn get_roadmap(
    store: &dyn RoadmapStore,
    user_id: Uuid,
) -> Result<RoadmapProfile, AppError> {
    Ok(with_progress(store.get_by_user(user_id).await?))
}

pub async fn get_progress(store: &dyn RoadmapStore, user_id: Uuid) -> Result<Progress, AppError> {
    let profile = store.get_by_user(user_id).await?;
    Ok(calculate_progress(&profile.roadmap))
}

pub async fn update_roadmap(
    store: &dyn RoadmapStore,
    user_id: Uuid,
    update: ProfileUpdate,
) -> Result<RoadmapProfile, AppError> {
    if matches!(&update.target_role, Some(role) if role.trim().is_empty()) {
        return Err(AppError::Validation("targetRole cannot be empty".to_string()));
    }

    let profile = store.replace_fields(user_id, update).await?;
    info!("Updated roadmap fields for user {user_id}");
    Ok(with_progress(profile))
}

pub async fn set_goal_completion(
    store: &dyn RoadmapStore,
    user_id: Uuid,
    category: &str,
    index: &str,
    completed: bool,
) -> Result<RoadmapProfile, AppError> {
    let section: RoadmapSection = category.parse()?;
    if !section.tracks_completion() {
        return Err(RoadmapError::InvalidCategory(category.to_string()).into());
    }
    let index = parse_index(section, index)?;

    let profile = store
        .set_goal_completion(user_id, section, index, completed)
        .await?;
    info!("Set {section}[{index}] completed={completed} for user {user_id}");
    Ok(with_progress(profile))
}

fn parse_index(section: RoadmapSection, raw: &str) -> Result<usize, RoadmapError> {
    raw.parse().map_err(|_| RoadmapError::UnparsableIndex {
        category: section,
        raw: raw.to_string(),
    })
}

/// Replaces the whole roadmap with a freshly generated one.
pub async fn regenerate_roadmap(
    store: &dyn RoadmapStore,
    advisor: &dyn RoadmapAdvisor,
    user_id: Uuid,
) -> Result<RoadmapProfile, AppError> {
    let current = store.get_by_user(user_id).await?;
    let text = advisor.advise(&CareerBrief::from(&current)).await?;
    let roadmap = parse_generated(user_id, &text);

    let profile = store.replace_roadmap(user_id, roadmap).await?;
    info!("Regenerated roadmap for user {user_id}");
    Ok(with_progress(profile))
}

/// An empty parse is valid output, not a failure.
fn parse_generated(user_id: Uuid, text: &str) -> Roadmap {
    let roadmap = parse_roadmap_text(text);
    if roadmap.is_empty() {
        warn!("Advisor output for user {user_id} contained no recognisable roadmap sections");
    }
    roadmap
}

fn with_progress(mut profile: RoadmapProfile) -> RoadmapProfile {
    profile.refresh_progress();
    profile
}
