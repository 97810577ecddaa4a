//! Roadmap Store: one `RoadmapProfile` per user.
//!
//! `AppState` holds an `Arc<dyn RoadmapStore>`. `PgRoadmapStore` is the
//! production backend; `InMemoryRoadmapStore` backs local runs and tests.
//! Every operation is atomic per profile: a failed mutation leaves the stored
//! profile exactly as it was.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::RoadmapError;
use crate::roadmap::models::{
    storage_now, NewRoadmapProfile, ProfileUpdate, Roadmap, RoadmapProfile, RoadmapSection,
};

#[async_trait]
pub trait RoadmapStore: Send + Sync {
    /// Fails with `AlreadyExists` when the user already has a profile.
    async fn create(
        &self,
        user_id: Uuid,
        fields: NewRoadmapProfile,
    ) -> Result<RoadmapProfile, RoadmapError>;

    async fn get_by_user(&self, user_id: Uuid) -> Result<RoadmapProfile, RoadmapError>;

    async fn replace_fields(
        &self,
        user_id: Uuid,
        update: ProfileUpdate,
    ) -> Result<RoadmapProfile, RoadmapError>;

    async fn set_goal_completion(
        &self,
        user_id: Uuid,
        section: RoadmapSection,
        index: usize,
        completed: bool,
    ) -> Result<RoadmapProfile, RoadmapError>;

    async fn replace_roadmap(
        &self,
        user_id: Uuid,
        roadmap: Roadmap,
    ) -> Result<RoadmapProfile, RoadmapError>;
}

/// Process-local store keyed by user id.
#[derive(Default)]
pub struct InMemoryRoadmapStore {
    profiles: RwLock<HashMap<Uuid, RoadmapProfile>>,
}

impl InMemoryRoadmapStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `apply` to a copy and only writes it back on success.
    async fn mutate<F>(&self, user_id: Uuid, apply: F) -> Result<RoadmapProfile, RoadmapError>
    where
        F: FnOnce(&mut RoadmapProfile) -> Result<(), RoadmapError> + Send,
    {
        let mut profiles = self.profiles.write().await;
        let stored = profiles
            .get_mut(&user_id)
            .ok_or(RoadmapError::NotFound(user_id))?;
        let mut draft = stored.clone();
        apply(&mut draft)?;
        *stored = draft.clone();
        Ok(draft)
    }
}

#[async_trait]
impl RoadmapStore for InMemoryRoadmapStore {
    async fn create(
        &self,
        user_id: Uuid,
        fields: NewRoadmapProfile,
    ) -> Result<RoadmapProfile, RoadmapError> {
        let mut profiles = self.profiles.write().await;
        if profiles.contains_key(&user_id) {
            return Err(RoadmapError::AlreadyExists(user_id));
        }
        let profile = RoadmapProfile::new(user_id, fields, storage_now());
        profiles.insert(user_id, profile.clone());
        Ok(profile)
    }

    async fn get_by_user(&self, user_id: Uuid) -> Result<RoadmapProfile, RoadmapError> {
        self.profiles
            .read()
            .await
            .get(&user_id)
            .cloned()
            .ok_or(RoadmapError::NotFound(user_id))
    }

    async fn replace_fields(
        &self,
        user_id: Uuid,
        update: ProfileUpdate,
    ) -> Result<RoadmapProfile, RoadmapError> {
        self.mutate(user_id, |profile| {
            profile.apply_update(update, storage_now());
            Ok(())
        })
        .await
    }

    async fn set_goal_completion(
        &self,
        user_id: Uuid,
        section: RoadmapSection,
        index: usize,
        completed: bool,
    ) -> Result<RoadmapProfile, RoadmapError> {
        self.mutate(user_id, |profile| {
            let now = storage_now();
            profile
                .roadmap
                .set_completion(section, index, completed, now)?;
            profile.last_updated = now;
            Ok(())
        })
        .await
    }

    async fn replace_roadmap(
        &self,
        user_id: Uuid,
        roadmap: Roadmap,
    ) -> Result<RoadmapProfile, RoadmapError> {
        self.mutate(user_id, |profile| {
            profile.replace_roadmap(roadmap, storage_now());
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roadmap::models::{Course, TermGoal};

    fn fields_with_goals() -> NewRoadmapProfile {
        NewRoadmapProfile {
            target_role: "Security Engineer".into(),
            current_skills: vec!["Linux".into()],
            roadmap: Some(Roadmap {
                short_term_goals: vec![TermGoal::new("Pass Security+", "3-6 months")],
                courses: vec![Course::new("Network Security Fundamentals")],
                ..Roadmap::default()
            }),
            ..NewRoadmapProfile::default()
        }
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let store = InMemoryRoadmapStore::new();
        let user = Uuid::new_v4();
        let created = store.create(user, fields_with_goals()).await.unwrap();
        let fetched = store.get_by_user(user).await.unwrap();
        assert_eq!(created, fetched);
        assert_eq!(fetched.user_id, user);
        assert_eq!(fetched.roadmap.short_term_goals.len(), 1);
    }

    #[tokio::test]
    async fn test_second_create_fails_and_keeps_original() {
        let store = InMemoryRoadmapStore::new();
        let user = Uuid::new_v4();
        let original = store.create(user, fields_with_goals()).await.unwrap();

        let duplicate = NewRoadmapProfile {
            target_role: "Chef".into(),
            ..NewRoadmapProfile::default()
        };
        let err = store.create(user, duplicate).await.unwrap_err();
        assert!(matches!(err, RoadmapError::AlreadyExists(id) if id == user));
        assert_eq!(store.get_by_user(user).await.unwrap(), original);
    }

    #[tokio::test]
    async fn test_missing_profile_is_not_found() {
        let store = InMemoryRoadmapStore::new();
        let user = Uuid::new_v4();
        assert!(matches!(
            store.get_by_user(user).await,
            Err(RoadmapError::NotFound(_))
        ));
        assert!(matches!(
            store
                .set_goal_completion(user, RoadmapSection::Courses, 0, true)
                .await,
            Err(RoadmapError::NotFound(_))
        ));
        assert!(matches!(
            store.replace_roadmap(user, Roadmap::default()).await,
            Err(RoadmapError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_toggle_does_not_touch_stored_profile() {
        let store = InMemoryRoadmapStore::new();
        let user = Uuid::new_v4();
        let original = store.create(user, fields_with_goals()).await.unwrap();

        let err = store
            .set_goal_completion(user, RoadmapSection::Courses, 3, true)
            .await
            .unwrap_err();
        assert!(matches!(err, RoadmapError::InvalidIndex { len: 1, .. }));
        assert_eq!(store.get_by_user(user).await.unwrap(), original);
    }

    #[tokio::test]
    async fn test_toggle_updates_entry_and_timestamp() {
        let store = InMemoryRoadmapStore::new();
        let user = Uuid::new_v4();
        let original = store.create(user, fields_with_goals()).await.unwrap();

        let updated = store
            .set_goal_completion(user, RoadmapSection::ShortTermGoals, 0, true)
            .await
            .unwrap();
        let goal = &updated.roadmap.short_term_goals[0];
        assert!(goal.completion.completed);
        assert!(goal.completion.completed_date.is_some());
        assert!(updated.last_updated >= original.last_updated);
        assert!(!updated.roadmap.courses[0].completion.completed);
    }

    #[tokio::test]
    async fn test_mutation_timestamps_are_whole_microseconds() {
        let store = InMemoryRoadmapStore::new();
        let user = Uuid::new_v4();
        store.create(user, fields_with_goals()).await.unwrap();

        let first = store
            .set_goal_completion(user, RoadmapSection::ShortTermGoals, 0, true)
            .await
            .unwrap();
        let completed_date = first.roadmap.short_term_goals[0]
            .completion
            .completed_date
            .unwrap();
        assert_eq!(completed_date.timestamp_subsec_nanos() % 1_000, 0);
        assert_eq!(first.last_updated.timestamp_subsec_nanos() % 1_000, 0);

        let again = store
            .set_goal_completion(user, RoadmapSection::ShortTermGoals, 0, true)
            .await
            .unwrap();
        assert_eq!(
            again.roadmap.short_term_goals[0].completion.completed_date,
            Some(completed_date)
        );
        assert_eq!(store.get_by_user(user).await.unwrap(), again);
    }

    #[tokio::test]
    async fn test_replace_roadmap_swaps_whole_bundle() {
        let store = InMemoryRoadmapStore::new();
        let user = Uuid::new_v4();
        store.create(user, fields_with_goals()).await.unwrap();

        let replacement = Roadmap {
            long_term_goals: vec![TermGoal::new("Become a CISO", "1-3 years")],
            ..Roadmap::default()
        };
        let updated = store.replace_roadmap(user, replacement).await.unwrap();
        assert!(updated.roadmap.short_term_goals.is_empty());
        assert!(updated.roadmap.courses.is_empty());
        assert_eq!(updated.roadmap.long_term_goals[0].goal, "Become a CISO");
        assert_eq!(updated.current_skills, vec!["Linux".to_string()]);
    }
}
