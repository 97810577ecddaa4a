use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;
use uuid::Uuid;

use crate::errors::RoadmapError;
use crate::models::roadmap::RoadmapProfileRow;
use crate::roadmap::models::{
    storage_now, NewRoadmapProfile, ProfileUpdate, Roadmap, RoadmapProfile, RoadmapSection,
};
use crate::roadmap::store::RoadmapStore;

/// PostgreSQL-backed store. The `user_id` primary key enforces one profile
/// per user; read-modify-write runs under `SELECT ... FOR UPDATE`.
#[derive(Clone)]
pub struct PgRoadmapStore {
    pool: PgPool,
}

impl PgRoadmapStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn mutate<F>(&self, user_id: Uuid, apply: F) -> Result<RoadmapProfile, RoadmapError>
    where
        F: FnOnce(&mut RoadmapProfile) -> Result<(), RoadmapError> + Send,
    {
        let mut tx = self.pool.begin().await?;

        let row: Option<RoadmapProfileRow> =
            sqlx::query_as("SELECT * FROM roadmap_profiles WHERE user_id = $1 FOR UPDATE")
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;
        let mut profile =
            RoadmapProfile::try_from(row.ok_or(RoadmapError::NotFound(user_id))?)?;

        // Dropping `tx` on error rolls the transaction back.
        apply(&mut profile)?;

        write_profile(&mut tx, &profile).await?;
        tx.commit().await?;

        debug!("Committed roadmap update for user {user_id}");
        Ok(profile)
    }
}

async fn write_profile(
    tx: &mut Transaction<'_, Postgres>,
    profile: &RoadmapProfile,
) -> Result<(), RoadmapError> {
    sqlx::query(
        r#"
        UPDATE roadmap_profiles
        SET current_education = $2,
            target_role = $3,
            experience_level = $4,
            current_skills = $5,
            interests = $6,
            roadmap = $7,
            last_updated = $8
        WHERE user_id = $1
        "#,
    )
    .bind(profile.user_id)
    .bind(&profile.current_education)
    .bind(&profile.target_role)
    .bind(profile.experience_level.as_str())
    .bind(profile.current_skills.as_slice())
    .bind(profile.interests.as_slice())
    .bind(Json(&profile.roadmap))
    .bind(profile.last_updated)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

#[async_trait]
impl RoadmapStore for PgRoadmapStore {
    async fn create(
        &self,
        user_id: Uuid,
        fields: NewRoadmapProfile,
    ) -> Result<RoadmapProfile, RoadmapError> {
        let profile = RoadmapProfile::new(user_id, fields, storage_now());

        let inserted: Option<RoadmapProfileRow> = sqlx::query_as(
            r#"
            INSERT INTO roadmap_profiles
                (user_id, current_education, target_role, experience_level,
                 current_skills, interests, roadmap, created_at, last_updated)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            ON CONFLICT (user_id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&profile.current_education)
        .bind(&profile.target_role)
        .bind(profile.experience_level.as_str())
        .bind(profile.current_skills.as_slice())
        .bind(profile.interests.as_slice())
        .bind(Json(&profile.roadmap))
        .bind(profile.created_at)
        .fetch_optional(&self.pool)
        .await?;

        match inserted {
            Some(row) => RoadmapProfile::try_from(row),
            None => Err(RoadmapError::AlreadyExists(user_id)),
        }
    }

    async fn get_by_user(&self, user_id: Uuid) -> Result<RoadmapProfile, RoadmapError> {
        let row: Option<RoadmapProfileRow> =
            sqlx::query_as("SELECT * FROM roadmap_profiles WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        RoadmapProfile::try_from(row.ok_or(RoadmapError::NotFound(user_id))?)
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
