use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::RoadmapError;
use crate::roadmap::models::{Roadmap, RoadmapProfile};
use crate::roadmap::progress::Progress;

#[derive(Debug, Clone, FromRow)]
pub struct RoadmapProfileRow {
    pub user_id: Uuid,
    pub current_education: String,
    pub target_role: String,
    pub experience_level: String,
    pub current_skills: Vec<String>,
    pub interests: Vec<String>,
    pub roadmap: Json<Roadmap>,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl TryFrom<RoadmapProfileRow> for RoadmapProfile {
    type Error = RoadmapError;

    fn try_from(row: RoadmapProfileRow) -> Result<Self, Self::Error> {
        Ok(RoadmapProfile {
            user_id: row.user_id,
            current_education: row.current_education,
            target_role: row.target_role,
            experience_level: row.experience_level.parse()?,
            current_skills: row.current_skills,
            interests: row.interests,
            roadmap: row.roadmap.0,
            // Not stored; filled in by the service before the profile is returned.
            progress: Progress::default(),
            created_at: row.created_at,
            last_updated: row.last_updated,
        })
    }
}
