use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::RoadmapError;
use crate::roadmap::progress::{calculate_progress, Progress};

/// Current time at the microsecond precision Postgres `TIMESTAMPTZ` keeps, so
/// a timestamp returned from a mutation reads back unchanged.
pub fn storage_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    #[default]
    Entry,
    Mid,
    Senior,
    Expert,
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "entry",
            ExperienceLevel::Mid => "mid",
            ExperienceLevel::Senior => "senior",
            ExperienceLevel::Expert => "expert",
        }
    }
}

impl FromStr for ExperienceLevel {
    type Err = RoadmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entry" => Ok(ExperienceLevel::Entry),
            "mid" => Ok(ExperienceLevel::Mid),
            "senior" => Ok(ExperienceLevel::Senior),
            "expert" => Ok(ExperienceLevel::Expert),
            other => Err(RoadmapError::Malformed(format!(
                "unknown experience level '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpportunityType {
    #[default]
    Event,
    Platform,
    Organization,
}

/// The seven named collections of a roadmap, addressed by their wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoadmapSection {
    ShortTermGoals,
    MediumTermGoals,
    LongTermGoals,
    Courses,
    SkillsToDevelop,
    NetworkingOpportunities,
    TargetJobTitles,
}

impl RoadmapSection {
    pub const ALL: [RoadmapSection; 7] = [
        RoadmapSection::ShortTermGoals,
        RoadmapSection::MediumTermGoals,
        RoadmapSection::LongTermGoals,
        RoadmapSection::Courses,
        RoadmapSection::SkillsToDevelop,
        RoadmapSection::NetworkingOpportunities,
        RoadmapSection::TargetJobTitles,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoadmapSection::ShortTermGoals => "shortTermGoals",
            RoadmapSection::MediumTermGoals => "mediumTermGoals",
            RoadmapSection::LongTermGoals => "longTermGoals",
            RoadmapSection::Courses => "courses",
            RoadmapSection::SkillsToDevelop => "skillsToDevelop",
            RoadmapSection::NetworkingOpportunities => "networkingOpportunities",
            RoadmapSection::TargetJobTitles => "targetJobTitles",
        }
    }

    /// Target job titles carry no completion flag; every other section does.
    pub fn tracks_completion(&self) -> bool {
        !matches!(self, RoadmapSection::TargetJobTitles)
    }
}

impl fmt::Display for RoadmapSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoadmapSection {
    type Err = RoadmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoadmapSection::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| RoadmapError::InvalidCategory(s.to_string()))
    }
}

/// Completion flag shared by every trackable entry.
/// `completed_date` is `Some` exactly when `completed` is true.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Completion {
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_date: Option<DateTime<Utc>>,
}

impl Completion {
    /// Applies a completion toggle. Re-marking a completed entry keeps its
    /// original `completed_date`. Returns whether the state changed.
    pub fn set(&mut self, completed: bool, now: DateTime<Utc>) -> bool {
        match (self.completed, completed) {
            (false, true) => {
                self.completed = true;
                self.completed_date = Some(now);
                true
            }
            (true, false) => {
                self.completed = false;
                self.completed_date = None;
                true
            }
            _ => false,
        }
    }

    /// Repairs client-supplied state so the date/flag pairing holds.
    pub fn normalize(&mut self, now: DateTime<Utc>) {
        if !self.completed {
            self.completed_date = None;
        } else if self.completed_date.is_none() {
            self.completed_date = Some(now);
        }
    }
}

/// Implemented by every roadmap entry that carries a completion flag.
pub trait Trackable {
    fn completion(&self) -> &Completion;
    fn completion_mut(&mut self) -> &mut Completion;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermGoal {
    pub goal: String,
    #[serde(default)]
    pub timeline: String,
    #[serde(flatten)]
    pub completion: Completion,
}

impl TermGoal {
    pub fn new(goal: impl Into<String>, timeline: impl Into<String>) -> Self {
        Self {
            goal: goal.into(),
            timeline: timeline.into(),
            completion: Completion::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub name: String,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(flatten)]
    pub completion: Completion,
}

impl Course {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            provider: None,
            url: None,
            completion: Completion::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillGoal {
    pub skill: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(flatten)]
    pub completion: Completion,
}

impl SkillGoal {
    pub fn new(skill: impl Into<String>, priority: Priority) -> Self {
        Self {
            skill: skill.into(),
            priority,
            completion: Completion::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkingOpportunity {
    pub opportunity: String,
    #[serde(rename = "type", default)]
    pub kind: OpportunityType,
    #[serde(flatten)]
    pub completion: Completion,
}

impl NetworkingOpportunity {
    pub fn new(opportunity: impl Into<String>, kind: OpportunityType) -> Self {
        Self {
            opportunity: opportunity.into(),
            kind,
            completion: Completion::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetJobTitle {
    pub title: String,
    #[serde(default)]
    pub priority: Priority,
}

impl Trackable for TermGoal {
    fn completion(&self) -> &Completion {
        &self.completion
    }
    fn completion_mut(&mut self) -> &mut Completion {
        &mut self.completion
    }
}

impl Trackable for Course {
    fn completion(&self) -> &Completion {
        &self.completion
    }
    fn completion_mut(&mut self) -> &mut Completion {
        &mut self.completion
    }
}

impl Trackable for SkillGoal {
    fn completion(&self) -> &Completion {
        &self.completion
    }
    fn completion_mut(&mut self) -> &mut Completion {
        &mut self.completion
    }
}

impl Trackable for NetworkingOpportunity {
    fn completion(&self) -> &Completion {
        &self.completion
    }
    fn completion_mut(&mut self) -> &mut Completion {
        &mut self.completion
    }
}

/// The categorized goal bundle. Vector order is display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roadmap {
    #[serde(default)]
    pub short_term_goals: Vec<TermGoal>,
    #[serde(default)]
    pub medium_term_goals: Vec<TermGoal>,
    #[serde(default)]
    pub long_term_goals: Vec<TermGoal>,
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub skills_to_develop: Vec<SkillGoal>,
    #[serde(default)]
    pub networking_opportunities: Vec<NetworkingOpportunity>,
    #[serde(default)]
    pub target_job_titles: Vec<TargetJobTitle>,
}

impl Roadmap {
    pub fn is_empty(&self) -> bool {
        self.short_term_goals.is_empty()
            && self.medium_term_goals.is_empty()
            && self.long_term_goals.is_empty()
            && self.courses.is_empty()
            && self.skills_to_develop.is_empty()
            && self.networking_opportunities.is_empty()
            && self.target_job_titles.is_empty()
    }

    /// Toggles one entry's completion. On error nothing is modified.
    pub fn set_completion(
        &mut self,
        section: RoadmapSection,
        index: usize,
        completed: bool,
        now: DateTime<Utc>,
    ) -> Result<bool, RoadmapError> {
        match section {
            RoadmapSection::ShortTermGoals => {
                set_entry_completion(&mut self.short_term_goals, section, index, completed, now)
            }
            RoadmapSection::MediumTermGoals => {
                set_entry_completion(&mut self.medium_term_goals, section, index, completed, now)
            }
            RoadmapSection::LongTermGoals => {
                set_entry_completion(&mut self.long_term_goals, section, index, completed, now)
            }
            RoadmapSection::Courses => {
                set_entry_completion(&mut self.courses, section, index, completed, now)
            }
            RoadmapSection::SkillsToDevelop => {
                set_entry_completion(&mut self.skills_to_develop, section, index, completed, now)
            }
            RoadmapSection::NetworkingOpportunities => set_entry_completion(
                &mut self.networking_opportunities,
                section,
                index,
                completed,
                now,
            ),
            RoadmapSection::TargetJobTitles => {
                Err(RoadmapError::InvalidCategory(section.as_str().to_string()))
            }
        }
    }

    pub fn normalize_completion(&mut self, now: DateTime<Utc>) {
        normalize_all(&mut self.short_term_goals, now);
        normalize_all(&mut self.medium_term_goals, now);
        normalize_all(&mut self.long_term_goals, now);
        normalize_all(&mut self.courses, now);
        normalize_all(&mut self.skills_to_develop, now);
        normalize_all(&mut self.networking_opportunities, now);
    }

    /// Wholesale-replaces every collection present in the patch.
    pub fn apply_patch(&mut self, patch: RoadmapPatch) {
        if let Some(goals) = patch.short_term_goals {
            self.short_term_goals = goals;
        }
        if let Some(goals) = patch.medium_term_goals {
            self.medium_term_goals = goals;
        }
        if let Some(goals) = patch.long_term_goals {
            self.long_term_goals = goals;
        }
        if let Some(courses) = patch.courses {
            self.courses = courses;
        }
        if let Some(skills) = patch.skills_to_develop {
            self.skills_to_develop = skills;
        }
        if let Some(opportunities) = patch.networking_opportunities {
            self.networking_opportunities = opportunities;
        }
        if let Some(titles) = patch.target_job_titles {
            self.target_job_titles = titles;
        }
    }
}

fn set_entry_completion<T: Trackable>(
    entries: &mut [T],
    section: RoadmapSection,
    index: usize,
    completed: bool,
    now: DateTime<Utc>,
) -> Result<bool, RoadmapError> {
    let len = entries.len();
    let entry = entries.get_mut(index).ok_or(RoadmapError::InvalidIndex {
        category: section,
        index,
        len,
    })?;
    Ok(entry.completion_mut().set(completed, now))
}

fn normalize_all<T: Trackable>(entries: &mut [T], now: DateTime<Utc>) {
    for entry in entries {
        entry.completion_mut().normalize(now);
    }
}

/// Per-collection replacement. Absent collections are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapPatch {
    pub short_term_goals: Option<Vec<TermGoal>>,
    pub medium_term_goals: Option<Vec<TermGoal>>,
    pub long_term_goals: Option<Vec<TermGoal>>,
    pub courses: Option<Vec<Course>>,
    pub skills_to_develop: Option<Vec<SkillGoal>>,
    pub networking_opportunities: Option<Vec<NetworkingOpportunity>>,
    pub target_job_titles: Option<Vec<TargetJobTitle>>,
}

/// A user's career profile together with their roadmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapProfile {
    pub user_id: Uuid,
    pub current_education: String,
    pub target_role: String,
    pub experience_level: ExperienceLevel,
    pub current_skills: Vec<String>,
    pub interests: Vec<String>,
    pub roadmap: Roadmap,
    /// Derived. Recomputed with `refresh_progress` before a profile leaves the service.
    pub progress: Progress,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl RoadmapProfile {
    pub fn new(user_id: Uuid, fields: NewRoadmapProfile, now: DateTime<Utc>) -> Self {
        let mut roadmap = fields.roadmap.unwrap_or_default();
        roadmap.normalize_completion(now);
        let mut profile = Self {
            user_id,
            current_education: fields.current_education,
            target_role: fields.target_role,
            experience_level: fields.experience_level,
            current_skills: fields.current_skills,
            interests: fields.interests,
            roadmap,
            progress: Progress::default(),
            created_at: now,
            last_updated: now,
        };
        profile.refresh_progress();
        profile
    }

    /// Applies only the fields present in `update`.
    pub fn apply_update(&mut self, update: ProfileUpdate, now: DateTime<Utc>) {
        if let Some(education) = update.current_education {
            self.current_education = education;
        }
        if let Some(skills) = update.current_skills {
            self.current_skills = skills;
        }
        if let Some(interests) = update.interests {
            self.interests = interests;
        }
        if let Some(role) = update.target_role {
            self.target_role = role;
        }
        if let Some(level) = update.experience_level {
            self.experience_level = level;
        }
        if let Some(patch) = update.roadmap {
            self.roadmap.apply_patch(patch);
        }
        self.roadmap.normalize_completion(now);
        self.last_updated = now;
    }

    pub fn replace_roadmap(&mut self, mut roadmap: Roadmap, now: DateTime<Utc>) {
        roadmap.normalize_completion(now);
        self.roadmap = roadmap;
        self.last_updated = now;
    }

    pub fn refresh_progress(&mut self) {
        self.progress = calculate_progress(&self.roadmap);
    }
}

/// Request body for creating a profile. When `roadmap` is absent one is generated.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRoadmapProfile {
    #[serde(default)]
    pub current_education: String,
    pub target_role: String,
    #[serde(default)]
    pub experience_level: ExperienceLevel,
    #[serde(default)]
    pub current_skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub roadmap: Option<Roadmap>,
}

/// Partial update of a profile. Missing or null fields are left as they are.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub current_education: Option<String>,
    pub current_skills: Option<Vec<String>>,
    pub interests: Option<Vec<String>>,
    pub target_role: Option<String>,
    pub experience_level: Option<ExperienceLevel>,
    pub roadmap: Option<RoadmapPatch>,
}
