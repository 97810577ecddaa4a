//! Progress Calculator: derives completion percentages from a roadmap.
//!
//! Pure and idempotent. Progress is never persisted; callers recompute it
//! every time a profile is read or mutated.

use serde::{Deserialize, Serialize};

use crate::roadmap::models::{Roadmap, Trackable};

/// Percent-complete figures in the range 0.0 – 100.0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub short_term_progress: f64,
    pub medium_term_progress: f64,
    pub long_term_progress: f64,
    pub courses_progress: f64,
    pub skills_progress: f64,
    pub networking_progress: f64,
    /// Short-, medium- and long-term goals only. Courses, skills and
    /// networking do not contribute.
    pub overall_progress: f64,
}

pub fn calculate_progress(roadmap: &Roadmap) -> Progress {
    let terms = [
        &roadmap.short_term_goals,
        &roadmap.medium_term_goals,
        &roadmap.long_term_goals,
    ];
    let term_completed: usize = terms
        .iter()
        .map(|goals| completed_count(goals.as_slice()))
        .sum();
    let term_total: usize = terms.iter().map(|goals| goals.len()).sum();

    Progress {
        short_term_progress: section_percent(&roadmap.short_term_goals),
        medium_term_progress: section_percent(&roadmap.medium_term_goals),
        long_term_progress: section_percent(&roadmap.long_term_goals),
        courses_progress: section_percent(&roadmap.courses),
        skills_progress: section_percent(&roadmap.skills_to_develop),
        networking_progress: section_percent(&roadmap.networking_opportunities),
        overall_progress: percent(term_completed, term_total),
    }
}

fn completed_count<T: Trackable>(entries: &[T]) -> usize {
    entries
        .iter()
        .filter(|entry| entry.completion().completed)
        .count()
}

fn section_percent<T: Trackable>(entries: &[T]) -> f64 {
    percent(completed_count(entries), entries.len())
}

/// Empty sections report 0 rather than NaN.
fn percent(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    100.0 * completed as f64 / total as f64
}
