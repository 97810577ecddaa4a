//! Roadmap text parser: turns free-form advisor output into a structured `Roadmap`.
//!
//! Best-effort line classification:
//! 1. A line containing a section keyword (case-insensitive substring) switches
//!    the current section and produces no entry. A bulleted or numbered line
//!    only counts as a heading when it is heading-shaped: text ending in `:`,
//!    wrapped in `**`, or starting with `#`.
//! 2. A line starting with `-`, `•` or `<digits>.` becomes an entry in the
//!    current section, if one is set.
//! 3. Everything else is prose and is skipped.

use crate::roadmap::models::{
    Course, NetworkingOpportunity, OpportunityType, Priority, Roadmap, RoadmapSection, SkillGoal,
    TargetJobTitle, TermGoal,
};

/// Checked in order; the first keyword found decides the section.
const SECTION_KEYWORDS: &[(&str, RoadmapSection)] = &[
    ("short-term", RoadmapSection::ShortTermGoals),
    ("medium-term", RoadmapSection::MediumTermGoals),
    ("long-term", RoadmapSection::LongTermGoals),
    ("course", RoadmapSection::Courses),
    ("certification", RoadmapSection::Courses),
    ("skill", RoadmapSection::SkillsToDevelop),
    ("network", RoadmapSection::NetworkingOpportunities),
    ("job title", RoadmapSection::TargetJobTitles),
];

const SHORT_TERM_TIMELINE: &str = "3-6 months";
const MEDIUM_TERM_TIMELINE: &str = "6-12 months";
const LONG_TERM_TIMELINE: &str = "1-3 years";

const PLATFORM_HINTS: &[&str] = &[
    "linkedin",
    "github",
    "platform",
    "online community",
    "forum",
    "discord",
    "slack",
];
const ORGANIZATION_HINTS: &[&str] = &["association", "organization", "society", "club", "chapter"];

pub fn parse_roadmap_text(text: &str) -> Roadmap {
    let mut roadmap = Roadmap::default();
    let mut current: Option<RoadmapSection> = None;

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        let item = strip_list_marker(line);

        if let Some(section) = detect_section(line) {
            let is_heading = match item {
                None => true,
                Some(item) => is_heading_shaped(item),
            };
            if is_heading {
                current = Some(section);
                continue;
            }
        }

        let (Some(item), Some(section)) = (item, current) else {
            continue;
        };
        if item.chars().any(char::is_alphanumeric) {
            push_entry(&mut roadmap, section, item);
        }
    }

    roadmap
}

fn detect_section(line: &str) -> Option<RoadmapSection> {
    let lower = line.to_lowercase();
    SECTION_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, section)| *section)
}

/// Returns the entry text of a bulleted or numbered line, or `None` for prose.
fn strip_list_marker(line: &str) -> Option<&str> {
    if let Some(rest) = line.strip_prefix('-').or_else(|| line.strip_prefix('•')) {
        return Some(rest.trim());
    }
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    line[digits..].strip_prefix('.').map(str::trim)
}

fn is_heading_shaped(item: &str) -> bool {
    let unbolded = item.trim_end_matches('*').trim_end();
    unbolded.ends_with(':')
        || (item.len() > 4 && item.starts_with("**") && item.ends_with("**"))
        || item.starts_with('#')
}

fn push_entry(roadmap: &mut Roadmap, section: RoadmapSection, text: &str) {
    match section {
        RoadmapSection::ShortTermGoals => roadmap
            .short_term_goals
            .push(TermGoal::new(text, SHORT_TERM_TIMELINE)),
        RoadmapSection::MediumTermGoals => roadmap
            .medium_term_goals
            .push(TermGoal::new(text, MEDIUM_TERM_TIMELINE)),
        RoadmapSection::LongTermGoals => roadmap
            .long_term_goals
            .push(TermGoal::new(text, LONG_TERM_TIMELINE)),
        RoadmapSection::Courses => roadmap.courses.push(Course::new(text)),
        RoadmapSection::SkillsToDevelop => roadmap
            .skills_to_develop
            .push(SkillGoal::new(text, Priority::Medium)),
        RoadmapSection::NetworkingOpportunities => roadmap
            .networking_opportunities
            .push(NetworkingOpportunity::new(text, infer_opportunity_type(text))),
        RoadmapSection::TargetJobTitles => roadmap.target_job_titles.push(TargetJobTitle {
            title: text.to_string(),
            priority: Priority::Medium,
        }),
    }
}

fn infer_opportunity_type(text: &str) -> OpportunityType {
    let lower = text.to_lowercase();
    if PLATFORM_HINTS.iter().any(|hint| lower.contains(hint)) {
        OpportunityType::Platform
    } else if ORGANIZATION_HINTS.iter().any(|hint| lower.contains(hint)) {
        OpportunityType::Organization
    } else {
        OpportunityType::Event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADVISOR_OUTPUT: &str = r#"
Here is a personalised roadmap for becoming a Backend Engineer.

**Short-term Goals (3-6 months):**
- Finish the Rust book
- Contribute a fix to an open-source crate

**Medium-term Goals (6-12 months):**
1. Lead a small service migration
2. Mentor a junior developer

**Long-term Goals (1-3 years):**
- Become a staff engineer

**Courses & Certifications:**
- AWS Solutions Architect Associate
- MIT 6.824 Distributed Systems

**Skills to Develop:**
- Observability and tracing
- System design

**Networking Opportunities:**
- Join the local Rust meetup
- Build a presence on LinkedIn
- Become a member of the ACM association

**Target Job Titles:**
- Senior Backend Engineer
- Platform Engineer

Good luck on your journey!
"#;

    fn goal_texts(goals: &[TermGoal]) -> Vec<&str> {
        goals.iter().map(|g| g.goal.as_str()).collect()
    }

    #[test]
    fn test_headings_and_bullets_fill_sections() {
        let text = "Short-term Goals:\n- Learn Python\n- Build a project\nMedium-term Goals:\n1. Get certified\n";
        let roadmap = parse_roadmap_text(text);

        assert_eq!(
            goal_texts(&roadmap.short_term_goals),
            vec!["Learn Python", "Build a project"]
        );
        assert_eq!(goal_texts(&roadmap.medium_term_goals), vec!["Get certified"]);
        assert!(roadmap.long_term_goals.is_empty());
        assert!(roadmap.courses.is_empty());
        assert!(roadmap.skills_to_develop.is_empty());
        assert!(roadmap.networking_opportunities.is_empty());
        assert!(roadmap.target_job_titles.is_empty());

        for goal in roadmap.short_term_goals.iter().chain(&roadmap.medium_term_goals) {
            assert!(!goal.completion.completed);
            assert!(goal.completion.completed_date.is_none());
        }
    }

    #[test]
    fn test_bullet_before_any_heading_is_dropped() {
        let roadmap = parse_roadmap_text("- Orphan bullet\nLong-term goals\n- Run a team\n");
        assert_eq!(goal_texts(&roadmap.long_term_goals), vec!["Run a team"]);
        assert!(roadmap.short_term_goals.is_empty());
    }

    #[test]
    fn test_current_section_decides_filing_not_bullet_keywords() {
        let text = "Skills to Develop:\n- Networking events for skill development\n";
        let roadmap = parse_roadmap_text(text);
        assert_eq!(roadmap.skills_to_develop.len(), 1);
        assert_eq!(
            roadmap.skills_to_develop[0].skill,
            "Networking events for skill development"
        );
        assert!(roadmap.networking_opportunities.is_empty());
    }

    #[test]
    fn test_heading_rendered_as_bullet_switches_section() {
        let text = "- **Short-term goals**\n- Learn SQL\n- Courses:\n- Databases 101\n";
        let roadmap = parse_roadmap_text(text);
        assert_eq!(goal_texts(&roadmap.short_term_goals), vec!["Learn SQL"]);
        assert_eq!(roadmap.courses.len(), 1);
        assert_eq!(roadmap.courses[0].name, "Databases 101");
    }

    #[test]
    fn test_full_advisor_output() {
        let roadmap = parse_roadmap_text(ADVISOR_OUTPUT);

        assert_eq!(roadmap.short_term_goals.len(), 2);
        assert_eq!(roadmap.short_term_goals[0].timeline, "3-6 months");
        assert_eq!(
            goal_texts(&roadmap.medium_term_goals),
            vec!["Lead a small service migration", "Mentor a junior developer"]
        );
        assert_eq!(roadmap.medium_term_goals[0].timeline, "6-12 months");
        assert_eq!(roadmap.long_term_goals[0].timeline, "1-3 years");

        assert_eq!(roadmap.courses.len(), 2);
        assert_eq!(roadmap.courses[1].name, "MIT 6.824 Distributed Systems");
        assert!(roadmap.courses[1].provider.is_none());

        assert_eq!(roadmap.skills_to_develop.len(), 2);
        assert_eq!(roadmap.skills_to_develop[0].priority, Priority::Medium);

        let kinds: Vec<_> = roadmap
            .networking_opportunities
            .iter()
            .map(|o| o.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                OpportunityType::Event,
                OpportunityType::Platform,
                OpportunityType::Organization
            ]
        );

        let titles: Vec<_> = roadmap
            .target_job_titles
            .iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Senior Backend Engineer", "Platform Engineer"]);
    }

    #[test]
    fn test_unstructured_text_yields_empty_roadmap() {
        let roadmap = parse_roadmap_text("I'm sorry, I can't help with that right now.");
        assert!(roadmap.is_empty());
        assert!(parse_roadmap_text("").is_empty());
    }

    #[test]
    fn test_marker_stripping() {
        assert_eq!(strip_list_marker("-   Learn Go"), Some("Learn Go"));
        assert_eq!(strip_list_marker("• Learn Go"), Some("Learn Go"));
        assert_eq!(strip_list_marker("12. Learn Go"), Some("Learn Go"));
        assert_eq!(strip_list_marker("12 Learn Go"), None);
        assert_eq!(strip_list_marker("Learn Go"), None);
    }

    #[test]
    fn test_empty_or_symbol_only_bullets_are_skipped() {
        let roadmap = parse_roadmap_text("Short-term goals:\n-\n---\n- Ship it\n");
        assert_eq!(goal_texts(&roadmap.short_term_goals), vec!["Ship it"]);
    }

    #[test]
    fn test_keyword_matching_is_case_insensitive() {
        let roadmap = parse_roadmap_text("TARGET JOB TITLES\n• Site Reliability Engineer\n");
        assert_eq!(roadmap.target_job_titles.len(), 1);
        assert_eq!(roadmap.target_job_titles[0].priority, Priority::Medium);
    }
}
