// Roadmap advisor prompt templates.
// The section headings below are the ones the roadmap parser recognises.

pub const ROADMAP_SYSTEM: &str = "\
You are an experienced career counselor. \
Give concrete, realistic career-development advice tailored to the person described. \
Write plain text with the exact section headings requested, one item per bullet line. \
Do not add introductions to individual bullets and do not nest lists.";

pub const ROADMAP_PROMPT_TEMPLATE: &str = r#"Create a personalised career roadmap for the following person.

CURRENT EDUCATION: {current_education}
CURRENT SKILLS: {current_skills}
INTERESTS: {interests}
TARGET ROLE: {target_role}
EXPERIENCE LEVEL: {experience_level}

Use exactly these section headings, each on its own line and followed by a bullet list
where every line starts with "- ":

Short-term Goals (3-6 months):
Medium-term Goals (6-12 months):
Long-term Goals (1-3 years):
Courses & Certifications:
Skills to Develop:
Networking Opportunities:
Target Job Titles:

RULES:
1. 3 to 5 bullets per section.
2. Each bullet is a single actionable item on one line.
3. Do not repeat section heading words inside bullets where avoidable.
4. No text between sections."#;
