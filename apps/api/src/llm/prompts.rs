//! All prompt construction for the SkillPath advisor calls.

use shared::protocol::{OnboardRequest, StudentProfilePayload};

use crate::llm::{BulletContext, UserContext};

/// System instruction sent with every call — keeps the model "in character".
pub const SYSTEM_INSTRUCTION: &str = "You are SkillPath AI, a sophisticated career strategist and technical mentor. \
    You provide raw, honest, and technically detailed advice. \
    You avoid corporate fluff (e.g., \"Keep learning!\") and favor tech-in-the-trenches storytelling. \
    You always prioritize specific tool names (e.g., 'React Query' over 'libraries') and actionable metrics.";

/// Canned industry-trend context injected into roadmap prompts.
pub const SIMULATED_TRENDS: &str = "Current Industry Trends (2025-2026):
- AI and Machine Learning integration across all sectors
- Cloud computing and distributed systems dominance
- Data privacy and cybersecurity critical importance
- Remote work and digital collaboration tools
- Sustainability and green technology focus
- API-first and microservices architectures
- Low-code/no-code platforms emergence";

fn list_or_unspecified(items: &[String]) -> String {
    if items.is_empty() {
        "Not specified".to_string()
    } else {
        items.join(", ")
    }
}

fn text_or_unspecified(text: &str) -> &str {
    if text.trim().is_empty() {
        "Not specified"
    } else {
        text
    }
}

/// Profile analysis prompt: strengths, gaps, career paths, learning tips.
pub fn build_analysis_prompt(draft: &OnboardRequest) -> String {
    format!(
        r#"You are an expert career advisor analyzing a student's profile.

Student Information:
- Major: {major}
- University: {university}
- GPA: {gpa}
- Experience Level: {experience}
- Career Aspirations: {aspirations}
- Target Industries: {industries}
- Current Skills: {skills}
- Preferred Learning Style: {learning}
- Preferred Content Types: {content_types}
- Time Commitment: {time}
- Relocation Goal: {relocation}
- Extracurricular Interests: {extracurriculars}
- Planning Horizon: {horizon} Years

Task: Analyze this profile and provide:
1. Key strengths (2-3 points)
2. Skill gaps to address (2-3 points)
3. Recommended career paths (top 3, ordered from most specific to broad)
4. Learning approach optimization tips (2-3 actionable tips)
5. Advice on relocation and extracurricular balance (if applicable)

Format your response as JSON with keys: "strengths", "gaps", "career_paths", "learning_tips"
Each value should be an array of strings.

Return ONLY valid JSON, no additional text."#,
        major = text_or_unspecified(&draft.major),
        university = text_or_unspecified(&draft.university),
        gpa = draft
            .gpa
            .map(|g| g.to_string())
            .unwrap_or_else(|| "Not specified".to_string()),
        experience = text_or_unspecified(&draft.experience_level),
        aspirations = text_or_unspecified(&draft.career_aspirations),
        industries = list_or_unspecified(&draft.target_industries),
        skills = list_or_unspecified(&draft.current_skills),
        learning = text_or_unspecified(&draft.preferred_learning),
        content_types = list_or_unspecified(&draft.preferred_content_types),
        time = text_or_unspecified(&draft.time_commitment),
        relocation = draft.relocation_goal.as_deref().unwrap_or("None"),
        extracurriculars = list_or_unspecified(&draft.extracurricular_interests),
        horizon = draft.planning_horizon_years,
    )
}

/// Roadmap generation prompt. One phase per planning year; each phase bundles
/// the five typed item collections with stable item ids.
pub fn build_roadmap_prompt(
    profile: &StudentProfilePayload,
    timeline_months: u32,
    trends: &str,
) -> String {
    let years = (timeline_months / 12).max(1);
    let target_role = profile.analysis.primary_career_path();
    let skill_gaps = profile.analysis.gaps.join(", ");

    format!(
        r#"You are an expert educational and career strategist creating a personalized {years}-year growth roadmap.

Student Profile:
- Major: {major}
- University: {university}
- Target Role: {target_role}
- Target Industries: {industries}
- Experience Level: {experience}
- Current Skills: {skills}
- Skill Gaps: {gaps}
- Time Commitment: {time}
- Content Preference: {content_types}
- Relocation Goal: {relocation}
- Extracurricular Interests: {extracurriculars}
- Planning Horizon: {years} Years

{trends}

Task: Generate a detailed, phased growth plan with {years} phases, where each phase represents 1 YEAR.

For each phase (Year), provide:
1. Courses: 2-3 specific online courses with name, platform, estimated duration, and clear rationale
2. Tests/Certifications: relevant exams with target scores, timing, and rationale
3. Internships/Jobs: types, timing, target companies/industries, and rationale
4. Projects: 2-3 practical projects with name, description, skills demonstrated, and rationale
5. Weekly Routine: a friendly, sample weekly schedule tailored to this phase's goals

Guidelines:
- If relocation is a goal, include language learning and visa prep in earlier years.
- Integrate extracurriculars to build soft skills.
- The weekly routine should sound encouraging and doable.
- Ensure skills build up year over year.

Format as JSON with this EXACT structure:
{{
  "phases": [
    {{
      "phase": 1,
      "title": "Year 1: [Theme Name]",
      "focus": "Main focus of this year",
      "weekly_routine": "Sample weekly schedule",
      "courses": [
        {{"id": "c1", "name": "Course Name", "platform": "Platform Name", "duration": "X weeks", "rationale": "Why this course"}}
      ],
      "tests": [
        {{"id": "t1", "name": "Test Name", "target_score": "Score or Grade", "timing": "When to take", "rationale": "Why this test"}}
      ],
      "internships": [
        {{"id": "i1", "type": "Internship Type", "when": "Application timeline", "companies": ["Company examples"], "rationale": "Why this internship"}}
      ],
      "certificates": [
        {{"id": "cert1", "name": "Certificate Name", "provider": "Provider Name", "timing": "When to get", "rationale": "Why this certificate"}}
      ],
      "projects": [
        {{"id": "p1", "name": "Project Name", "description": "Project description", "skills_demonstrated": ["skill1", "skill2"], "rationale": "Why this project"}}
      ]
    }}
  ]
}}

Item ids must be unique across the whole roadmap.
Return ONLY valid JSON, no additional text or markdown."#,
        major = text_or_unspecified(&profile.major),
        university = text_or_unspecified(&profile.university),
        industries = list_or_unspecified(&profile.target_industries),
        experience = text_or_unspecified(&profile.experience_level),
        skills = list_or_unspecified(&profile.current_skills),
        gaps = text_or_unspecified(&skill_gaps),
        time = text_or_unspecified(&profile.time_commitment),
        content_types = list_or_unspecified(&profile.preferred_content_types),
        relocation = profile.relocation_goal.as_deref().unwrap_or("None"),
        extracurriculars = list_or_unspecified(&profile.extracurricular_interests),
    )
}

/// Short plain-text encouragement for a just-completed item.
pub fn build_encouragement_prompt(item_name: &str, item_type: &str, ctx: &UserContext) -> String {
    format!(
        r#"A student just completed: {item_name} ({item_type})

Student's journey so far:
- Completed items: {completed}
- Current phase: {phase}
- Career goal: {goal}

Generate a brief, encouraging message (2-3 sentences) that:
1. Acknowledges their specific achievement
2. Connects it to their career goal
3. Motivates next steps

Keep it genuine, specific, and energizing. Do not use emojis.
Return only the message text, nothing else."#,
        completed = ctx.completed_count,
        phase = ctx.current_phase,
        goal = text_or_unspecified(&ctx.career_goal),
    )
}

/// Resume bullet generation for one completed item.
pub fn build_resume_bullets_prompt(item: &BulletContext) -> String {
    format!(
        r#"Generate professional resume bullet points for:

Type: {item_type}
Title: {title}
Description: {description}
Skills Used: {skills}
Target Role: {role}

Guidelines:
- Start with strong action verbs (Developed, Implemented, Designed, Led, etc.)
- Include quantifiable metrics where possible
- Highlight technical skills and tools
- Show impact and results
- 2-3 bullet points
- Each bullet: 1-2 lines maximum

Format as JSON:
{{"bullets": ["bullet 1", "bullet 2", "bullet 3"]}}

Return ONLY valid JSON, no additional text."#,
        item_type = item.item_type,
        title = item.title,
        description = text_or_unspecified(&item.description),
        skills = list_or_unspecified(&item.skills),
        role = text_or_unspecified(&item.target_role),
    )
}

/// LinkedIn content prompt: post ideas, profile summary, skills to add.
pub fn build_linkedin_prompt(ctx: &UserContext) -> String {
    format!(
        r#"You are writing LinkedIn posts for a student in tech.

Profile:
- Name: {name}
- Major: {major}
- University: {university}
- Experience level: {experience}
- Career goal: {goal}
- Target industries: {industries}
- Current skills: {skills}
- Recent achievements: {achievements}

Write posts with this structure (do NOT copy content, just the pattern):
- Hook: 1 punchy sentence calling out a real frustration or insight.
- Problem: 2-3 sentences describing what is broken or confusing today.
- Solution: 2-3 sentences describing what the student built/learned/is doing.
- How it works: 3-5 sentences with specific tools, APIs, stacks, or concepts.
- Technical win: 2-3 sentences highlighting what they learned technically.
- Vision: 2-3 sentences about why this matters for their career.
- CTA: 1 sentence asking a genuine question to the audience.

Never start a post with "Excited to share", "Thrilled to announce", or "Delighted to say".
Avoid generic advice like "Consistency is key". No emojis in hashtags.

Generate:
1. post_ideas: 3 ideas; each "draft" MUST be a cohesive first-person narrative of 160-220 words naming specific tools from the skills list.
2. profile_summary: a 2-3 sentence professional summary.
3. skills_to_add: 5-7 skills they should add.

Format as JSON:
{{
  "post_ideas": [
    {{"topic": "Short topic line", "draft": "The full post content...", "hashtags": ["tag1", "tag2"]}}
  ],
  "profile_summary": "...",
  "skills_to_add": ["..."]
}}

Return ONLY valid JSON, no markdown, no extra text."#,
        name = text_or_unspecified(&ctx.name),
        major = text_or_unspecified(&ctx.major),
        university = text_or_unspecified(&ctx.university),
        experience = text_or_unspecified(&ctx.experience_level),
        goal = text_or_unspecified(&ctx.career_goal),
        industries = list_or_unspecified(&ctx.target_industries),
        skills = list_or_unspecified(&ctx.current_skills),
        achievements = list_or_unspecified(&ctx.recent_achievements),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn sample_draft() -> OnboardRequest {
        serde_json::from_value(serde_json::json!({
            "user_id": Uuid::new_v4(),
            "major": "Computer Science",
            "university": "State University",
            "gpa": 3.4,
            "experience_level": "Beginner",
            "career_aspirations": "Backend engineer",
            "current_skills": ["Python", "SQL"],
            "time_commitment": "10 hours/week"
        }))
        .unwrap()
    }

    #[test]
    fn test_analysis_prompt_includes_profile_fields() {
        let prompt = build_analysis_prompt(&sample_draft());
        assert!(prompt.contains("Computer Science"));
        assert!(prompt.contains("Python, SQL"));
        assert!(prompt.contains("3.4"));
        assert!(prompt.contains("Return ONLY valid JSON"));
    }

    #[test]
    fn test_analysis_prompt_marks_missing_fields() {
        let mut draft = sample_draft();
        draft.preferred_learning.clear();
        let prompt = build_analysis_prompt(&draft);
        assert!(prompt.contains("Preferred Learning Style: Not specified"));
    }

    #[test]
    fn test_roadmap_prompt_rounds_months_to_years() {
        let profile: StudentProfilePayload = serde_json::from_value(serde_json::json!({
            "user_id": Uuid::new_v4(),
            "major": "CS",
            "university": "State",
            "experience_level": "Beginner",
            "career_aspirations": "Data engineer",
            "preferred_learning": "videos",
            "time_commitment": "5 hours/week",
            "open_to_relocation": false,
            "planning_horizon_years": 2,
            "updated_at": chrono::Utc::now()
        }))
        .unwrap();

        let prompt = build_roadmap_prompt(&profile, 24, SIMULATED_TRENDS);
        assert!(prompt.contains("2-year growth roadmap"));
        assert!(prompt.contains("Industry Trends"));

        // Anything under a year still yields one phase
        let prompt = build_roadmap_prompt(&profile, 6, SIMULATED_TRENDS);
        assert!(prompt.contains("1-year growth roadmap"));
    }

    #[test]
    fn test_encouragement_prompt_names_the_item() {
        let ctx = UserContext {
            completed_count: 3,
            current_phase: 1,
            career_goal: "ML Engineer".to_string(),
            ..UserContext::default()
        };
        let prompt = build_encouragement_prompt("Intro to Rust", "course", &ctx);
        assert!(prompt.contains("Intro to Rust (course)"));
        assert!(prompt.contains("Completed items: 3"));
    }
}
