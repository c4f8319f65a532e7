//! Markup rendering. Every function here is a pure function from a backend
//! payload to an HTML fragment string; missing data yields a fixed
//! empty-state placeholder. Nothing in this module mutates session state.

use shared::domain::{
    LinkedinSuggestions, ProfileAnalysis, ProgressSummary, Resume, Roadmap, TaskRecord,
};

use crate::form::OnboardingForm;
use crate::notify::{Notification, NotificationKind};
use crate::state::{Page, ProfileTab, Session, TaskFilter};

pub const EMPTY_ROADMAP: &str =
    r#"<div class="empty-state">No roadmap yet. Complete onboarding to generate one.</div>"#;
pub const EMPTY_TASKS: &str = r#"<div class="empty-state">No tasks to show.</div>"#;
pub const EMPTY_RESUME: &str =
    r#"<div class="empty-state">Your resume will grow as you complete tasks.</div>"#;
pub const EMPTY_LINKEDIN: &str =
    r#"<div class="empty-state">No LinkedIn suggestions yet.</div>"#;
pub const EMPTY_ANALYSIS: &str = r#"<div class="empty-state">No analysis available yet.</div>"#;
pub const EMPTY_SUMMARY: &str = r#"<div class="empty-state">No progress recorded yet.</div>"#;

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Whole-percent completion. An empty summary renders as 0 rather than
/// dividing by zero.
pub fn completion_percentage(summary: &ProgressSummary) -> u32 {
    if summary.total == 0 {
        0
    } else {
        summary.completed * 100 / summary.total
    }
}

pub fn render_notification(notification: &Notification) -> String {
    let class = match notification.kind {
        NotificationKind::Success => "toast toast-success",
        NotificationKind::Error => "toast toast-error",
        NotificationKind::Info => "toast toast-info",
    };
    format!(
        r#"<div class="{class}">{}</div>"#,
        escape_html(&notification.text)
    )
}

pub fn render_summary(summary: Option<&ProgressSummary>) -> String {
    let Some(summary) = summary else {
        return EMPTY_SUMMARY.to_string();
    };
    if summary.total == 0 {
        return EMPTY_SUMMARY.to_string();
    }
    format!(
        r#"<div class="summary"><span class="pct">{}%</span> complete — {} of {} done, {} in progress</div>"#,
        completion_percentage(summary),
        summary.completed,
        summary.total,
        summary.in_progress
    )
}

/// Renders the cached task list through the active filter, preserving the
/// backend-supplied order.
pub fn render_task_list(tasks: &[TaskRecord], filter: TaskFilter) -> String {
    let visible: Vec<&TaskRecord> = tasks.iter().filter(|t| filter.matches(t)).collect();
    if visible.is_empty() {
        return EMPTY_TASKS.to_string();
    }

    let mut out = String::from(r#"<ul class="task-list">"#);
    for task in visible {
        out.push_str(&format!(
            r#"<li class="task task-{status}" data-item="{id}"><span class="kind">{kind}</span> {name}</li>"#,
            status = task.status.as_str(),
            id = escape_html(&task.item_id),
            kind = task.item_type.as_str(),
            name = escape_html(&task.item_name),
        ));
    }
    out.push_str("</ul>");
    out
}

pub fn render_roadmap(roadmap: Option<&Roadmap>) -> String {
    let Some(roadmap) = roadmap else {
        return EMPTY_ROADMAP.to_string();
    };
    if roadmap.phases.is_empty() {
        return EMPTY_ROADMAP.to_string();
    }

    let mut out = String::from(r#"<div class="roadmap">"#);
    for phase in &roadmap.phases {
        out.push_str(&format!(
            r#"<section class="phase"><h2>{}</h2><p class="focus">{}</p>"#,
            escape_html(&phase.title),
            escape_html(&phase.focus),
        ));
        if let Some(routine) = &phase.weekly_routine {
            out.push_str(&format!(
                r#"<p class="routine">{}</p>"#,
                escape_html(routine)
            ));
        }

        render_item_group(&mut out, "Courses", phase.courses.iter().map(|c| (c.name.as_str(), &c.progress)));
        render_item_group(&mut out, "Tests", phase.tests.iter().map(|t| (t.name.as_str(), &t.progress)));
        render_item_group(
            &mut out,
            "Internships",
            phase.internships.iter().map(|i| (i.role_type.as_str(), &i.progress)),
        );
        render_item_group(
            &mut out,
            "Certificates",
            phase.certificates.iter().map(|c| (c.name.as_str(), &c.progress)),
        );
        render_item_group(&mut out, "Projects", phase.projects.iter().map(|p| (p.name.as_str(), &p.progress)));

        out.push_str("</section>");
    }
    out.push_str("</div>");
    out
}

fn render_item_group<'a>(
    out: &mut String,
    heading: &str,
    items: impl Iterator<Item = (&'a str, &'a Option<shared::domain::ItemProgress>)>,
) {
    let rendered: Vec<String> = items
        .map(|(name, progress)| {
            let status = progress
                .as_ref()
                .map(|p| p.status.as_str())
                .unwrap_or("not_started");
            format!(
                r#"<li class="item item-{status}">{}</li>"#,
                escape_html(name)
            )
        })
        .collect();
    if rendered.is_empty() {
        return;
    }
    out.push_str(&format!(r#"<h3>{}</h3><ul>"#, escape_html(heading)));
    for item in rendered {
        out.push_str(&item);
    }
    out.push_str("</ul>");
}

pub fn render_resume(resume: Option<&Resume>) -> String {
    let Some(resume) = resume else {
        return EMPTY_RESUME.to_string();
    };
    if resume.is_empty() {
        return EMPTY_RESUME.to_string();
    }

    let mut out = String::from(r#"<div class="resume">"#);
    if let Some(header) = &resume.header {
        out.push_str(&format!(
            r#"<header><h1>{}</h1><p>{}</p></header>"#,
            escape_html(&header.full_name),
            escape_html(&header.email),
        ));
    }
    if !resume.skills.is_empty() {
        out.push_str(&format!(
            r#"<section><h2>Skills</h2><p>{}</p></section>"#,
            escape_html(&resume.skills.join(", "))
        ));
    }
    if !resume.experience.is_empty() {
        out.push_str("<section><h2>Experience</h2><ul>");
        for entry in &resume.experience {
            out.push_str(&format!(
                r#"<li><strong>{}</strong> ({})"#,
                escape_html(&entry.title),
                escape_html(&entry.date)
            ));
            for bullet in &entry.bullets {
                out.push_str(&format!("<br/>- {}", escape_html(bullet)));
            }
            out.push_str("</li>");
        }
        out.push_str("</ul></section>");
    }
    if !resume.projects.is_empty() {
        out.push_str("<section><h2>Projects</h2><ul>");
        for project in &resume.projects {
            out.push_str(&format!(
                r#"<li><strong>{}</strong> ({})"#,
                escape_html(&project.name),
                escape_html(&project.date)
            ));
            for bullet in &project.bullets {
                out.push_str(&format!("<br/>- {}", escape_html(bullet)));
            }
            out.push_str("</li>");
        }
        out.push_str("</ul></section>");
    }
    if !resume.certifications.is_empty() {
        out.push_str("<section><h2>Certifications</h2><ul>");
        for cert in &resume.certifications {
            out.push_str(&format!(
                "<li>{} ({})</li>",
                escape_html(&cert.name),
                escape_html(&cert.date)
            ));
        }
        out.push_str("</ul></section>");
    }
    if !resume.education.is_empty() {
        out.push_str("<section><h2>Education</h2><ul>");
        for education in &resume.education {
            out.push_str(&format!(
                "<li>{} — {}</li>",
                escape_html(&education.institution),
                escape_html(&education.degree)
            ));
        }
        out.push_str("</ul></section>");
    }
    out.push_str("</div>");
    out
}

pub fn render_linkedin(bundle: Option<&LinkedinSuggestions>) -> String {
    let Some(bundle) = bundle else {
        return EMPTY_LINKEDIN.to_string();
    };
    if bundle.post_ideas.is_empty() && bundle.profile_summary.is_empty() {
        return EMPTY_LINKEDIN.to_string();
    }

    let mut out = String::from(r#"<div class="linkedin">"#);
    if !bundle.profile_summary.is_empty() {
        out.push_str(&format!(
            r#"<p class="summary">{}</p>"#,
            escape_html(&bundle.profile_summary)
        ));
    }
    for idea in &bundle.post_ideas {
        out.push_str(&format!(
            r#"<article class="post-idea"><h3>{}</h3><p>{}</p><p class="tags">{}</p></article>"#,
            escape_html(&idea.topic),
            escape_html(&idea.draft),
            escape_html(
                &idea
                    .hashtags
                    .iter()
                    .map(|t| format!("#{t}"))
                    .collect::<Vec<_>>()
                    .join(" ")
            ),
        ));
    }
    if !bundle.skills_to_add.is_empty() {
        out.push_str(&format!(
            r#"<p class="skills">Skills to add: {}</p>"#,
            escape_html(&bundle.skills_to_add.join(", "))
        ));
    }
    out.push_str("</div>");
    out
}

pub fn render_analysis(analysis: Option<&ProfileAnalysis>) -> String {
    let Some(analysis) = analysis else {
        return EMPTY_ANALYSIS.to_string();
    };
    if analysis.strengths.is_empty() && analysis.gaps.is_empty() && analysis.career_paths.is_empty()
    {
        return EMPTY_ANALYSIS.to_string();
    }

    let mut out = String::from(r#"<div class="analysis">"#);
    for (heading, items) in [
        ("Strengths", &analysis.strengths),
        ("Gaps", &analysis.gaps),
        ("Career paths", &analysis.career_paths),
        ("Learning tips", &analysis.learning_tips),
    ] {
        if items.is_empty() {
            continue;
        }
        out.push_str(&format!("<h3>{heading}</h3><ul>"));
        for item in items.iter() {
            out.push_str(&format!("<li>{}</li>", escape_html(item)));
        }
        out.push_str("</ul>");
    }
    out.push_str("</div>");
    out
}

/// Renders the current step of the multi-step form. The submit control is
/// emitted only at the final step.
pub fn render_form(form: &OnboardingForm) -> String {
    let step = form.current_step_spec();
    let mut out = format!(
        r#"<form class="onboarding" data-step="{}" data-total="{}"><h2>{}</h2>"#,
        form.step(),
        form.total_steps(),
        escape_html(step.title),
    );
    for field in &step.fields {
        let hidden = if field.hidden { " hidden" } else { "" };
        out.push_str(&format!(
            r#"<label{hidden}>{label}<input name="{name}" value="{value}"{required}/></label>"#,
            label = escape_html(field.label),
            name = field.name,
            value = escape_html(form.value(field.name)),
            required = if field.required { " required" } else { "" },
        ));
    }
    out.push_str(r#"<button type="button" data-action="back">Back</button>"#);
    if form.can_submit() {
        out.push_str(r#"<button type="submit" data-action="submit">Submit</button>"#);
    } else {
        out.push_str(r#"<button type="button" data-action="next">Next</button>"#);
    }
    out.push_str("</form>");
    out
}

/// Renders the tabbed profile editor: a tab bar plus only the active tab's
/// cached payload.
pub fn render_profile(session: &Session) -> String {
    let mut out = String::from(r#"<div class="tabs">"#);
    for tab in ProfileTab::ALL {
        let active = if tab == session.profile_tab {
            r#" class="active""#
        } else {
            ""
        };
        out.push_str(&format!(
            r#"<button data-tab="{0}"{active}>{0}</button>"#,
            tab.as_str()
        ));
    }
    out.push_str("</div>");

    let analysis = session
        .profile
        .as_ref()
        .and_then(|p| p.profile.as_ref())
        .map(|p| &p.analysis);

    let body = match session.profile_tab {
        ProfileTab::Analysis => render_analysis(analysis),
        ProfileTab::Resume => render_resume(session.resume.as_ref()),
        ProfileTab::Linkedin => render_linkedin(session.linkedin.as_ref()),
    };
    out.push_str(&body);
    out
}

/// Composes the single-page document: the nav bar plus the four sections,
/// with exactly one section visible.
pub fn render_app(session: &Session, form: &OnboardingForm) -> String {
    let mut out = String::from(r#"<nav class="top-nav">"#);
    for page in Page::ALL {
        let active = if page == session.current_page {
            r#" class="active""#
        } else {
            ""
        };
        out.push_str(&format!(
            r#"<a data-page="{0}"{active}>{0}</a>"#,
            page.as_str()
        ));
    }
    out.push_str("</nav>");

    for page in Page::ALL {
        let hidden = if page == session.current_page {
            ""
        } else {
            " hidden"
        };
        let body = match page {
            Page::Onboarding => render_form(form),
            Page::Roadmap => render_roadmap(session.roadmap.as_ref()),
            Page::Progress => format!(
                "{}{}",
                render_summary(session.summary.as_ref()),
                render_task_list(&session.tasks, session.task_filter)
            ),
            Page::Profile => render_profile(session),
        };
        out.push_str(&format!(
            r#"<section id="page-{}"{hidden}>{body}</section>"#,
            page.as_str()
        ));
    }
    out
}
