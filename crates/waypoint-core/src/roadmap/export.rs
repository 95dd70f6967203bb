//! Markdown rendering of a stored roadmap, for download and printing.

use std::fmt::Write;

use super::service::RoadmapRecord;

/// Render a roadmap as a Markdown document.
///
/// Completed tasks are rendered as checked boxes.
pub fn render_markdown(record: &RoadmapRecord) -> String {
    let goal = &record.goal;
    let mut out = String::with_capacity(1024);

    // Writing into a String cannot fail.
    let _ = writeln!(out, "# {}", one_line(&goal.title));
    out.push('\n');
    if !goal.description.is_empty() {
        let _ = writeln!(out, "{}\n", goal.description);
    }
    let _ = writeln!(out, "- **Deadline:** {}", goal.deadline.format("%Y-%m-%d"));
    let _ = writeln!(out, "- **Hours per week:** {}", goal.hours_per_week);
    let _ = writeln!(out, "- **Weeks available:** {}", goal.weeks_available);
    let _ = writeln!(out, "- **Achievable hours:** {}", goal.achievable_hours);
    let _ = writeln!(
        out,
        "- **Estimated effort:** {} hours",
        goal.estimated_effort_hours
    );
    let _ = writeln!(out, "- **Plan source:** {}", goal.source);

    for record in &record.milestones {
        let m = &record.milestone;
        out.push('\n');
        let _ = writeln!(out, "## {}", one_line(&m.title));
        out.push('\n');
        let _ = writeln!(
            out,
            "{} → {} · {}% complete",
            m.start_date.format("%Y-%m-%d"),
            m.target_date.format("%Y-%m-%d"),
            m.progress
        );
        out.push('\n');
        if record.tasks.is_empty() {
            out.push_str("_No tasks._\n");
        }
        for t in &record.tasks {
            let mark = if t.is_completed { 'x' } else { ' ' };
            let _ = writeln!(
                out,
                "- [{mark}] {} ({} h)",
                one_line(&t.task_name),
                t.estimated_hours
            );
        }
    }

    out
}

/// Collapse line breaks so headings and list items stay on one line.
fn one_line(text: &str) -> String {
    text.split(['\r', '\n'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// File name offered when downloading a goal's export.
pub fn export_file_name(record: &RoadmapRecord) -> String {
    let slug: String = record
        .goal
        .title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    let slug = slug
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        "roadmap.md".to_string()
    } else {
        format!("{slug}-roadmap.md")
    }
}
