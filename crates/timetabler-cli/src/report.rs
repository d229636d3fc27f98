//! Plain-text rendering of generation results.

use std::fmt::Write;

use owo_colors::OwoColorize;
use serde::Serialize;

use timetabler::{GenerationResult, TermStats, TimetableEntry};

/// What `generate --format json` writes.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    #[serde(flatten)]
    pub result: &'a GenerationResult,
    pub entries: &'a [TimetableEntry],
}

pub fn summary(result: &GenerationResult) -> String {
    let mut out = String::new();
    let cost = result.cost();
    let cost_text = if cost.is_feasible() {
        cost.to_string().bright_green().to_string()
    } else {
        cost.to_string().bright_red().to_string()
    };
    let _ = writeln!(
        out,
        "{} {} │ {} placements │ restart {} of {} │ seed {}",
        "Cost".bold(),
        cost_text,
        result.schedule.len(),
        result.best_restart,
        result.restarts.len(),
        result.seed,
    );
    if result.budget_exceeded {
        let _ = writeln!(out, "{}", "Budget exceeded: schedule may be incomplete".yellow());
    }

    let _ = writeln!(out, "\n{}", "Soft constraints".bold());
    for c in &result.report.breakdown {
        let _ = writeln!(
            out,
            "  {:<16} {:>10.3} × {:<6} = {:>10.3}",
            c.constraint.name(),
            c.raw,
            c.weight,
            c.cost
        );
    }

    if !result.unresolved_sections.is_empty() {
        let _ = writeln!(out, "\n{}", "Unresolved sections".bright_red().bold());
        for u in &result.unresolved_sections {
            let _ = writeln!(
                out,
                "  {:<16} {}/{} hours │ {}",
                u.key, u.placed_hours, u.required_hours, u.reason
            );
        }
    }
    out
}

pub fn timetable(entries: &[TimetableEntry]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        format!(
            "{:<4} {:<11} {:<12} {:<10} {:<24} {:<12} {:<8}",
            "Day", "Time", "Section", "Course", "Title", "Faculty", "Room"
        )
        .bold()
    );
    for e in entries {
        let _ = writeln!(
            out,
            "{:<4} {}-{} {:<12} {:<10} {:<24} {:<12} {:<8}",
            e.day.to_string(),
            e.start,
            e.end,
            e.section,
            e.course_code,
            truncate(&e.course_name, 24),
            e.faculty,
            e.room,
        );
    }
    out
}

pub fn stats(name: Option<&str>, stats: &TermStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", name.unwrap_or("(unnamed term)").bold());
    let rows = [
        ("students", stats.students),
        ("faculty", stats.faculty),
        ("courses", stats.courses),
        ("rooms", stats.rooms),
        ("sections", stats.sections),
        ("weekly hours", stats.weekly_hours),
        ("slots", stats.slots),
    ];
    for (label, value) in rows {
        let _ = writeln!(out, "  {:<14} {:>6}", label, value);
    }
    if !stats.branches.is_empty() {
        let _ = writeln!(out, "\n{}", "Branches".bold());
        for (branch, b) in &stats.branches {
            let _ = writeln!(
                out,
                "  {:<14} {:>4} students │ {:>3} faculty │ {:>3} courses",
                branch, b.students, b.faculty, b.courses
            );
        }
    }
    out
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut cut: String = s.chars().take(width - 1).collect();
        cut.push('…');
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Programming", 24), "Programming");
        assert_eq!(truncate("abcdef", 4), "abc…");
    }

    #[test]
    fn test_stats_lists_every_count() {
        let domain = timetabler_test::campus();
        let text = stats(domain.name(), &domain.stats());
        assert!(text.contains("weekly hours"));
        assert!(text.contains(&domain.total_weekly_hours().to_string()));
    }
}
