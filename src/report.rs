// Delta report rendering.
// Compares fresh snapshots against stored history and renders the stats
// table with signed per-metric changes.

use crate::github::RepoSnapshot;
use crate::state::History;

/// Per-metric signed difference between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatDelta {
    pub stars: i64,
    pub watchers: i64,
    pub forks: i64,
    pub open_issues: i64,
}

/// Difference between a fresh snapshot and its prior one.
///
/// No prior snapshot is treated as all-zero values, so first-run deltas
/// equal the absolute current values. An unresolved watcher count yields a
/// zero watcher delta.
pub fn delta(current: &RepoSnapshot, previous: Option<&RepoSnapshot>) -> StatDelta {
    let prev_stars = previous.map_or(0, |p| p.stars);
    let prev_watchers = previous.and_then(|p| p.watchers).unwrap_or(0);
    let prev_forks = previous.map_or(0, |p| p.forks);
    let prev_issues = previous.map_or(0, |p| p.open_issues);

    StatDelta {
        stars: current.stars as i64 - prev_stars as i64,
        watchers: current
            .watchers
            .map_or(0, |w| w as i64 - prev_watchers as i64),
        forks: current.forks as i64 - prev_forks as i64,
        open_issues: current.open_issues as i64 - prev_issues as i64,
    }
}

/// Render the full report: header plus one row per repository, sorted
/// case-insensitively by name regardless of fetch order.
pub fn render(snapshots: &[RepoSnapshot], history: &History) -> String {
    let mut sorted: Vec<&RepoSnapshot> = snapshots.iter().collect();
    sorted.sort_by_key(|s| s.name.to_lowercase());

    let mut out = String::new();
    out.push_str(&format!(
        "{:<32} | {:<13} | {:<13} | {:<13} | {:<13}\n",
        "Repository", "    Stars", "   Watchers", "    Forks", " Open Issues"
    ));
    out.push('\n');

    for snapshot in sorted {
        out.push_str(&render_row(snapshot, history.repos_data.get(&snapshot.name)));
        out.push('\n');
    }

    out
}

/// Render one repository row.
///
/// A repository seen for the first time shows its absolute values with no
/// change markers; markers appear once a prior snapshot exists.
fn render_row(current: &RepoSnapshot, previous: Option<&RepoSnapshot>) -> String {
    let diff = if previous.is_some() {
        delta(current, previous)
    } else {
        StatDelta::default()
    };

    let name: String = current.name.chars().take(30).collect();

    format!(
        "{:<32} | {:<13} | {:<13} | {:<13} | {:<13}",
        name,
        metric_cell(current.stars, diff.stars),
        watchers_cell(current.watchers, diff.watchers),
        metric_cell(current.forks, diff.forks),
        metric_cell(current.open_issues, diff.open_issues),
    )
}

/// A metric cell: right-aligned value plus the signed change, blank when
/// the change is zero.
fn metric_cell(value: u64, diff: i64) -> String {
    format!("{:>5} {:>4}", value, format_change(diff))
}

/// Watchers cell; an unresolved count renders as `-` with no change.
fn watchers_cell(value: Option<u64>, diff: i64) -> String {
    match value {
        Some(value) => metric_cell(value, diff),
        None => format!("{:>5} {:>4}", "-", ""),
    }
}

fn format_change(diff: i64) -> String {
    if diff == 0 {
        String::new()
    } else {
        format!("{:+}", diff)
    }
}
