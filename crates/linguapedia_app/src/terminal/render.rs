use linguapedia_core::{CacheListingView, PollPhase, StatusView, StopReason};

const BAR_WIDTH: usize = 30;

/// Terminal lines for one status view: header, bar, step checklist, and
/// the reload prompt or error banner once the chain has stopped.
pub fn render_status(view: &StatusView, base_url: &str) -> Vec<String> {
    let mut lines = Vec::with_capacity(view.steps.len() + 4);
    lines.push(format!("{} [{}]", view.title, phase_label(view.phase)));
    lines.push(format!(
        "{} {:>4} {}",
        progress_bar(view.progress),
        view.readout(),
        view.status.as_str()
    ));
    for step in &view.steps {
        let mark = if step.active { 'x' } else { ' ' };
        lines.push(format!("  [{mark}] {:>3}% {}", step.threshold, step.label));
    }
    if view.consecutive_failures > 0 {
        lines.push(format!(
            "  (status unavailable, {} failed request(s); still retrying)",
            view.consecutive_failures
        ));
    }
    if let Some(message) = &view.error_banner {
        lines.push(format!("Error: {message}"));
    }
    if view.reload_prompt {
        lines.push(format!(
            "Article ready. Reload {}{} to view it.",
            base_url.trim_end_matches('/'),
            view.article_path
        ));
    }
    lines
}

fn phase_label(phase: PollPhase) -> &'static str {
    match phase {
        PollPhase::Idle => "starting",
        PollPhase::Scheduled { .. } => "waiting",
        PollPhase::InFlight => "checking",
        PollPhase::Stopped(StopReason::Completed) => "done",
        PollPhase::Stopped(StopReason::Failed) => "failed",
        PollPhase::Stopped(StopReason::Cancelled) => "cancelled",
    }
}

fn progress_bar(progress: u8) -> String {
    let filled = usize::from(progress.min(100)) * BAR_WIDTH / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

pub fn render_cache_listing(listing: &CacheListingView) -> Vec<String> {
    if listing.rows.is_empty() {
        return vec!["The cache is empty.".to_string()];
    }
    let title_width = listing
        .rows
        .iter()
        .map(|row| row.title.chars().count())
        .max()
        .unwrap_or(0);
    let mut lines: Vec<String> = listing
        .rows
        .iter()
        .map(|row| {
            format!(
                "{:<title_width$}  {}  {:>9}  {}",
                row.title,
                row.modified,
                row.size,
                row.view_href.as_deref().unwrap_or("-"),
            )
        })
        .collect();
    if listing.rows.len() < listing.total_count {
        lines.push(format!(
            "{} of {} article(s), {} total",
            listing.rows.len(),
            listing.total_count,
            listing.total_size
        ));
    } else {
        lines.push(format!("{} article(s), {} total", listing.rows.len(), listing.total_size));
    }
    lines
}
