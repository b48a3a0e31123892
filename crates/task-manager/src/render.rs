//! Plain-text rendering of command output

use std::collections::BTreeMap;
use std::fmt::Write;
use task_analytics::{Event, ThemePreference};
use task_client::{ApiError, Task, TaskStatistics, TaskSummary};

/// One task as a single line, e.g. `[ ] #3 Buy milk (high) due Mar 10, 2024 #home`
pub fn task_line(task: &Task) -> String {
    let mut line = format!(
        "[{}] #{} {} ({})",
        if task.completed { "x" } else { " " },
        task.id,
        task.title,
        task.priority
    );
    if let Some(day) = task.due_day() {
        let _ = write!(line, " due {}", day.format("%b %d, %Y"));
    }
    if task.is_overdue && !task.completed {
        line.push_str(" OVERDUE");
    }
    for tag in &task.tags {
        let _ = write!(line, " #{}", tag);
    }
    line
}

pub fn task_list(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks found.".to_string();
    }
    let mut out = String::new();
    for task in tasks {
        out.push_str(&task_line(task));
        out.push('\n');
        if !task.description.is_empty() {
            let _ = writeln!(out, "      {}", task.description);
        }
    }
    out.trim_end().to_string()
}

pub fn statistics(stats: &TaskStatistics) -> String {
    format!(
        "Total:     {}\nCompleted: {}\nPending:   {}\nOverdue:   {}\nBy priority: low {}, medium {}, high {}",
        stats.total,
        stats.completed,
        stats.pending,
        stats.overdue,
        stats.by_priority.low,
        stats.by_priority.medium,
        stats.by_priority.high
    )
}

/// Dashboard summary: task counts plus local usage numbers
pub fn summary(
    tasks: &TaskSummary,
    theme: &ThemePreference,
    event_stats: &BTreeMap<String, usize>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total tasks:        {}", tasks.total);
    let _ = writeln!(out, "Completed:          {}", tasks.completed);
    let _ = writeln!(out, "Pending:            {}", tasks.pending);
    let _ = writeln!(out, "Completion rate:    {}%", tasks.completion_rate);
    let _ = writeln!(out, "High priority open: {}", tasks.high_priority_pending);
    let _ = writeln!(
        out,
        "Dark mode usage:    {}% of {} theme switches",
        theme.dark_percentage(),
        theme.total()
    );

    let total_events: usize = event_stats.values().sum();
    let _ = write!(out, "Events recorded:    {}", total_events);
    for (name, count) in event_stats {
        let _ = write!(out, "\n  {:<16} {}", name, count);
    }
    out
}

pub fn event_line(event: &Event) -> String {
    let mut line = format!(
        "{} {} [{}]",
        event.timestamp.format("%Y-%m-%d %H:%M:%S"),
        event.event_name,
        event.theme
    );
    if let Some(metadata) = &event.metadata {
        let _ = write!(line, " {}", serde_json::Value::Object(metadata.clone()));
    }
    line
}

pub fn event_list(events: &[Event]) -> String {
    if events.is_empty() {
        return "No events recorded.".to_string();
    }
    events.iter().map(event_line).collect::<Vec<_>>().join("\n")
}

/// Error text for the terminal, preferring the server's own message
pub fn error_message(err: &anyhow::Error) -> String {
    let detail = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<ApiError>())
        .and_then(ApiError::detail);
    match detail {
        Some(detail) => format!("{}: {}", err, detail),
        None => format!("{:#}", err),
    }
}
