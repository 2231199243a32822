use super::types::{local_day, today, Task};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Named view restriction applied before display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskFilter {
    #[default]
    All,
    Today,
    Upcoming,
    Completed,
}

impl TaskFilter {
    pub const ALL_CASES: [TaskFilter; 4] = [
        TaskFilter::All,
        TaskFilter::Today,
        TaskFilter::Upcoming,
        TaskFilter::Completed,
    ];

    pub fn allows(&self, task: &Task) -> bool {
        self.allows_on(task, today())
    }

    pub fn allows_on(&self, task: &Task, today: NaiveDate) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Today => task.is_due_today_on(today),
            TaskFilter::Upcoming => {
                if task.is_completed {
                    return false;
                }
                match task.due_date {
                    None => true,
                    Some(due) => local_day(due) >= today,
                }
            }
            TaskFilter::Completed => task.is_completed,
        }
    }
}

/// Case-insensitive substring match over title and notes. A blank query
/// matches everything.
pub fn matches_search(task: &Task, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }

    let query = query.to_lowercase();
    task.title.to_lowercase().contains(&query) || task.notes.to_lowercase().contains(&query)
}

/// Manual reordering is only permitted when the displayed list is
/// index-identical to the store list: no filter restriction and no search.
pub fn can_reorder(filter: TaskFilter, query: &str) -> bool {
    filter == TaskFilter::All && query.trim().is_empty()
}

/// The ordered subsequence a presentation layer should display for the given
/// filter and search text.
pub fn visible_tasks(tasks: &[Task], filter: TaskFilter, query: &str) -> Vec<Task> {
    visible_tasks_on(tasks, filter, query, today())
}

/// As [`visible_tasks`], but against an explicit reference date.
///
/// The reorderable view keeps raw store order so view positions map straight
/// onto store positions. Every other view sorts: open tasks before completed,
/// then ascending due date with dateless tasks last, ties broken by creation
/// time.
pub fn visible_tasks_on(
    tasks: &[Task],
    filter: TaskFilter,
    query: &str,
    today: NaiveDate,
) -> Vec<Task> {
    let mut shown: Vec<Task> = tasks
        .iter()
        .filter(|task| filter.allows_on(task, today) && matches_search(task, query))
        .cloned()
        .collect();

    if can_reorder(filter, query) {
        return shown;
    }

    shown.sort_by(|a, b| {
        a.is_completed
            .cmp(&b.is_completed)
            .then_with(|| match (a.due_date, b.due_date) {
                (Some(lhs), Some(rhs)) => lhs.cmp(&rhs),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
    shown
}
