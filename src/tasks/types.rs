use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// A single to-do item. List order is insertion/reorder order; any sorted
/// presentation is a projection computed by the filter module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Creates an open, medium-priority task with a fresh id and no due date.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            notes: String::new(),
            due_date: None,
            is_completed: false,
            priority: Priority::Medium,
            created_at: Utc::now(),
        }
    }

    /// A task is overdue when its due date falls on a calendar day strictly
    /// before today and it has not been completed.
    pub fn is_overdue(&self) -> bool {
        self.is_overdue_on(today())
    }

    pub fn is_overdue_on(&self, today: NaiveDate) -> bool {
        match self.due_date {
            Some(due) => !self.is_completed && local_day(due) < today,
            None => false,
        }
    }

    /// A task is due today when its due date falls on today's calendar day,
    /// regardless of completion.
    pub fn is_due_today(&self) -> bool {
        self.is_due_today_on(today())
    }

    pub fn is_due_today_on(&self, today: NaiveDate) -> bool {
        self.due_date.map(|due| local_day(due) == today).unwrap_or(false)
    }
}

/// Today's calendar date in the local timezone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// The local calendar day a moment falls on.
pub fn local_day(moment: DateTime<Utc>) -> NaiveDate {
    moment.with_timezone(&Local).date_naive()
}

/// Normalizes a moment to local midnight of its calendar day. Falls back to
/// the input if midnight does not exist locally (DST transition day).
pub fn start_of_day(moment: DateTime<Utc>) -> DateTime<Utc> {
    local_day(moment)
        .and_hms_opt(0, 0, 0)
        .and_then(|midnight| Local.from_local_datetime(&midnight).earliest())
        .map(|local| local.with_timezone(&Utc))
        .unwrap_or(moment)
}

/// Fixed dataset written out the first time the app runs without an existing
/// task file.
pub fn sample_tasks() -> Vec<Task> {
    let now = Utc::now();
    let sample = |title: &str, notes: &str, due: Option<DateTime<Utc>>, priority: Priority| Task {
        id: Uuid::new_v4(),
        title: title.to_string(),
        notes: notes.to_string(),
        due_date: due.map(start_of_day),
        is_completed: false,
        priority,
        created_at: now,
    };

    vec![
        sample(
            "Plan the week",
            "Outline the top priorities for work and home.",
            Some(now + Duration::days(1)),
            Priority::High,
        ),
        sample(
            "Pick up groceries",
            "Milk, eggs, spinach, oatmeal.",
            Some(now),
            Priority::Medium,
        ),
        sample(
            "Schedule dentist appointment",
            "Call Dr. Patel's office.",
            Some(now + Duration::days(3)),
            Priority::Low,
        ),
        sample(
            "Read 20 pages",
            "Continue reading the productivity book.",
            Some(now - Duration::days(1)),
            Priority::Medium,
        ),
    ]
}
