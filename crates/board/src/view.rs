//! Search, filtering, grouping and counters over the task list.

use chrono::NaiveDate;
use tasks_protocol::{TaskStatus, TaskSummary};

/// Which status columns the board shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TaskStatus),
}

impl StatusFilter {
    /// all -> todo -> onProgress -> done -> timeOut -> all
    pub fn next(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Only(TaskStatus::ALL[0]),
            StatusFilter::Only(status) => {
                let next = status.next();
                if next == TaskStatus::ALL[0] {
                    StatusFilter::All
                } else {
                    StatusFilter::Only(next)
                }
            }
        }
    }

    pub fn shows(self, status: TaskStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(only) => only == status,
        }
    }

    pub fn label(self) -> String {
        match self {
            StatusFilter::All => "all".to_string(),
            StatusFilter::Only(status) => status.to_string(),
        }
    }
}

/// Heading shown above each board column.
pub fn column_title(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Todo => "To-do",
        TaskStatus::OnProgress => "In Progress",
        TaskStatus::Done => "Done",
        TaskStatus::TimeOut => "Expired Tasks",
    }
}

/// Human label for a status, as offered by the form.
pub fn status_label(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Todo => "To Do",
        TaskStatus::OnProgress => "In Progress",
        TaskStatus::Done => "Done",
        TaskStatus::TimeOut => "Time Out",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column<'a> {
    pub status: TaskStatus,
    pub tasks: Vec<&'a TaskSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardView {
    pub search: String,
    pub filter: StatusFilter,
}

impl BoardView {
    /// Case-insensitive substring match on title or description.
    pub fn matches(&self, task: &TaskSummary) -> bool {
        let needle = self.search.to_lowercase();
        if needle.is_empty() {
            return true;
        }
        task.title.to_lowercase().contains(&needle)
            || task.description.to_lowercase().contains(&needle)
    }

    /// Visible columns in board order. A visible column may be empty.
    pub fn columns<'a>(&self, tasks: &'a [TaskSummary]) -> Vec<Column<'a>> {
        TaskStatus::ALL
            .into_iter()
            .filter(|status| self.filter.shows(*status))
            .map(|status| Column {
                status,
                tasks: tasks
                    .iter()
                    .filter(|task| task.status == status && self.matches(task))
                    .collect(),
            })
            .collect()
    }
}

/// Sidebar numbers. Computed from the full list, ignoring search and filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub expired: usize,
    pub active: usize,
    pub completed: usize,
    pub total: usize,
}

impl Counters {
    pub fn compute(tasks: &[TaskSummary], today: NaiveDate) -> Self {
        let mut counters = Counters {
            total: tasks.len(),
            ..Default::default()
        };
        for task in tasks {
            if task.status == TaskStatus::Done {
                counters.completed += 1;
                continue;
            }
            counters.active += 1;
            if task.due_date <= today {
                counters.expired += 1;
            }
        }
        counters
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn summary(title: &str, description: &str, status: TaskStatus, due: NaiveDate) -> TaskSummary {
        TaskSummary {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: description.to_string(),
            status,
            due_date: due,
        }
    }

    fn sample() -> Vec<TaskSummary> {
        vec![
            summary("Buy groceries", "Milk, eggs", TaskStatus::Todo, date(2025, 1, 10)),
            summary("Write report", "Q3 numbers", TaskStatus::OnProgress, date(2025, 3, 1)),
            summary("Pay rent", "", TaskStatus::Done, date(2025, 1, 1)),
            summary("Renew passport", "before the trip", TaskStatus::TimeOut, date(2024, 12, 1)),
        ]
    }

    #[test]
    fn search_matches_title_or_description_ignoring_case() {
        let view = BoardView {
            search: "MILK".to_string(),
            ..Default::default()
        };
        let tasks = sample();
        assert!(view.matches(&tasks[0]));
        assert!(!view.matches(&tasks[1]));

        let view = BoardView {
            search: "report".to_string(),
            ..Default::default()
        };
        assert!(view.matches(&tasks[1]));
        assert!(BoardView::default().matches(&tasks[2]));
    }

    #[test]
    fn search_keeps_whitespace_in_the_term() {
        let single_word = summary("Groceries", "", TaskStatus::Todo, date(2025, 1, 10));
        let view = BoardView {
            search: " ".to_string(),
            ..Default::default()
        };
        assert!(!view.matches(&single_word));
        assert!(view.matches(&sample()[0]));

        let view = BoardView {
            search: "groceries ".to_string(),
            ..Default::default()
        };
        assert!(!view.matches(&single_word));
    }

    #[test]
    fn columns_follow_board_order() {
        let tasks = sample();
        let columns = BoardView::default().columns(&tasks);

        let statuses: Vec<TaskStatus> = columns.iter().map(|column| column.status).collect();
        assert_eq!(statuses, TaskStatus::ALL.to_vec());
        assert!(columns.iter().all(|column| column.tasks.len() == 1));
    }

    #[test]
    fn filter_hides_other_columns() {
        let tasks = sample();
        let view = BoardView {
            filter: StatusFilter::Only(TaskStatus::Done),
            ..Default::default()
        };

        let columns = view.columns(&tasks);
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].status, TaskStatus::Done);
        assert_eq!(columns[0].tasks[0].title, "Pay rent");
    }

    #[test]
    fn search_and_filter_combine() {
        let tasks = sample();
        let view = BoardView {
            search: "groceries".to_string(),
            filter: StatusFilter::Only(TaskStatus::OnProgress),
        };

        let columns = view.columns(&tasks);
        assert_eq!(columns.len(), 1);
        assert!(columns[0].tasks.is_empty());
    }

    #[test]
    fn counters_ignore_search_and_treat_done_as_not_expired() {
        let tasks = sample();
        let counters = Counters::compute(&tasks, date(2025, 2, 1));

        assert_eq!(
            counters,
            Counters {
                expired: 2,
                active: 3,
                completed: 1,
                total: 4,
            }
        );
    }

    #[test]
    fn due_today_counts_as_expired() {
        let tasks = vec![summary("Today", "", TaskStatus::Todo, date(2025, 5, 5))];
        assert_eq!(Counters::compute(&tasks, date(2025, 5, 4)).expired, 0);
        assert_eq!(Counters::compute(&tasks, date(2025, 5, 5)).expired, 1);
        assert_eq!(Counters::compute(&tasks, date(2025, 5, 6)).expired, 1);
    }

    #[test]
    fn filter_cycles_through_every_status() {
        let mut filter = StatusFilter::All;
        let mut seen = Vec::new();
        for _ in 0..5 {
            filter = filter.next();
            seen.push(filter.label());
        }
        assert_eq!(seen, vec!["todo", "onProgress", "done", "timeOut", "all"]);
    }
}
